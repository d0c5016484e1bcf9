//! Orchestration contract tests
//!
//! Exercises intent handling against fake components: state independence,
//! narrate priority, empty-input guards, failure isolation, and the
//! non-blocking announcer.

use std::sync::Arc;
use std::time::{Duration, Instant};

use sightline_gateway::voice::Announcer;
use sightline_gateway::{IntentOutcome, Orchestrator};

mod common;
use common::{
    FailingFactory, FakeDescriber, FakeExtractor, RecordingFactory, assert_no_announcements,
    eventually, test_image,
};

fn orchestrator_with(
    extractor: &Arc<FakeExtractor>,
    describer: &Arc<FakeDescriber>,
    factory: &Arc<RecordingFactory>,
) -> Orchestrator {
    Orchestrator::new(
        extractor.clone(),
        describer.clone(),
        Announcer::new(factory.clone()),
        "test context",
    )
}

#[tokio::test]
async fn extract_text_never_touches_scene_description() {
    let extractor = FakeExtractor::returning("STOP");
    let describer = FakeDescriber::returning("a street crossing");
    let factory = RecordingFactory::new();
    let mut orchestrator = orchestrator_with(&extractor, &describer, &factory);
    orchestrator.attach_image(test_image());

    orchestrator.analyze_scene().await.unwrap();
    orchestrator.extract_text().await.unwrap();

    assert_eq!(orchestrator.state().scene(), Some("a street crossing"));
    assert_eq!(orchestrator.state().text(), Some("STOP"));

    // and the other way around
    orchestrator.analyze_scene().await.unwrap();
    assert_eq!(orchestrator.state().text(), Some("STOP"));
}

#[tokio::test]
async fn narrate_prefers_scene_description_over_text() {
    let extractor = FakeExtractor::returning("STOP");
    let describer = FakeDescriber::returning("a street crossing");
    let factory = RecordingFactory::new();
    let mut orchestrator = orchestrator_with(&extractor, &describer, &factory);
    orchestrator.attach_image(test_image());

    orchestrator.extract_text().await.unwrap();
    orchestrator.analyze_scene().await.unwrap();

    let outcome = orchestrator.narrate();
    assert_eq!(
        outcome,
        IntentOutcome::Completed("a street crossing".to_string())
    );
}

#[tokio::test]
async fn narrate_with_no_results_reports_nothing_to_narrate() {
    let extractor = FakeExtractor::returning("ignored");
    let describer = FakeDescriber::returning("ignored");
    let factory = RecordingFactory::new();
    let mut orchestrator = orchestrator_with(&extractor, &describer, &factory);
    orchestrator.attach_image(test_image());

    assert_eq!(orchestrator.narrate(), IntentOutcome::NothingToNarrate);
    assert_no_announcements(&factory).await;
}

#[tokio::test]
async fn intents_require_an_image_and_call_no_component() {
    let extractor = FakeExtractor::returning("ignored");
    let describer = FakeDescriber::returning("ignored");
    let factory = RecordingFactory::new();
    let mut orchestrator = orchestrator_with(&extractor, &describer, &factory);

    assert_eq!(
        orchestrator.analyze_scene().await.unwrap(),
        IntentOutcome::NoImage
    );
    assert_eq!(
        orchestrator.extract_text().await.unwrap(),
        IntentOutcome::NoImage
    );
    assert_eq!(orchestrator.narrate(), IntentOutcome::NoImage);

    assert_eq!(extractor.call_count(), 0);
    assert_eq!(describer.call_count(), 0);
    assert_no_announcements(&factory).await;
}

#[tokio::test]
async fn announce_returns_before_playback_completes() {
    let factory = RecordingFactory::with_delay(Duration::from_millis(300));
    let announcer = Announcer::new(factory.clone());

    let start = Instant::now();
    let handle = announcer.announce("hello").expect("task should spawn");
    let elapsed = start.elapsed();

    assert!(
        elapsed < Duration::from_millis(100),
        "announce blocked for {elapsed:?}"
    );
    assert!(factory.announcements().is_empty(), "playback finished too early");

    handle.await.unwrap();
    assert_eq!(factory.announcements(), vec!["hello".to_string()]);
}

#[tokio::test]
async fn description_failure_leaves_state_unchanged_and_silent() {
    let extractor = FakeExtractor::returning("ignored");
    let describer = FakeDescriber::failing("rate limited");
    let factory = RecordingFactory::new();
    let mut orchestrator = orchestrator_with(&extractor, &describer, &factory);
    orchestrator.attach_image(test_image());

    let err = orchestrator.analyze_scene().await.unwrap_err();
    assert!(err.to_string().contains("rate limited"));

    assert_eq!(orchestrator.state().scene(), None);
    assert_no_announcements(&factory).await;
}

#[tokio::test]
async fn extraction_failure_leaves_state_unchanged_and_silent() {
    let extractor = FakeExtractor::failing("corrupt image");
    let describer = FakeDescriber::returning("a street crossing");
    let factory = RecordingFactory::new();
    let mut orchestrator = orchestrator_with(&extractor, &describer, &factory);
    orchestrator.attach_image(test_image());

    // a prior result must survive a later failure
    orchestrator.analyze_scene().await.unwrap();
    assert!(orchestrator.extract_text().await.is_err());

    assert_eq!(orchestrator.state().text(), None);
    assert_eq!(orchestrator.state().scene(), Some("a street crossing"));
}

#[tokio::test]
async fn extract_text_stores_and_announces_exactly_once() {
    let extractor = FakeExtractor::returning("STOP");
    let describer = FakeDescriber::returning("ignored");
    let factory = RecordingFactory::new();
    let mut orchestrator = orchestrator_with(&extractor, &describer, &factory);
    orchestrator.attach_image(test_image());

    let outcome = orchestrator.extract_text().await.unwrap();
    assert_eq!(outcome, IntentOutcome::Completed("STOP".to_string()));
    assert_eq!(orchestrator.state().text(), Some("STOP"));

    assert!(eventually(|| factory.announcements().len() == 1).await);
    assert_eq!(factory.announcements(), vec!["STOP".to_string()]);

    // narration is triggered by the intent, exactly once
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(factory.announcements().len(), 1);
}

#[tokio::test]
async fn overlapping_narrations_all_complete() {
    // No cancellation: a second announce does not stop the first
    let factory = RecordingFactory::with_delay(Duration::from_millis(50));
    let announcer = Announcer::new(factory.clone());

    let first = announcer.announce("first").unwrap();
    let second = announcer.announce("second").unwrap();
    first.await.unwrap();
    second.await.unwrap();

    let mut spoken = factory.announcements();
    spoken.sort();
    assert_eq!(spoken, vec!["first".to_string(), "second".to_string()]);
}

#[tokio::test]
async fn empty_extraction_result_is_not_narratable() {
    // OCR on an image with no printed text yields an empty string; it is
    // stored but must not count as a narratable result
    let extractor = FakeExtractor::returning("");
    let describer = FakeDescriber::returning("ignored");
    let factory = RecordingFactory::new();
    let mut orchestrator = orchestrator_with(&extractor, &describer, &factory);
    orchestrator.attach_image(test_image());

    assert_eq!(
        orchestrator.extract_text().await.unwrap(),
        IntentOutcome::Completed(String::new())
    );
    assert_eq!(orchestrator.narrate(), IntentOutcome::NothingToNarrate);
    assert_no_announcements(&factory).await;
}

#[tokio::test]
async fn blank_scene_description_falls_through_to_extracted_text() {
    let extractor = FakeExtractor::returning("STOP");
    let describer = FakeDescriber::returning("   ");
    let factory = RecordingFactory::new();
    let mut orchestrator = orchestrator_with(&extractor, &describer, &factory);
    orchestrator.attach_image(test_image());

    orchestrator.extract_text().await.unwrap();
    orchestrator.analyze_scene().await.unwrap();

    assert_eq!(
        orchestrator.narrate(),
        IntentOutcome::Completed("STOP".to_string())
    );
}

#[tokio::test]
async fn narration_failure_never_reaches_the_intent() {
    let extractor = FakeExtractor::returning("STOP");
    let describer = FakeDescriber::returning("ignored");
    let announcer = Announcer::new(Arc::new(FailingFactory));
    let mut orchestrator = Orchestrator::new(
        extractor.clone(),
        describer.clone(),
        announcer.clone(),
        "test context",
    );
    orchestrator.attach_image(test_image());

    let outcome = orchestrator.extract_text().await.unwrap();
    assert_eq!(outcome, IntentOutcome::Completed("STOP".to_string()));
    assert_eq!(orchestrator.state().text(), Some("STOP"));

    // the background task swallows the engine error and finishes cleanly
    let handle = announcer.announce("hello").expect("task should spawn");
    handle.await.unwrap();
}

#[tokio::test]
async fn announcer_skips_empty_text() {
    let factory = RecordingFactory::new();
    let announcer = Announcer::new(factory.clone());

    assert!(announcer.announce("").is_none());
    assert!(announcer.announce("   ").is_none());
    assert_no_announcements(&factory).await;
}

#[tokio::test]
async fn disabled_announcer_spawns_nothing() {
    let announcer = Announcer::disabled();
    assert!(!announcer.is_enabled());
    assert!(announcer.announce("hello").is_none());
}

#[tokio::test]
async fn reset_clears_image_and_both_slots() {
    let extractor = FakeExtractor::returning("STOP");
    let describer = FakeDescriber::returning("a street crossing");
    let factory = RecordingFactory::new();
    let mut orchestrator = orchestrator_with(&extractor, &describer, &factory);
    orchestrator.attach_image(test_image());

    orchestrator.extract_text().await.unwrap();
    orchestrator.analyze_scene().await.unwrap();
    let old_id = orchestrator.state().id();

    orchestrator.reset();

    assert!(!orchestrator.has_image());
    assert!(orchestrator.state().is_empty());
    assert_ne!(orchestrator.state().id(), old_id);
    assert_eq!(
        orchestrator.analyze_scene().await.unwrap(),
        IntentOutcome::NoImage
    );
}
