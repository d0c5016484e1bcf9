//! Shared test doubles for the gateway's component boundaries

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sightline_gateway::{
    Error, Result, SceneDescriber, SpeechEngine, SpeechEngineFactory, TextExtractor, UploadedImage,
};

/// A small valid-enough JPEG payload (magic bytes plus filler)
#[must_use]
pub fn test_image() -> UploadedImage {
    UploadedImage::new(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46], "image/jpeg")
        .expect("test image should construct")
}

/// OCR double with a canned reply and a call counter
pub struct FakeExtractor {
    reply: std::result::Result<String, String>,
    calls: AtomicUsize,
}

impl FakeExtractor {
    #[must_use]
    pub fn returning(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    #[must_use]
    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextExtractor for FakeExtractor {
    async fn extract(&self, _image: &UploadedImage) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(Error::Ocr)
    }
}

/// Vision double with a canned reply and a call counter
pub struct FakeDescriber {
    reply: std::result::Result<String, String>,
    calls: AtomicUsize,
}

impl FakeDescriber {
    #[must_use]
    pub fn returning(description: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(description.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    #[must_use]
    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SceneDescriber for FakeDescriber {
    async fn describe(&self, _instruction: &str, _image: &UploadedImage) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(Error::Vision)
    }
}

/// Speech engine double that logs spoken text, optionally after a delay
/// simulating a slow audio device
struct RecordingEngine {
    log: Arc<Mutex<Vec<String>>>,
    delay: Duration,
}

#[async_trait]
impl SpeechEngine for RecordingEngine {
    async fn speak(&mut self, text: &str) -> Result<()> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.log.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Factory handing out recording engines over a shared log
pub struct RecordingFactory {
    log: Arc<Mutex<Vec<String>>>,
    delay: Duration,
}

impl RecordingFactory {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Self::with_delay(Duration::ZERO)
    }

    #[must_use]
    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            log: Arc::new(Mutex::new(Vec::new())),
            delay,
        })
    }

    /// Everything spoken so far, in completion order
    #[must_use]
    pub fn announcements(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl SpeechEngineFactory for RecordingFactory {
    fn create(&self) -> Result<Box<dyn SpeechEngine>> {
        Ok(Box::new(RecordingEngine {
            log: Arc::clone(&self.log),
            delay: self.delay,
        }))
    }
}

/// Speech engine double that always fails, simulating a dead audio device
struct FailingEngine;

#[async_trait]
impl SpeechEngine for FailingEngine {
    async fn speak(&mut self, _text: &str) -> Result<()> {
        Err(Error::Audio("no output device available".to_string()))
    }
}

/// Factory handing out engines that always fail
pub struct FailingFactory;

impl SpeechEngineFactory for FailingFactory {
    fn create(&self) -> Result<Box<dyn SpeechEngine>> {
        Ok(Box::new(FailingEngine))
    }
}

/// Poll until the condition holds or half a second passes
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}

/// Give in-flight background narration a moment to surface, then check
/// that nothing was spoken
pub async fn assert_no_announcements(factory: &RecordingFactory) {
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(
        factory.announcements().is_empty(),
        "expected no announcements, got {:?}",
        factory.announcements()
    );
}
