//! Intent orchestration
//!
//! Translates the user intents (analyze scene, extract text, narrate)
//! into component calls and session-state updates. Component
//! failures propagate to the caller with the session state untouched;
//! narration is dispatched after the state update and never blocks the
//! intent handler.

use std::sync::Arc;

use crate::ocr::TextExtractor;
use crate::prompt;
use crate::session::SessionState;
use crate::upload::UploadedImage;
use crate::vision::SceneDescriber;
use crate::voice::Announcer;
use crate::Result;

/// Outcome of an intent
///
/// `NoImage` and `NothingToNarrate` are ordinary control-flow states, not
/// errors: the intent did nothing and the user is told why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    /// The intent produced (or narrated) this text
    Completed(String),
    /// No image has been supplied yet
    NoImage,
    /// Neither a scene description nor extracted text exists yet
    NothingToNarrate,
}

/// Coordinates the extractor, describer, announcer, and session state
pub struct Orchestrator {
    image: Option<UploadedImage>,
    state: SessionState,
    extractor: Arc<dyn TextExtractor>,
    describer: Arc<dyn SceneDescriber>,
    announcer: Announcer,
    user_context: String,
}

impl Orchestrator {
    /// Create an orchestrator with an empty session
    #[must_use]
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        describer: Arc<dyn SceneDescriber>,
        announcer: Announcer,
        user_context: impl Into<String>,
    ) -> Self {
        Self {
            image: None,
            state: SessionState::new(),
            extractor,
            describer,
            announcer,
            user_context: user_context.into(),
        }
    }

    /// Attach an image, replacing any previous one
    ///
    /// Stored results stay valid until the next successful intent
    /// overwrites them.
    pub fn attach_image(&mut self, image: UploadedImage) {
        tracing::info!(
            session = %self.state.id(),
            mime_type = image.mime_type(),
            bytes = image.len(),
            "image attached"
        );
        self.image = Some(image);
    }

    /// Whether an image is currently attached
    #[must_use]
    pub const fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Current session state (the two display slots)
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Start a new session: drop the image and clear both result slots
    pub fn reset(&mut self) {
        let old = self.state.id();
        self.image = None;
        self.state = SessionState::new();
        tracing::info!(old_session = %old, session = %self.state.id(), "session reset");
    }

    /// Analyze the scene: describe the attached image, store the result,
    /// and narrate it
    ///
    /// # Errors
    ///
    /// Returns error if the vision service fails; the session state is
    /// left unchanged and nothing is narrated
    pub async fn analyze_scene(&mut self) -> Result<IntentOutcome> {
        let Some(image) = &self.image else {
            return Ok(IntentOutcome::NoImage);
        };

        tracing::info!(session = %self.state.id(), "analyzing scene");
        let instruction = prompt::scene_instruction(&self.user_context);
        let description = self.describer.describe(&instruction, image).await?;

        self.state.set_scene(description.clone());
        self.announcer.announce(&description);
        tracing::info!(session = %self.state.id(), chars = description.len(), "scene described");

        Ok(IntentOutcome::Completed(description))
    }

    /// Extract text: run OCR on the attached image, store the result, and
    /// narrate it
    ///
    /// # Errors
    ///
    /// Returns error if the OCR engine fails; the session state is left
    /// unchanged and nothing is narrated
    pub async fn extract_text(&mut self) -> Result<IntentOutcome> {
        let Some(image) = &self.image else {
            return Ok(IntentOutcome::NoImage);
        };

        tracing::info!(session = %self.state.id(), "extracting text");
        let text = self.extractor.extract(image).await?;

        self.state.set_text(text.clone());
        self.announcer.announce(&text);
        tracing::info!(session = %self.state.id(), chars = text.len(), "text extracted");

        Ok(IntentOutcome::Completed(text))
    }

    /// Narrate the stored scene description, falling back to the stored
    /// extracted text
    ///
    /// Never triggers extraction or analysis; each intent is
    /// user-initiated independently.
    pub fn narrate(&self) -> IntentOutcome {
        if self.image.is_none() {
            return IntentOutcome::NoImage;
        }

        match self.state.narration_text() {
            Some(text) => {
                tracing::info!(session = %self.state.id(), chars = text.len(), "narrating stored result");
                self.announcer.announce(text);
                IntentOutcome::Completed(text.to_string())
            }
            None => IntentOutcome::NothingToNarrate,
        }
    }
}
