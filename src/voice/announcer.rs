//! Fire-and-forget speech announcements
//!
//! `announce` hands the text to a background task and returns immediately.
//! Every narration builds its own synthesis engine through the factory, so
//! no engine state is shared between overlapping narrations. A narration
//! failure is logged inside the task and never reaches the caller.
//!
//! Known limitation: a new announcement does not cancel one still playing;
//! overlapping audio output is possible.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::task::JoinHandle;

use crate::config::VoiceConfig;
use crate::voice::{AudioPlayback, TextToSpeech};
use crate::{Error, Result};

/// One single-use speech engine: synthesize and play one text
#[async_trait]
pub trait SpeechEngine: Send {
    /// Synthesize the text and play it to completion
    ///
    /// # Errors
    ///
    /// Returns error if synthesis or playback fails
    async fn speak(&mut self, text: &str) -> Result<()>;
}

/// Builds a fresh [`SpeechEngine`] for each narration
pub trait SpeechEngineFactory: Send + Sync {
    /// Construct a new engine instance
    ///
    /// # Errors
    ///
    /// Returns error if the engine cannot be constructed
    fn create(&self) -> Result<Box<dyn SpeechEngine>>;
}

/// Production engine: remote synthesis plus local playback
struct NarrationEngine {
    tts: TextToSpeech,
}

#[async_trait]
impl SpeechEngine for NarrationEngine {
    async fn speak(&mut self, text: &str) -> Result<()> {
        let audio = self.tts.synthesize(text).await?;

        // cpal streams are not Send; the whole playback lives on one
        // blocking thread.
        tokio::task::spawn_blocking(move || {
            let playback = AudioPlayback::new()?;
            playback.play_mp3(&audio)
        })
        .await
        .map_err(|e| Error::Audio(format!("playback task failed: {e}")))?
    }
}

/// Factory for the production engine
pub struct NarrationEngineFactory {
    api_key: SecretString,
    voice: VoiceConfig,
}

impl NarrationEngineFactory {
    /// Create a factory from the speech API key and voice configuration
    #[must_use]
    pub const fn new(api_key: SecretString, voice: VoiceConfig) -> Self {
        Self { api_key, voice }
    }
}

impl SpeechEngineFactory for NarrationEngineFactory {
    fn create(&self) -> Result<Box<dyn SpeechEngine>> {
        Ok(Box::new(NarrationEngine {
            tts: TextToSpeech::new(self.api_key.clone(), &self.voice),
        }))
    }
}

/// Dispatches narration to background tasks
#[derive(Clone)]
pub struct Announcer {
    factory: Option<Arc<dyn SpeechEngineFactory>>,
}

impl Announcer {
    /// Create an announcer backed by the given engine factory
    #[must_use]
    pub fn new(factory: Arc<dyn SpeechEngineFactory>) -> Self {
        Self {
            factory: Some(factory),
        }
    }

    /// Create an announcer that skips all narration
    ///
    /// Used when voice is disabled or no speech API key is configured;
    /// results are still shown visually.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { factory: None }
    }

    /// Whether narration is configured
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.factory.is_some()
    }

    /// Speak the text on a background task, returning immediately
    ///
    /// Empty or whitespace-only text is skipped. The returned handle is
    /// for callers that want to await completion (tests, the CLI); the
    /// orchestrator simply drops it.
    pub fn announce(&self, text: &str) -> Option<JoinHandle<()>> {
        let Some(factory) = &self.factory else {
            tracing::debug!("narration disabled; skipping announcement");
            return None;
        };

        let text = text.trim().to_string();
        if text.is_empty() {
            return None;
        }

        let factory = Arc::clone(factory);
        Some(tokio::spawn(async move {
            tracing::debug!(chars = text.len(), "narration started");
            let result = match factory.create() {
                Ok(mut engine) => engine.speak(&text).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => tracing::debug!("narration finished"),
                Err(e) => tracing::warn!(error = %e, "narration failed"),
            }
        }))
    }
}
