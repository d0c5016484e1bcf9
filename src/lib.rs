//! Sightline Gateway - assistive vision gateway for visually impaired users
//!
//! This library provides the core functionality of the Sightline gateway:
//! - Scene description via remote vision inference
//! - Printed-text extraction via OCR
//! - Spoken narration of results, off the intent-handling path
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │               UI client (external)                   │
//! │   upload image │ scene │ text │ narrate │ session   │
//! └────────────────────┬────────────────────────────────┘
//!                      │ HTTP
//! ┌────────────────────▼────────────────────────────────┐
//! │               Sightline Gateway                      │
//! │   Orchestrator │ Session State │ Announcer (tasks)  │
//! └───────┬──────────────────┬──────────────────┬───────┘
//!         │                  │                  │
//!   ┌─────▼─────┐     ┌──────▼──────┐    ┌──────▼──────┐
//!   │ Tesseract │     │   Gemini    │    │ Speech API  │
//!   │   (OCR)   │     │  (vision)   │    │ + audio out │
//!   └───────────┘     └─────────────┘    └─────────────┘
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod ocr;
pub mod orchestrator;
pub mod prompt;
pub mod session;
pub mod upload;
pub mod vision;
pub mod voice;

pub use config::Config;
pub use error::{Error, Result};
pub use ocr::{TesseractOcr, TextExtractor};
pub use orchestrator::{IntentOutcome, Orchestrator};
pub use session::SessionState;
pub use upload::{UploadedImage, SUPPORTED_MIME_TYPES};
pub use vision::{GeminiVision, SceneDescriber};
pub use voice::{Announcer, NarrationEngineFactory, SpeechEngine, SpeechEngineFactory};
