//! Error types for the Sightline gateway

use thiserror::Error;

/// Result type alias for Sightline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Sightline gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Image upload error (unsupported type, empty payload)
    #[error("image upload error: {0}")]
    Upload(String),

    /// Text extraction (OCR engine) error
    #[error("OCR error: {0}")]
    Ocr(String),

    /// Scene description (vision inference) error
    #[error("vision error: {0}")]
    Vision(String),

    /// Speech synthesis error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Audio output error
    #[error("audio error: {0}")]
    Audio(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
