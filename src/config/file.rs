//! TOML configuration file loading
//!
//! Supports `~/.config/sightline/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults,
//! and environment variables override both.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct SightlineConfigFile {
    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// Speech output configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// OCR engine configuration
    #[serde(default)]
    pub ocr: OcrFileConfig,

    /// Vision inference configuration
    #[serde(default)]
    pub vision: VisionFileConfig,

    /// Server/runtime configuration
    #[serde(default)]
    pub server: ServerFileConfig,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub gemini: Option<String>,
    pub openai: Option<String>,
}

/// Speech output configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// Enable spoken narration
    pub enabled: Option<bool>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: Option<String>,

    /// Speaking rate in words per minute
    pub rate_wpm: Option<u32>,
}

/// OCR engine configuration
#[derive(Debug, Default, Deserialize)]
pub struct OcrFileConfig {
    /// Explicit path to the tesseract binary (otherwise found on PATH)
    pub tesseract_path: Option<PathBuf>,

    /// Recognition language (tesseract `-l` argument)
    pub language: Option<String>,
}

/// Vision inference configuration
#[derive(Debug, Default, Deserialize)]
pub struct VisionFileConfig {
    /// Vision model identifier (e.g. "gemini-1.5-pro")
    pub model: Option<String>,

    /// User-context line embedded in the scene instruction
    pub user_context: Option<String>,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// API server port
    pub port: Option<u16>,
}

/// Path to the config file: `~/.config/sightline/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("sightline").join("config.toml"))
}

/// Load the TOML config file, returning defaults if absent or unreadable
///
/// A malformed file is logged and ignored rather than failing startup.
#[must_use]
pub fn load_config_file() -> SightlineConfigFile {
    let Some(path) = config_file_path() else {
        return SightlineConfigFile::default();
    };

    let Ok(contents) = std::fs::read_to_string(&path) else {
        return SightlineConfigFile::default();
    };

    match toml::from_str(&contents) {
        Ok(file) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            file
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
            SightlineConfigFile::default()
        }
    }
}
