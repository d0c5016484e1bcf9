//! Configuration management for the Sightline gateway
//!
//! Resolution order for every setting: environment variable, then the TOML
//! config file, then the built-in default. Credentials are only ever supplied
//! externally, never embedded in source.

pub mod file;

use std::path::PathBuf;

use secrecy::SecretString;

use crate::prompt::DEFAULT_USER_CONTEXT;

/// Default speaking rate in words per minute
pub const DEFAULT_RATE_WPM: u32 = 150;

/// Sightline gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API keys for the remote vision and speech services
    pub api_keys: ApiKeys,

    /// Speech output configuration
    pub voice: VoiceConfig,

    /// OCR engine configuration
    pub ocr: OcrConfig,

    /// Vision inference configuration
    pub vision: VisionConfig,

    /// HTTP API server configuration
    pub server: ServerConfig,
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// Google Gemini API key (scene description)
    pub gemini: Option<SecretString>,

    /// `OpenAI` API key (speech synthesis)
    pub openai: Option<SecretString>,
}

/// Speech output configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Enable spoken narration
    pub enabled: bool,

    /// TTS model identifier (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: String,

    /// Speaking rate in words per minute
    pub rate_wpm: u32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tts_model: "tts-1".to_string(),
            tts_voice: "alloy".to_string(),
            rate_wpm: DEFAULT_RATE_WPM,
        }
    }
}

/// OCR engine configuration
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Explicit path to the tesseract binary; found on PATH when unset
    pub tesseract_path: Option<PathBuf>,

    /// Recognition language (tesseract `-l` argument)
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_path: None,
            language: "eng".to_string(),
        }
    }
}

/// Vision inference configuration
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Vision model identifier
    pub model: String,

    /// User-context line embedded in the scene instruction
    pub user_context: String,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-pro".to_string(),
            user_context: DEFAULT_USER_CONTEXT.to_string(),
        }
    }
}

/// HTTP API server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 18890 }
    }
}

impl Config {
    /// Load configuration from environment and the TOML config file
    ///
    /// # Errors
    ///
    /// Returns error if an environment override cannot be parsed
    pub fn load() -> crate::Result<Self> {
        Self::load_with_options(false)
    }

    /// Load configuration with an explicit voice disable option
    ///
    /// # Errors
    ///
    /// Returns error if an environment override cannot be parsed
    pub fn load_with_options(disable_voice: bool) -> crate::Result<Self> {
        let fc = file::load_config_file();

        let api_keys = ApiKeys {
            gemini: std::env::var("GEMINI_API_KEY")
                .ok()
                .or(fc.api_keys.gemini)
                .map(SecretString::from),
            openai: std::env::var("OPENAI_API_KEY")
                .ok()
                .or(fc.api_keys.openai)
                .map(SecretString::from),
        };

        let voice_defaults = VoiceConfig::default();
        let voice_enabled = if disable_voice {
            false
        } else {
            fc.voice.enabled.unwrap_or(true)
        };
        let voice = VoiceConfig {
            enabled: voice_enabled,
            tts_model: std::env::var("SIGHTLINE_TTS_MODEL")
                .ok()
                .or(fc.voice.tts_model)
                .unwrap_or(voice_defaults.tts_model),
            tts_voice: std::env::var("SIGHTLINE_TTS_VOICE")
                .ok()
                .or(fc.voice.tts_voice)
                .unwrap_or(voice_defaults.tts_voice),
            rate_wpm: parse_env("SIGHTLINE_TTS_RATE")?
                .or(fc.voice.rate_wpm)
                .unwrap_or(DEFAULT_RATE_WPM),
        };

        if disable_voice {
            tracing::info!("narration explicitly disabled via --disable-voice");
        }

        let ocr_defaults = OcrConfig::default();
        let ocr = OcrConfig {
            tesseract_path: std::env::var("SIGHTLINE_TESSERACT")
                .ok()
                .map(PathBuf::from)
                .or(fc.ocr.tesseract_path),
            language: std::env::var("SIGHTLINE_OCR_LANG")
                .ok()
                .or(fc.ocr.language)
                .unwrap_or(ocr_defaults.language),
        };

        let vision_defaults = VisionConfig::default();
        let vision = VisionConfig {
            model: std::env::var("SIGHTLINE_VISION_MODEL")
                .ok()
                .or(fc.vision.model)
                .unwrap_or(vision_defaults.model),
            user_context: std::env::var("SIGHTLINE_USER_CONTEXT")
                .ok()
                .or(fc.vision.user_context)
                .unwrap_or(vision_defaults.user_context),
        };

        let server = ServerConfig {
            port: parse_env("SIGHTLINE_PORT")?
                .or(fc.server.port)
                .unwrap_or_else(|| ServerConfig::default().port),
        };

        Ok(Self {
            api_keys,
            voice,
            ocr,
            vision,
            server,
        })
    }
}

/// Parse an environment variable, failing loudly on a malformed value
fn parse_env<T: std::str::FromStr>(name: &str) -> crate::Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| crate::Error::Config(format!("invalid value for {name}: {raw}"))),
        Err(_) => Ok(None),
    }
}
