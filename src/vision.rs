//! Scene description via remote vision inference
//!
//! Sends the rendered instruction plus the raw image to the Google
//! Generative Language API and returns the model's natural-language answer
//! verbatim; the gateway never parses the answer's internal structure.

use async_trait::async_trait;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::upload::UploadedImage;
use crate::{Error, Result};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Produces a natural-language description of an image
#[async_trait]
pub trait SceneDescriber: Send + Sync {
    /// Describe the image following the given instruction
    ///
    /// # Errors
    ///
    /// Returns error on network failure, authentication failure, or a
    /// remote service error
    async fn describe(&self, instruction: &str, image: &UploadedImage) -> Result<String>;
}

/// Gemini vision client
///
/// Constructed even without a key; an unconfigured client reports the
/// missing credential as a description failure at intent time, leaving the
/// other capabilities untouched.
pub struct GeminiVision {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    model: String,
}

/// `generateContent` request body
#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

/// A content entry holding the instruction and the image
#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

/// Request part (instruction text or inline image data)
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

/// Base64-encoded image payload with its MIME type
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

/// `generateContent` response body
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiVision {
    /// Create a new vision client
    #[must_use]
    pub fn new(api_key: Option<SecretString>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.into(),
        }
    }

    /// Whether an API key is configured
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl SceneDescriber for GeminiVision {
    async fn describe(&self, instruction: &str, image: &UploadedImage) -> Result<String> {
        let Some(api_key) = &self.api_key else {
            return Err(Error::Vision(
                "Gemini API key not configured (set GEMINI_API_KEY)".to_string(),
            ));
        };

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: instruction },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type(),
                            data: base64::engine::general_purpose::STANDARD.encode(image.data()),
                        },
                    },
                ],
            }],
        };

        let url = format!("{GEMINI_API_BASE}/{}:generateContent", self.model);
        tracing::debug!(model = %self.model, image_bytes = image.len(), "requesting scene description");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Vision(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Vision(format!(
                "vision API error {status}: {detail}"
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Vision(format!("malformed response: {e}")))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .filter(|text| !text.is_empty())
            .ok_or_else(|| Error::Vision("response contained no description".to_string()))
    }
}
