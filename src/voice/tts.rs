//! Speech synthesis via the OpenAI speech API

use secrecy::{ExposeSecret, SecretString};

use crate::config::{DEFAULT_RATE_WPM, VoiceConfig};
use crate::{Error, Result};

const SPEECH_API_URL: &str = "https://api.openai.com/v1/audio/speech";

/// Synthesizes speech from text, returning MP3 bytes
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    voice: String,
    rate_wpm: u32,
}

#[derive(serde::Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    speed: f32,
}

impl TextToSpeech {
    /// Create a new synthesis client from the voice configuration
    #[must_use]
    pub fn new(api_key: SecretString, voice: &VoiceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: voice.tts_model.clone(),
            voice: voice.tts_voice.clone(),
            rate_wpm: voice.rate_wpm,
        }
    }

    /// Speed multiplier for the API, relative to the 150 wpm baseline
    ///
    /// The API accepts 0.25 to 4.0; configured rates outside that range
    /// are clamped.
    fn speed(&self) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.rate_wpm as f32 / DEFAULT_RATE_WPM as f32;
        ratio.clamp(0.25, 4.0)
    }

    /// Synthesize text to speech
    ///
    /// # Errors
    ///
    /// Returns error if the speech API rejects the request or the
    /// transport fails
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let request = SpeechRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            speed: self.speed(),
        };

        tracing::debug!(model = %self.model, voice = %self.voice, chars = text.len(), "synthesizing speech");

        let response = self
            .client
            .post(SPEECH_API_URL)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Tts(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("speech API error {status}: {detail}")));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| Error::Tts(format!("failed to read audio: {e}")))?;
        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_rate(rate_wpm: u32) -> TextToSpeech {
        let voice = VoiceConfig {
            rate_wpm,
            ..VoiceConfig::default()
        };
        TextToSpeech::new(SecretString::from("test-key".to_string()), &voice)
    }

    #[test]
    fn baseline_rate_maps_to_unit_speed() {
        assert!((client_with_rate(150).speed() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn double_rate_doubles_speed() {
        assert!((client_with_rate(300).speed() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn extreme_rates_are_clamped() {
        assert!((client_with_rate(1).speed() - 0.25).abs() < f32::EPSILON);
        assert!((client_with_rate(10_000).speed() - 4.0).abs() < f32::EPSILON);
    }
}
