//! Google Cloud Text-to-Speech REST client.

use super::SpeechSynthesizer;
use crate::config::SynthesisSettings;
use crate::error::{KringkastError, Result};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GOOGLE_TTS_API_KEY";

/// Per-request timeout. Long lines can take a while to render.
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceParams<'a>,
    audio_config: AudioConfig<'a>,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceParams<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig<'a> {
    audio_encoding: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

/// Synthesizer backed by the Google Cloud TTS `text:synthesize` endpoint.
pub struct GoogleTtsSynthesizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleTtsSynthesizer {
    /// Create a synthesizer; fails when the API key is not configured.
    pub fn new(settings: &SynthesisSettings) -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                KringkastError::Config(format!(
                    "{} not set. Set it with: export {}='...'",
                    API_KEY_ENV, API_KEY_ENV
                ))
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key,
        })
    }

    /// Check whether the TTS API key is present in the environment.
    pub fn is_api_key_configured() -> bool {
        std::env::var(API_KEY_ENV)
            .map(|key| !key.is_empty())
            .unwrap_or(false)
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsSynthesizer {
    async fn synthesize(&self, text: &str, voice_id: &str, language_code: &str) -> Result<Vec<u8>> {
        let body = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceParams {
                language_code,
                name: voice_id,
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: SynthesizeResponse = response.json().await?;

        base64::engine::general_purpose::STANDARD
            .decode(parsed.audio_content.as_bytes())
            .map_err(|e| KringkastError::Audio(format!("Invalid audio payload: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = SynthesizeRequest {
            input: SynthesisInput { text: "Hello" },
            voice: VoiceParams {
                language_code: "en-US",
                name: "en-US-Chirp-HD-F",
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["input"]["text"], "Hello");
        assert_eq!(json["voice"]["languageCode"], "en-US");
        assert_eq!(json["voice"]["name"], "en-US-Chirp-HD-F");
        assert_eq!(json["audioConfig"]["audioEncoding"], "MP3");
    }

    #[test]
    fn test_response_body_shape() {
        let parsed: SynthesizeResponse =
            serde_json::from_str(r#"{"audioContent": "aGVsbG8="}"#).unwrap();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(parsed.audio_content.as_bytes())
            .unwrap();
        assert_eq!(bytes, b"hello");
    }
}
