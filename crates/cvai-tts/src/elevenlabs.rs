//! ElevenLabs synthesis client.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::error::{TtsError, TtsResult};
use crate::types::{SpeechOutput, SynthesisRequest};

/// Default voice id ("Rachel").
const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";

/// Synthesis model.
const MODEL_ID: &str = "eleven_turbo_v2_5";

/// Configuration for the ElevenLabs client.
#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    /// API key, sent in the `xi-api-key` header.
    pub api_key: String,
    /// Base URL of the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl ElevenLabsConfig {
    /// Create config from environment variables.
    ///
    /// Returns `None` when `ELEVENLABS_API_KEY` is unset; the provider is
    /// then unavailable rather than misconfigured at startup.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("ELEVENLABS_API_KEY").ok()?;
        if api_key.is_empty() {
            return None;
        }
        Some(Self {
            api_key,
            base_url: std::env::var("ELEVENLABS_BASE_URL")
                .unwrap_or_else(|_| "https://api.elevenlabs.io".to_string()),
            timeout: Duration::from_secs(
                std::env::var("TTS_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        })
    }
}

#[derive(Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

#[derive(Serialize)]
struct SynthesisBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

/// Client for the ElevenLabs text-to-speech API.
pub struct ElevenLabsClient {
    http: Client,
    config: ElevenLabsConfig,
}

impl ElevenLabsClient {
    /// Create a new ElevenLabs client.
    pub fn new(config: ElevenLabsConfig) -> TtsResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("cvai-tts/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TtsError::Network)?;

        Ok(Self { http, config })
    }

    /// Synthesize speech, returning raw audio bytes.
    pub async fn synthesize(&self, request: &SynthesisRequest) -> TtsResult<SpeechOutput> {
        let voice_id = request.voice.as_deref().unwrap_or(DEFAULT_VOICE_ID);
        let url = format!("{}/v1/text-to-speech/{}", self.config.base_url, voice_id);

        debug!(voice_id = %voice_id, "Requesting ElevenLabs synthesis");

        let response = self
            .http
            .post(&url)
            .header("xi-api-key", &self.config.api_key)
            .json(&SynthesisBody {
                text: &request.text,
                model_id: MODEL_ID,
                voice_settings: VoiceSettings {
                    stability: 0.5,
                    similarity_boost: 0.75,
                },
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let audio = response.bytes().await?;
        debug!(bytes = audio.len(), "ElevenLabs synthesis complete");
        Ok(SpeechOutput::Audio(audio.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_client(base_url: &str) -> ElevenLabsClient {
        ElevenLabsClient::new(ElevenLabsConfig {
            api_key: "el-key".to_string(),
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(2),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_synthesize_returns_audio_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/text-to-speech/21m00Tcm4TlvDq8ikWAM"))
            .and(header("xi-api-key", "el-key"))
            .and(body_partial_json(serde_json::json!({
                "text": "hello",
                "model_id": "eleven_turbo_v2_5",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let output = client
            .synthesize(&SynthesisRequest {
                text: "hello".to_string(),
                voice: None,
            })
            .await
            .unwrap();
        assert!(matches!(output, SpeechOutput::Audio(ref b) if b == &vec![1u8, 2, 3]));
    }

    #[tokio::test]
    async fn test_synthesize_uses_requested_voice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/text-to-speech/custom-voice"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8]))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        client
            .synthesize(&SynthesisRequest {
                text: "hi".to_string(),
                voice: Some("custom-voice".to_string()),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_upstream_failure_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exhausted"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .synthesize(&SynthesisRequest {
                text: "hi".to_string(),
                voice: None,
            })
            .await
            .unwrap_err();
        match err {
            TtsError::Upstream { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exhausted");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
