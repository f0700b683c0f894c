//! UnrealSpeech synthesis client.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::error::{TtsError, TtsResult};
use crate::types::{SpeechOutput, SynthesisRequest};

/// Default voice id.
const DEFAULT_VOICE_ID: &str = "Scarlett";

/// Configuration for the UnrealSpeech client.
#[derive(Debug, Clone)]
pub struct UnrealSpeechConfig {
    /// API key, sent as a bearer token.
    pub api_key: String,
    /// Base URL of the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl UnrealSpeechConfig {
    /// Create config from environment variables.
    ///
    /// Returns `None` when `UNREALSPEECH_API_KEY` is unset.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("UNREALSPEECH_API_KEY").ok()?;
        if api_key.is_empty() {
            return None;
        }
        Some(Self {
            api_key,
            base_url: std::env::var("UNREALSPEECH_BASE_URL")
                .unwrap_or_else(|_| "https://api.v6.unrealspeech.com".to_string()),
            timeout: Duration::from_secs(
                std::env::var("TTS_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        })
    }
}

/// Request body; the UnrealSpeech API uses PascalCase field names.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SynthesisBody<'a> {
    text: &'a str,
    voice_id: &'a str,
    bitrate: &'a str,
    speed: &'a str,
    pitch: &'a str,
    codec: &'a str,
}

/// Client for the UnrealSpeech text-to-speech API.
pub struct UnrealSpeechClient {
    http: Client,
    config: UnrealSpeechConfig,
}

impl UnrealSpeechClient {
    /// Create a new UnrealSpeech client.
    pub fn new(config: UnrealSpeechConfig) -> TtsResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("cvai-tts/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TtsError::Network)?;

        Ok(Self { http, config })
    }

    /// Synthesize speech via the streaming endpoint, returning audio bytes.
    pub async fn synthesize(&self, request: &SynthesisRequest) -> TtsResult<SpeechOutput> {
        let voice_id = request.voice.as_deref().unwrap_or(DEFAULT_VOICE_ID);
        let url = format!("{}/stream", self.config.base_url);

        debug!(voice_id = %voice_id, "Requesting UnrealSpeech synthesis");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&SynthesisBody {
                text: &request.text,
                voice_id,
                bitrate: "192k",
                speed: "0",
                pitch: "1.0",
                codec: "libmp3lame",
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
        debug!(bytes = audio.len(), "UnrealSpeech synthesis complete");
        Ok(SpeechOutput::Audio(audio.to_vec()))
    }
}
