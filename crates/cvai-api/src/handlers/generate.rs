//! Audio generation endpoint.

use std::time::Instant;

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use cvai_models::{DailyUsage, Mode, Provider};
use cvai_tts::{SpeechOutput, SynthesisRequest, TtsError, AUDIO_CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Maximum accepted text length, in characters.
const MAX_TEXT_LENGTH: usize = 5000;

/// Generation request body.
///
/// `mode` and `provider` arrive as strings and are parsed explicitly so that
/// missing or unknown values produce a 400 with a useful message. Neither has
/// a default; a client that does not say what it wants is rejected before any
/// quota or provider work.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub text: String,
    pub mode: Option<String>,
    pub provider: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
}

/// JSON body returned for client-side synthesis.
#[derive(Serialize)]
pub struct WebSpeechResponse {
    pub success: bool,
    pub provider: Provider,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<DailyUsage>,
}

/// POST /api/generate
///
/// Admission, synthesis, then usage recording, in that order. A quota
/// rejection costs nothing; a synthesis failure is never counted; a
/// bookkeeping failure after successful synthesis does not fail the request.
pub async fn generate_audio(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<GenerateRequest>,
) -> ApiResult<Response> {
    let mode = request
        .mode
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("Missing required field: mode"))?;
    let mode =
        Mode::parse(mode).ok_or_else(|| ApiError::bad_request(format!("Invalid mode: {}", mode)))?;
    let provider = request
        .provider
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("Missing required field: provider"))?;
    let provider = Provider::parse(provider)
        .ok_or_else(|| ApiError::bad_request(format!("Invalid provider: {}", provider)))?;

    let text = request.text.trim();
    if text.is_empty() {
        return Err(ApiError::bad_request("Text is required"));
    }
    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err(ApiError::bad_request(format!(
            "Text exceeds maximum length of {} characters",
            MAX_TEXT_LENGTH
        )));
    }

    let admission = state.quota.check(&user.uid, mode).await?;

    let start = Instant::now();
    let output = state
        .tts
        .synthesize(
            provider,
            &SynthesisRequest {
                text: text.to_string(),
                voice: request.voice.clone(),
            },
        )
        .await
        .map_err(|e| match e {
            TtsError::NotConfigured(p) => {
                ApiError::internal(format!("{} is not configured on this server", p))
            }
            TtsError::Upstream { status, body } => ApiError::Provider {
                status,
                detail: body,
            },
            TtsError::Network(e) => ApiError::internal(format!("Provider request failed: {}", e)),
        })?;

    metrics::record_generation(provider, mode, start.elapsed().as_secs_f64());

    // Synthesis succeeded; record usage against the admitted day. Unlimited
    // tiers are counted too, the counters feed usage displays, not just
    // enforcement.
    let usage = match state.quota.record(&user.uid, &admission.day, mode).await {
        Ok(usage) => Some(usage),
        Err(e) => {
            warn!(uid = %user.uid, mode = %mode, "Failed to record usage: {}", e);
            metrics::record_usage_record_failure(mode);
            None
        }
    };

    info!(
        uid = %user.uid,
        provider = %provider,
        mode = %mode,
        tier = %admission.tier,
        bytes = output.byte_len(),
        "Generation complete"
    );

    Ok(build_response(provider, output, usage))
}

/// Assemble the success response, attaching usage counters when known.
fn build_response(provider: Provider, output: SpeechOutput, usage: Option<DailyUsage>) -> Response {
    let mut headers = HeaderMap::new();
    if let Some(usage) = usage {
        headers.insert("X-Usage-Normal", HeaderValue::from(usage.normal_used));
        headers.insert("X-Usage-Cinematic", HeaderValue::from(usage.cinematic_used));
    }

    match output {
        SpeechOutput::Audio(bytes) => {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(AUDIO_CONTENT_TYPE),
            );
            (headers, bytes).into_response()
        }
        SpeechOutput::ClientSide => {
            let body = WebSpeechResponse {
                success: true,
                provider,
                message: "Use browser speech synthesis".to_string(),
                usage,
            };
            (headers, Json(body)).into_response()
        }
    }
}
