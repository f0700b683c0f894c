//! TTS provider error types.

use cvai_models::Provider;
use thiserror::Error;

/// Result type for TTS operations.
pub type TtsResult<T> = Result<T, TtsError>;

/// Errors that can occur during speech synthesis.
#[derive(Debug, Error)]
pub enum TtsError {
    /// The provider's API key is not configured in the environment.
    #[error("{0} API key not configured")]
    NotConfigured(Provider),

    /// The provider answered with a non-success status.
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl TtsError {
    /// Upstream HTTP status, if the failure came from the provider.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            TtsError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
