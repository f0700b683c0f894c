//! Supabase error types.

use thiserror::Error;

/// Result type for Supabase operations.
pub type SupabaseResult<T> = Result<T, SupabaseError>;

/// Errors that can occur during Supabase operations.
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Row not found: {0}")]
    NotFound(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited, retry after {0}ms")]
    RateLimited(u64),

    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SupabaseError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Map an upstream HTTP status to an error variant.
    pub fn from_http_status(status: u16, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        match status {
            401 | 403 => Self::Unauthorized(msg),
            404 => Self::NotFound(msg),
            429 => Self::RateLimited(1000),
            500..=599 => Self::ServerError(status, msg),
            _ => Self::RequestFailed(msg),
        }
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SupabaseError::Network(_) | SupabaseError::RateLimited(_) | SupabaseError::ServerError(_, _)
        )
    }

    /// HTTP status this error originated from, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            SupabaseError::Unauthorized(_) => Some(401),
            SupabaseError::NotFound(_) => Some(404),
            SupabaseError::RateLimited(_) => Some(429),
            SupabaseError::ServerError(status, _) => Some(*status),
            _ => None,
        }
    }

    /// Suggested retry delay for rate-limited requests.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            SupabaseError::RateLimited(ms) => Some(*ms),
            _ => None,
        }
    }
}
