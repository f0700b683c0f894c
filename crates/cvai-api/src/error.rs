//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cvai_models::Mode;
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Gone: {0}")]
    Gone(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Daily {mode} limit reached ({used}/{limit})")]
    QuotaExceeded { mode: Mode, limit: u32, used: u32 },

    #[error("Voice provider error ({status}): {detail}")]
    Provider { status: u16, detail: String },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Supabase error: {0}")]
    Supabase(#[from] cvai_supabase::SupabaseError),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Gone(_) => StatusCode::GONE,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::QuotaExceeded { .. } => StatusCode::FORBIDDEN,
            ApiError::Provider { .. } | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Supabase(e) => match e {
                // Rejected tokens surface as 401; everything else from the
                // data layer is our failure, not the caller's.
                cvai_supabase::SupabaseError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::QuotaExceeded { .. } => Some("QUOTA_EXCEEDED"),
            ApiError::Gone(_) => Some("ENDPOINT_DEPRECATED"),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    used: Option<u32>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let detail = match &self {
            ApiError::Internal(_) | ApiError::Provider { .. } | ApiError::Supabase(_)
                if status == StatusCode::INTERNAL_SERVER_ERROR =>
            {
                if std::env::var("ENVIRONMENT").unwrap_or_default() == "production" {
                    "An internal error occurred".to_string()
                } else {
                    self.to_string()
                }
            }
            _ => self.to_string(),
        };

        let (limit, used) = match &self {
            ApiError::QuotaExceeded { limit, used, .. } => (Some(*limit), Some(*used)),
            _ => (None, None),
        };

        let body = ErrorResponse {
            detail,
            code: self.code().map(str::to_string),
            limit,
            used,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::unauthorized("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::bad_request("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::QuotaExceeded {
                mode: Mode::Normal,
                limit: 50,
                used: 50
            }
            .status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Gone("deprecated".to_string()).status_code(),
            StatusCode::GONE
        );
    }

    #[test]
    fn test_supabase_unauthorized_maps_to_401() {
        let err = ApiError::from(cvai_supabase::SupabaseError::unauthorized("bad token"));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let err = ApiError::from(cvai_supabase::SupabaseError::request_failed("oops"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_quota_exceeded_message() {
        let err = ApiError::QuotaExceeded {
            mode: Mode::Cinematic,
            limit: 10,
            used: 10,
        };
        assert_eq!(err.to_string(), "Daily cinematic limit reached (10/10)");
    }
}
