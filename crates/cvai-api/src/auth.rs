//! Bearer-token authentication.
//!
//! Tokens are opaque to this server: every request is verified against the
//! auth server rather than decoded locally, so revoked sessions fail
//! immediately.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cvai_supabase::SupabaseError;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user extracted from request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
}

/// Axum extractor for authenticated user.
#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get Authorization header
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

        // Extract Bearer token
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Invalid Authorization header format"))?;

        // Verify against the auth server
        let user = state.supabase.verify_user(token).await.map_err(|e| match e {
            SupabaseError::Unauthorized(_) => {
                ApiError::unauthorized("Invalid or expired token")
            }
            other => ApiError::from(other),
        })?;

        debug!(uid = %user.id, "Authenticated request");

        Ok(AuthUser {
            uid: user.id,
            email: user.email,
        })
    }
}
