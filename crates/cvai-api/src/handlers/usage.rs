//! Usage reporting endpoints.

use axum::extract::State;
use axum::Json;
use cvai_models::{current_day_key, QuotaLimits};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Usage response.
#[derive(Serialize)]
pub struct UsageResponse {
    pub day: String,
    pub normal_used: u32,
    pub cinematic_used: u32,
    /// `null` for unlimited tiers.
    pub normal_limit: Option<u32>,
    pub cinematic_limit: Option<u32>,
}

/// GET /api/usage
///
/// Today's counters plus the caller's limits. Counters are reported for
/// unlimited tiers as well; only the limits are absent.
pub async fn get_usage(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<UsageResponse>> {
    let profile = state.quota.resolve_profile(&user.uid).await?;
    let limits = QuotaLimits::for_tier(profile.effective_tier());
    let usage = state.quota.usage_today(&user.uid).await?;

    Ok(Json(UsageResponse {
        day: current_day_key(),
        normal_used: usage.normal_used,
        cinematic_used: usage.cinematic_used,
        normal_limit: limits.map(|l| l.normal),
        cinematic_limit: limits.map(|l| l.cinematic),
    }))
}

/// POST /api/usage/increment
///
/// Retired write path from before increments moved into the generation flow.
/// Kept routable so stale clients get a clear signal instead of silently
/// double-counting.
pub async fn increment_usage_deprecated(user: AuthUser) -> ApiResult<()> {
    let _ = user;
    Err(ApiError::Gone(
        "Usage is recorded automatically during generation".to_string(),
    ))
}
