//! Plan lookup endpoint.

use axum::extract::State;
use axum::Json;
use cvai_models::{QuotaLimits, Tier};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

/// Plan response.
#[derive(Serialize)]
pub struct PlanResponse {
    pub user_id: String,
    pub plan: Tier,
    pub unlimited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<QuotaLimits>,
}

/// GET /api/plan
///
/// Resolves the caller's effective tier from their profile row.
pub async fn get_plan(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<PlanResponse>> {
    let profile = state.quota.resolve_profile(&user.uid).await?;
    let tier = profile.effective_tier();

    Ok(Json(PlanResponse {
        user_id: user.uid,
        plan: tier,
        unlimited: tier.is_unlimited(),
        limits: QuotaLimits::for_tier(tier),
    }))
}
