//! Daily quota enforcement.
//!
//! Admission control runs before synthesis, recording after it. Between the
//! two a concurrent request can slip through at the boundary; the window is
//! accepted because the increment itself is atomic, so counters never drift,
//! the last admission is merely optimistic.

use cvai_models::{current_day_key, DailyUsage, Mode, QuotaLimits, Tier, UserProfile};
use cvai_supabase::{ProfileRepository, SupabaseResult, UsageLedger};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::metrics;

/// Outcome of a successful admission check.
#[derive(Debug, Clone)]
pub struct QuotaAdmission {
    pub tier: Tier,
    /// Day key the check ran against. Recording uses the same key so a
    /// request straddling the UTC midnight rollover is counted on the day it
    /// was admitted.
    pub day: String,
}

/// Service enforcing per-user daily generation quotas.
#[derive(Clone)]
pub struct QuotaService {
    profiles: ProfileRepository,
    ledger: UsageLedger,
}

impl QuotaService {
    /// Create a new quota service.
    pub fn new(profiles: ProfileRepository, ledger: UsageLedger) -> Self {
        Self { profiles, ledger }
    }

    /// Fetch a user's profile, treating a missing row as an error.
    ///
    /// Profiles are provisioned at signup; absence means a broken account,
    /// not an implicit free tier.
    pub async fn resolve_profile(&self, user_id: &str) -> ApiResult<UserProfile> {
        self.profiles
            .get(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User profile not found"))
    }

    /// Check whether a user may generate in the given mode today.
    pub async fn check(&self, user_id: &str, mode: Mode) -> ApiResult<QuotaAdmission> {
        let profile = self.resolve_profile(user_id).await?;
        let tier = profile.effective_tier();
        let day = current_day_key();

        let Some(limits) = QuotaLimits::for_tier(tier) else {
            debug!(user_id = %user_id, tier = %tier, "Unlimited tier, admitting");
            return Ok(QuotaAdmission { tier, day });
        };

        let usage = self.ledger.get(user_id, &day).await?;
        let used = usage.used(mode);
        let limit = limits.limit(mode);

        if used >= limit {
            debug!(user_id = %user_id, mode = %mode, used, limit, "Quota exhausted");
            metrics::record_quota_rejection(mode);
            return Err(ApiError::QuotaExceeded { mode, limit, used });
        }

        Ok(QuotaAdmission { tier, day })
    }

    /// Record one generation against the admitted day's counters and return
    /// the post-increment values.
    pub async fn record(&self, user_id: &str, day: &str, mode: Mode) -> SupabaseResult<DailyUsage> {
        self.ledger.increment(user_id, day, mode).await
    }

    /// Read today's counters without admission semantics (for display).
    pub async fn usage_today(&self, user_id: &str) -> SupabaseResult<DailyUsage> {
        let day = current_day_key();
        self.ledger.get(user_id, &day).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cvai_supabase::{SupabaseClient, SupabaseConfig};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_service(base_url: &str) -> QuotaService {
        let client = SupabaseClient::new(SupabaseConfig {
            url: base_url.to_string(),
            anon_key: "anon-key".to_string(),
            service_role_key: "service-key".to_string(),
            timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(1),
            retry: cvai_supabase::retry::RetryConfig {
                max_retries: 0,
                base_delay_ms: 1,
                max_delay_ms: 5,
            },
        })
        .unwrap();
        QuotaService::new(
            ProfileRepository::new(client.clone()),
            UsageLedger::new(client),
        )
    }

    fn mock_profile(plan: &str, ultra: bool) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "user-1", "plan": plan, "ultra_premium": ultra}
        ]))
    }

    #[tokio::test]
    async fn test_check_admits_under_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .respond_with(mock_profile("free", false))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/daily_usage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"normal_used": 49, "cinematic_used": 0}
            ])))
            .mount(&server)
            .await;

        let admission = test_service(&server.uri())
            .check("user-1", Mode::Normal)
            .await
            .unwrap();
        assert_eq!(admission.tier, Tier::Free);
        assert_eq!(admission.day, cvai_models::current_day_key());
    }

    #[tokio::test]
    async fn test_check_rejects_at_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .respond_with(mock_profile("free", false))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/daily_usage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"normal_used": 3, "cinematic_used": 10}
            ])))
            .mount(&server)
            .await;

        let err = test_service(&server.uri())
            .check("user-1", Mode::Cinematic)
            .await
            .unwrap_err();
        match err {
            ApiError::QuotaExceeded { mode, limit, used } => {
                assert_eq!(mode, Mode::Cinematic);
                assert_eq!(limit, 10);
                assert_eq!(used, 10);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_modes_have_independent_quotas() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .respond_with(mock_profile("free", false))
            .mount(&server)
            .await;
        // Normal exhausted, cinematic untouched
        Mock::given(method("GET"))
            .and(path("/rest/v1/daily_usage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"normal_used": 50, "cinematic_used": 0}
            ])))
            .mount(&server)
            .await;

        let service = test_service(&server.uri());
        assert!(service.check("user-1", Mode::Normal).await.is_err());
        assert!(service.check("user-1", Mode::Cinematic).await.is_ok());
    }

    #[tokio::test]
    async fn test_unlimited_tier_skips_ledger_read() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .and(query_param("id", "eq.user-1"))
            .respond_with(mock_profile("pro", false))
            .expect(1)
            .mount(&server)
            .await;

        let admission = test_service(&server.uri())
            .check("user-1", Mode::Normal)
            .await
            .unwrap();
        assert_eq!(admission.tier, Tier::Pro);
        // Only the profile read; no daily_usage request was made.
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_record_uses_admitted_day() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .respond_with(mock_profile("free", false))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/daily_usage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;
        // The increment must carry the day the check was admitted against,
        // not a freshly computed one.
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/increment_daily_usage"))
            .and(wiremock::matchers::body_partial_json(serde_json::json!({
                "p_day": cvai_models::current_day_key(),
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(
                {"normal_used": 1, "cinematic_used": 0}
            )))
            .expect(1)
            .mount(&server)
            .await;

        let service = test_service(&server.uri());
        let admission = service.check("user-1", Mode::Normal).await.unwrap();
        let usage = service
            .record("user-1", &admission.day, Mode::Normal)
            .await
            .unwrap();
        assert_eq!(usage.normal_used, 1);
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let err = test_service(&server.uri())
            .check("ghost", Mode::Normal)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
