//! User profile repository.

use cvai_models::UserProfile;

use crate::client::SupabaseClient;
use crate::retry::with_retry;
use crate::SupabaseResult;

/// Repository for `users` table reads.
///
/// Profiles are provisioned at account creation and mutated only by the
/// plan-activation workflow; this side only ever reads them.
#[derive(Clone)]
pub struct ProfileRepository {
    client: SupabaseClient,
}

impl ProfileRepository {
    /// Create a new profile repository.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Fetch the profile row for a user, or `None` when no row exists.
    ///
    /// A missing row is a provisioning problem, not a default-to-free case;
    /// the caller decides how to surface it.
    pub async fn get(&self, user_id: &str) -> SupabaseResult<Option<UserProfile>> {
        let retry = self.client.retry_config().clone();
        let rows: Vec<UserProfile> = with_retry(&retry, "get_profile", || async {
            self.client
                .select(
                    "users",
                    "id,plan,ultra_premium",
                    &[("id", format!("eq.{}", user_id))],
                )
                .await
        })
        .await?;

        Ok(rows.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cvai_models::Tier;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::client::SupabaseConfig;
    use crate::retry::RetryConfig;

    fn test_client(base_url: &str) -> SupabaseClient {
        SupabaseClient::new(SupabaseConfig {
            url: base_url.to_string(),
            anon_key: "anon-key".to_string(),
            service_role_key: "service-key".to_string(),
            timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(1),
            retry: RetryConfig {
                max_retries: 0,
                base_delay_ms: 1,
                max_delay_ms: 5,
            },
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_profile_derives_tier() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .and(query_param("id", "eq.user-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "user-1", "plan": "free", "ultra_premium": true}
            ])))
            .mount(&server)
            .await;

        let repo = ProfileRepository::new(test_client(&server.uri()));
        let profile = repo.get("user-1").await.unwrap().expect("profile row");
        assert_eq!(profile.effective_tier(), Tier::Ultra);
    }

    #[tokio::test]
    async fn test_get_profile_missing_row_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let repo = ProfileRepository::new(test_client(&server.uri()));
        assert!(repo.get("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_profile_uses_service_role_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .and(wiremock::matchers::header("apikey", "service-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let repo = ProfileRepository::new(test_client(&server.uri()));
        repo.get("user-1").await.unwrap();
    }
}
