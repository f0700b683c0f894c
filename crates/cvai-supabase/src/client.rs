//! Supabase REST API client.
//!
//! One client covers the two Supabase surfaces this backend talks to:
//! - GoTrue (`/auth/v1`) for bearer-token verification with the anon key
//! - PostgREST (`/rest/v1`) for table reads and RPC calls with the
//!   service-role key
//!
//! HTTP client tuning (pooling, timeouts) and the span/metrics wrapper follow
//! the same shape as the rest of our outbound clients.

use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info_span, Instrument};

use crate::error::{SupabaseError, SupabaseResult};
use crate::metrics::record_request;
use crate::retry::RetryConfig;

/// Supabase client configuration.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://xyzcompany.supabase.co`
    pub url: String,
    /// Anon (publishable) key, used for auth verification
    pub anon_key: String,
    /// Service-role key, used for table reads and RPCs
    pub service_role_key: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Retry configuration for read operations
    pub retry: RetryConfig,
}

impl SupabaseConfig {
    /// Create config from environment variables.
    pub fn from_env() -> SupabaseResult<Self> {
        let url = std::env::var("SUPABASE_URL")
            .map_err(|_| SupabaseError::request_failed("SUPABASE_URL must be set"))?;
        if url.is_empty() {
            return Err(SupabaseError::request_failed("SUPABASE_URL cannot be empty"));
        }

        let anon_key = std::env::var("SUPABASE_ANON_KEY")
            .map_err(|_| SupabaseError::request_failed("SUPABASE_ANON_KEY must be set"))?;
        let service_role_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY").map_err(|_| {
            SupabaseError::request_failed("SUPABASE_SERVICE_ROLE_KEY must be set")
        })?;

        let timeout_secs: u64 = std::env::var("SUPABASE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);
        let connect_timeout_secs: u64 = std::env::var("SUPABASE_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            url,
            anon_key,
            service_role_key,
            timeout: Duration::from_secs(timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            retry: RetryConfig::from_env(),
        })
    }
}

/// User identity confirmed by the auth server.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Supabase REST API client.
pub struct SupabaseClient {
    http: Client,
    config: SupabaseConfig,
    rest_base: String,
    auth_base: String,
}

impl Clone for SupabaseClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            config: self.config.clone(),
            rest_base: self.rest_base.clone(),
            auth_base: self.auth_base.clone(),
        }
    }
}

impl SupabaseClient {
    /// Create a new Supabase client.
    pub fn new(config: SupabaseConfig) -> SupabaseResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("cvai-supabase/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SupabaseError::Network)?;

        let base = config.url.trim_end_matches('/').to_string();
        let rest_base = format!("{}/rest/v1", base);
        let auth_base = format!("{}/auth/v1", base);

        Ok(Self {
            http,
            config,
            rest_base,
            auth_base,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> SupabaseResult<Self> {
        Self::new(SupabaseConfig::from_env()?)
    }

    /// Retry configuration for this client's read operations.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.config.retry
    }

    /// Verify a user's access token against the auth server.
    ///
    /// The token is forwarded as-is; the anon key identifies the project.
    /// Invalid or expired tokens come back as `Unauthorized`.
    pub async fn verify_user(&self, access_token: &str) -> SupabaseResult<AuthenticatedUser> {
        let url = format!("{}/user", self.auth_base);

        self.execute_request("verify_user", async {
            let response = self
                .http
                .get(&url)
                .header("apikey", &self.config.anon_key)
                .bearer_auth(access_token)
                .send()
                .await?;

            let status = response.status();
            match status {
                StatusCode::OK => {
                    let user: AuthenticatedUser = response.json().await?;
                    if user.id.is_empty() {
                        return Err(SupabaseError::invalid_response(
                            "auth server returned a user without an id",
                        ));
                    }
                    debug!(user_id = %user.id, "Verified access token");
                    Ok(user)
                }
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    let body = response.text().await.unwrap_or_default();
                    Err(SupabaseError::unauthorized(format!(
                        "token rejected by auth server: {}",
                        body
                    )))
                }
                _ => Err(Self::handle_error_response(status, &url, response).await),
            }
        })
        .await
    }

    /// Select rows from a table via PostgREST.
    ///
    /// `filters` are raw PostgREST operator expressions, e.g.
    /// `("id", "eq.user-123")`; values are percent-encoded here.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        columns: &str,
        filters: &[(&str, String)],
    ) -> SupabaseResult<Vec<T>> {
        let mut query = format!("select={}", urlencoding::encode(columns));
        for (key, value) in filters {
            query.push('&');
            query.push_str(key);
            query.push('=');
            query.push_str(&urlencoding::encode(value));
        }
        let url = format!("{}/{}?{}", self.rest_base, table, query);

        self.execute_request("select", async {
            let response = self
                .http
                .get(&url)
                .header("apikey", &self.config.service_role_key)
                .bearer_auth(&self.config.service_role_key)
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::OK {
                let rows: Vec<T> = response.json().await?;
                Ok(rows)
            } else {
                Err(Self::handle_error_response(status, &url, response).await)
            }
        })
        .await
    }

    /// Call a PostgREST RPC (a Postgres function exposed at `/rpc/{name}`).
    ///
    /// Used for server-side atomic operations; callers must not wrap this in
    /// a retry loop when the function has side effects.
    pub async fn rpc<T: DeserializeOwned>(
        &self,
        function: &str,
        args: &serde_json::Value,
    ) -> SupabaseResult<T> {
        let url = format!("{}/rpc/{}", self.rest_base, function);

        self.execute_request("rpc", async {
            let response = self
                .http
                .post(&url)
                .header("apikey", &self.config.service_role_key)
                .bearer_auth(&self.config.service_role_key)
                .json(args)
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::OK {
                let value: T = response.json().await?;
                Ok(value)
            } else {
                Err(Self::handle_error_response(status, &url, response).await)
            }
        })
        .await
    }

    /// Check connectivity to the auth server's health endpoint.
    ///
    /// Used by the readiness probe; no retry, a slow or failing check should
    /// surface immediately.
    pub async fn check_connectivity(&self) -> SupabaseResult<()> {
        let url = format!("{}/health", self.auth_base);
        let response = self
            .http
            .get(&url)
            .header("apikey", &self.config.anon_key)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::handle_error_response(status, &url, response).await)
        }
    }

    /// Convert a non-success PostgREST/GoTrue response into an error.
    async fn handle_error_response(
        status: StatusCode,
        url: &str,
        response: reqwest::Response,
    ) -> SupabaseError {
        let body = response.text().await.unwrap_or_default();
        SupabaseError::from_http_status(status.as_u16(), format!("{} failed: {}", url, body))
    }

    /// Wrap a request future with a tracing span and request metrics.
    async fn execute_request<T, F>(&self, operation: &str, fut: F) -> SupabaseResult<T>
    where
        F: std::future::Future<Output = SupabaseResult<T>>,
    {
        let span = info_span!("supabase_request", operation = %operation);

        let start = Instant::now();
        let result = fut.instrument(span).await;
        let latency_ms = start.elapsed().as_millis() as f64;

        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.http_status().unwrap_or(500),
        };
        record_request(operation, status, latency_ms);

        result
    }
}
