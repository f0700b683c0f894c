//! Daily usage ledger.
//!
//! Tracks per-user, per-UTC-day generation counters in the `daily_usage`
//! table, keyed on `(user_id, day)`. Reads tolerate absent rows (no row means
//! zero usage); writes go through a single server-side upsert so concurrent
//! increments for the same key never lose updates.

use cvai_models::{DailyUsage, Mode};
use tracing::debug;

use crate::client::SupabaseClient;
use crate::retry::with_retry;
use crate::SupabaseResult;

/// Name of the atomic increment function exposed through PostgREST.
///
/// The backing SQL is one statement, so the increment is atomic without any
/// client-side locking or retry:
///
/// ```sql
/// create function increment_daily_usage(p_user_id text, p_day date, p_mode text)
/// returns daily_usage as $$
///   insert into daily_usage (user_id, day, normal_used, cinematic_used)
///   values (
///     p_user_id, p_day,
///     case when p_mode = 'normal' then 1 else 0 end,
///     case when p_mode = 'cinematic' then 1 else 0 end
///   )
///   on conflict (user_id, day) do update set
///     normal_used = daily_usage.normal_used
///       + case when p_mode = 'normal' then 1 else 0 end,
///     cinematic_used = daily_usage.cinematic_used
///       + case when p_mode = 'cinematic' then 1 else 0 end
///   returning *;
/// $$ language sql;
/// ```
const INCREMENT_FN: &str = "increment_daily_usage";

/// Repository for the `daily_usage` table.
#[derive(Clone)]
pub struct UsageLedger {
    client: SupabaseClient,
}

impl UsageLedger {
    /// Create a new usage ledger.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Get usage counters for a (user, day) pair.
    ///
    /// Returns zeros when no row exists; absence is not an error and no row
    /// is created.
    pub async fn get(&self, user_id: &str, day: &str) -> SupabaseResult<DailyUsage> {
        let retry = self.client.retry_config().clone();
        let rows: Vec<DailyUsage> = with_retry(&retry, "get_usage", || async {
            self.client
                .select(
                    "daily_usage",
                    "normal_used,cinematic_used",
                    &[
                        ("user_id", format!("eq.{}", user_id)),
                        ("day", format!("eq.{}", day)),
                    ],
                )
                .await
        })
        .await?;

        Ok(rows.into_iter().next().unwrap_or_default())
    }

    /// Atomically increment one counter and return the post-increment values.
    ///
    /// Exactly one RPC call per invocation; the insert-or-increment happens
    /// server-side. Not retried: after an ambiguous failure the increment may
    /// already have been applied, and double-counting a generation is worse
    /// than dropping one bookkeeping write.
    pub async fn increment(
        &self,
        user_id: &str,
        day: &str,
        mode: Mode,
    ) -> SupabaseResult<DailyUsage> {
        let usage: DailyUsage = self
            .client
            .rpc(
                INCREMENT_FN,
                &serde_json::json!({
                    "p_user_id": user_id,
                    "p_day": day,
                    "p_mode": mode.as_str(),
                }),
            )
            .await?;

        debug!(
            user_id = %user_id,
            day = %day,
            mode = %mode,
            normal_used = usage.normal_used,
            cinematic_used = usage.cinematic_used,
            "Recorded usage"
        );

        Ok(usage)
    }
}
