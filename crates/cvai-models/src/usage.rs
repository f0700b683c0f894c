//! Daily usage counters and per-tier quota limits.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::generation::Mode;
use crate::tier::Tier;

/// Daily generation limits for the free tier.
pub const FREE_NORMAL_DAILY_LIMIT: u32 = 50;
pub const FREE_CINEMATIC_DAILY_LIMIT: u32 = 10;

/// Get the current UTC calendar day key in "YYYY-MM-DD" format.
///
/// This is the ledger key for daily usage periods; quotas reset on the
/// natural UTC day rollover.
pub fn current_day_key() -> String {
    day_key_for(Utc::now())
}

/// Day key for an arbitrary instant. Split out so tests can pin a date.
pub fn day_key_for(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Per-day usage counters for one user.
///
/// Absence of a ledger row means zero usage, so this type defaults to zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DailyUsage {
    #[serde(default)]
    pub normal_used: u32,
    #[serde(default)]
    pub cinematic_used: u32,
}

impl DailyUsage {
    /// Counter value for the given mode.
    pub fn used(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Normal => self.normal_used,
            Mode::Cinematic => self.cinematic_used,
        }
    }
}

/// Fixed daily limits for a limited tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuotaLimits {
    pub normal: u32,
    pub cinematic: u32,
}

impl QuotaLimits {
    /// Limits for a tier, or `None` when the tier is unlimited.
    pub fn for_tier(tier: Tier) -> Option<Self> {
        match tier {
            Tier::Free => Some(Self {
                normal: FREE_NORMAL_DAILY_LIMIT,
                cinematic: FREE_CINEMATIC_DAILY_LIMIT,
            }),
            Tier::Pro | Tier::Ultra => None,
        }
    }

    /// Limit for the given mode.
    pub fn limit(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Normal => self.normal,
            Mode::Cinematic => self.cinematic,
        }
    }
}
