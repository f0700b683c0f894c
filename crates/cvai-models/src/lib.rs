//! Shared data models for the Cinematic Voice AI backend.
//!
//! This crate provides Serde-serializable types for:
//! - Subscription tiers and the profile flags they derive from
//! - Generation modes and TTS providers
//! - Daily usage counters and per-tier quota limits

pub mod generation;
pub mod profile;
pub mod tier;
pub mod usage;

// Re-export common types
pub use generation::{Mode, Provider};
pub use profile::{PlanField, UserProfile};
pub use tier::Tier;
pub use usage::{
    current_day_key, day_key_for, DailyUsage, QuotaLimits, FREE_CINEMATIC_DAILY_LIMIT,
    FREE_NORMAL_DAILY_LIMIT,
};
