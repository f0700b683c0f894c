//! Supabase REST client.
//!
//! This crate provides:
//! - Bearer-token verification against the GoTrue auth endpoint
//! - Typed repositories for the `users` and `daily_usage` tables (PostgREST)
//! - The atomic `increment_daily_usage` RPC used by the usage ledger
//! - Retry logic with exponential backoff for retryable read failures

pub mod client;
pub mod error;
pub mod metrics;
pub mod profile_repo;
pub mod retry;
pub mod usage_ledger;


pub use client::{AuthenticatedUser, SupabaseClient, SupabaseConfig};
pub use error::{SupabaseError, SupabaseResult};
pub use profile_repo::ProfileRepository;
pub use usage_ledger::UsageLedger;
