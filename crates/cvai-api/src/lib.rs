//! Axum HTTP API server.
//!
//! This crate provides:
//! - The audio generation gateway with daily quota enforcement
//! - Supabase access-token verification
//! - Rate limiting and security headers
//! - Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::QuotaService;
pub use state::AppState;
