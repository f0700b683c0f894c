//! Request handlers.

pub mod generate;
pub mod health;
pub mod plan;
pub mod usage;

pub use health::{health, ready};
