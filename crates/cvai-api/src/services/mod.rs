//! Business logic services.

pub mod quota;

pub use quota::{QuotaAdmission, QuotaService};
