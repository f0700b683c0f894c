//! Subscription tier enumeration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Effective subscription tier.
///
/// Derived from the profile flags, never stored directly: `ultra` wins over
/// `pro`, which wins over `free`. For quota purposes only the
/// limited/unlimited distinction matters; the full tier is kept for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Pro,
    Ultra,
}

impl Tier {
    /// Whether this tier has unlimited daily generations.
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Tier::Pro | Tier::Ultra)
    }

    /// Get the tier name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Pro => "pro",
            Tier::Ultra => "ultra",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
