//! User profile record and tier derivation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tier::Tier;

/// Stored `plan` column value.
///
/// Only `free` and `pro` exist in the profile row; `ultra` is expressed via
/// the additive `ultra_premium` flag flipped by the plan-activation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanField {
    #[default]
    Free,
    Pro,
}

/// User profile row as stored in the `users` table.
///
/// Created at account registration, mutated only by plan activation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UserProfile {
    /// Opaque user id issued by the auth provider.
    pub id: String,
    #[serde(default)]
    pub plan: PlanField,
    #[serde(default)]
    pub ultra_premium: bool,
}

impl UserProfile {
    /// Derive the effective tier from the stored flags.
    pub fn effective_tier(&self) -> Tier {
        if self.ultra_premium {
            Tier::Ultra
        } else if self.plan == PlanField::Pro {
            Tier::Pro
        } else {
            Tier::Free
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(plan: PlanField, ultra: bool) -> UserProfile {
        UserProfile {
            id: "user-1".to_string(),
            plan,
            ultra_premium: ultra,
        }
    }

    #[test]
    fn test_tier_derivation() {
        assert_eq!(profile(PlanField::Free, false).effective_tier(), Tier::Free);
        assert_eq!(profile(PlanField::Pro, false).effective_tier(), Tier::Pro);
        assert_eq!(profile(PlanField::Free, true).effective_tier(), Tier::Ultra);
        // ultra_premium is additive and wins over the stored plan
        assert_eq!(profile(PlanField::Pro, true).effective_tier(), Tier::Ultra);
    }

    #[test]
    fn test_profile_deserializes_with_missing_flags() {
        let profile: UserProfile = serde_json::from_str(r#"{"id":"u1"}"#).unwrap();
        assert_eq!(profile.plan, PlanField::Free);
        assert!(!profile.ultra_premium);
        assert_eq!(profile.effective_tier(), Tier::Free);
    }
}
