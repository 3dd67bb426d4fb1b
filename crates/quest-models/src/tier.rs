//! Subscription tiers and the capability record the backend resolves for them.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Sentinel the backend uses for "no limit" on seat and quest quotas.
pub const UNLIMITED: i64 = -1;

/// Subscription tier of a business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Normal,
    Advanced,
    Super,
}

impl Tier {
    /// All tiers, lowest first.
    pub const ALL: &'static [Tier] = &[Tier::Normal, Tier::Advanced, Tier::Super];

    /// Parse from string (case-insensitive). Unknown values fall back to `Normal`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "advanced" => Tier::Advanced,
            "super" => Tier::Super,
            _ => Tier::Normal,
        }
    }

    /// Get the tier name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Normal => "normal",
            Tier::Advanced => "advanced",
            Tier::Super => "super",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for Tier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Tier::parse).unwrap_or_default())
    }
}

/// Capability record for the tier a business is on.
///
/// Only the fields the entitlement logic reads are modelled strictly; every
/// field defaults so that partially populated tier documents still decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TierInfo {
    /// Whether the tier itself grants quest creation.
    #[serde(default)]
    pub can_create_quests: bool,
    /// Admin seats included with the tier, `-1` for unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_seat_limit: Option<i64>,
    /// Monthly AI points included with the tier.
    #[serde(default)]
    pub ai_points_included: i64,
    /// Monthly quests included with the tier, `-1` for unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_quest_limit: Option<i64>,
    /// Monthly price in the smallest currency unit.
    #[serde(default)]
    pub price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
