//! Business snapshot as served by the backend.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::quota::{clamp_count, Quota};
use crate::tier::{Tier, TierInfo};

/// Point-in-time view of a business's tier, permissions and usage counters.
///
/// The backend is the authority for every value here; this type only decodes
/// it. Missing fields default to zero so a partial document never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BusinessSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub tier: Tier,
    #[serde(default, alias = "tierInfo", skip_serializing_if = "Option::is_none")]
    pub tier_info: Option<TierInfo>,
    /// Explicit feature flags. Key spelling is not normalized.
    #[serde(default)]
    pub permissions: HashMap<String, bool>,
    /// Purchased plus monthly AI point balance.
    #[serde(default)]
    pub ai_points: i64,
    /// Monthly quest allowance, `-1` for unlimited.
    #[serde(default)]
    pub monthly_quest_limit: i64,
    #[serde(default)]
    pub monthly_quests_used: i64,
    /// Purchased quest credits. These never expire.
    #[serde(default)]
    pub quest_credits_purchased: i64,
    #[serde(default)]
    pub admin_seats_purchased: i64,
    /// Admins currently holding a seat, computed server side.
    #[serde(default)]
    pub current_admin_count: i64,
    /// Flat seat limit from before tier records existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_seat_limit: Option<i64>,
    #[serde(default)]
    pub days_until_reset: i64,
}

impl BusinessSnapshot {
    /// Monthly quest allowance as a quota.
    pub fn monthly_quota(&self) -> Quota {
        Quota::from_limit(self.monthly_quest_limit)
    }

    pub fn quests_used(&self) -> u64 {
        clamp_count(self.monthly_quests_used)
    }

    pub fn purchased_quest_credits(&self) -> u64 {
        clamp_count(self.quest_credits_purchased)
    }

    pub fn purchased_admin_seats(&self) -> u64 {
        clamp_count(self.admin_seats_purchased)
    }

    pub fn admin_count(&self) -> u64 {
        clamp_count(self.current_admin_count)
    }

    /// Whether the tier record grants quest creation.
    pub fn tier_grants_quests(&self) -> bool {
        self.tier_info.as_ref().is_some_and(|t| t.can_create_quests)
    }

    /// Raw seat limit: tier record first, then the legacy flat field.
    pub fn raw_admin_seat_limit(&self) -> Option<i64> {
        match &self.tier_info {
            Some(info) => info.admin_seat_limit.or(self.admin_seat_limit),
            None => self.admin_seat_limit,
        }
    }

    /// Copy of this snapshot with only the AI point balance replaced.
    pub fn with_ai_points(&self, ai_points: i64) -> Self {
        Self {
            ai_points,
            ..self.clone()
        }
    }
}
