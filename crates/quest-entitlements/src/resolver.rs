//! Entitlement resolution over a business snapshot.
//!
//! Every answer is a pure function of `(snapshot, role)`. Nothing here fails:
//! a missing snapshot or missing field degrades to the conservative answer
//! (`false` / zero), because callers render before business data has loaded.
//! `super_admin` short-circuits every check to "allowed" / unlimited.

use std::collections::{BTreeMap, HashMap};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use quest_models::{
    bare_key, default_grant, BusinessSnapshot, PermissionKey, Quota, Role, Tier, CAN_PREFIX,
};

/// Points assumed when a caller does not say how many an AI feature costs.
pub const DEFAULT_POINTS_NEEDED: u64 = 1;

/// Seats granted when neither the tier record nor the legacy field sets a limit.
pub const DEFAULT_ADMIN_SEAT_LIMIT: i64 = 1;

/// Answers gating questions for one business and one caller role.
#[derive(Debug, Clone, Copy)]
pub struct EntitlementResolver<'a> {
    snapshot: Option<&'a BusinessSnapshot>,
    role: &'a Role,
}

impl<'a> EntitlementResolver<'a> {
    pub fn new(snapshot: Option<&'a BusinessSnapshot>, role: &'a Role) -> Self {
        Self { snapshot, role }
    }

    pub fn role(&self) -> &'a Role {
        self.role
    }

    pub fn snapshot(&self) -> Option<&'a BusinessSnapshot> {
        self.snapshot
    }

    fn bypass(&self) -> bool {
        self.role.is_super_admin()
    }

    /// Whether the business holds the permission named by `key`.
    ///
    /// Accepts any spelling of the key: exact match first, then the upper-case
    /// bare key, then the `CAN_`-prefixed key.
    pub fn has_permission(&self, key: &str) -> bool {
        if self.bypass() {
            return true;
        }

        match self.snapshot {
            Some(snapshot) => lookup_permission(&snapshot.permissions, key)
                .unwrap_or_else(|| default_grant(key)),
            None => default_grant(key),
        }
    }

    pub fn has_key(&self, key: PermissionKey) -> bool {
        self.has_permission(key.as_str())
    }

    /// Whether the AI point balance covers `points_needed`.
    pub fn has_ai_points(&self, points_needed: u64) -> bool {
        if self.bypass() {
            return true;
        }
        self.ai_points_balance() >= points_needed
    }

    /// Permission (when named) and AI point balance together.
    pub fn can_use_ai_feature(&self, permission_key: Option<&str>, points_needed: u64) -> bool {
        if self.bypass() {
            return true;
        }

        match permission_key {
            Some(key) => self.has_permission(key) && self.has_ai_points(points_needed),
            None => self.has_ai_points(points_needed),
        }
    }

    fn ai_points_balance(&self) -> u64 {
        self.snapshot
            .map(|s| quest_models::clamp_count(s.ai_points))
            .unwrap_or(0)
    }

    /// AI point balance as a quota. Unlimited for super admins.
    pub fn ai_points(&self) -> Quota {
        if self.bypass() {
            Quota::Unlimited
        } else {
            Quota::Limited(self.ai_points_balance())
        }
    }

    /// Tier grants quests, or the business has a monthly quest allowance.
    pub fn has_quest_capability(&self) -> bool {
        if self.bypass() {
            return true;
        }

        self.snapshot.is_some_and(|s| {
            s.tier_grants_quests() || s.monthly_quota().is_unlimited() || s.monthly_quest_limit > 0
        })
    }

    /// Quests left in this month's allowance. Never negative.
    pub fn remaining_monthly_quests(&self) -> Quota {
        if self.bypass() {
            return Quota::Unlimited;
        }

        match self.snapshot {
            Some(s) if self.has_quest_capability() => {
                s.monthly_quota().remaining_after(s.quests_used())
            }
            _ => Quota::ZERO,
        }
    }

    /// Monthly remainder plus purchased credits.
    ///
    /// Purchased credits count even when the tier grants no quest capability.
    pub fn available_quest_credits(&self) -> Quota {
        if self.bypass() {
            return Quota::Unlimited;
        }

        let Some(snapshot) = self.snapshot else {
            return Quota::ZERO;
        };

        let purchased = snapshot.purchased_quest_credits();
        if self.has_quest_capability() {
            self.remaining_monthly_quests().saturating_add(purchased)
        } else {
            Quota::Limited(purchased)
        }
    }

    pub fn can_create_quests(&self) -> bool {
        if self.bypass() {
            return true;
        }

        let Some(snapshot) = self.snapshot else {
            return false;
        };

        if !self.has_quest_capability() && snapshot.purchased_quest_credits() == 0 {
            return false;
        }

        self.available_quest_credits() > Quota::ZERO
    }

    /// Tier seats plus purchased seat add-ons.
    pub fn total_admin_seats(&self) -> Quota {
        if self.bypass() {
            return Quota::Unlimited;
        }

        let tier_limit = self
            .snapshot
            .and_then(|s| s.raw_admin_seat_limit())
            .unwrap_or(DEFAULT_ADMIN_SEAT_LIMIT);
        let purchased = self.snapshot.map(|s| s.purchased_admin_seats()).unwrap_or(0);

        Quota::from_limit(tier_limit).saturating_add(purchased)
    }

    pub fn used_admin_seats(&self) -> u64 {
        self.snapshot.map(|s| s.admin_count()).unwrap_or(0)
    }

    pub fn can_add_admin_seat(&self) -> bool {
        if self.bypass() {
            return true;
        }
        self.total_admin_seats().admits(self.used_admin_seats())
    }

    /// Every resolved value in one serializable record.
    pub fn summary(&self) -> EntitlementSummary {
        let permissions = PermissionKey::ALL
            .iter()
            .map(|key| (key.as_str().to_string(), self.has_key(*key)))
            .collect();

        EntitlementSummary {
            role: self.role.clone(),
            tier: self.snapshot.map(|s| s.tier),
            loaded: self.snapshot.is_some(),
            ai_points: self.ai_points(),
            quest_credits: self.available_quest_credits(),
            monthly_quests_remaining: self.remaining_monthly_quests(),
            can_create_quests: self.can_create_quests(),
            admin_seats_total: self.total_admin_seats(),
            admin_seats_used: self.used_admin_seats(),
            can_add_admin_seat: self.can_add_admin_seat(),
            days_until_reset: self.snapshot.map(|s| s.days_until_reset),
            permissions,
        }
    }
}

/// Look a key up under each tolerated spelling.
fn lookup_permission(permissions: &HashMap<String, bool>, key: &str) -> Option<bool> {
    if let Some(granted) = permissions.get(key) {
        return Some(*granted);
    }

    let bare = bare_key(key);
    permissions
        .get(&bare)
        .or_else(|| permissions.get(&format!("{}{}", CAN_PREFIX, bare)))
        .copied()
}

/// Resolved entitlements for one business and role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntitlementSummary {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    /// False while business data has not been loaded.
    pub loaded: bool,
    pub ai_points: Quota,
    pub quest_credits: Quota,
    pub monthly_quests_remaining: Quota,
    pub can_create_quests: bool,
    pub admin_seats_total: Quota,
    pub admin_seats_used: u64,
    pub can_add_admin_seat: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_reset: Option<i64>,
    /// Canonical permission key to resolved grant.
    pub permissions: BTreeMap<String, bool>,
}
