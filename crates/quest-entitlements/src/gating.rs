//! Navigation gating.
//!
//! Maps resolver answers onto the three states a navigable action can be in:
//! enabled, locked (clickable but redirected to a purchase page), or disabled
//! (the permission is categorically absent and cannot be bought).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::resolver::{EntitlementResolver, DEFAULT_POINTS_NEEDED};

/// Purchase flows a locked action can redirect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PurchasePage {
    QuestCredits,
    AdminSeats,
    AiPoints,
}

impl PurchasePage {
    /// Route of the purchase page.
    pub fn path(&self) -> &'static str {
        match self {
            PurchasePage::QuestCredits => "/business/purchase/quest-credits",
            PurchasePage::AdminSeats => "/business/purchase/admin-seats",
            PurchasePage::AiPoints => "/business/purchase/ai-points",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PurchasePage::QuestCredits => "quest_credits",
            PurchasePage::AdminSeats => "admin_seats",
            PurchasePage::AiPoints => "ai_points",
        }
    }
}

/// UI state of a gated action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NavState {
    Enabled,
    Locked { redirect: PurchasePage },
    Disabled,
}

impl NavState {
    pub fn is_enabled(&self) -> bool {
        matches!(self, NavState::Enabled)
    }

    /// Enabled and locked actions both react to clicks.
    pub fn is_interactive(&self) -> bool {
        !matches!(self, NavState::Disabled)
    }

    /// Purchase route a click should go to instead of the feature.
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self {
            NavState::Locked { redirect } => Some(redirect.path()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NavState::Enabled => "enabled",
            NavState::Locked { .. } => "locked",
            NavState::Disabled => "disabled",
        }
    }
}

/// What an action needs before it can run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ActionRequirements {
    #[serde(default)]
    pub requires_quests: bool,
    #[serde(default)]
    pub requires_admin_seats: bool,
    #[serde(default)]
    pub requires_ai: bool,
    /// AI points the action costs. Defaults to one point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_points: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_key: Option<String>,
    /// Alternative keys; holding any one of them is enough.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permission_keys: Vec<String>,
}

impl ActionRequirements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quests(mut self) -> Self {
        self.requires_quests = true;
        self
    }

    pub fn admin_seats(mut self) -> Self {
        self.requires_admin_seats = true;
        self
    }

    pub fn ai(mut self, min_points: u64) -> Self {
        self.requires_ai = true;
        self.min_points = Some(min_points);
        self
    }

    pub fn permission(mut self, key: impl Into<String>) -> Self {
        self.permission_key = Some(key.into());
        self
    }

    pub fn any_permission<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permission_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    fn named_keys(&self) -> impl Iterator<Item = &str> {
        self.permission_key
            .iter()
            .chain(self.permission_keys.iter())
            .map(String::as_str)
    }

    fn names_permission(&self) -> bool {
        self.permission_key.is_some() || !self.permission_keys.is_empty()
    }
}

/// Decide the state of an action.
///
/// Rules apply in order: missing permission disables; exhausted quest
/// credits, full admin seats, then insufficient AI points lock with the
/// matching purchase page; anything else is enabled.
pub fn evaluate(resolver: &EntitlementResolver<'_>, requirements: &ActionRequirements) -> NavState {
    if requirements.names_permission() && !resolver.role().is_super_admin() {
        let permitted = requirements.named_keys().any(|key| resolver.has_permission(key));
        if !permitted {
            return NavState::Disabled;
        }
    }

    // Redirect only once credits are gone; any remaining credit keeps the action live.
    if requirements.requires_quests
        && !resolver.can_create_quests()
        && resolver.available_quest_credits().is_exhausted()
    {
        return NavState::Locked {
            redirect: PurchasePage::QuestCredits,
        };
    }

    if requirements.requires_admin_seats && !resolver.can_add_admin_seat() {
        return NavState::Locked {
            redirect: PurchasePage::AdminSeats,
        };
    }

    if requirements.requires_ai {
        let points = requirements.min_points.unwrap_or(DEFAULT_POINTS_NEEDED);
        if !resolver.can_use_ai_feature(None, points) {
            return NavState::Locked {
                redirect: PurchasePage::AiPoints,
            };
        }
    }

    NavState::Enabled
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use quest_models::{BusinessSnapshot, Role, TierInfo};

    fn snapshot() -> BusinessSnapshot {
        BusinessSnapshot {
            tier_info: Some(TierInfo {
                can_create_quests: true,
                admin_seat_limit: Some(2),
                ..Default::default()
            }),
            monthly_quest_limit: 5,
            monthly_quests_used: 1,
            ai_points: 10,
            current_admin_count: 1,
            permissions: HashMap::from([
                ("CAN_EXPORT_DATA".to_string(), false),
                ("CAN_VIEW_ANALYTICS".to_string(), true),
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn test_everything_available_is_enabled() {
        let role = Role::BusinessAdmin;
        let snapshot = snapshot();
        let resolver = EntitlementResolver::new(Some(&snapshot), &role);

        let req = ActionRequirements::new().quests().admin_seats().ai(5);
        assert_eq!(evaluate(&resolver, &req), NavState::Enabled);
        assert_eq!(evaluate(&resolver, &ActionRequirements::new()), NavState::Enabled);
    }

    #[test]
    fn test_missing_permission_disables() {
        let role = Role::BusinessAdmin;
        let snapshot = snapshot();
        let resolver = EntitlementResolver::new(Some(&snapshot), &role);

        let req = ActionRequirements::new().permission("CAN_EXPORT_DATA").quests();
        let state = evaluate(&resolver, &req);
        assert_eq!(state, NavState::Disabled);
        assert!(!state.is_interactive());
        assert_eq!(state.redirect_path(), None);
    }

    #[test]
    fn test_any_permission_is_enough() {
        let role = Role::BusinessAdmin;
        let snapshot = snapshot();
        let resolver = EntitlementResolver::new(Some(&snapshot), &role);

        let req = ActionRequirements::new().any_permission(["CAN_EXPORT_DATA", "view_analytics"]);
        assert_eq!(evaluate(&resolver, &req), NavState::Enabled);

        let req =
            ActionRequirements::new().any_permission(["CAN_EXPORT_DATA", "CAN_MANAGE_ADMINS"]);
        assert_eq!(evaluate(&resolver, &req), NavState::Disabled);
    }

    #[test]
    fn test_permission_takes_precedence_over_lock() {
        let role = Role::BusinessAdmin;
        let snapshot = BusinessSnapshot {
            monthly_quests_used: 5,
            ..snapshot()
        };
        let resolver = EntitlementResolver::new(Some(&snapshot), &role);

        let req = ActionRequirements::new().permission("CAN_EXPORT_DATA").quests();
        assert_eq!(evaluate(&resolver, &req), NavState::Disabled);
    }

    #[test]
    fn test_exhausted_quests_lock() {
        let role = Role::BusinessAdmin;
        let snapshot = BusinessSnapshot {
            monthly_quests_used: 5,
            ..snapshot()
        };
        let resolver = EntitlementResolver::new(Some(&snapshot), &role);

        let state = evaluate(&resolver, &ActionRequirements::new().quests());
        assert_eq!(
            state,
            NavState::Locked {
                redirect: PurchasePage::QuestCredits
            }
        );
        assert!(state.is_interactive());
        assert_eq!(state.redirect_path(), Some("/business/purchase/quest-credits"));
    }

    #[test]
    fn test_purchased_credits_keep_quests_enabled() {
        let role = Role::BusinessAdmin;
        let snapshot = BusinessSnapshot {
            monthly_quests_used: 5,
            quest_credits_purchased: 1,
            ..snapshot()
        };
        let resolver = EntitlementResolver::new(Some(&snapshot), &role);
        assert_eq!(evaluate(&resolver, &ActionRequirements::new().quests()), NavState::Enabled);
    }

    #[test]
    fn test_full_seats_lock() {
        let role = Role::BusinessAdmin;
        let snapshot = BusinessSnapshot {
            current_admin_count: 2,
            ..snapshot()
        };
        let resolver = EntitlementResolver::new(Some(&snapshot), &role);

        let state = evaluate(&resolver, &ActionRequirements::new().admin_seats());
        assert_eq!(state.redirect_path(), Some(PurchasePage::AdminSeats.path()));
    }

    #[test]
    fn test_insufficient_points_lock() {
        let role = Role::BusinessAdmin;
        let snapshot = snapshot();
        let resolver = EntitlementResolver::new(Some(&snapshot), &role);

        assert_eq!(
            evaluate(&resolver, &ActionRequirements::new().ai(11)),
            NavState::Locked {
                redirect: PurchasePage::AiPoints
            }
        );

        let broke = BusinessSnapshot {
            ai_points: 0,
            ..snapshot
        };
        let resolver = EntitlementResolver::new(Some(&broke), &role);
        let req = ActionRequirements {
            requires_ai: true,
            ..Default::default()
        };
        assert_eq!(evaluate(&resolver, &req).as_str(), "locked");
    }

    #[test]
    fn test_lock_order_quests_before_seats() {
        let role = Role::BusinessAdmin;
        let snapshot = BusinessSnapshot {
            monthly_quests_used: 5,
            current_admin_count: 2,
            ai_points: 0,
            ..snapshot()
        };
        let resolver = EntitlementResolver::new(Some(&snapshot), &role);

        let req = ActionRequirements::new().quests().admin_seats().ai(1);
        assert_eq!(
            evaluate(&resolver, &req),
            NavState::Locked {
                redirect: PurchasePage::QuestCredits
            }
        );
    }

    #[test]
    fn test_super_admin_is_never_gated() {
        let role = Role::SuperAdmin;
        let resolver = EntitlementResolver::new(None, &role);

        let req = ActionRequirements::new()
            .permission("CAN_EXPORT_DATA")
            .quests()
            .admin_seats()
            .ai(1_000);
        assert_eq!(evaluate(&resolver, &req), NavState::Enabled);
    }

    #[test]
    fn test_unloaded_snapshot_locks_quests() {
        let role = Role::BusinessAdmin;
        let resolver = EntitlementResolver::new(None, &role);

        assert_eq!(
            evaluate(&resolver, &ActionRequirements::new().quests()).redirect_path(),
            Some("/business/purchase/quest-credits")
        );
        assert_eq!(
            evaluate(&resolver, &ActionRequirements::new().permission("CAN_USE_AI_BUILDER")),
            NavState::Enabled
        );
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_value(NavState::Locked {
            redirect: PurchasePage::AiPoints,
        })
        .unwrap();
        assert_eq!(json["state"], "locked");
        assert_eq!(json["redirect"], "ai_points");

        let req: ActionRequirements = serde_json::from_str(
            r#"{"requires_ai": true, "permission_keys": ["CAN_USE_AI_BUILDER"]}"#,
        )
        .unwrap();
        assert!(req.requires_ai);
        assert_eq!(req.min_points, None);
        assert_eq!(req.permission_keys.len(), 1);
    }
}
