//! Sidebar navigation catalog.
//!
//! The decision table behind the admin sidebar: which entries a role sees and
//! what each entry requires. [`sidebar`] runs every visible entry through
//! [`evaluate`](crate::gating::evaluate).

use std::sync::LazyLock;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use quest_models::{PermissionKey, Role};

use crate::gating::{evaluate, ActionRequirements, NavState};
use crate::resolver::EntitlementResolver;

/// Who an entry is shown to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    /// Platform administration pages.
    SuperAdmin,
    /// Pages scoped to the caller's own business.
    Business,
    Everyone,
}

impl Audience {
    pub fn includes(&self, role: &Role) -> bool {
        match self {
            Audience::SuperAdmin => role.is_super_admin(),
            Audience::Business => role.is_business_user(),
            Audience::Everyone => true,
        }
    }
}

/// One sidebar entry.
#[derive(Debug, Clone)]
pub struct NavItem {
    pub id: &'static str,
    pub label: &'static str,
    pub path: &'static str,
    pub audience: Audience,
    pub requirements: ActionRequirements,
}

impl NavItem {
    fn new(id: &'static str, label: &'static str, path: &'static str, audience: Audience) -> Self {
        Self {
            id,
            label,
            path,
            audience,
            requirements: ActionRequirements::default(),
        }
    }

    fn requires(mut self, requirements: ActionRequirements) -> Self {
        self.requirements = requirements;
        self
    }
}

static NAVIGATION: LazyLock<Vec<NavItem>> = LazyLock::new(|| {
    vec![
        // Platform administration
        NavItem::new("admin-businesses", "Businesses", "/admin/businesses", Audience::SuperAdmin),
        NavItem::new("admin-tiers", "Tiers", "/admin/tiers", Audience::SuperAdmin),
        NavItem::new("admin-badges", "Badges", "/admin/badges", Audience::SuperAdmin),
        NavItem::new("admin-quests", "All Quests", "/admin/quests", Audience::SuperAdmin),
        NavItem::new(
            "admin-marketplace",
            "Marketplace Items",
            "/admin/marketplace",
            Audience::SuperAdmin,
        ),
        NavItem::new(
            "admin-ai-points-packages",
            "AI Points Packages",
            "/admin/ai-points-packages",
            Audience::SuperAdmin,
        ),
        // Business workspace
        NavItem::new("dashboard", "Dashboard", "/business/dashboard", Audience::Business),
        NavItem::new("quests", "Quests", "/business/quests", Audience::Business),
        NavItem::new("create-quest", "Create Quest", "/business/quests/new", Audience::Business)
            .requires(ActionRequirements::new().quests()),
        NavItem::new("surveys", "Surveys", "/business/surveys", Audience::Business)
            .requires(ActionRequirements::new().permission(PermissionKey::CreateSurveys.as_str())),
        NavItem::new("ai-builder", "AI Survey Builder", "/business/ai-builder", Audience::Business)
            .requires(
                ActionRequirements::new()
                    .permission(PermissionKey::UseAiBuilder.as_str())
                    .ai(1),
            ),
        NavItem::new("ai-insights", "AI Insights", "/business/insights", Audience::Business)
            .requires(
                ActionRequirements::new()
                    .permission(PermissionKey::GenerateAiInsights.as_str())
                    .ai(1),
            ),
        NavItem::new("analytics", "Analytics", "/business/analytics", Audience::Business).requires(
            ActionRequirements::new().any_permission([
                PermissionKey::ViewAnalytics.as_str(),
                PermissionKey::ExportData.as_str(),
            ]),
        ),
        NavItem::new("marketplace", "Marketplace", "/business/marketplace", Audience::Business)
            .requires(
                ActionRequirements::new().permission(PermissionKey::ManageMarketplace.as_str()),
            ),
        NavItem::new("add-admin", "Add Admin", "/business/admins/new", Audience::Business)
            .requires(ActionRequirements::new().admin_seats()),
        NavItem::new("purchase", "Purchase Credits", "/business/purchase", Audience::Business),
        // Shared
        NavItem::new("settings", "Settings", "/settings", Audience::Everyone),
    ]
});

/// The full catalog, regardless of role.
pub fn navigation() -> &'static [NavItem] {
    &NAVIGATION
}

/// A sidebar entry with its computed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SidebarEntry {
    pub id: String,
    pub label: String,
    pub path: String,
    /// Where a click goes: the purchase page when locked, the entry otherwise.
    pub href: String,
    #[serde(flatten)]
    pub state: NavState,
}

/// Entries visible to the resolver's role, in catalog order.
pub fn sidebar(resolver: &EntitlementResolver<'_>) -> Vec<SidebarEntry> {
    NAVIGATION
        .iter()
        .filter(|item| item.audience.includes(resolver.role()))
        .map(|item| {
            let state = evaluate(resolver, &item.requirements);
            SidebarEntry {
                id: item.id.to_string(),
                label: item.label.to_string(),
                path: item.path.to_string(),
                href: state.redirect_path().unwrap_or(item.path).to_string(),
                state,
            }
        })
        .collect()
}
