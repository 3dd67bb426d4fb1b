//! Canonical permission keys.
//!
//! Permission flags arrive from the backend as a loosely keyed map
//! (`CAN_USE_AI_BUILDER`, `can_use_ai_builder`, `USE_AI_BUILDER`, ...).
//! [`PermissionKey`] is the single canonical spelling; [`bare_key`] reduces
//! any accepted spelling to the upper-case key without its `CAN_` prefix.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix carried by canonical permission keys.
pub const CAN_PREFIX: &str = "CAN_";

/// Known per-business feature permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum PermissionKey {
    #[serde(rename = "CAN_USE_AI_BUILDER")]
    UseAiBuilder,
    #[serde(rename = "CAN_CREATE_SURVEYS")]
    CreateSurveys,
    #[serde(rename = "CAN_CREATE_QUESTS")]
    CreateQuests,
    #[serde(rename = "CAN_VIEW_ANALYTICS")]
    ViewAnalytics,
    #[serde(rename = "CAN_GENERATE_AI_INSIGHTS")]
    GenerateAiInsights,
    #[serde(rename = "CAN_EXPORT_DATA")]
    ExportData,
    #[serde(rename = "CAN_MANAGE_ADMINS")]
    ManageAdmins,
    #[serde(rename = "CAN_MANAGE_MARKETPLACE")]
    ManageMarketplace,
    #[serde(rename = "CAN_CREATE_BADGES")]
    CreateBadges,
}

impl PermissionKey {
    pub const ALL: &'static [PermissionKey] = &[
        PermissionKey::UseAiBuilder,
        PermissionKey::CreateSurveys,
        PermissionKey::CreateQuests,
        PermissionKey::ViewAnalytics,
        PermissionKey::GenerateAiInsights,
        PermissionKey::ExportData,
        PermissionKey::ManageAdmins,
        PermissionKey::ManageMarketplace,
        PermissionKey::CreateBadges,
    ];

    /// Canonical key, as stored by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionKey::UseAiBuilder => "CAN_USE_AI_BUILDER",
            PermissionKey::CreateSurveys => "CAN_CREATE_SURVEYS",
            PermissionKey::CreateQuests => "CAN_CREATE_QUESTS",
            PermissionKey::ViewAnalytics => "CAN_VIEW_ANALYTICS",
            PermissionKey::GenerateAiInsights => "CAN_GENERATE_AI_INSIGHTS",
            PermissionKey::ExportData => "CAN_EXPORT_DATA",
            PermissionKey::ManageAdmins => "CAN_MANAGE_ADMINS",
            PermissionKey::ManageMarketplace => "CAN_MANAGE_MARKETPLACE",
            PermissionKey::CreateBadges => "CAN_CREATE_BADGES",
        }
    }

    /// Key without the `CAN_` prefix.
    pub fn bare(&self) -> &'static str {
        &self.as_str()[CAN_PREFIX.len()..]
    }

    /// Accept any tolerated spelling of a known key.
    pub fn parse(s: &str) -> Option<Self> {
        let bare = bare_key(s);
        PermissionKey::ALL.iter().copied().find(|k| k.bare() == bare)
    }

    /// Grant applied when neither the snapshot nor its permission map says anything.
    ///
    /// The AI builder predates per-business permissions, so businesses without
    /// an explicit flag keep access to it.
    pub fn granted_by_default(&self) -> bool {
        matches!(self, PermissionKey::UseAiBuilder)
    }
}

impl fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PermissionKey {
    type Err = PermissionKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PermissionKey::parse(s).ok_or_else(|| PermissionKeyParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("Unknown permission key: {0}")]
pub struct PermissionKeyParseError(String);

/// Strip a `can_` prefix (any case) and upper-case the rest.
pub fn bare_key(key: &str) -> String {
    let trimmed = key.trim();
    let stripped = match trimmed.get(..CAN_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(CAN_PREFIX) => &trimmed[CAN_PREFIX.len()..],
        _ => trimmed,
    };
    stripped.to_ascii_uppercase()
}

/// Default grant for a raw key that is absent from the permission map.
pub fn default_grant(key: &str) -> bool {
    PermissionKey::parse(key).is_some_and(|k| k.granted_by_default())
}
