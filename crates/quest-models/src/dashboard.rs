//! Dashboard summary polled by the business overview page.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Headline counters for a business dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DashboardSummary {
    #[serde(default)]
    pub active_quests: u64,
    #[serde(default)]
    pub active_surveys: u64,
    #[serde(default)]
    pub total_participants: u64,
    #[serde(default)]
    pub ai_points: i64,
    #[serde(default)]
    pub monthly_quests_used: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

/// Result of spending AI points on a feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AiPointsSpend {
    /// Balance after the spend, when the backend reports it.
    #[serde(default, alias = "remaining_points", skip_serializing_if = "Option::is_none")]
    pub ai_points: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_decodes_with_timestamp() {
        let summary: DashboardSummary = serde_json::from_str(
            r#"{
                "active_quests": 3,
                "total_participants": 120,
                "generated_at": "2026-01-05T10:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(summary.active_quests, 3);
        assert_eq!(summary.total_participants, 120);
        assert!(summary.generated_at.is_some());
    }

    #[test]
    fn test_spend_accepts_alias() {
        let spend: AiPointsSpend = serde_json::from_str(r#"{"remaining_points": 4}"#).unwrap();
        assert_eq!(spend.ai_points, Some(4));

        let spend: AiPointsSpend = serde_json::from_str("{}").unwrap();
        assert_eq!(spend.ai_points, None);
    }
}
