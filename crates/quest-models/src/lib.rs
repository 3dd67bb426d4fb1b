//! Shared data models for the Quest Admin platform.
//!
//! This crate provides Serde-serializable types for:
//! - Business snapshots (tier, permissions, usage counters)
//! - Subscription tiers and tier capability records
//! - Caller roles and canonical permission keys
//! - Finite-or-unlimited quotas

pub mod dashboard;
pub mod permission;
pub mod quota;
pub mod role;
pub mod snapshot;
pub mod tier;

// Re-export common types
pub use dashboard::{AiPointsSpend, DashboardSummary};
pub use permission::{bare_key, default_grant, PermissionKey, PermissionKeyParseError, CAN_PREFIX};
pub use quota::{clamp_count, Quota};
pub use role::Role;
pub use snapshot::BusinessSnapshot;
pub use tier::{Tier, TierInfo, UNLIMITED};
