//! Entitlement resolution for business accounts.
//!
//! This crate provides:
//! - [`EntitlementResolver`]: pure permission, AI point, quest credit and
//!   admin seat checks over a [`BusinessSnapshot`](quest_models::BusinessSnapshot)
//! - Navigation gating into enabled / locked / disabled states
//! - The sidebar decision table built on top of both

pub mod gating;
pub mod resolver;
pub mod sidebar;

pub use gating::{evaluate, ActionRequirements, NavState, PurchasePage};
pub use resolver::{
    EntitlementResolver, EntitlementSummary, DEFAULT_ADMIN_SEAT_LIMIT, DEFAULT_POINTS_NEEDED,
};
pub use sidebar::{navigation, sidebar, Audience, NavItem, SidebarEntry};
