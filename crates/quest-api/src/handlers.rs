//! HTTP handlers.

pub mod entitlements;
pub mod health;
pub mod navigation;

pub use entitlements::{evaluate_entitlements, get_business_entitlements};
pub use health::health;
pub use navigation::get_navigation;
