//! Business API client and session-scoped entitlement state.
//!
//! - [`Session`] / [`SessionManager`]: the logged-in caller
//! - [`HttpBusinessApi`]: REST client behind the [`BusinessApi`] trait
//! - [`BusinessContext`]: snapshot load, refresh, AI point spend and teardown
//! - [`DashboardPoller`]: fixed-interval dashboard summary refresh

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod metrics;
pub mod poller;
pub mod session;

pub use api::{BusinessApi, HttpBusinessApi};
pub use config::ClientConfig;
pub use context::{BusinessContext, ContextStatus, Entitlements, LOAD_FAILED_MESSAGE};
pub use error::{ClientError, ClientResult};
pub use poller::DashboardPoller;
pub use session::{Session, SessionManager};
