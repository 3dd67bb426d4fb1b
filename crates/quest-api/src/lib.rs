//! Axum HTTP API server.
//!
//! This crate provides:
//! - Stateless entitlement evaluation for a supplied snapshot
//! - Per-business entitlement summaries and sidebar navigation
//! - HS256 bearer token verification
//! - Rate limiting, security headers and Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
