//! API routes.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{evaluate_entitlements, get_business_entitlements, get_navigation, health};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    ClientRateLimiter,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let rate_limiter = ClientRateLimiter::new(state.config.rate_limit_rps);

    let api_routes = Router::new()
        .route("/entitlements/evaluate", post(evaluate_entitlements))
        .route("/businesses/:business_id/entitlements", get(get_business_entitlements))
        .route("/businesses/:business_id/navigation", get(get_navigation))
        .layer(middleware::from_fn_with_state(rate_limiter, rate_limit_middleware));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health));

    let metrics_routes = match metrics_handle {
        Some(handle) => {
            Router::new().route("/metrics", get(move || async move { handle.render() }))
        }
        None => Router::new(),
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
