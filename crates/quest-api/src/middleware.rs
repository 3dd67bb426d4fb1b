//! API middleware.

use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderName, HeaderValue, Method, Request, Response, StatusCode};
use axum::middleware::Next;
use axum::response::IntoResponse;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn, Span};
use uuid::Uuid;

use crate::metrics;

/// Tracked client IPs above which idle entries are pruned.
const MAX_TRACKED_CLIENTS: usize = 10_000;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-client-IP rate limiter.
#[derive(Clone)]
pub struct ClientRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
}

impl ClientRateLimiter {
    /// Allow `requests_per_second` per IP. Zero is treated as one.
    pub fn new(requests_per_second: u32) -> Self {
        let rps = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: Arc::new(RateLimiter::keyed(Quota::per_second(rps))),
        }
    }

    /// Take one request from `ip`'s budget.
    pub fn check(&self, ip: IpAddr) -> bool {
        if self.limiter.len() > MAX_TRACKED_CLIENTS {
            self.limiter.retain_recent();
            self.limiter.shrink_to_fit();
        }
        self.limiter.check_key(&ip).is_ok()
    }
}

/// Create CORS layer.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let max_age = Duration::from_secs(600);

    if origins.iter().any(|o| o == "*") {
        // Wildcard origin: no credentials allowed
        CorsLayer::new()
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_origin(Any)
            .max_age(max_age)
    } else {
        // tower-http rejects credentials combined with wildcard headers
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .allow_credentials(true)
            .allow_origin(origins)
            .max_age(max_age)
    }
}

/// Security headers middleware.
pub async fn security_headers(request: Request<Body>, next: Next) -> Response<Body> {
    const HEADERS: &[(&str, &str)] = &[
        ("x-content-type-options", "nosniff"),
        ("x-frame-options", "DENY"),
        ("strict-transport-security", "max-age=31536000; includeSubDomains"),
        ("referrer-policy", "strict-origin-when-cross-origin"),
        ("cross-origin-resource-policy", "same-origin"),
        ("cache-control", "no-store"),
    ];

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    for &(name, value) in HEADERS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    response
}

/// Request ID middleware.
pub async fn request_id(mut request: Request<Body>, next: Next) -> Response<Body> {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty() && s.len() <= 128)
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request.extensions_mut().insert(request_id.clone());
    Span::current().record("request_id", request_id.as_str());

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Request logging middleware.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    // Skip health check logging
    if !matches!(uri.path(), "/health" | "/healthz" | "/metrics") {
        info!(
            method = %method,
            uri = %uri,
            status = %response.status(),
            duration_ms = %start.elapsed().as_millis(),
            "Request completed"
        );
    }

    response
}

/// Rate limiting middleware keyed on client IP.
pub async fn rate_limit_middleware(
    State(limiter): State<ClientRateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    if let Some(ip) = extract_client_ip(&request) {
        if !limiter.check(ip) {
            warn!(ip = %ip, "Rate limit exceeded");
            metrics::record_rate_limit_hit(request.uri().path());
            return (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, "1")],
                "Rate limit exceeded. Please try again later.",
            )
                .into_response();
        }
    }

    next.run(request).await
}

/// Client IP from proxy headers, falling back to the socket address.
fn extract_client_ip(request: &Request<Body>) -> Option<IpAddr> {
    let headers = request.headers();

    let forwarded: Option<IpAddr> = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|ip| ip.trim().parse().ok());

    let real_ip = || -> Option<IpAddr> {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|ip| ip.trim().parse().ok())
    };

    forwarded.or_else(real_ip).or_else(|| {
        request
            .extensions()
            .get::<ConnectInfo<std::net::SocketAddr>>()
            .map(|ci| ci.0.ip())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_is_per_ip() {
        let limiter = ClientRateLimiter::new(1);
        let a: IpAddr = "10.0.0.1".parse().unwrap();
        let b: IpAddr = "10.0.0.2".parse().unwrap();

        assert!(limiter.check(a));
        assert!(!limiter.check(a));
        assert!(limiter.check(b));
    }

    #[test]
    fn test_extract_client_ip_prefers_forwarded_for() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .header("x-real-ip", "198.51.100.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_client_ip(&request), Some("203.0.113.7".parse().unwrap()));

        let request = Request::builder()
            .header("x-real-ip", "198.51.100.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_client_ip(&request), Some("198.51.100.2".parse().unwrap()));

        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(extract_client_ip(&request), None);
    }
}
