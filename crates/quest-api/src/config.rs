//! API configuration.

use anyhow::{bail, Context};
use tracing::warn;

use quest_client::ClientConfig;

/// Signing secret used when `JWT_SECRET` is unset outside production.
const DEV_JWT_SECRET: &str = "quest-dev-secret";

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Rate limit requests per second, per client IP
    pub rate_limit_rps: u32,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// HS256 secret for bearer tokens
    pub jwt_secret: String,
    /// Serve Prometheus metrics at /metrics
    pub metrics_enabled: bool,
    /// Backend the business snapshots are fetched from
    pub upstream: ClientConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 10,
            max_body_size: 1024 * 1024, // 1MB
            environment: "development".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            metrics_enabled: true,
            upstream: ClientConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let environment = std::env::var("ENVIRONMENT").unwrap_or(defaults.environment);

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment.eq_ignore_ascii_case("production") => {
                bail!("JWT_SECRET must be set in production")
            }
            _ => {
                warn!("JWT_SECRET not set, using development secret");
                defaults.jwt_secret
            }
        };

        Ok(Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            rate_limit_rps: std::env::var("RATE_LIMIT_RPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.rate_limit_rps),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            environment,
            jwt_secret,
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.metrics_enabled),
            upstream: ClientConfig::from_env().context("invalid upstream configuration")?,
        })
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}
