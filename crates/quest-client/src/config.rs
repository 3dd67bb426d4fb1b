//! Client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{ClientError, ClientResult};

/// Business API client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Dashboard summary refresh interval
    pub dashboard_poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            dashboard_poll_interval: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        let defaults = Self::default();

        let base_url = std::env::var("QUEST_API_BASE_URL").unwrap_or(defaults.base_url);

        Ok(Self {
            base_url: normalize_base_url(&base_url)?,
            timeout: Duration::from_secs(env_secs("QUEST_API_TIMEOUT_SECS").unwrap_or(30)),
            connect_timeout: Duration::from_secs(
                env_secs("QUEST_API_CONNECT_TIMEOUT_SECS").unwrap_or(5),
            ),
            dashboard_poll_interval: Duration::from_secs(
                env_secs("DASHBOARD_POLL_SECS").filter(|s| *s > 0).unwrap_or(30),
            ),
        })
    }

    /// Config pointing at `base_url` with default timeouts.
    pub fn with_base_url(base_url: &str) -> ClientResult<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            ..Self::default()
        })
    }
}

fn env_secs(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

/// Validate an http(s) base URL and strip any trailing slash.
fn normalize_base_url(raw: &str) -> ClientResult<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ClientError::config("QUEST_API_BASE_URL cannot be empty"));
    }

    let url = Url::parse(raw)
        .map_err(|e| ClientError::config(format!("Invalid base URL '{}': {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::config(format!("Unsupported scheme '{}'", url.scheme())));
    }

    Ok(raw.trim_end_matches('/').to_string())
}
