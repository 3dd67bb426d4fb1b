//! Application state.

use std::sync::Arc;

use quest_client::{BusinessApi, ClientResult, HttpBusinessApi};

use crate::auth::JwtKeys;
use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub upstream: Arc<dyn BusinessApi>,
    pub jwt: Arc<JwtKeys>,
}

impl AppState {
    /// Create new application state backed by the HTTP business API.
    pub fn new(config: ApiConfig) -> ClientResult<Self> {
        let upstream = HttpBusinessApi::new(&config.upstream)?;
        Ok(Self::with_upstream(config, Arc::new(upstream)))
    }

    /// Create state around an existing [`BusinessApi`].
    pub fn with_upstream(config: ApiConfig, upstream: Arc<dyn BusinessApi>) -> Self {
        let jwt = Arc::new(JwtKeys::new(&config.jwt_secret));
        Self { config, upstream, jwt }
    }
}
