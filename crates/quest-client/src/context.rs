//! Business snapshot lifecycle.
//!
//! [`BusinessContext`] owns the one snapshot the rest of the app reads
//! entitlements from. It is fetched once after login, replaced wholesale on
//! refresh, patched in place after an AI point spend and cleared on logout.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use quest_entitlements::{EntitlementResolver, EntitlementSummary};
use quest_models::{BusinessSnapshot, Role};

use crate::api::BusinessApi;
use crate::error::{ClientError, ClientResult};
use crate::metrics::record_snapshot_refresh;
use crate::session::SessionManager;

/// Error flag shown to the user when a snapshot fetch fails.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load business data";

/// Owned view of the current snapshot and role.
#[derive(Debug, Clone)]
pub struct Entitlements {
    snapshot: Option<Arc<BusinessSnapshot>>,
    role: Role,
}

impl Entitlements {
    pub fn new(snapshot: Option<Arc<BusinessSnapshot>>, role: Role) -> Self {
        Self { snapshot, role }
    }

    pub fn resolver(&self) -> EntitlementResolver<'_> {
        EntitlementResolver::new(self.snapshot.as_deref(), &self.role)
    }

    pub fn summary(&self) -> EntitlementSummary {
        self.resolver().summary()
    }

    pub fn snapshot(&self) -> Option<&BusinessSnapshot> {
        self.snapshot.as_deref()
    }

    pub fn role(&self) -> &Role {
        &self.role
    }
}

/// Load state of the business snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextStatus {
    pub loaded: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct ContextState {
    snapshot: Option<Arc<BusinessSnapshot>>,
    /// Business the held snapshot was fetched for.
    business_id: Option<String>,
    loading: bool,
    error: Option<String>,
    loaded_at: Option<DateTime<Utc>>,
    /// Bumped on logout so in-flight fetches for the old session are dropped.
    generation: u64,
}

/// Holder of the current business snapshot.
pub struct BusinessContext {
    api: Arc<dyn BusinessApi>,
    sessions: Arc<SessionManager>,
    state: RwLock<ContextState>,
}

impl BusinessContext {
    pub fn new(api: Arc<dyn BusinessApi>, sessions: Arc<SessionManager>) -> Self {
        Self {
            api,
            sessions,
            state: RwLock::new(ContextState::default()),
        }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Fetch the snapshot unless one is already held for the session's business.
    pub async fn load(&self) -> ClientResult<Option<Arc<BusinessSnapshot>>> {
        let session = self.sessions.require().await?;
        {
            let state = self.state.read().await;
            if let Some(snapshot) = &state.snapshot {
                if state.business_id == session.business_id {
                    return Ok(Some(Arc::clone(snapshot)));
                }
            }
        }
        self.refresh().await
    }

    /// Fetch the snapshot and replace the held one.
    ///
    /// Returns `Ok(None)` when the session has no business (super admins).
    /// On failure the previous snapshot is kept and the error flag is set.
    pub async fn refresh(&self) -> ClientResult<Option<Arc<BusinessSnapshot>>> {
        let session = self.sessions.require().await?;
        let Some(business_id) = session.business_id.clone() else {
            debug!(
                user_id = %session.user_id,
                "Session has no business, skipping snapshot load"
            );
            return Ok(None);
        };

        let generation = {
            let mut state = self.state.write().await;
            state.loading = true;
            state.generation
        };

        let result = self.api.fetch_snapshot(&session, &business_id).await;
        record_snapshot_refresh(result.is_ok());

        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(business_id = %business_id, "Discarding snapshot fetched for an ended session");
            return Err(ClientError::NoSession);
        }
        state.loading = false;

        match result {
            Ok(snapshot) => {
                info!(
                    business_id = %business_id,
                    tier = %snapshot.tier,
                    ai_points = snapshot.ai_points,
                    "Business snapshot loaded"
                );
                let snapshot = Arc::new(snapshot);
                state.snapshot = Some(Arc::clone(&snapshot));
                state.business_id = Some(business_id);
                state.error = None;
                state.loaded_at = Some(Utc::now());
                Ok(Some(snapshot))
            }
            Err(e) => {
                warn!(
                    business_id = %business_id,
                    stale = state.snapshot.is_some(),
                    "Failed to load business snapshot: {}", e
                );
                if state.business_id.as_deref() != Some(business_id.as_str()) {
                    state.snapshot = None;
                    state.business_id = None;
                    state.loaded_at = None;
                }
                state.error = Some(LOAD_FAILED_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    /// Spend AI points and patch the held balance.
    ///
    /// The local balance is checked first; the backend's reported balance is
    /// then written into the snapshot, or `current - points` when it reports
    /// none. Returns the new balance.
    ///
    /// A response that arrives after logout, or after the held snapshot moved
    /// to another business, is dropped with [`ClientError::NoSession`].
    pub async fn spend_ai_points(&self, points: u64, feature: &str) -> ClientResult<i64> {
        let session = self.sessions.require().await?;
        let business_id = session.business_id()?.to_string();

        let (generation, held) = {
            let state = self.state.read().await;
            let held = state
                .snapshot
                .clone()
                .filter(|_| state.business_id.as_deref() == Some(business_id.as_str()));
            (state.generation, held)
        };

        let entitlements = Entitlements::new(held, session.role.clone());
        let resolver = entitlements.resolver();
        if !resolver.has_ai_points(points) {
            return Err(ClientError::InsufficientAiPoints {
                needed: points,
                available: resolver.ai_points().limited().unwrap_or(0),
            });
        }

        let response = self
            .api
            .spend_ai_points(&session, &business_id, points, feature)
            .await?;

        let mut state = self.state.write().await;
        let moved = state
            .business_id
            .as_deref()
            .is_some_and(|held| held != business_id);
        if state.generation != generation || moved {
            debug!(
                business_id = %business_id,
                "Discarding AI point balance for an ended session"
            );
            return Err(ClientError::NoSession);
        }

        let current = state.snapshot.as_ref().map(|s| s.ai_points).unwrap_or(0);
        let spent = i64::try_from(points).unwrap_or(i64::MAX);
        let balance = response
            .ai_points
            .unwrap_or_else(|| current.saturating_sub(spent).max(0));

        if let Some(snapshot) = state.snapshot.as_mut() {
            *snapshot = Arc::new(snapshot.with_ai_points(balance));
        }

        info!(
            business_id = %business_id,
            feature,
            points,
            balance,
            "AI points spent"
        );
        Ok(balance)
    }

    /// Current snapshot and role for resolving entitlements.
    pub async fn entitlements(&self) -> Entitlements {
        let role = self
            .sessions
            .role()
            .await
            .unwrap_or_else(|| Role::Other(String::new()));
        Entitlements::new(self.snapshot().await, role)
    }

    pub async fn snapshot(&self) -> Option<Arc<BusinessSnapshot>> {
        self.state.read().await.snapshot.clone()
    }

    pub async fn status(&self) -> ContextStatus {
        let state = self.state.read().await;
        ContextStatus {
            loaded: state.snapshot.is_some(),
            loading: state.loading,
            error: state.error.clone(),
            loaded_at: state.loaded_at,
        }
    }

    /// Clear the snapshot and end the session.
    pub async fn logout(&self) {
        {
            let mut state = self.state.write().await;
            let generation = state.generation.wrapping_add(1);
            *state = ContextState {
                generation,
                ..ContextState::default()
            };
        }
        self.sessions.logout().await;
    }
}
