//! Background refresh of the dashboard summary.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use quest_models::DashboardSummary;

use crate::api::BusinessApi;
use crate::config::ClientConfig;
use crate::session::SessionManager;

/// Refreshes one business's dashboard summary on a fixed interval.
///
/// No backoff and no jitter: every tick issues one request. A failed tick is
/// logged and the last good summary is kept.
pub struct DashboardPoller {
    api: Arc<dyn BusinessApi>,
    sessions: Arc<SessionManager>,
    interval: Duration,
    latest: RwLock<Option<DashboardSummary>>,
}

impl DashboardPoller {
    pub fn new(
        api: Arc<dyn BusinessApi>,
        sessions: Arc<SessionManager>,
        interval: Duration,
    ) -> Self {
        Self {
            api,
            sessions,
            interval,
            latest: RwLock::new(None),
        }
    }

    pub fn from_config(
        api: Arc<dyn BusinessApi>,
        sessions: Arc<SessionManager>,
        config: &ClientConfig,
    ) -> Self {
        Self::new(api, sessions, config.dashboard_poll_interval)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Last summary fetched successfully.
    pub async fn latest(&self) -> Option<DashboardSummary> {
        self.latest.read().await.clone()
    }

    /// Fetch the summary once and store it.
    pub async fn poll_once(&self) -> anyhow::Result<()> {
        let Some(session) = self.sessions.current().await else {
            debug!("No session, skipping dashboard poll");
            return Ok(());
        };
        let business_id = session.business_id()?;

        let summary = self
            .api
            .fetch_dashboard_summary(&session, business_id)
            .await
            .with_context(|| format!("dashboard summary for business {}", business_id))?;

        debug!(
            business_id = %business_id,
            active_quests = summary.active_quests,
            active_surveys = summary.active_surveys,
            "Dashboard summary refreshed"
        );
        *self.latest.write().await = Some(summary);
        Ok(())
    }

    /// Poll forever. Spawn this as a background task.
    pub async fn run(&self) {
        info!("Starting dashboard poller (interval: {:?})", self.interval);

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if let Err(e) = self.poll_once().await {
                error!("Dashboard poll error: {:#}", e);
            }
        }
    }

    /// Run the poller on the tokio runtime. Abort the handle to stop it.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }
}
