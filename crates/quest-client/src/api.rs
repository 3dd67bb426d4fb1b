//! Business REST API client.
//!
//! [`BusinessApi`] is the seam the snapshot lifecycle and the dashboard
//! poller talk through; [`HttpBusinessApi`] is the reqwest implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info_span, Instrument};

use quest_models::{AiPointsSpend, BusinessSnapshot, DashboardSummary};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::metrics::record_request;
use crate::session::Session;

/// Backend operations needed for entitlement state.
#[async_trait]
pub trait BusinessApi: Send + Sync {
    /// Fetch the business's tier, permissions and usage counters.
    async fn fetch_snapshot(
        &self,
        session: &Session,
        business_id: &str,
    ) -> ClientResult<BusinessSnapshot>;

    /// Fetch the dashboard headline counters.
    async fn fetch_dashboard_summary(
        &self,
        session: &Session,
        business_id: &str,
    ) -> ClientResult<DashboardSummary>;

    /// Charge AI points for a feature.
    async fn spend_ai_points(
        &self,
        session: &Session,
        business_id: &str,
        points: u64,
        feature: &str,
    ) -> ClientResult<AiPointsSpend>;
}

#[derive(Serialize)]
struct SpendRequest<'a> {
    points: u64,
    feature: &'a str,
}

/// reqwest-backed [`BusinessApi`].
#[derive(Clone)]
pub struct HttpBusinessApi {
    http: Client,
    base_url: String,
}

impl HttpBusinessApi {
    /// Create a new client.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("quest-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(&ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn business_url(&self, business_id: &str, suffix: &str) -> String {
        format!(
            "{}/api/businesses/{}/{}",
            self.base_url,
            urlencoding::encode(business_id),
            suffix
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, session: &Session) -> ClientResult<T> {
        let response = self.http.get(url).bearer_auth(&session.token).send().await?;
        Self::decode(url, response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        session: &Session,
        body: &B,
    ) -> ClientResult<T> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&session.token)
            .json(body)
            .send()
            .await?;
        Self::decode(url, response).await
    }

    async fn decode<T: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_response(status, url, response).await);
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn handle_error_response(
        status: StatusCode,
        url: &str,
        response: reqwest::Response,
    ) -> ClientError {
        let body = response.text().await.unwrap_or_default();
        ClientError::from_http_status(status.as_u16(), format!("{} failed: {}", url, body))
    }

    async fn execute_request<T, F>(
        &self,
        operation: &str,
        business_id: &str,
        fut: F,
    ) -> ClientResult<T>
    where
        F: std::future::Future<Output = ClientResult<T>>,
    {
        let span = info_span!(
            "business_api_request",
            operation = %operation,
            business_id = %business_id
        );

        let start = Instant::now();
        let result = fut.instrument(span).await;
        let latency_ms = start.elapsed().as_millis() as f64;

        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.http_status().unwrap_or(500),
        };
        record_request(operation, status, latency_ms);
        debug!(operation, business_id, status, latency_ms, "Business API request complete");

        result
    }
}

#[async_trait]
impl BusinessApi for HttpBusinessApi {
    async fn fetch_snapshot(
        &self,
        session: &Session,
        business_id: &str,
    ) -> ClientResult<BusinessSnapshot> {
        let url = self.business_url(business_id, "entitlements");
        self.execute_request("fetch_snapshot", business_id, self.get_json(&url, session))
            .await
    }

    async fn fetch_dashboard_summary(
        &self,
        session: &Session,
        business_id: &str,
    ) -> ClientResult<DashboardSummary> {
        let url = self.business_url(business_id, "dashboard/summary");
        self.execute_request("fetch_dashboard_summary", business_id, self.get_json(&url, session))
            .await
    }

    async fn spend_ai_points(
        &self,
        session: &Session,
        business_id: &str,
        points: u64,
        feature: &str,
    ) -> ClientResult<AiPointsSpend> {
        let url = self.business_url(business_id, "ai-points/spend");
        let body = SpendRequest { points, feature };
        self.execute_request("spend_ai_points", business_id, self.post_json(&url, session, &body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quest_models::{Role, Tier};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session() -> Session {
        Session::new("test-token", "user-1", Role::BusinessAdmin).with_business("biz-1")
    }

    async fn client_for(server: &MockServer) -> HttpBusinessApi {
        HttpBusinessApi::new(&ClientConfig::with_base_url(&server.uri()).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_snapshot_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/businesses/biz-1/entitlements"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tier": "super",
                "ai_points": 40,
                "monthly_quest_limit": -1,
                "tierInfo": {"can_create_quests": true, "admin_seat_limit": 5}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = client_for(&server).await;
        let snapshot = api.fetch_snapshot(&session(), "biz-1").await.unwrap();

        assert_eq!(snapshot.tier, Tier::Super);
        assert_eq!(snapshot.ai_points, 40);
        assert_eq!(snapshot.monthly_quest_limit, -1);
        assert!(snapshot.tier_grants_quests());
    }

    #[tokio::test]
    async fn test_business_id_is_path_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/businesses/a%2Fb/entitlements"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let api = client_for(&server).await;
        assert!(api.fetch_snapshot(&session(), "a/b").await.is_ok());
    }

    #[tokio::test]
    async fn test_error_statuses_map_to_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/businesses/biz-1/entitlements"))
            .respond_with(ResponseTemplate::new(403).set_body_string("not your business"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/businesses/biz-1/dashboard/summary"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let api = client_for(&server).await;

        let err = api.fetch_snapshot(&session(), "biz-1").await.unwrap_err();
        assert!(
            matches!(err, ClientError::Forbidden(ref msg) if msg.contains("not your business"))
        );

        let err = api.fetch_dashboard_summary(&session(), "biz-1").await.unwrap_err();
        assert_eq!(err.http_status(), Some(503));
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/businesses/biz-1/entitlements"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let api = client_for(&server).await;
        let err = api.fetch_snapshot(&session(), "biz-1").await.unwrap_err();
        assert!(matches!(err, ClientError::Json(_)));
    }

    #[tokio::test]
    async fn test_spend_ai_points_posts_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/businesses/biz-1/ai-points/spend"))
            .and(body_json(json!({"points": 3, "feature": "survey_generation"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ai_points": 7})))
            .expect(1)
            .mount(&server)
            .await;

        let api = client_for(&server).await;
        let spend = api
            .spend_ai_points(&session(), "biz-1", 3, "survey_generation")
            .await
            .unwrap();
        assert_eq!(spend.ai_points, Some(7));
    }

    #[tokio::test]
    async fn test_fetch_dashboard_summary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/businesses/biz-1/dashboard/summary"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "active_quests": 2,
                "active_surveys": 5,
                "total_participants": 310
            })))
            .mount(&server)
            .await;

        let api = client_for(&server).await;
        let summary = api.fetch_dashboard_summary(&session(), "biz-1").await.unwrap();
        assert_eq!(summary.active_surveys, 5);
        assert_eq!(summary.total_participants, 310);
    }
}
