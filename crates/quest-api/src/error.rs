//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use quest_client::ClientError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unauthorized(msg) => Self::Unauthorized(msg),
            ClientError::Forbidden(msg) => Self::Forbidden(msg),
            ClientError::NotFound(msg) => Self::NotFound(msg),
            ClientError::RateLimited(_) => Self::RateLimited,
            ClientError::NoSession => Self::unauthorized("Not logged in"),
            ClientError::NoBusiness => Self::bad_request("Caller has no business"),
            ClientError::Config(msg) => Self::Internal(msg),
            other => Self::Upstream(other.to_string()),
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .map(|env| env.eq_ignore_ascii_case("production"))
        .unwrap_or(false)
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let detail = match &self {
            ApiError::Internal(_) | ApiError::Upstream(_) => {
                if is_production_env() {
                    "An internal error occurred".to_string()
                } else {
                    self.to_string()
                }
            }
            _ => self.to_string(),
        };

        let code = match &self {
            ApiError::Upstream(_) => Some("upstream_unavailable".to_string()),
            _ => None,
        };

        (status, Json(ErrorResponse { detail, code })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    async fn detail(err: ApiError) -> String {
        let bytes = axum::body::to_bytes(err.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        json["detail"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_client_errors_map_to_statuses() {
        let cases = [
            (ClientError::from_http_status(401, "x"), StatusCode::UNAUTHORIZED),
            (ClientError::from_http_status(403, "x"), StatusCode::FORBIDDEN),
            (ClientError::from_http_status(404, "x"), StatusCode::NOT_FOUND),
            (ClientError::from_http_status(429, "x"), StatusCode::TOO_MANY_REQUESTS),
            (ClientError::from_http_status(503, "x"), StatusCode::BAD_GATEWAY),
            (ClientError::NoBusiness, StatusCode::BAD_REQUEST),
        ];

        for (client_err, expected) in cases {
            assert_eq!(ApiError::from(client_err).status_code(), expected);
        }
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::forbidden("other business").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[serial]
    async fn test_upstream_detail_hidden_in_production_any_case() {
        for env in ["production", "Production", "PRODUCTION"] {
            std::env::set_var("ENVIRONMENT", env);
            let detail = detail(ApiError::Upstream("db at 10.0.0.5 refused".into())).await;
            assert_eq!(detail, "An internal error occurred");
        }

        std::env::set_var("ENVIRONMENT", "development");
        let detail = detail(ApiError::Upstream("db at 10.0.0.5 refused".into())).await;
        assert!(detail.contains("10.0.0.5"));

        std::env::remove_var("ENVIRONMENT");
    }
}
