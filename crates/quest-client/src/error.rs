//! Client error types.

use thiserror::Error;

/// Result type for business API operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur talking to the business API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Not logged in")]
    NoSession,

    #[error("Session has no business")]
    NoBusiness,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Insufficient AI points: need {needed}, have {available}")]
    InsufficientAiPoints { needed: u64, available: u64 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Map a non-success HTTP status to an error.
    pub fn from_http_status(status: u16, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        match status {
            401 => Self::Unauthorized(msg),
            403 => Self::Forbidden(msg),
            404 => Self::NotFound(msg),
            429 => Self::RateLimited(msg),
            500..=599 => Self::ServerError(status, msg),
            _ => Self::RequestFailed(msg),
        }
    }

    /// HTTP status this error corresponds to, if it came from a response.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::RateLimited(_) => Some(429),
            Self::ServerError(status, _) => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the stored credentials are no longer accepted.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::NoSession)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status() {
        assert!(matches!(ClientError::from_http_status(401, "x"), ClientError::Unauthorized(_)));
        assert!(matches!(ClientError::from_http_status(403, "x"), ClientError::Forbidden(_)));
        assert!(matches!(ClientError::from_http_status(404, "x"), ClientError::NotFound(_)));
        assert!(matches!(ClientError::from_http_status(429, "x"), ClientError::RateLimited(_)));
        assert!(matches!(
            ClientError::from_http_status(503, "x"),
            ClientError::ServerError(503, _)
        ));
        assert!(matches!(ClientError::from_http_status(400, "x"), ClientError::RequestFailed(_)));
    }

    #[test]
    fn test_http_status_getter() {
        assert_eq!(ClientError::from_http_status(502, "bad gateway").http_status(), Some(502));
        assert_eq!(ClientError::NotFound("b".into()).http_status(), Some(404));
        assert_eq!(ClientError::NoSession.http_status(), None);
    }

    #[test]
    fn test_auth_failure() {
        assert!(ClientError::NoSession.is_auth_failure());
        assert!(ClientError::Unauthorized("expired".into()).is_auth_failure());
        assert!(!ClientError::NoBusiness.is_auth_failure());
    }
}
