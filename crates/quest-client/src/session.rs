//! Authenticated session context.
//!
//! Holds the token, user and role for the logged-in caller. A session is
//! created once at login and dropped at logout; everything else reads it
//! through [`SessionManager`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use quest_models::Role;

use crate::error::{ClientError, ClientResult};

/// The logged-in caller.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for backend requests
    pub token: String,
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    /// Business the caller administers. Super admins may have none.
    #[serde(default)]
    pub business_id: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>, user_id: impl Into<String>, role: Role) -> Self {
        Self {
            token: token.into(),
            user_id: user_id.into(),
            email: None,
            role,
            business_id: None,
        }
    }

    pub fn with_business(mut self, business_id: impl Into<String>) -> Self {
        self.business_id = Some(business_id.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn business_id(&self) -> ClientResult<&str> {
        self.business_id.as_deref().ok_or(ClientError::NoBusiness)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[redacted]")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("business_id", &self.business_id)
            .finish()
    }
}

/// Owner of the current session.
#[derive(Debug, Default)]
pub struct SessionManager {
    current: RwLock<Option<Session>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session, replacing any previous one.
    pub async fn login(&self, session: Session) {
        info!(
            user_id = %session.user_id,
            role = %session.role,
            business_id = ?session.business_id,
            "Session started"
        );
        *self.current.write().await = Some(session);
    }

    /// End the session. Returns the session that was active, if any.
    pub async fn logout(&self) -> Option<Session> {
        let previous = self.current.write().await.take();
        if let Some(ref session) = previous {
            info!(user_id = %session.user_id, "Session ended");
        }
        previous
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    /// Current session, or [`ClientError::NoSession`].
    pub async fn require(&self) -> ClientResult<Session> {
        self.current().await.ok_or(ClientError::NoSession)
    }

    pub async fn role(&self) -> Option<Role> {
        self.current.read().await.as_ref().map(|s| s.role.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_logout_lifecycle() {
        let sessions = SessionManager::new();
        assert!(!sessions.is_authenticated().await);
        assert!(matches!(sessions.require().await, Err(ClientError::NoSession)));

        sessions
            .login(Session::new("tok", "user-1", Role::BusinessAdmin).with_business("biz-1"))
            .await;
        assert!(sessions.is_authenticated().await);
        assert_eq!(sessions.role().await, Some(Role::BusinessAdmin));

        let current = sessions.require().await.unwrap();
        assert_eq!(current.business_id().unwrap(), "biz-1");

        let ended = sessions.logout().await.unwrap();
        assert_eq!(ended.user_id, "user-1");
        assert!(sessions.current().await.is_none());
        assert!(sessions.logout().await.is_none());
    }

    #[tokio::test]
    async fn test_login_replaces_previous_session() {
        let sessions = SessionManager::new();
        sessions.login(Session::new("a", "user-a", Role::BusinessAdmin)).await;
        sessions.login(Session::new("b", "user-b", Role::SuperAdmin)).await;

        let current = sessions.require().await.unwrap();
        assert_eq!(current.user_id, "user-b");
        assert!(current.role.is_super_admin());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new("secret-token", "user-1", Role::SuperAdmin).with_email("a@b.c");
        let rendered = format!("{:?}", session);
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("user-1"));
    }

    #[test]
    fn test_missing_business() {
        let session = Session::new("t", "u", Role::SuperAdmin);
        assert!(matches!(session.business_id(), Err(ClientError::NoBusiness)));
    }
}
