//! Authentication port

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::entities::{AuthSession, Credentials, SessionEvent, SignUpData};
use crate::error::DomainError;

/// Signs users in and out and owns the locally persisted session
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange credentials for a session and persist it
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, DomainError>;

    /// Create an account and persist the resulting session
    async fn sign_up(&self, data: &SignUpData) -> Result<AuthSession, DomainError>;

    /// Revoke the session remotely. The local session is cleared even
    /// when the remote call fails.
    async fn sign_out(&self) -> Result<(), DomainError>;

    /// The locally stored session, if any
    async fn current_session(&self) -> Result<Option<AuthSession>, DomainError>;

    async fn is_authenticated(&self) -> Result<bool, DomainError> {
        Ok(self.current_session().await?.is_some())
    }

    /// Session changes, including forced sign-out after a failed token refresh
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}
