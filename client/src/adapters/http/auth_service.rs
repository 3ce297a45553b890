//! REST implementation of the authentication port

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::broadcast;

use super::client::ApiClient;
use crate::domain::entities::{AuthSession, Credentials, SessionEvent, SignUpData};
use crate::domain::ports::AuthService;
use crate::error::DomainError;

pub struct HttpAuthService {
    api: Arc<ApiClient>,
}

impl HttpAuthService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    async fn start_session(&self, session: AuthSession) -> Result<AuthSession, DomainError> {
        session.user.validate()?;
        self.api.session().save_session(&session).await?;
        tracing::info!(user_id = %session.user.id, "Signed in");
        self.api.notify(SessionEvent::SignedIn);
        Ok(session)
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, DomainError> {
        let session: AuthSession = self.api.post_public("/auth/signin", credentials).await?;
        self.start_session(session).await
    }

    async fn sign_up(&self, data: &SignUpData) -> Result<AuthSession, DomainError> {
        let session: AuthSession = self.api.post_public("/auth/signup", data).await?;
        self.start_session(session).await
    }

    async fn sign_out(&self) -> Result<(), DomainError> {
        let tokens = self.api.session().tokens().await?;

        let remote = match tokens {
            Some(tokens) => {
                self.api
                    .post_empty(
                        "/auth/signout",
                        &SignOutRequest {
                            refresh_token: &tokens.refresh_token,
                        },
                    )
                    .await
            }
            None => Ok(()),
        };

        self.api.session().clear().await?;
        tracing::info!("Signed out");
        self.api.notify(SessionEvent::SignedOut);

        if let Err(e) = remote {
            tracing::warn!(error = %e, "Remote sign-out failed; local session cleared anyway");
        }
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<AuthSession>, DomainError> {
        Ok(self.api.session().session().await?)
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.api.subscribe()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignOutRequest<'a> {
    refresh_token: &'a str,
}
