//! Typed access to the persisted session
//!
//! Tokens and the user profile are stored as JSON strings under fixed keys.

use std::sync::Arc;

use crate::domain::entities::{AuthSession, AuthTokens, User};
use crate::domain::ports::KeyValueStorage;
use crate::error::StorageError;

pub const TOKENS_KEY: &str = "@bazaar/auth_tokens";
pub const USER_KEY: &str = "@bazaar/user";

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub async fn tokens(&self) -> Result<Option<AuthTokens>, StorageError> {
        self.read(TOKENS_KEY).await
    }

    pub async fn access_token(&self) -> Result<Option<String>, StorageError> {
        Ok(self.tokens().await?.map(|t| t.access_token))
    }

    pub async fn save_tokens(&self, tokens: &AuthTokens) -> Result<(), StorageError> {
        self.write(TOKENS_KEY, tokens).await
    }

    pub async fn user(&self) -> Result<Option<User>, StorageError> {
        self.read(USER_KEY).await
    }

    pub async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        self.write(USER_KEY, user).await
    }

    /// Both halves must be present for a session to exist
    pub async fn session(&self) -> Result<Option<AuthSession>, StorageError> {
        match (self.user().await?, self.tokens().await?) {
            (Some(user), Some(tokens)) => Ok(Some(AuthSession { user, tokens })),
            _ => Ok(None),
        }
    }

    pub async fn save_session(&self, session: &AuthSession) -> Result<(), StorageError> {
        self.save_tokens(&session.tokens).await?;
        self.save_user(&session.user).await
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(TOKENS_KEY).await?;
        self.storage.remove(USER_KEY).await
    }

    async fn read<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, StorageError> {
        match self.storage.get(key).await? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    // A stale format from an older build; drop it rather than fail forever
                    tracing::warn!(key, error = %e, "Discarding unreadable stored value");
                    self.storage.remove(key).await?;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn write<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.storage.set(key, &raw).await
    }
}
