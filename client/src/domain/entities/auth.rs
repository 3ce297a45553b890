//! Authentication value types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::{is_valid_email, User};
use crate::error::DomainError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Access/refresh token pair issued by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthTokens {
    /// Tokens without an expiry are considered valid until the server says otherwise
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// A signed-in user together with their tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user: User,
    pub tokens: AuthTokens,
}

#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_lowercase(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !is_valid_email(&self.email) {
            return Err(DomainError::Validation(
                "A valid email address is required".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(DomainError::Validation("Password is required".to_string()));
        }
        Ok(())
    }
}

// Keep passwords out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Clone, Serialize)]
pub struct SignUpData {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl SignUpData {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation("Name is required".to_string()));
        }
        if !is_valid_email(&self.email) {
            return Err(DomainError::Validation(
                "A valid email address is required".to_string(),
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if matches!(&self.phone, Some(p) if p.trim().is_empty()) {
            return Err(DomainError::Validation(
                "Phone number cannot be blank".to_string(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for SignUpData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpData")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"***")
            .field("phone", &self.phone)
            .finish()
    }
}

/// Changes to the local session broadcast by the auth layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn,
    SignedOut,
    /// Token refresh failed and the session was dropped
    Expired,
}
