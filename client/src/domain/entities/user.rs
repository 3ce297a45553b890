//! User domain entity
//!
//! A marketplace account. Instances are immutable: updates produce a new,
//! re-validated value.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Unique identifier for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check an email address against the accepted format
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// A marketplace user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: Option<String>,
        avatar_url: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let user = Self {
            id,
            name: name.into(),
            email: email.into(),
            phone,
            avatar_url,
            created_at,
        };
        user.validate()?;
        Ok(user)
    }

    /// Re-check field rules (also used after deserializing server data)
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation("Name is required".to_string()));
        }
        if !is_valid_email(&self.email) {
            return Err(DomainError::Validation(format!(
                "Invalid email address: {}",
                self.email
            )));
        }
        if matches!(&self.phone, Some(p) if p.trim().is_empty()) {
            return Err(DomainError::Validation(
                "Phone number cannot be blank".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply a profile update, returning the updated user
    pub fn update(&self, changes: &UserUpdate) -> Result<Self, DomainError> {
        let updated = Self {
            id: self.id,
            name: changes.name.clone().unwrap_or_else(|| self.name.clone()),
            email: changes.email.clone().unwrap_or_else(|| self.email.clone()),
            phone: changes.phone.clone().or_else(|| self.phone.clone()),
            avatar_url: self.avatar_url.clone(),
            created_at: self.created_at,
        };
        updated.validate()?;
        Ok(updated)
    }

    pub fn with_avatar(&self, url: impl Into<String>) -> Self {
        Self {
            avatar_url: Some(url.into()),
            ..self.clone()
        }
    }
}

/// Profile fields a user may change; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}
