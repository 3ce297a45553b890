//! Unified error types for the Bazaar client
//!
//! This module defines error types for each layer:
//! - `DomainError`: The closed set of failures use-cases report
//! - `ApiError`: Marketplace REST API transport errors
//! - `StorageError`: Local key-value persistence errors
//! - `ContainerError`: Dependency resolution errors
//! - `ConfigError`: Invalid environment configuration

use thiserror::Error;

/// Domain layer errors - the only error type use-cases hand to callers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Fallback for anything outside the expected categories.
    /// Carries a message that is safe to show to the user.
    #[error("{0}")]
    Unexpected(String),
}

impl DomainError {
    /// Expected failures are passed through use-cases untouched
    pub fn is_expected(&self) -> bool {
        !matches!(self, DomainError::Unexpected(_))
    }

    /// Keep expected errors, replace anything else with a user-facing message
    pub fn or_fallback(self, message: &str) -> Self {
        if self.is_expected() {
            self
        } else {
            tracing::error!(cause = %self, "{}", message);
            DomainError::Unexpected(message.to_string())
        }
    }
}

/// Marketplace API client errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized - {0}")]
    Unauthorized(String),

    #[error("Session expired - sign in again")]
    SessionExpired,

    #[error("Rate limited")]
    RateLimited,

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Local persistence errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration errors, reported at startup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key} {message}, got '{value}'")]
    Invalid {
        key: &'static str,
        value: String,
        message: &'static str,
    },
}

/// Dependency container errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    #[error("No dependency registered under '{0}'")]
    NotRegistered(String),

    #[error("Dependency '{key}' is not a {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("Failed to construct '{key}': {message}")]
    Construction { key: String, message: String },
}

impl From<ApiError> for DomainError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Api { status, message } => match status {
                400 | 422 => DomainError::Validation(message),
                401 | 403 => DomainError::Unauthorized(message),
                404 => DomainError::NotFound(message),
                409 => DomainError::Conflict(message),
                _ => DomainError::Unexpected(format!("API error ({}): {}", status, message)),
            },
            ApiError::Unauthorized(message) => DomainError::Unauthorized(message),
            ApiError::SessionExpired => {
                DomainError::Unauthorized("Session expired - sign in again".to_string())
            }
            e => DomainError::Unexpected(e.to_string()),
        }
    }
}

impl From<StorageError> for DomainError {
    fn from(e: StorageError) -> Self {
        DomainError::Unexpected(e.to_string())
    }
}
