use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_API_URL: &str = "http://localhost:3000/api";
const DEFAULT_STORAGE_DIR: &str = ".bazaar";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the marketplace REST API
    pub api_base_url: String,
    /// Directory holding the local key-value store (session, cached profile)
    pub storage_dir: PathBuf,
    /// Per-request timeout for the HTTP client
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let request_timeout = match env::var("BAZAAR_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_base_url: env::var("BAZAAR_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            storage_dir: env::var("BAZAAR_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_DIR)),
            request_timeout,
        })
    }

    /// Replace the API URL (e.g. from a command-line flag)
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Replace the storage directory
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid {
            key: "BAZAAR_TIMEOUT_SECS",
            value: raw.to_string(),
            message: "must be a positive integer",
        }),
    }
}
