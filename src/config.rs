//! Console configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const SESSION_FILE_NAME: &str = "session.json";

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto. Always ends with `/`.
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub api: ApiConfig,
    pub session_file: PathBuf,
    pub session_ttl: Duration,
}

impl ConsoleConfig {
    /// Build typed console config from environment variables.
    ///
    /// All optional:
    /// - `QUEUEDESK_BASE_URL`: default `http://127.0.0.1:8000/api/`
    /// - `QUEUEDESK_SESSION_FILE`: default `$HOME/.queuedesk/session.json`
    /// - `QUEUEDESK_SESSION_TTL_SECS`: default 3600
    /// - `QUEUEDESK_REQUEST_TIMEOUT_SECS`: default 30
    /// - `QUEUEDESK_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but does not parse, or
    /// if the session ttl is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("QUEUEDESK_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let session_file = std::env::var("QUEUEDESK_SESSION_FILE")
            .map_or_else(|_| default_session_file(std::env::var("HOME").ok().as_deref()), PathBuf::from);

        let session_ttl_secs = env_parse_u64("QUEUEDESK_SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;
        if session_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue { var: "QUEUEDESK_SESSION_TTL_SECS", value: "0".to_owned() });
        }

        let api = ApiConfig {
            base_url: normalize_base_url(&base_url),
            request_timeout: Duration::from_secs(env_parse_u64(
                "QUEUEDESK_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            connect_timeout: Duration::from_secs(env_parse_u64(
                "QUEUEDESK_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?),
        };

        Ok(Self { api, session_file, session_ttl: Duration::from_secs(session_ttl_secs) })
    }
}

/// Ensure the base URL ends with exactly one `/` so relative joins keep the
/// `/api/` prefix.
#[must_use]
pub fn normalize_base_url(raw: &str) -> String {
    format!("{}/", raw.trim().trim_end_matches('/'))
}

fn default_session_file(home: Option<&str>) -> PathBuf {
    match home {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(".queuedesk").join(SESSION_FILE_NAME),
        _ => PathBuf::from(".queuedesk").join(SESSION_FILE_NAME),
    }
}

fn env_parse_u64(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
