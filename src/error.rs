//! Error taxonomy shared by the client and the console.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is terminal for the action that raised it; nothing here is
//! retried. Callers turn an error into one user-visible notice and move on.
//! Auth failures additionally clear the stored session so the next command
//! starts from the login screen.

use crate::config::ConfigError;
use crate::forms::ValidationError;
use crate::qr_export::ExportError;
use crate::scan::ScanError;
use crate::session::SessionError;

/// Errors produced by backend requests.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend rejected the bearer token (HTTP 401).
    #[error("not authenticated: {}", detail.as_deref().unwrap_or("login required"))]
    Unauthorized { detail: Option<String> },

    /// The local session outlived its policy; it was cleared before sending.
    #[error("session expired, please log in again")]
    SessionExpired,

    /// The backend answered with a non-success status other than 401.
    #[error("request failed with status {status}{}", detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
    Status { status: u16, detail: Option<String> },

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body did not match the expected schema.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// An endpoint path could not be joined onto the base URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The local session could not be read.
    #[error("session storage failed: {0}")]
    Storage(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Whether the error means the user has to authenticate again.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::SessionExpired)
    }

    /// Server-provided detail text, when the backend sent one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { detail } | Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Umbrella error for console operations.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ConsoleError {
    /// Whether the failure should send the user back to `login`.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Api(err) => err.is_auth_failure(),
            Self::Scan(ScanError::CallFailed { source, .. }) => source.is_auth_failure(),
            Self::Export(err) => err.is_auth_failure(),
            _ => false,
        }
    }
}
