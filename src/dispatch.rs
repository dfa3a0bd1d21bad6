//! Scan dispatch: turn a resolved QR payload into a backend action.
//!
//! A payload that names a category is a "call this token now" request and
//! goes to the manual-call endpoint exactly once. A payload without one is a
//! lookup: the token is shown and nothing on the backend changes. Each scan is
//! handled on its own; a failed call is reported and never retried.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::net::types::{ManualCallRequest, ManualCallResponse};
use crate::scan::{self, ScanError, ScannerSignal};

/// Mutating capability the dispatcher needs from the backend.
#[async_trait]
pub trait TokenCaller: Send + Sync {
    async fn manual_call(&self, request: &ManualCallRequest) -> Result<ManualCallResponse, ApiError>;
}

/// Terminal outcome of one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Token shown without touching the backend.
    Displayed { token_id: String },
    /// Token called into service for `category_id`.
    Called {
        token_id: String,
        category_id: String,
        response: ManualCallResponse,
    },
}

impl ScanOutcome {
    #[must_use]
    pub fn token_id(&self) -> &str {
        match self {
            Self::Displayed { token_id } | Self::Called { token_id, .. } => token_id,
        }
    }
}

/// Scan station state: the caller plus the token currently on display.
pub struct ScanDesk<C> {
    caller: C,
    displayed: Option<String>,
}

impl<C: TokenCaller> ScanDesk<C> {
    pub fn new(caller: C) -> Self {
        Self { caller, displayed: None }
    }

    /// Token currently on display, if any scan has succeeded.
    #[must_use]
    pub fn displayed(&self) -> Option<&str> {
        self.displayed.as_deref()
    }

    pub fn caller(&self) -> &C {
        &self.caller
    }

    /// Resolve raw scanned text and perform the matching action.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidPayload`] for an empty scan (no request is
    /// made) and [`ScanError::CallFailed`] when the manual call is rejected.
    /// In both cases the displayed token is left as it was.
    pub async fn handle_scan(&mut self, raw: &str) -> Result<ScanOutcome, ScanError> {
        let payload = scan::resolve(raw)?;

        let Some(category_id) = payload.category_id else {
            tracing::info!(token_id = %payload.token_id, "token scanned");
            self.displayed = Some(payload.token_id.clone());
            return Ok(ScanOutcome::Displayed { token_id: payload.token_id });
        };

        let request = ManualCallRequest { token_id: payload.token_id.clone(), category_id: Some(category_id.clone()) };
        match self.caller.manual_call(&request).await {
            Ok(response) => {
                tracing::info!(token_id = %payload.token_id, %category_id, "token scanned and called");
                self.displayed = Some(payload.token_id.clone());
                Ok(ScanOutcome::Called { token_id: payload.token_id, category_id, response })
            }
            Err(source) => {
                tracing::warn!(token_id = %payload.token_id, error = %source, "failed to call token");
                Err(ScanError::CallFailed { token_id: payload.token_id, source })
            }
        }
    }

    /// Handle one report from the scanning device. Noise yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Scanner`] for device failures, and any error
    /// [`Self::handle_scan`] returns for decoded text.
    pub async fn handle_signal(&mut self, signal: ScannerSignal) -> Result<Option<ScanOutcome>, ScanError> {
        match signal {
            ScannerSignal::Decoded(text) => self.handle_scan(&text).await.map(Some),
            ScannerSignal::NoCodeInFrame | ScannerSignal::PatternSearchFailed => Ok(None),
            ScannerSignal::Device(message) => {
                tracing::warn!(%message, "scanner error");
                Err(ScanError::Scanner(message))
            }
        }
    }
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod tests;
