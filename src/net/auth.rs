//! Auth context handed to the HTTP client.
//!
//! SYSTEM CONTEXT
//! ==============
//! The client never looks up credentials on its own. It asks the
//! [`AuthContext`] it was constructed with to decorate each request and to
//! drop the session when the backend rejects it. [`SessionAuth`] is the
//! console's implementation: stored session + fixed-lifetime policy + clock.

use std::sync::Arc;
use std::time::Duration;

use reqwest::RequestBuilder;
use tokio::task::JoinHandle;

use crate::error::ApiError;
use crate::net::types::TokenPair;
use crate::session::{Clock, Session, SessionError, SessionPolicy, SessionStore};

/// Endpoints that must never carry the bearer header.
pub const PUBLIC_ENDPOINTS: &[&str] = &["users/categories/", "auth/token/"];

#[must_use]
pub fn is_public_endpoint(path: &str) -> bool {
    PUBLIC_ENDPOINTS.iter().any(|endpoint| path.contains(endpoint))
}

/// Capability the HTTP client uses to authenticate requests.
pub trait AuthContext: Send + Sync {
    /// Decorate a request bound for `path` with credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the request must not be sent (e.g. the session
    /// has expired).
    fn attach_auth(&self, path: &str, request: RequestBuilder) -> Result<RequestBuilder, ApiError>;

    /// Forget the current credentials.
    fn clear(&self);
}

/// Anonymous context: never attaches credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl AuthContext for NoAuth {
    fn attach_auth(&self, _path: &str, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        Ok(request)
    }

    fn clear(&self) {}
}

/// Session-backed auth context.
pub struct SessionAuth {
    store: Arc<dyn SessionStore>,
    policy: SessionPolicy,
    clock: Arc<dyn Clock>,
}

impl SessionAuth {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, policy: SessionPolicy, clock: Arc<dyn Clock>) -> Self {
        Self { store, policy, clock }
    }

    #[must_use]
    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    /// Store a fresh session stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be persisted.
    pub fn begin(&self, tokens: TokenPair) -> Result<Session, SessionError> {
        let session = Session::new(tokens, self.clock.now());
        self.store.save(&session)?;
        tracing::info!(issued_at = session.issued_at, ttl_secs = self.policy.ttl().as_secs(), "session started");
        Ok(session)
    }

    /// The live session, if any. An expired session is cleared on sight.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn current(&self) -> Result<Option<Session>, SessionError> {
        let Some(session) = self.store.load()? else {
            return Ok(None);
        };
        if self.policy.is_expired(&session, self.clock.now()) {
            self.expire();
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// Lifetime left on the stored session, `None` when there is none.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        let session = self.store.load().ok().flatten()?;
        Some(self.policy.remaining(&session, self.clock.now()))
    }

    /// Drop the session because its lifetime is over.
    pub fn expire(&self) {
        tracing::warn!("session expired, please log in again");
        self.clear();
    }
}

impl AuthContext for SessionAuth {
    fn attach_auth(&self, path: &str, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        if is_public_endpoint(path) {
            return Ok(request);
        }
        let stored = self.store.load().map_err(|e| ApiError::Storage(e.to_string()))?;
        match stored {
            None => Ok(request),
            Some(session) if self.policy.is_expired(&session, self.clock.now()) => {
                self.expire();
                Err(ApiError::SessionExpired)
            }
            Some(session) => Ok(request.bearer_auth(session.access)),
        }
    }

    fn clear(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear session");
        }
    }
}

/// Clear the current session once its lifetime runs out.
///
/// The timer is not renewed by activity; it only stops if the returned task
/// is aborted or the process exits.
pub fn spawn_expiry_timer(auth: Arc<SessionAuth>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let Some(remaining) = auth.remaining() else {
            return;
        };
        tracing::debug!(remaining_secs = remaining.as_secs(), "session expiry timer armed");
        tokio::time::sleep(remaining).await;
        auth.expire();
    })
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
