//! Persisted login session and its expiry policy.
//!
//! DESIGN
//! ======
//! A session is the `{access, refresh}` bearer pair plus the instant it was
//! issued. The issue time is stamped once at login and never renewed, so the
//! session has a fixed lifetime regardless of activity. Time comes from an
//! injectable [`Clock`] so expiry can be tested without waiting.
//!
//! Storage is behind [`SessionStore`]: the console persists to a JSON file,
//! tests use the in-memory store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_SESSION_TTL_SECS;
use crate::net::types::TokenPair;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

// =============================================================================
// CLOCK
// =============================================================================

/// Source of wall-clock time for session bookkeeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<SystemTime>,
}

impl ManualClock {
    #[must_use]
    pub fn new(at: SystemTime) -> Self {
        Self { now: Mutex::new(at) }
    }

    pub fn set(&self, at: SystemTime) {
        if let Ok(mut now) = self.now.lock() {
            *now = at;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        self.now.lock().map_or(UNIX_EPOCH, |now| *now)
    }
}

// =============================================================================
// SESSION + POLICY
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access: String,
    pub refresh: String,
    /// Seconds since the Unix epoch at login.
    pub issued_at: u64,
}

impl Session {
    #[must_use]
    pub fn new(tokens: TokenPair, issued: SystemTime) -> Self {
        Self { access: tokens.access, refresh: tokens.refresh, issued_at: unix_secs(issued) }
    }

    #[must_use]
    pub fn issued_time(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.issued_at)
    }
}

fn unix_secs(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs())
}

/// Fixed-lifetime expiry rule measured from login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    ttl: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self { ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS) }
    }
}

impl SessionPolicy {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    #[must_use]
    pub fn expires_at(&self, session: &Session) -> SystemTime {
        session.issued_time() + self.ttl
    }

    #[must_use]
    pub fn is_expired(&self, session: &Session, now: SystemTime) -> bool {
        now >= self.expires_at(session)
    }

    /// Lifetime left at `now`; zero once expired.
    #[must_use]
    pub fn remaining(&self, session: &Session, now: SystemTime) -> Duration {
        self.expires_at(session)
            .duration_since(now)
            .unwrap_or(Duration::ZERO)
    }
}

// =============================================================================
// STORAGE
// =============================================================================

/// Durable home of the current session.
pub trait SessionStore: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self) -> Result<Option<Session>, SessionError>;

    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    fn save(&self, session: &Session) -> Result<(), SessionError>;

    /// # Errors
    ///
    /// Returns an error if the stored session cannot be removed.
    fn clear(&self) -> Result<(), SessionError>;
}

/// JSON session file on local disk.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io { path: self.path.clone(), source }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable session file");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let body = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, body).map_err(|e| self.io_error(e))
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Process-local session storage.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self { session: Mutex::new(Some(session)) }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.session.lock().ok().and_then(|s| s.clone()))
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Ok(mut slot) = self.session.lock() {
            *slot = Some(session.clone());
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        if let Ok(mut slot) = self.session.lock() {
            *slot = None;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
