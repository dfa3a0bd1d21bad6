//! Typed client and console helpers for the queue token management API.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend owns every piece of queue state. This crate is the staff/admin
//! side of that boundary: it authenticates, calls the REST endpoints, and
//! interprets scanned QR payloads into the right backend action. The `cli`
//! package is a thin shell over these modules.
//!
//! ARCHITECTURE
//! ============
//! - `net` holds the wire schema, the HTTP client, and the auth context.
//! - `session` persists the bearer tokens and decides when they expire.
//! - `scan` + `dispatch` turn raw scanner text into a display or a manual call.
//! - `queue`, `forms`, and `report` are pure helpers used by console screens.
//! - `qr_export` writes token and QR-manager images to disk.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod forms;
pub mod net;
pub mod qr_export;
pub mod queue;
pub mod report;
pub mod scan;
pub mod session;

pub use config::ConsoleConfig;
pub use dispatch::{ScanDesk, ScanOutcome, TokenCaller};
pub use error::ConsoleError;
pub use net::api::ApiClient;
pub use net::auth::{AuthContext, SessionAuth};
pub use scan::{ScanError, ScanPayload, ScannerSignal};
