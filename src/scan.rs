//! QR payload resolution.
//!
//! DESIGN
//! ======
//! Printed tokens carry one of three encodings: the bare token id, a JSON
//! object with `token_id`/`category_id`, or a JSON object whose `url` points
//! at the token page with both ids as query parameters. [`resolve`] folds all
//! three into a [`ScanPayload`]. Later sources override earlier ones only
//! when they carry a usable value, so a partially filled QR never erases what
//! an earlier field already supplied.
//!
//! A field counts as present when it is "truthy": a non-empty string, a
//! non-zero number, `true`, or any object/array. Numbers become their decimal
//! text (`5` and `5.0` both become `"5"`).

use reqwest::Url;
use serde_json::{Map, Number, Value};

use crate::error::ApiError;

/// Resolved scan: which token, and whether it names a category to call into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPayload {
    pub token_id: String,
    pub category_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The scan produced no token id; nothing was sent.
    #[error("invalid QR code")]
    InvalidPayload,

    /// The manual call for a scanned token was rejected.
    #[error("failed to call token {token_id}: {source}")]
    CallFailed {
        token_id: String,
        #[source]
        source: ApiError,
    },

    /// The scanning device reported a failure other than "nothing found".
    #[error("scanner error: {0}")]
    Scanner(String),
}

/// What the scanning capability reports for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannerSignal {
    /// A code was decoded to text.
    Decoded(String),
    /// The frame held no code. Fires continuously while the camera is idle.
    NoCodeInFrame,
    /// The decoder gave up locating finder patterns in a noisy frame.
    PatternSearchFailed,
    /// Any other device or decoder failure.
    Device(String),
}

impl ScannerSignal {
    /// Classify a decoder error by its exception name and message.
    #[must_use]
    pub fn from_error(name: &str, message: &str) -> Self {
        if name == "NotFoundException" {
            Self::NoCodeInFrame
        } else if message.contains("selectBestPatterns") {
            Self::PatternSearchFailed
        } else if message.is_empty() {
            Self::Device(name.to_owned())
        } else {
            Self::Device(message.to_owned())
        }
    }

    /// Whether the signal is routine scanner noise that should be dropped.
    #[must_use]
    pub fn is_noise(&self) -> bool {
        matches!(self, Self::NoCodeInFrame | Self::PatternSearchFailed)
    }
}

/// Resolve raw scanned text into a token id and optional category id.
///
/// # Errors
///
/// Returns [`ScanError::InvalidPayload`] when no non-empty token id results.
pub fn resolve(raw: &str) -> Result<ScanPayload, ScanError> {
    let mut token_id = raw.to_owned();
    let mut category_id = None;

    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(raw) {
        if let Some(id) = truthy_text(&fields, "token_id") {
            token_id = id;
        }
        if let Some(id) = truthy_text(&fields, "category_id") {
            category_id = Some(id);
        }
        if let Some(Value::String(url)) = fields.get("url").filter(|v| is_truthy(v)) {
            apply_url_params(url, &mut token_id, &mut category_id);
        }
    }

    if token_id.is_empty() {
        return Err(ScanError::InvalidPayload);
    }
    Ok(ScanPayload { token_id, category_id })
}

/// Override ids with non-empty `token_id`/`category_id` query parameters.
/// An unparseable URL leaves both untouched.
fn apply_url_params(url: &str, token_id: &mut String, category_id: &mut Option<String>) {
    let Ok(url) = Url::parse(url) else {
        tracing::debug!(url, "ignoring unparseable url in QR payload");
        return;
    };
    if let Some(id) = first_param(&url, "token_id") {
        *token_id = id;
    }
    if let Some(id) = first_param(&url, "category_id") {
        *category_id = Some(id);
    }
}

fn first_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn truthy_text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    let value = fields.get(key).filter(|v| is_truthy(v))?;
    Some(match value {
        Value::String(text) => text.clone(),
        Value::Number(n) => number_text(n),
        other => other.to_string(),
    })
}

/// Whole floats render without a fraction (`5.0` reads as `"5"`, `1e2` as
/// `"100"`), as long as they fit the exactly representable integer range.
fn number_text(n: &Number) -> String {
    const EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < EXACT_LIMIT => {
            #[allow(clippy::cast_possible_truncation)]
            let whole = f as i64;
            whole.to_string()
        }
        _ => n.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
#[path = "scan_test.rs"]
mod tests;
