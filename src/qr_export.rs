//! QR image export.
//!
//! A token's image arrives either inline as a `data:` URI (token creation)
//! or as a media URL (list endpoints). Either way it lands on disk as
//! `qr_{id}.png` in the chosen directory.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::ApiError;
use crate::net::api::ApiClient;
use crate::net::types::Token;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("invalid data URI: {0}")]
    DataUri(String),

    #[error("write {path} failed: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_auth_failure())
    }
}

/// Where an image's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// Decoded `data:` URI payload.
    Inline { media_type: &'a str, bytes: Vec<u8> },
    /// Absolute URL or a location relative to the API base.
    Remote(&'a str),
}

impl<'a> ImageSource<'a> {
    /// # Errors
    ///
    /// Fails on a `data:` URI that has no payload separator, is not base64,
    /// or does not decode.
    pub fn parse(raw: &'a str) -> Result<Self, ExportError> {
        let Some(rest) = raw.strip_prefix("data:") else {
            return Ok(Self::Remote(raw));
        };
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| ExportError::DataUri("missing ',' before payload".to_owned()))?;
        let media_type = meta
            .strip_suffix(";base64")
            .ok_or_else(|| ExportError::DataUri("only base64 payloads are supported".to_owned()))?;
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| ExportError::DataUri(e.to_string()))?;
        Ok(Self::Inline { media_type, bytes })
    }
}

/// `qr_{id}.png`, with anything outside `[A-Za-z0-9_-]` replaced so the id
/// cannot escape the export directory.
#[must_use]
pub fn qr_image_filename(id: &str) -> String {
    let safe: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("qr_{safe}.png")
}

/// Resolve an image source to bytes, fetching remote ones through `client`.
///
/// # Errors
///
/// Fails when the data URI is malformed or the fetch fails.
pub async fn load_image(client: &ApiClient, source: &str) -> Result<Vec<u8>, ExportError> {
    match ImageSource::parse(source)? {
        ImageSource::Inline { bytes, .. } => Ok(bytes),
        ImageSource::Remote(location) => Ok(client.fetch_media(location).await?),
    }
}

/// # Errors
///
/// Fails when the file cannot be written.
pub fn write_image(dir: &Path, id: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    let path = dir.join(qr_image_filename(id));
    std::fs::write(&path, bytes).map_err(|source| ExportError::Write { path: path.clone(), source })?;
    Ok(path)
}

/// Write the QR image of every token that has one and return the paths
/// written. Stops at the first failure.
///
/// # Errors
///
/// Fails when an image cannot be loaded or written.
pub async fn export_token_images(
    client: &ApiClient,
    tokens: &[Token],
    dir: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
    let mut written = Vec::new();
    for token in tokens {
        let Some(source) = token.qr_source() else {
            tracing::debug!(token_id = %token.token_id, "token has no QR image");
            continue;
        };
        let bytes = load_image(client, source).await?;
        written.push(write_image(dir, &token.token_id, &bytes)?);
    }
    tracing::info!(count = written.len(), dir = %dir.display(), "exported QR images");
    Ok(written)
}

#[cfg(test)]
#[path = "qr_export_test.rs"]
mod tests;
