//! REST client for the queue management backend.
//!
//! One typed method per endpoint. Every path is relative to the configured
//! base URL (`.../api/`). Credentials come from the [`AuthContext`] passed
//! at construction.
//!
//! ERROR HANDLING
//! ==============
//! Each call is one request with no retry. A 401 clears the auth context
//! before returning [`ApiError::Unauthorized`]; any other non-2xx becomes
//! [`ApiError::Status`] carrying the backend's `detail`/`error` text.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::auth::AuthContext;
use super::types::*;
use crate::config::{ApiConfig, normalize_base_url};
use crate::dispatch::TokenCaller;
use crate::error::ApiError;

/// Verification outcome filter for the scanner-status monitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerificationFilter {
    #[default]
    All,
    Success,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannerStatusFilter {
    pub verification: VerificationFilter,
    /// Inclusive start date, `YYYY-MM-DD`.
    pub from: Option<String>,
    /// Inclusive end date, `YYYY-MM-DD`.
    pub to: Option<String>,
}

impl ScannerStatusFilter {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        match self.verification {
            VerificationFilter::All => {}
            VerificationFilter::Success => params.push(("status", "SUCCESS".to_owned())),
            VerificationFilter::Failed => params.push(("status", "FAILED".to_owned())),
        }
        if let Some(from) = self.from.as_ref().filter(|v| !v.is_empty()) {
            params.push(("from", from.clone()));
        }
        if let Some(to) = self.to.as_ref().filter(|v| !v.is_empty()) {
            params.push(("to", to.clone()));
        }
        params
    }
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    auth: Arc<dyn AuthContext>,
}

impl ApiClient {
    /// Build a client over the given auth context.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(config: &ApiConfig, auth: Arc<dyn AuthContext>) -> Result<Self, ApiError> {
        let base_url = Url::parse(&normalize_base_url(&config.base_url))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url, auth })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError> {
        let mut request = self.http.get(self.endpoint(path)?);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(path, request).await
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.http.request(method, self.endpoint(path)?);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(path, request).await
    }

    async fn execute<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<T, ApiError> {
        decode_body(&self.fetch(path, request).await?)
    }

    /// Send an authenticated request and return the raw success body.
    async fn fetch(&self, path: &str, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let request = self.auth.attach_auth(path, request)?;
        tracing::debug!(path, "api request");

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(path, "backend rejected credentials; clearing session");
            self.auth.clear();
            return Err(ApiError::Unauthorized { detail: error_detail(&String::from_utf8_lossy(&body)) });
        }
        if !status.is_success() {
            tracing::warn!(path, status = status.as_u16(), "api request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail: error_detail(&String::from_utf8_lossy(&body)),
            });
        }
        Ok(body.to_vec())
    }

    /// Mutating call whose answer is at most a notice; an empty body reads
    /// as an empty [`Ack`].
    async fn acknowledge<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Ack, ApiError>
    where
        B: Serialize + ?Sized,
    {
        Ok(self.send::<B, Option<Ack>>(method, path, body).await?.unwrap_or_default())
    }

    // =========================================================================
    // AUTH + NAVIGATION
    // =========================================================================

    /// Exchange credentials for a bearer token pair (`POST auth/token/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        let body = LoginRequest { username: username.to_owned(), password: password.to_owned() };
        self.send(Method::POST, "auth/token/", Some(&body)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn sidebar(&self) -> Result<Vec<SidebarSection>, ApiError> {
        self.get("sidebar/", &[]).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn admin_dashboard(&self) -> Result<AdminDashboard, ApiError> {
        self.get("admin-dashboard-stats/", &[]).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn staff_dashboard(&self) -> Result<StaffDashboard, ApiError> {
        self.get("staff-dashboard-stats/", &[]).await
    }

    // =========================================================================
    // STAFF
    // =========================================================================

    /// All users visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_users(&self) -> Result<Vec<StaffUser>, ApiError> {
        Ok(self.get::<ListPayload<StaffUser>>("users/", &[]).await?.into_vec())
    }

    /// Users with the `staff` role.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_staff(&self) -> Result<Vec<StaffUser>, ApiError> {
        let mut users = self.list_users().await?;
        users.retain(StaffUser::is_staff);
        Ok(users)
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_staff(&self, payload: &StaffPayload) -> Result<StaffUser, ApiError> {
        self.send(Method::POST, "users/", Some(payload)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_staff(&self, id: &str, payload: &StaffPayload) -> Result<StaffUser, ApiError> {
        self.send(Method::PUT, &format!("users/{id}/"), Some(payload)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_staff(&self, id: &str) -> Result<(), ApiError> {
        self.send::<Value, Value>(Method::DELETE, &format!("users/{id}/"), None)
            .await
            .map(drop)
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn staff_full_stats(&self, id: &str) -> Result<StaffStats, ApiError> {
        self.get(&format!("staff/{id}/full-stats/"), &[]).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn staff_activity(&self, username: &str) -> Result<Vec<StaffActivity>, ApiError> {
        let query = [("username", username.to_owned())];
        Ok(self
            .get::<ListPayload<StaffActivity>>("staff-activity/", &query)
            .await?
            .into_vec())
    }

    // =========================================================================
    // CATEGORIES
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        Ok(self.get::<ListPayload<Category>>("categories/", &[]).await?.into_vec())
    }

    /// Category list readable without logging in.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn public_categories(&self) -> Result<Vec<Category>, ApiError> {
        Ok(self
            .get::<ListPayload<Category>>("users/categories/", &[])
            .await?
            .into_vec())
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn category_settings(&self) -> Result<Vec<Category>, ApiError> {
        Ok(self
            .get::<ListPayload<Category>>("categories/settings/", &[])
            .await?
            .into_vec())
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_category(&self, category: &NewCategory) -> Result<Ack, ApiError> {
        self.acknowledge(Method::POST, "categories/settings/", Some(category)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_category(&self, update: &CategoryUpdate) -> Result<Ack, ApiError> {
        self.acknowledge(Method::PATCH, "categories/settings/", Some(update)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        self.send::<Value, Value>(Method::DELETE, &format!("categories/{id}/"), None)
            .await
            .map(drop)
    }

    // =========================================================================
    // TOKENS
    // =========================================================================

    /// Issue a token for a walk-in customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_token(&self, token: &NewToken) -> Result<Token, ApiError> {
        self.send(Method::POST, "tokens/", Some(token)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn admin_generate(&self, request: &AdminGenerateRequest) -> Result<Value, ApiError> {
        self.send(Method::POST, "tokens/admin_generate/", Some(request)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn bulk_generate(&self, request: &BulkGenerateRequest) -> Result<BulkGenerateResult, ApiError> {
        self.send(Method::POST, "tokens/admin-bulk-generate/", Some(request)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn admin_tokens(&self) -> Result<Vec<Token>, ApiError> {
        self.token_list("tokens/admin-tokens/").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn active_tokens(&self) -> Result<Vec<Token>, ApiError> {
        self.token_list("tokens/active/").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn called_tokens(&self) -> Result<Vec<Token>, ApiError> {
        self.token_list("tokens/tokens/called/").await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn completed_tokens(&self) -> Result<Vec<Token>, ApiError> {
        self.token_list("tokens/completed/").await
    }

    async fn token_list(&self, path: &str) -> Result<Vec<Token>, ApiError> {
        Ok(self.get::<ListPayload<Token>>(path, &[]).await?.into_vec())
    }

    /// Categories the current staff member serves.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn staff_queue(&self) -> Result<StaffQueue, ApiError> {
        self.get("tokens/staff-queue/", &[]).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn my_summary(&self) -> Result<UserSummary, ApiError> {
        self.get("tokens/my-summary/", &[]).await
    }

    /// Advance the caller's queue to the next waiting token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn call_next(&self) -> Result<CallNextResponse, ApiError> {
        self.send::<Value, _>(Method::POST, "tokens/staff-call-next/", None).await
    }

    /// Mark a token as being served now, bypassing queue order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn manual_call(&self, request: &ManualCallRequest) -> Result<ManualCallResponse, ApiError> {
        self.send(Method::POST, "tokens/tokens/manual_call/", Some(request)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn verify(&self, token_id: &str) -> Result<VerifyResult, ApiError> {
        let body = VerifyRequest { token_id: token_id.to_owned() };
        self.send(Method::POST, "tokens/verify-qr/", Some(&body)).await
    }

    // =========================================================================
    // MONITORING
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn live_queue(&self) -> Result<Vec<LiveQueue>, ApiError> {
        Ok(self
            .get::<LiveQueueResponse>("tokens/queue/live/", &[])
            .await?
            .live_queue)
    }

    /// Pause, resume, or clear one category's queue, or all of them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn emergency(&self, request: &EmergencyRequest) -> Result<Ack, ApiError> {
        self.acknowledge(Method::POST, "tokens/queue/emergency/", Some(request)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn scanner_status(&self, filter: &ScannerStatusFilter) -> Result<Vec<ScanRecord>, ApiError> {
        Ok(self
            .get::<ListPayload<ScanRecord>>("scanner-status/", &filter.query())
            .await?
            .into_vec())
    }

    // =========================================================================
    // QR SETTINGS
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn qr_settings(&self) -> Result<QrSettings, ApiError> {
        self.get("tokens/qr-settings/", &[]).await
    }

    /// Save settings and return what the backend stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn save_qr_settings(&self, settings: &QrSettings) -> Result<QrSettings, ApiError> {
        let saved: SavedQrSettings = self.send(Method::POST, "tokens/qr-settings/", Some(settings)).await?;
        Ok(saved.settings)
    }

    // =========================================================================
    // QR CODE MANAGER
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn qr_codes(&self) -> Result<Vec<QrCode>, ApiError> {
        Ok(self.get::<ListPayload<QrCode>>("qr/", &[]).await?.into_vec())
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn qr_templates(&self) -> Result<Vec<QrTemplate>, ApiError> {
        Ok(self.get::<ListPayload<QrTemplate>>("qr/templates/", &[]).await?.into_vec())
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn generate_qr(&self, request: &QrGenerateRequest) -> Result<Ack, ApiError> {
        self.acknowledge(Method::POST, "qr/generate/", Some(request)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn bulk_generate_qr(&self, request: &QrBulkRequest) -> Result<Ack, ApiError> {
        self.acknowledge(Method::POST, "qr/bulk_generate/", Some(request)).await
    }

    /// Ask the backend to verify one managed QR code; the verdict is in `detail`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn verify_qr(&self, id: &str) -> Result<Ack, ApiError> {
        self.acknowledge::<Value>(Method::POST, &format!("qr/{id}/verify/"), None).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn share_qr(&self, id: &str) -> Result<QrShareLink, ApiError> {
        self.get(&format!("qr/{id}/share/"), &[]).await
    }

    /// Rendered image bytes of one managed QR code.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn download_qr(&self, id: &str) -> Result<Vec<u8>, ApiError> {
        let path = format!("qr/{id}/download/");
        self.fetch(&path, self.http.get(self.endpoint(&path)?)).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_qr_template(&self, request: &QrTemplateRequest) -> Result<Ack, ApiError> {
        self.acknowledge(Method::POST, "qr/templates/", Some(request)).await
    }

    /// Fetch a media file such as a token's `qr_image`. Relative locations
    /// resolve against the base URL. Media may live off the API host, so no
    /// credentials are attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the location is invalid or the request fails.
    pub async fn fetch_media(&self, location: &str) -> Result<Vec<u8>, ApiError> {
        let url = self
            .base_url
            .join(location)
            .map_err(|e| ApiError::InvalidUrl(format!("{location}: {e}")))?;
        tracing::debug!(%url, "media request");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(location, status = status.as_u16(), "media request failed");
            return Err(ApiError::Status { status: status.as_u16(), detail: None });
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(body.to_vec())
    }

    // =========================================================================
    // REPORTS
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn daily_report(&self, start_date: &str, end_date: &str) -> Result<DailyReport, ApiError> {
        let query = [("start_date", start_date.to_owned()), ("end_date", end_date.to_owned())];
        self.get("daily-report/", &query).await
    }

    /// Free-form operational metrics; see [`crate::report::flatten_operational`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn operational_report(&self) -> Result<Value, ApiError> {
        self.get("staff-operational-report/", &[]).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn scan_activity(&self) -> Result<Vec<ActivityRecord>, ApiError> {
        Ok(self
            .get::<ListPayload<ActivityRecord>>("tokens/scan-activity/", &[])
            .await?
            .into_vec())
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn verification_logs(&self) -> Result<Vec<ActivityRecord>, ApiError> {
        Ok(self
            .get::<ListPayload<ActivityRecord>>("tokens/verification-logs/", &[])
            .await?
            .into_vec())
    }
}

#[async_trait::async_trait]
impl TokenCaller for ApiClient {
    async fn manual_call(&self, request: &ManualCallRequest) -> Result<ManualCallResponse, ApiError> {
        ApiClient::manual_call(self, request).await
    }
}

/// Pull a human-readable reason out of an error body (`detail`, then `error`).
fn error_detail(body: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    ["detail", "error"].iter().find_map(|key| match value.get(*key)? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    })
}

/// Decode a success body; an empty body reads as JSON `null`.
fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) { b"null" } else { body };
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
