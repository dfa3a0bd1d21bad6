//! Wire DTOs for the queue management REST API.
//!
//! DESIGN
//! ======
//! The backend omits fields freely and is inconsistent about shapes (a
//! token's category may be a bare id or an embedded object; list endpoints
//! may or may not paginate). Every optional field is an explicit `Option` and
//! every shape variant is an enum, so callers handle present/absent cases
//! instead of probing JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// SHARED SHAPES
// =============================================================================

/// Backend primary key: integer or string depending on the endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(i64),
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// List endpoints answer with either a bare array or a `{ "results": [...] }` page.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Items(Vec<T>),
    Page {
        #[serde(default = "Vec::new")]
        results: Vec<T>,
    },
}

impl<T> ListPayload<T> {
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Items(items) | Self::Page { results: items } => items,
        }
    }
}

/// Acknowledgement body for mutating endpoints that answer with a notice.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub detail: Option<String>,
    pub message: Option<String>,
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Bearer token pair returned by `auth/token/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

// =============================================================================
// CATEGORIES
// =============================================================================

/// A service line that owns its own token queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Identifier,
    #[serde(default)]
    pub name: String,
    pub color: Option<String>,
}

/// Embedded category reference carried on tokens and queue groups.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBrief {
    pub id: Option<Identifier>,
    pub name: Option<String>,
}

/// A token's category: either the bare key or an embedded object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(Identifier),
    Brief(CategoryBrief),
}

impl CategoryRef {
    #[must_use]
    pub fn id(&self) -> Option<String> {
        match self {
            Self::Id(id) => Some(id.to_string()),
            Self::Brief(brief) => brief.id.as_ref().map(ToString::to_string),
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Brief(brief) => brief.name.as_deref(),
        }
    }

    /// Human-readable label: the name when embedded, otherwise the key.
    #[must_use]
    pub fn label(&self) -> String {
        self.name().map_or_else(|| self.id().unwrap_or_default(), ToOwned::to_owned)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub id: String,
    pub name: String,
    pub color: String,
}

// =============================================================================
// TOKENS
// =============================================================================

/// Lifecycle state of a queue ticket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TokenStatus {
    Waiting,
    Called,
    Completed,
    /// Any status string this client does not know about.
    Other(String),
}

impl TokenStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Waiting => "waiting",
            Self::Called => "called",
            Self::Completed => "completed",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for TokenStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "waiting" => Self::Waiting,
            "called" => Self::Called,
            "completed" => Self::Completed,
            _ => Self::Other(raw),
        }
    }
}

impl From<TokenStatus> for String {
    fn from(status: TokenStatus) -> Self {
        status.as_str().to_owned()
    }
}

impl fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A queue ticket as listed by the token endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub token_id: String,
    pub id: Option<Identifier>,
    pub category: Option<CategoryRef>,
    pub category_name: Option<String>,
    pub status: Option<TokenStatus>,
    pub issued_at: Option<String>,
    pub queue_position: Option<i64>,
    /// QR image URL (list endpoints).
    pub qr_image: Option<String>,
    /// QR image data URI (create endpoint).
    pub qr_code: Option<String>,
    pub customer_name: Option<String>,
    pub customer_contact: Option<String>,
}

impl Token {
    /// Category label preferring the flat `category_name` field.
    #[must_use]
    pub fn category_label(&self) -> Option<String> {
        self.category_name
            .clone()
            .or_else(|| self.category.as_ref().map(CategoryRef::label))
    }

    #[must_use]
    pub fn has_status(&self, status: &TokenStatus) -> bool {
        self.status.as_ref() == Some(status)
    }

    /// Where the token's QR image lives: the inline data URI from token
    /// creation, else the image URL from list endpoints.
    #[must_use]
    pub fn qr_source(&self) -> Option<&str> {
        self.qr_code
            .as_deref()
            .or(self.qr_image.as_deref())
            .filter(|source| !source.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewToken {
    pub category: String,
    pub customer_name: String,
    pub customer_contact: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminGenerateRequest {
    pub category: String,
    pub status: TokenStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkGenerateRequest {
    pub category: String,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkGenerateResult {
    pub count: Option<u64>,
    #[serde(default)]
    pub created: Vec<Token>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualCallRequest {
    pub token_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualCallResponse {
    pub token_id: Option<String>,
    pub status: Option<TokenStatus>,
    pub detail: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallNextResponse {
    pub token_id: Option<String>,
    pub category: Option<CategoryRef>,
    pub category_name: Option<String>,
    pub status: Option<TokenStatus>,
    pub detail: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub token_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResult {
    pub token_id: Option<String>,
    #[serde(default)]
    pub verified: bool,
    pub verification_status: Option<String>,
    pub status: Option<TokenStatus>,
    pub category: Option<CategoryRef>,
    pub qr_image: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffQueue {
    #[serde(default)]
    pub staff_queue: Vec<Category>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

// =============================================================================
// LIVE QUEUE + MONITORING
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveQueueResponse {
    #[serde(default)]
    pub live_queue: Vec<LiveQueue>,
}

/// One category's slice of the live queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveQueue {
    pub category: Option<CategoryBrief>,
    #[serde(default)]
    pub tokens: Vec<Token>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmergencyAction {
    Pause,
    Resume,
    Clear,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyRequest {
    pub action: EmergencyAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

/// Row of the scanner-status monitor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub token_id: Option<String>,
    pub status: Option<String>,
    pub category: Option<CategoryRef>,
    pub scanned_by: Option<String>,
    pub scan_time: Option<String>,
    pub verification_status: Option<String>,
}

// =============================================================================
// STAFF
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffUser {
    pub id: Identifier,
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    #[serde(default)]
    pub categories: Vec<Identifier>,
    #[serde(default)]
    pub can_scan_qr: bool,
    #[serde(default)]
    pub can_generate_qr: bool,
    #[serde(default)]
    pub can_view_analytics: bool,
    #[serde(default)]
    pub can_verify_qr: bool,
}

impl StaffUser {
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.role.as_deref() == Some("staff")
    }
}

/// Body for staff create/update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffPayload {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Omitted on update when unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: String,
    pub category_ids: Vec<String>,
    pub can_scan_qr: bool,
    pub can_generate_qr: bool,
    pub can_view_analytics: bool,
    pub can_verify_qr: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffStats {
    #[serde(default)]
    pub categories: Vec<Identifier>,
    pub active_tokens: Option<u64>,
    pub completed_tokens: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffActivity {
    pub id: Option<Identifier>,
    pub scan_id: Option<Identifier>,
    pub token_id: Option<String>,
    pub category: Option<CategoryRef>,
    pub scan_time: Option<String>,
    pub verification_status: Option<String>,
}

// =============================================================================
// DASHBOARDS + NAVIGATION
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub full_name: Option<String>,
    pub total_tokens: Option<u64>,
    pub total_waiting: Option<u64>,
    pub total_called: Option<u64>,
    pub total_completed: Option<u64>,
    pub total_qr_codes: Option<u64>,
    pub total_scans: Option<u64>,
    pub total_success: Option<u64>,
    pub total_failed: Option<u64>,
    pub success_rate: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StaffDashboard {
    pub full_name: Option<String>,
    pub total_tokens: Option<u64>,
    pub active_tokens: Option<u64>,
    pub completed_tokens: Option<u64>,
    pub total_qr_codes: Option<u64>,
    pub total_scans: Option<u64>,
    pub successful_scans: Option<u64>,
    pub failed_scans: Option<u64>,
    pub success_rate: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarSection {
    pub id: Option<Identifier>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub items: Vec<SidebarItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarItem {
    pub id: Option<Identifier>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

// =============================================================================
// QR SETTINGS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrSettings {
    pub size: u32,
    pub border: u32,
    /// One of `L`, `M`, `Q`, `H`.
    pub error_correction: String,
    pub expiry_hours: u32,
    pub generation_start_time: String,
    pub generation_end_time: String,
    pub daily_reset: bool,
}

impl Default for QrSettings {
    fn default() -> Self {
        Self {
            size: 256,
            border: 4,
            error_correction: "M".to_owned(),
            expiry_hours: 24,
            generation_start_time: "09:00".to_owned(),
            generation_end_time: "18:00".to_owned(),
            daily_reset: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQrSettings {
    pub settings: QrSettings,
}

// =============================================================================
// QR CODE MANAGER
// =============================================================================

/// Free-form QR code managed outside the token queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrCode {
    pub id: Identifier,
    pub data: Option<String>,
    pub color: Option<String>,
    pub template: Option<Identifier>,
    pub template_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrTemplate {
    pub id: Identifier,
    #[serde(default)]
    pub name: String,
    pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrGenerateRequest {
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Template id; absent renders with the backend's plain style.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrBulkRequest {
    pub data: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrTemplateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrShareLink {
    pub share_url: String,
}

// =============================================================================
// REPORTS
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReport {
    pub total_qr_codes: Option<u64>,
    pub completed_qr_codes: Option<u64>,
    pub success_verifications: Option<u64>,
    pub failed_verifications: Option<u64>,
    #[serde(default)]
    pub staff_summary: Vec<StaffSummary>,
    #[serde(default)]
    pub categories: Vec<CategoryReport>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffSummary {
    #[serde(default)]
    pub staff: String,
    pub waiting_tokens: Option<u64>,
    pub completed_tokens: Option<u64>,
    pub success_verifications: Option<u64>,
    pub failed_verifications: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryReport {
    #[serde(default)]
    pub category: String,
    pub total_qr: Option<u64>,
    #[serde(default)]
    pub staff_assigned: Vec<String>,
}

/// Row of the scan-activity or verification-log report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub token_id: Option<String>,
    pub token_category: Option<String>,
    pub scan_time: Option<String>,
    pub scanner_name: Option<String>,
    pub verifier_name: Option<String>,
    pub ip_address: Option<String>,
    pub device_type: Option<String>,
    pub scan_result: Option<String>,
    pub verification_result: Option<String>,
}

impl ActivityRecord {
    /// Who performed the action, whichever report the row came from.
    #[must_use]
    pub fn actor(&self) -> Option<&str> {
        self.scanner_name.as_deref().or(self.verifier_name.as_deref())
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&str> {
        self.scan_result.as_deref().or(self.verification_result.as_deref())
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
