//! Client-side form checks.
//!
//! Each builder validates raw console input and, when every required field is
//! present, returns the request body to send. A failure lists every failing
//! field at once and means no request is made.

use std::fmt;

use crate::net::types::{
    AdminGenerateRequest, BulkGenerateRequest, CategoryUpdate, LoginRequest, ManualCallRequest, NewCategory,
    NewToken, QrBulkRequest, QrGenerateRequest, QrTemplateRequest, StaffPayload, TokenStatus, VerifyRequest,
};

/// Prefix carried by manually issued tokens.
pub const MANUAL_TOKEN_PREFIX: &str = "MAN";

/// Color given to new categories when none is chosen.
pub const DEFAULT_CATEGORY_COLOR: &str = "#2563EB";

/// Role assigned to every user created from the staff form.
pub const STAFF_ROLE: &str = "staff";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// One or more required fields are missing or malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether `field` is among the failures.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(error.message)?;
        }
        Ok(())
    }
}

/// Accumulates failures so every bad field is reported together.
#[derive(Default)]
struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    fn require(&mut self, field: &'static str, value: &str, message: &'static str) -> &mut Self {
        self.check(field, !value.is_empty(), message)
    }

    fn check(&mut self, field: &'static str, ok: bool, message: &'static str) -> &mut Self {
        if !ok {
            self.errors.push(FieldError { field, message });
        }
        self
    }

    fn finish(&mut self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { errors: std::mem::take(&mut self.errors) })
        }
    }
}

// =============================================================================
// STAFF
// =============================================================================

/// Whether the staff form creates a user or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Raw staff form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Empty on edit means "keep the current password".
    pub password: String,
    pub categories: Vec<String>,
    pub can_scan_qr: bool,
    pub can_generate_qr: bool,
    pub can_view_analytics: bool,
    pub can_verify_qr: bool,
}

/// Validate the staff form and build the create/update body.
///
/// # Errors
///
/// Fails when username or email is empty, when no category is selected, or
/// when creating without a password.
pub fn staff_payload(form: &StaffForm, mode: FormMode) -> Result<StaffPayload, ValidationError> {
    Checks::default()
        .require("username", &form.username, "Username is required")
        .require("email", &form.email, "Email is required")
        .check(
            "password",
            mode == FormMode::Edit || !form.password.is_empty(),
            "Password is required",
        )
        .check("categories", !form.categories.is_empty(), "Select at least one category")
        .finish()?;

    Ok(StaffPayload {
        username: form.username.clone(),
        email: form.email.clone(),
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        password: (!form.password.is_empty()).then(|| form.password.clone()),
        role: STAFF_ROLE.to_owned(),
        category_ids: form.categories.clone(),
        can_scan_qr: form.can_scan_qr,
        can_generate_qr: form.can_generate_qr,
        can_view_analytics: form.can_view_analytics,
        can_verify_qr: form.can_verify_qr,
    })
}

// =============================================================================
// TOKENS
// =============================================================================

/// # Errors
///
/// Fails when no category is selected.
pub fn new_token(category: &str, customer_name: &str, customer_contact: &str) -> Result<NewToken, ValidationError> {
    Checks::default()
        .require("category", category, "Please select a category")
        .finish()?;
    Ok(NewToken {
        category: category.to_owned(),
        customer_name: customer_name.to_owned(),
        customer_contact: customer_contact.to_owned(),
    })
}

/// # Errors
///
/// Fails when no category is selected.
pub fn admin_generate(category: &str, status: TokenStatus) -> Result<AdminGenerateRequest, ValidationError> {
    Checks::default()
        .require("category", category, "Please select a category")
        .finish()?;
    Ok(AdminGenerateRequest { category: category.to_owned(), status })
}

/// # Errors
///
/// Fails when no category is selected or `count` is zero.
pub fn bulk_generate(category: &str, count: u32) -> Result<BulkGenerateRequest, ValidationError> {
    Checks::default()
        .require("category", category, "Please select a category")
        .check("count", count >= 1, "Count must be at least 1")
        .finish()?;
    Ok(BulkGenerateRequest { category: category.to_owned(), count })
}

/// Manual entry from the scanner screen: both ids are required.
///
/// # Errors
///
/// Fails when either id is empty.
pub fn manual_entry(token_id: &str, category_id: &str) -> Result<ManualCallRequest, ValidationError> {
    Checks::default()
        .require("token_id", token_id, "Token ID is required")
        .require("category_id", category_id, "Category is required")
        .finish()?;
    Ok(ManualCallRequest { token_id: token_id.to_owned(), category_id: Some(category_id.to_owned()) })
}

/// Queue-screen manual call by id alone; only manually issued tokens qualify.
///
/// # Errors
///
/// Fails unless the id starts with [`MANUAL_TOKEN_PREFIX`].
pub fn manual_queue_call(token_id: &str) -> Result<ManualCallRequest, ValidationError> {
    Checks::default()
        .check(
            "token_id",
            token_id.starts_with(MANUAL_TOKEN_PREFIX),
            "Token ID must start with 'MAN'",
        )
        .finish()?;
    Ok(ManualCallRequest { token_id: token_id.to_owned(), category_id: None })
}

/// # Errors
///
/// Fails when the token id is empty.
pub fn verify(token_id: &str) -> Result<VerifyRequest, ValidationError> {
    Checks::default()
        .require("token_id", token_id, "Token ID is required")
        .finish()?;
    Ok(VerifyRequest { token_id: token_id.to_owned() })
}

// =============================================================================
// QR CODE MANAGER
// =============================================================================

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(ToOwned::to_owned)
}

/// # Errors
///
/// Fails when the data is empty.
pub fn qr_generate(
    data: &str,
    color: Option<&str>,
    template: Option<&str>,
) -> Result<QrGenerateRequest, ValidationError> {
    Checks::default()
        .require("data", data, "Data is required")
        .finish()?;
    Ok(QrGenerateRequest { data: data.to_owned(), color: non_empty(color), template: non_empty(template) })
}

/// One QR per entry. Blank entries are dropped before the check.
///
/// # Errors
///
/// Fails when no non-blank entry remains.
pub fn qr_bulk<S: AsRef<str>>(entries: &[S]) -> Result<QrBulkRequest, ValidationError> {
    let data: Vec<String> = entries
        .iter()
        .map(|entry| entry.as_ref().trim())
        .filter(|entry| !entry.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    Checks::default()
        .check("data", !data.is_empty(), "Enter at least one line of data")
        .finish()?;
    Ok(QrBulkRequest { data })
}

/// # Errors
///
/// Fails when the template name is empty.
pub fn qr_template(name: &str, color: Option<&str>) -> Result<QrTemplateRequest, ValidationError> {
    Checks::default()
        .require("name", name, "Template name is required")
        .finish()?;
    Ok(QrTemplateRequest { name: name.to_owned(), color: non_empty(color) })
}

// =============================================================================
// CATEGORIES + LOGIN
// =============================================================================

/// # Errors
///
/// Fails when the name is empty.
pub fn new_category(name: &str, color: Option<&str>) -> Result<NewCategory, ValidationError> {
    Checks::default()
        .require("name", name, "Category name is required")
        .finish()?;
    Ok(NewCategory {
        name: name.to_owned(),
        color: color.unwrap_or(DEFAULT_CATEGORY_COLOR).to_owned(),
    })
}

/// # Errors
///
/// Fails when the id or name is empty.
pub fn category_update(id: &str, name: &str, color: Option<&str>) -> Result<CategoryUpdate, ValidationError> {
    Checks::default()
        .require("id", id, "Category id is required")
        .require("name", name, "Category name is required")
        .finish()?;
    Ok(CategoryUpdate {
        id: id.to_owned(),
        name: name.to_owned(),
        color: color.unwrap_or(DEFAULT_CATEGORY_COLOR).to_owned(),
    })
}

/// # Errors
///
/// Fails when username or password is empty.
pub fn login(username: &str, password: &str) -> Result<LoginRequest, ValidationError> {
    Checks::default()
        .require("username", username, "Username is required")
        .require("password", password, "Password is required")
        .finish()?;
    Ok(LoginRequest { username: username.to_owned(), password: password.to_owned() })
}

#[cfg(test)]
#[path = "forms_test.rs"]
mod tests;
