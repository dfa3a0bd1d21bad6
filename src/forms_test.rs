use super::*;

fn staff_form() -> StaffForm {
    StaffForm {
        username: "alice".to_owned(),
        email: "alice@example.test".to_owned(),
        password: "s3cret".to_owned(),
        categories: vec!["1".to_owned(), "4".to_owned()],
        can_scan_qr: true,
        ..StaffForm::default()
    }
}

// =============================================================================
// staff
// =============================================================================

#[test]
fn staff_create_builds_staff_role_payload() {
    let payload = staff_payload(&staff_form(), FormMode::Create).unwrap();
    assert_eq!(payload.role, "staff");
    assert_eq!(payload.category_ids, ["1", "4"]);
    assert_eq!(payload.password.as_deref(), Some("s3cret"));
    assert!(payload.can_scan_qr);
}

#[test]
fn staff_create_requires_password() {
    let form = StaffForm { password: String::new(), ..staff_form() };
    let err = staff_payload(&form, FormMode::Create).unwrap_err();
    assert!(err.has("password"));
    assert_eq!(err.errors().len(), 1);
}

#[test]
fn staff_edit_without_password_omits_it() {
    let form = StaffForm { password: String::new(), ..staff_form() };
    let payload = staff_payload(&form, FormMode::Edit).unwrap();
    assert!(payload.password.is_none());
}

#[test]
fn staff_reports_every_missing_field() {
    let err = staff_payload(&StaffForm::default(), FormMode::Create).unwrap_err();
    let fields: Vec<_> = err.errors().iter().map(|e| e.field).collect();
    assert_eq!(fields, ["username", "email", "password", "categories"]);
    assert_eq!(
        err.to_string(),
        "Username is required; Email is required; Password is required; Select at least one category"
    );
}

// =============================================================================
// tokens
// =============================================================================

#[test]
fn token_creation_requires_category() {
    assert!(new_token("", "Jo", "555").unwrap_err().has("category"));
    let token = new_token("3", "Jo", "").unwrap();
    assert_eq!(token.category, "3");
    assert!(token.customer_contact.is_empty());
}

#[test]
fn bulk_generation_checks_count() {
    let err = bulk_generate("", 0).unwrap_err();
    assert!(err.has("category"));
    assert!(err.has("count"));
    assert_eq!(bulk_generate("2", 25).unwrap().count, 25);
}

#[test]
fn admin_generate_requires_category() {
    assert!(admin_generate("", TokenStatus::Waiting).is_err());
    assert_eq!(admin_generate("7", TokenStatus::Called).unwrap().status, TokenStatus::Called);
}

#[test]
fn manual_entry_requires_both_ids() {
    let err = manual_entry("", "").unwrap_err();
    assert!(err.has("token_id") && err.has("category_id"));
    let request = manual_entry("T5", "2").unwrap();
    assert_eq!(request.category_id.as_deref(), Some("2"));
}

#[test]
fn queue_manual_call_needs_man_prefix() {
    assert!(manual_queue_call("T-100").is_err());
    assert!(manual_queue_call("man-1").is_err());
    assert!(manual_queue_call("").is_err());
    let request = manual_queue_call("MAN-001").unwrap();
    assert_eq!(request.token_id, "MAN-001");
    assert!(request.category_id.is_none());
}

#[test]
fn verify_requires_token_id() {
    assert!(verify("").is_err());
    assert_eq!(verify("T1").unwrap().token_id, "T1");
}

// =============================================================================
// qr code manager
// =============================================================================

#[test]
fn qr_generate_requires_data_and_drops_empty_style() {
    assert!(qr_generate("", None, None).unwrap_err().has("data"));
    let request = qr_generate("https://clinic.test/a", Some(""), Some("4")).unwrap();
    assert_eq!(request.color, None);
    assert_eq!(request.template.as_deref(), Some("4"));
}

#[test]
fn qr_bulk_skips_blank_lines() {
    let request = qr_bulk(&["alpha", "  ", "", " beta "]).unwrap();
    assert_eq!(request.data, ["alpha", "beta"]);
    assert!(qr_bulk(&["", " "]).unwrap_err().has("data"));
    assert!(qr_bulk::<&str>(&[]).is_err());
}

#[test]
fn qr_template_requires_name() {
    assert!(qr_template("", Some("#FF0000")).unwrap_err().has("name"));
    assert_eq!(qr_template("Brand", Some("#FF0000")).unwrap().color.as_deref(), Some("#FF0000"));
}

// =============================================================================
// categories + login
// =============================================================================

#[test]
fn category_name_required_and_color_defaults() {
    assert!(new_category("", None).unwrap_err().has("name"));
    assert_eq!(new_category("Lab", None).unwrap().color, DEFAULT_CATEGORY_COLOR);
    assert_eq!(new_category("Lab", Some("#000000")).unwrap().color, "#000000");
    assert!(category_update("", "Lab", None).unwrap_err().has("id"));
}

#[test]
fn login_requires_both_fields() {
    let err = login("", "").unwrap_err();
    assert_eq!(err.errors().len(), 2);
    assert_eq!(login("admin", "pw").unwrap().username, "admin");
}
