use super::*;
use serde_json::json;

// =============================================================
// Identifier
// =============================================================

#[test]
fn identifier_accepts_number_and_text() {
    let n: Identifier = serde_json::from_value(json!(7)).unwrap();
    let s: Identifier = serde_json::from_value(json!("cat-7")).unwrap();
    assert_eq!(n, Identifier::Number(7));
    assert_eq!(s, Identifier::Text("cat-7".to_owned()));
    assert_eq!(n.to_string(), "7");
    assert_eq!(s.to_string(), "cat-7");
}

// =============================================================
// ListPayload
// =============================================================

#[test]
fn list_payload_accepts_bare_array() {
    let list: ListPayload<Category> = serde_json::from_value(json!([
        { "id": 1, "name": "Pharmacy", "color": "#ff0000" }
    ]))
    .unwrap();
    let items = list.into_vec();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Pharmacy");
}

#[test]
fn list_payload_accepts_results_page() {
    let list: ListPayload<Category> = serde_json::from_value(json!({
        "count": 1,
        "results": [{ "id": 2, "name": "Lab" }]
    }))
    .unwrap();
    let items = list.into_vec();
    assert_eq!(items[0].id, Identifier::Number(2));
    assert!(items[0].color.is_none());
}

#[test]
fn list_payload_object_without_results_is_empty() {
    let list: ListPayload<Category> = serde_json::from_value(json!({ "detail": "nothing" })).unwrap();
    assert!(list.into_vec().is_empty());
}

// =============================================================
// TokenStatus
// =============================================================

#[test]
fn token_status_round_trips_known_values() {
    for (raw, status) in [
        ("waiting", TokenStatus::Waiting),
        ("called", TokenStatus::Called),
        ("completed", TokenStatus::Completed),
    ] {
        let parsed: TokenStatus = serde_json::from_value(json!(raw)).unwrap();
        assert_eq!(parsed, status);
        assert_eq!(serde_json::to_value(&status).unwrap(), json!(raw));
    }
}

#[test]
fn token_status_keeps_unknown_values() {
    let parsed: TokenStatus = serde_json::from_value(json!("expired")).unwrap();
    assert_eq!(parsed, TokenStatus::Other("expired".to_owned()));
    assert_eq!(parsed.to_string(), "expired");
}

// =============================================================
// Token + CategoryRef
// =============================================================

#[test]
fn token_with_embedded_category_object() {
    let token: Token = serde_json::from_value(json!({
        "token_id": "T-100",
        "category": { "id": 3, "name": "Billing" },
        "status": "called",
        "queue_position": 2
    }))
    .unwrap();
    assert_eq!(token.category_label().as_deref(), Some("Billing"));
    assert_eq!(token.category.as_ref().and_then(CategoryRef::id).as_deref(), Some("3"));
    assert!(token.has_status(&TokenStatus::Called));
    assert_eq!(token.queue_position, Some(2));
}

#[test]
fn token_with_bare_category_id_prefers_category_name() {
    let token: Token = serde_json::from_value(json!({
        "token_id": "T-101",
        "category": 4,
        "category_name": "Radiology",
        "issued_at": "2025-09-21T09:00:00Z"
    }))
    .unwrap();
    assert_eq!(token.category_label().as_deref(), Some("Radiology"));
    assert!(token.status.is_none());
}

#[test]
fn token_minimal_payload() {
    let token: Token = serde_json::from_value(json!({ "token_id": "T-1" })).unwrap();
    assert!(token.category.is_none());
    assert!(token.category_label().is_none());
}

#[test]
fn category_ref_label_falls_back_to_id() {
    let bare = CategoryRef::Id(Identifier::Number(9));
    assert_eq!(bare.label(), "9");
    let unnamed = CategoryRef::Brief(CategoryBrief { id: Some(Identifier::Number(5)), name: None });
    assert_eq!(unnamed.label(), "5");
}

// =============================================================
// Request bodies
// =============================================================

#[test]
fn manual_call_request_omits_absent_category() {
    let body = ManualCallRequest { token_id: "MAN-1".to_owned(), category_id: None };
    assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "token_id": "MAN-1" }));

    let body = ManualCallRequest { token_id: "T1".to_owned(), category_id: Some("5".to_owned()) };
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({ "token_id": "T1", "category_id": "5" })
    );
}

#[test]
fn emergency_request_serializes_lowercase_action() {
    let body = EmergencyRequest { action: EmergencyAction::Pause, category_id: None };
    assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "action": "pause" }));
}

#[test]
fn staff_payload_skips_missing_password() {
    let body = StaffPayload {
        username: "alice".to_owned(),
        email: "alice@example.test".to_owned(),
        first_name: String::new(),
        last_name: String::new(),
        password: None,
        role: "staff".to_owned(),
        category_ids: vec!["1".to_owned()],
        can_scan_qr: true,
        can_generate_qr: false,
        can_view_analytics: false,
        can_verify_qr: true,
    };
    let value = serde_json::to_value(&body).unwrap();
    assert!(value.get("password").is_none());
    assert_eq!(value["category_ids"], json!(["1"]));
}

// =============================================================
// Reports + settings
// =============================================================

#[test]
fn qr_settings_fill_missing_fields_with_defaults() {
    let settings: QrSettings = serde_json::from_value(json!({ "size": 512 })).unwrap();
    assert_eq!(settings.size, 512);
    assert_eq!(settings.border, 4);
    assert_eq!(settings.error_correction, "M");
}

#[test]
fn daily_report_tolerates_missing_sections() {
    let report: DailyReport = serde_json::from_value(json!({ "total_qr_codes": 10 })).unwrap();
    assert_eq!(report.total_qr_codes, Some(10));
    assert!(report.staff_summary.is_empty());
    assert!(report.categories.is_empty());
}

#[test]
fn activity_record_actor_covers_both_reports() {
    let scan = ActivityRecord { scanner_name: Some("bob".to_owned()), ..ActivityRecord::default() };
    let verify = ActivityRecord {
        verifier_name: Some("eve".to_owned()),
        verification_result: Some("SUCCESS".to_owned()),
        ..ActivityRecord::default()
    };
    assert_eq!(scan.actor(), Some("bob"));
    assert_eq!(verify.actor(), Some("eve"));
    assert_eq!(verify.outcome(), Some("SUCCESS"));
}

#[test]
fn staff_user_role_check() {
    let user: StaffUser = serde_json::from_value(json!({
        "id": 1, "username": "alice", "role": "staff", "categories": [1, 2]
    }))
    .unwrap();
    assert!(user.is_staff());
    assert!(!user.can_scan_qr);
    assert_eq!(user.categories.len(), 2);
}

#[test]
fn qr_source_prefers_inline_data_uri() {
    let token: Token = serde_json::from_value(json!({
        "token_id": "T1",
        "qr_code": "data:image/png;base64,iVBO",
        "qr_image": "/media/qr/T1.png"
    }))
    .unwrap();
    assert_eq!(token.qr_source(), Some("data:image/png;base64,iVBO"));

    let listed: Token = serde_json::from_value(json!({ "token_id": "T2", "qr_image": "/media/qr/T2.png" })).unwrap();
    assert_eq!(listed.qr_source(), Some("/media/qr/T2.png"));

    let bare: Token = serde_json::from_value(json!({ "token_id": "T3", "qr_image": "" })).unwrap();
    assert_eq!(bare.qr_source(), None);
}

#[test]
fn qr_generate_request_omits_unset_style() {
    let request = QrGenerateRequest { data: "hello".to_owned(), color: None, template: None };
    assert_eq!(serde_json::to_value(&request).unwrap(), json!({ "data": "hello" }));
}
