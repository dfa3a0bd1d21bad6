use serde_json::json;

use super::*;

fn staff(name: &str, waiting: u64, completed: u64) -> StaffSummary {
    StaffSummary {
        staff: name.to_owned(),
        waiting_tokens: Some(waiting),
        completed_tokens: Some(completed),
        success_verifications: Some(1),
        failed_verifications: None,
    }
}

fn category(name: &str, total: u64, assigned: &[&str]) -> CategoryReport {
    CategoryReport {
        category: name.to_owned(),
        total_qr: Some(total),
        staff_assigned: assigned.iter().map(|s| (*s).to_owned()).collect(),
    }
}

// =============================================================================
// csv
// =============================================================================

#[test]
fn empty_report_exports_empty_csv() {
    assert_eq!(daily_report_csv(&DailyReport::default()), "");
}

#[test]
fn staff_rows_set_header_and_blank_category_rows() {
    let report = DailyReport {
        staff_summary: vec![staff("alice", 2, 5), staff("bob", 0, 3)],
        categories: vec![category("Lab", 9, &["alice", "bob"])],
        ..DailyReport::default()
    };
    assert_eq!(
        daily_report_csv(&report),
        "Staff,Waiting_Tokens,Completed_Tokens,Success,Failed\n\
         alice,2,5,1,\n\
         bob,0,3,1,\n\
         ,,,,"
    );
}

#[test]
fn category_only_report_uses_category_header() {
    let report = DailyReport {
        categories: vec![category("Lab", 9, &["alice", "bob"]), category("X-Ray", 0, &[])],
        ..DailyReport::default()
    };
    assert_eq!(
        daily_report_csv(&report),
        "Category,Total_QR,Staff_Assigned\nLab,9,alice, bob\nX-Ray,0,"
    );
}

#[test]
fn filename_embeds_range() {
    assert_eq!(
        daily_report_filename("2025-09-01", "2025-09-02", "csv"),
        "daily_report_2025-09-01_to_2025-09-02.csv"
    );
}

// =============================================================================
// summary
// =============================================================================

#[test]
fn summary_lists_totals_staff_and_categories() {
    let report = DailyReport {
        total_qr_codes: Some(12),
        completed_qr_codes: Some(8),
        success_verifications: Some(7),
        failed_verifications: None,
        staff_summary: vec![staff("alice", 2, 5)],
        categories: vec![category("Lab", 9, &["alice"])],
    };
    let lines = daily_summary_lines(&report, "2025-09-01", "2025-09-01");
    assert_eq!(
        lines,
        [
            "Daily Report",
            "Date Range: 2025-09-01 to 2025-09-01",
            "Total QR Codes: 12",
            "Completed QR Codes: 8",
            "Success Verifications: 7",
            "Failed Verifications: -",
            "alice: Waiting 2, Completed 5, Success 1, Failed -",
            "Lab: Total QR 9, Staff Assigned: alice",
        ]
    );
}

#[test]
fn today_is_iso_date() {
    let today = today();
    assert_eq!(today.len(), 10);
    assert_eq!(today.as_bytes()[4], b'-');
    assert_eq!(today.as_bytes()[7], b'-');
}

// =============================================================================
// operational
// =============================================================================

#[test]
fn operational_report_flattens_one_level() {
    let data = json!({
        "total_scans": 40,
        "tokens": { "waiting": 3, "completed": 10 },
        "top_staff": ["alice", "bob"],
        "note": null
    });
    let rows = flatten_operational(&data);
    let pairs: Vec<(&str, Value)> = rows.iter().map(|r| (r.metric.as_str(), r.value.clone())).collect();
    assert_eq!(
        pairs,
        [
            ("total_scans", json!(40)),
            ("tokens → waiting", json!(3)),
            ("tokens → completed", json!(10)),
            ("top_staff → 0", json!("alice")),
            ("top_staff → 1", json!("bob")),
            ("note", Value::Null),
        ]
    );
}

#[test]
fn nested_values_beyond_one_level_stay_whole() {
    let rows = flatten_operational(&json!({ "by_category": { "Lab": { "waiting": 1 } } }));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].metric, "by_category → Lab");
    assert_eq!(rows[0].value, json!({ "waiting": 1 }));
}

#[test]
fn non_object_operational_report_is_empty() {
    assert!(flatten_operational(&json!("n/a")).is_empty());
}
