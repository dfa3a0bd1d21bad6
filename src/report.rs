//! Report export.
//!
//! The daily report is exported as CSV text and as a plain line summary. Both
//! are pure functions of the fetched [`DailyReport`]; nothing is re-queried.
//!
//! CSV FORMAT
//! ==========
//! Staff rows and category rows share one table. The header is the column set
//! of the first row, and every later row is rendered against that header, so
//! when staff rows are present the category rows come out blank. Values are
//! written raw with no quoting; missing values are empty.

use serde::Serialize;
use serde_json::Value;

use crate::net::types::{CategoryReport, DailyReport, StaffSummary};

/// Separator between a section and its key in flattened metric names.
pub const METRIC_SEPARATOR: &str = " → ";

/// One CSV row: ordered `(column, value)` pairs.
type CsvRow = Vec<(&'static str, Option<String>)>;

fn staff_row(staff: &StaffSummary) -> CsvRow {
    vec![
        ("Staff", Some(staff.staff.clone())),
        ("Waiting_Tokens", staff.waiting_tokens.map(|n| n.to_string())),
        ("Completed_Tokens", staff.completed_tokens.map(|n| n.to_string())),
        ("Success", staff.success_verifications.map(|n| n.to_string())),
        ("Failed", staff.failed_verifications.map(|n| n.to_string())),
    ]
}

fn category_row(category: &CategoryReport) -> CsvRow {
    vec![
        ("Category", Some(category.category.clone())),
        ("Total_QR", category.total_qr.map(|n| n.to_string())),
        ("Staff_Assigned", Some(category.staff_assigned.join(", "))),
    ]
}

fn render_csv(rows: &[CsvRow]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let header: Vec<&str> = first.iter().map(|(column, _)| *column).collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(header.join(","));
    for row in rows {
        let cells: Vec<&str> = header
            .iter()
            .map(|column| {
                row.iter()
                    .find(|(name, _)| name == column)
                    .and_then(|(_, value)| value.as_deref())
                    .unwrap_or_default()
            })
            .collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

/// Render the daily report as CSV text. An empty report yields `""`.
#[must_use]
pub fn daily_report_csv(report: &DailyReport) -> String {
    let rows: Vec<CsvRow> = report
        .staff_summary
        .iter()
        .map(staff_row)
        .chain(report.categories.iter().map(category_row))
        .collect();
    render_csv(&rows)
}

/// Export file name for a date range, e.g. `daily_report_2025-09-01_to_2025-09-02.csv`.
#[must_use]
pub fn daily_report_filename(start: &str, end: &str, ext: &str) -> String {
    format!("daily_report_{start}_to_{end}.{ext}")
}

fn count(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_owned(), |n| n.to_string())
}

/// Printable summary of the daily report: title, range, totals, then one
/// line per staff member and per category.
#[must_use]
pub fn daily_summary_lines(report: &DailyReport, start: &str, end: &str) -> Vec<String> {
    let mut lines = vec![
        "Daily Report".to_owned(),
        format!("Date Range: {start} to {end}"),
        format!("Total QR Codes: {}", count(report.total_qr_codes)),
        format!("Completed QR Codes: {}", count(report.completed_qr_codes)),
        format!("Success Verifications: {}", count(report.success_verifications)),
        format!("Failed Verifications: {}", count(report.failed_verifications)),
    ];
    lines.extend(report.staff_summary.iter().map(|staff| {
        format!(
            "{}: Waiting {}, Completed {}, Success {}, Failed {}",
            staff.staff,
            count(staff.waiting_tokens),
            count(staff.completed_tokens),
            count(staff.success_verifications),
            count(staff.failed_verifications),
        )
    }));
    lines.extend(report.categories.iter().map(|category| {
        format!(
            "{}: Total QR {}, Staff Assigned: {}",
            category.category,
            count(category.total_qr),
            category.staff_assigned.join(", "),
        )
    }));
    lines
}

/// Today's UTC date as `YYYY-MM-DD`, the default report range bound.
#[must_use]
pub fn today() -> String {
    time::OffsetDateTime::now_utc().date().to_string()
}

// =============================================================================
// OPERATIONAL REPORT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub metric: String,
    pub value: Value,
}

/// Flatten the free-form operational report into metric rows.
///
/// Scalar entries become one row each. Object (or array) entries expand one
/// level into `"{section} → {key}"` rows; deeper values are kept whole.
#[must_use]
pub fn flatten_operational(data: &Value) -> Vec<MetricRow> {
    entries(data)
        .into_iter()
        .flat_map(|(section, value)| match value {
            Value::Object(_) | Value::Array(_) => entries(value)
                .into_iter()
                .map(|(key, sub)| MetricRow { metric: format!("{section}{METRIC_SEPARATOR}{key}"), value: sub.clone() })
                .collect(),
            scalar => vec![MetricRow { metric: section, value: scalar.clone() }],
        })
        .collect()
}

/// Key/value pairs of an object, or index/value pairs of an array.
fn entries(value: &Value) -> Vec<(String, &Value)> {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items.iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
