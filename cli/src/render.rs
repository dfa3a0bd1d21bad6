//! Plain-text rendering for console output when `--json` is not set.

use queuedesk::net::types::{
    ActivityRecord, Category, LiveQueue, QrCode, QrTemplate, ScanRecord, SidebarSection, StaffActivity, StaffUser,
    Token, TokenStatus,
};
use queuedesk::report::MetricRow;
use serde::Serialize;
use serde_json::Value;

const NONE: &str = "-";

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(NONE)
}

/// `key: value` per non-null field of any serializable record.
pub fn fields<T: Serialize>(record: &T) -> Result<Vec<String>, serde_json::Error> {
    let value = serde_json::to_value(record)?;
    let Value::Object(map) = value else {
        return Ok(vec![scalar(&value)]);
    };
    Ok(map
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| format!("{k}: {}", scalar(v)))
        .collect())
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => NONE.to_owned(),
        other => other.to_string(),
    }
}

pub fn tokens(tokens: &[Token]) -> Vec<String> {
    if tokens.is_empty() {
        return vec!["No tokens".to_owned()];
    }
    tokens
        .iter()
        .map(|t| {
            format!(
                "{}  {}  {}  {}",
                t.token_id,
                t.status.as_ref().map_or(NONE, TokenStatus::as_str),
                or_dash(t.category_label().as_deref()),
                or_dash(t.issued_at.as_deref()),
            )
        })
        .collect()
}

pub fn categories(categories: &[Category]) -> Vec<String> {
    categories
        .iter()
        .map(|c| format!("{}  {}  {}", c.id, c.name, or_dash(c.color.as_deref())))
        .collect()
}

pub fn staff(users: &[StaffUser]) -> Vec<String> {
    users
        .iter()
        .map(|u| {
            let categories: Vec<String> = u.categories.iter().map(ToString::to_string).collect();
            format!(
                "{}  {}  {}  categories=[{}]",
                u.id,
                u.username,
                or_dash(u.email.as_deref()),
                categories.join(","),
            )
        })
        .collect()
}

/// One block per category; the token being served is marked.
pub fn live_queues(queues: &[LiveQueue]) -> Vec<String> {
    if queues.is_empty() {
        return vec!["No data".to_owned()];
    }
    let mut lines = Vec::new();
    for queue in queues {
        let name = queue.category.as_ref().and_then(|c| c.name.as_deref()).unwrap_or("Unknown");
        lines.push(format!("== {name} =="));
        for token in &queue.tokens {
            let marker = if token.has_status(&TokenStatus::Called) { "  <- now serving" } else { "" };
            lines.push(format!("  {}{marker}", token.token_id));
        }
    }
    lines
}

pub fn scan_records(records: &[ScanRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| {
            format!(
                "{}  {}  {}  {}",
                or_dash(r.token_id.as_deref()),
                or_dash(r.verification_status.as_deref().or(r.status.as_deref())),
                or_dash(r.scanned_by.as_deref()),
                or_dash(r.scan_time.as_deref()),
            )
        })
        .collect()
}

pub fn staff_activity(rows: &[StaffActivity]) -> Vec<String> {
    rows.iter()
        .map(|r| {
            format!(
                "{}  {}  {}",
                or_dash(r.token_id.as_deref()),
                or_dash(r.verification_status.as_deref()),
                or_dash(r.scan_time.as_deref()),
            )
        })
        .collect()
}

pub fn activity(rows: &[ActivityRecord]) -> Vec<String> {
    rows.iter()
        .map(|r| {
            format!(
                "{}  {}  {}  {}  {}",
                or_dash(r.token_id.as_deref()),
                or_dash(r.token_category.as_deref()),
                or_dash(r.actor()),
                or_dash(r.outcome()),
                or_dash(r.scan_time.as_deref()),
            )
        })
        .collect()
}

pub fn qr_codes(codes: &[QrCode]) -> Vec<String> {
    if codes.is_empty() {
        return vec!["No QR codes found".to_owned()];
    }
    codes
        .iter()
        .map(|c| format!("{}  {}  {}", c.id, or_dash(c.data.as_deref()), or_dash(c.template_name.as_deref())))
        .collect()
}

pub fn qr_templates(templates: &[QrTemplate]) -> Vec<String> {
    templates
        .iter()
        .map(|t| format!("{}  {}  {}", t.id, t.name, or_dash(t.color.as_deref())))
        .collect()
}

pub fn metrics(rows: &[MetricRow]) -> Vec<String> {
    rows.iter().map(|r| format!("{}: {}", r.metric, scalar(&r.value))).collect()
}

pub fn sidebar(sections: &[SidebarSection]) -> Vec<String> {
    let mut lines = Vec::new();
    for section in sections {
        lines.push(section.title.clone());
        lines.extend(section.items.iter().map(|item| format!("  {}  {}", item.title, item.url)));
    }
    lines
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
