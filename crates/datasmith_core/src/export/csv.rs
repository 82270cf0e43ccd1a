//! Delimited-text encoder.
//!
//! Multiple tables share one file: each non-empty table gets a `TABLE:`
//! marker line, a header row from its first record's keys, then one line per
//! record, followed by a blank separator line.

use crate::models::TableSet;
use serde_json::Value;

/// Encode the table set as sectioned delimited text.
pub(crate) fn encode(tables: &TableSet) -> String {
    let mut out = String::new();

    for (name, rows) in tables {
        let Some(first) = rows.first() else { continue };
        let headers: Vec<&str> = first.keys().map(String::as_str).collect();

        out.push_str("TABLE: ");
        out.push_str(name);
        out.push('\n');
        out.push_str(&headers.iter().map(|h| escape_field(h)).collect::<Vec<_>>().join(","));
        out.push('\n');

        for row in rows {
            let line = headers
                .iter()
                .map(|header| escape_field(&render_value(row.get(*header))))
                .collect::<Vec<_>>()
                .join(",");
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

/// Render one cell. Null and missing values become the empty string; nested
/// values pass through as compact JSON.
fn render_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Quote a field only when it needs it; embedded quotes are doubled.
fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
