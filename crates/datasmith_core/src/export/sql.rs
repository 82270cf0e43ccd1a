//! SQL statement encoder.
//!
//! A static textual encoding: one INSERT per record, column list taken from
//! that record's own keys, no parameterization and no schema validation.
//! The output is meant to be read and replayed by the user, not executed by
//! this client.

use crate::models::TableSet;
use serde_json::Value;

/// Encode the table set as a sequence of INSERT statements.
pub(crate) fn encode(tables: &TableSet) -> String {
    let mut out = String::new();

    for (name, rows) in tables {
        if rows.is_empty() {
            continue;
        }

        out.push_str("-- Data for table: ");
        out.push_str(name);
        out.push('\n');

        for row in rows {
            let columns: Vec<&str> = row.keys().map(String::as_str).collect();
            let values: Vec<String> = row.values().map(literal).collect();
            out.push_str(&format!(
                "INSERT INTO {} ({}) VALUES ({});\n",
                name,
                columns.join(", "),
                values.join(", ")
            ));
        }
        out.push('\n');
    }

    out
}

/// Render one value as a SQL literal.
///
/// Null becomes the NULL keyword, numbers stay unquoted, booleans become
/// 1/0, everything else is a single-quoted string with embedded quotes
/// doubled. Nested values are serialized to compact JSON first.
fn literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        Value::String(s) => quote(s),
        other => quote(&other.to_string()),
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::{record, table_set};
    use serde_json::json;

    #[test]
    fn literal_rules_match_by_type() {
        let tables = table_set(&[(
            "users",
            vec![record(&[
                ("name", json!("O'Brien")),
                ("active", json!(true)),
                ("age", json!(null)),
            ])],
        )]);

        let sql = encode(&tables);
        assert!(sql.contains(
            "INSERT INTO users (name, active, age) VALUES ('O''Brien', 1, NULL);"
        ));
    }

    #[test]
    fn numbers_are_unquoted_and_false_is_zero() {
        let tables = table_set(&[(
            "m",
            vec![record(&[("count", json!(42)), ("ratio", json!(0.5)), ("flag", json!(false))])],
        )]);
        let sql = encode(&tables);
        assert!(sql.contains("VALUES (42, 0.5, 0);"));
    }

    #[test]
    fn each_record_uses_its_own_keys() {
        let tables = table_set(&[(
            "t",
            vec![
                record(&[("a", json!(1))]),
                record(&[("a", json!(2)), ("b", json!(3))]),
            ],
        )]);
        let sql = encode(&tables);
        assert!(sql.contains("INSERT INTO t (a) VALUES (1);"));
        assert!(sql.contains("INSERT INTO t (a, b) VALUES (2, 3);"));
    }

    #[test]
    fn empty_tables_are_skipped() {
        let tables = table_set(&[
            ("empty_one", vec![]),
            ("real", vec![record(&[("x", json!(1))])]),
        ]);
        let sql = encode(&tables);
        assert!(!sql.contains("empty_one"));
        assert!(sql.starts_with("-- Data for table: real\n"));
    }
}
