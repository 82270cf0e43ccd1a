//! Structured-document encoder.
//!
//! Serializes the table set verbatim with stable indentation. The only
//! format that loses nothing: key order, table order, nested values, and
//! every scalar survive a round trip.

use crate::error::DatasmithError;
use crate::models::TableSet;

/// Encode the table set as pretty-printed JSON.
pub(crate) fn encode(tables: &TableSet) -> Result<Vec<u8>, DatasmithError> {
    serde_json::to_vec_pretty(tables)
        .map_err(|e| DatasmithError::Export { message: e.to_string(), source: Some(Box::new(e)) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::{record, table_set};
    use crate::models::TableSet;
    use serde_json::json;

    #[test]
    fn round_trips_losslessly() {
        let tables = table_set(&[
            (
                "users",
                vec![
                    record(&[
                        ("zeta", json!("last-alphabetically, first-seen")),
                        ("id", json!(1)),
                        ("active", json!(true)),
                        ("score", json!(99.5)),
                        ("notes", json!(null)),
                        ("nested", json!({"a": [1, 2, 3]})),
                    ]),
                    record(&[("zeta", json!("z")), ("id", json!(2))]),
                ],
            ),
            ("orders", vec![record(&[("order_id", json!(7))])]),
        ]);

        let bytes = encode(&tables).unwrap();
        let decoded: TableSet = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, tables);

        // First-seen ordering is preserved, not sorted.
        let keys: Vec<_> = decoded["users"][0].keys().cloned().collect();
        assert_eq!(keys[0], "zeta");
        let table_names: Vec<_> = decoded.keys().cloned().collect();
        assert_eq!(table_names, vec!["users", "orders"]);
    }

    #[test]
    fn output_is_indented() {
        let tables = table_set(&[("t", vec![record(&[("a", json!(1))])])]);
        let text = String::from_utf8(encode(&tables).unwrap()).unwrap();
        assert!(text.contains("\n  "));
    }
}
