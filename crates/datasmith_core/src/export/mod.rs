//! Stateless export encoders over an in-memory table set.
//!
//! Four formats, one closed enum: adding a format means the compiler walks
//! every dispatch site. Each encoder is a pure function from `&TableSet` to
//! bytes; none holds resources beyond the produced payload. All four refuse
//! an all-empty table set with [`DatasmithError::EmptyExport`] instead of
//! emitting an empty file.

mod csv;
mod json;
mod sql;
mod xlsx;

use crate::error::DatasmithError;
use crate::models::TableSet;
use serde::{Deserialize, Serialize};

/// Default filename prefix when the caller supplies no stem.
const DEFAULT_STEM_PREFIX: &str = "generated_data";

/// The supported output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Delimited text with per-table sections.
    Csv,
    /// One INSERT statement per record.
    Sql,
    /// The table set serialized verbatim; the only lossless format.
    Json,
    /// Spreadsheet container, one sheet per table.
    Xlsx,
}

impl ExportFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Sql => "sql",
            Self::Json => "json",
            Self::Xlsx => "xlsx",
        }
    }

    /// MIME content type for this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Sql => "text/plain",
            Self::Json => "application/json",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = DatasmithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "sql" => Ok(Self::Sql),
            "json" => Ok(Self::Json),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(DatasmithError::validation_with_hint(
                format!("Unknown export format: {other}"),
                "Supported formats: csv, sql, json, xlsx",
            )),
        }
    }
}

/// A named, typed byte payload ready to be written or served.
#[derive(Debug, Clone)]
pub struct ExportPayload {
    /// Filename including extension.
    pub filename: String,
    /// MIME content type.
    pub content_type: &'static str,
    /// Encoded bytes.
    pub bytes: Vec<u8>,
}

/// Encode `tables` in the given format.
///
/// `stem` overrides the generated `generated_data_YYYYMMDDHHMMSS` filename
/// stem. Successive exports in the same second collide on the generated
/// name; that is accepted, not defended against.
pub fn export(
    tables: &TableSet,
    format: ExportFormat,
    stem: Option<&str>,
) -> Result<ExportPayload, DatasmithError> {
    if !has_rows(tables) {
        return Err(DatasmithError::EmptyExport);
    }

    let bytes = match format {
        ExportFormat::Csv => csv::encode(tables).into_bytes(),
        ExportFormat::Sql => sql::encode(tables).into_bytes(),
        ExportFormat::Json => json::encode(tables)?,
        ExportFormat::Xlsx => xlsx::encode(tables)?,
    };

    let payload = ExportPayload {
        filename: format!("{}.{}", resolve_stem(stem), format.extension()),
        content_type: format.content_type(),
        bytes,
    };
    tracing::debug!(
        filename = %payload.filename,
        format = %format,
        size = payload.bytes.len(),
        "Export encoded"
    );
    Ok(payload)
}

/// Check whether any table has at least one record.
fn has_rows(tables: &TableSet) -> bool {
    tables.values().any(|rows| !rows.is_empty())
}

/// Caller-supplied stem, or a local-timestamp-derived one.
fn resolve_stem(stem: Option<&str>) -> String {
    match stem {
        Some(stem) => stem.to_string(),
        None => {
            format!("{}_{}", DEFAULT_STEM_PREFIX, chrono::Local::now().format("%Y%m%d%H%M%S"))
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{Record, TableSet};

    pub fn record(pairs: &[(&str, serde_json::Value)]) -> Record {
        let mut record = Record::new();
        for (key, value) in pairs {
            record.insert((*key).to_string(), value.clone());
        }
        record
    }

    pub fn table_set(tables: &[(&str, Vec<Record>)]) -> TableSet {
        tables.iter().map(|(name, rows)| ((*name).to_string(), rows.clone())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{record, table_set};
    use super::*;
    use serde_json::json;

    fn users() -> TableSet {
        table_set(&[(
            "users",
            vec![record(&[("id", json!(1)), ("name", json!("Alice"))])],
        )])
    }

    #[test]
    fn all_empty_table_set_is_refused_by_every_format() {
        let empty = table_set(&[("users", vec![]), ("orders", vec![])]);
        for format in [ExportFormat::Csv, ExportFormat::Sql, ExportFormat::Json, ExportFormat::Xlsx]
        {
            let err = export(&empty, format, None).unwrap_err();
            assert!(err.is_empty_export(), "{format} should refuse an empty table set");
        }
    }

    #[test]
    fn explicit_stem_names_the_payload() {
        let payload = export(&users(), ExportFormat::Csv, Some("smoke")).unwrap();
        assert_eq!(payload.filename, "smoke.csv");
        assert_eq!(payload.content_type, "text/csv");
    }

    #[test]
    fn generated_stem_is_timestamp_shaped() {
        let payload = export(&users(), ExportFormat::Json, None).unwrap();
        // generated_data_YYYYMMDDHHMMSS.json
        let stem = payload.filename.strip_suffix(".json").unwrap();
        let suffix = stem.strip_prefix("generated_data_").unwrap();
        assert_eq!(suffix.len(), 14);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn format_round_trips_through_str() {
        for format in [ExportFormat::Csv, ExportFormat::Sql, ExportFormat::Json, ExportFormat::Xlsx]
        {
            let parsed: ExportFormat = format.extension().parse().unwrap();
            assert_eq!(parsed, format);
        }
        assert!("parquet".parse::<ExportFormat>().is_err());
    }
}
