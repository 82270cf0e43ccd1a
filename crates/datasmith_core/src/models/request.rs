//! Generation request models.

use crate::error::DatasmithError;
use serde::{Deserialize, Serialize};

/// A column in the schema sent to the generation service.
///
/// The schema is passed through to the service verbatim; the client does not
/// interpret it beyond serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,
    /// Service-side data type name.
    pub data_type: String,
    /// Whether the column allows null values.
    #[serde(default)]
    pub nullable: bool,
}

/// Schema for one table, as the generation service expects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDescriptor {
    /// Ordered column definitions.
    pub columns: Vec<ColumnDescriptor>,
}

/// One generation request. Immutable once a session starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Target table name; also names downloaded files.
    pub table_name: String,
    /// Schema the rows must conform to.
    pub schema: SchemaDescriptor,
    /// Number of rows to generate; must be positive.
    pub row_count: u64,
    /// Seed for deterministic generation.
    pub seed: i64,
    /// Optional trained model to generate from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ml_model_id: Option<String>,
}

impl GenerateRequest {
    /// Validate the request before a session is allowed to start.
    pub fn validate(&self) -> Result<(), DatasmithError> {
        if self.table_name.trim().is_empty() {
            return Err(DatasmithError::validation("Table name must not be empty"));
        }
        if self.row_count == 0 {
            return Err(DatasmithError::validation_with_hint(
                "Row count must be positive",
                "Request at least one row",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(rows: u64) -> GenerateRequest {
        GenerateRequest {
            table_name: "users".into(),
            schema: SchemaDescriptor {
                columns: vec![ColumnDescriptor {
                    name: "id".into(),
                    data_type: "bigint".into(),
                    nullable: false,
                }],
            },
            row_count: rows,
            seed: 42,
            ml_model_id: None,
        }
    }

    #[test]
    fn zero_rows_is_rejected() {
        assert!(request(0).validate().is_err());
        assert!(request(1).validate().is_ok());
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(request(10)).unwrap();
        assert!(json.get("tableName").is_some());
        assert!(json.get("rowCount").is_some());
        // Absent model id is omitted from the wire shape entirely.
        assert!(json.get("mlModelId").is_none());
    }
}
