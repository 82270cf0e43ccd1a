//! Batch job models.

use crate::models::frame::Record;
use serde::{Deserialize, Serialize};

/// Reference to a started batch job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchJobRef {
    /// Opaque execution identifier assigned by the service.
    pub execution_id: String,
}

/// One status payload from the batch-status channel.
///
/// Only `complete` is interpreted by the watcher; every other field is
/// passed through to the caller as the producer sent it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatus {
    /// Whether the job has finished; closes the channel when true.
    #[serde(default)]
    pub complete: bool,
    /// Rows processed so far, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed: Option<u64>,
    /// Total rows expected, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Human-readable status message, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Any further producer fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Record,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_are_preserved() {
        let status: BatchStatus = serde_json::from_str(
            r#"{"complete":false,"processed":10,"phase":"inserting","batchNo":3}"#,
        )
        .unwrap();
        assert!(!status.complete);
        assert_eq!(status.processed, Some(10));
        assert_eq!(status.extra.get("phase").and_then(|v| v.as_str()), Some("inserting"));
        assert_eq!(status.extra.get("batchNo").and_then(|v| v.as_i64()), Some(3));
    }

    #[test]
    fn missing_complete_defaults_to_false() {
        let status: BatchStatus = serde_json::from_str(r#"{"processed":1}"#).unwrap();
        assert!(!status.complete);
    }
}
