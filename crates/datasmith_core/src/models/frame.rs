//! Protocol frames and the tabular result set they carry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single generated row: column name to scalar (or null) value.
///
/// `serde_json` is built with `preserve_order`, so a record's key order is
/// exactly the order the producer emitted, and the first record seen for a
/// table defines that table's column order everywhere downstream.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// The in-memory result object: table name to its generated records,
/// in first-seen table order.
pub type TableSet = IndexMap<String, Vec<Record>>;

/// Progress fields as reported by the producer.
///
/// Absent fields stay `None` and out-of-range values are passed through
/// untouched; the producer owns the meaning of these numbers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Rows generated so far, if reported.
    pub current: Option<u64>,
    /// Total rows expected, if reported.
    pub total: Option<u64>,
    /// Percent complete, if reported.
    pub percent: Option<f64>,
}

/// One decoded logical event extracted from the streamed response.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Progress report, emitted for every well-formed data line.
    Progress(ProgressUpdate),
    /// A non-empty batch of generated rows.
    Data(Vec<Record>),
    /// The stream finished; no further frames follow.
    Complete,
    /// The stream failed; carries the transport-level message.
    ///
    /// The decoder itself never produces this variant (malformed lines are
    /// dropped, not surfaced); the session injects it when the underlying
    /// read fails so that all terminal paths flow through frame dispatch.
    Error {
        /// Human-readable failure description.
        message: String,
    },
}
