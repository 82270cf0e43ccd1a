//! Error types for the Datasmith client.
//!
//! One error enum covers the whole pipeline: transport and HTTP failures from
//! the streaming session, export refusals and encoding failures, file-sink
//! errors, and request validation. Errors are always returned as values; the
//! streaming path converts them into a single terminal outcome per session.

use thiserror::Error;

/// Main error type for the Datasmith client.
#[derive(Debug, Error)]
pub enum DatasmithError {
    /// Connection-level failure: refused, reset mid-stream, DNS, timeout.
    #[error("Transport error: {message}")]
    Transport {
        /// Human-readable error message.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The service answered with a non-success status code.
    #[error("HTTP error: status {status}")]
    Http {
        /// The response status code.
        status: u16,
        /// Actionable hint for the user.
        hint: Option<String>,
    },

    /// A response body that should be JSON could not be parsed.
    ///
    /// Malformed lines inside the event stream never produce this error;
    /// those are dropped by the decoder. This covers the plain JSON
    /// endpoints (batch start, batch status).
    #[error("Parse error: {message}")]
    Parse {
        /// Human-readable error message.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Export was refused because every table in the result set is empty.
    ///
    /// Distinct from a generic failure so callers can present guidance
    /// ("generate some data first") instead of an error report.
    #[error("Nothing to export: every table in the result set is empty")]
    EmptyExport,

    /// A format encoder failed to produce its container.
    #[error("Export error: {message}")]
    Export {
        /// Human-readable error message.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Writing a downloaded or exported payload to the local sink failed.
    #[error("Sink error: {message}")]
    Sink {
        /// Human-readable error message.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A request failed validation before anything was sent.
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable error message.
        message: String,
        /// Actionable hint for the user.
        hint: Option<String>,
    },

    /// Client configuration error.
    #[error("Config error: {message}")]
    Config {
        /// Human-readable error message.
        message: String,
    },

    /// Unexpected internal error.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
    },
}

impl DatasmithError {
    // ========== Constructors ==========

    /// Create a new transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into(), source: None }
    }

    /// Create a new transport error with source.
    pub fn transport_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport { message: message.into(), source: Some(Box::new(source)) }
    }

    /// Create a new HTTP status error.
    pub fn http(status: u16) -> Self {
        let hint = match status {
            401 | 403 => Some("Check service credentials and access rights".to_string()),
            404 => Some("Check the service base URL and endpoint path".to_string()),
            500..=599 => Some("The generation service reported an internal failure".to_string()),
            _ => None,
        };
        Self::Http { status, hint }
    }

    /// Create a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse { message: message.into(), source: None }
    }

    /// Create a new export error.
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export { message: message.into(), source: None }
    }

    /// Create a new sink error.
    pub fn sink(message: impl Into<String>) -> Self {
        Self::Sink { message: message.into(), source: None }
    }

    /// Create a new validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into(), hint: None }
    }

    /// Create a new validation error with hint.
    pub fn validation_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Validation { message: message.into(), hint: Some(hint.into()) }
    }

    /// Create a new config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    // ========== Methods ==========

    /// Check if this error is the empty-export refusal.
    pub fn is_empty_export(&self) -> bool {
        matches!(self, Self::EmptyExport)
    }

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "Transport",
            Self::Http { .. } => "Http",
            Self::Parse { .. } => "Parse",
            Self::EmptyExport => "EmptyExport",
            Self::Export { .. } => "Export",
            Self::Sink { .. } => "Sink",
            Self::Validation { .. } => "Validation",
            Self::Config { .. } => "Config",
            Self::Internal { .. } => "Internal",
        }
    }

    /// Get actionable hint for the user.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Transport { .. } => Some("Check that the generation service is reachable"),
            Self::Http { hint, .. } => hint.as_deref(),
            Self::Parse { .. } => Some("The service response did not match the expected shape"),
            Self::EmptyExport => Some("Generate some rows before exporting"),
            Self::Export { .. } => None,
            Self::Sink { .. } => Some("Check file permissions and disk space"),
            Self::Validation { hint, .. } => hint.as_deref(),
            Self::Config { .. } => None,
            Self::Internal { .. } => Some("Please report this issue"),
        }
    }
}

// ========== Error Conversions ==========

/// Convert from reqwest::Error, classifying connect/reset failures as transport.
impl From<reqwest::Error> for DatasmithError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return DatasmithError::http(status.as_u16());
        }
        if err.is_decode() {
            return DatasmithError::Parse {
                message: err.to_string(),
                source: Some(Box::new(err)),
            };
        }
        // Connect, timeout, body interruption: all transport-level.
        DatasmithError::Transport { message: err.to_string(), source: Some(Box::new(err)) }
    }
}

/// Convert from serde_json::Error.
impl From<serde_json::Error> for DatasmithError {
    fn from(err: serde_json::Error) -> Self {
        DatasmithError::Parse { message: err.to_string(), source: Some(Box::new(err)) }
    }
}

/// Convert from std::io::Error.
impl From<std::io::Error> for DatasmithError {
    fn from(err: std::io::Error) -> Self {
        DatasmithError::Sink { message: err.to_string(), source: Some(Box::new(err)) }
    }
}

/// Convert from the spreadsheet writer's error.
impl From<rust_xlsxwriter::XlsxError> for DatasmithError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        DatasmithError::Export { message: err.to_string(), source: Some(Box::new(err)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_carries_status_and_hint() {
        let err = DatasmithError::http(503);
        assert_eq!(err.category(), "Http");
        assert!(err.hint().is_some());
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn empty_export_is_distinguishable() {
        let err = DatasmithError::EmptyExport;
        assert!(err.is_empty_export());
        assert!(!DatasmithError::http(404).is_empty_export());
    }
}
