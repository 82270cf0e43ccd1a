//! Client configuration.
//!
//! One explicit [`ClientConfig`] value is constructed at flow start and
//! passed by reference to every service; there is no module-level mutable
//! state. Restarting a flow means building a fresh config.

use crate::error::DatasmithError;
use std::time::Duration;

/// Default orchestrator base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:8081";

/// Default number of preview rows retained during streaming.
pub const DEFAULT_PREVIEW_CAPACITY: usize = 100;

/// Configuration for one client flow.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the orchestrator service.
    pub base_url: String,
    /// Connect-phase timeout for all requests.
    ///
    /// Only the connect phase is bounded: an overall request timeout would
    /// sever long-lived streams mid-generation.
    pub connect_timeout: Duration,
    /// Overall timeout for plain (non-streaming) JSON requests.
    pub request_timeout: Duration,
    /// Preview buffer capacity, fixed at session start.
    pub preview_capacity: usize,
    /// Interval between batch-status polls.
    pub status_poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            preview_capacity: DEFAULT_PREVIEW_CAPACITY,
            status_poll_interval: Duration::from_secs(1),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    /// Set the preview buffer capacity.
    pub fn with_preview_capacity(mut self, capacity: usize) -> Self {
        self.preview_capacity = capacity;
        self
    }

    /// Set the batch-status poll interval.
    pub fn with_status_poll_interval(mut self, interval: Duration) -> Self {
        self.status_poll_interval = interval;
        self
    }

    /// Build the HTTP client used by the services.
    pub fn http_client(&self) -> Result<reqwest::Client, DatasmithError> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|e| DatasmithError::config(format!("Failed to build HTTP client: {e}")))
    }

    fn trimmed_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Endpoint for the streamed generation request.
    pub fn generate_stream_url(&self) -> String {
        format!("{}/api/orchestrator/stream/generate", self.trimmed_base())
    }

    /// Endpoint for a server-side download in the given format extension.
    pub fn download_url(&self, extension: &str) -> String {
        format!("{}/api/orchestrator/stream/download/{extension}", self.trimmed_base())
    }

    /// Endpoint for starting a batch job.
    pub fn batch_start_url(&self) -> String {
        format!("{}/api/generator/batch/start", self.trimmed_base())
    }

    /// Endpoint for polling a batch job's status.
    pub fn batch_status_url(&self, execution_id: &str) -> String {
        format!("{}/api/generator/batch/status/{execution_id}", self.trimmed_base())
    }
}
