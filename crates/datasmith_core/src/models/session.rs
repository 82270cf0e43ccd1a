//! Streaming session models: handle, state machine, events, terminal outcome.

use crate::error::DatasmithError;
use crate::models::frame::{ProgressUpdate, Record};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Lifecycle of one streaming session.
///
/// `Idle → Active → {Completed | Cancelled | Failed}`; the three terminal
/// states are absorbing and a session is single-use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Created but not yet started.
    Idle,
    /// The stream is being consumed.
    Active,
    /// The stream finished normally.
    Completed,
    /// The caller cancelled mid-stream.
    Cancelled,
    /// Transport failure or non-success response status.
    Failed,
}

/// How one session ended.
///
/// Exactly one outcome exists per run, by construction: it is the return
/// value of the run, not a callback that might fire twice or not at all.
#[derive(Debug)]
pub enum SessionOutcome {
    /// The stream delivered a completion event or ended cleanly.
    Completed,
    /// The caller cancelled; no terminal event was delivered.
    Cancelled,
    /// The session failed before or during streaming.
    Failed(DatasmithError),
}

impl SessionOutcome {
    /// The terminal session state this outcome corresponds to.
    pub fn state(&self) -> SessionState {
        match self {
            Self::Completed => SessionState::Completed,
            Self::Cancelled => SessionState::Cancelled,
            Self::Failed(_) => SessionState::Failed,
        }
    }

    /// Check whether the session completed normally.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Non-terminal events delivered while a session is active.
///
/// When a source line carries both rows and progress fields, `Rows` is
/// delivered before the matching `Progress`, in decoder order.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A non-empty batch of generated rows.
    Rows(Vec<Record>),
    /// A progress report.
    Progress(ProgressUpdate),
}

/// Handle for observing and cancelling a running session.
pub struct SessionHandle {
    /// Unique session identifier.
    id: Uuid,
    /// What the session is about: the table name for generation streams,
    /// the execution id for batch watchers.
    label: String,
    /// Cancellation token for aborting the stream.
    cancel_token: CancellationToken,
    /// Current lifecycle state.
    state: RwLock<SessionState>,
    /// When the handle was created.
    started_at: DateTime<Utc>,
}

impl SessionHandle {
    /// Create a new handle in the `Idle` state.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            cancel_token: CancellationToken::new(),
            state: RwLock::new(SessionState::Idle),
            started_at: Utc::now(),
        }
    }

    /// Get the unique session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Get the session's subject label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the current lifecycle state.
    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    pub(crate) fn set_state(&self, state: SessionState) {
        *self.state.write() = state;
    }

    /// Get when the handle was created.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Get elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }

    /// Request cancellation. Idempotent: repeated calls are no-ops.
    pub fn cancel(&self) {
        tracing::debug!(session_id = %self.id, "Cancellation requested");
        self.cancel_token.cancel();
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Wait for cancellation.
    pub async fn cancelled(&self) {
        self.cancel_token.cancelled().await
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("state", &self.state())
            .field("started_at", &self.started_at)
            .field("is_cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_idempotent() {
        let handle = SessionHandle::new("users");
        assert!(!handle.is_cancelled());
        handle.cancel();
        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
    }

    #[test]
    fn handle_starts_idle() {
        let handle = SessionHandle::new("users");
        assert_eq!(handle.state(), SessionState::Idle);
        assert_eq!(handle.label(), "users");
    }

    #[test]
    fn outcome_maps_to_terminal_state() {
        assert_eq!(SessionOutcome::Completed.state(), SessionState::Completed);
        assert_eq!(SessionOutcome::Cancelled.state(), SessionState::Cancelled);
        let failed = SessionOutcome::Failed(crate::error::DatasmithError::http(500));
        assert_eq!(failed.state(), SessionState::Failed);
    }
}
