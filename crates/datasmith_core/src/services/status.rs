//! Batch job start and status watching.
//!
//! Large inserts run server-side as batch jobs. The watcher repeatedly
//! fetches the job's status payload on one logical channel and forwards each
//! payload to the caller; a payload with `complete: true` closes the channel.
//! The polling loop and a persistent status stream share the same contract,
//! so only the poll variant is implemented. Terminal semantics are those of
//! [`StreamSession`]: the outcome is the return value, at most one, never
//! delivered on cancellation.
//!
//! [`StreamSession`]: crate::services::stream::StreamSession

use crate::config::ClientConfig;
use crate::error::DatasmithError;
use crate::models::{
    BatchJobRef, BatchStatus, GenerateRequest, SessionHandle, SessionOutcome, SessionState,
};

use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc;

/// Watches one batch job to completion.
pub struct JobStatusWatcher {
    client: reqwest::Client,
    status_url: String,
    poll_interval: Duration,
    request_timeout: Duration,
    handle: Arc<SessionHandle>,
}

impl JobStatusWatcher {
    /// Start a batch job and return its execution reference.
    pub async fn start(
        config: &ClientConfig,
        request: &GenerateRequest,
    ) -> Result<BatchJobRef, DatasmithError> {
        request.validate()?;
        let client = config.http_client()?;

        let response = client
            .post(config.batch_start_url())
            .timeout(config.request_timeout)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DatasmithError::http(status.as_u16()));
        }

        let job: BatchJobRef = response.json().await?;
        tracing::debug!(
            execution_id = %job.execution_id,
            table = %request.table_name,
            "Batch job started"
        );
        Ok(job)
    }

    /// Create a watcher for an already-started job.
    pub fn new(
        config: &ClientConfig,
        execution_id: impl Into<String>,
    ) -> Result<Self, DatasmithError> {
        let execution_id = execution_id.into();
        let client = config.http_client()?;
        let handle = Arc::new(SessionHandle::new(&execution_id));
        Ok(Self {
            client,
            status_url: config.batch_status_url(&execution_id),
            poll_interval: config.status_poll_interval,
            request_timeout: config.request_timeout,
            handle,
        })
    }

    /// Get the handle for observing and cancelling this watcher.
    pub fn handle(&self) -> Arc<SessionHandle> {
        Arc::clone(&self.handle)
    }

    /// Watch the job until it completes, fails, or is cancelled.
    ///
    /// Every status payload is forwarded through `tx`, including the final
    /// one whose `complete` flag closed the channel; the terminal
    /// `Completed` outcome carries no payload of its own.
    pub async fn watch(self, tx: mpsc::Sender<BatchStatus>) -> SessionOutcome {
        self.handle.set_state(SessionState::Active);
        tracing::debug!(session_id = %self.handle.id(), job = %self.handle.label(), "Watching batch job");

        let outcome = self.poll_until_complete(&tx).await;
        self.handle.set_state(outcome.state());

        if let SessionOutcome::Failed(err) = &outcome {
            tracing::warn!(
                session_id = %self.handle.id(),
                job = %self.handle.label(),
                error = %err,
                "Batch watch failed"
            );
        }
        outcome
    }

    async fn poll_until_complete(&self, tx: &mpsc::Sender<BatchStatus>) -> SessionOutcome {
        loop {
            let status = select! {
                result = self.fetch_status() => match result {
                    Ok(status) => status,
                    Err(err) => return SessionOutcome::Failed(err),
                },
                _ = self.handle.cancelled() => return SessionOutcome::Cancelled,
            };

            let complete = status.complete;
            if tx.send(status).await.is_err() {
                tracing::debug!(session_id = %self.handle.id(), "Status receiver dropped, stopping watch");
                return SessionOutcome::Cancelled;
            }
            if complete {
                return SessionOutcome::Completed;
            }

            select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = self.handle.cancelled() => return SessionOutcome::Cancelled,
            }
        }
    }

    async fn fetch_status(&self) -> Result<BatchStatus, DatasmithError> {
        let response =
            self.client.get(&self.status_url).timeout(self.request_timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DatasmithError::http(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watcher_is_labelled_by_execution_id() {
        let watcher = JobStatusWatcher::new(&ClientConfig::default(), "exec-42").unwrap();
        assert_eq!(watcher.handle().label(), "exec-42");
        assert_eq!(watcher.handle().state(), SessionState::Idle);
    }
}
