//! Streaming generation session.
//!
//! One [`StreamSession`] owns one decoding pass end to end: it issues the
//! request, drives the [`FrameDecoder`] over the chunked response body, and
//! forwards events to the caller's channel. The terminal outcome is the
//! return value of [`run`], so exactly one of completed/cancelled/failed
//! exists per session, by construction.
//!
//! [`run`]: StreamSession::run

use crate::config::ClientConfig;
use crate::decoder::FrameDecoder;
use crate::error::DatasmithError;
use crate::models::{
    Frame, GenerateRequest, SessionHandle, SessionOutcome, SessionState, StreamEvent,
};

use futures_util::StreamExt;
use std::sync::Arc;
use tokio::select;
use tokio::sync::mpsc;

/// What to do after dispatching one frame.
enum Dispatch {
    /// Keep reading the stream.
    Continue,
    /// The session reached a terminal state.
    Terminal(SessionOutcome),
}

/// A single-use streaming session against the generation service.
///
/// Events flow through the channel passed to [`run`]; the channel bound is
/// the caller's backpressure knob. Dropping the receiver stops the session
/// quietly, like cancellation. Only one session should be active per preview
/// surface; running two concurrently is not defended against here.
///
/// [`run`]: StreamSession::run
#[derive(Debug)]
pub struct StreamSession {
    client: reqwest::Client,
    url: String,
    request: GenerateRequest,
    handle: Arc<SessionHandle>,
}

impl StreamSession {
    /// Create a session for the given request.
    ///
    /// Validates the request and builds the HTTP client; nothing is sent
    /// until [`run`] is called.
    ///
    /// [`run`]: StreamSession::run
    pub fn new(config: &ClientConfig, request: GenerateRequest) -> Result<Self, DatasmithError> {
        request.validate()?;
        let client = config.http_client()?;
        let handle = Arc::new(SessionHandle::new(&request.table_name));
        Ok(Self { client, url: config.generate_stream_url(), request, handle })
    }

    /// Get the handle for observing and cancelling this session.
    ///
    /// The handle stays valid after `run` consumes the session.
    pub fn handle(&self) -> Arc<SessionHandle> {
        Arc::clone(&self.handle)
    }

    /// Drive the stream to a terminal state.
    ///
    /// Consuming `self` makes the session single-use: a new request needs a
    /// new session. The network resource is released on every exit path
    /// when the response is dropped with this future.
    pub async fn run(self, tx: mpsc::Sender<StreamEvent>) -> SessionOutcome {
        self.handle.set_state(SessionState::Active);
        tracing::debug!(
            session_id = %self.handle.id(),
            table = %self.request.table_name,
            row_count = self.request.row_count,
            "Starting generation stream"
        );

        let outcome = self.stream_frames(&tx).await;
        self.handle.set_state(outcome.state());

        match &outcome {
            SessionOutcome::Completed => tracing::debug!(
                session_id = %self.handle.id(),
                elapsed_ms = self.handle.elapsed_ms(),
                "Generation stream completed"
            ),
            SessionOutcome::Cancelled => tracing::debug!(
                session_id = %self.handle.id(),
                "Generation stream cancelled"
            ),
            SessionOutcome::Failed(err) => tracing::warn!(
                session_id = %self.handle.id(),
                error = %err,
                "Generation stream failed"
            ),
        }

        outcome
    }

    async fn stream_frames(&self, tx: &mpsc::Sender<StreamEvent>) -> SessionOutcome {
        let request = self
            .client
            .post(&self.url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&self.request);

        let response = select! {
            result = request.send() => match result {
                Ok(response) => response,
                Err(err) => return SessionOutcome::Failed(err.into()),
            },
            _ = self.handle.cancelled() => return SessionOutcome::Cancelled,
        };

        let status = response.status();
        if !status.is_success() {
            // The body, whatever it holds, is not parsed on a failed status.
            return SessionOutcome::Failed(DatasmithError::http(status.as_u16()));
        }

        let mut body = response.bytes_stream();
        let mut decoder = FrameDecoder::new();

        loop {
            let chunk = select! {
                chunk = body.next() => chunk,
                _ = self.handle.cancelled() => {
                    // Dropping the body aborts the underlying read; decoder
                    // state (including any partial line) goes with it.
                    return SessionOutcome::Cancelled;
                }
            };

            let frames = match chunk {
                Some(Ok(bytes)) => decoder.feed(&bytes),
                Some(Err(err)) => {
                    // Mid-stream transport failure flows through frame
                    // dispatch like every other terminal.
                    vec![Frame::Error { message: err.to_string() }]
                }
                None => decoder.finish(),
            };
            let at_end = decoder.is_finished();

            for frame in frames {
                if let Dispatch::Terminal(outcome) = self.dispatch(frame, tx).await {
                    return outcome;
                }
            }

            if at_end {
                // Complete was consumed by dispatch above; this is only
                // reachable if the receiver outlived it, which it cannot.
                return SessionOutcome::Completed;
            }
        }
    }

    async fn dispatch(&self, frame: Frame, tx: &mpsc::Sender<StreamEvent>) -> Dispatch {
        let event = match frame {
            Frame::Data(rows) => StreamEvent::Rows(rows),
            Frame::Progress(update) => StreamEvent::Progress(update),
            Frame::Complete => return Dispatch::Terminal(SessionOutcome::Completed),
            Frame::Error { message } => {
                return Dispatch::Terminal(SessionOutcome::Failed(DatasmithError::transport(
                    message,
                )))
            }
        };

        if tx.send(event).await.is_err() {
            // Receiver dropped: the consumer walked away. Treat like
            // cancellation rather than inventing a completion.
            tracing::debug!(session_id = %self.handle.id(), "Event receiver dropped, stopping stream");
            return Dispatch::Terminal(SessionOutcome::Cancelled);
        }
        Dispatch::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnDescriptor, SchemaDescriptor};

    fn request() -> GenerateRequest {
        GenerateRequest {
            table_name: "users".into(),
            schema: SchemaDescriptor {
                columns: vec![ColumnDescriptor {
                    name: "id".into(),
                    data_type: "bigint".into(),
                    nullable: false,
                }],
            },
            row_count: 100,
            seed: 7,
            ml_model_id: None,
        }
    }

    #[test]
    fn invalid_request_is_rejected_before_start() {
        let mut bad = request();
        bad.row_count = 0;
        let err = StreamSession::new(&ClientConfig::default(), bad).unwrap_err();
        assert_eq!(err.category(), "Validation");
    }

    #[test]
    fn new_session_is_idle_until_run() {
        let session = StreamSession::new(&ClientConfig::default(), request()).unwrap();
        assert_eq!(session.handle().state(), SessionState::Idle);
    }
}
