//! Core streaming and export pipeline for the Datasmith client.
//!
//! Datasmith drives a remote data-generation service and consumes its output
//! incrementally. This crate provides the whole pipeline below the UI:
//!
//! - **decoder**: incremental frame decoder for the chunked event stream
//! - **services**: streaming session, preview buffer, batch watcher, download
//! - **export**: four stateless output encoders over the in-memory result set
//! - **models**: requests, frames, sessions, batch status
//! - **error**: error handling for the whole pipeline
//! - **config**: explicit per-flow client configuration
//! - **state**: session registry for cancellation by id
//! - **logging**: structured logging setup

pub mod config;
pub mod decoder;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

pub use config::ClientConfig;
pub use decoder::FrameDecoder;
pub use error::DatasmithError;
pub use export::{export, ExportFormat, ExportPayload};
pub use models::{
    BatchJobRef, BatchStatus, ColumnDescriptor, Frame, GenerateRequest, ProgressUpdate, Record,
    SchemaDescriptor, SessionHandle, SessionOutcome, SessionState, StreamEvent, TableSet,
};
pub use services::{
    DownloadService, DownloadedFile, JobStatusWatcher, PreviewAggregator, StreamSession,
};
pub use state::SessionRegistry;
