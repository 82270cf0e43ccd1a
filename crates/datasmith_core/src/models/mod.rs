//! Data models for the Datasmith client.
//!
//! This module contains all core data structures:
//! - `request` - GenerateRequest, SchemaDescriptor, ColumnDescriptor
//! - `frame` - Frame, ProgressUpdate, Record, TableSet
//! - `session` - SessionHandle, SessionState, SessionOutcome, StreamEvent
//! - `batch` - BatchJobRef, BatchStatus

pub mod batch;
pub mod frame;
pub mod request;
pub mod session;

pub use batch::{BatchJobRef, BatchStatus};
pub use frame::{Frame, ProgressUpdate, Record, TableSet};
pub use request::{ColumnDescriptor, GenerateRequest, SchemaDescriptor};
pub use session::{SessionHandle, SessionOutcome, SessionState, StreamEvent};
