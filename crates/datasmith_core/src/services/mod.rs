//! Client services for the Datasmith pipeline.
//!
//! This module contains the service layer:
//! - `stream` - Streaming generation session with cancellation support
//! - `preview` - Bounded preview buffer over streamed rows
//! - `status` - Batch job start and status watching
//! - `download` - Server-rendered export download to a local file sink

pub mod download;
pub mod preview;
pub mod status;
pub mod stream;

pub use download::{DownloadService, DownloadedFile};
pub use preview::PreviewAggregator;
pub use status::JobStatusWatcher;
pub use stream::StreamSession;
