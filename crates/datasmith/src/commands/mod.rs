//! CLI command implementations.
//!
//! - `preview` - stream with a live progress bar and a capped preview table
//! - `export` - stream to completion, encode locally in any format
//! - `download` - server-rendered export written to a local file
//! - `batch` - start a batch insert job and watch it to completion

pub mod batch;
pub mod download;
pub mod export;
pub mod preview;

use datasmith_core::SessionRegistry;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;

/// Build a progress bar: a bounded bar when the total is known, a spinner
/// otherwise.
pub(crate) fn progress_bar(total: Option<u64>) -> ProgressBar {
    match total {
        Some(total) => {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .expect("static template")
                    .progress_chars("#>-"),
            );
            bar
        }
        None => {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {pos} rows {msg}")
                    .expect("static template"),
            );
            bar
        }
    }
}

/// Cancel every registered session when the user interrupts the process.
pub(crate) fn cancel_on_interrupt(registry: &Arc<SessionRegistry>) {
    let registry = Arc::clone(registry);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling active sessions");
            registry.cancel_all();
        }
    });
}
