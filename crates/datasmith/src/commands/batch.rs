//! Batch job command: start a server-side insert job and watch it.

use crate::commands::{cancel_on_interrupt, progress_bar};
use datasmith_core::{
    BatchStatus, ClientConfig, GenerateRequest, JobStatusWatcher, SessionOutcome, SessionRegistry,
};
use std::sync::Arc;
use tokio::sync::mpsc;

pub async fn run(config: &ClientConfig, request: GenerateRequest) -> anyhow::Result<()> {
    let job = JobStatusWatcher::start(config, &request).await?;
    println!("Batch job started: {}", job.execution_id);

    let watcher = JobStatusWatcher::new(config, &job.execution_id)?;
    let handle = watcher.handle();

    let registry = Arc::new(SessionRegistry::new());
    registry.register(Arc::clone(&handle));
    cancel_on_interrupt(&registry);

    let (tx, mut rx) = mpsc::channel(8);
    let watch = tokio::spawn(watcher.watch(tx));

    let bar = progress_bar(None);
    let mut last: Option<BatchStatus> = None;

    while let Some(status) = rx.recv().await {
        match (status.processed, status.total) {
            (Some(processed), Some(total)) => {
                bar.set_length(total);
                bar.set_position(processed);
            }
            (Some(processed), None) => bar.set_position(processed),
            _ => bar.tick(),
        }
        if let Some(message) = &status.message {
            bar.set_message(message.clone());
        }
        last = Some(status);
    }

    let outcome = watch.await?;
    registry.unregister(&handle.id());
    bar.finish_and_clear();

    match outcome {
        SessionOutcome::Completed => {
            match last.and_then(|status| status.processed) {
                Some(processed) => println!("Batch job complete: {processed} rows processed"),
                None => println!("Batch job complete"),
            }
            Ok(())
        }
        SessionOutcome::Cancelled => {
            println!("Stopped watching; the job keeps running server-side");
            Ok(())
        }
        SessionOutcome::Failed(err) => Err(err.into()),
    }
}
