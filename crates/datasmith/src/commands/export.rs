//! Local export command: stream to completion, then encode.

use crate::commands::{cancel_on_interrupt, progress_bar};
use datasmith_core::{
    export, ClientConfig, ExportFormat, GenerateRequest, Record, SessionOutcome, SessionRegistry,
    StreamEvent, StreamSession, TableSet,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

pub async fn run(
    config: &ClientConfig,
    request: GenerateRequest,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let table_name = request.table_name.clone();
    let total = request.row_count;

    let session = StreamSession::new(config, request)?;
    let handle = session.handle();

    let registry = Arc::new(SessionRegistry::new());
    registry.register(Arc::clone(&handle));
    cancel_on_interrupt(&registry);

    let (tx, mut rx) = mpsc::channel(32);
    let run = tokio::spawn(session.run(tx));

    let bar = progress_bar(Some(total));
    let mut rows: Vec<Record> = Vec::new();

    while let Some(event) = rx.recv().await {
        match event {
            StreamEvent::Rows(batch) => rows.extend(batch),
            StreamEvent::Progress(update) => {
                if let Some(total) = update.total {
                    bar.set_length(total);
                }
                if let Some(current) = update.current {
                    bar.set_position(current);
                }
            }
        }
    }

    let outcome = run.await?;
    registry.unregister(&handle.id());
    bar.finish_and_clear();

    match outcome {
        SessionOutcome::Completed => {}
        SessionOutcome::Cancelled => {
            println!("Cancelled; nothing was exported");
            return Ok(());
        }
        SessionOutcome::Failed(err) => return Err(err.into()),
    }

    let mut tables = TableSet::default();
    tables.insert(table_name, rows);

    let payload = match export(&tables, format, None) {
        Ok(payload) => payload,
        Err(err) if err.is_empty_export() => {
            // Guidance, not a stack trace.
            println!("The service produced no rows; there is nothing to export.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let path = output.unwrap_or_else(|| PathBuf::from(&payload.filename));
    tokio::fs::write(&path, &payload.bytes).await?;
    println!(
        "Wrote {} ({} bytes, {})",
        path.display(),
        payload.bytes.len(),
        payload.content_type
    );
    Ok(())
}
