//! Streaming preview command.

use crate::commands::{cancel_on_interrupt, progress_bar};
use datasmith_core::{
    ClientConfig, GenerateRequest, PreviewAggregator, SessionOutcome, SessionRegistry,
    StreamEvent, StreamSession,
};
use serde_json::Value;
use std::sync::Arc;
use tabled::builder::Builder;
use tabled::settings::Style;
use tokio::sync::mpsc;

/// Cell values longer than this are shortened for display.
const MAX_CELL_WIDTH: usize = 50;

pub async fn run(config: &ClientConfig, request: GenerateRequest) -> anyhow::Result<()> {
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
    let mut preview = PreviewAggregator::new(config.preview_capacity);

    while let Some(event) = rx.recv().await {
        match event {
            StreamEvent::Rows(rows) => preview.accept(&rows),
            StreamEvent::Progress(update) => {
                if let Some(total) = update.total {
                    bar.set_length(total);
                }
                if let Some(current) = update.current {
                    bar.set_position(current);
                }
                if let Some(percent) = update.percent {
                    bar.set_message(format!("{percent:.0}%"));
                }
            }
        }
    }

    let outcome = run.await?;
    registry.unregister(&handle.id());
    bar.finish_and_clear();

    match outcome {
        SessionOutcome::Completed => {
            println!("Generated {} rows for {}", preview.seen(), table_name);
            if !preview.is_empty() {
                println!("{}", render_preview(&preview));
                println!("Showing first {} rows", preview.len());
            }
            Ok(())
        }
        SessionOutcome::Cancelled => {
            println!("Cancelled after {} rows", preview.seen());
            Ok(())
        }
        SessionOutcome::Failed(err) => Err(err.into()),
    }
}

fn render_preview(preview: &PreviewAggregator) -> String {
    let columns = preview.columns();

    let mut builder = Builder::default();
    builder.push_record(std::iter::once("#".to_string()).chain(columns.iter().cloned()));
    for (index, row) in preview.rows().iter().enumerate() {
        builder.push_record(
            std::iter::once((index + 1).to_string())
                .chain(columns.iter().map(|column| render_cell(row.get(column)))),
        );
    }

    builder.build().with(Style::sharp()).to_string()
}

fn render_cell(value: Option<&Value>) -> String {
    let text = match value {
        None | Some(Value::Null) => return "NULL".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    if text.chars().count() > MAX_CELL_WIDTH {
        let shortened: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{shortened}...")
    } else {
        text
    }
}
