//! Command-line interface definitions.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use datasmith_core::config::DEFAULT_PREVIEW_CAPACITY;
use datasmith_core::{ExportFormat, GenerateRequest, SchemaDescriptor};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Terminal client for a streaming data-generation service.
#[derive(Debug, Parser)]
#[command(name = "datasmith", version, about)]
pub struct Cli {
    /// Orchestrator base URL
    #[arg(long, global = true, default_value = "http://localhost:8081")]
    pub endpoint: String,

    /// Log filter override (like RUST_LOG)
    #[arg(long, global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Stream generated rows and show a capped live preview
    Preview {
        #[command(flatten)]
        generate: GenerateArgs,

        /// Preview buffer capacity
        #[arg(long, default_value_t = DEFAULT_PREVIEW_CAPACITY)]
        capacity: usize,
    },

    /// Stream to completion, then encode the result locally
    Export {
        #[command(flatten)]
        generate: GenerateArgs,

        /// Output format
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Output file path (default: policy-generated name in the
        /// current directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Let the service render the export and download it
    Download {
        #[command(flatten)]
        generate: GenerateArgs,

        /// Output format
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Directory to download into
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Start a server-side batch insert job and watch it to completion
    Batch {
        #[command(flatten)]
        generate: GenerateArgs,
    },
}

/// Arguments describing one generation request.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Target table name
    #[arg(long)]
    pub table: String,

    /// Path to a JSON schema descriptor file
    #[arg(long)]
    pub schema: PathBuf,

    /// Number of rows to generate
    #[arg(long, default_value_t = 1000)]
    pub rows: u64,

    /// Generation seed (default: current time in milliseconds)
    #[arg(long)]
    pub seed: Option<i64>,

    /// Trained model to generate from
    #[arg(long)]
    pub model: Option<String>,
}

impl GenerateArgs {
    /// Load the schema file and build the request.
    pub fn into_request(self) -> anyhow::Result<GenerateRequest> {
        let schema_text = std::fs::read_to_string(&self.schema)
            .with_context(|| format!("Failed to read schema file {}", self.schema.display()))?;
        let schema: SchemaDescriptor = serde_json::from_str(&schema_text)
            .with_context(|| format!("Invalid schema file {}", self.schema.display()))?;

        let seed = match self.seed {
            Some(seed) => seed,
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as i64)
                .unwrap_or(0),
        };

        Ok(GenerateRequest {
            table_name: self.table,
            schema,
            row_count: self.rows,
            seed,
            ml_model_id: self.model,
        })
    }
}
