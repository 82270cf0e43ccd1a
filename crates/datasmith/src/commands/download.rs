//! Server-side export download command.

use datasmith_core::{ClientConfig, DownloadService, ExportFormat, GenerateRequest};
use std::path::PathBuf;

pub async fn run(
    config: &ClientConfig,
    request: GenerateRequest,
    format: ExportFormat,
    dir: PathBuf,
) -> anyhow::Result<()> {
    println!("Requesting {} export of {}...", format, request.table_name);
    let downloaded = DownloadService::download(config, &request, format, &dir).await?;
    println!(
        "Downloaded {} ({} bytes)",
        downloaded.path.display(),
        downloaded.bytes_written
    );
    Ok(())
}
