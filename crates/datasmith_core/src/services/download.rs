//! Server-side export download.
//!
//! The service can render an export itself; the client's job is only to POST
//! the generation request to the format-specific endpoint and stream the
//! opaque binary body into a local file sink.

use crate::config::ClientConfig;
use crate::error::DatasmithError;
use crate::export::ExportFormat;
use crate::models::GenerateRequest;

use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWriteExt, BufWriter};

/// Result of a completed download.
#[derive(Debug)]
pub struct DownloadedFile {
    /// Where the payload was written.
    pub path: PathBuf,
    /// Number of body bytes written.
    pub bytes_written: u64,
}

/// Downloads server-rendered exports to local files.
pub struct DownloadService;

impl DownloadService {
    /// Download the server-side export of `request` in `format`.
    ///
    /// The file is named `<table_name>.<ext>` inside `dest_dir`. The body is
    /// never interpreted; it flows chunk by chunk into a buffered writer.
    pub async fn download(
        config: &ClientConfig,
        request: &GenerateRequest,
        format: ExportFormat,
        dest_dir: &Path,
    ) -> Result<DownloadedFile, DatasmithError> {
        request.validate()?;
        if !dest_dir.is_dir() {
            return Err(DatasmithError::sink(format!(
                "Directory does not exist: {}",
                dest_dir.display()
            )));
        }

        let client = config.http_client()?;
        let url = config.download_url(format.extension());
        tracing::debug!(table = %request.table_name, format = %format, "Starting download");

        let response = client.post(url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DatasmithError::http(status.as_u16()));
        }

        let path = dest_dir.join(format!("{}.{}", request.table_name, format.extension()));
        let file = tokio::fs::File::create(&path).await?;
        let mut writer = BufWriter::with_capacity(256 * 1024, file);

        let mut body = response.bytes_stream();
        let mut bytes_written: u64 = 0;
        while let Some(chunk) = body.next().await {
            let bytes = chunk.map_err(DatasmithError::from)?;
            writer.write_all(&bytes).await?;
            bytes_written += bytes.len() as u64;
        }
        writer.flush().await?;

        tracing::debug!(path = %path.display(), bytes_written, "Download finished");
        Ok(DownloadedFile { path, bytes_written })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnDescriptor, SchemaDescriptor};

    #[tokio::test]
    async fn missing_directory_is_a_sink_error() {
        let request = GenerateRequest {
            table_name: "users".into(),
            schema: SchemaDescriptor {
                columns: vec![ColumnDescriptor {
                    name: "id".into(),
                    data_type: "bigint".into(),
                    nullable: false,
                }],
            },
            row_count: 10,
            seed: 1,
            ml_model_id: None,
        };
        let err = DownloadService::download(
            &ClientConfig::default(),
            &request,
            ExportFormat::Csv,
            Path::new("/definitely/not/a/real/dir"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.category(), "Sink");
    }
}
