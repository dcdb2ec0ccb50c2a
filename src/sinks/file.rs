//! Durable log sink

use std::path::Path;

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::Sink;

/// Append-only log file holding the sampler's durable record.
///
/// The file is opened once at startup and the handle is held for the process
/// lifetime; nothing else writes to the path while the sampler runs. Each run
/// appends its own header block followed by tick blocks. The file is never
/// truncated or rewritten.
pub struct FileLogSink {
    file: File,
}

impl FileLogSink {
    /// Open the log for appending and write the one-time header block.
    ///
    /// The parent directory is created if absent.
    pub async fn open(path: &Path, header: &str) -> std::io::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path).await?;

        file.write_all(header.as_bytes()).await?;
        file.flush().await?;

        debug!("opened durable log at {}", path.display());

        Ok(Self { file })
    }
}

#[async_trait]
impl Sink for FileLogSink {
    async fn emit(&mut self, block: &str) -> std::io::Result<()> {
        self.file.write_all(block.as_bytes()).await?;
        self.file.flush().await
    }
}
