//! Frame sink over any tokio writer

use crate::{FrameSink, Result, TransportError};
use async_trait::async_trait;
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Writes the ETI stream to stdout, a file, or any other `AsyncWrite`
pub struct WriterSink<W> {
    writer: W,
    bytes_written: u64,
}

impl<W> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            bytes_written: 0,
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<tokio::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl WriterSink<tokio::fs::File> {
    /// Create (or truncate) `path` and write frames into it
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = tokio::fs::File::create(path).await.map_err(|e| {
            TransportError::io(format!("cannot create {}", path.display()), e)
        })?;
        Ok(Self::new(file))
    }
}

#[async_trait]
impl<W> FrameSink for WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer
            .write_all(bytes)
            .await
            .map_err(|e| TransportError::io("frame write failed", e))?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .await
            .map_err(|e| TransportError::io("frame flush failed", e))
    }
}
