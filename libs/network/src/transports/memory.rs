//! In-process transports
//!
//! A scripted [`MemorySource`] and a capturing [`MemorySink`], used to drive
//! the receive loop without a ZeroMQ publisher.

use crate::{FrameSink, MessageSource, Result, TransportError, TransportInfo, TransportType};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::VecDeque;

/// Replays queued messages and errors, then reports `Closed`
#[derive(Default)]
pub struct MemorySource {
    queue: VecDeque<Result<Bytes>>,
    messages_received: u64,
    bytes_received: u64,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages<I, B>(messages: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        let mut source = Self::new();
        for message in messages {
            source.push_message(message);
        }
        source
    }

    pub fn push_message(&mut self, message: impl Into<Bytes>) -> &mut Self {
        self.queue.push_back(Ok(message.into()));
        self
    }

    pub fn push_error(&mut self, error: TransportError) -> &mut Self {
        self.queue.push_back(Err(error));
        self
    }

    /// Entries not yet handed out
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[async_trait]
impl MessageSource for MemorySource {
    async fn receive(&mut self) -> Result<Bytes> {
        let message = self.queue.pop_front().unwrap_or(Err(TransportError::Closed))?;
        self.messages_received += 1;
        self.bytes_received += message.len() as u64;
        Ok(message)
    }

    fn transport_info(&self) -> TransportInfo {
        TransportInfo {
            transport_type: TransportType::Memory,
            remote_address: None,
            messages_received: self.messages_received,
            bytes_received: self.bytes_received,
        }
    }
}

/// Collects everything appended to it
#[derive(Debug, Default)]
pub struct MemorySink {
    data: Vec<u8>,
    appends: usize,
    flushes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn append_count(&self) -> usize {
        self.appends
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

#[async_trait]
impl FrameSink for MemorySink {
    async fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.data.extend_from_slice(bytes);
        self.appends += 1;
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
