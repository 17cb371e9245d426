//! Transport Layer
//!
//! The receive loop talks to two collaborators: a [`MessageSource`] that
//! yields one complete ETI message per call, and a [`FrameSink`] that takes
//! the reassembled frames in order.

use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;

pub mod memory;
pub mod sink;
pub mod zmq;

pub use memory::{MemorySink, MemorySource};
pub use sink::WriterSink;
pub use zmq::{ZmqSubscriber, ZmqSubscriberConfig};

/// Source of complete transport messages
///
/// `receive` returns [`TransportError::Interrupted`](crate::TransportError::Interrupted)
/// when a retry is appropriate and [`TransportError::Closed`](crate::TransportError::Closed)
/// once no further messages will arrive. Every other error is fatal.
#[async_trait]
pub trait MessageSource: Send {
    /// Wait for the next message
    async fn receive(&mut self) -> Result<Bytes>;

    /// Get transport-specific information
    fn transport_info(&self) -> TransportInfo;
}

/// Destination for reassembled ETI frames
#[async_trait]
pub trait FrameSink: Send {
    /// Append bytes to the output stream
    async fn append(&mut self, bytes: &[u8]) -> Result<()>;

    /// Push buffered output to its destination
    async fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Transport type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportType {
    /// ZeroMQ SUB socket
    ZmqSub,
    /// In-process scripted source
    Memory,
}

/// Transport information for monitoring
#[derive(Debug, Clone)]
pub struct TransportInfo {
    pub transport_type: TransportType,
    pub remote_address: Option<String>,
    pub messages_received: u64,
    pub bytes_received: u64,
}
