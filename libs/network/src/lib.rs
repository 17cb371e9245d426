//! Network Infrastructure
//!
//! Receives ETI messages from a ZeroMQ publisher, writes reassembled frames
//! to an output stream and keeps the throughput statistics of the run.

pub mod error;
pub mod performance;
pub mod transports;

// Re-export commonly used types
pub use error::{Result, TransportError};
pub use performance::{ThroughputReport, ThroughputReporter};
pub use transports::{
    FrameSink, MemorySink, MemorySource, MessageSource, TransportInfo, TransportType,
    WriterSink, ZmqSubscriber, ZmqSubscriberConfig,
};
