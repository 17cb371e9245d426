//! # ZMQ ETI Receiver
//!
//! ## Purpose
//!
//! Subscribes to the ZeroMQ ETI output of a DAB multiplexer, reassembles each
//! message into four 6144-byte ETI(NI) frames and writes the raw ETI stream
//! to stdout or a file. Optionally decodes the per-frame metadata and TIST to
//! show how far ahead of the wall clock each frame is scheduled.
//!
//! ## Integration Points
//!
//! - **Input**: [`eti_network::MessageSource`] (ZeroMQ SUB in production)
//! - **Parsing**: [`eti_codec`] envelope, reassembly, metadata and TIST decoding
//! - **Output**: [`eti_network::FrameSink`] (stdout or a file)
//! - **Configuration**: [`eti_config::ReceiverConfig`]

pub mod processor;
pub mod receiver;

pub use processor::{FrameDiagnostics, MessageProcessor, ProcessedMessage, ProcessingOptions};
pub use receiver::{EtiReceiver, ReceiverError, RunSummary, StopReason};
