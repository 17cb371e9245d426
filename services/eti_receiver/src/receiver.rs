//! # ETI Receiver
//!
//! The receive loop: await one message, process it synchronously, append its
//! frames to the sink, repeat. The only suspension points are the receive
//! and the sink write, so frames leave in the order messages arrived.
//!
//! ```text
//! MessageSource → [MessageProcessor] → FrameSink
//!                        ↓
//!              ThroughputReporter (stderr)
//! ```

use chrono::Utc;
use std::fmt;
use std::future::Future;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use eti_codec::ProtocolError;
use eti_config::{ErrorPolicy, ReceiverConfig};
use eti_network::{FrameSink, MessageSource, ThroughputReporter, TransportError};

use crate::processor::{MessageProcessor, ProcessingOptions};

/// Why a run ended
#[derive(Debug, Error)]
pub enum ReceiverError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// Raised under [`ErrorPolicy::Abort`] only
    #[error("message {message}: {source}")]
    Protocol {
        /// 1-based index of the offending message
        message: u64,
        source: ProtocolError,
    },
}

pub type Result<T> = std::result::Result<T, ReceiverError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The source reported `Closed`
    SourceClosed,
    /// The shutdown future completed
    Shutdown,
}

/// Counters of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub messages_received: u64,
    pub messages_written: u64,
    pub messages_dropped: u64,
    pub frames_written: u64,
    pub payload_bytes: u64,
    pub diagnostic_errors: u64,
    pub sync_errors: u64,
    pub interruptions: u64,
    pub stop_reason: StopReason,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} messages received, {} written, {} dropped; {} frames ({} payload bytes); \
             {} diagnostic errors, {} sync errors, {} interruptions",
            self.messages_received,
            self.messages_written,
            self.messages_dropped,
            self.frames_written,
            self.payload_bytes,
            self.diagnostic_errors,
            self.sync_errors,
            self.interruptions
        )
    }
}

#[derive(Debug, Default)]
struct Counters {
    messages_received: u64,
    messages_written: u64,
    messages_dropped: u64,
    frames_written: u64,
    diagnostic_errors: u64,
    sync_errors: u64,
    interruptions: u64,
}

/// Receives ETI messages from `S` and writes their frames to `K`
pub struct EtiReceiver<S, K> {
    source: S,
    sink: K,
    processor: MessageProcessor,
    reporter: ThroughputReporter,
    policy: ErrorPolicy,
    counters: Counters,
}

impl<S, K> EtiReceiver<S, K>
where
    S: MessageSource,
    K: FrameSink,
{
    pub fn new(source: S, sink: K, options: ProcessingOptions, policy: ErrorPolicy) -> Self {
        Self {
            source,
            sink,
            processor: MessageProcessor::new(options),
            reporter: ThroughputReporter::new(),
            policy,
            counters: Counters::default(),
        }
    }

    pub fn from_config(source: S, sink: K, config: &ReceiverConfig) -> Self {
        Self::new(
            source,
            sink,
            ProcessingOptions::from(&config.diagnostics),
            config.errors.policy,
        )
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Run until the source closes or a fatal error occurs
    pub async fn run(&mut self) -> Result<RunSummary> {
        self.run_until(std::future::pending()).await
    }

    /// Run until the source closes, `shutdown` completes, or a fatal error occurs
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<RunSummary>
    where
        F: Future<Output = ()>,
    {
        info!(
            policy = %self.policy,
            timestamps = self.processor.options().decode_timestamps,
            frame_sync = self.processor.options().check_frame_sync,
            "Receiver started"
        );
        tokio::pin!(shutdown);

        let stop_reason = loop {
            let received = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break StopReason::Shutdown;
                }
                received = self.source.receive() => received,
            };

            match received {
                Ok(message) => self.handle_message(&message).await?,
                Err(e) if e.is_retryable() => {
                    debug!("Receive interrupted, retrying");
                    self.counters.interruptions += 1;
                }
                Err(e) if e.is_closed() => {
                    info!("Source closed");
                    break StopReason::SourceClosed;
                }
                Err(e) => {
                    error!("Receive failed: {}", e);
                    return Err(e.into());
                }
            }
        };

        self.sink.flush().await?;
        if let Some(report) = self.reporter.summary_at(Instant::now()) {
            info!(
                bytes = report.total_bytes,
                frames = report.total_frames,
                elapsed_ms = report.elapsed_ms(),
                "{}",
                report
            );
        }
        Ok(self.summary(stop_reason))
    }

    async fn handle_message(&mut self, message: &[u8]) -> Result<()> {
        self.counters.messages_received += 1;
        let index = self.counters.messages_received;

        let processed = match self.processor.process(message, Utc::now()) {
            Ok(processed) => processed,
            Err(e) => return reject(&mut self.counters, self.policy, index, e),
        };

        self.counters.sync_errors += processed.sync_errors as u64;
        if let Some(first) = processed.diagnostic_errors.first() {
            self.counters.diagnostic_errors += processed.diagnostic_errors.len() as u64;
            if self.policy == ErrorPolicy::Abort {
                error!(message = index, "Aborting on diagnostic error: {}", first);
                return Err(ReceiverError::Protocol {
                    message: index,
                    source: first.clone(),
                });
            }
        }

        let frame_count = processed.frames.frames().count();
        for i in 0..frame_count {
            if let Some(report) = self.reporter.record_frame(processed.frames.payload_len(i)) {
                info!(
                    bytes = report.total_bytes,
                    frames = report.total_frames,
                    elapsed_ms = report.elapsed_ms(),
                    "{}",
                    report
                );
            }
        }

        self.sink.append(processed.frames.as_bytes()).await?;
        self.counters.frames_written += frame_count as u64;
        self.counters.messages_written += 1;
        Ok(())
    }

    fn summary(&self, stop_reason: StopReason) -> RunSummary {
        RunSummary {
            messages_received: self.counters.messages_received,
            messages_written: self.counters.messages_written,
            messages_dropped: self.counters.messages_dropped,
            frames_written: self.counters.frames_written,
            payload_bytes: self.reporter.total_bytes(),
            diagnostic_errors: self.counters.diagnostic_errors,
            sync_errors: self.counters.sync_errors,
            interruptions: self.counters.interruptions,
            stop_reason,
        }
    }
}

/// Apply the error policy to a message that failed reassembly
fn reject(counters: &mut Counters, policy: ErrorPolicy, index: u64, e: ProtocolError) -> Result<()> {
    match policy {
        ErrorPolicy::Skip => {
            warn!(message = index, "Dropping malformed message: {}", e);
            counters.messages_dropped += 1;
            Ok(())
        }
        ErrorPolicy::Abort => {
            error!(message = index, "Malformed message: {}", e);
            Err(ReceiverError::Protocol {
                message: index,
                source: e,
            })
        }
    }
}
