//! # Message Processor
//!
//! Turns one ZeroMQ message into four canonical ETI frames and, when enabled,
//! decodes the per-frame metadata and TIST to align each frame against the
//! wall clock.
//!
//! ## Error Classes
//!
//! - Envelope and reassembly errors are returned as `Err`: nothing of the
//!   message may be written.
//! - Metadata and timestamp errors are collected in
//!   [`ProcessedMessage::diagnostic_errors`]; the frames themselves are valid.
//! - FSYNC mismatches are only counted.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use eti_codec::{
    extract_timestamp, inspect_frame_sync, FrameMetadata, FrameSet, FrameTiming, MetadataReader,
    ProtocolError, ProtocolResult, Reassembler, SyncInfo, TimestampInfo,
};
use eti_config::DiagnosticsConfig;

/// Which optional diagnostics run for every message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingOptions {
    /// Decode metadata and TIST and log frame timing
    pub decode_timestamps: bool,
    /// Check ERR/FSYNC of every frame that carries data
    pub check_frame_sync: bool,
}

impl From<&DiagnosticsConfig> for ProcessingOptions {
    fn from(config: &DiagnosticsConfig) -> Self {
        Self {
            decode_timestamps: config.timestamps,
            check_frame_sync: config.frame_sync_enabled(),
        }
    }
}

/// Diagnostics of one frame; fields stay `None` when disabled or undecodable
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameDiagnostics {
    pub metadata: Option<FrameMetadata>,
    pub timestamp: Option<TimestampInfo>,
    pub timing: Option<FrameTiming>,
    pub sync: Option<SyncInfo>,
}

/// Result of processing one message
#[derive(Debug)]
pub struct ProcessedMessage<'a> {
    pub frames: &'a FrameSet,
    pub diagnostics: Vec<FrameDiagnostics>,
    /// Metadata and timestamp failures, in frame order
    pub diagnostic_errors: Vec<ProtocolError>,
    /// Frames with data whose FSYNC word was not recognised
    pub sync_errors: usize,
}

/// Reassembles messages into a reused frame buffer
#[derive(Debug, Default)]
pub struct MessageProcessor {
    reassembler: Reassembler,
    options: ProcessingOptions,
}

impl MessageProcessor {
    pub fn new(options: ProcessingOptions) -> Self {
        Self {
            reassembler: Reassembler::new(),
            options,
        }
    }

    pub fn options(&self) -> ProcessingOptions {
        self.options
    }

    /// Process `message`, aligning frame times against `now`
    pub fn process(&mut self, message: &[u8], now: DateTime<Utc>) -> ProtocolResult<ProcessedMessage<'_>> {
        let reassembly = self.reassembler.reassemble(message)?;
        let frames = reassembly.frames;
        debug!(
            lengths = ?reassembly.envelope.subframe_lengths,
            metadata_len = reassembly.metadata.len(),
            "Reassembled message"
        );

        let mut diagnostics = vec![FrameDiagnostics::default(); frames.frames().count()];
        let mut diagnostic_errors = Vec::new();
        let mut sync_errors = 0;

        if self.options.check_frame_sync {
            for (index, frame) in frames.frames().enumerate() {
                if frames.payload_len(index) == 0 {
                    continue;
                }
                match inspect_frame_sync(frame) {
                    Ok(sync) => {
                        if !sync.is_synchronised() {
                            warn!(frame = index, fsync = ?sync.fsync, "Frame is not synchronised");
                            sync_errors += 1;
                        }
                        diagnostics[index].sync = Some(sync);
                    }
                    Err(e) => {
                        warn!(frame = index, "Cannot read frame sync: {}", e);
                        sync_errors += 1;
                    }
                }
            }
        }

        if self.options.decode_timestamps {
            let mut reader = MetadataReader::new(reassembly.metadata);
            for (index, frame) in frames.frames().enumerate() {
                // Group boundaries are unknown after a failed group
                let metadata = match reader.next_group() {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        warn!(frame = index, "Metadata decoding failed: {}", e);
                        diagnostic_errors.push(e);
                        break;
                    }
                };
                diagnostics[index].metadata = Some(metadata);

                match extract_timestamp(frame, metadata.dlfc) {
                    Ok(timestamp) => {
                        let timing = FrameTiming::align(&metadata, &timestamp, now);
                        log_frame_timing(&metadata, &timestamp, &timing);
                        diagnostics[index].timestamp = Some(timestamp);
                        diagnostics[index].timing = Some(timing);
                    }
                    Err(e) => {
                        warn!(frame = index, dlfc = metadata.dlfc, "TIST decoding failed: {}", e);
                        diagnostic_errors.push(e);
                    }
                }
            }
        }

        Ok(ProcessedMessage {
            frames,
            diagnostics,
            diagnostic_errors,
            sync_errors,
        })
    }
}

fn log_frame_timing(metadata: &FrameMetadata, timestamp: &TimestampInfo, timing: &FrameTiming) {
    info!(
        dlfc = metadata.dlfc,
        utco = metadata.utc_offset,
        edi_time = metadata.edi_time,
        tist_ms = timestamp.pps_offset_ms,
        t_frame = %timing.frame_time.to_rfc3339(),
        delta_ms = timing.delta_ms(),
        "Metadata: DLFC={:5} UTCO={:3} EDI_TIME={:10}, TIST {:.3} ms, Delta={} ms",
        metadata.dlfc,
        metadata.utc_offset,
        metadata.edi_time,
        timestamp.pps_offset_ms,
        timing.delta_ms()
    );
    if timestamp.is_advisory() {
        debug!(dlfc = metadata.dlfc, "TIST beyond one second");
    }
}
