//! # Timing Aligner
//!
//! Turns EDI time, the TAI-UTC offset and the TIST into an absolute UTC frame
//! time, and compares it with the wall clock. A positive delta means the frame
//! is scheduled for transmission in the future.

use chrono::{DateTime, Duration, Utc};

use crate::constants::EDI_EPOCH_UNIX_SECONDS;
use crate::metadata::FrameMetadata;
use crate::timestamp::TimestampInfo;

/// Absolute frame time and its distance from the wall clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTiming {
    pub frame_time: DateTime<Utc>,
    pub delta: Duration,
}

impl FrameTiming {
    /// Compute the frame time of `metadata`/`timestamp` against `now`
    pub fn align(metadata: &FrameMetadata, timestamp: &TimestampInfo, now: DateTime<Utc>) -> Self {
        let sub_second = Duration::microseconds((timestamp.pps_offset_ms * 1000.0).round() as i64);
        let frame_time = DateTime::<Utc>::default()
            + Duration::seconds(frame_unix_seconds(metadata))
            + sub_second;

        Self {
            frame_time,
            delta: frame_time - now,
        }
    }

    pub fn align_now(metadata: &FrameMetadata, timestamp: &TimestampInfo) -> Self {
        Self::align(metadata, timestamp, Utc::now())
    }

    pub fn delta_ms(&self) -> i64 {
        self.delta.num_milliseconds()
    }
}

/// Whole POSIX seconds of the frame, before the TIST is added
pub fn frame_unix_seconds(metadata: &FrameMetadata) -> i64 {
    EDI_EPOCH_UNIX_SECONDS + i64::from(metadata.edi_time) - i64::from(metadata.utc_offset)
}
