//! Throughput Reporting
//!
//! Cumulative receive statistics for the ETI stream. The clock starts on the
//! first frame and a report is produced the first time a frame arrives after
//! a new whole second has elapsed. Counters are never reset.

use std::fmt;
use std::time::{Duration, Instant};

/// Snapshot of the counters at a whole-second boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThroughputReport {
    pub elapsed: Duration,
    pub total_bytes: u64,
    pub total_frames: u64,
}

impl ThroughputReport {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    pub fn bytes_per_second(&self) -> f64 {
        let ms = self.elapsed.as_secs_f64() * 1000.0;
        if ms > 0.0 {
            self.total_bytes as f64 / ms * 1000.0
        } else {
            0.0
        }
    }

    pub fn ms_per_frame(&self) -> f64 {
        if self.total_frames > 0 {
            self.elapsed.as_secs_f64() * 1000.0 / self.total_frames as f64
        } else {
            0.0
        }
    }
}

impl fmt::Display for ThroughputReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Received {} bytes, {} frames in {} ms: {:.1} bytes/s, {:.3} ms/frame",
            self.total_bytes,
            self.total_frames,
            self.elapsed_ms(),
            self.bytes_per_second(),
            self.ms_per_frame()
        )
    }
}

/// Tracks bytes and frames received and reports once per elapsed second
#[derive(Debug, Default)]
pub struct ThroughputReporter {
    start: Option<Instant>,
    last_report_secs: u64,
    total_bytes: u64,
    total_frames: u64,
}

impl ThroughputReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one frame carrying `payload_len` bytes
    #[inline]
    pub fn record_frame(&mut self, payload_len: usize) -> Option<ThroughputReport> {
        self.record_frame_at(Instant::now(), payload_len)
    }

    /// Count one frame observed at `now`
    ///
    /// The boundary check runs before the frame is counted, so a report
    /// covers the frames received up to, but not including, this one.
    pub fn record_frame_at(&mut self, now: Instant, payload_len: usize) -> Option<ThroughputReport> {
        let start = *self.start.get_or_insert(now);
        let elapsed = now.saturating_duration_since(start);

        let report = if elapsed.as_secs() > self.last_report_secs {
            self.last_report_secs = elapsed.as_secs();
            Some(self.snapshot(elapsed))
        } else {
            None
        };

        self.total_bytes += payload_len as u64;
        self.total_frames += 1;
        report
    }

    /// Current counters measured against `now`, if a frame has been seen
    pub fn summary_at(&self, now: Instant) -> Option<ThroughputReport> {
        self.start
            .map(|start| self.snapshot(now.saturating_duration_since(start)))
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    fn snapshot(&self, elapsed: Duration) -> ThroughputReport {
        ThroughputReport {
            elapsed,
            total_bytes: self.total_bytes,
            total_frames: self.total_frames,
        }
    }
}
