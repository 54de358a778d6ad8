//! Frame timing. Platform frame timestamps are high-resolution milliseconds;
//! playables are handed seconds.

use serde::{Deserialize, Serialize};

pub const MILLIS_PER_SECOND: f64 = 1000.0;

#[inline]
pub fn millis_to_seconds(millis: f64) -> f64 {
    millis / MILLIS_PER_SECOND
}

/// Previous-frame reference for delta computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameTiming {
    last_update: Option<f64>,
}

impl FrameTiming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the loop start time.
    #[inline]
    pub fn start(&mut self, now_ms: f64) {
        self.last_update = Some(now_ms);
    }

    /// Seconds between the previous reference and `timestamp_ms`.
    /// No clamping or smoothing; equal timestamps give zero.
    #[inline]
    pub fn delta_seconds(&self, timestamp_ms: f64) -> f64 {
        let last = self.last_update.unwrap_or(timestamp_ms);
        millis_to_seconds(timestamp_ms - last)
    }

    /// Make `timestamp_ms` the reference for the next frame.
    #[inline]
    pub fn record(&mut self, timestamp_ms: f64) {
        self.last_update = Some(timestamp_ms);
    }

    #[inline]
    pub fn last_update(&self) -> Option<f64> {
        self.last_update
    }
}

/// Counters for the current run of the frame loop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoopMetrics {
    /// Timestamp (ms) recorded when the loop was last started
    pub started_at_ms: f64,
    /// Number of `update` calls that returned successfully
    pub frames_dispatched: u64,
    /// Sum of all deltas handed to the playable
    pub elapsed_seconds: f64,
    /// Delta of the most recent frame
    pub last_delta_seconds: f64,
}

impl LoopMetrics {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn reset(&mut self, started_at_ms: f64) {
        *self = Self {
            started_at_ms,
            ..Self::default()
        };
    }

    #[inline]
    pub fn record_frame(&mut self, delta_seconds: f64) {
        self.frames_dispatched += 1;
        self.elapsed_seconds += delta_seconds;
        self.last_delta_seconds = delta_seconds;
    }
}
