//! Frame scheduling seam.
//!
//! A scheduler wraps the platform's "call me on the next frame" primitive plus its
//! high-resolution clock. Cancellation always goes through the handle returned by
//! the scheduling call.

use std::fmt::Debug;

use instant::Instant;
use serde::{Deserialize, Serialize};

use crate::error::PlayerError;
use crate::timing::MILLIS_PER_SECOND;

pub trait FrameScheduler {
    /// Identifies one scheduled callback.
    type Handle: Copy + Debug + PartialEq;

    /// Schedule the player's frame callback for the next frame.
    fn request_frame(&mut self) -> Result<Self::Handle, PlayerError>;

    /// Cancel a callback previously returned by `request_frame`. Unknown or
    /// already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: Self::Handle);

    /// Current time in milliseconds, same clock as frame timestamps.
    fn now(&self) -> f64;
}

/// Handle issued by the in-process schedulers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameHandle(pub u64);

/// Frame requests waiting for the host to fire them.
#[derive(Debug, Default)]
struct PendingFrames {
    next_id: u64,
    pending: Vec<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl PendingFrames {
    fn request(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if let Some(idx) = self.pending.iter().position(|h| *h == handle) {
            self.pending.remove(idx);
            self.cancelled += 1;
        }
    }

    /// Oldest pending request, consumed.
    fn take_due(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }
}

/// Deterministic scheduler: the host sets the clock and fires frames itself.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: f64,
    frames: PendingFrames,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now_ms: f64) -> Self {
        Self {
            now_ms,
            ..Self::default()
        }
    }

    pub fn set_now(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }

    /// Advance the clock to `timestamp_ms` and consume the due frame request, if any.
    pub fn fire(&mut self, timestamp_ms: f64) -> Option<FrameHandle> {
        self.now_ms = timestamp_ms;
        self.frames.take_due()
    }

    /// Requests scheduled and not yet fired or cancelled.
    pub fn pending(&self) -> &[FrameHandle] {
        &self.frames.pending
    }

    pub fn requested_count(&self) -> u64 {
        self.frames.requested
    }

    pub fn cancelled_count(&self) -> u64 {
        self.frames.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    type Handle = FrameHandle;

    fn request_frame(&mut self) -> Result<FrameHandle, PlayerError> {
        Ok(self.frames.request())
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.cancel(handle);
    }

    fn now(&self) -> f64 {
        self.now_ms
    }
}

/// Native scheduler on a monotonic clock. The host's own loop calls
/// [`crate::Player::poll`] once per frame.
#[derive(Debug)]
pub struct InstantScheduler {
    origin: Instant,
    frames: PendingFrames,
}

impl InstantScheduler {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            frames: PendingFrames::default(),
        }
    }

    /// Consume the due frame request, if any, returning its timestamp.
    pub fn take_due(&mut self) -> Option<(FrameHandle, f64)> {
        let handle = self.frames.take_due()?;
        Some((handle, self.now()))
    }

    pub fn has_pending(&self) -> bool {
        !self.frames.pending.is_empty()
    }
}

impl Default for InstantScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for InstantScheduler {
    type Handle = FrameHandle;

    fn request_frame(&mut self) -> Result<FrameHandle, PlayerError> {
        Ok(self.frames.request())
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.cancel(handle);
    }

    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * MILLIS_PER_SECOND
    }
}
