//! Frame timing and delta time.
//!
//! The [`Time`] value is advanced by the [`Engine`](crate::engine::Engine) at
//! the start of each frame and copied into the scene, where component hooks
//! and task waits read it. It can follow the real clock
//! ([`update`](Time::update)) or be stepped manually
//! ([`advance`](Time::advance)) for deterministic, headless frames.

use std::time::{Duration, Instant};

/// Frame timing: monotonically increasing elapsed time, previous-frame delta,
/// and a frame counter.
///
/// Elapsed time is the sum of frame deltas, never a wall-clock difference, so
/// real-clock and manual frames may interleave freely.
#[derive(Clone, Copy)]
pub struct Time {
    /// Wall-clock anchor of the most recent frame, real or manual.
    frame_start: Instant,
    /// Duration of the previous frame.
    delta: Duration,
    /// Total frame time accumulated so far.
    elapsed: Duration,
    /// Frame counter.
    frame_count: u64,
}

impl Time {
    pub(crate) fn new() -> Self {
        Self {
            frame_start: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Advance using the real clock. Call once at the start of each frame.
    pub(crate) fn update(&mut self) {
        let now = Instant::now();
        self.delta = now - self.frame_start;
        self.frame_start = now;
        self.elapsed += self.delta;
        self.frame_count += 1;
    }

    /// Advance by an explicit delta, ignoring the real clock. The wall-clock
    /// anchor is refreshed so a later [`update`](Time::update) measures from
    /// here rather than from before the manual frames.
    pub(crate) fn advance(&mut self, dt: Duration) {
        self.frame_start = Instant::now();
        self.delta = dt;
        self.elapsed += dt;
        self.frame_count += 1;
    }

    /// Duration of the previous frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Delta time in seconds (f32), the most common way to use it.
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Total elapsed time since startup. Monotonically increasing.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Total elapsed time in seconds (f32).
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Number of frames ticked so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
