//! Time management for the game loop.

use std::time::{Duration, Instant};

/// Largest step any system integrates in one frame. Longer frames (tab in the
/// background, a GC pause in the host) are clamped to this instead of skipped.
pub const MAX_FRAME_DT: f32 = 0.05;

/// Clamp a raw frame delta into `[0, MAX_FRAME_DT]`. Non-finite input becomes zero.
#[inline]
pub fn clamp_dt(raw: f32) -> f32 {
    if raw.is_finite() {
        raw.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    }
}

/// Manages frame timing and delta time calculation.
///
/// Simulation time only advances by clamped deltas, so `elapsed_seconds` is the
/// clock every animated system (bird bobbing, cape wind, limb swing) reads.
#[derive(Debug)]
pub struct Time {
    /// Wall-clock time of the last frame.
    last_frame: Instant,
    /// Raw (unclamped) duration of the last frame.
    raw_delta: Duration,
    /// Clamped delta of the last frame, in seconds.
    delta: f32,
    /// Sum of clamped deltas since start.
    elapsed: f64,
    /// Frame count since start.
    frame_count: u64,
    /// Number of frames whose raw delta exceeded `MAX_FRAME_DT`.
    hitches: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            raw_delta: Duration::ZERO,
            delta: 0.0,
            elapsed: 0.0,
            frame_count: 0,
            hitches: 0,
        }
    }

    /// Update timing from the wall clock at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        let raw = now - self.last_frame;
        self.last_frame = now;
        self.advance(raw.as_secs_f32());
        self.raw_delta = raw;
    }

    /// Advance by an externally measured frame delta (seconds). Returns the clamped step.
    pub fn advance(&mut self, raw_dt: f32) -> f32 {
        let dt = clamp_dt(raw_dt);
        if raw_dt > MAX_FRAME_DT {
            self.hitches += 1;
            log::debug!("frame hitch: {:.3}s clamped to {:.3}s", raw_dt, dt);
        }
        self.raw_delta = Duration::from_secs_f32(raw_dt.max(0.0).min(3600.0));
        self.delta = dt;
        self.elapsed += dt as f64;
        self.frame_count += 1;
        dt
    }

    /// Get the clamped delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta
    }

    /// Get the raw delta of the last frame.
    pub fn raw_delta(&self) -> Duration {
        self.raw_delta
    }

    /// Get total simulated time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed as f32
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frames that had to be clamped.
    pub fn hitch_count(&self) -> u64 {
        self.hitches
    }

    /// Get the current FPS (from the raw delta of the last frame).
    pub fn fps(&self) -> f32 {
        let secs = self.raw_delta.as_secs_f32();
        if secs > 0.0 {
            1.0 / secs
        } else {
            0.0
        }
    }
}
