//! Per-frame context shared between the scheduler and every system.
//!
//! The player controller is the only writer of [`PlayerSnapshot`]. The scheduler
//! publishes it into a fresh [`FrameContext`] after the controller has run, and the
//! decorative systems (dust, cape, grass uniforms) read it from there. Systems that
//! read the context before publication see last frame's snapshot.

use glam::Vec3;

/// What the rest of the world is allowed to know about the player this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSnapshot {
    /// Feet position.
    pub position: Vec3,
    /// Smoothed visual heading (radians about +Y).
    pub facing: f32,
    /// Movement input was non-zero this frame.
    pub is_moving: bool,
    /// Sprint was held this frame.
    pub is_sprinting: bool,
    /// The last attempted move was rejected by the world boundary.
    pub is_at_boundary: bool,
    pub is_grounded: bool,
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            facing: 0.0,
            is_moving: false,
            is_sprinting: false,
            is_at_boundary: false,
            is_grounded: true,
        }
    }
}

/// Read-only view handed to every system during one simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Clamped step for this frame (seconds).
    pub dt: f32,
    /// Simulated seconds since the session started.
    pub elapsed: f32,
    /// Frame number.
    pub frame: u64,
    pub player: PlayerSnapshot,
}

impl FrameContext {
    pub fn new(dt: f32, elapsed: f32, frame: u64, player: PlayerSnapshot) -> Self {
        Self {
            dt,
            elapsed,
            frame,
            player,
        }
    }
}
