//! Procedural character animation: limb swing, body bob and cape motion.
//!
//! Everything here is driven by the published [`PlayerSnapshot`] and the session
//! clock; nothing feeds back into the controller.

use engine_core::FrameContext;

use crate::cape::CapeCloth;

const WALK_CADENCE: f32 = 10.0;
const SPRINT_CADENCE: f32 = 15.0;
const SWING_AMPLITUDE: f32 = 0.5;
const STRIDE_BOB: f32 = 0.05;
const BREATH_BOB: f32 = 0.02;
/// Fraction of the remaining angle idle limbs relax by each frame.
const RELAX_PER_FRAME: f32 = 0.1;
const CAPE_MIN_ANGLE: f32 = 0.05;

/// Joint angles (radians, about the local X axis) and vertical body offset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LimbPose {
    pub left_leg: f32,
    pub right_leg: f32,
    pub left_arm: f32,
    pub right_arm: f32,
    pub body_bob: f32,
}

impl LimbPose {
    pub fn update(&mut self, t: f32, moving: bool, sprinting: bool) {
        if moving {
            let cadence = if sprinting { SPRINT_CADENCE } else { WALK_CADENCE };
            let phase = (t * cadence).sin();
            let swing = phase * SWING_AMPLITUDE;
            self.left_leg = swing;
            self.right_leg = -swing;
            self.left_arm = -swing;
            self.right_arm = swing;
            self.body_bob = phase.abs() * STRIDE_BOB;
        } else {
            for joint in [
                &mut self.left_leg,
                &mut self.right_leg,
                &mut self.left_arm,
                &mut self.right_arm,
            ] {
                *joint += (0.0 - *joint) * RELAX_PER_FRAME;
            }
            self.body_bob = (t * 2.0).sin() * BREATH_BOB;
        }
    }
}

/// Whole-cape swing back from the shoulders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapeSwing {
    pub angle: f32,
}

impl Default for CapeSwing {
    fn default() -> Self {
        Self { angle: 0.08 }
    }
}

impl CapeSwing {
    pub fn update(&mut self, t: f32, dt: f32, moving: bool, sprinting: bool) {
        let base = match (moving, sprinting) {
            (true, true) => 0.8,
            (true, false) => 0.4,
            _ => 0.08,
        };
        let sway_freq = if sprinting { 12.0 } else { 3.0 };
        let sway_amp = if moving { 0.15 } else { 0.02 };
        let target = base + (t * sway_freq).sin() * sway_amp;
        let rate = if moving { 4.0 } else { 2.0 };
        self.angle += (target - self.angle) * (dt * rate).min(1.0);
        self.angle = self.angle.max(CAPE_MIN_ANGLE);
    }
}

/// Everything animated on the character each frame.
#[derive(Debug, Clone, Default)]
pub struct CharacterAnimation {
    pub limbs: LimbPose,
    pub cape_swing: CapeSwing,
    pub cape: CapeCloth,
}

impl CharacterAnimation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, ctx: &FrameContext) {
        let p = &ctx.player;
        self.limbs.update(ctx.elapsed, p.is_moving, p.is_sprinting);
        self.cape_swing
            .update(ctx.elapsed, ctx.dt, p.is_moving, p.is_sprinting);
        self.cape.update(ctx.elapsed, p.is_moving, p.is_sprinting);
    }
}
