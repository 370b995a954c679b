//! Frame-rate independent smoothing and angle helpers.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Blend factor for exponential damping with rate `k` over `dt`: `1 - e^(-k·dt)`.
///
/// Applying `x += (target - x) * damp_factor(k, dt)` converges at the same speed
/// regardless of how the frame time is sliced.
#[inline]
pub fn damp_factor(k: f32, dt: f32) -> f32 {
    1.0 - (-k * dt).exp()
}

/// Exponentially damp a scalar toward `target`.
#[inline]
pub fn damp(current: f32, target: f32, k: f32, dt: f32) -> f32 {
    current + (target - current) * damp_factor(k, dt)
}

/// Exponentially damp a vector toward `target`.
#[inline]
pub fn damp_vec3(current: Vec3, target: Vec3, k: f32, dt: f32) -> Vec3 {
    current.lerp(target, damp_factor(k, dt))
}

/// Wrap an angle difference into `[-π, π]`.
#[inline]
pub fn wrap_angle(mut a: f32) -> f32 {
    if !a.is_finite() {
        return 0.0;
    }
    a = a.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}

/// Exponentially damp an angle toward `target` along the shortest arc.
#[inline]
pub fn damp_angle(current: f32, target: f32, k: f32, dt: f32) -> f32 {
    current + wrap_angle(target - current) * damp_factor(k, dt)
}

/// GLSL-style smoothstep.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
