//! Core engine types and utilities for Verde.
//!
//! This crate provides the foundational types shared by every simulation system:
//! - Transform and GPU instance data
//! - Frame timing with hitch clamping
//! - The per-frame context the scheduler hands to each system
//! - Damping and angle helpers used by the controllers

pub mod frame;
pub mod math;
pub mod time;
pub mod transform;

pub use frame::*;
pub use math::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
pub use hecs::{Entity, World};
