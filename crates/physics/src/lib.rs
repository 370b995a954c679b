//! Static collision for Verde.
//!
//! The world has no rigid bodies: obstacles are infinite vertical cylinders
//! (circles in the XZ plane) registered once per world generation, and movers do a
//! binary accept/reject test against them before committing a step.

pub mod collision;

pub use collision::*;
