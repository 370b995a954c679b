//! Mulberry32: the project's seeded generator.
//!
//! Small, fast and fully specified, so the same seed lays out the same forest on
//! every platform. It implements [`RngCore`] and [`SeedableRng`], so anything written
//! against `rand::Rng` (bird behaviour, dust, layout) can be driven by it.

use rand::{Error, RngCore, SeedableRng};

/// Seed the world layout is generated from unless configuration overrides it.
pub const WORLD_SEED: u32 = 987_654_321;

const INCREMENT: u32 = 0x6D2B_79F5;

/// Mulberry32 generator (32-bit state).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Uniform `f64` in `[0, 1)`: the full 32-bit output divided by 2³².
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }

    /// Uniform `f32` in `[0, 1)`.
    ///
    /// Derived from [`next_f64`](Self::next_f64) and clamped below 1, since rounding
    /// the widest outputs to `f32` would otherwise produce exactly 1.0.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_f64() as f32).min(1.0 - f32::EPSILON / 2.0)
    }

    /// Uniform in `[min, max)`.
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }

    /// Uses the low 32 bits of `state` directly as the generator state.
    fn seed_from_u64(state: u64) -> Self {
        Self::new(state as u32)
    }
}
