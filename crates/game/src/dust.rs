//! Footstep dust kicked up while the player moves.

use std::f32::consts::TAU;

use engine_core::{FrameContext, Transform, TransformRaw, Vec3};
use rand::Rng;

/// Particles in the pool. Spawns are dropped while all of them are alive.
pub const DUST_CAPACITY: usize = 60;
const SPRINT_SPAWN_INTERVAL: f32 = 0.05;
const WALK_SPAWN_INTERVAL: f32 = 0.15;
/// Life lost per second (a particle lives 1/1.5 s).
const DECAY_RATE: f32 = 1.5;
/// Above this life the puff is still growing in.
const GROW_UNTIL: f32 = 0.8;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DustParticle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Remaining life, 1 at spawn.
    pub life: f32,
    pub base_scale: f32,
    pub active: bool,
}

impl DustParticle {
    /// Grow in over the first fifth of life, then shrink linearly.
    pub fn scale(&self) -> f32 {
        if !self.active {
            0.0
        } else if self.life > GROW_UNTIL {
            self.base_scale * ((1.0 - self.life) / (1.0 - GROW_UNTIL))
        } else {
            self.base_scale * self.life
        }
    }
}

/// Fixed pool of dust puffs around the player's feet.
pub struct FootstepDust {
    particles: [DustParticle; DUST_CAPACITY],
    spawn_timer: f32,
}

impl Default for FootstepDust {
    fn default() -> Self {
        Self::new()
    }
}

impl FootstepDust {
    pub fn new() -> Self {
        Self {
            particles: [DustParticle::default(); DUST_CAPACITY],
            spawn_timer: 0.0,
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, ctx: &FrameContext, rng: &mut R) {
        let dt = ctx.dt;
        let player = &ctx.player;
        if player.is_moving {
            self.spawn_timer -= dt;
            if self.spawn_timer <= 0.0 {
                self.spawn_timer = if player.is_sprinting {
                    SPRINT_SPAWN_INTERVAL
                } else {
                    WALK_SPAWN_INTERVAL
                };
                self.spawn(player.position, rng);
            }
        }

        for p in self.particles.iter_mut().filter(|p| p.active) {
            p.life -= dt * DECAY_RATE;
            if p.life <= 0.0 {
                p.active = false;
                continue;
            }
            p.position += p.velocity * dt;
        }
    }

    fn spawn<R: Rng + ?Sized>(&mut self, feet: Vec3, rng: &mut R) {
        let Some(slot) = self.particles.iter_mut().find(|p| !p.active) else {
            return;
        };
        let angle = rng.gen::<f32>() * TAU;
        let speed = 0.5 + rng.gen::<f32>() * 0.5;
        let velocity = Vec3::new(
            angle.cos() * speed,
            0.5 + rng.gen::<f32>(),
            angle.sin() * speed,
        );
        let base_scale = 0.5 + rng.gen::<f32>() * 1.5;
        let position = Vec3::new(
            feet.x + (rng.gen::<f32>() - 0.5) * 0.5,
            feet.y + 0.2,
            feet.z + (rng.gen::<f32>() - 0.5) * 0.5,
        );
        *slot = DustParticle {
            position,
            velocity,
            life: 1.0,
            base_scale,
            active: true,
        };
    }

    pub fn active_count(&self) -> usize {
        self.particles.iter().filter(|p| p.active).count()
    }

    pub fn particles(&self) -> &[DustParticle] {
        &self.particles
    }

    /// One matrix per pool slot; dead slots get zero scale.
    pub fn instances(&self) -> Vec<TransformRaw> {
        self.particles
            .iter()
            .map(|p| {
                TransformRaw::from(Transform {
                    position: p.position,
                    scale: Vec3::splat(p.scale()),
                    ..Default::default()
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::PlayerSnapshot;
    use procgen::Mulberry32;

    fn ctx(moving: bool, sprinting: bool, dt: f32) -> FrameContext {
        let player = PlayerSnapshot {
            is_moving: moving,
            is_sprinting: sprinting,
            position: Vec3::new(3.0, 1.0, -2.0),
            ..Default::default()
        };
        FrameContext::new(dt, 0.0, 0, player)
    }

    #[test]
    fn idle_player_raises_no_dust() {
        let mut dust = FootstepDust::new();
        let mut rng = Mulberry32::new(1);
        for _ in 0..100 {
            dust.update(&ctx(false, false, 0.016), &mut rng);
        }
        assert_eq!(dust.active_count(), 0);
    }

    #[test]
    fn pool_never_exceeds_capacity() {
        let mut dust = FootstepDust::new();
        let mut rng = Mulberry32::new(2);
        let mut max_seen = 0;
        for _ in 0..2000 {
            dust.update(&ctx(true, true, 0.05), &mut rng);
            max_seen = max_seen.max(dust.active_count());
            assert!(dust.active_count() <= DUST_CAPACITY);
        }
        assert!(max_seen > 0);
        assert_eq!(dust.instances().len(), DUST_CAPACITY);
    }

    #[test]
    fn puffs_spawn_at_feet_and_expire() {
        let mut dust = FootstepDust::new();
        let mut rng = Mulberry32::new(3);
        dust.update(&ctx(true, false, 0.016), &mut rng);
        assert_eq!(dust.active_count(), 1);
        let p = dust.particles().iter().find(|p| p.active).copied().unwrap();
        assert!((p.position.x - 3.0).abs() <= 0.3);
        assert!((p.position.z + 2.0).abs() <= 0.3);
        assert!(p.velocity.y >= 0.5);
        assert!(p.scale() < p.base_scale);

        for _ in 0..60 {
            dust.update(&ctx(false, false, 0.016), &mut rng);
        }
        assert_eq!(dust.active_count(), 0);
    }

    #[test]
    fn scale_grows_then_shrinks() {
        let mut p = DustParticle {
            base_scale: 1.0,
            active: true,
            life: 0.9,
            ..Default::default()
        };
        assert!((p.scale() - 0.5).abs() < 1e-5);
        p.life = 0.5;
        assert!((p.scale() - 0.5).abs() < 1e-5);
        p.active = false;
        assert_eq!(p.scale(), 0.0);
    }
}
