//! Grass blade instances and the player push-back the grass shader applies.

use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};
use engine_core::smoothstep;
use glam::{Vec2, Vec3};
use rand::Rng;

/// Grass chunks per side of the square grid covering the world.
pub const CHUNKS_PER_SIDE: usize = 6;
/// Chunk edge length in world units.
pub const CHUNK_SIZE: f32 = 250.0;
/// Default blades per chunk.
pub const GRASS_PER_CHUNK: usize = 4500;
/// Distance at which the player stops bending grass.
pub const PUSH_RADIUS: f32 = 1.2;
/// Sideways displacement of a fully pushed blade tip.
pub const PUSH_DISPLACEMENT: f32 = 0.6;
/// Fraction of blade height lost when fully pushed.
pub const PUSH_SQUASH: f32 = 0.4;

/// One blade instance as uploaded to the GPU.
///
/// `position.y` is always 0: the vertex stage adds the terrain height from the same
/// height function the CPU uses, so blades follow the ground exactly.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GrassBlade {
    pub position: [f32; 3],
    pub yaw: f32,
    pub width: f32,
    pub height: f32,
    pub _pad: [f32; 2],
}

impl GrassBlade {
    /// True for blades parked outside the world disc.
    pub fn is_culled(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Centers of every chunk in the grid, row-major over X then Z.
pub fn chunk_centers() -> Vec<Vec2> {
    let offset = (CHUNKS_PER_SIDE - 1) as f32 * CHUNK_SIZE * 0.5;
    let mut centers = Vec::with_capacity(CHUNKS_PER_SIDE * CHUNKS_PER_SIDE);
    for x in 0..CHUNKS_PER_SIDE {
        for z in 0..CHUNKS_PER_SIDE {
            centers.push(Vec2::new(
                x as f32 * CHUNK_SIZE - offset,
                z as f32 * CHUNK_SIZE - offset,
            ));
        }
    }
    centers
}

/// Scatter `count` blades uniformly over the chunk at `center`.
///
/// Blades that land outside `world_radius` keep their slot but are parked below the
/// world with zero size, so every chunk uploads the same instance count.
pub fn generate_chunk<R: Rng + ?Sized>(
    rng: &mut R,
    center: Vec2,
    count: usize,
    world_radius: f32,
) -> Vec<GrassBlade> {
    let r2 = world_radius * world_radius;
    (0..count)
        .map(|_| {
            let x = (rng.gen::<f32>() - 0.5) * CHUNK_SIZE + center.x;
            let z = (rng.gen::<f32>() - 0.5) * CHUNK_SIZE + center.y;
            if x * x + z * z > r2 {
                GrassBlade {
                    position: [0.0, -500.0, 0.0],
                    yaw: 0.0,
                    width: 0.0,
                    height: 0.0,
                    _pad: [0.0; 2],
                }
            } else {
                GrassBlade {
                    position: [x, 0.0, z],
                    yaw: rng.gen::<f32>() * PI,
                    height: 0.7 + rng.gen::<f32>() * 0.6,
                    width: 0.8 + rng.gen::<f32>() * 0.4,
                    _pad: [0.0; 2],
                }
            }
        })
        .collect()
}

/// All blades of one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct GrassChunk {
    pub center: Vec2,
    pub blades: Vec<GrassBlade>,
}

/// Generate every chunk of the grid with `per_chunk` blades each.
pub fn generate_field<R: Rng + ?Sized>(
    rng: &mut R,
    per_chunk: usize,
    world_radius: f32,
) -> Vec<GrassChunk> {
    let chunks: Vec<GrassChunk> = chunk_centers()
        .into_iter()
        .map(|center| GrassChunk {
            center,
            blades: generate_chunk(&mut *rng, center, per_chunk, world_radius),
        })
        .collect();
    let visible: usize = chunks
        .iter()
        .map(|c| c.blades.iter().filter(|b| !b.is_culled()).count())
        .sum();
    log::info!(
        "Grass field: {} chunks, {} visible blades",
        chunks.len(),
        visible
    );
    chunks
}

/// How the player's presence bends a blade (at its tip).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrassPush {
    /// XZ displacement of the tip.
    pub offset: Vec2,
    /// Multiplier on blade height.
    pub squash: f32,
}

/// Push-back applied to a blade rooted at `blade` by a player standing at `player`.
pub fn grass_push(blade: Vec3, player: Vec3) -> GrassPush {
    let away = Vec2::new(blade.x - player.x, blade.z - player.z);
    let strength = 1.0 - smoothstep(0.0, PUSH_RADIUS, away.length());
    if strength <= 0.0 {
        return GrassPush {
            offset: Vec2::ZERO,
            squash: 1.0,
        };
    }
    GrassPush {
        offset: away.normalize_or_zero() * strength * PUSH_DISPLACEMENT,
        squash: 1.0 - strength * PUSH_SQUASH,
    }
}
