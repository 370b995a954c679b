//! Static world layout: trees, bushes, and ground debris.
//!
//! **Seed-based determinism:** everything is drawn from one [`Mulberry32`] stream in
//! a fixed order (trees, then bushes, then debris), so the same seed always yields
//! the same forest, the same collision solids, and the same instance transforms.

use std::f32::consts::{PI, TAU};

use engine_core::{Transform, TransformRaw};
use glam::{EulerRot, Quat, Vec3};
use physics::Solid;

use crate::prng::{Mulberry32, WORLD_SEED};
use crate::terrain::height;

/// Knobs for [`WorldLayout::generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub seed: u32,
    /// Radius of the playable disc; bushes stay `20` inside it.
    pub world_radius: f32,
    pub tree_count: usize,
    /// Trees are placed between `20` and `20 + tree_radius_max` from the center.
    pub tree_radius_max: f32,
    pub bush_count: usize,
    /// Fraction of bushes clustered around trees; the rest are scattered.
    pub bush_cluster_fraction: f32,
    /// Debris ring outer radius (inner radius is 5).
    pub debris_radius: f32,
    pub twig_count: usize,
    pub mound_count: usize,
    pub leaf_litter_count: usize,
    pub log_count: usize,
    pub rock_count: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: WORLD_SEED,
            world_radius: 1000.0,
            tree_count: 300,
            tree_radius_max: 980.0,
            bush_count: 1500,
            bush_cluster_fraction: 0.7,
            debris_radius: 980.0,
            twig_count: 60,
            mound_count: 30,
            leaf_litter_count: 100,
            log_count: 15,
            rock_count: 20,
        }
    }
}

/// A placed tree. The trunk base sits half a unit into the ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeInstance {
    pub position: Vec3,
    pub scale: f32,
    /// Yaw in `[0, π)`.
    pub yaw: f32,
    /// `[0, 1)` value that rotates root and branch placement per tree.
    pub gnarl: f32,
}

impl TreeInstance {
    /// Trunk collision radius relative to tree scale.
    pub const SOLID_RADIUS_FACTOR: f32 = 0.9;

    pub fn transform(&self) -> Transform {
        Transform::from_position_yaw_scale(self.position, self.yaw, self.scale)
    }

    pub fn solid(&self) -> Solid {
        Solid::new(
            self.position.x,
            self.position.z,
            Self::SOLID_RADIUS_FACTOR * self.scale,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebrisKind {
    Twig,
    DirtMound,
    LeafLitter,
    FallenLog,
    Rock,
}

impl DebrisKind {
    pub const ALL: [DebrisKind; 5] = [
        DebrisKind::Twig,
        DebrisKind::DirtMound,
        DebrisKind::LeafLitter,
        DebrisKind::FallenLog,
        DebrisKind::Rock,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DebrisKind::Twig => "twig",
            DebrisKind::DirtMound => "dirt_mound",
            DebrisKind::LeafLitter => "leaf_litter",
            DebrisKind::FallenLog => "fallen_log",
            DebrisKind::Rock => "rock",
        }
    }

    /// Vertical offset from the terrain surface.
    pub fn y_offset(self) -> f32 {
        match self {
            DebrisKind::Twig => 0.02,
            DebrisKind::DirtMound => -0.15,
            DebrisKind::LeafLitter => 0.01,
            DebrisKind::FallenLog => 0.2,
            DebrisKind::Rock => -0.1,
        }
    }

    fn scale(self, rng: &mut Mulberry32) -> Vec3 {
        match self {
            DebrisKind::Twig | DebrisKind::LeafLitter => Vec3::splat(0.8 + rng.next_f32()),
            DebrisKind::DirtMound => Vec3::new(1.5, 0.4, 1.5),
            DebrisKind::FallenLog => Vec3::splat(1.0 + rng.next_f32() * 0.5),
            DebrisKind::Rock => Vec3::new(
                1.0 + rng.next_f32(),
                0.5 + rng.next_f32(),
                1.0 + rng.next_f32(),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebrisInstance {
    pub kind: DebrisKind,
    pub transform: Transform,
}

impl DebrisInstance {
    /// Base radius of the rock mesh before scaling.
    pub const ROCK_RADIUS: f32 = 0.4;

    /// Rocks are the only debris the player cannot walk through.
    pub fn solid(&self) -> Option<Solid> {
        match self.kind {
            DebrisKind::Rock => {
                let s = self.transform.scale;
                Some(Solid::new(
                    self.transform.position.x,
                    self.transform.position.z,
                    Self::ROCK_RADIUS * s.x.max(s.z),
                ))
            }
            _ => None,
        }
    }
}

/// Everything static that world generation places.
#[derive(Debug, Clone)]
pub struct WorldLayout {
    pub trees: Vec<TreeInstance>,
    pub bushes: Vec<Transform>,
    pub debris: Vec<DebrisInstance>,
}

impl WorldLayout {
    pub fn generate(config: &LayoutConfig) -> Self {
        let mut rng = Mulberry32::new(config.seed);
        let trees = place_trees(&mut rng, config);
        let bushes = place_bushes(&mut rng, config, &trees);
        let debris = place_debris(&mut rng, config);
        log::info!(
            "World layout (seed {}): {} trees, {} bushes, {} debris",
            config.seed,
            trees.len(),
            bushes.len(),
            debris.len()
        );
        Self {
            trees,
            bushes,
            debris,
        }
    }

    /// Collision solids in placement order: tree trunks, then rocks.
    pub fn solids(&self) -> Vec<Solid> {
        self.trees
            .iter()
            .map(TreeInstance::solid)
            .chain(self.debris.iter().filter_map(DebrisInstance::solid))
            .collect()
    }

    /// Instance matrices for every tree trunk.
    pub fn tree_instances(&self) -> Vec<TransformRaw> {
        self.trees.iter().map(|t| TransformRaw::from(t.transform())).collect()
    }

    pub fn bush_instances(&self) -> Vec<TransformRaw> {
        self.bushes.iter().map(TransformRaw::from).collect()
    }

    /// Instance matrices for one kind of debris.
    pub fn debris_instances(&self, kind: DebrisKind) -> Vec<TransformRaw> {
        self.debris
            .iter()
            .filter(|d| d.kind == kind)
            .map(|d| TransformRaw::from(&d.transform))
            .collect()
    }
}

fn place_trees(rng: &mut Mulberry32, config: &LayoutConfig) -> Vec<TreeInstance> {
    (0..config.tree_count)
        .map(|_| {
            let radius = 20.0 + rng.next_f32().sqrt() * config.tree_radius_max;
            let angle = rng.next_f32() * TAU;
            let x = angle.cos() * radius;
            let z = angle.sin() * radius;
            let scale = 3.5 + rng.next_f32() * 4.0;
            let yaw = rng.next_f32() * PI;
            let gnarl = rng.next_f32();
            TreeInstance {
                position: Vec3::new(x, height(x, z) - 0.5, z),
                scale,
                yaw,
                gnarl,
            }
        })
        .collect()
}

fn place_bushes(
    rng: &mut Mulberry32,
    config: &LayoutConfig,
    trees: &[TreeInstance],
) -> Vec<Transform> {
    let clustered = (config.bush_count as f32 * config.bush_cluster_fraction) as usize;
    (0..config.bush_count)
        .map(|i| {
            let (x, z) = if i < clustered && !trees.is_empty() {
                let idx = ((rng.next_f32() * trees.len() as f32) as usize).min(trees.len() - 1);
                let tree = trees[idx].position;
                let offset_angle = rng.next_f32() * TAU;
                let offset_dist = 2.0 + rng.next_f32() * 6.0;
                (
                    tree.x + offset_angle.cos() * offset_dist,
                    tree.z + offset_angle.sin() * offset_dist,
                )
            } else {
                let r = rng.next_f32().sqrt() * (config.world_radius - 20.0);
                let theta = rng.next_f32() * TAU;
                (r * theta.cos(), r * theta.sin())
            };

            let base = 0.9 + rng.next_f32() * 1.3;
            let scale = Vec3::new(
                base * (0.9 + rng.next_f32() * 0.2),
                base * (0.8 + rng.next_f32() * 0.4),
                base * (0.9 + rng.next_f32() * 0.2),
            );
            let rotation = Quat::from_euler(
                EulerRot::XYZ,
                rng.next_f32() * 0.2,
                rng.next_f32() * TAU,
                rng.next_f32() * 0.2,
            );
            Transform {
                position: Vec3::new(x, height(x, z) - 0.2, z),
                rotation,
                scale,
            }
        })
        .collect()
}

fn place_debris(rng: &mut Mulberry32, config: &LayoutConfig) -> Vec<DebrisInstance> {
    let batches = [
        (DebrisKind::Twig, config.twig_count),
        (DebrisKind::DirtMound, config.mound_count),
        (DebrisKind::LeafLitter, config.leaf_litter_count),
        (DebrisKind::FallenLog, config.log_count),
        (DebrisKind::Rock, config.rock_count),
    ];

    let mut debris = Vec::with_capacity(batches.iter().map(|(_, n)| n).sum());
    for (kind, count) in batches {
        for _ in 0..count {
            let angle = rng.next_f32() * TAU;
            let r = 5.0 + rng.next_f32().sqrt() * config.debris_radius;
            let x = angle.cos() * r;
            let z = angle.sin() * r;
            let rotation = Quat::from_euler(
                EulerRot::XYZ,
                rng.next_f32() * 0.2,
                rng.next_f32() * TAU,
                rng.next_f32() * 0.2,
            );
            let scale = kind.scale(rng);
            debris.push(DebrisInstance {
                kind,
                transform: Transform {
                    position: Vec3::new(x, height(x, z) + kind.y_offset(), z),
                    rotation,
                    scale,
                },
            });
        }
    }
    debris
}
