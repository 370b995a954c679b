//! Frame scheduler: owns every system and runs them in a fixed order each frame.
//!
//! Order per [`Simulation::step`]: clamp `dt` and advance the clock, update the player
//! (which also moves the camera), publish the snapshot in a [`FrameContext`], then
//! birds, dust and character animation, and finally gather instance data for the
//! renderer. The order is the only synchronisation there is.

use bytemuck::{Pod, Zeroable};
use engine_core::{
    FrameContext, PlayerSnapshot, Quat, Time, Transform, TransformRaw, Vec2, Vec3,
};
use hecs::World;
use input::InputIntent;
use physics::CollisionRegistry;
use procgen::{generate_field, DebrisKind, GrassChunk, Mulberry32, WorldLayout};

use crate::animation::{CharacterAnimation, LimbPose};
use crate::bird::{Bird, FlightPhase, Flock};
use crate::camera::CameraUniform;
use crate::cape::CapeVertex;
use crate::config::GameConfig;
use crate::dust::FootstepDust;
use crate::player::PlayerController;

/// Per-instance data for tinted meshes (birds).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct InstanceData {
    pub model: [[f32; 4]; 4],
    /// RGB plus the wing seed in `w`.
    pub color: [f32; 4],
}

/// Everything the renderer needs to draw one frame of moving things.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub camera: CameraUniform,
    /// Character root (position, facing, body bob).
    pub player: TransformRaw,
    pub limbs: LimbPose,
    /// Cape swing angle about the shoulder line.
    pub cape_angle: f32,
    pub cape: Vec<CapeVertex>,
    pub birds: Vec<InstanceData>,
    pub dust: Vec<TransformRaw>,
    /// Player position for the grass push-back uniform (`w` = elapsed seconds).
    pub grass_push_origin: [f32; 4],
}

/// Flock head count by phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlockCensus {
    pub flying: usize,
    pub landing: usize,
    pub perched: usize,
    pub takeoff: usize,
}

pub struct Simulation {
    world: World,
    layout: WorldLayout,
    solids: CollisionRegistry,
    grass: Vec<GrassChunk>,
    player: PlayerController,
    flock: Flock,
    dust: FootstepDust,
    animation: CharacterAnimation,
    rng: Mulberry32,
    time: Time,
    context: FrameContext,
    paused: bool,
}

impl Simulation {
    pub fn new(config: &GameConfig) -> Self {
        let layout_config = config.world.layout_config();
        let layout = WorldLayout::generate(&layout_config);

        let mut solids = CollisionRegistry::new();
        solids.register(layout.solids());

        let mut rng = Mulberry32::new(config.session_seed);
        let grass = generate_field(
            &mut rng,
            config.world.grass_per_chunk,
            layout_config.world_radius,
        );

        let mut world = World::new();
        let flock = Flock::new(config.birds);
        flock.spawn(&mut world, &mut rng);

        let player = PlayerController::new(Vec2::ZERO, config.player, config.camera);
        let context = FrameContext::new(0.0, 0.0, 0, player.snapshot());

        log::info!(
            "Simulation ready: seed {}, {} trees, {} bushes, {} solids, {} birds{}",
            layout_config.seed,
            layout.trees.len(),
            layout.bushes.len(),
            solids.len(),
            config.birds.count,
            if config.paused { " (paused)" } else { "" }
        );

        Self {
            world,
            layout,
            solids,
            grass,
            player,
            flock,
            dust: FootstepDust::new(),
            animation: CharacterAnimation::new(),
            rng,
            time: Time::new(),
            context,
            paused: config.paused,
        }
    }

    /// Run one frame. `raw_dt` is the measured frame time; it is clamped here.
    pub fn step(&mut self, intent: &InputIntent, raw_dt: f32) -> RenderFrame {
        let dt = self.time.advance(raw_dt);

        let player = if self.paused {
            PlayerSnapshot {
                is_moving: false,
                is_sprinting: false,
                ..self.player.snapshot()
            }
        } else {
            self.player.update(intent, &self.solids, dt)
        };
        self.context = FrameContext::new(
            dt,
            self.time.elapsed_seconds(),
            self.time.frame_count(),
            player,
        );
        let ctx = self.context;

        self.flock
            .update(&mut self.world, &mut self.rng, ctx.elapsed, dt);
        self.dust.update(&ctx, &mut self.rng);
        if !self.paused {
            self.animation.update(&ctx);
        }

        self.render_frame()
    }

    fn render_frame(&self) -> RenderFrame {
        let snap = self.context.player;
        let limbs = self.animation.limbs;

        let mut camera = CameraUniform::new();
        camera.update(&self.player.camera);

        let player = TransformRaw::from(Transform {
            position: snap.position + Vec3::Y * limbs.body_bob,
            rotation: Quat::from_rotation_y(snap.facing),
            scale: Vec3::ONE,
        });

        let birds = self
            .world
            .query::<(&Transform, &Bird)>()
            .iter()
            .map(|(_, (t, b))| {
                let [r, g, bl] = b.plumage.color();
                InstanceData {
                    model: t.to_matrix().to_cols_array_2d(),
                    color: [r, g, bl, b.wing_seed],
                }
            })
            .collect();

        RenderFrame {
            camera,
            player,
            limbs,
            cape_angle: self.animation.cape_swing.angle,
            cape: self.animation.cape.vertices(),
            birds,
            dust: self.dust.instances(),
            grass_push_origin: [
                snap.position.x,
                snap.position.y,
                snap.position.z,
                self.context.elapsed,
            ],
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        if paused != self.paused {
            log::info!("Simulation {}", if paused { "paused" } else { "resumed" });
        }
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Context published by the last step.
    pub fn context(&self) -> &FrameContext {
        &self.context
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn solids(&self) -> &CollisionRegistry {
        &self.solids
    }

    pub fn layout(&self) -> &WorldLayout {
        &self.layout
    }

    pub fn grass(&self) -> &[GrassChunk] {
        &self.grass
    }

    pub fn dust(&self) -> &FootstepDust {
        &self.dust
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Static instance buffers, uploaded once: trees, bushes, then each debris kind.
    pub fn static_instances(&self) -> Vec<(&'static str, Vec<TransformRaw>)> {
        let mut out = vec![
            ("tree", self.layout.tree_instances()),
            ("bush", self.layout.bush_instances()),
        ];
        for kind in DebrisKind::ALL {
            out.push((kind.name(), self.layout.debris_instances(kind)));
        }
        out
    }

    pub fn flock_census(&self) -> FlockCensus {
        let mut census = FlockCensus::default();
        for (_, bird) in self.world.query::<&Bird>().iter() {
            match bird.phase {
                FlightPhase::Flying { .. } => census.flying += 1,
                FlightPhase::Landing { .. } => census.landing += 1,
                FlightPhase::Perched { .. } => census.perched += 1,
                FlightPhase::Takeoff { .. } => census.takeoff += 1,
            }
        }
        census
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BirdTuning;
    use engine_core::MAX_FRAME_DT;

    fn small_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.world.grass_per_chunk = 8;
        config.birds = BirdTuning {
            count: 12,
            ..BirdTuning::default()
        };
        config
    }

    fn bird_positions(sim: &Simulation) -> Vec<Vec3> {
        sim.world()
            .query::<&Transform>()
            .iter()
            .map(|(_, t)| t.position)
            .collect()
    }

    #[test]
    fn world_solids_are_registered_and_spawn_is_clear() {
        let sim = Simulation::new(&small_config());
        assert_eq!(sim.solids().len(), sim.layout().solids().len());
        assert!(sim.solids().len() >= 300);
        assert!(!sim.solids().is_blocked(sim.player().position(), 0.6));
        assert_eq!(sim.grass().len(), 36);
    }

    #[test]
    fn step_publishes_snapshot_and_fills_frame() {
        let mut sim = Simulation::new(&small_config());
        let intent = InputIntent::moving(Vec2::new(0.0, -1.0));
        let frame = sim.step(&intent, 0.016);
        assert_eq!(sim.context().player, sim.player().snapshot());
        assert!(sim.context().player.is_moving);
        assert_eq!(sim.context().frame, 1);
        assert_eq!(frame.birds.len(), 12);
        assert_eq!(frame.dust.len(), crate::dust::DUST_CAPACITY);
        assert_eq!(frame.cape.len(), 17 * 21);
        assert_eq!(frame.grass_push_origin[2], sim.player().position().z);
        let bytes: &[u8] = bytemuck::cast_slice(&frame.birds);
        assert_eq!(bytes.len(), 12 * std::mem::size_of::<InstanceData>());
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut sim = Simulation::new(&small_config());
        let start = sim.player().position();
        sim.step(&InputIntent::moving(Vec2::new(1.0, 0.0)), 2.0);
        assert_eq!(sim.context().dt, MAX_FRAME_DT);
        assert_eq!(sim.time().hitch_count(), 1);
        let moved = Vec2::new(
            sim.player().position().x - start.x,
            sim.player().position().z - start.z,
        )
        .length();
        assert!(moved <= 7.8 * MAX_FRAME_DT + 1e-4);
    }

    #[test]
    fn pause_freezes_player_but_not_birds() {
        let mut sim = Simulation::new(&small_config());
        sim.set_paused(true);
        let player_before = sim.player().position();
        let birds_before = bird_positions(&sim);
        let intent = InputIntent::moving(Vec2::new(0.0, -1.0));
        for _ in 0..10 {
            sim.step(&intent, 0.016);
        }
        assert_eq!(sim.player().position(), player_before);
        assert!(!sim.context().player.is_moving);
        assert_eq!(sim.dust().active_count(), 0);
        assert_ne!(bird_positions(&sim), birds_before);

        sim.set_paused(false);
        sim.step(&intent, 0.016);
        assert_ne!(sim.player().position(), player_before);
    }

    #[test]
    fn same_config_same_session() {
        let config = small_config();
        let mut a = Simulation::new(&config);
        let mut b = Simulation::new(&config);
        let intent = InputIntent {
            move_axis: Vec2::new(1.0, -1.0),
            sprint: true,
            jump_pressed: true,
            camera_delta: Vec2::new(0.3, 0.1),
        };
        for _ in 0..120 {
            a.step(&intent, 0.016);
            b.step(&intent, 0.016);
        }
        assert_eq!(a.player().position(), b.player().position());
        assert_eq!(bird_positions(&a), bird_positions(&b));
        assert_eq!(a.flock_census(), b.flock_census());
    }

    #[test]
    fn static_instances_cover_every_layer() {
        let sim = Simulation::new(&small_config());
        let layers = sim.static_instances();
        assert_eq!(layers.len(), 2 + DebrisKind::ALL.len());
        assert_eq!(layers[0].1.len(), sim.layout().trees.len());
        let census = sim.flock_census();
        assert_eq!(census.flying, 12);
    }
}
