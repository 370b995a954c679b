//! Player controller and state.

use engine_core::{clamp_dt, damp_angle, wrap_angle, PlayerSnapshot, Vec2, Vec3};
use input::{InputIntent, STICK_DEAD_ZONE};
use physics::CollisionRegistry;
use procgen::height;

use crate::camera::FollowCamera;
use crate::config::{CameraTuning, PlayerTuning};

/// Everything the controller integrates from frame to frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerState {
    /// Feet position.
    pub position: Vec3,
    pub velocity_y: f32,
    pub is_grounded: bool,
    /// Visual heading about +Y, in `[-π, π]`.
    pub facing_angle: f32,
}

/// Player controller handling movement and camera.
pub struct PlayerController {
    pub state: PlayerState,
    pub camera: FollowCamera,
    tuning: PlayerTuning,
    is_moving: bool,
    is_sprinting: bool,
    is_at_boundary: bool,
}

impl PlayerController {
    /// Spawn standing on the ground at `(x, z)`.
    pub fn new(spawn: Vec2, tuning: PlayerTuning, camera: CameraTuning) -> Self {
        let position = Vec3::new(spawn.x, height(spawn.x, spawn.y), spawn.y);
        Self {
            state: PlayerState {
                position,
                velocity_y: 0.0,
                is_grounded: true,
                facing_angle: 0.0,
            },
            camera: FollowCamera::new(position, camera),
            tuning,
            is_moving: false,
            is_sprinting: false,
            is_at_boundary: false,
        }
    }

    /// Advance one frame and return the snapshot to publish.
    pub fn update(
        &mut self,
        intent: &InputIntent,
        solids: &CollisionRegistry,
        dt: f32,
    ) -> PlayerSnapshot {
        let dt = clamp_dt(dt);

        // Look
        self.camera.process_look(intent.camera_delta);

        // Movement
        let axis = movement_axis(intent.move_axis);
        self.is_moving = axis != Vec2::ZERO;
        self.is_sprinting = intent.sprint;
        if self.is_moving {
            let target_angle = axis.x.atan2(axis.y) + self.camera.yaw();
            let speed = if intent.sprint {
                self.tuning.sprint_speed
            } else {
                self.tuning.walk_speed
            };
            let step = Vec3::new(target_angle.sin(), 0.0, target_angle.cos()) * speed * dt;
            let next = self.state.position + step;

            // Rotation still follows the input when the move itself is rejected.
            if Vec2::new(next.x, next.z).length() >= self.tuning.map_limit {
                self.is_at_boundary = true;
            } else {
                self.is_at_boundary = false;
                if !solids.is_blocked(next, self.tuning.collision_radius) {
                    self.state.position.x = next.x;
                    self.state.position.z = next.z;
                }
            }

            self.state.facing_angle = wrap_angle(damp_angle(
                self.state.facing_angle,
                target_angle,
                self.tuning.turn_damping,
                dt,
            ));
        }

        // Jump (level-triggered while grounded)
        if intent.jump_pressed && self.state.is_grounded {
            self.state.velocity_y = self.tuning.jump_velocity;
            self.state.is_grounded = false;
        }

        // Gravity
        self.state.velocity_y += self.tuning.gravity * dt;
        self.state.position.y += self.state.velocity_y * dt;

        // Ground
        let ground = height(self.state.position.x, self.state.position.z);
        if self.state.position.y <= ground {
            self.state.position.y = ground;
            self.state.velocity_y = 0.0;
            self.state.is_grounded = true;
        }

        self.camera
            .follow(self.state.position, self.is_sprinting, dt);

        self.snapshot()
    }

    /// Current published view of the player.
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.state.position,
            facing: self.state.facing_angle,
            is_moving: self.is_moving,
            is_sprinting: self.is_sprinting,
            is_at_boundary: self.is_at_boundary,
            is_grounded: self.state.is_grounded,
        }
    }

    /// Get player position.
    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }
}

/// Apply the per-axis dead zone and normalise.
fn movement_axis(raw: Vec2) -> Vec2 {
    let dz = |v: f32| if v.abs() > STICK_DEAD_ZONE { v } else { 0.0 };
    Vec2::new(dz(raw.x), dz(raw.y)).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics::Solid;
    use procgen::Mulberry32;
    use rand::Rng;

    fn controller_at(x: f32, z: f32) -> PlayerController {
        PlayerController::new(
            Vec2::new(x, z),
            PlayerTuning::default(),
            CameraTuning::default(),
        )
    }

    fn xz(v: Vec3) -> Vec2 {
        Vec2::new(v.x, v.z)
    }

    #[test]
    fn forward_walk_covers_expected_distance() {
        let mut player = controller_at(0.0, 0.0);
        let solids = CollisionRegistry::new();
        let intent = InputIntent::moving(Vec2::new(0.0, -1.0));
        for _ in 0..60 {
            player.update(&intent, &solids, 0.016);
        }
        let p = player.position();
        let expected = 7.8 * 0.016 * 60.0;
        assert!(p.x.abs() < 1e-3, "x drifted: {}", p.x);
        assert!((p.z + expected).abs() < 1e-2, "z = {} want {}", p.z, -expected);
        assert!(player.snapshot().is_moving);
    }

    #[test]
    fn solid_stops_player_without_crossing() {
        let mut player = controller_at(0.0, 0.0);
        let mut solids = CollisionRegistry::new();
        solids.register([Solid::new(5.0, 0.0, 1.0)]);
        let intent = InputIntent::moving(Vec2::new(1.0, 0.0));
        for _ in 0..200 {
            player.update(&intent, &solids, 0.016);
            let d = (xz(player.position()) - Vec2::new(5.0, 0.0)).length();
            assert!(d >= 1.6, "penetrated solid: distance {}", d);
        }
        assert!(player.position().x < 5.0);
        assert!(player.position().x > 3.0);
    }

    #[test]
    fn stays_on_or_above_ground_for_any_dt() {
        let mut player = controller_at(40.0, -30.0);
        let solids = CollisionRegistry::new();
        let mut rng = Mulberry32::new(11);
        for i in 0..2000 {
            let intent = InputIntent {
                move_axis: Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)),
                sprint: i % 3 == 0,
                jump_pressed: rng.gen_bool(0.05),
                camera_delta: Vec2::new(rng.gen_range(-1.0..1.0), 0.0),
            };
            let dt = rng.gen_range(0.0..0.05);
            player.update(&intent, &solids, dt);
            let p = player.position();
            assert!(p.y >= height(p.x, p.z) - 1e-4, "below ground at frame {}", i);
        }
    }

    #[test]
    fn boundary_is_never_crossed() {
        let mut player = controller_at(0.0, -990.0);
        let solids = CollisionRegistry::new();
        let intent = InputIntent {
            move_axis: Vec2::new(0.0, -1.0),
            sprint: true,
            ..Default::default()
        };
        for _ in 0..100 {
            let snap = player.update(&intent, &solids, 0.05);
            assert!(xz(snap.position).length() < 995.0);
        }
        assert!(player.snapshot().is_at_boundary);

        // Walking back inward clears the flag.
        let back = InputIntent::moving(Vec2::new(0.0, 1.0));
        let snap = player.update(&back, &solids, 0.016);
        assert!(!snap.is_at_boundary);
    }

    #[test]
    fn jump_leaves_ground_and_lands() {
        let mut player = controller_at(0.0, 0.0);
        let solids = CollisionRegistry::new();
        let jump = InputIntent {
            jump_pressed: true,
            ..Default::default()
        };
        let snap = player.update(&jump, &solids, 0.016);
        assert!(!snap.is_grounded);
        assert!(player.state.velocity_y > 12.0);

        let idle = InputIntent::default();
        let mut peak: f32 = 0.0;
        for _ in 0..200 {
            player.update(&idle, &solids, 0.016);
            peak = peak.max(player.position().y);
        }
        // v²/2g = 169/70 ≈ 2.41
        assert!(peak > 2.0 && peak < 2.6, "peak {}", peak);
        assert!(player.state.is_grounded);
        assert_eq!(player.position().y, height(0.0, 0.0));
    }

    /// Spawn and move direction whose first sprint frame loses the most height.
    fn steepest_descent() -> (Vec2, Vec2) {
        let solids = CollisionRegistry::new();
        let mut best = (Vec2::ZERO, Vec2::new(0.0, -1.0), 0.0);
        for gx in -10..=10 {
            for gz in -10..=10 {
                let spawn = Vec2::new(gx as f32 * 20.0, gz as f32 * 20.0);
                for axis in [
                    Vec2::new(1.0, 0.0),
                    Vec2::new(-1.0, 0.0),
                    Vec2::new(0.0, 1.0),
                    Vec2::new(0.0, -1.0),
                    Vec2::new(1.0, 1.0),
                    Vec2::new(1.0, -1.0),
                    Vec2::new(-1.0, 1.0),
                    Vec2::new(-1.0, -1.0),
                ] {
                    let mut player = controller_at(spawn.x, spawn.y);
                    let start = player.position();
                    let intent = InputIntent {
                        move_axis: axis,
                        sprint: true,
                        ..Default::default()
                    };
                    player.update(&intent, &solids, 0.016);
                    let p = player.position();
                    let drop = start.y - height(p.x, p.z);
                    if drop > best.2 {
                        best = (spawn, axis, drop);
                    }
                }
            }
        }
        assert!(best.2 > 0.0, "no downhill direction found");
        (best.0, best.1)
    }

    #[test]
    fn downhill_sprint_keeps_footing_and_jump() {
        let (spawn, axis) = steepest_descent();
        let mut player = controller_at(spawn.x, spawn.y);
        let solids = CollisionRegistry::new();
        let sprint = InputIntent {
            move_axis: axis,
            sprint: true,
            ..Default::default()
        };
        let start_y = player.position().y;
        for frame in 0..60 {
            let snap = player.update(&sprint, &solids, 0.016);
            assert!(snap.is_grounded, "lost footing at frame {}", frame);
        }
        assert!(player.position().y < start_y);

        // A jump held for one frame mid-descent is honoured.
        let jump = InputIntent {
            jump_pressed: true,
            ..sprint
        };
        let snap = player.update(&jump, &solids, 0.016);
        assert!(!snap.is_grounded);
        assert!(player.state.velocity_y > 0.0);
    }

    #[test]
    fn facing_turns_toward_movement_and_stays_wrapped() {
        let mut player = controller_at(0.0, 0.0);
        let solids = CollisionRegistry::new();
        // Forward with the default camera heads toward -Z, i.e. an angle of ±π.
        let intent = InputIntent::moving(Vec2::new(0.0, -1.0));
        for _ in 0..120 {
            player.update(&intent, &solids, 0.016);
            let f = player.state.facing_angle;
            assert!((-std::f32::consts::PI..=std::f32::consts::PI).contains(&f));
        }
        assert!(player.state.facing_angle.abs() > 3.0);
    }

    #[test]
    fn small_stick_noise_is_ignored() {
        let mut player = controller_at(0.0, 0.0);
        let solids = CollisionRegistry::new();
        let intent = InputIntent::moving(Vec2::new(0.05, -0.08));
        let start = player.position();
        let snap = player.update(&intent, &solids, 0.016);
        assert!(!snap.is_moving);
        assert_eq!(xz(snap.position), xz(start));

        // The controller and the intent agree on what counts as movement.
        for raw in [
            Vec2::new(0.08, 0.08),
            Vec2::new(0.2, 0.0),
            Vec2::new(-0.09, 0.3),
        ] {
            let intent = InputIntent::moving(raw);
            let snap = player.update(&intent, &solids, 0.016);
            assert_eq!(snap.is_moving, intent.has_movement(), "axis {:?}", raw);
        }
    }
}
