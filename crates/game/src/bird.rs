//! Bird flock: autonomous fliers that wander, land, perch and take off again.
//!
//! Each bird is a `hecs` entity with a [`Transform`] (position, orientation, scale)
//! and a [`Bird`] carrying its velocity and [`FlightPhase`]. Birds never interact
//! with each other or with the player; they only read the terrain height.

use std::f32::consts::TAU;

use engine_core::{clamp_dt, Quat, Transform, Vec3};
use hecs::World;
use procgen::height;
use rand::Rng;

use crate::config::BirdTuning;

/// Squared distance at which a landing bird snaps onto its perch.
const PERCH_SNAP_DIST_SQ: f32 = 1.0;
/// Minimum clearance a flying bird keeps above the ground.
const MIN_CLEARANCE: f32 = 2.0;
const TAKEOFF_CLIMB_RATE: f32 = 6.0;
const HOME_STEER_RATE: f32 = 1.5;
const LANDING_STEER_RATE: f32 = 2.0;
const WING_AMPLITUDE: f32 = 0.45;

/// What a bird is currently doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightPhase {
    /// Wandering; `timer` counts down to the next decision.
    Flying { timer: f32 },
    /// Gliding toward a spot on the ground.
    Landing { target: Vec3 },
    /// Sitting still until `timer` runs out.
    Perched { timer: f32 },
    /// Climbing until the bird is above `target_altitude`.
    Takeoff { target_altitude: f32 },
}

impl FlightPhase {
    pub fn name(&self) -> &'static str {
        match self {
            FlightPhase::Flying { .. } => "flying",
            FlightPhase::Landing { .. } => "landing",
            FlightPhase::Perched { .. } => "perched",
            FlightPhase::Takeoff { .. } => "takeoff",
        }
    }
}

/// Feather colour class, chosen from the wing seed at the 0.33 and 0.66 cut points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plumage {
    White,
    Scarlet,
    Blue,
}

impl Plumage {
    pub fn from_seed(seed: f32) -> Self {
        if seed < 0.33 {
            Plumage::White
        } else if seed < 0.66 {
            Plumage::Scarlet
        } else {
            Plumage::Blue
        }
    }

    /// Linear RGB.
    pub fn color(self) -> [f32; 3] {
        match self {
            Plumage::White => [0.95, 0.95, 0.95],
            Plumage::Scarlet => [0.85, 0.1, 0.08],
            Plumage::Blue => [0.1, 0.3, 0.9],
        }
    }
}

/// Per-bird flight component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bird {
    /// Spawn index; offsets the flap bob so the flock doesn't move in lockstep.
    pub index: u32,
    /// Direction of travel, scaled by `speed` when integrating.
    pub velocity: Vec3,
    pub speed: f32,
    pub phase: FlightPhase,
    /// Random value in `[0, 1)` the wing shader derives flap speed and colour from.
    pub wing_seed: f32,
    pub plumage: Plumage,
}

impl Bird {
    /// Angular flap frequency (radians per second).
    pub fn flap_speed(&self) -> f32 {
        15.0 + self.wing_seed * 10.0
    }

    /// Wing rotation at time `t`. The seed also offsets the phase.
    pub fn flap_angle(&self, t: f32) -> f32 {
        (t * self.flap_speed() + self.wing_seed * 100.0).sin() * WING_AMPLITUDE
    }
}

/// Spawns and steps every bird in the world.
pub struct Flock {
    tuning: BirdTuning,
}

impl Flock {
    pub fn new(tuning: BirdTuning) -> Self {
        Self { tuning }
    }

    /// Scatter `tuning.count` birds over the home disc.
    pub fn spawn<R: Rng + ?Sized>(&self, world: &mut World, rng: &mut R) {
        for i in 0..self.tuning.count {
            let (transform, bird) = new_bird(i as u32, self.tuning.spawn_radius, rng);
            world.spawn((transform, bird));
        }
        log::info!("Spawned flock of {} birds", self.tuning.count);
    }

    /// Advance every bird by one frame. `elapsed` drives the flap bob.
    pub fn update<R: Rng + ?Sized>(&self, world: &mut World, rng: &mut R, elapsed: f32, dt: f32) {
        let dt = clamp_dt(dt);
        for (_, (transform, bird)) in world.query_mut::<(&mut Transform, &mut Bird)>() {
            step_bird(transform, bird, &self.tuning, &mut *rng, elapsed, dt);
        }
    }

    pub fn tuning(&self) -> &BirdTuning {
        &self.tuning
    }
}

fn new_bird<R: Rng + ?Sized>(index: u32, radius: f32, rng: &mut R) -> (Transform, Bird) {
    let angle = rng.gen::<f32>() * TAU;
    let r = rng.gen::<f32>() * radius;
    let x = angle.cos() * r;
    let z = angle.sin() * r;
    let y = height(x, z) + 5.0 + rng.gen::<f32>() * 20.0;

    let heading = rng.gen::<f32>() * TAU;
    let velocity = Vec3::new(heading.cos(), 0.0, heading.sin());
    let timer = rng.gen::<f32>() * 5.0;
    let speed = 6.0 + rng.gen::<f32>() * 8.0;
    let scale = 0.5 + rng.gen::<f32>() * 0.4;
    let wing_seed = rng.gen::<f32>();

    let mut transform = Transform {
        position: Vec3::new(x, y, z),
        rotation: Quat::IDENTITY,
        scale: Vec3::splat(scale),
    };
    transform.face_towards(transform.position + velocity);

    let bird = Bird {
        index,
        velocity,
        speed,
        phase: FlightPhase::Flying { timer },
        wing_seed,
        plumage: Plumage::from_seed(wing_seed),
    };
    (transform, bird)
}

/// One frame of one bird's state machine.
pub fn step_bird<R: Rng + ?Sized>(
    transform: &mut Transform,
    bird: &mut Bird,
    tuning: &BirdTuning,
    rng: &mut R,
    elapsed: f32,
    dt: f32,
) {
    let pos = &mut transform.position;
    match bird.phase {
        FlightPhase::Flying { mut timer } => {
            timer -= dt;
            bird.phase = FlightPhase::Flying { timer };
            if timer <= 0.0 {
                bird.phase = FlightPhase::Flying {
                    timer: 1.0 + rng.gen::<f32>() * 4.0,
                };
                if rng.gen::<f32>() < tuning.landing_chance {
                    let angle = rng.gen::<f32>() * TAU;
                    let dist = 5.0 + rng.gen::<f32>() * 15.0;
                    let tx = pos.x + angle.cos() * dist;
                    let tz = pos.z + angle.sin() * dist;
                    bird.phase = FlightPhase::Landing {
                        target: Vec3::new(tx, height(tx, tz), tz),
                    };
                } else {
                    let turn = (rng.gen::<f32>() - 0.5) * 3.0 * dt;
                    bird.velocity = (Quat::from_rotation_y(turn) * bird.velocity).normalize_or_zero();
                }
            }

            // Steer home when straying outside the spawn disc.
            let r = tuning.spawn_radius;
            if pos.x * pos.x + pos.z * pos.z > r * r {
                let home = Vec3::new(-pos.x, 0.0, -pos.z).normalize_or_zero();
                bird.velocity = bird.velocity.lerp(home, dt * HOME_STEER_RATE);
            }

            bird.velocity.y = (elapsed * 2.0 + bird.index as f32).sin() * 0.2;

            if pos.y < height(pos.x, pos.z) + MIN_CLEARANCE {
                bird.velocity.y += 1.0;
                pos.y += 3.0 * dt;
            }

            *pos += bird.velocity * bird.speed * dt;
        }
        FlightPhase::Landing { target } => {
            let d = target - *pos;
            let dist_sq = d.length_squared();
            if dist_sq < PERCH_SNAP_DIST_SQ {
                *pos = target;
                bird.phase = FlightPhase::Perched {
                    timer: 2.0 + rng.gen::<f32>() * 4.0,
                };
            } else {
                let dir = d / dist_sq.sqrt();
                bird.velocity += (dir - bird.velocity) * dt * LANDING_STEER_RATE;
                *pos += bird.velocity * bird.speed * dt;
            }
        }
        FlightPhase::Perched { timer } => {
            let timer = timer - dt;
            if timer <= 0.0 {
                let a = rng.gen::<f32>() * TAU;
                bird.velocity = Vec3::new(a.cos(), 0.8, a.sin()).normalize();
                bird.phase = FlightPhase::Takeoff {
                    target_altitude: pos.y + 10.0 + rng.gen::<f32>() * 5.0,
                };
            } else {
                bird.phase = FlightPhase::Perched { timer };
            }
        }
        FlightPhase::Takeoff { target_altitude } => {
            pos.y += TAKEOFF_CLIMB_RATE * dt;
            *pos += bird.velocity * bird.speed * 0.5 * dt;
            if pos.y > target_altitude {
                bird.phase = FlightPhase::Flying { timer: 1.0 };
            }
        }
    }

    if !matches!(bird.phase, FlightPhase::Perched { .. }) {
        let target = transform.position + bird.velocity;
        transform.face_towards(target);
    }
}
