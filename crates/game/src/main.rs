//! Verde - headless session runner.
//!
//! Builds the world from `config.ron` (or the path given as the first argument),
//! drives the player with a scripted walk, and logs what happened.

use anyhow::{Context, Result};
use std::path::PathBuf;

use game::{GameConfig, Simulation};
use input::{ElementState, InputState, KeyCode};

const FRAME_DT: f32 = 1.0 / 60.0;

/// Keys held and look-stick deflection for a given frame of the scripted walk.
fn script(input: &mut InputState, frame: u32, total: u32) {
    let phase = frame * 5 / total.max(1);
    let held: &[KeyCode] = match phase {
        0 => &[KeyCode::KeyW],
        1 => &[KeyCode::KeyW, KeyCode::ShiftLeft],
        2 => &[KeyCode::KeyW, KeyCode::KeyD],
        3 => &[KeyCode::Space],
        _ => &[],
    };
    for key in [
        KeyCode::KeyW,
        KeyCode::KeyD,
        KeyCode::ShiftLeft,
        KeyCode::Space,
    ] {
        let want = held.contains(&key);
        if want != input.is_key_held(key) {
            let state = if want {
                ElementState::Pressed
            } else {
                ElementState::Released
            };
            input.process_keyboard(key, state);
        }
    }
    if phase == 1 {
        input.look_stick.set(glam::Vec2::new(0.4, 0.0));
    } else {
        input.look_stick.release();
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => GameConfig::load_from(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::load(),
    };

    log::info!("Starting Verde (headless, {} frames)", config.demo_frames);
    log::debug!("Terrain height shader:\n{}", procgen::height_wgsl());

    let mut sim = Simulation::new(&config);
    let mut input = InputState::new();
    let start = sim.player().position();
    let mut walked = 0.0;
    let mut last = start;

    for frame in 0..config.demo_frames {
        input.begin_frame();
        script(&mut input, frame, config.demo_frames);
        let intent = input.intent(config.sensitivity);
        let render = sim.step(&intent, FRAME_DT);

        let pos = sim.player().position();
        walked += glam::Vec2::new(pos.x - last.x, pos.z - last.z).length();
        last = pos;

        if frame % 120 == 0 {
            log::debug!(
                "frame {}: player {:?}, {} birds, {} dust",
                frame,
                pos,
                render.birds.len(),
                sim.dust().active_count()
            );
        }
    }

    let snapshot = sim.context().player;
    let census = sim.flock_census();
    log::info!(
        "Session over after {} frames ({:.1}s simulated, {} hitches)",
        sim.time().frame_count(),
        sim.time().elapsed_seconds(),
        sim.time().hitch_count()
    );
    log::info!(
        "Player walked {:.2} units, now at ({:.2}, {:.2}, {:.2}), facing {:.2} rad{}",
        walked,
        snapshot.position.x,
        snapshot.position.y,
        snapshot.position.z,
        snapshot.facing,
        if snapshot.is_at_boundary { ", at world edge" } else { "" }
    );
    log::info!(
        "Flock: {} flying, {} landing, {} perched, {} taking off",
        census.flying,
        census.landing,
        census.perched,
        census.takeoff
    );

    Ok(())
}
