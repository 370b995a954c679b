//! Game configuration (controls, tuning, world seed). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use procgen::{LayoutConfig, GRASS_PER_CHUNK, WORLD_SEED};

/// Why a config file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("could not serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Look-stick units per pixel of mouse motion.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Start the session paused.
    #[serde(default)]
    pub paused: bool,
    /// Seed for the per-session generator (birds, dust).
    #[serde(default = "default_session_seed")]
    pub session_seed: u32,
    /// Frames the headless `verde` run simulates.
    #[serde(default = "default_demo_frames")]
    pub demo_frames: u32,
    #[serde(default)]
    pub player: PlayerTuning,
    #[serde(default)]
    pub camera: CameraTuning,
    #[serde(default)]
    pub birds: BirdTuning,
    #[serde(default)]
    pub world: WorldTuning,
}

fn default_sensitivity() -> f32 {
    0.02
}
fn default_session_seed() -> u32 {
    1
}
fn default_demo_frames() -> u32 {
    600
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            paused: false,
            session_seed: default_session_seed(),
            demo_frames: default_demo_frames(),
            player: PlayerTuning::default(),
            camera: CameraTuning::default(),
            birds: BirdTuning::default(),
            world: WorldTuning::default(),
        }
    }
}

/// Character locomotion constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub walk_speed: f32,
    pub sprint_speed: f32,
    /// Upward velocity applied on jump.
    pub jump_velocity: f32,
    /// Vertical acceleration (negative is down).
    pub gravity: f32,
    /// Radius of the player's collision circle.
    pub collision_radius: f32,
    /// Moves that would reach this distance from the origin are rejected.
    pub map_limit: f32,
    /// Damping rate for turning the body toward the move direction.
    pub turn_damping: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            walk_speed: 7.8,
            sprint_speed: 15.5,
            jump_velocity: 13.0,
            gravity: -35.0,
            collision_radius: 0.6,
            map_limit: 995.0,
            turn_damping: 14.0,
        }
    }
}

/// Third-person orbit camera constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Radians of orbit per unit of look input.
    pub look_speed: f32,
    pub distance: f32,
    /// Extra height above the orbit point.
    pub height_offset: f32,
    pub pitch_min: f32,
    pub pitch_max: f32,
    pub initial_yaw: f32,
    pub initial_pitch: f32,
    pub follow_damping: f32,
    pub sprint_follow_damping: f32,
    pub look_at_damping: f32,
    /// Height of the look-at point above the player's feet.
    pub head_height: f32,
    /// Negate vertical look input.
    pub invert_look: bool,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            look_speed: 0.05,
            distance: 8.8,
            height_offset: 2.8,
            pitch_min: 0.05,
            pitch_max: std::f32::consts::PI / 2.05,
            initial_yaw: 0.0,
            initial_pitch: 0.35,
            follow_damping: 10.0,
            sprint_follow_damping: 14.0,
            look_at_damping: 18.0,
            head_height: 1.8,
            invert_look: false,
            fov_degrees: 50.0,
            near: 0.1,
            far: 2500.0,
        }
    }
}

/// Flock constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdTuning {
    pub count: usize,
    /// Birds beyond this distance from the origin steer back home.
    pub spawn_radius: f32,
    /// Chance a flying bird decides to land each time its timer runs out.
    pub landing_chance: f32,
}

impl Default for BirdTuning {
    fn default() -> Self {
        Self {
            count: 150,
            spawn_radius: 450.0,
            landing_chance: 0.08,
        }
    }
}

/// World generation knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub seed: u32,
    pub tree_count: usize,
    pub bush_count: usize,
    pub grass_per_chunk: usize,
}

impl Default for WorldTuning {
    fn default() -> Self {
        let layout = LayoutConfig::default();
        Self {
            seed: WORLD_SEED,
            tree_count: layout.tree_count,
            bush_count: layout.bush_count,
            grass_per_chunk: GRASS_PER_CHUNK,
        }
    }
}

impl WorldTuning {
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            seed: self.seed,
            tree_count: self.tree_count,
            bush_count: self.bush_count,
            ..LayoutConfig::default()
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Config at {:?} unusable: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Read and parse a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_ron_str(&data)
    }

    pub fn from_ron_str(data: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(data)?)
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Err(e) = self.save_to(&path) {
            log::warn!("Could not save config to {:?}: {}", path, e);
        }
    }

    /// Write the config as pretty RON to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let s = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, s)?;
        Ok(())
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_struct_gives_defaults() {
        let cfg = GameConfig::from_ron_str("()").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.player.walk_speed, 7.8);
        assert_eq!(cfg.camera.distance, 8.8);
        assert_eq!(cfg.birds.count, 150);
        assert_eq!(cfg.world.seed, 987_654_321);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = GameConfig::from_ron_str(
            "(paused: true, player: (sprint_speed: 20.0), camera: (invert_look: true))",
        )
        .unwrap();
        assert!(cfg.paused);
        assert_eq!(cfg.player.sprint_speed, 20.0);
        assert_eq!(cfg.player.walk_speed, 7.8);
        assert!(cfg.camera.invert_look);
        assert_eq!(cfg.camera.look_speed, 0.05);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = GameConfig::from_ron_str("(sensitivity: \"fast\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GameConfig::load_from(Path::new("/nonexistent/verde/config.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn pretty_output_parses_back() {
        let mut cfg = GameConfig::default();
        cfg.world.tree_count = 12;
        let s = ron::ser::to_string_pretty(&cfg, ron::ser::PrettyConfig::default()).unwrap();
        assert_eq!(GameConfig::from_ron_str(&s).unwrap(), cfg);
    }

    #[test]
    fn saved_file_loads_back() {
        let mut cfg = GameConfig::default();
        cfg.sensitivity = 0.05;
        cfg.birds.count = 7;
        cfg.camera.invert_look = true;
        let path = std::env::temp_dir().join(format!("verde-config-{}.ron", std::process::id()));
        cfg.save_to(&path).unwrap();
        let loaded = GameConfig::load_from(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.unwrap(), cfg);
    }

    #[test]
    fn save_to_missing_directory_is_an_io_error() {
        let err = GameConfig::default()
            .save_to(Path::new("/nonexistent/verde/config.ron"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn world_tuning_feeds_layout() {
        let mut world = WorldTuning::default();
        world.seed = 5;
        world.bush_count = 10;
        let layout = world.layout_config();
        assert_eq!(layout.seed, 5);
        assert_eq!(layout.bush_count, 10);
        assert_eq!(layout.tree_count, 300);
    }
}
