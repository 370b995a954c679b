//! Verde gameplay: configuration, the player controller and follow camera, the bird
//! flock, footstep dust, character animation, and the frame scheduler tying them together.

pub mod animation;
pub mod bird;
pub mod camera;
pub mod cape;
pub mod config;
pub mod dust;
pub mod player;
pub mod simulation;

pub use animation::{CapeSwing, CharacterAnimation, LimbPose};
pub use bird::{Bird, FlightPhase, Flock, Plumage};
pub use camera::{CameraUniform, FollowCamera};
pub use cape::{CapeCloth, CapeVertex};
pub use config::{BirdTuning, CameraTuning, ConfigError, GameConfig, PlayerTuning, WorldTuning};
pub use dust::FootstepDust;
pub use player::{PlayerController, PlayerState};
pub use simulation::{FlockCensus, InstanceData, RenderFrame, Simulation};
