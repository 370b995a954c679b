//! Third-person orbit camera that trails the player.

use bytemuck::{Pod, Zeroable};
use engine_core::{damp_vec3, Mat4, Vec2, Vec3};

use crate::config::CameraTuning;

/// Orbit camera. `yaw` (theta) spins around the player, `pitch` (phi) lifts the
/// camera above the horizon.
#[derive(Debug, Clone)]
pub struct FollowCamera {
    /// Smoothed eye position.
    pub position: Vec3,
    /// Smoothed point the camera looks at.
    pub look_at: Vec3,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    yaw: f32,
    pitch: f32,
    tuning: CameraTuning,
}

impl FollowCamera {
    /// Camera already settled behind a player standing at `player`.
    pub fn new(player: Vec3, tuning: CameraTuning) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            look_at: Vec3::ZERO,
            aspect: 16.0 / 9.0,
            yaw: tuning.initial_yaw,
            pitch: tuning.initial_pitch.clamp(tuning.pitch_min, tuning.pitch_max),
            tuning,
        };
        camera.position = camera.orbit_target(player);
        camera.look_at = camera.head(player);
        camera
    }

    /// Update aspect ratio (call on window resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Apply one frame of look input.
    pub fn process_look(&mut self, delta: Vec2) {
        let dy = if self.tuning.invert_look { -delta.y } else { delta.y };
        self.yaw -= delta.x * self.tuning.look_speed;
        self.pitch = (self.pitch + dy * self.tuning.look_speed)
            .clamp(self.tuning.pitch_min, self.tuning.pitch_max);
    }

    /// Where the eye wants to be for a player at `player`.
    pub fn orbit_target(&self, player: Vec3) -> Vec3 {
        let d = self.tuning.distance;
        player
            + Vec3::new(
                d * self.yaw.sin() * self.pitch.cos(),
                d * self.pitch.sin() + self.tuning.height_offset,
                d * self.yaw.cos() * self.pitch.cos(),
            )
    }

    fn head(&self, player: Vec3) -> Vec3 {
        player + Vec3::Y * self.tuning.head_height
    }

    /// Ease the eye toward its orbit slot and the look-at toward the player's head.
    pub fn follow(&mut self, player: Vec3, sprinting: bool, dt: f32) {
        let k = if sprinting {
            self.tuning.sprint_follow_damping
        } else {
            self.tuning.follow_damping
        };
        self.position = damp_vec3(self.position, self.orbit_target(player), k, dt);
        self.look_at = damp_vec3(self.look_at, self.head(player), self.tuning.look_at_damping, dt);
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, Vec3::Y)
    }

    /// Get the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.tuning.fov_degrees.to_radians(),
            self.aspect,
            self.tuning.near,
            self.tuning.far,
        )
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Camera uniform data for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub position: [f32; 4], // w unused, padding
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            view: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 4],
        }
    }

    pub fn update(&mut self, camera: &FollowCamera) {
        self.view = camera.view_matrix().to_cols_array_2d();
        self.view_proj = camera.view_projection_matrix().to_cols_array_2d();
        let pos = camera.position;
        self.position = [pos.x, pos.y, pos.z, 1.0];
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}
