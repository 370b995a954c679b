//! Input handling for keyboard, mouse, and the on-screen virtual joysticks.
//!
//! Raw events accumulate in [`InputState`]; once per frame the game samples an
//! [`InputIntent`] from it, and that snapshot is all the simulation ever sees.

use glam::Vec2;
use std::collections::HashSet;

/// Analog stick values below this magnitude (per axis) are ignored.
pub const STICK_DEAD_ZONE: f32 = 0.1;

/// Per-frame snapshot of what the player wants to do.
///
/// `move_axis` uses screen convention: `y = -1` is forward (away from the camera),
/// `x = +1` is right. `camera_delta` is in look-stick units; the controller scales it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputIntent {
    pub move_axis: Vec2,
    pub sprint: bool,
    pub jump_pressed: bool,
    pub camera_delta: Vec2,
}

impl InputIntent {
    /// Convenience constructor for scripted input.
    pub fn moving(move_axis: Vec2) -> Self {
        Self {
            move_axis,
            ..Default::default()
        }
    }

    /// True if either move axis is outside the dead zone.
    pub fn has_movement(&self) -> bool {
        self.move_axis.x.abs() > STICK_DEAD_ZONE || self.move_axis.y.abs() > STICK_DEAD_ZONE
    }
}

/// State of an on-screen stick (or any other analog source) in `[-1, 1]²`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VirtualJoystick {
    value: Vec2,
}

impl VirtualJoystick {
    /// Set the stick deflection; values are clamped into the unit square.
    pub fn set(&mut self, value: Vec2) {
        self.value = value.clamp(Vec2::splat(-1.0), Vec2::ONE);
    }

    /// Return the stick to center.
    pub fn release(&mut self) {
        self.value = Vec2::ZERO;
    }

    pub fn value(&self) -> Vec2 {
        self.value
    }
}

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,

    /// Mouse movement delta this frame.
    mouse_delta: Vec2,
    /// Accumulated mouse delta (for when cursor is locked).
    accumulated_delta: Vec2,
    /// Whether the cursor is captured/locked.
    cursor_locked: bool,

    /// Left on-screen stick: movement.
    pub move_stick: VirtualJoystick,
    /// Right on-screen stick: camera look.
    pub look_stick: VirtualJoystick,
    /// On-screen sprint toggle.
    pub touch_sprint: bool,
    /// On-screen jump button.
    pub touch_jump: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_delta = self.accumulated_delta;
        self.accumulated_delta = Vec2::ZERO;
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    /// Process mouse movement.
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        self.accumulated_delta.x += delta.0 as f32;
        self.accumulated_delta.y += delta.1 as f32;
    }

    /// Drop every held key (window lost focus).
    pub fn release_all(&mut self) {
        let held: Vec<KeyCode> = self.keys_held.drain().collect();
        log::debug!("Releasing {} held keys", held.len());
        self.keys_released.extend(held);
        self.move_stick.release();
        self.look_stick.release();
        self.touch_sprint = false;
        self.touch_jump = false;
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Get the mouse movement delta for this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Check if the cursor is locked.
    pub fn is_cursor_locked(&self) -> bool {
        self.cursor_locked
    }

    /// Set cursor lock state.
    pub fn set_cursor_locked(&mut self, locked: bool) {
        self.cursor_locked = locked;
    }

    /// Movement from WASD/arrows merged with the move stick.
    ///
    /// Each axis is digital: a key or a stick deflection past the dead zone
    /// contributes a full unit. Opposing inputs cancel.
    pub fn get_movement_input(&self) -> Vec2 {
        let stick = self.move_stick.value();
        let mut movement = Vec2::ZERO;

        if self.is_key_held(KeyCode::KeyW)
            || self.is_key_held(KeyCode::ArrowUp)
            || stick.y < -STICK_DEAD_ZONE
        {
            movement.y -= 1.0;
        }
        if self.is_key_held(KeyCode::KeyS)
            || self.is_key_held(KeyCode::ArrowDown)
            || stick.y > STICK_DEAD_ZONE
        {
            movement.y += 1.0;
        }
        if self.is_key_held(KeyCode::KeyA)
            || self.is_key_held(KeyCode::ArrowLeft)
            || stick.x < -STICK_DEAD_ZONE
        {
            movement.x -= 1.0;
        }
        if self.is_key_held(KeyCode::KeyD)
            || self.is_key_held(KeyCode::ArrowRight)
            || stick.x > STICK_DEAD_ZONE
        {
            movement.x += 1.0;
        }

        movement
    }

    /// Check if sprint is held (left Shift or the on-screen toggle).
    pub fn is_sprinting(&self) -> bool {
        self.is_key_held(KeyCode::ShiftLeft) || self.touch_sprint
    }

    /// Jump is level-triggered: holding Space keeps jumping on every landing.
    pub fn is_jump_held(&self) -> bool {
        self.is_key_held(KeyCode::Space) || self.touch_jump
    }

    /// Camera look input: look stick plus mouse motion (only while the cursor is locked).
    pub fn get_look_input(&self, mouse_sensitivity: f32) -> Vec2 {
        let mut look = self.look_stick.value();
        if self.cursor_locked {
            look += self.mouse_delta * mouse_sensitivity;
        }
        look
    }

    /// Sample this frame's intent snapshot.
    pub fn intent(&self, mouse_sensitivity: f32) -> InputIntent {
        InputIntent {
            move_axis: self.get_movement_input(),
            sprint: self.is_sprinting(),
            jump_pressed: self.is_jump_held(),
            camera_delta: self.get_look_input(mouse_sensitivity),
        }
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;
