//! Platform-agnostic input system
//!
//! Defines input types and state containers that do not depend on any GUI library.
//! The winit adapter translates platform events into these types; the controls
//! poll the resulting state once per frame.

use glam::Vec2;
use rustc_hash::FxHashSet;

/// Keyboard keys the renderer reacts to (platform-agnostic).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    // Movement
    W,
    A,
    S,
    D,

    // Parallax / exposure adjust
    Q,
    E,
    M,
    P,

    // Toggles
    F,
    I,
    G,
    B,
    F1,
    Space,
    Escape,

    // Arrow keys
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

/// Button state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Platform-agnostic input state container
#[derive(Debug, Clone, Default)]
pub struct Input {
    pressed_keys: FxHashSet<Key>,
    just_pressed_keys: FxHashSet<Key>,

    // Relative pointer motion, unaffected by cursor grab
    mouse_motion: Vec2,
    scroll_delta: Vec2,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== System API (called by the adapter) ==========

    /// Clears transient state at the start of each frame
    pub fn start_frame(&mut self) {
        self.just_pressed_keys.clear();
        self.mouse_motion = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }

    /// Injects a keyboard event
    pub fn inject_key(&mut self, key: Key, state: ButtonState) {
        match state {
            ButtonState::Pressed => {
                if self.pressed_keys.insert(key) {
                    self.just_pressed_keys.insert(key);
                }
            }
            ButtonState::Released => {
                self.pressed_keys.remove(&key);
            }
        }
    }

    /// Injects raw pointer motion
    pub fn inject_mouse_motion(&mut self, dx: f32, dy: f32) {
        self.mouse_motion += Vec2::new(dx, dy);
    }

    /// Injects a scroll wheel event
    pub fn inject_scroll(&mut self, delta_x: f32, delta_y: f32) {
        self.scroll_delta += Vec2::new(delta_x, delta_y);
    }

    /// Drops all held keys, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.pressed_keys.clear();
    }

    // ========== User API ==========

    /// Checks whether a key is currently held down
    #[must_use]
    pub fn get_key(&self, key: Key) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Checks whether a key was pressed since the last frame
    #[must_use]
    pub fn get_key_down(&self, key: Key) -> bool {
        self.just_pressed_keys.contains(&key)
    }

    /// Pointer motion accumulated this frame, in window space (y down)
    #[must_use]
    pub fn mouse_motion(&self) -> Vec2 {
        self.mouse_motion
    }

    /// Scroll wheel delta for this frame
    #[must_use]
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }
}
