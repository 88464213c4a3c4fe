//! Keyboard & Mouse Controls
//!
//! Maps the polled [`Input`] onto [`RenderState`] once per frame.
//!
//! | Key            | Kind  | Effect                                       |
//! |----------------|-------|----------------------------------------------|
//! | W / A / S / D  | held  | move camera                                  |
//! | Arrows         | held  | move point light 2 on the XZ plane           |
//! | Q / E          | held  | parallax height scale −/+ (clamped [0, 1])   |
//! | M / P          | held  | exposure −/+ (clamped ≥ 0)                   |
//! | Space          | edge  | bloom on/off                                 |
//! | F              | edge  | spotlight on/off                             |
//! | F1             | edge  | UI overlay on/off                            |
//! | I / G / B      | edge  | invert / greyscale / blur filter             |
//! | Esc            | held  | request close                                |

use glam::Vec3;

use crate::resources::input::{Input, Key};
use crate::scene::camera::CameraMovement;
use crate::state::{KeyLatch, PostFilter, PostProcessState, RenderState};

/// Side effects the window layer has to carry out after a control update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlOutcome {
    pub close_requested: bool,
    /// New overlay visibility, when F1 flipped it this frame.
    pub overlay_toggled: Option<bool>,
}

/// Latches for every discrete toggle.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    bloom: KeyLatch,
    spotlight: KeyLatch,
    overlay: KeyLatch,
    invert: KeyLatch,
    greyscale: KeyLatch,
    blur: KeyLatch,
}

impl Controls {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one frame of input to `state`.
    pub fn update(&mut self, input: &Input, state: &mut RenderState, delta_time: f32) -> ControlOutcome {
        let mut outcome = ControlOutcome {
            close_requested: input.get_key(Key::Escape),
            ..Default::default()
        };

        Self::apply_camera(input, state, delta_time);
        Self::apply_light(input, state, delta_time);

        if input.get_key(Key::Q) {
            state.adjust_height_scale(-RenderState::HEIGHT_SCALE_STEP);
        } else if input.get_key(Key::E) {
            state.adjust_height_scale(RenderState::HEIGHT_SCALE_STEP);
        }

        if input.get_key(Key::M) {
            state.post.adjust_exposure(-PostProcessState::EXPOSURE_STEP);
        } else if input.get_key(Key::P) {
            state.post.adjust_exposure(PostProcessState::EXPOSURE_STEP);
        }

        if pressed(&mut self.bloom, input, Key::Space) {
            state.post.toggle_bloom();
        }

        if pressed(&mut self.spotlight, input, Key::F) {
            let lighting = &mut state.program.lighting;
            lighting.spotlight_enabled = !lighting.spotlight_enabled;
            log::info!("spotlight: {}", if lighting.spotlight_enabled { "on" } else { "off" });
        }

        for (latch, key, filter) in [
            (&mut self.invert, Key::I, PostFilter::Invert),
            (&mut self.greyscale, Key::G, PostFilter::Greyscale),
            (&mut self.blur, Key::B, PostFilter::Blur),
        ] {
            if pressed(latch, input, key) {
                state.post.toggle_filter(filter);
            }
        }

        if pressed(&mut self.overlay, input, Key::F1) {
            outcome.overlay_toggled = Some(toggle_overlay(state));
        }

        outcome
    }

    fn apply_camera(input: &Input, state: &mut RenderState, delta_time: f32) {
        let program = &mut state.program;
        for (key, movement) in [
            (Key::W, CameraMovement::Forward),
            (Key::S, CameraMovement::Backward),
            (Key::A, CameraMovement::Left),
            (Key::D, CameraMovement::Right),
        ] {
            if input.get_key(key) {
                program.camera.process_keyboard(movement, delta_time);
            }
        }

        let motion = input.mouse_motion();
        if program.camera_mouse_update && motion != glam::Vec2::ZERO {
            program.camera.process_mouse_movement(motion.x, -motion.y, true);
        }

        let scroll = input.scroll_delta().y;
        if scroll != 0.0 {
            program.camera.process_mouse_scroll(scroll);
        }
    }

    fn apply_light(input: &Input, state: &mut RenderState, delta_time: f32) {
        let lighting = &mut state.program.lighting;
        for (key, direction) in [
            (Key::ArrowUp, Vec3::NEG_Z),
            (Key::ArrowDown, Vec3::Z),
            (Key::ArrowLeft, Vec3::NEG_X),
            (Key::ArrowRight, Vec3::X),
        ] {
            if input.get_key(key) {
                lighting.move_bloom_light(direction, delta_time);
            }
        }
    }
}

/// Feeds `key` into `latch`. A press that was released again before this
/// frame still counts as one press.
fn pressed(latch: &mut KeyLatch, input: &Input, key: Key) -> bool {
    latch.update(input.get_key(key) || input.get_key_down(key))
}

/// Flips overlay visibility and couples camera-from-mouse to it.
///
/// Returns the new visibility.
pub fn toggle_overlay(state: &mut RenderState) -> bool {
    let program = &mut state.program;
    program.ui_enabled = !program.ui_enabled;
    program.camera_mouse_update = !program.ui_enabled;
    program.ui_enabled
}
