//! Winit input event adapter
//!
//! Translates winit events into the platform-agnostic [`Input`] types.

use winit::event::{DeviceEvent, ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::resources::input::{ButtonState, Input, Key};

/// Scale applied to trackpad pixel deltas so they feel like wheel lines.
const PIXEL_SCROLL_SCALE: f32 = 0.01;

/// Maps a winit physical key onto the renderer's [`Key`].
#[must_use]
pub fn translate_key(physical_key: PhysicalKey) -> Option<Key> {
    let PhysicalKey::Code(code) = physical_key else {
        return None;
    };

    let key = match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,

        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyP => Key::P,

        KeyCode::KeyF => Key::F,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyB => Key::B,
        KeyCode::F1 => Key::F1,
        KeyCode::Space => Key::Space,
        KeyCode::Escape => Key::Escape,

        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,

        _ => return None,
    };

    Some(key)
}

#[must_use]
pub fn translate_element_state(state: ElementState) -> ButtonState {
    match state {
        ElementState::Pressed => ButtonState::Pressed,
        ElementState::Released => ButtonState::Released,
    }
}

/// Whether a key event in `state` reaches [`Input`] even when the overlay
/// consumed it. Releases always do, so no key stays held behind the overlay.
#[must_use]
pub fn key_bypasses_overlay(state: ElementState) -> bool {
    state == ElementState::Released
}

/// Whether `event` must reach [`Input`] even when the overlay consumed it.
#[must_use]
pub fn bypasses_overlay(event: &WindowEvent) -> bool {
    match event {
        WindowEvent::KeyboardInput { event, .. } => key_bypasses_overlay(event.state),
        WindowEvent::Focused(_) => true,
        _ => false,
    }
}

/// Feeds keyboard, wheel and focus events into `input`.
pub fn process_window_event(input: &mut Input, event: &WindowEvent) {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            if let Some(key) = translate_key(event.physical_key) {
                input.inject_key(key, translate_element_state(event.state));
            }
        }

        WindowEvent::MouseWheel { delta, .. } => {
            let (dx, dy) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                MouseScrollDelta::PixelDelta(pos) => (
                    pos.x as f32 * PIXEL_SCROLL_SCALE,
                    pos.y as f32 * PIXEL_SCROLL_SCALE,
                ),
            };
            input.inject_scroll(dx, dy);
        }

        WindowEvent::Focused(false) => input.release_all(),

        _ => {}
    }
}

/// Feeds raw pointer motion into `input`.
///
/// Device events keep arriving while the cursor is grabbed, which window
/// cursor events do not.
pub fn process_device_event(input: &mut Input, event: &DeviceEvent) {
    if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
        input.inject_mouse_motion(*dx as f32, *dy as f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn key_releases_bypass_the_overlay() {
        assert!(key_bypasses_overlay(ElementState::Released));
        assert!(!key_bypasses_overlay(ElementState::Pressed));
    }

    #[test]
    fn focus_changes_bypass_the_overlay() {
        assert!(bypasses_overlay(&WindowEvent::Focused(false)));
        assert!(bypasses_overlay(&WindowEvent::Focused(true)));
        assert!(!bypasses_overlay(&WindowEvent::Resized(PhysicalSize::new(800, 600))));
    }

    #[test]
    fn losing_focus_releases_held_keys() {
        let mut input = Input::new();
        input.inject_key(Key::W, ButtonState::Pressed);
        process_window_event(&mut input, &WindowEvent::Focused(false));
        assert!(!input.get_key(Key::W));
    }

    #[test]
    fn letter_and_function_keys_translate() {
        assert_eq!(translate_key(PhysicalKey::Code(KeyCode::KeyW)), Some(Key::W));
        assert_eq!(translate_key(PhysicalKey::Code(KeyCode::F1)), Some(Key::F1));
        assert_eq!(translate_key(PhysicalKey::Code(KeyCode::KeyZ)), None);
    }
}
