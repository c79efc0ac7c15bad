use std::collections::HashSet;

use glam::Vec2;

use super::queue::InputEvent;
use crate::renderer::camera::Camera;

/// Per-frame input snapshot built from the drained event queue.
///
/// "Pressed" and "released" flags are edge-triggered and last one frame;
/// "held" state persists until the matching up event arrives.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    pointer_screen: Vec2,
    pointer_world: Vec2,
    pointer_held: bool,
    pointer_pressed: bool,
    pointer_released: bool,
    keys_held: HashSet<u32>,
    keys_pressed: HashSet<u32>,
    keys_released: HashSet<u32>,
    resized: Option<(u32, u32)>,
    custom: Vec<InputEvent>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold this frame's events into the snapshot. Pointer positions are
    /// converted to world space with `camera`.
    pub fn begin_frame(&mut self, events: &[InputEvent], camera: &Camera) {
        self.pointer_pressed = false;
        self.pointer_released = false;
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.resized = None;
        self.custom.clear();

        for event in events {
            match *event {
                InputEvent::PointerDown { x, y } => {
                    self.pointer_screen = Vec2::new(x, y);
                    self.pointer_held = true;
                    self.pointer_pressed = true;
                }
                InputEvent::PointerUp { x, y } => {
                    self.pointer_screen = Vec2::new(x, y);
                    self.pointer_held = false;
                    self.pointer_released = true;
                }
                InputEvent::PointerMove { x, y } => {
                    self.pointer_screen = Vec2::new(x, y);
                }
                InputEvent::KeyDown { key_code } => {
                    // Key repeat arrives as repeated downs; only the first counts.
                    if self.keys_held.insert(key_code) {
                        self.keys_pressed.insert(key_code);
                    }
                }
                InputEvent::KeyUp { key_code } => {
                    self.keys_held.remove(&key_code);
                    self.keys_released.insert(key_code);
                }
                InputEvent::Resize { width, height } => {
                    self.resized = Some((width, height));
                }
                InputEvent::Custom { .. } => self.custom.push(*event),
            }
        }
        self.pointer_world = camera.screen_to_world(self.pointer_screen);
    }

    pub fn pointer_screen(&self) -> Vec2 {
        self.pointer_screen
    }

    pub fn pointer_world(&self) -> Vec2 {
        self.pointer_world
    }

    pub fn pointer_held(&self) -> bool {
        self.pointer_held
    }

    pub fn pointer_pressed(&self) -> bool {
        self.pointer_pressed
    }

    pub fn pointer_released(&self) -> bool {
        self.pointer_released
    }

    pub fn key_held(&self, key_code: u32) -> bool {
        self.keys_held.contains(&key_code)
    }

    pub fn key_pressed(&self, key_code: u32) -> bool {
        self.keys_pressed.contains(&key_code)
    }

    pub fn key_released(&self, key_code: u32) -> bool {
        self.keys_released.contains(&key_code)
    }

    pub fn any_key_pressed(&self) -> bool {
        !self.keys_pressed.is_empty()
    }

    /// Latest surface size reported this frame.
    pub fn resized(&self) -> Option<(u32, u32)> {
        self.resized
    }

    pub fn custom_events(&self) -> &[InputEvent] {
        &self.custom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::queue::keys;
    use crate::renderer::camera::CameraConfig;

    fn camera() -> Camera {
        Camera::new(CameraConfig { ortho_size: 300.0 }, 800, 600)
    }

    #[test]
    fn pointer_edges_last_one_frame() {
        let cam = camera();
        let mut input = InputState::new();
        input.begin_frame(&[InputEvent::PointerDown { x: 400.0, y: 300.0 }], &cam);
        assert!(input.pointer_pressed());
        assert!(input.pointer_held());
        assert!(input.pointer_world().length() < 1e-3);

        input.begin_frame(&[], &cam);
        assert!(!input.pointer_pressed());
        assert!(input.pointer_held());

        input.begin_frame(&[InputEvent::PointerUp { x: 0.0, y: 0.0 }], &cam);
        assert!(input.pointer_released());
        assert!(!input.pointer_held());
        assert!((input.pointer_world() - Vec2::new(-400.0, 300.0)).length() < 1e-3);
    }

    #[test]
    fn key_repeat_counts_once() {
        let cam = camera();
        let mut input = InputState::new();
        let down = InputEvent::KeyDown { key_code: keys::SPACE };
        input.begin_frame(&[down], &cam);
        assert!(input.key_pressed(keys::SPACE));

        input.begin_frame(&[down], &cam);
        assert!(!input.key_pressed(keys::SPACE));
        assert!(input.key_held(keys::SPACE));

        input.begin_frame(&[InputEvent::KeyUp { key_code: keys::SPACE }], &cam);
        assert!(input.key_released(keys::SPACE));
        assert!(!input.key_held(keys::SPACE));
    }

    #[test]
    fn resize_and_custom_are_captured() {
        let cam = camera();
        let mut input = InputState::new();
        input.begin_frame(
            &[
                InputEvent::Resize { width: 1024, height: 768 },
                InputEvent::Custom { kind: 7, a: 1.0, b: 0.0, c: 0.0 },
            ],
            &cam,
        );
        assert_eq!(input.resized(), Some((1024, 768)));
        assert_eq!(input.custom_events().len(), 1);
        input.begin_frame(&[], &cam);
        assert_eq!(input.resized(), None);
        assert!(input.custom_events().is_empty());
    }
}
