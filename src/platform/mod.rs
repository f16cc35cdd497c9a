//! Platform abstraction layer
//!
//! Handles host-side concerns the simulation reads through `InputSource`:
//! - Input state written by event callbacks
//! - Key code mapping
//! - FPS tracking
//! - Autopilot input for idle/demo mode

pub mod autopilot;
pub mod fps;

pub use autopilot::Autopilot;
pub use fps::FpsCounter;

use glam::Vec2;

use crate::sim::{InputSource, Key, TickInput};

/// Map a DOM `KeyboardEvent.code` to a directional key
pub fn key_from_code(code: &str) -> Option<Key> {
    match code {
        "KeyA" | "ArrowLeft" => Some(Key::Left),
        "KeyD" | "ArrowRight" => Some(Key::Right),
        "KeyW" | "ArrowUp" => Some(Key::Up),
        "KeyS" | "ArrowDown" => Some(Key::Down),
        _ => None,
    }
}

/// Device state shared between host event callbacks and the frame loop.
///
/// Callbacks write whole values as events arrive; the loop samples it once per
/// tick, so a frame sees a consistent snapshot.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    current: TickInput,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a DOM key code; returns whether it was one of ours
    pub fn key_event(&mut self, code: &str, down: bool) -> bool {
        match key_from_code(code) {
            Some(key) => {
                self.current.keys.set(key, down);
                true
            }
            None => false,
        }
    }

    /// Pointer position in screen pixels
    pub fn pointer_moved(&mut self, position: Vec2) {
        self.current.pointer = position;
    }

    pub fn pointer_pressed(&mut self, down: bool) {
        self.current.pointer_down = down;
    }

    /// Focus left the window; key-up events won't arrive
    pub fn release_all(&mut self) {
        self.current.keys.release_all();
        self.current.pointer_down = false;
    }
}

impl InputSource for InputState {
    fn key(&self, key: Key) -> f32 {
        self.current.keys.value(key)
    }

    fn pointer(&self) -> Vec2 {
        self.current.pointer
    }

    fn pointer_down(&self) -> bool {
        self.current.pointer_down
    }

    fn snapshot(&self) -> TickInput {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{DIMENSION, DIMENSION_DIV_2};

    #[test]
    fn test_key_codes() {
        assert_eq!(key_from_code("KeyA"), Some(Key::Left));
        assert_eq!(key_from_code("ArrowRight"), Some(Key::Right));
        assert_eq!(key_from_code("KeyW"), Some(Key::Up));
        assert_eq!(key_from_code("ArrowDown"), Some(Key::Down));
        assert_eq!(key_from_code("Space"), None);
    }

    #[test]
    fn test_initial_pointer() {
        let input = InputState::new();
        assert_eq!(input.pointer(), Vec2::new(DIMENSION, DIMENSION_DIV_2));
        assert!(!input.pointer_down());
    }

    #[test]
    fn test_events_update_snapshot() {
        let mut input = InputState::new();
        assert!(input.key_event("KeyD", true));
        assert!(!input.key_event("KeyQ", true));
        input.pointer_moved(Vec2::new(12.0, 34.0));
        input.pointer_pressed(true);

        let snap = input.snapshot();
        assert_eq!(snap.key(Key::Right), 1.0);
        assert_eq!(snap.pointer, Vec2::new(12.0, 34.0));
        assert!(snap.pointer_down);

        input.key_event("KeyD", false);
        assert_eq!(input.key(Key::Right), 0.0);
    }

    #[test]
    fn test_release_all() {
        let mut input = InputState::new();
        input.key_event("KeyW", true);
        input.key_event("ArrowLeft", true);
        input.pointer_pressed(true);
        input.release_all();
        assert!(Key::ALL.iter().all(|k| input.key(*k) == 0.0));
        assert!(!input.pointer_down());
    }
}
