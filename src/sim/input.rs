//! Input snapshot consumed by a tick
//!
//! Hosts write raw device state wherever they like; the simulation only sees
//! it through `InputSource`, sampled once at the start of each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DIMENSION, DIMENSION_DIV_2};

/// Directional keys the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
}

impl Key {
    pub const ALL: [Key; 4] = [Key::Left, Key::Right, Key::Up, Key::Down];

    #[inline]
    const fn index(self) -> usize {
        match self {
            Key::Left => 0,
            Key::Right => 1,
            Key::Up => 2,
            Key::Down => 3,
        }
    }
}

/// Held state of every `Key`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyStates([bool; 4]);

impl KeyStates {
    pub fn set(&mut self, key: Key, held: bool) {
        self.0[key.index()] = held;
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.0[key.index()]
    }

    /// 1.0 while held, 0.0 otherwise
    #[inline]
    pub fn value(&self, key: Key) -> f32 {
        if self.is_held(key) { 1.0 } else { 0.0 }
    }

    /// `positive - negative`, in {-1, 0, 1}
    #[inline]
    pub fn axis(&self, negative: Key, positive: Key) -> f32 {
        self.value(positive) - self.value(negative)
    }

    pub fn release_all(&mut self) {
        self.0 = [false; 4];
    }
}

/// Read access to the host's input devices
pub trait InputSource {
    /// 1.0 if `key` is held, else 0.0
    fn key(&self, key: Key) -> f32;
    /// Pointer position in screen pixels
    fn pointer(&self) -> Vec2;
    fn pointer_down(&self) -> bool;

    /// Copy the current device state for one tick
    fn snapshot(&self) -> TickInput {
        let mut keys = KeyStates::default();
        for key in Key::ALL {
            keys.set(key, self.key(key) > 0.0);
        }
        TickInput {
            keys,
            pointer: self.pointer(),
            pointer_down: self.pointer_down(),
        }
    }
}

/// Input as seen by a single tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub keys: KeyStates,
    /// Pointer position in screen pixels
    pub pointer: Vec2,
    pub pointer_down: bool,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            keys: KeyStates::default(),
            // Right edge, vertically centered
            pointer: Vec2::new(DIMENSION, DIMENSION_DIV_2),
            pointer_down: false,
        }
    }
}

impl InputSource for TickInput {
    fn key(&self, key: Key) -> f32 {
        self.keys.value(key)
    }

    fn pointer(&self) -> Vec2 {
        self.pointer
    }

    fn pointer_down(&self) -> bool {
        self.pointer_down
    }

    fn snapshot(&self) -> TickInput {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis() {
        let mut keys = KeyStates::default();
        assert_eq!(keys.axis(Key::Left, Key::Right), 0.0);
        keys.set(Key::Right, true);
        assert_eq!(keys.axis(Key::Left, Key::Right), 1.0);
        keys.set(Key::Left, true);
        assert_eq!(keys.axis(Key::Left, Key::Right), 0.0);
        keys.set(Key::Right, false);
        assert_eq!(keys.axis(Key::Left, Key::Right), -1.0);
        keys.release_all();
        assert!(!keys.is_held(Key::Left));
    }

    #[test]
    fn test_snapshot_copies_state() {
        let mut input = TickInput::default();
        input.keys.set(Key::Up, true);
        input.pointer = Vec2::new(3.0, 4.0);
        let snap = input.snapshot();
        assert_eq!(snap.key(Key::Up), 1.0);
        assert_eq!(snap.key(Key::Down), 0.0);
        assert_eq!(snap.pointer(), Vec2::new(3.0, 4.0));
    }
}
