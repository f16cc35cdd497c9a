//! Idle/demo mode input
//!
//! Stands in for a player: holds random direction keys for a while and glides
//! the pointer toward random screen positions. Seeded, so a given seed always
//! produces the same input sequence.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::{InputSource, Key, TickInput, Viewport};

/// Shortest and longest time a key choice is held (ms)
const HOLD_MS: (f64, f64) = (300.0, 1500.0);
/// Chance that any one direction key is held after a retarget
const KEY_CHANCE: f64 = 0.3;
/// Fraction of the remaining distance the pointer covers per ms
const POINTER_EASE_PER_MS: f32 = 0.004;

#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    current: TickInput,
    pointer_target: Vec2,
    retarget_in_ms: f64,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        let current = TickInput::default();
        Self {
            rng: Pcg32::seed_from_u64(seed),
            pointer_target: current.pointer,
            current,
            retarget_in_ms: 0.0,
        }
    }

    /// Advance by `dt` ms within a viewport
    pub fn update(&mut self, dt: f64, viewport: &Viewport) {
        self.retarget_in_ms -= dt;
        if self.retarget_in_ms <= 0.0 {
            self.retarget(viewport);
        }

        let t = (POINTER_EASE_PER_MS * dt as f32).clamp(0.0, 1.0);
        self.current.pointer = self.current.pointer.lerp(self.pointer_target, t);
    }

    fn retarget(&mut self, viewport: &Viewport) {
        for key in Key::ALL {
            let held = self.rng.random_bool(KEY_CHANCE);
            self.current.keys.set(key, held);
        }
        self.pointer_target = Vec2::new(
            self.rng.random_range(0.0..viewport.width.max(1.0)),
            self.rng.random_range(0.0..viewport.height.max(1.0)),
        );
        self.retarget_in_ms = self.rng.random_range(HOLD_MS.0..HOLD_MS.1);
        log::trace!(
            "Autopilot retarget: pointer {:?}, hold {:.0} ms",
            self.pointer_target,
            self.retarget_in_ms
        );
    }
}

impl InputSource for Autopilot {
    fn key(&self, key: Key) -> f32 {
        self.current.keys.value(key)
    }

    fn pointer(&self) -> Vec2 {
        self.current.pointer
    }

    fn pointer_down(&self) -> bool {
        false
    }

    fn snapshot(&self) -> TickInput {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(seed: u64, steps: usize) -> Vec<TickInput> {
        let viewport = Viewport::from_pixels(1280, 720);
        let mut pilot = Autopilot::new(seed);
        (0..steps)
            .map(|_| {
                pilot.update(16.0, &viewport);
                pilot.snapshot()
            })
            .collect()
    }

    #[test]
    fn test_same_seed_same_inputs() {
        assert_eq!(run(42, 300), run(42, 300));
    }

    #[test]
    fn test_pointer_stays_on_screen() {
        for input in run(7, 600) {
            assert!(input.pointer.x >= 0.0 && input.pointer.x <= 1280.0);
            assert!(input.pointer.y >= 0.0 && input.pointer.y <= 720.0);
        }
    }

    #[test]
    fn test_pointer_moves_toward_target() {
        let viewport = Viewport::from_pixels(1280, 720);
        let mut pilot = Autopilot::new(3);
        pilot.update(16.0, &viewport);
        let target = pilot.pointer_target;
        let before = (pilot.pointer() - target).length();
        pilot.update(16.0, &viewport);
        let after = (pilot.pointer() - target).length();
        assert!(after <= before);
    }
}
