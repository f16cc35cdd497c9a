//! Per-entity behaviours
//!
//! A behaviour is a pure function of the entity's own state and an explicit
//! world context. It returns the entity's local transform for this frame and a
//! velocity in world units per millisecond; the tick does the rest.

use std::fmt::Debug;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::affine::Matrix2D;
use super::camera::Camera;
use super::input::{Key, KeyStates, TickInput};
use super::scene::ConfigError;

/// The parts of an entity a behaviour may read
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelfState {
    /// World position
    pub position: Vec2,
    /// Milliseconds since the entity was created
    pub age: f64,
    /// Milliseconds per phase cycle, if any
    pub cycle_time: Option<f64>,
}

/// Everything outside the entity a behaviour may read
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldContext {
    /// Pointer in screen pixels
    pub pointer: Vec2,
    pub keys: KeyStates,
    pub pointer_down: bool,
    /// Camera as of the previous frame
    pub camera: Camera,
    /// Pixels per world unit
    pub scale: f32,
}

impl WorldContext {
    pub fn new(input: &TickInput, camera: Camera, scale: f32) -> Self {
        Self {
            pointer: input.pointer,
            keys: input.keys,
            pointer_down: input.pointer_down,
            camera,
            scale,
        }
    }

    /// Pointer mapped into world units
    #[inline]
    pub fn pointer_world(&self) -> Vec2 {
        self.camera.screen_to_world(self.pointer, self.scale)
    }
}

/// Result of running a behaviour for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityUpdate {
    /// Local transform applied to the shape before positioning
    pub transformation: Matrix2D,
    /// World units per millisecond
    pub velocity: Vec2,
}

/// Frame behaviour of an entity
pub trait Behavior: Debug {
    fn compute_update(&self, me: &SelfState, world: &WorldContext) -> EntityUpdate;

    /// Entities using this behaviour must carry a cycle time
    fn needs_cycle_time(&self) -> bool {
        false
    }
}

/// Faces the pointer and moves with the directional keys
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSeeking {
    /// Key velocity is `1 / speed_divisor` world units per ms
    pub speed_divisor: f32,
}

impl Behavior for PointerSeeking {
    fn compute_update(&self, me: &SelfState, world: &WorldContext) -> EntityUpdate {
        let angle = crate::angle_between(me.position, world.pointer_world());
        let velocity = Vec2::new(
            world.keys.axis(Key::Left, Key::Right),
            world.keys.axis(Key::Up, Key::Down),
        ) / self.speed_divisor;

        EntityUpdate {
            transformation: Matrix2D::rotation(angle),
            velocity,
        }
    }
}

/// Spins in place at `1 / cycle_time` radians per ms
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelfRotating;

impl Behavior for SelfRotating {
    fn compute_update(&self, me: &SelfState, _world: &WorldContext) -> EntityUpdate {
        // Validated at construction; a missing cycle holds the shape still
        let angle = match me.cycle_time {
            Some(cycle) if cycle > 0.0 => me.age / cycle,
            _ => 0.0,
        };
        // Unwrapped angle; keep it in f64 until sin/cos
        let (sin, cos) = angle.sin_cos();

        EntityUpdate {
            transformation: Matrix2D::from_sin_cos(sin as f32, cos as f32),
            velocity: Vec2::ZERO,
        }
    }

    fn needs_cycle_time(&self) -> bool {
        true
    }
}

/// Serializable choice of behaviour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviorConfig {
    PointerSeeking { speed_divisor: f32 },
    SelfRotating,
}

impl BehaviorConfig {
    /// Validate and instantiate
    pub fn build(&self) -> Result<Box<dyn Behavior>, ConfigError> {
        match *self {
            BehaviorConfig::PointerSeeking { speed_divisor } => {
                if !(speed_divisor.is_finite() && speed_divisor > 0.0) {
                    return Err(ConfigError::SpeedDivisor(speed_divisor));
                }
                Ok(Box::new(PointerSeeking { speed_divisor }))
            }
            BehaviorConfig::SelfRotating => Ok(Box::new(SelfRotating)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(pointer: Vec2) -> WorldContext {
        WorldContext {
            pointer,
            keys: KeyStates::default(),
            pointer_down: false,
            camera: Camera::default(),
            scale: 1.0,
        }
    }

    fn me(position: Vec2, age: f64, cycle_time: Option<f64>) -> SelfState {
        SelfState {
            position,
            age,
            cycle_time,
        }
    }

    #[test]
    fn test_pointer_seeking_faces_pointer_on_right() {
        let b = PointerSeeking { speed_divisor: 5.0 };
        let update = b.compute_update(&me(Vec2::splat(499.0), 0.0, None), &world(Vec2::new(900.0, 499.0)));
        let [cos, sin, ..] = update.transformation.0;
        assert!((cos - 1.0).abs() < 1e-6);
        assert!(sin.abs() < 1e-6);
        assert_eq!(update.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_pointer_seeking_maps_pointer_through_scale_and_camera() {
        let b = PointerSeeking { speed_divisor: 5.0 };
        let mut ctx = world(Vec2::new(100.0, 300.0));
        ctx.scale = 2.0;
        ctx.camera.offset = Vec2::new(50.0, -50.0);
        // pointer world = (100, 100), straight below (100, 0)
        let update = b.compute_update(&me(Vec2::new(100.0, 0.0), 0.0, None), &ctx);
        let [cos, sin, m2, m3, m4, m5] = update.transformation.0;
        assert!(cos.abs() < 1e-6);
        assert!((sin - 1.0).abs() < 1e-6);
        assert!((m2 + 1.0).abs() < 1e-6);
        assert!(m3.abs() < 1e-6);
        assert_eq!((m4, m5), (0.0, 0.0));
    }

    #[test]
    fn test_pointer_seeking_key_velocity() {
        let b = PointerSeeking { speed_divisor: 3.0 };
        let mut ctx = world(Vec2::ZERO);
        ctx.keys.set(Key::Right, true);
        ctx.keys.set(Key::Up, true);
        let update = b.compute_update(&me(Vec2::ZERO, 0.0, None), &ctx);
        assert!((update.velocity.x - 1.0 / 3.0).abs() < 1e-6);
        assert!((update.velocity.y + 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_self_rotating_angle_and_no_velocity() {
        let update = SelfRotating.compute_update(
            &me(Vec2::new(10.0, 10.0), 999.0 * std::f64::consts::FRAC_PI_2, Some(999.0)),
            &world(Vec2::ZERO),
        );
        let [cos, sin, ..] = update.transformation.0;
        assert!(cos.abs() < 1e-6);
        assert!((sin - 1.0).abs() < 1e-6);
        assert_eq!(update.velocity, Vec2::ZERO);
        assert!(SelfRotating.needs_cycle_time());
    }

    #[test]
    fn test_self_rotating_angle_is_not_wrapped() {
        // Ten full turns plus a quarter
        let age = 999.0 * (20.0 * std::f64::consts::PI + std::f64::consts::FRAC_PI_2);
        let update = SelfRotating.compute_update(&me(Vec2::ZERO, age, Some(999.0)), &world(Vec2::ZERO));
        let [cos, sin, ..] = update.transformation.0;
        assert!(cos.abs() < 1e-5);
        assert!((sin - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_build_rejects_bad_divisor() {
        let err = BehaviorConfig::PointerSeeking { speed_divisor: 0.0 }.build();
        assert!(matches!(err, Err(ConfigError::SpeedDivisor(_))));
        assert!(BehaviorConfig::SelfRotating.build().is_ok());
    }

    #[test]
    fn test_behavior_config_json() {
        let parsed: BehaviorConfig =
            serde_json::from_str(r#"{"kind":"pointer_seeking","speed_divisor":5.0}"#).unwrap();
        assert_eq!(parsed, BehaviorConfig::PointerSeeking { speed_divisor: 5.0 });
        let parsed: BehaviorConfig = serde_json::from_str(r#"{"kind":"self_rotating"}"#).unwrap();
        assert_eq!(parsed, BehaviorConfig::SelfRotating);
    }
}
