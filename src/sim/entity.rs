//! Drawable polygon entities

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::affine::Matrix2D;
use super::behavior::{Behavior, BehaviorConfig, EntityUpdate, SelfState, WorldContext};
use super::scene::ConfigError;
use crate::consts::{DEFAULT_SATURATION, UNCYCLED_PHASE};

/// Closed loop of vertices; the last vertex connects back to the first
pub type Polygon = Vec<Vec2>;

/// Smallest vertex count accepted for a shape
pub const MIN_SHAPE_VERTICES: usize = 3;

/// Static description of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    /// Local-space outline
    pub shape: Polygon,
    pub radius: f32,
    pub position: Vec2,
    pub hue: f32,
    #[serde(default)]
    pub saturation: Option<f32>,
    #[serde(default = "default_lightness")]
    pub lightness_multiplier: f32,
    /// Milliseconds per phase cycle
    #[serde(default)]
    pub cycle_time: Option<f64>,
    pub behavior: BehaviorConfig,
}

fn default_lightness() -> f32 {
    1.0
}

/// A live entity
#[derive(Debug)]
pub struct Entity {
    shape: Polygon,
    pub radius: f32,
    /// World position
    pub position: Vec2,
    pub hue: f32,
    pub saturation: f32,
    pub lightness_multiplier: f32,
    /// Screen-space outline from the latest frame
    pub visible_shape: Polygon,
    cycle_time: Option<f64>,
    /// Milliseconds since creation
    pub age: f64,
    behavior: Box<dyn Behavior>,
}

impl Entity {
    /// Validate a config and build the entity
    pub fn new(config: &EntityConfig) -> Result<Self, ConfigError> {
        if config.shape.len() < MIN_SHAPE_VERTICES {
            return Err(ConfigError::TooFewVertices(config.shape.len()));
        }
        if config.shape.iter().any(|v| !v.is_finite()) || !config.position.is_finite() {
            return Err(ConfigError::NonFinite("shape or position"));
        }
        if !(config.radius.is_finite() && config.radius > 0.0) {
            return Err(ConfigError::Radius(config.radius));
        }
        let saturation = config.saturation.unwrap_or(DEFAULT_SATURATION);
        if !config.hue.is_finite() || !saturation.is_finite() {
            return Err(ConfigError::NonFinite("color"));
        }
        if !(config.lightness_multiplier.is_finite() && config.lightness_multiplier >= 0.0) {
            return Err(ConfigError::Lightness(config.lightness_multiplier));
        }
        if let Some(cycle) = config.cycle_time {
            if !(cycle.is_finite() && cycle > 0.0) {
                return Err(ConfigError::CycleTime(cycle));
            }
        }

        let behavior = config.behavior.build()?;
        if behavior.needs_cycle_time() && config.cycle_time.is_none() {
            return Err(ConfigError::MissingCycleTime);
        }

        Ok(Self {
            shape: config.shape.clone(),
            radius: config.radius,
            position: config.position,
            hue: config.hue,
            saturation,
            lightness_multiplier: config.lightness_multiplier,
            visible_shape: Vec::with_capacity(config.shape.len()),
            cycle_time: config.cycle_time,
            age: 0.0,
            behavior,
        })
    }

    pub fn shape(&self) -> &[Vec2] {
        &self.shape
    }

    pub fn cycle_time(&self) -> Option<f64> {
        self.cycle_time
    }

    pub fn self_state(&self) -> SelfState {
        SelfState {
            position: self.position,
            age: self.age,
            cycle_time: self.cycle_time,
        }
    }

    /// Run this entity's behaviour against its current state
    pub fn compute_update(&self, world: &WorldContext) -> EntityUpdate {
        self.behavior.compute_update(&self.self_state(), world)
    }

    /// Advance the entity's clock
    pub fn grow_older(&mut self, diff: f64) {
        self.age += diff;
    }

    /// Euler step: `position += velocity * diff`
    pub fn integrate(&mut self, velocity: Vec2, diff: f64) {
        self.position += velocity * diff as f32;
    }

    /// Position within the current cycle, in `[0, 1)`
    pub fn phase(&self) -> f32 {
        phase(self.age, self.cycle_time)
    }

    /// Rewrite `visible_shape` with the shape mapped through `transform`
    pub fn map_shape(&mut self, transform: &Matrix2D) {
        self.visible_shape.clear();
        self.visible_shape
            .extend(self.shape.iter().map(|v| transform.apply(*v)));
    }
}

/// `(age mod cycle) / cycle`, or the fixed uncycled phase
pub fn phase(age: f64, cycle_time: Option<f64>) -> f32 {
    match cycle_time {
        Some(cycle) if cycle > 0.0 => (age.rem_euclid(cycle) / cycle) as f32,
        _ => UNCYCLED_PHASE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_config() -> EntityConfig {
        EntityConfig {
            shape: vec![
                Vec2::new(-30.0, -30.0),
                Vec2::new(-30.0, 30.0),
                Vec2::new(30.0, 30.0),
                Vec2::new(30.0, -30.0),
            ],
            radius: 30.0,
            position: Vec2::new(249.5, 499.0),
            hue: 0.0,
            saturation: Some(99.0),
            lightness_multiplier: 1.0,
            cycle_time: Some(999.0),
            behavior: BehaviorConfig::SelfRotating,
        }
    }

    #[test]
    fn test_phase_wraps() {
        assert_eq!(phase(1998.0, Some(999.0)), 0.0);
        assert!((phase(1499.5, Some(999.0)) - 0.5).abs() < 0.01);
        assert_eq!(phase(1234.0, None), UNCYCLED_PHASE);
    }

    #[test]
    fn test_new_accepts_valid_config() {
        let e = Entity::new(&square_config()).unwrap();
        assert_eq!(e.age, 0.0);
        assert_eq!(e.shape().len(), 4);
        assert!(e.visible_shape.is_empty());
    }

    #[test]
    fn test_saturation_defaults() {
        let mut config = square_config();
        config.saturation = None;
        let e = Entity::new(&config).unwrap();
        assert_eq!(e.saturation, DEFAULT_SATURATION);
    }

    #[test]
    fn test_self_rotating_requires_cycle_time() {
        let mut config = square_config();
        config.cycle_time = None;
        assert!(matches!(Entity::new(&config), Err(ConfigError::MissingCycleTime)));
    }

    #[test]
    fn test_rejects_zero_cycle_time() {
        let mut config = square_config();
        config.cycle_time = Some(0.0);
        assert!(matches!(Entity::new(&config), Err(ConfigError::CycleTime(_))));
    }

    #[test]
    fn test_rejects_bad_radius_and_shape() {
        let mut config = square_config();
        config.radius = 0.0;
        assert!(matches!(Entity::new(&config), Err(ConfigError::Radius(_))));

        let mut config = square_config();
        config.shape.truncate(2);
        assert!(matches!(Entity::new(&config), Err(ConfigError::TooFewVertices(2))));

        let mut config = square_config();
        config.shape[0] = Vec2::new(f32::NAN, 0.0);
        assert!(matches!(Entity::new(&config), Err(ConfigError::NonFinite(_))));
    }

    #[test]
    fn test_rejects_bad_lightness() {
        let mut config = square_config();
        config.lightness_multiplier = -1.0;
        assert!(matches!(Entity::new(&config), Err(ConfigError::Lightness(m)) if m == -1.0));

        config.lightness_multiplier = f32::INFINITY;
        assert!(matches!(Entity::new(&config), Err(ConfigError::Lightness(_))));

        config.lightness_multiplier = 0.0;
        assert!(Entity::new(&config).is_ok());
    }

    #[test]
    fn test_map_shape_overwrites() {
        let mut e = Entity::new(&square_config()).unwrap();
        e.map_shape(&Matrix2D::translation(Vec2::new(1.0, 2.0)));
        e.map_shape(&Matrix2D::translation(Vec2::new(10.0, 0.0)));
        assert_eq!(e.visible_shape.len(), 4);
        assert_eq!(e.visible_shape[0], Vec2::new(-20.0, -30.0));
    }

    #[test]
    fn test_integrate() {
        let mut e = Entity::new(&square_config()).unwrap();
        e.integrate(Vec2::new(0.2, -0.2), 10.0);
        assert!((e.position - Vec2::new(251.5, 497.0)).length() < 1e-4);
    }
}
