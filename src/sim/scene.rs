//! Scene configuration and built-in presets
//!
//! The sample scenes only differ in constants (bounds, key speed, background),
//! so they are data fed through one code path.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::behavior::BehaviorConfig;
use super::camera::Bounds;
use super::entity::{Entity, EntityConfig};
use super::frame::{Background, Hsl};
use crate::consts::DIMENSION_DIV_2;

/// Why a scene or entity configuration was rejected
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A scene needs a tracked entity at index 0.
    #[error("scene has no entities")]
    EmptyScene,

    #[error("shape needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("radius must be positive, got {0}")]
    Radius(f32),

    #[error("lightness multiplier must be non-negative, got {0}")]
    Lightness(f32),

    #[error("cycle time must be positive, got {0}")]
    CycleTime(f64),

    /// The behaviour reads the cycle time but none was configured.
    #[error("behavior needs a cycle time")]
    MissingCycleTime,

    #[error("speed divisor must be positive, got {0}")]
    SpeedDivisor(f32),

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("bounds are inverted or too small for the tracked entity")]
    Bounds,

    #[error("scene parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A complete scene description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Rectangle the tracked entity is clamped into
    pub bounds: Bounds,
    pub background: Background,
    /// Index 0 is the tracked entity
    pub entities: Vec<EntityConfig>,
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate every entity and build them in order
    pub fn build_entities(&self) -> Result<Vec<Entity>, ConfigError> {
        let tracked = self.entities.first().ok_or(ConfigError::EmptyScene)?;
        if !(self.bounds.min.is_finite() && self.bounds.max.is_finite()) {
            return Err(ConfigError::NonFinite("bounds"));
        }
        if !self.bounds.fits(tracked.radius) {
            return Err(ConfigError::Bounds);
        }
        self.entities.iter().map(Entity::new).collect()
    }
}

/// Built-in scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScenePreset {
    /// Tight bounds, slower keys, transparent background
    #[default]
    Arena,
    /// Wide bounds, faster keys, black background
    Expanse,
}

impl ScenePreset {
    pub const ALL: [ScenePreset; 2] = [ScenePreset::Arena, ScenePreset::Expanse];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenePreset::Arena => "Arena",
            ScenePreset::Expanse => "Expanse",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "arena" => Some(ScenePreset::Arena),
            "expanse" | "wide" => Some(ScenePreset::Expanse),
            _ => None,
        }
    }

    /// The next preset, wrapping around
    pub fn next(&self) -> Self {
        match self {
            ScenePreset::Arena => ScenePreset::Expanse,
            ScenePreset::Expanse => ScenePreset::Arena,
        }
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            ScenePreset::Arena => Bounds::square(299.0, 699.0),
            ScenePreset::Expanse => Bounds::square(99.0, 899.0),
        }
    }

    /// Divisor applied to key input for the tracked entity
    pub fn speed_divisor(&self) -> f32 {
        match self {
            ScenePreset::Arena => 5.0,
            ScenePreset::Expanse => 3.0,
        }
    }

    pub fn background(&self) -> Background {
        match self {
            ScenePreset::Arena => Background::Clear,
            ScenePreset::Expanse => Background::Fill(Hsl::BLACK),
        }
    }

    pub fn config(&self) -> SceneConfig {
        let mut entities = vec![arrow(self.speed_divisor()), red_square()];
        if *self == ScenePreset::Expanse {
            entities.push(cyan_diamond());
        }
        SceneConfig {
            bounds: self.bounds(),
            background: self.background(),
            entities,
        }
    }
}

/// Yellow arrow that faces the pointer; the tracked entity
fn arrow(speed_divisor: f32) -> EntityConfig {
    EntityConfig {
        shape: vec![
            Vec2::new(-7.0, -7.0),
            Vec2::new(-3.0, 0.0),
            Vec2::new(-7.0, 7.0),
            Vec2::new(9.0, 0.0),
        ],
        radius: 9.0,
        position: Vec2::splat(DIMENSION_DIV_2),
        hue: 60.0,
        saturation: Some(99.0),
        lightness_multiplier: 1.0,
        cycle_time: None,
        behavior: BehaviorConfig::PointerSeeking { speed_divisor },
    }
}

fn red_square() -> EntityConfig {
    EntityConfig {
        shape: vec![
            Vec2::new(-30.0, -30.0),
            Vec2::new(-30.0, 30.0),
            Vec2::new(30.0, 30.0),
            Vec2::new(30.0, -30.0),
        ],
        radius: 30.0,
        position: Vec2::new(DIMENSION_DIV_2 / 2.0, DIMENSION_DIV_2),
        hue: 0.0,
        saturation: Some(99.0),
        lightness_multiplier: 1.0,
        cycle_time: Some(999.0),
        behavior: BehaviorConfig::SelfRotating,
    }
}

fn cyan_diamond() -> EntityConfig {
    EntityConfig {
        shape: vec![
            Vec2::new(0.0, -20.0),
            Vec2::new(12.0, 0.0),
            Vec2::new(0.0, 20.0),
            Vec2::new(-12.0, 0.0),
        ],
        radius: 20.0,
        position: Vec2::new(DIMENSION_DIV_2 * 1.5, DIMENSION_DIV_2 * 0.6),
        hue: 180.0,
        saturation: None,
        lightness_multiplier: 0.8,
        cycle_time: Some(3333.0),
        behavior: BehaviorConfig::SelfRotating,
    }
}
