//! Simulation state owned by the render loop

use super::camera::{Bounds, Camera, Viewport};
use super::clock::FrameClock;
use super::entity::Entity;
use super::frame::Background;
use super::scene::{ConfigError, SceneConfig, ScenePreset};
use crate::consts::MAX_FRAME_DELTA_MS;

/// Index of the entity the camera follows
pub const TRACKED: usize = 0;

/// Visual toggles applied while building frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Effects {
    /// Offset glows opposite the direction of travel
    pub motion_blur: bool,
    /// Draw shadow glows at all
    pub glow: bool,
    /// Pulse the bounds outline
    pub pulse_border: bool,
    /// Largest frame delta fed to the entities (ms)
    pub max_frame_delta_ms: f64,
}

impl Default for Effects {
    fn default() -> Self {
        Self {
            motion_blur: true,
            glow: true,
            pulse_border: true,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
        }
    }
}

/// Everything a tick reads and writes
#[derive(Debug)]
pub struct SimState {
    /// Rectangle the tracked entity is clamped into
    pub bounds: Bounds,
    pub background: Background,
    /// Index 0 is the tracked entity
    pub entities: Vec<Entity>,
    pub camera: Camera,
    pub viewport: Viewport,
    pub clock: FrameClock,
    pub effects: Effects,
    /// Clamped delta the latest tick advanced by (ms)
    pub frame_delta_ms: f64,
    /// Ticks run so far
    pub frame_count: u64,
}

impl SimState {
    /// Build a state from a scene; fails if any entity is malformed
    pub fn new(scene: &SceneConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        let entities = scene.build_entities()?;
        log::debug!("Built scene with {} entities", entities.len());

        Ok(Self {
            bounds: scene.bounds,
            background: scene.background,
            entities,
            camera: Camera::default(),
            viewport,
            clock: FrameClock::new(),
            effects: Effects::default(),
            frame_delta_ms: 0.0,
            frame_count: 0,
        })
    }

    pub fn from_preset(preset: ScenePreset, viewport: Viewport) -> Result<Self, ConfigError> {
        Self::new(&preset.config(), viewport)
    }

    /// The entity the camera follows
    pub fn tracked(&self) -> &Entity {
        &self.entities[TRACKED]
    }

    /// Update the viewport after the surface changed size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.viewport = Viewport::from_pixels(width, height);
        }
    }
}
