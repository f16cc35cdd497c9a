//! Polyglow - glowing polygons in a camera-following viewport
//!
//! Core modules:
//! - `sim`: Frame simulation (affine math, entities, behaviours, camera, tick)
//! - `renderer`: Drawing surfaces (Canvas 2D, WebGPU, recording)
//! - `platform`: Input state, frame clock, autopilot
//! - `settings`: Persisted user preferences

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{RendererKind, Settings};
pub use sim::{ScenePreset, SimState, tick};

use glam::Vec2;

/// World and timing constants
pub mod consts {
    /// Side length of the square world, in world units
    pub const DIMENSION: f32 = 999.0;
    /// Half of `DIMENSION`, rounded down (also the pixel divisor for global scale)
    pub const DIMENSION_DIV_2: f32 = 499.0;

    /// Period of the pulsing bounds outline (ms)
    pub const BORDER_PULSE_MS: f64 = 999.0;
    /// Hue of the bounds outline
    pub const BORDER_HUE: f32 = 60.0;

    /// Saturation used when an entity doesn't set one
    pub const DEFAULT_SATURATION: f32 = 99.0;
    /// Phase held by entities without a cycle time
    pub const UNCYCLED_PHASE: f32 = 0.4;

    /// Largest frame delta fed to the simulation (ms)
    pub const MAX_FRAME_DELTA_MS: f64 = 250.0;
    /// Native headless stepping interval (ms)
    pub const HEADLESS_FRAME_MS: f64 = 1000.0 / 60.0;
}

/// Pixels per world unit for a viewport of the given pixel size
#[inline]
pub fn global_scale(width: f32, height: f32) -> f32 {
    width.max(height) / consts::DIMENSION_DIV_2
}

/// Sign used by the motion blur: blur trails opposite the direction of travel
#[inline]
pub fn trailing_sign(v: f32) -> f32 {
    if v > 0.0 { -1.0 } else { 1.0 }
}

/// Angle (radians) of the vector pointing from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
