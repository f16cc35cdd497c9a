//! Camera derivation for the tracked entity
//!
//! The camera is derived state: every frame it is recomputed from the tracked
//! entity's clamped position and the current viewport.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::DIMENSION;

/// Axis-aligned world rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Square bounds with both corners on the diagonal
    pub const fn square(min: f32, max: f32) -> Self {
        Self {
            min: Vec2::new(min, min),
            max: Vec2::new(max, max),
        }
    }

    /// Clamp a circle's center so the whole circle stays inside.
    ///
    /// Hard clamp per axis into `[min + radius, max - radius]`.
    pub fn clamp_circle(&self, center: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            clamp_axis(center.x, self.min.x + radius, self.max.x - radius),
            clamp_axis(center.y, self.min.y + radius, self.max.y - radius),
        )
    }

    /// Whether a circle of `radius` fits inside on both axes
    pub fn fits(&self, radius: f32) -> bool {
        self.max.x - self.min.x >= 2.0 * radius && self.max.y - self.min.y >= 2.0 * radius
    }
}

/// `max(min(v, hi), lo)`; a too-small range collapses onto `lo`
#[inline]
fn clamp_axis(v: f32, lo: f32, hi: f32) -> f32 {
    v.min(hi).max(lo)
}

/// Pixel size of the drawing surface plus the derived global scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Pixels per world unit
    pub scale: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32, scale: f32) -> Self {
        Self {
            width,
            height,
            scale,
        }
    }

    /// Viewport whose scale is derived from its larger side
    pub fn from_pixels(width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self::new(w, h, crate::global_scale(w, h))
    }

    /// Visible world extent on each axis
    #[inline]
    pub fn world_extent(&self) -> Vec2 {
        Vec2::new(self.width, self.height) / self.scale
    }
}

/// World-space viewport offset
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    pub offset: Vec2,
}

impl Camera {
    /// Offset for an already clamped tracked position.
    ///
    /// Per axis: `(DIMENSION - viewport / scale) * position / DIMENSION`. This
    /// slides the view proportionally across the world rather than centering
    /// on the tracked entity.
    pub fn offset_for(position: Vec2, viewport: &Viewport) -> Vec2 {
        (Vec2::splat(DIMENSION) - viewport.world_extent()) * position / DIMENSION
    }

    /// Clamp the tracked entity's position into `bounds` and recompute the offset.
    pub fn follow(&mut self, position: &mut Vec2, radius: f32, bounds: &Bounds, viewport: &Viewport) {
        *position = bounds.clamp_circle(*position, radius);
        self.offset = Self::offset_for(*position, viewport);
    }

    /// Screen pixels to world units
    #[inline]
    pub fn screen_to_world(&self, screen: Vec2, scale: f32) -> Vec2 {
        screen / scale + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_low_and_high() {
        let bounds = Bounds::square(99.0, 899.0);
        let low = bounds.clamp_circle(Vec2::new(-50.0, 400.0), 30.0);
        let high = bounds.clamp_circle(Vec2::new(950.0, 400.0), 30.0);
        assert_eq!(low, Vec2::new(129.0, 400.0));
        assert_eq!(high, Vec2::new(869.0, 400.0));
    }

    #[test]
    fn test_offset_literal_zero_when_viewport_matches_world() {
        let viewport = Viewport::new(999.0, 999.0, 1.0);
        let offset = Camera::offset_for(Vec2::new(499.0, 499.0), &viewport);
        assert_eq!(offset, Vec2::ZERO);
    }

    #[test]
    fn test_offset_literal_at_bound_corners() {
        // 499 px at scale 1 shows 499 world units; 500 units of slack remain
        let viewport = Viewport::new(499.0, 499.0, 1.0);
        let bounds = Bounds::square(299.0, 699.0);
        let radius = 9.0;

        let mut pos = Vec2::splat(0.0);
        let mut camera = Camera::default();
        camera.follow(&mut pos, radius, &bounds, &viewport);
        assert_eq!(pos, Vec2::splat(308.0));
        let expected = 500.0 * 308.0 / 999.0;
        assert!((camera.offset.x - expected).abs() < 1e-3);

        let mut pos = Vec2::splat(5000.0);
        camera.follow(&mut pos, radius, &bounds, &viewport);
        assert_eq!(pos, Vec2::splat(690.0));
        let expected = 500.0 * 690.0 / 999.0;
        assert!((camera.offset.y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_offset_is_zero_at_origin() {
        let viewport = Viewport::from_pixels(1280, 720);
        assert_eq!(Camera::offset_for(Vec2::ZERO, &viewport), Vec2::ZERO);
    }

    #[test]
    fn test_offset_uses_each_axis_size() {
        let viewport = Viewport::new(999.0, 499.0, 1.0);
        let offset = Camera::offset_for(Vec2::new(999.0, 999.0), &viewport);
        assert!(offset.x.abs() < 1e-4);
        assert!((offset.y - 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_screen_to_world() {
        let camera = Camera {
            offset: Vec2::new(10.0, 20.0),
        };
        assert_eq!(camera.screen_to_world(Vec2::new(40.0, 80.0), 2.0), Vec2::new(30.0, 60.0));
    }

    #[test]
    fn test_fits() {
        assert!(Bounds::square(299.0, 699.0).fits(30.0));
        assert!(!Bounds::square(0.0, 10.0).fits(30.0));
    }
}
