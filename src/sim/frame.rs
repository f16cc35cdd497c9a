//! Per-frame draw instructions
//!
//! A tick produces a `Frame`: background, bounds outline, and one closed
//! polygon per entity in index order. Renderers replay it onto a surface.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Color in cylindrical HSL space (hue in degrees, saturation and lightness in percent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub const BLACK: Hsl = Hsl::new(0.0, 0.0, 0.0);

    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    /// CSS color string, e.g. `hsl(60,99%,49%)`
    pub fn to_css(&self) -> String {
        format!("hsl({},{}%,{}%)", self.h, self.s, self.l)
    }

    /// Linear RGBA in `[0, 1]` with the given alpha.
    ///
    /// Saturation and lightness are clamped to `[0, 100]` the way CSS clamps them.
    pub fn to_rgba(&self, alpha: f32) -> [f32; 4] {
        let h = self.h.rem_euclid(360.0) / 360.0;
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let l = (self.l / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            return [l, l, l, alpha];
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        [
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
            alpha,
        ]
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// How a frame starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "color", rename_all = "snake_case")]
pub enum Background {
    /// Wipe to transparent
    Clear,
    /// Paint an opaque color
    Fill(Hsl),
}

/// Shadow-style glow around the next fill/stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: Hsl,
    /// Blur radius in pixels
    pub blur: f32,
    /// Pixel offset of the glow (motion blur)
    pub offset: Vec2,
}

impl Glow {
    pub const NONE: Glow = Glow {
        color: Hsl::BLACK,
        blur: 0.0,
        offset: Vec2::ZERO,
    };
}

/// The pulsing world-bounds outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderDraw {
    /// Screen-space corners
    pub min: Vec2,
    pub max: Vec2,
    pub color: Hsl,
    pub line_width: f32,
    pub glow: Glow,
}

/// One entity, filled then stroked
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonDraw {
    /// Screen-space closed loop
    pub points: Vec<Vec2>,
    pub fill: Hsl,
    pub stroke: Hsl,
    pub line_width: f32,
    pub glow: Glow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub background: Background,
    pub border: BorderDraw,
    pub polygons: Vec<PolygonDraw>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-3)
    }

    #[test]
    fn test_css_format() {
        assert_eq!(Hsl::new(60.0, 99.0, 49.5).to_css(), "hsl(60,99%,49.5%)");
        assert_eq!(Hsl::new(0.0, 11.0, 0.0).to_css(), "hsl(0,11%,0%)");
    }

    #[test]
    fn test_primary_colors() {
        assert!(approx(Hsl::new(0.0, 100.0, 50.0).to_rgba(1.0), [1.0, 0.0, 0.0, 1.0]));
        assert!(approx(Hsl::new(120.0, 100.0, 50.0).to_rgba(1.0), [0.0, 1.0, 0.0, 1.0]));
        assert!(approx(Hsl::new(240.0, 100.0, 50.0).to_rgba(0.5), [0.0, 0.0, 1.0, 0.5]));
        assert!(approx(Hsl::new(60.0, 100.0, 50.0).to_rgba(1.0), [1.0, 1.0, 0.0, 1.0]));
    }

    #[test]
    fn test_grey_and_clamping() {
        assert!(approx(Hsl::new(200.0, 0.0, 25.0).to_rgba(1.0), [0.25, 0.25, 0.25, 1.0]));
        // Lightness above 100% saturates to white
        assert!(approx(Hsl::new(0.0, 99.0, 140.0).to_rgba(1.0), [1.0, 1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_background_json() {
        let fill: Background = serde_json::from_str(r#"{"mode":"fill","color":{"h":0,"s":0,"l":0}}"#).unwrap();
        assert_eq!(fill, Background::Fill(Hsl::BLACK));
        let clear: Background = serde_json::from_str(r#"{"mode":"clear"}"#).unwrap();
        assert_eq!(clear, Background::Clear);
    }
}
