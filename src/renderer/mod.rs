//! Rendering module
//!
//! A `Frame` from the simulation is replayed onto a `DrawSurface`. Surfaces:
//! - `CanvasSurface`: browser Canvas 2D (wasm only)
//! - `GpuSurface`: WebGPU via wgpu, tessellating polygons into vertex batches
//! - `RecordingSurface`: records commands (headless runs and tests)

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod pipeline;
pub mod recording;
pub mod shapes;
pub mod vertex;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use pipeline::GpuSurface;
pub use recording::{DrawCommand, RecordingSurface};

use glam::Vec2;

use crate::sim::{Background, Frame, Glow, Hsl};

/// Why a frame could not be presented
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("no suitable adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("surface creation failed: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("surface has no usable format")]
    NoSurfaceFormat,

    /// The canvas refused to hand out a 2D context.
    #[error("canvas 2d context unavailable")]
    NoContext,
}

/// Drawing primitives a frame is replayed with.
///
/// Modeled on a 2D canvas: style setters affect every following draw call,
/// `trace_polygon` replaces the current path, and `fill`/`stroke` draw it.
pub trait DrawSurface {
    /// Current size in pixels
    fn size(&self) -> (u32, u32);

    /// The backing store became `width` x `height` pixels.
    ///
    /// Like a canvas, a resized surface forgets its style state; surfaces put
    /// their own defaults (caps, joins) back and the next frame sets the rest.
    fn resize(&mut self, width: u32, height: u32);

    fn clear(&mut self, background: &Background);

    fn set_line_width(&mut self, width: f32);
    fn set_stroke_color(&mut self, color: Hsl);
    fn set_fill_color(&mut self, color: Hsl);
    fn set_glow(&mut self, glow: &Glow);

    /// Outline an axis-aligned rectangle between two corners
    fn stroke_rect(&mut self, min: Vec2, max: Vec2);

    /// Begin a path through `points` and close it
    fn trace_polygon(&mut self, points: &[Vec2]);

    fn fill(&mut self);
    fn stroke(&mut self);

    /// Called once all of a frame's draw calls are issued
    fn finish_frame(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Replay `frame` onto `surface`
pub fn draw_frame(surface: &mut impl DrawSurface, frame: &Frame) -> Result<(), RenderError> {
    surface.clear(&frame.background);

    let border = &frame.border;
    surface.set_glow(&border.glow);
    surface.set_stroke_color(border.color);
    surface.set_line_width(border.line_width);
    surface.stroke_rect(border.min, border.max);

    for polygon in &frame.polygons {
        surface.set_line_width(polygon.line_width);
        surface.trace_polygon(&polygon.points);
        surface.set_glow(&polygon.glow);
        surface.set_stroke_color(polygon.stroke);
        surface.set_fill_color(polygon.fill);
        surface.fill();
        surface.stroke();
    }

    surface.finish_frame()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ScenePreset, SimState, TickInput, Viewport, tick};

    #[test]
    fn test_draw_frame_order() {
        let mut state = SimState::from_preset(ScenePreset::Expanse, Viewport::from_pixels(640, 480)).unwrap();
        let frame = tick(&mut state, &TickInput::default(), 0.0);

        let mut surface = RecordingSurface::new(640, 480);
        draw_frame(&mut surface, &frame).unwrap();
        let commands = surface.commands();

        assert_eq!(commands[0], DrawCommand::Clear(frame.background));
        assert!(matches!(commands[4], DrawCommand::StrokeRect { .. }));
        // Every entity is filled before it is stroked, in index order
        let traced: Vec<usize> = commands
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, DrawCommand::TracePolygon(_)))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(traced.len(), frame.polygons.len());
        for (n, start) in traced.iter().enumerate() {
            assert_eq!(commands[*start], DrawCommand::TracePolygon(frame.polygons[n].points.clone()));
            assert_eq!(commands[start + 4], DrawCommand::Fill);
            assert_eq!(commands[start + 5], DrawCommand::Stroke);
        }
        assert_eq!(surface.frames_finished(), 1);
    }

    #[test]
    fn test_draw_frame_style_state() {
        let mut state = SimState::from_preset(ScenePreset::Arena, Viewport::from_pixels(640, 480)).unwrap();
        let frame = tick(&mut state, &TickInput::default(), 0.0);

        let mut surface = RecordingSurface::new(640, 480);
        draw_frame(&mut surface, &frame).unwrap();

        // After replay the pen holds the last polygon's style
        let last = frame.polygons.last().unwrap();
        assert_eq!(surface.pen().fill, last.fill);
        assert_eq!(surface.pen().stroke, last.stroke);
        assert_eq!(surface.pen().glow, last.glow);
        assert_eq!(surface.pen().line_width, last.line_width);
        assert_eq!(surface.fills().len(), frame.polygons.len());
        assert_eq!(surface.fills()[0].1, frame.polygons[0].fill);
    }
}
