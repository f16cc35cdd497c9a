//! Surface that records draw calls instead of rasterizing them

use glam::Vec2;

use super::{DrawSurface, RenderError};
use crate::sim::{Background, Glow, Hsl};

/// One recorded call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Background),
    SetLineWidth(f32),
    SetStrokeColor(Hsl),
    SetFillColor(Hsl),
    SetGlow(Glow),
    StrokeRect { min: Vec2, max: Vec2 },
    TracePolygon(Vec<Vec2>),
    Fill,
    Stroke,
}

/// Current style state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub line_width: f32,
    pub stroke: Hsl,
    pub fill: Hsl,
    pub glow: Glow,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            stroke: Hsl::BLACK,
            fill: Hsl::BLACK,
            glow: Glow::NONE,
        }
    }
}

/// Records the latest frame's commands plus what was actually painted
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: (u32, u32),
    commands: Vec<DrawCommand>,
    pen: Pen,
    path: Vec<Vec2>,
    fills: Vec<(Vec<Vec2>, Hsl)>,
    strokes: Vec<(Vec<Vec2>, Hsl)>,
    frames_finished: u64,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            commands: Vec::new(),
            pen: Pen::default(),
            path: Vec::new(),
            fills: Vec::new(),
            strokes: Vec::new(),
            frames_finished: 0,
        }
    }

    /// Commands since the last `clear`
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn pen(&self) -> &Pen {
        &self.pen
    }

    /// Filled paths since the last `clear`, with their fill color
    pub fn fills(&self) -> &[(Vec<Vec2>, Hsl)] {
        &self.fills
    }

    /// Stroked paths since the last `clear` (rectangles included), with their color
    pub fn strokes(&self) -> &[(Vec<Vec2>, Hsl)] {
        &self.strokes
    }

    pub fn frames_finished(&self) -> u64 {
        self.frames_finished
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.pen = Pen::default();
        self.path.clear();
    }

    fn clear(&mut self, background: &Background) {
        self.commands.clear();
        self.fills.clear();
        self.strokes.clear();
        self.path.clear();
        self.commands.push(DrawCommand::Clear(*background));
    }

    fn set_line_width(&mut self, width: f32) {
        self.pen.line_width = width;
        self.commands.push(DrawCommand::SetLineWidth(width));
    }

    fn set_stroke_color(&mut self, color: Hsl) {
        self.pen.stroke = color;
        self.commands.push(DrawCommand::SetStrokeColor(color));
    }

    fn set_fill_color(&mut self, color: Hsl) {
        self.pen.fill = color;
        self.commands.push(DrawCommand::SetFillColor(color));
    }

    fn set_glow(&mut self, glow: &Glow) {
        self.pen.glow = *glow;
        self.commands.push(DrawCommand::SetGlow(*glow));
    }

    fn stroke_rect(&mut self, min: Vec2, max: Vec2) {
        let corners = vec![min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)];
        self.strokes.push((corners, self.pen.stroke));
        self.commands.push(DrawCommand::StrokeRect { min, max });
    }

    fn trace_polygon(&mut self, points: &[Vec2]) {
        self.path.clear();
        self.path.extend_from_slice(points);
        self.commands.push(DrawCommand::TracePolygon(points.to_vec()));
    }

    fn fill(&mut self) {
        self.fills.push((self.path.clone(), self.pen.fill));
        self.commands.push(DrawCommand::Fill);
    }

    fn stroke(&mut self) {
        self.strokes.push((self.path.clone(), self.pen.stroke));
        self.commands.push(DrawCommand::Stroke);
    }

    fn finish_frame(&mut self) -> Result<(), RenderError> {
        self.frames_finished += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_starts_a_new_frame() {
        let mut surface = RecordingSurface::new(10, 10);
        surface.trace_polygon(&[Vec2::ZERO, Vec2::X, Vec2::Y]);
        surface.fill();
        surface.clear(&Background::Clear);
        assert_eq!(surface.commands(), &[DrawCommand::Clear(Background::Clear)]);
        assert!(surface.fills().is_empty());
    }

    #[test]
    fn test_stroke_rect_records_corners() {
        let mut surface = RecordingSurface::new(10, 10);
        surface.set_stroke_color(Hsl::new(60.0, 99.0, 49.0));
        surface.stroke_rect(Vec2::new(1.0, 2.0), Vec2::new(5.0, 6.0));
        let (corners, color) = &surface.strokes()[0];
        assert_eq!(corners[1], Vec2::new(5.0, 2.0));
        assert_eq!(corners[3], Vec2::new(1.0, 6.0));
        assert_eq!(*color, Hsl::new(60.0, 99.0, 49.0));
    }

    #[test]
    fn test_resize_forgets_style_state() {
        let mut surface = RecordingSurface::new(10, 10);
        surface.set_line_width(6.0);
        surface.set_fill_color(Hsl::new(0.0, 11.0, 20.0));
        surface.resize(40, 30);
        assert_eq!(surface.size(), (40, 30));
        assert_eq!(*surface.pen(), Pen::default());
    }

    #[test]
    fn test_fill_uses_current_path_and_color() {
        let mut surface = RecordingSurface::new(10, 10);
        let tri = [Vec2::ZERO, Vec2::X, Vec2::Y];
        surface.trace_polygon(&tri);
        surface.set_fill_color(Hsl::new(0.0, 11.0, 20.0));
        surface.fill();
        assert_eq!(surface.fills()[0], (tri.to_vec(), Hsl::new(0.0, 11.0, 20.0)));
    }
}
