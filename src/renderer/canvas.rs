//! Canvas 2D backend

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{DrawSurface, RenderError};
use crate::sim::{Background, Glow, Hsl};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, RenderError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(RenderError::NoContext)?;

        let surface = Self { canvas, ctx };
        surface.apply_defaults();
        Ok(surface)
    }

    /// Context state that resizing the canvas wipes
    fn apply_defaults(&self) {
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
    }
}

impl DrawSurface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != self.size() {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
        self.apply_defaults();
    }

    fn clear(&mut self, background: &Background) {
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        match background {
            Background::Clear => self.ctx.clear_rect(0.0, 0.0, w, h),
            Background::Fill(color) => {
                self.ctx.set_shadow_blur(0.0);
                self.ctx.set_fill_style_str(&color.to_css());
                self.ctx.fill_rect(0.0, 0.0, w, h);
            }
        }
    }

    fn set_line_width(&mut self, width: f32) {
        self.ctx.set_line_width(width as f64);
    }

    fn set_stroke_color(&mut self, color: Hsl) {
        self.ctx.set_stroke_style_str(&color.to_css());
    }

    fn set_fill_color(&mut self, color: Hsl) {
        self.ctx.set_fill_style_str(&color.to_css());
    }

    fn set_glow(&mut self, glow: &Glow) {
        self.ctx.set_shadow_color(&glow.color.to_css());
        self.ctx.set_shadow_blur(glow.blur as f64);
        self.ctx.set_shadow_offset_x(glow.offset.x as f64);
        self.ctx.set_shadow_offset_y(glow.offset.y as f64);
    }

    fn stroke_rect(&mut self, min: Vec2, max: Vec2) {
        let size = max - min;
        self.ctx
            .stroke_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
    }

    fn trace_polygon(&mut self, points: &[Vec2]) {
        self.ctx.begin_path();
        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                self.ctx.move_to(p.x as f64, p.y as f64);
            } else {
                self.ctx.line_to(p.x as f64, p.y as f64);
            }
        }
        self.ctx.close_path();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }
}
