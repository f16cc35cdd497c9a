//! Per-frame update
//!
//! One call advances every entity by the frame delta, moves the camera with
//! the tracked entity, and returns the draw instructions for the frame.

use glam::Vec2;

use super::affine::Matrix2D;
use super::behavior::WorldContext;
use super::camera::Bounds;
use super::entity::Entity;
use super::frame::{BorderDraw, Frame, Glow, Hsl, PolygonDraw};
use super::input::InputSource;
use super::state::{Effects, SimState, TRACKED};
use crate::consts::{BORDER_HUE, BORDER_PULSE_MS};

/// Advance the simulation to host time `now` (ms) and build the frame
pub fn tick(state: &mut SimState, input: &impl InputSource, now: f64) -> Frame {
    let diff = state.clock.advance(now, state.effects.max_frame_delta_ms);
    state.frame_delta_ms = diff;
    state.frame_count += 1;

    let input = input.snapshot();
    let scale = state.viewport.scale;

    // Built from last frame's camera; the tracked entity moves it below
    let screen = screen_transform(state.camera.offset, scale);
    let pulse = if state.effects.pulse_border {
        border_pulse(now)
    } else {
        0.0
    };
    let border = border_draw(&state.bounds, &screen, scale, pulse);
    let line_width = base_line_width(scale);

    let mut polygons = Vec::with_capacity(state.entities.len());
    for (i, entity) in state.entities.iter_mut().enumerate() {
        entity.grow_older(diff);

        let world = WorldContext::new(&input, state.camera, scale);
        let update = entity.compute_update(&world);
        entity.integrate(update.velocity, diff);

        if i == TRACKED {
            state
                .camera
                .follow(&mut entity.position, entity.radius, &state.bounds, &state.viewport);
        }

        // Local shape: rotate, then place in the world, then onto the screen
        let full = Matrix2D::compose(&[update.transformation, Matrix2D::translation(entity.position), screen])
            .unwrap_or_default();
        entity.map_shape(&full);

        polygons.push(polygon_draw(entity, update.velocity, scale, line_width, &state.effects));
    }

    Frame {
        background: state.background,
        border,
        polygons,
    }
}

/// World to screen: shift by the camera, then scale to pixels
pub fn screen_transform(camera: Vec2, scale: f32) -> Matrix2D {
    Matrix2D::compose(&[Matrix2D::translation(-camera), Matrix2D::scale(scale)]).unwrap_or_default()
}

/// Entity outline width in pixels
#[inline]
pub fn base_line_width(scale: f32) -> f32 {
    scale.floor() + 2.0
}

/// Pulse value in `[0, 111)` cycling every `BORDER_PULSE_MS`
#[inline]
pub fn border_pulse(now: f64) -> f32 {
    (now.rem_euclid(BORDER_PULSE_MS) / 9.0) as f32
}

fn border_draw(bounds: &Bounds, screen: &Matrix2D, scale: f32, pulse: f32) -> BorderDraw {
    let color = Hsl::new(BORDER_HUE, 99.0, pulse + 49.0);
    BorderDraw {
        min: screen.apply(bounds.min),
        max: screen.apply(bounds.max),
        color,
        line_width: base_line_width(scale) + 2.0,
        glow: Glow {
            color,
            blur: pulse * scale,
            offset: Vec2::ZERO,
        },
    }
}

/// Glow radius in pixels: `(9 + radius² · phase²) · scale`
#[inline]
pub fn glow_blur(radius: f32, phase: f32, scale: f32) -> f32 {
    (9.0 + radius * radius * phase * phase) * scale
}

/// Per-axis glow offset trailing behind the velocity
pub fn motion_blur_offset(velocity: Vec2, radius: f32) -> Vec2 {
    let axis = |v: f32| crate::trailing_sign(v) * (v.abs() * 9.0 * radius).sqrt();
    Vec2::new(axis(velocity.x), axis(velocity.y))
}

/// Colors of an entity for a phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityColors {
    pub glow: Hsl,
    pub stroke: Hsl,
    pub fill: Hsl,
}

pub fn entity_colors(hue: f32, saturation: f32, lightness_multiplier: f32, phase: f32) -> EntityColors {
    let lightness = lightness_multiplier * 99.0;
    EntityColors {
        glow: Hsl::new(hue, saturation, lightness),
        stroke: Hsl::new(hue, saturation, lightness * (1.0 - (0.5 - phase).abs() / 2.0)),
        fill: Hsl::new(
            hue,
            saturation / 9.0,
            lightness_multiplier * 33.0 * (1.0 - phase * phase),
        ),
    }
}

fn polygon_draw(entity: &Entity, velocity: Vec2, scale: f32, line_width: f32, effects: &Effects) -> PolygonDraw {
    let phase = entity.phase();
    let colors = entity_colors(entity.hue, entity.saturation, entity.lightness_multiplier, phase);

    let glow = if effects.glow {
        Glow {
            color: colors.glow,
            blur: glow_blur(entity.radius, phase, scale),
            offset: if effects.motion_blur {
                motion_blur_offset(velocity, entity.radius)
            } else {
                Vec2::ZERO
            },
        }
    } else {
        Glow::NONE
    };

    PolygonDraw {
        points: entity.visible_shape.clone(),
        fill: colors.fill,
        stroke: colors.stroke,
        line_width,
        glow,
    }
}
