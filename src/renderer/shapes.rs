//! Tessellation of 2D paths into triangle lists

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Glow;

/// Segments used for round joins
const JOIN_SEGMENTS: u32 = 10;
/// Bands a glow halo is built from
const GLOW_LAYERS: u32 = 4;
/// Opacity of the innermost glow band
const GLOW_ALPHA: f32 = 0.35;

/// Twice the signed area; positive when counter-clockwise in a y-up frame
fn signed_area2(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum()
}

fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Split a simple polygon (either winding) into triangles by ear clipping.
///
/// Returns index triples into `points`. Self-intersecting input falls back
/// to a fan over whatever could not be clipped.
pub fn triangulate(points: &[Vec2]) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let winding = signed_area2(points).signum();
    let mut remaining: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);
    let mut i = 0;
    let mut misses = 0;

    while remaining.len() > 3 {
        let m = remaining.len();
        let at = i % m;
        let (a, b, c) = (remaining[(at + m - 1) % m], remaining[at], remaining[(at + 1) % m]);
        let (pa, pb, pc) = (points[a], points[b], points[c]);
        let turn = (pb - pa).perp_dot(pc - pb);

        let is_ear = if turn.abs() <= f32::EPSILON {
            // Collinear, dropping the middle vertex loses no area
            true
        } else if turn.signum() != winding {
            false
        } else {
            !remaining
                .iter()
                .filter(|&&k| k != a && k != b && k != c)
                .any(|&k| point_in_triangle(points[k], pa, pb, pc))
        };

        if is_ear {
            triangles.push([a, b, c]);
            remaining.remove(at);
            i = at;
            misses = 0;
        } else {
            i = at + 1;
            misses += 1;
            if misses > m {
                for k in 1..m - 1 {
                    triangles.push([remaining[0], remaining[k], remaining[k + 1]]);
                }
                return triangles;
            }
        }
    }

    triangles.push([remaining[0], remaining[1], remaining[2]]);
    triangles
}

/// Filled polygon
pub fn fill_polygon(points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    triangulate(points)
        .into_iter()
        .flat_map(|tri| tri.map(|k| Vertex::new(points[k].x, points[k].y, color)))
        .collect()
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Closed outline of `width` pixels with round joins
pub fn stroke_polygon(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let n = points.len();
    if n < 2 || width <= 0.0 {
        return Vec::new();
    }

    let half = width * 0.5;
    let mut vertices = Vec::with_capacity(n * (6 + JOIN_SEGMENTS as usize * 3));

    for i in 0..n {
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        let perp = (p2 - p1).normalize_or_zero().perp() * half;

        let v1a = p1 + perp;
        let v1b = p1 - perp;
        let v2a = p2 + perp;
        let v2b = p2 - perp;

        // Two triangles per edge
        vertices.push(Vertex::new(v1a.x, v1a.y, color));
        vertices.push(Vertex::new(v1b.x, v1b.y, color));
        vertices.push(Vertex::new(v2a.x, v2a.y, color));

        vertices.push(Vertex::new(v2a.x, v2a.y, color));
        vertices.push(Vertex::new(v1b.x, v1b.y, color));
        vertices.push(Vertex::new(v2b.x, v2b.y, color));

        vertices.extend(circle(p1, half, color, JOIN_SEGMENTS));
    }

    vertices
}

/// Soft halo around an outline, approximating a canvas shadow.
///
/// Bands widen with the blur radius and fade outward; the outermost is
/// emitted first so inner bands blend over it.
pub fn glow_halo(points: &[Vec2], line_width: f32, glow: &Glow) -> Vec<Vertex> {
    if glow.blur <= 0.0 || points.len() < 2 {
        return Vec::new();
    }

    let shifted: Vec<Vec2> = points.iter().map(|&p| p + glow.offset).collect();
    let mut vertices = Vec::new();

    for layer in (1..=GLOW_LAYERS).rev() {
        let t = layer as f32 / GLOW_LAYERS as f32;
        let alpha = GLOW_ALPHA * (1.0 - t) + GLOW_ALPHA / GLOW_LAYERS as f32;
        let color = glow.color.to_rgba(alpha);
        vertices.extend(stroke_polygon(&shifted, line_width + glow.blur * t, color));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Hsl;

    fn triangle_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
        ((b - a).perp_dot(c - a) * 0.5).abs()
    }

    fn total_area(points: &[Vec2]) -> f32 {
        triangulate(points)
            .iter()
            .map(|&[a, b, c]| triangle_area(points[a], points[b], points[c]))
            .sum()
    }

    fn arrow() -> Vec<Vec2> {
        vec![
            Vec2::new(-7.0, -7.0),
            Vec2::new(-3.0, 0.0),
            Vec2::new(-7.0, 7.0),
            Vec2::new(9.0, 0.0),
        ]
    }

    #[test]
    fn test_triangulate_concave_arrow() {
        let points = arrow();
        assert_eq!(triangulate(&points).len(), 2);
        assert!((total_area(&points) - 84.0).abs() < 1e-3);
    }

    #[test]
    fn test_triangulate_either_winding() {
        let mut points = arrow();
        points.reverse();
        assert!((total_area(&points) - 84.0).abs() < 1e-3);
    }

    #[test]
    fn test_triangulate_square() {
        let square = [
            Vec2::new(-30.0, -30.0),
            Vec2::new(-30.0, 30.0),
            Vec2::new(30.0, 30.0),
            Vec2::new(30.0, -30.0),
        ];
        assert!((total_area(&square) - 3600.0).abs() < 1e-2);
    }

    #[test]
    fn test_triangulate_degenerate() {
        assert!(triangulate(&[Vec2::ZERO, Vec2::X]).is_empty());
        // Collinear points never hang
        let line = [Vec2::ZERO, Vec2::X, Vec2::new(2.0, 0.0), Vec2::new(3.0, 0.0)];
        assert_eq!(triangulate(&line).len(), 2);
    }

    #[test]
    fn test_fill_polygon_vertex_count() {
        let vertices = fill_polygon(&arrow(), [1.0; 4]);
        assert_eq!(vertices.len(), 6);
    }

    #[test]
    fn test_stroke_polygon_covers_each_edge() {
        let vertices = stroke_polygon(&arrow(), 2.0, [1.0; 4]);
        assert_eq!(vertices.len(), 4 * (6 + JOIN_SEGMENTS as usize * 3));
        assert!(stroke_polygon(&arrow(), 0.0, [1.0; 4]).is_empty());
    }

    #[test]
    fn test_glow_halo_offset_and_fade() {
        let glow = Glow {
            color: Hsl::new(0.0, 99.0, 50.0),
            blur: 12.0,
            offset: Vec2::new(5.0, 0.0),
        };
        let halo = glow_halo(&arrow(), 2.0, &glow);
        let per_layer = halo.len() / GLOW_LAYERS as usize;
        assert_eq!(halo.len() % GLOW_LAYERS as usize, 0);

        // Outermost band first, faintest
        let outer_alpha = halo[0].color[3];
        let inner_alpha = halo[halo.len() - 1].color[3];
        assert!(outer_alpha < inner_alpha);
        assert_eq!(halo[per_layer].color[3], halo[per_layer + 1].color[3]);

        // Joins are centered on shifted vertices
        assert_eq!(halo[6].position, [-2.0, -7.0]);

        assert!(glow_halo(&arrow(), 2.0, &Glow::NONE).is_empty());
    }
}
