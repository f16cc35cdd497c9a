//! 2D affine transforms
//!
//! A `Matrix2D` stores six scalars `[m0, m1, m2, m3, m4, m5]`:
//! - linear part `[[m0, m2], [m1, m3]]` (columns `(m0, m1)` and `(m2, m3)`)
//! - translation `(m4, m5)`
//!
//! This is the same column layout as `glam::Affine2::from_cols_array`.

use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};

/// A 2D linear + translation transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix2D(pub [f32; 6]);

impl Default for Matrix2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix2D {
    pub const IDENTITY: Self = Self([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    pub const fn new(m0: f32, m1: f32, m2: f32, m3: f32, m4: f32, m5: f32) -> Self {
        Self([m0, m1, m2, m3, m4, m5])
    }

    /// Pure translation by `offset`
    pub const fn translation(offset: Vec2) -> Self {
        Self([1.0, 0.0, 0.0, 1.0, offset.x, offset.y])
    }

    /// Uniform scale about the origin
    pub const fn scale(factor: f32) -> Self {
        Self([factor, 0.0, 0.0, factor, 0.0, 0.0])
    }

    /// Rotation about the origin: `(cos, sin, -sin, cos, 0, 0)`
    pub fn rotation(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::from_sin_cos(sin, cos)
    }

    /// Rotation from a precomputed sine/cosine pair
    pub const fn from_sin_cos(sin: f32, cos: f32) -> Self {
        Self([cos, sin, -sin, cos, 0.0, 0.0])
    }

    /// Transform a point: `(m0·x + m2·y + m4, m1·x + m3·y + m5)`
    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        let [m0, m1, m2, m3, m4, m5] = self.0;
        Vec2::new(m0 * p.x + m2 * p.y + m4, m1 * p.x + m3 * p.y + m5)
    }

    /// The transform that applies `self` first and then `next`
    pub fn then(&self, next: &Matrix2D) -> Matrix2D {
        let [a0, a1, a2, a3, a4, a5] = next.0;
        let [b0, b1, b2, b3, b4, b5] = self.0;
        Matrix2D([
            a0 * b0 + a2 * b1,
            a1 * b0 + a3 * b1,
            a0 * b2 + a2 * b3,
            a1 * b2 + a3 * b3,
            a0 * b4 + a2 * b5 + a4,
            a1 * b4 + a3 * b5 + a5,
        ])
    }

    /// Compose an ordered sequence into one transform.
    ///
    /// `transforms[0]` is applied to a point first, then `transforms[1]`, and
    /// so on. Returns `None` for an empty slice; a single element comes back
    /// unchanged.
    pub fn compose(transforms: &[Matrix2D]) -> Option<Matrix2D> {
        let (first, rest) = transforms.split_first()?;
        Some(rest.iter().fold(*first, |acc, next| acc.then(next)))
    }

    /// Determinant of the linear part
    #[inline]
    pub fn determinant(&self) -> f32 {
        self.0[0] * self.0[3] - self.0[2] * self.0[1]
    }

    /// Algebraic inverse, or `None` when the linear part is singular
    pub fn inverse(&self) -> Option<Matrix2D> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Affine2::from(*self).inverse().into())
    }
}

impl From<Matrix2D> for Affine2 {
    fn from(m: Matrix2D) -> Self {
        Affine2::from_cols_array(&m.0)
    }
}

impl From<Affine2> for Matrix2D {
    fn from(a: Affine2) -> Self {
        Matrix2D(a.to_cols_array())
    }
}
