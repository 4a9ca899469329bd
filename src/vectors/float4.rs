//! Fixed 128-bit 4-wide f32 vector.
//!
//! The layout matches one SSE/NEON register so LLVM can keep a `Float4` in a
//! single XMM/Q register and emit packed instructions for the element-wise
//! ops. No intrinsics are used; every method is written so auto-vectorization
//! picks it up.

use std::ops::{Add, Mul};

/// A 4-wide f32 vector, 16-byte aligned.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C, align(16))]
pub struct Float4(pub [f32; 4]);

impl Float4 {
    #[inline(always)]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self([x, y, z, w])
    }

    #[inline(always)]
    pub const fn splat(v: f32) -> Self {
        Self([v, v, v, v])
    }

    #[inline(always)]
    pub const fn to_array(self) -> [f32; 4] {
        self.0
    }

    /// Dot product of two vectors.
    #[inline(always)]
    pub fn dot(self, other: Self) -> f32 {
        let p = self.mul_lanes(other);
        (p.0[0] + p.0[1]) + (p.0[2] + p.0[3])
    }

    /// Element-wise multiply.
    #[inline(always)]
    pub fn mul_lanes(self, other: Self) -> Self {
        Self([
            self.0[0] * other.0[0],
            self.0[1] * other.0[1],
            self.0[2] * other.0[2],
            self.0[3] * other.0[3],
        ])
    }

    #[inline(always)]
    pub fn normalize(self) -> Self {
        let s = 1.0f32 / self.dot(self).sqrt();
        self * s
    }
}

impl Add for Float4 {
    type Output = Self;

    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Self([
            self.0[0] + other.0[0],
            self.0[1] + other.0[1],
            self.0[2] + other.0[2],
            self.0[3] + other.0[3],
        ])
    }
}

impl Mul<f32> for Float4 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, s: f32) -> Self {
        self.mul_lanes(Self::splat(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment() {
        assert_eq!(std::mem::align_of::<Float4>(), 16);
        assert_eq!(std::mem::size_of::<Float4>(), 16);
    }

    #[test]
    fn test_dot_and_normalize() {
        let v = Float4::new(2.0, 0.0, 0.0, 0.0);
        assert_eq!(v.dot(v), 4.0);
        assert_eq!(v.normalize().to_array(), [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_add_and_scale() {
        let a = Float4::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!((a + Float4::splat(1.0)).to_array(), [2.0, 3.0, 4.0, 5.0]);
        assert_eq!((a * 0.5).to_array(), [0.5, 1.0, 1.5, 2.0]);
    }
}
