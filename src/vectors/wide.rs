//! Hardware-width vectors.
//!
//! The lane count follows the widest vector register enabled at compile time:
//! 64 bytes with `avx512f`, 32 bytes with `avx`, 16 bytes otherwise (SSE2 on
//! x86_64, NEON on aarch64). Build with `-C target-cpu=native` to pick up the
//! host's width.
//!
//! A logical 4D (f32) or 2D (f64) vector sits in the leading lanes; the
//! remaining lanes are padding and hold zero.

use serde::Serialize;
use std::ops::{Add, Mul};

/// Width in bytes of the widest enabled vector register.
pub const SIMD_BYTES: usize = if cfg!(target_feature = "avx512f") {
    64
} else if cfg!(target_feature = "avx") {
    32
} else {
    16
};

pub const F32_LANES: usize = SIMD_BYTES / std::mem::size_of::<f32>();
pub const F64_LANES: usize = SIMD_BYTES / std::mem::size_of::<f64>();
pub const I32_LANES: usize = SIMD_BYTES / std::mem::size_of::<i32>();

/// Lane counts of the hardware-width vectors, per scalar type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LaneWidths {
    pub floats: usize,
    pub doubles: usize,
    pub ints: usize,
}

impl LaneWidths {
    pub const fn current() -> Self {
        Self {
            floats: F32_LANES,
            doubles: F64_LANES,
            ints: I32_LANES,
        }
    }
}

macro_rules! wide_vector {
    ($(#[$meta:meta])* $name:ident, $scalar:ty, $lanes:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq)]
        #[repr(C, align(16))]
        pub struct $name(pub [$scalar; $lanes]);

        impl $name {
            pub const LANES: usize = $lanes;

            #[inline(always)]
            pub const fn splat(v: $scalar) -> Self {
                Self([v; $lanes])
            }

            /// Copies `values` into the leading lanes, zeroing the rest.
            ///
            /// Extra values beyond the lane count are ignored.
            pub fn from_leading(values: &[$scalar]) -> Self {
                let mut lanes = [0.0; $lanes];
                for (lane, v) in lanes.iter_mut().zip(values) {
                    *lane = *v;
                }
                Self(lanes)
            }

            #[inline(always)]
            pub fn lanes(&self) -> &[$scalar; $lanes] {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::splat(0.0)
            }
        }

        impl Add for $name {
            type Output = Self;

            #[inline(always)]
            fn add(self, other: Self) -> Self {
                let mut out = self.0;
                for (o, b) in out.iter_mut().zip(other.0.iter()) {
                    *o += *b;
                }
                Self(out)
            }
        }

        impl Mul<$scalar> for $name {
            type Output = Self;

            #[inline(always)]
            fn mul(self, s: $scalar) -> Self {
                let mut out = self.0;
                for o in out.iter_mut() {
                    *o *= s;
                }
                Self(out)
            }
        }
    };
}

wide_vector!(
    /// f32 vector spanning one full hardware register.
    F32xN,
    f32,
    F32_LANES
);

wide_vector!(
    /// f64 vector spanning one full hardware register.
    F64xN,
    f64,
    F64_LANES
);

impl F32xN {
    /// Normalizes the logical 4D vector held in lanes 0..4.
    #[inline(always)]
    pub fn normalize4(self) -> Self {
        let v = &self.0;
        let s = 1.0f32 / (v[0] * v[0] + v[1] * v[1] + v[2] * v[2] + v[3] * v[3]).sqrt();
        self * s
    }
}
