//! Vector representations under test
//!
//! - `Vec4` / `Vec2d`: plain structs with named fields
//! - `Float4`: fixed 128-bit, 16-byte aligned 4-lane vector
//! - `F32xN` / `F64xN`: one full hardware register wide
//!
//! The library representations (`nalgebra::Vector4`, `nalgebra::Vector2`,
//! `ndarray::Array2`) are used directly by the workload and cases.

pub mod float4;
pub mod my_vec;
pub mod wide;

pub use float4::Float4;
pub use my_vec::{Vec2d, Vec4};
pub use wide::{F32xN, F64xN, LaneWidths};
