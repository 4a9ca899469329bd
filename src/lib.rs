//! VectorPerf
//!
//! Micro-benchmarks comparing in-memory representations of small vectors
//! doing scale, add and normalize over seeded sample buffers.
//!
//! ## Representations
//!
//! - **Plain structs**: `Vec4`, `Vec2d` with named fields
//! - **Library vectors**: `nalgebra::Vector4<f32>`, `nalgebra::Vector2<f64>`
//! - **128-bit SIMD-style**: `Float4`, 16-byte aligned
//! - **Hardware-width SIMD-style**: `F32xN`, `F64xN`, one full register wide
//! - **Library matrix**: `ndarray::Array2<f32>`, one vector per row
//! - **Flat array**: interleaved `f32` scalars, stride-4 manual unroll
//!
//! ## Timing
//!
//! Each case is timed adaptively: warm up, time `loops` calls, double
//! `loops` until the pass lasts at least the configured floor (3 s by
//! default) or the loop ceiling is hit, then report seconds per call.

pub mod accel;
pub mod bench;
pub mod core;
pub mod vectors;
pub mod workload;

// Re-exports
pub use accel::CpuCapabilities;
pub use bench::{
    run_all, run_all_async, BenchCase, CaseResult, Measurement, Section, SuiteReport,
    SuiteRunner, TimingHarness, TimingPolicy, VerifyOutcome,
};
pub use crate::core::{BenchConfig, BenchError, BenchResult};
pub use workload::Workload;
