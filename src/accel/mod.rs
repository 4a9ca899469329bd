//! Hardware feature detection

pub mod cpu;

pub use cpu::CpuCapabilities;
