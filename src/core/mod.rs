//! Configuration and error types

pub mod config;
pub mod error;

pub use config::BenchConfig;
pub use error::{BenchError, BenchResult};
