//! Error type shared by the benchmark crate

use std::fmt;

/// Errors raised around the benchmark run.
///
/// The timed operations themselves never fail; everything here comes from
/// configuration, report output or task plumbing.
#[derive(Debug, Clone)]
pub enum BenchError {
    /// Config file could not be parsed or serialized
    Config(String),
    /// Config values are out of range
    InvalidConfig(String),
    /// I/O error while reading config or writing a report
    Io(String),
    /// Sample buffers could not be shaped
    Workload(String),
    /// Case filter matched nothing
    NoMatchingCase(String),
    /// Background task panicked or was aborted
    Task(String),
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchError::Config(msg) => write!(f, "Config error: {}", msg),
            BenchError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            BenchError::Io(msg) => write!(f, "I/O error: {}", msg),
            BenchError::Workload(msg) => write!(f, "Workload error: {}", msg),
            BenchError::NoMatchingCase(filter) => {
                write!(f, "No benchmark case matches '{}'", filter)
            }
            BenchError::Task(msg) => write!(f, "Benchmark task failed: {}", msg),
        }
    }
}

impl std::error::Error for BenchError {}

impl From<std::io::Error> for BenchError {
    fn from(err: std::io::Error) -> Self {
        BenchError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for BenchError {
    fn from(err: toml::de::Error) -> Self {
        BenchError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for BenchError {
    fn from(err: toml::ser::Error) -> Self {
        BenchError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        BenchError::Io(err.to_string())
    }
}

impl From<ndarray::ShapeError> for BenchError {
    fn from(err: ndarray::ShapeError) -> Self {
        BenchError::Workload(err.to_string())
    }
}

impl From<tokio::task::JoinError> for BenchError {
    fn from(err: tokio::task::JoinError) -> Self {
        BenchError::Task(err.to_string())
    }
}

/// Result alias for benchmark operations.
pub type BenchResult<T> = Result<T, BenchError>;
