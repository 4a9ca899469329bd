//! Configuration for the benchmark suite

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::{BenchError, BenchResult};

/// Suite configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Number of vectors in every sample buffer
    pub array_size: usize,

    /// Seed for the first input buffer
    pub seed_a: u64,

    /// Seed for the second input buffer
    pub seed_b: u64,

    /// Constant used by the scale cases
    pub scale_factor: f32,

    /// Loop count of the first timed pass
    pub initial_loops: u64,

    /// Loop count ceiling; reaching it ends adaptation
    pub max_loops: u64,

    /// A timed pass shorter than this doubles the loop count (seconds)
    pub min_duration_secs: f64,

    /// Pause after each case (milliseconds)
    pub pause_ms: u64,

    /// Pause before the suite starts (milliseconds)
    pub start_delay_ms: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            array_size: 1 << 14,
            seed_a: 42,
            seed_b: 142,
            scale_factor: 42.0,
            initial_loops: 1 << 12,
            max_loops: 1 << 24,
            min_duration_secs: 3.0,
            pause_ms: 1000,
            start_delay_ms: 500,
        }
    }
}

impl BenchConfig {
    /// Load config from TOML file
    pub fn load(path: &Path) -> BenchResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save(&self, path: &Path) -> BenchResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default config location (`<config dir>/vectorperf/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vectorperf").join("config.toml"))
    }

    /// Load from the default location, falling back to defaults when absent
    pub fn load_or_default() -> BenchResult<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> BenchResult<()> {
        if self.array_size == 0 {
            return Err(BenchError::InvalidConfig("array_size must be > 0".into()));
        }
        if self.initial_loops == 0 {
            return Err(BenchError::InvalidConfig("initial_loops must be > 0".into()));
        }
        if self.max_loops < self.initial_loops {
            return Err(BenchError::InvalidConfig(format!(
                "max_loops ({}) is below initial_loops ({})",
                self.max_loops, self.initial_loops
            )));
        }
        if !self.min_duration_secs.is_finite() || self.min_duration_secs < 0.0 {
            return Err(BenchError::InvalidConfig(
                "min_duration_secs must be a non-negative number".into(),
            ));
        }
        if Duration::try_from_secs_f64(self.min_duration_secs).is_err() {
            return Err(BenchError::InvalidConfig(format!(
                "min_duration_secs ({}) is too large",
                self.min_duration_secs
            )));
        }
        if !self.scale_factor.is_finite() {
            return Err(BenchError::InvalidConfig("scale_factor must be finite".into()));
        }
        Ok(())
    }

    /// Saturates instead of panicking on values `validate` would reject.
    pub fn min_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.min_duration_secs.max(0.0)).unwrap_or(Duration::MAX)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BenchConfig::default();
        assert_eq!(config.array_size, 16384);
        assert_eq!(config.initial_loops, 4096);
        assert_eq!(config.max_loops, 1 << 24);
        assert_eq!(config.min_duration(), Duration::from_secs(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = BenchConfig {
            array_size: 128,
            pause_ms: 0,
            ..Default::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: BenchConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: BenchConfig = toml::from_str("pause_ms = 0\nmin_duration_secs = 0.5\n").unwrap();
        assert_eq!(parsed.pause_ms, 0);
        assert_eq!(parsed.min_duration_secs, 0.5);
        assert_eq!(parsed.seed_a, 42);
        assert_eq!(parsed.seed_b, 142);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_loops = BenchConfig { initial_loops: 0, ..Default::default() };
        assert!(matches!(zero_loops.validate(), Err(BenchError::InvalidConfig(_))));

        let low_ceiling = BenchConfig { initial_loops: 64, max_loops: 32, ..Default::default() };
        assert!(low_ceiling.validate().is_err());

        let empty = BenchConfig { array_size: 0, ..Default::default() };
        assert!(empty.validate().is_err());

        let negative = BenchConfig { min_duration_secs: -1.0, ..Default::default() };
        assert!(negative.validate().is_err());

        let huge = BenchConfig { min_duration_secs: 1e20, ..Default::default() };
        assert!(matches!(huge.validate(), Err(BenchError::InvalidConfig(_))));
    }

    #[test]
    fn test_min_duration_saturates() {
        let huge = BenchConfig { min_duration_secs: 1e20, ..Default::default() };
        assert_eq!(huge.min_duration(), Duration::MAX);

        let negative = BenchConfig { min_duration_secs: -1.0, ..Default::default() };
        assert_eq!(negative.min_duration(), Duration::ZERO);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("vectorperf-config-{}", std::process::id()));
        let path = dir.join("config.toml");
        let config = BenchConfig { array_size: 256, ..Default::default() };

        config.save(&path).unwrap();
        let loaded = BenchConfig::load(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
