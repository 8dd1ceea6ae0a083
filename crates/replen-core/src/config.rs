//! Configuration loading and typed config structures for the RepLen demo.
//!
//! The canonical configuration lives in `replen-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure and provides a loader that reads the file; every field has a
//! default matching the original product demo, so a missing file or a
//! partial file both work.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::schedule::{Schedule, ScheduleError};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level demo configuration.
///
/// Mirrors the structure of `replen-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DemoConfig {
    /// Default activation schedule shown by the demo.
    #[serde(default)]
    pub demo: ScheduleDefaults,

    /// Engine timing settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DemoConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&contents)?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Build the validated [`Schedule`] described by the `demo` section.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidConfig`] for out-of-range values --
    /// configuration is validated here, before any run starts, never
    /// silently clamped.
    pub fn demo_schedule(&self) -> Result<Schedule, ScheduleError> {
        Schedule::new(
            Decimal::from(self.demo.amount),
            self.demo.delay_blocks,
            self.demo.smoothing_blocks,
        )
    }
}

/// Default activation schedule parameters.
///
/// These are the slider defaults of the product demo: a $10,000 intent
/// held for 5 blocks and smoothed in over 10.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleDefaults {
    /// Intent size in whole dollars.
    #[serde(default = "default_amount")]
    pub amount: u64,

    /// Number of delay blocks before the ramp starts.
    #[serde(default = "default_delay_blocks")]
    pub delay_blocks: u64,

    /// Number of smoothing blocks the ramp spans.
    #[serde(default = "default_smoothing_blocks")]
    pub smoothing_blocks: u64,
}

impl Default for ScheduleDefaults {
    fn default() -> Self {
        Self {
            amount: default_amount(),
            delay_blocks: default_delay_blocks(),
            smoothing_blocks: default_smoothing_blocks(),
        }
    }
}

/// Engine timing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Real-time milliseconds per activation tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Milliseconds between settlement executor sweeps.
    #[serde(default = "default_settle_interval_ms")]
    pub settle_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            settle_interval_ms: default_settle_interval_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_amount() -> u64 {
    10_000
}

const fn default_delay_blocks() -> u64 {
    5
}

const fn default_smoothing_blocks() -> u64 {
    10
}

const fn default_tick_interval_ms() -> u64 {
    300
}

const fn default_settle_interval_ms() -> u64 {
    5_000
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_demo_sliders() {
        let config = DemoConfig::default();
        assert_eq!(config.demo.amount, 10_000);
        assert_eq!(config.demo.delay_blocks, 5);
        assert_eq!(config.demo.smoothing_blocks, 10);
        assert_eq!(config.engine.tick_interval_ms, 300);
        assert_eq!(config.engine.settle_interval_ms, 5_000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
demo:
  amount: 25000
  delay_blocks: 3
  smoothing_blocks: 20

engine:
  tick_interval_ms: 100
  settle_interval_ms: 2000

logging:
  level: "debug"
"#;

        let config = DemoConfig::parse(yaml).unwrap();
        assert_eq!(config.demo.amount, 25_000);
        assert_eq!(config.demo.delay_blocks, 3);
        assert_eq!(config.demo.smoothing_blocks, 20);
        assert_eq!(config.engine.tick_interval_ms, 100);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "demo:\n  amount: 500\n";
        let config = DemoConfig::parse(yaml).unwrap();

        // The amount is overridden.
        assert_eq!(config.demo.amount, 500);
        // Everything else uses defaults.
        assert_eq!(config.demo.delay_blocks, 5);
        assert_eq!(config.engine.tick_interval_ms, 300);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = DemoConfig::parse("");
        assert!(config.is_ok());
    }

    #[test]
    fn default_schedule_builds() {
        let config = DemoConfig::default();
        let schedule = config.demo_schedule().unwrap();
        assert_eq!(schedule.total_blocks(), 15);
    }

    #[test]
    fn invalid_demo_section_is_rejected_at_schedule_build() {
        let yaml = "demo:\n  smoothing_blocks: 0\n";
        let config = DemoConfig::parse(yaml).unwrap();
        // YAML parsing succeeds; validation happens when the schedule is
        // built, before any run starts.
        assert!(config.demo_schedule().is_err());
    }
}
