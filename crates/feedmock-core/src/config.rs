//! Configuration loading and typed config structures for feedmock.
//!
//! The configuration lives in `feedmock-config.yaml` next to the binary's
//! working directory. Every field has a default, so an absent file or a
//! partial one is fine. The `PORT` environment variable overrides
//! `server.port`, matching how the example front-ends point at the
//! backend.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::FeedError;
use crate::pacing::{DEFAULT_MAX_DELAY_MS, DEFAULT_MIN_DELAY_MS, PacingWindow};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "feedmock-config.yaml";

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

    /// The configuration parsed but holds unusable values.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

impl From<FeedError> for ConfigError {
    fn from(err: FeedError) -> Self {
        Self::Invalid(err.to_string())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeedmockConfig {
    /// HTTP listener and static assets.
    #[serde(default)]
    pub server: ServerSection,

    /// Live feed pacing and queueing.
    #[serde(default)]
    pub feed: FeedSection,

    /// Synthetic animal batch sizes.
    #[serde(default)]
    pub animals: AnimalsSection,

    /// Where fixtures come from.
    #[serde(default)]
    pub fixtures: FixturesSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl FeedmockConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `PORT` overrides `server.port` when set to a valid port number.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.server.apply_env_overrides();
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string. Environment
    /// overrides are not applied.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.feed.pacing_window()?;
        if self.feed.queue_capacity == 0 {
            return Err(ConfigError::Invalid(String::from(
                "feed.queue_capacity must be at least 1",
            )));
        }
        if self.animals.small_batch == 0 || self.animals.large_batch == 0 {
            return Err(ConfigError::Invalid(String::from(
                "animals batch sizes must be at least 1",
            )));
        }
        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Optional directory of static assets served for unmatched paths.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl ServerSection {
    /// Apply the `PORT` environment variable, ignoring unparsable values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(raw) = std::env::var("PORT") {
            match raw.parse::<u16>() {
                Ok(port) => self.port = port,
                Err(e) => tracing::warn!(value = %raw, error = %e, "ignoring invalid PORT"),
            }
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

/// Live feed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedSection {
    /// Shortest wait before an emission, in milliseconds.
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    /// Longest wait before an emission, in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Items buffered per connection between scheduler and socket.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl FeedSection {
    /// The configured pacing window.
    pub fn pacing_window(&self) -> Result<PacingWindow, FeedError> {
        PacingWindow::new(self.min_delay_ms, self.max_delay_ms)
    }
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// Animal batch sizes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnimalsSection {
    /// Size of `GET /animals`.
    #[serde(default = "default_small_batch")]
    pub small_batch: usize,

    /// Size of `GET /animals/large`.
    #[serde(default = "default_large_batch")]
    pub large_batch: usize,
}

impl Default for AnimalsSection {
    fn default() -> Self {
        Self {
            small_batch: default_small_batch(),
            large_batch: default_large_batch(),
        }
    }
}

/// Fixture source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FixturesSection {
    /// Directory with replacement fixture files; embedded copies are used
    /// when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSection {
    /// Default filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8001
}

const fn default_min_delay_ms() -> u64 {
    DEFAULT_MIN_DELAY_MS
}

const fn default_max_delay_ms() -> u64 {
    DEFAULT_MAX_DELAY_MS
}

const fn default_queue_capacity() -> usize {
    16
}

const fn default_small_batch() -> usize {
    300
}

const fn default_large_batch() -> usize {
    4000
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = FeedmockConfig::default();
        assert_eq!(config.server.port, 8001);
        assert_eq!(config.feed.min_delay_ms, 1000);
        assert_eq!(config.feed.max_delay_ms, 5000);
        assert_eq!(config.animals.small_batch, 300);
        assert_eq!(config.animals.large_batch, 4000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_yaml_keeps_defaults() {
        let yaml = r"
feed:
  min_delay_ms: 200
  max_delay_ms: 800
animals:
  small_batch: 10
fixtures:
  dir: ./fixtures
";
        let config = FeedmockConfig::parse(yaml).unwrap();
        assert_eq!(config.feed.min_delay_ms, 200);
        assert_eq!(config.feed.max_delay_ms, 800);
        assert_eq!(config.feed.queue_capacity, 16);
        assert_eq!(config.animals.small_batch, 10);
        assert_eq!(config.animals.large_batch, 4000);
        assert_eq!(config.fixtures.dir, Some(PathBuf::from("./fixtures")));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_takes_port_from_yaml_only() {
        let yaml = r"
server:
  host: 127.0.0.1
  port: 9123
";
        let config = FeedmockConfig::parse(yaml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9123);
    }

    #[test]
    fn inverted_pacing_window_is_rejected() {
        let yaml = r"
feed:
  min_delay_ms: 5000
  max_delay_ms: 1000
";
        let err = FeedmockConfig::parse(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_queue_capacity_is_rejected() {
        let mut config = FeedmockConfig::default();
        config.feed.queue_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let err = FeedmockConfig::parse("feed: [not, a, map").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }
}
