use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Longest settle delay accepted, in milliseconds.
const MAX_SETTLE_DELAY_MS: u64 = 10_000;

/// Longest trigger delay accepted, in milliseconds.
const MAX_TRIGGER_DELAY_MS: u64 = 60_000;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Chain store path cannot be empty")]
    EmptyStorePath,

    #[error("Player state path cannot be empty")]
    EmptyStatePath,

    #[error("Invalid settle_delay_ms: {0}. Must be at most {MAX_SETTLE_DELAY_MS}")]
    InvalidSettleDelay(u64),

    #[error("Invalid trigger_delay_ms: {0}. Must be at most {MAX_TRIGGER_DELAY_MS}")]
    InvalidTriggerDelay(u64),

    #[error("Invalid ready_poll_ms: {0}. Must be at least 1")]
    InvalidReadyPoll(u64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .chained-songs/config.yaml (project config)
    /// 3. .chained-songs/local.yaml (local overrides, optional)
    /// 4. Environment variables (CHAINED_SONGS_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring environment overrides
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("CHAINED_SONGS_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".chained-songs/config.yaml"))
            .merge(Yaml::file(".chained-songs/local.yaml"))
            .merge(Env::prefixed("CHAINED_SONGS_").split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.store.path.is_empty() {
            return Err(ConfigError::EmptyStorePath);
        }

        if config.player.state_path.is_empty() {
            return Err(ConfigError::EmptyStatePath);
        }

        let enforcement = &config.enforcement;
        if enforcement.settle_delay_ms > MAX_SETTLE_DELAY_MS {
            return Err(ConfigError::InvalidSettleDelay(enforcement.settle_delay_ms));
        }

        if enforcement.trigger_delay_ms > MAX_TRIGGER_DELAY_MS {
            return Err(ConfigError::InvalidTriggerDelay(enforcement.trigger_delay_ms));
        }

        if enforcement.ready_poll_ms == 0 {
            return Err(ConfigError::InvalidReadyPoll(enforcement.ready_poll_ms));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store.path, ".chained-songs/chains.json");
        assert_eq!(config.enforcement.settle_delay_ms, 100);
        assert_eq!(config.enforcement.trigger_delay_ms, 300);
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
store:
  path: /tmp/chains.json
enforcement:
  settle_delay_ms: 250
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.store.path, "/tmp/chains.json");
        assert_eq!(config.enforcement.settle_delay_ms, 250);
        assert_eq!(config.enforcement.trigger_delay_ms, 300);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.player.state_path, ".chained-songs/player.json");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_empty_store_path() {
        let mut config = Config::default();
        config.store.path = String::new();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyStorePath)
        ));
    }

    #[test]
    fn test_validate_settle_delay_too_long() {
        let mut config = Config::default();
        config.enforcement.settle_delay_ms = 60_000;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidSettleDelay(60_000))
        ));
    }

    #[test]
    fn test_validate_zero_ready_poll() {
        let mut config = Config::default();
        config.enforcement.ready_poll_ms = 0;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidReadyPoll(0))
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config) {
            Err(ConfigError::InvalidLogLevel(level)) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogFormat(_))
        ));
    }

    #[test]
    fn test_validate_invalid_rotation() {
        let mut config = Config::default();
        config.logging.rotation = "weekly".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRotation(_))
        ));
    }

    #[test]
    fn test_load_from_file_with_env_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "enforcement:\n  settle_delay_ms: 50\n").unwrap();

        temp_env::with_vars(
            [
                ("CHAINED_SONGS_ENFORCEMENT__TRIGGER_DELAY_MS", Some("0")),
                ("CHAINED_SONGS_LOGGING__LEVEL", Some("warn")),
            ],
            || {
                let config = ConfigLoader::load_from_file(&path).unwrap();
                assert_eq!(config.enforcement.settle_delay_ms, 50);
                assert_eq!(config.enforcement.trigger_delay_ms, 0);
                assert_eq!(config.logging.level, "warn");
            },
        );
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "logging:\n  format: xml\n").unwrap();

        let result = ConfigLoader::load_from_file(&path);
        assert!(result.is_err());
    }
}
