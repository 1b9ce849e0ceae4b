//! Configuration management for the sampling server
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.silicon-sampling/config.toml

use crate::errors::{Result, SamplingError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Log levels accepted in `[logging] level`
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Catalog directory locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub personas_dir: String,
    pub skills_dir: String,
    pub rules_dir: String,
}

/// Identity reported to protocol clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    pub instructions: String,
}

/// Logging defaults, overridden by RUST_LOG and -q/-v
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            personas_dir: "./personas".to_string(),
            skills_dir: "./skills".to_string(),
            rules_dir: "./rules".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "Silicon Sampling Server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            instructions: "Selective persona retrieval for survey simulation. \
                Activate a persona, then request only the modules a question needs."
                .to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SamplingError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| SamplingError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".silicon-sampling").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("personas_dir", &self.paths.personas_dir),
            ("skills_dir", &self.paths.skills_dir),
            ("rules_dir", &self.paths.rules_dir),
        ] {
            if value.trim().is_empty() {
                return Err(SamplingError::ConfigError(format!(
                    "paths.{} must not be empty",
                    key
                )));
            }
        }

        if self.server.name.trim().is_empty() {
            return Err(SamplingError::ConfigError(
                "server.name must not be empty".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(SamplingError::ConfigError(format!(
                "Invalid log level: {} (expected one of: {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &PathBuf) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| SamplingError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SamplingError::ConfigError(format!("Failed to create config dir: {}", e))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SamplingError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    pub fn personas_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.personas_dir)
    }

    pub fn skills_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.skills_dir)
    }

    pub fn rules_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.rules_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.paths.personas_dir, "./personas");
        assert_eq!(config.server.name, "Silicon Sampling Server");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_dir() {
        let mut config = Config::default();
        config.paths.skills_dir = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[paths]\npersonas_dir = \"/data/personas\"\n").unwrap();

        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.paths.personas_dir, "/data/personas");
        assert_eq!(config.paths.rules_dir, "./rules");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.server.name = "Panel A".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unparseable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[paths\n").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert_eq!(err.kind(), "config");
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path("~/.silicon-sampling");
        assert!(!expanded.to_string_lossy().contains('~'));
    }

    #[test]
    fn test_expand_path_without_tilde() {
        let expanded = Config::expand_path("/absolute/path");
        assert_eq!(expanded.to_string_lossy(), "/absolute/path");
    }
}
