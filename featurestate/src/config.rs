//! Configuration module for the state runner
//!
//! Loads the state document (logging, run options and declared feature
//! states) from a TOML file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Runner configuration and declared states
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Run settings
    #[serde(default)]
    pub run: RunConfig,

    /// Feature states, applied in document order
    #[serde(default, rename = "feature")]
    pub features: Vec<FeatureState>,

    /// Where this configuration came from
    #[serde(skip)]
    pub source: ConfigSource,
}

/// Origin of a loaded configuration, logged once tracing is up
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in defaults, no file involved
    #[default]
    Defaults,
    /// The file did not exist, so defaults were used
    Missing(PathBuf),
    /// Read from this file
    File(PathBuf),
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level filter (default: "featurestate=info,winfeature=info")
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Run configuration
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Dry-run: report what would change without changing anything
    #[serde(default)]
    pub test: bool,
}

/// One declared feature state
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FeatureState {
    /// State id used in output (default: the feature name)
    #[serde(default)]
    pub id: Option<String>,

    /// Short feature name, e.g. `Web-Server`
    pub name: String,

    pub ensure: EnsureKind,

    /// Install sub-features too (`installed` only)
    #[serde(default)]
    pub recurse: Option<bool>,

    /// Rerun the install to pick up missing sub-features (`installed` only)
    #[serde(default)]
    pub force: Option<bool>,
}

/// Value of the `ensure` key
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnsureKind {
    Installed,
    Removed,
}

/// Desired state of a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ensure {
    Installed { recurse: bool, force: bool },
    Removed,
}

impl FeatureState {
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    pub fn ensure(&self) -> Ensure {
        match self.ensure {
            EnsureKind::Installed => Ensure::Installed {
                recurse: self.recurse.unwrap_or(false),
                force: self.force.unwrap_or(false),
            },
            EnsureKind::Removed => Ensure::Removed,
        }
    }

    /// Rejects options that have no meaning for the chosen `ensure`
    fn validate(&self) -> Result<(), String> {
        if self.ensure == EnsureKind::Removed {
            for (key, value) in [("recurse", self.recurse), ("force", self.force)] {
                if value.is_some() {
                    return Err(format!(
                        "feature '{}': '{}' is only valid with ensure = \"installed\"",
                        self.id(),
                        key
                    ));
                }
            }
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "featurestate=info,winfeature=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self {
                source: ConfigSource::Missing(path.to_path_buf()),
                ..Self::default()
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let mut config = Self::parse(&content).map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })?;
        config.source = ConfigSource::File(path.to_path_buf());
        Ok(config)
    }

    /// Parse and validate a state document
    pub fn parse(content: &str) -> Result<Self, String> {
        let config: Config = toml::from_str(content).map_err(|e| e.to_string())?;
        for state in &config.features {
            state.validate()?;
        }
        Ok(config)
    }

    /// Log where the configuration came from; call after tracing is initialized
    pub fn log_source(&self) {
        match &self.source {
            ConfigSource::Defaults => tracing::debug!("Using default configuration"),
            ConfigSource::Missing(path) => {
                tracing::info!("Config file not found at {:?}, using defaults", path)
            }
            ConfigSource::File(path) => tracing::info!("Loaded configuration from {:?}", path),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {message}")]
    Parse { path: String, message: String },
}
