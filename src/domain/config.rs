use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for risk analysis output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The number of decimal places used when displaying scores.
    precision: usize,

    /// The default report format.
    pub format: ReportFormat,
}

/// The formats a report can be rendered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable labelled text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("Unknown report format '{other}' (expected text or json)")),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            format: ReportFormat::default(),
        }
    }
}

impl Config {
    /// The largest supported precision.
    pub const MAX_PRECISION: usize = 17;

    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the configuration at `path` if the file exists, otherwise returns
    /// the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be loaded.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the number of decimal places used when displaying scores.
    #[must_use]
    pub const fn precision(&self) -> usize {
        self.precision
    }

    /// Sets the number of decimal places used when displaying scores.
    ///
    /// Values above [`Self::MAX_PRECISION`] are clamped.
    pub fn set_precision(&mut self, precision: usize) {
        self.precision = precision.min(Self::MAX_PRECISION);
    }
}

const fn default_precision() -> usize {
    6
}

/// Errors that can occur when loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        /// The file that was read.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// The file contents are not a valid configuration.
    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        /// The file that was parsed.
        path: PathBuf,
        /// The underlying TOML error.
        source: toml::de::Error,
    },

    /// The configuration could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The file could not be written.
    #[error("Failed to write config file {}: {source}", path.display())]
    Write {
        /// The file that was written.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        /// The number of decimal places used when displaying scores.
        #[serde(default = "default_precision")]
        precision: usize,

        #[serde(default)]
        format: ReportFormat,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 { precision, format } => {
                let mut config = Self {
                    precision: default_precision(),
                    format,
                };
                config.set_precision(precision);
                config
            }
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            precision: config.precision,
            format: config.format,
        }
    }
}
