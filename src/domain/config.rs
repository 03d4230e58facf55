use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// Name of the optional configuration file, looked up in the working
/// directory.
pub const CONFIG_FILE: &str = "roster.toml";

/// Colour used for headings in the terminal UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Cyan (default).
    #[default]
    Cyan,
    /// Blue.
    Blue,
    /// Green.
    Green,
    /// Magenta.
    Magenta,
}

impl Theme {
    /// All themes, in menu order.
    pub const ALL: [Self; 4] = [Self::Cyan, Self::Blue, Self::Green, Self::Magenta];
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cyan => "Cyan",
            Self::Blue => "Blue",
            Self::Green => "Green",
            Self::Magenta => "Magenta",
        })
    }
}

/// Errors reading or writing the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("failed to access config file {}: {source}", path.display())]
    Io {
        /// The config file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file is not valid configuration.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Application settings.
///
/// Every field has a default, so an absent or empty file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Where the roster is saved and loaded.
    data_file: PathBuf,

    /// Where the CSV export is written.
    export_file: PathBuf,

    /// Initial heading colour.
    pub theme: Theme,

    /// Minimum log level (`error`, `warn`, `info`, `debug` or `trace`).
    log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            export_file: default_export_file(),
            theme: Theme::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads the configuration, falling back to defaults if the file is
    /// missing or invalid.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config: {e}");
            Self::default()
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized or the file
    /// cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Path of the JSON data file.
    #[must_use]
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Path of the CSV export.
    #[must_use]
    pub fn export_file(&self) -> &Path {
        &self.export_file
    }

    /// Configured log level, as written.
    #[must_use]
    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from("employees.json")
}

fn default_export_file() -> PathBuf {
    PathBuf::from("employees.csv")
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// The serialized versions of the configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_data_file")]
        data_file: PathBuf,

        #[serde(default = "default_export_file")]
        export_file: PathBuf,

        #[serde(default)]
        theme: Theme,

        #[serde(default = "default_log_level")]
        log_level: String,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                data_file,
                export_file,
                theme,
                log_level,
            } => Self {
                data_file,
                export_file,
                theme,
                log_level,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            data_file: config.data_file,
            export_file: config.export_file,
            theme: config.theme,
            log_level: config.log_level,
        }
    }
}
