//! Application configuration
//!
//! Read from an optional TOML file and `GUDLFT__` prefixed environment variables, e.g.
//! `GUDLFT__DATA__CLUBS_FILE=/srv/clubs.json`. Every field has a default.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Location of the JSON data files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_clubs_file")]
    pub clubs_file: String,
    #[serde(default = "default_competitions_file")]
    pub competitions_file: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: `"trace"`, `"debug"`, `"info"`, `"warn"`, `"error"`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Log format: `"json"` or `"pretty"`.
    #[serde(default = "default_format")]
    pub format: String,
}

impl AppConfig {
    /// Merge the configuration file, if it exists, with the environment
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("GUDLFT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            clubs_file: default_clubs_file(),
            competitions_file: default_competitions_file(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

fn default_clubs_file() -> String {
    "data/clubs.json".to_string()
}

fn default_competitions_file() -> String {
    "data/competitions.json".to_string()
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}
