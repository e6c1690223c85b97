//! # nh-config
//!
//! Layered settings for the NewsHub binaries. Later layers win:
//!
//! 1. built-in defaults
//! 2. `newshub.toml` in the working directory, when present
//! 3. `NEWSHUB__*` environment variables, `__` separating nested keys
//!    (`NEWSHUB__LOG__FORMAT=json`)
//!
//! A `.env` file is loaded into the environment before layer 3 is read.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

pub const ENV_PREFIX: &str = "NEWSHUB";
pub const CONFIG_FILE: &str = "newshub";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Directory holding one JSON file per collection.
    pub data_dir: PathBuf,
    pub log: LogConfig,
}

impl AppConfig {
    /// A builder carrying only the defaults. Callers add sources or
    /// overrides and hand it to [`AppConfig::from_builder`].
    pub fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("data_dir", "./data")?
            .set_default("log.level", "info")?
            .set_default("log.format", "pretty")?)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Defaults, then `newshub.toml`, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }
        let builder = Self::builder()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            );
        Self::from_builder(builder)
    }
}
