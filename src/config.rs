//! Runtime settings, read from an optional TOML file and `CONVOFLOW__*`
//! environment variables.
//!
//! `CONVOFLOW__VALIDATION__REFERENCE_CHECKS=true` sets
//! `validation.reference_checks`; environment values override the file.

use crate::error::ConfigError;
use crate::schema::Validator;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub validation: ValidationSettings,
    #[serde(default)]
    pub store: StoreSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingSettings {
    /// A level name or a full `RUST_LOG`-style filter.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ValidationSettings {
    #[serde(default)]
    pub reference_checks: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoreSettings {
    /// Directory holding one `<flow id>.json` per flow.
    #[serde(default = "default_store_dir")]
    pub dir: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
        }
    }
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("flows")
}

impl Settings {
    /// Loads `.env` if present, then `file` if given, then the environment.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings: Settings = builder
            .add_source(
                config::Environment::with_prefix("CONVOFLOW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Parses settings from TOML text alone.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.trim();
        if level.is_empty() {
            return Err(ConfigError::InvalidLogLevel(self.logging.level.clone()));
        }
        // Filters with targets, like `convoflow=debug`, are left to the subscriber.
        if !level.contains('=') && !level.contains(',') {
            self.log_level()?;
        }
        Ok(())
    }

    /// The log level, when `logging.level` names a single level.
    pub fn log_level(&self) -> Result<Level, ConfigError> {
        self.logging
            .level
            .trim()
            .parse::<Level>()
            .map_err(|_| ConfigError::InvalidLogLevel(self.logging.level.clone()))
    }

    /// The validator these settings describe, for caller input.
    pub fn validator(&self) -> Validator {
        Validator::builder()
            .with_reference_checks(self.validation.reference_checks)
            .build()
    }
}
