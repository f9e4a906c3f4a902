use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, FileFormat};
use serde::Deserialize;

use crate::constants::{DEFAULT_LOG_LEVEL, DEFAULT_OCCURRENCE_COUNT, DEFAULT_TZID};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub recurrence: RecurrenceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecurrenceConfig {
    /// Cap applied when a rule carries no `count` and the caller passes none.
    pub default_count: u32,
    /// Timezone applied to rules that carry no `tzId`.
    pub default_tz_id: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional `config.toml`.
    /// Environment variables (prefixed `CADENCE__`) take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building, deserializing or validating the configuration fails.
    pub fn load() -> Result<Self> {
        let settings = Self::defaults()?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env
            .add_source(
                config::Environment::with_prefix("CADENCE")
                    .prefix_separator("__")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Builds settings from an inline TOML document layered over the defaults.
    ///
    /// ## Errors
    /// Returns an error if the document is malformed or the result fails validation.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let settings = Self::defaults()?
            .add_source(config::File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize::<Self>()?;

        settings.validate()?;
        Ok(settings)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            .set_default("recurrence.default_count", DEFAULT_OCCURRENCE_COUNT)?
            .set_default("recurrence.default_tz_id", DEFAULT_TZID)?)
    }

    /// ## Summary
    /// Checks invariants the deserializer cannot express.
    ///
    /// ## Errors
    /// Returns `CoreError::ValidationError` for a zero default count and
    /// `CoreError::ConfigError` for blank string settings.
    pub fn validate(&self) -> CoreResult<()> {
        if self.recurrence.default_count == 0 {
            return Err(CoreError::ValidationError(
                "recurrence.default_count must be at least 1".to_string(),
            ));
        }
        if self.recurrence.default_tz_id.trim().is_empty() {
            return Err(CoreError::ConfigError(
                "recurrence.default_tz_id must not be empty".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(CoreError::ConfigError(
                "logging.level must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    tracing::debug!(settings = ?settings, "Configuration loaded");
    Ok(settings)
}
