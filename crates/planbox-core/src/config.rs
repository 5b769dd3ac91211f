use anyhow::Result;
use config::{Config, ConfigBuilder, builder::DefaultState};
use serde::Deserialize;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_LOG_LEVEL, DEFAULT_MAX_SEARCH_DAYS, DEFAULT_MAX_WINDOW_DAYS,
    ENV_PREFIX,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Upper bounds on the windows handed to the engine.
///
/// The engine itself has no cancellation, so callers bound work by bounding
/// window size before invoking it.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LimitsConfig {
    /// Longest plan window, in days, accepted on plan creation or update.
    pub max_window_days: u32,
    /// Longest calendar search window, in days.
    pub max_search_days: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_window_days: DEFAULT_MAX_WINDOW_DAYS,
            max_search_days: DEFAULT_MAX_SEARCH_DAYS,
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional
    /// `planbox.toml` in the working directory.
    ///
    /// Environment variables use the `PLANBOX_` prefix and `__` between
    /// sections, e.g. `PLANBOX_LIMITS__MAX_WINDOW_DAYS=30`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Self::builder_with_defaults()?
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .add_source(config::File::with_name(CONFIG_FILE_NAME).required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Builds settings from the built-in defaults only.
    ///
    /// ## Errors
    /// Returns an error if the defaults fail to deserialize.
    pub fn defaults() -> Result<Self> {
        Ok(Self::builder_with_defaults()?
            .build()?
            .try_deserialize::<Settings>()?)
    }

    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            .set_default("limits.max_window_days", i64::from(DEFAULT_MAX_WINDOW_DAYS))?
            .set_default("limits.max_search_days", i64::from(DEFAULT_MAX_SEARCH_DAYS))?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn defaults_fill_every_section() {
        let settings = Settings::defaults().expect("defaults deserialize");
        assert_eq!(settings.logging.level, DEFAULT_LOG_LEVEL);
        assert_eq!(settings.limits.max_window_days, DEFAULT_MAX_WINDOW_DAYS);
        assert_eq!(settings.limits.max_search_days, DEFAULT_MAX_SEARCH_DAYS);
    }

    #[test_log::test]
    fn limits_default_matches_settings_default() {
        let settings = Settings::defaults().expect("defaults deserialize");
        let limits = LimitsConfig::default();
        assert_eq!(settings.limits.max_window_days, limits.max_window_days);
        assert_eq!(settings.limits.max_search_days, limits.max_search_days);
    }
}
