/// Prefix for environment variables read by [`crate::config::Settings::load`].
pub const ENV_PREFIX: &str = "PLANBOX";

/// Optional TOML file read from the working directory.
pub const CONFIG_FILE_NAME: &str = "planbox.toml";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// One leap year of days.
pub const DEFAULT_MAX_WINDOW_DAYS: u32 = 366;

/// Roughly one quarter, enough for a three-month calendar view.
pub const DEFAULT_MAX_SEARCH_DAYS: u32 = 93;
