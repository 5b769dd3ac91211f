//! Tracing subscriber bootstrap shared by the binaries.

use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

use crate::error::{CoreError, CoreResult};

/// Handle to the installed filter, used to swap in the configured level once
/// settings have been loaded.
pub struct LogFilterHandle {
    handle: reload::Handle<EnvFilter, Registry>,
}

/// ## Summary
/// Installs the global tracing subscriber with `initial_level` as its filter.
///
/// The filter is reloadable so the level from [`crate::config::Settings`] can
/// replace the bootstrap level later.
///
/// ## Errors
/// Returns an error if `initial_level` is not a valid filter directive or a
/// global subscriber is already installed.
pub fn init_tracing(initial_level: &str) -> CoreResult<LogFilterHandle> {
    let filter = EnvFilter::try_new(initial_level)
        .map_err(|err| CoreError::LoggingError(format!("invalid filter `{initial_level}`: {err}")))?;
    let (filter_layer, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|err| CoreError::LoggingError(err.to_string()))?;

    Ok(LogFilterHandle { handle })
}

impl LogFilterHandle {
    /// ## Summary
    /// Replaces the active filter with `level`.
    ///
    /// An invalid level keeps the current filter and logs a warning; it never
    /// aborts startup.
    pub fn apply_level(&self, level: &str) {
        let Ok(filter) = EnvFilter::try_new(level) else {
            tracing::warn!(level = %level, "Invalid log level in config, keeping current filter");
            return;
        };
        if let Err(e) = self.handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    }
}
