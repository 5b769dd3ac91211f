pub mod calendar;
pub mod generate;
pub mod revise;

use std::io::Write as _;

use anyhow::{Context as _, Result};
use planbox_engine::DateRange;
use planbox_service::ServiceError;
use serde::Serialize;

/// Writes `value` to stdout as pretty JSON followed by a newline.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).context("Failed to write JSON output")?;
    writeln!(out).context("Failed to write JSON output")?;
    Ok(())
}

/// ## Errors
/// Returns [`ServiceError::WindowTooLong`] if `window` spans more than
/// `max_days` days.
pub(crate) fn ensure_within(window: DateRange, max_days: u32) -> Result<()> {
    let days = window.len();
    if usize::try_from(max_days).is_ok_and(|max| days > max) {
        return Err(ServiceError::WindowTooLong {
            days,
            max: max_days,
        }
        .into());
    }
    Ok(())
}
