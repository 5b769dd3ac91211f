//! Shared building blocks for the planbox crates: errors, settings and
//! logging bootstrap.

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
