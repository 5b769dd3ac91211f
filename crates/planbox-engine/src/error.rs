use chrono::NaiveDate;
use thiserror::Error;

use crate::rule::RuleValidationErrors;

/// Engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid range: end {end} is before start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error(transparent)]
    RuleValidation(#[from] RuleValidationErrors),

    #[error("Corrupt stored rule (option {option}, value {value:?}): {reason}")]
    CorruptStoredRule {
        option: u8,
        value: String,
        reason: &'static str,
    },
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
