use chrono::NaiveDate;
use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    EngineError(#[from] planbox_engine::EngineError),

    #[error(transparent)]
    RuleValidation(#[from] planbox_engine::RuleValidationErrors),

    #[error(transparent)]
    CoreError(#[from] planbox_core::error::CoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Plan starts on {start}, before today ({today})")]
    PlanStartsInPast { start: NaiveDate, today: NaiveDate },

    #[error("Window of {days} days exceeds the limit of {max} days")]
    WindowTooLong { days: usize, max: u32 },
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
