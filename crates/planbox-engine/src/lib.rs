//! Date-recurrence and range-revision engine.
//!
//! ## Summary
//! Pure computations over calendar dates used by the planner service:
//! - [`range::DateRange`]: inclusive, restartable date sequences.
//! - [`rule::RepetitionRule`]: recurrence kinds with their wire and storage
//!   forms and field-scoped validation.
//! - [`generate::generate`]: expands a rule over a window.
//! - [`revision::revise`]: classifies dates when a window changes.
//! - [`calendar::build_calendar`]: per-date plan/checkbox aggregation.
//!
//! Nothing here performs I/O or holds shared state.

pub mod calendar;
pub mod error;
pub mod generate;
pub mod range;
pub mod revision;
pub mod rule;

pub use calendar::{Calendar, CalendarSource, PlanDay, build_calendar};
pub use error::{EngineError, EngineResult};
pub use generate::{Occurrences, generate};
pub use range::DateRange;
pub use revision::{RevisionMap, RevisionTag, revise};
pub use rule::{
    RepetitionRule, RuleOption, RuleRequest, RuleValidationError, RuleValidationErrors,
    StoredRule, ValidationErrorKind, WeekdaySet,
};
