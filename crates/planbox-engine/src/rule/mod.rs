//! Repetition rules attached to plan groups.
//!
//! ## Summary
//! A [`RepetitionRule`] is one of three recurrence kinds. It crosses two
//! boundaries in flattened form:
//! - the wire form [`RuleRequest`] (`repOption` + list of values), which is
//!   validated into a rule with every failure collected;
//! - the storage form [`StoredRule`] (`repOption` + single string), which
//!   converts loss-free in both directions.

mod request;
mod storage;
mod weekday;

use std::fmt;
use std::num::NonZeroU32;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::range::DateRange;

pub use request::{RuleRequest, RuleValidationError, RuleValidationErrors, ValidationErrorKind};
pub use storage::{DAILY_SENTINEL, StoredRule};
pub use weekday::{CANONICAL_WEEKDAYS, WeekdaySet, parse_weekday_token, weekday_token};

/// Numeric option code shared by the wire and storage forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleOption {
    Daily,
    Interval,
    Weekdays,
}

impl RuleOption {
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Daily => 1,
            Self::Interval => 2,
            Self::Weekdays => 3,
        }
    }

    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Daily),
            2 => Some(Self::Interval),
            3 => Some(Self::Weekdays),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Interval => "interval",
            Self::Weekdays => "weekdays",
        }
    }

    /// Inclusive bounds on the wire value-list length.
    #[must_use]
    pub const fn value_count_bounds(self) -> (usize, usize) {
        match self {
            Self::Daily => (0, 0),
            Self::Interval => (1, 1),
            Self::Weekdays => (1, CANONICAL_WEEKDAYS.len()),
        }
    }
}

impl fmt::Display for RuleOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ## Summary
/// Recurrence rule expanded by [`crate::generate::generate`].
///
/// An interval of zero is unrepresentable; validation is the only way to
/// get a rule from untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "RuleRequest", try_from = "RuleRequest")]
pub enum RepetitionRule {
    /// Every date of the window.
    Daily,
    /// Every `n`th date counted from the window start, start included.
    Interval(NonZeroU32),
    /// Dates whose weekday is in the set.
    Weekdays(WeekdaySet),
}

impl RepetitionRule {
    #[must_use]
    pub const fn option(&self) -> RuleOption {
        match self {
            Self::Daily => RuleOption::Daily,
            Self::Interval(_) => RuleOption::Interval,
            Self::Weekdays(_) => RuleOption::Weekdays,
        }
    }

    /// ## Summary
    /// Whether `date` carries a task instance inside `window`.
    ///
    /// Dates outside the window never match. `Interval` offsets are counted
    /// from `window.start()`.
    #[must_use]
    pub fn matches(&self, window: &DateRange, date: NaiveDate) -> bool {
        let Some(offset) = window.offset_of(date) else {
            return false;
        };
        match self {
            Self::Daily => true,
            Self::Interval(step) => offset % u64::from(step.get()) == 0,
            Self::Weekdays(days) => days.contains(date.weekday()),
        }
    }

    /// Wire form, weekday tokens in canonical order.
    #[must_use]
    pub fn to_request(&self) -> RuleRequest {
        let rep_value = match self {
            Self::Daily => Vec::new(),
            Self::Interval(step) => vec![step.to_string()],
            Self::Weekdays(days) => days.iter().map(|day| weekday_token(day).to_owned()).collect(),
        };
        RuleRequest {
            rep_option: self.option().code(),
            rep_value,
        }
    }
}

impl fmt::Display for RepetitionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => f.write_str("daily"),
            Self::Interval(step) => write!(f, "every {step} days"),
            Self::Weekdays(days) => write!(f, "weekly on {days}"),
        }
    }
}

impl From<RepetitionRule> for RuleRequest {
    fn from(rule: RepetitionRule) -> Self {
        rule.to_request()
    }
}

impl TryFrom<RuleRequest> for RepetitionRule {
    type Error = RuleValidationErrors;

    fn try_from(request: RuleRequest) -> Result<Self, Self::Error> {
        request.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn window() -> DateRange {
        DateRange::between(date(2023, 7, 18), date(2023, 7, 31)).expect("valid range")
    }

    #[test]
    fn option_codes_round_trip() {
        for option in [RuleOption::Daily, RuleOption::Interval, RuleOption::Weekdays] {
            assert_eq!(RuleOption::from_code(option.code()), Some(option));
        }
        assert_eq!(RuleOption::from_code(0), None);
        assert_eq!(RuleOption::from_code(4), None);
    }

    #[test]
    fn interval_counts_from_window_start() {
        let rule = RepetitionRule::Interval(NonZeroU32::new(3).expect("non-zero"));
        assert!(rule.matches(&window(), date(2023, 7, 18)));
        assert!(!rule.matches(&window(), date(2023, 7, 19)));
        assert!(rule.matches(&window(), date(2023, 7, 21)));
        assert!(!rule.matches(&window(), date(2023, 7, 15)));
    }

    #[test]
    fn dates_outside_window_never_match() {
        assert!(!RepetitionRule::Daily.matches(&window(), date(2023, 8, 1)));
        assert!(!RepetitionRule::Daily.matches(&window(), date(2023, 7, 17)));
    }

    #[test]
    fn weekdays_match_by_day_of_week() {
        let rule = RepetitionRule::Weekdays([Weekday::Tue].into_iter().collect());
        // 2023-07-18 is a Tuesday
        assert!(rule.matches(&window(), date(2023, 7, 18)));
        assert!(rule.matches(&window(), date(2023, 7, 25)));
        assert!(!rule.matches(&window(), date(2023, 7, 19)));
    }

    #[test]
    fn to_request_uses_canonical_token_order() {
        let rule = RepetitionRule::Weekdays(
            [Weekday::Fri, Weekday::Mon, Weekday::Wed].into_iter().collect(),
        );
        let request = rule.to_request();
        assert_eq!(request.rep_option, 3);
        assert_eq!(request.rep_value, vec!["MON", "WED", "FRI"]);
        assert_eq!(request.validate(), Ok(rule));
    }

    #[test]
    fn serde_goes_through_wire_form() {
        let rule: RepetitionRule =
            serde_json::from_str(r#"{"repOption":2,"repValue":["4"]}"#).expect("valid rule");
        assert_eq!(rule, RepetitionRule::Interval(NonZeroU32::new(4).expect("non-zero")));
        assert_eq!(
            serde_json::to_string(&rule).expect("serializes"),
            r#"{"repOption":2,"repValue":["4"]}"#
        );

        let invalid = serde_json::from_str::<RepetitionRule>(r#"{"repOption":2,"repValue":["0"]}"#);
        assert!(invalid.is_err());
    }

    #[test]
    fn display_describes_rule() {
        assert_eq!(RepetitionRule::Daily.to_string(), "daily");
        assert_eq!(
            RepetitionRule::Interval(NonZeroU32::new(2).expect("non-zero")).to_string(),
            "every 2 days"
        );
        assert_eq!(
            RepetitionRule::Weekdays([Weekday::Mon].into_iter().collect()).to_string(),
            "weekly on MON"
        );
    }
}
