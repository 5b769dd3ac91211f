//! Wire form of a repetition rule and its validation.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::weekday::{WeekdaySet, parse_weekday_token};
use super::{RepetitionRule, RuleOption};

const OPTION_FIELD: &str = "repOption";
const VALUE_FIELD: &str = "repValue";

/// ## Summary
/// Repetition rule as received from clients: an option code plus a
/// kind-specific value list.
///
/// | `repOption` | `repValue`                              |
/// |-------------|-----------------------------------------|
/// | 1 (daily)   | empty                                   |
/// | 2 (interval)| one positive integer, e.g. `["2"]`      |
/// | 3 (weekdays)| 1 to 7 distinct tokens, e.g. `["MON"]`  |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRequest {
    pub rep_option: u8,
    #[serde(default)]
    pub rep_value: Vec<String>,
}

/// What went wrong with one field of a [`RuleRequest`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    #[error("unknown repetition option {0}; expected 1 (daily), 2 (interval) or 3 (weekdays)")]
    UnknownOption(u8),

    #[error("{option} rule takes {expected} value(s), got {actual}")]
    WrongValueCount {
        option: RuleOption,
        expected: String,
        actual: usize,
    },

    #[error("`{0}` is not a positive integer")]
    NotPositiveInteger(String),

    #[error("`{0}` is not a weekday")]
    UnknownWeekday(String),

    #[error("weekday `{0}` is listed more than once")]
    DuplicateWeekday(String),
}

/// A single field-scoped validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {kind}")]
pub struct RuleValidationError {
    /// `repOption`, `repValue`, or `repValue[i]` for a single entry.
    pub field: String,
    pub kind: ValidationErrorKind,
}

impl RuleValidationError {
    fn new(field: impl Into<String>, kind: ValidationErrorKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }

    fn at_value(index: usize, kind: ValidationErrorKind) -> Self {
        Self::new(format!("{VALUE_FIELD}[{index}]"), kind)
    }
}

/// Every failure found in one [`RuleRequest`]. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleValidationErrors(Vec<RuleValidationError>);

impl RuleValidationErrors {
    #[must_use]
    pub fn errors(&self) -> &[RuleValidationError] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for errors produced by [`RuleRequest::validate`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RuleValidationError> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<RuleValidationError> {
        self.0
    }
}

impl fmt::Display for RuleValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid repetition rule: ")?;
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RuleValidationErrors {}

impl<'a> IntoIterator for &'a RuleValidationErrors {
    type Item = &'a RuleValidationError;
    type IntoIter = std::slice::Iter<'a, RuleValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl RuleRequest {
    #[must_use]
    pub fn new<I, S>(rep_option: u8, rep_value: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rep_option,
            rep_value: rep_value.into_iter().map(Into::into).collect(),
        }
    }

    /// ## Summary
    /// Validates the request into a [`RepetitionRule`].
    ///
    /// Every applicable check runs: value-list length for the option,
    /// per-value integer parsing for intervals, per-token weekday parsing
    /// and duplicate detection for weekday sets.
    ///
    /// ## Errors
    /// Returns all failures found. An unknown option code is reported alone
    /// since the value checks depend on it.
    pub fn validate(&self) -> Result<RepetitionRule, RuleValidationErrors> {
        let Some(option) = RuleOption::from_code(self.rep_option) else {
            tracing::debug!(rep_option = self.rep_option, "Unknown repetition option");
            return Err(RuleValidationErrors(vec![RuleValidationError::new(
                OPTION_FIELD,
                ValidationErrorKind::UnknownOption(self.rep_option),
            )]));
        };

        let mut errors = Vec::new();
        if let Some(error) = self.check_value_count(option) {
            errors.push(error);
        }

        let rule = match option {
            RuleOption::Daily => Some(RepetitionRule::Daily),
            RuleOption::Interval => self.parse_interval(&mut errors).map(RepetitionRule::Interval),
            RuleOption::Weekdays => Some(RepetitionRule::Weekdays(self.parse_weekdays(&mut errors))),
        };

        match rule {
            Some(rule) if errors.is_empty() => Ok(rule),
            _ => {
                tracing::debug!(
                    rep_option = self.rep_option,
                    error_count = errors.len(),
                    "Repetition rule rejected"
                );
                Err(RuleValidationErrors(errors))
            }
        }
    }

    fn check_value_count(&self, option: RuleOption) -> Option<RuleValidationError> {
        let (min, max) = option.value_count_bounds();
        let actual = self.rep_value.len();
        if (min..=max).contains(&actual) {
            return None;
        }
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{min} to {max}")
        };
        Some(RuleValidationError::new(
            VALUE_FIELD,
            ValidationErrorKind::WrongValueCount {
                option,
                expected,
                actual,
            },
        ))
    }

    /// Checks every value; yields the step only when exactly one valid value
    /// was given.
    fn parse_interval(&self, errors: &mut Vec<RuleValidationError>) -> Option<NonZeroU32> {
        let mut steps = Vec::with_capacity(self.rep_value.len());
        for (index, value) in self.rep_value.iter().enumerate() {
            match value.trim().parse::<NonZeroU32>() {
                Ok(step) => steps.push(step),
                Err(_) => errors.push(RuleValidationError::at_value(
                    index,
                    ValidationErrorKind::NotPositiveInteger(value.clone()),
                )),
            }
        }
        match steps.as_slice() {
            [step] => Some(*step),
            _ => None,
        }
    }

    fn parse_weekdays(&self, errors: &mut Vec<RuleValidationError>) -> WeekdaySet {
        let mut days = WeekdaySet::new();
        for (index, token) in self.rep_value.iter().enumerate() {
            match parse_weekday_token(token) {
                None => errors.push(RuleValidationError::at_value(
                    index,
                    ValidationErrorKind::UnknownWeekday(token.clone()),
                )),
                Some(day) if !days.insert(day) => errors.push(RuleValidationError::at_value(
                    index,
                    ValidationErrorKind::DuplicateWeekday(token.clone()),
                )),
                Some(_) => {}
            }
        }
        days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn kinds(errors: &RuleValidationErrors) -> Vec<(&str, &ValidationErrorKind)> {
        errors
            .iter()
            .map(|error| (error.field.as_str(), &error.kind))
            .collect()
    }

    #[test]
    fn daily_with_no_values_is_valid() {
        let rule = RuleRequest::new(1, Vec::<String>::new())
            .validate()
            .expect("valid daily");
        assert_eq!(rule, RepetitionRule::Daily);
    }

    #[test]
    fn daily_with_values_is_rejected() {
        let errors = RuleRequest::new(1, ["1"]).validate().expect_err("daily takes no values");
        assert_eq!(
            kinds(&errors),
            vec![(
                "repValue",
                &ValidationErrorKind::WrongValueCount {
                    option: RuleOption::Daily,
                    expected: "0".to_string(),
                    actual: 1,
                }
            )]
        );
    }

    #[test]
    fn interval_accepts_one_positive_integer() {
        let rule = RuleRequest::new(2, ["2"]).validate().expect("valid interval");
        assert_eq!(rule, RepetitionRule::Interval(NonZeroU32::new(2).expect("non-zero")));
    }

    #[test]
    fn interval_rejects_zero_negative_and_text() {
        for value in ["0", "-3", "two", "", "1.5"] {
            let errors = RuleRequest::new(2, [value])
                .validate()
                .expect_err("not a positive integer");
            assert_eq!(
                kinds(&errors),
                vec![(
                    "repValue[0]",
                    &ValidationErrorKind::NotPositiveInteger(value.to_string())
                )],
                "value {value:?}"
            );
        }
    }

    #[test]
    fn interval_collects_count_and_value_failures_together() {
        let errors = RuleRequest::new(2, ["3", "x"])
            .validate()
            .expect_err("two values");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.errors()[0].field, "repValue");
        assert!(matches!(
            errors.errors()[0].kind,
            ValidationErrorKind::WrongValueCount { actual: 2, .. }
        ));
        assert_eq!(errors.errors()[1].field, "repValue[1]");
    }

    #[test]
    fn interval_without_value_is_rejected() {
        let errors = RuleRequest::new(2, Vec::<String>::new())
            .validate()
            .expect_err("missing value");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].field, "repValue");
    }

    #[test]
    fn weekdays_accept_distinct_tokens() {
        let rule = RuleRequest::new(3, ["WED", "mon", "Friday"])
            .validate()
            .expect("valid weekdays");
        assert_eq!(
            rule,
            RepetitionRule::Weekdays(
                [Weekday::Mon, Weekday::Wed, Weekday::Fri].into_iter().collect()
            )
        );
    }

    #[test]
    fn weekdays_report_every_bad_token() {
        let errors = RuleRequest::new(3, ["MON", "XYZ", "MON", "TUE", "???"])
            .validate()
            .expect_err("bad tokens");
        assert_eq!(
            kinds(&errors),
            vec![
                (
                    "repValue[1]",
                    &ValidationErrorKind::UnknownWeekday("XYZ".to_string())
                ),
                (
                    "repValue[2]",
                    &ValidationErrorKind::DuplicateWeekday("MON".to_string())
                ),
                (
                    "repValue[4]",
                    &ValidationErrorKind::UnknownWeekday("???".to_string())
                ),
            ]
        );
    }

    #[test]
    fn weekdays_reject_empty_and_oversized_lists() {
        let empty = RuleRequest::new(3, Vec::<String>::new())
            .validate()
            .expect_err("empty set");
        assert_eq!(empty.len(), 1);

        let eight = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN", "MON"];
        let errors = RuleRequest::new(3, eight).validate().expect_err("eight values");
        assert_eq!(
            kinds(&errors),
            vec![
                (
                    "repValue",
                    &ValidationErrorKind::WrongValueCount {
                        option: RuleOption::Weekdays,
                        expected: "1 to 7".to_string(),
                        actual: 8,
                    }
                ),
                (
                    "repValue[7]",
                    &ValidationErrorKind::DuplicateWeekday("MON".to_string())
                ),
            ]
        );
    }

    #[test]
    fn unknown_option_is_reported_on_option_field() {
        let errors = RuleRequest::new(9, ["1"]).validate().expect_err("bad option");
        assert_eq!(
            kinds(&errors),
            vec![("repOption", &ValidationErrorKind::UnknownOption(9))]
        );
    }

    #[test]
    fn error_display_lists_every_failure() {
        let errors = RuleRequest::new(3, ["NOPE", "NOPE2"])
            .validate()
            .expect_err("bad tokens");
        assert_eq!(
            errors.to_string(),
            "invalid repetition rule: repValue[0]: `NOPE` is not a weekday; \
             repValue[1]: `NOPE2` is not a weekday"
        );
    }

    #[test]
    fn missing_value_list_deserializes_as_empty() {
        let request: RuleRequest = serde_json::from_str(r#"{"repOption":1}"#).expect("parses");
        assert!(request.rep_value.is_empty());
        assert_eq!(request.validate(), Ok(RepetitionRule::Daily));
    }
}
