//! Flattened storage form of a repetition rule.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::weekday::WeekdaySet;
use super::{RepetitionRule, RuleOption};
use crate::error::{EngineError, EngineResult};

/// Stored value of a daily rule, which has no parameters.
pub const DAILY_SENTINEL: &str = "-1";

/// ## Summary
/// Repetition rule as persisted alongside its group: option code plus one
/// string.
///
/// - daily: `"-1"`
/// - interval: the step in decimal, e.g. `"2"`
/// - weekdays: seven `'0'`/`'1'` flags, Monday first, e.g. `"1010100"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRule {
    pub rep_option: u8,
    pub rep_value: String,
}

impl RepetitionRule {
    /// Flattens the rule for storage.
    #[must_use]
    pub fn to_storage(&self) -> StoredRule {
        let rep_value = match self {
            Self::Daily => DAILY_SENTINEL.to_owned(),
            Self::Interval(step) => step.to_string(),
            Self::Weekdays(days) => days.to_bits(),
        };
        StoredRule {
            rep_option: self.option().code(),
            rep_value,
        }
    }
}

impl StoredRule {
    /// ## Summary
    /// Restores the rule flattened by [`RepetitionRule::to_storage`].
    ///
    /// Weekdays come back in canonical order whatever order they were first
    /// given in.
    ///
    /// ## Errors
    /// Returns [`EngineError::CorruptStoredRule`] if the option code is
    /// unknown or the value does not have the shape the option requires.
    pub fn to_rule(&self) -> EngineResult<RepetitionRule> {
        let Some(option) = RuleOption::from_code(self.rep_option) else {
            return Err(self.corrupt("unknown option code"));
        };
        match option {
            RuleOption::Daily if self.rep_value == DAILY_SENTINEL => Ok(RepetitionRule::Daily),
            RuleOption::Daily => Err(self.corrupt("daily rule must store the -1 sentinel")),
            RuleOption::Interval => self
                .rep_value
                .parse::<NonZeroU32>()
                .map(RepetitionRule::Interval)
                .map_err(|_err| self.corrupt("interval must be a positive integer")),
            RuleOption::Weekdays => match WeekdaySet::from_bits(&self.rep_value) {
                Some(days) if !days.is_empty() => Ok(RepetitionRule::Weekdays(days)),
                Some(_) => Err(self.corrupt("weekday flags select no day")),
                None => Err(self.corrupt("weekday flags must be seven 0/1 characters")),
            },
        }
    }

    fn corrupt(&self, reason: &'static str) -> EngineError {
        tracing::warn!(
            rep_option = self.rep_option,
            rep_value = %self.rep_value,
            reason,
            "Stored repetition rule is corrupt"
        );
        EngineError::CorruptStoredRule {
            option: self.rep_option,
            value: self.rep_value.clone(),
            reason,
        }
    }
}

impl From<&RepetitionRule> for StoredRule {
    fn from(rule: &RepetitionRule) -> Self {
        rule.to_storage()
    }
}

impl TryFrom<&StoredRule> for RepetitionRule {
    type Error = EngineError;

    fn try_from(stored: &StoredRule) -> Result<Self, Self::Error> {
        stored.to_rule()
    }
}
