//! Expansion of a repetition rule into concrete dates.

use std::iter::FusedIterator;

use chrono::NaiveDate;

use crate::range::{DateRange, DateRangeIter};
use crate::rule::RepetitionRule;

/// ## Summary
/// Expands `rule` over `window`.
///
/// Every date of the window is visited in order and kept when
/// [`RepetitionRule::matches`] selects it. The result is lazy and can be
/// traversed any number of times.
#[must_use]
pub fn generate(window: DateRange, rule: &RepetitionRule) -> Occurrences {
    tracing::trace!(%window, %rule, "Expanding repetition rule");
    Occurrences {
        window,
        rule: *rule,
    }
}

/// Dates selected by a rule inside a window, chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrences {
    window: DateRange,
    rule: RepetitionRule,
}

impl Occurrences {
    #[must_use]
    pub const fn window(&self) -> DateRange {
        self.window
    }

    #[must_use]
    pub const fn rule(&self) -> RepetitionRule {
        self.rule
    }

    /// Fresh cursor over the selected dates.
    #[must_use]
    pub fn iter(&self) -> OccurrenceIter {
        OccurrenceIter {
            dates: self.window.iter(),
            window: self.window,
            rule: self.rule,
        }
    }

    /// Whether `date` is one of the occurrences.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.rule.matches(&self.window, date)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<NaiveDate> {
        self.iter().collect()
    }
}

impl IntoIterator for &Occurrences {
    type Item = NaiveDate;
    type IntoIter = OccurrenceIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Occurrences {
    type Item = NaiveDate;
    type IntoIter = OccurrenceIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Cursor over [`Occurrences`].
#[derive(Debug, Clone)]
pub struct OccurrenceIter {
    dates: DateRangeIter,
    window: DateRange,
    rule: RepetitionRule,
}

impl Iterator for OccurrenceIter {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let (window, rule) = (self.window, self.rule);
        self.dates.find(|date| rule.matches(&window, *date))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.dates.size_hint().1)
    }
}

impl DoubleEndedIterator for OccurrenceIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        let (window, rule) = (self.window, self.rule);
        self.dates.rfind(|date| rule.matches(&window, *date))
    }
}

impl FusedIterator for OccurrenceIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleRequest;
    use std::num::NonZeroU32;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
        DateRange::between(start, end).expect("valid range")
    }

    fn rule(option: u8, values: &[&str]) -> RepetitionRule {
        RuleRequest::new(option, values.iter().copied())
            .validate()
            .expect("valid rule")
    }

    #[test_log::test]
    fn daily_yields_every_date() {
        let window = range(date(2023, 7, 18), date(2023, 7, 31));
        let dates = generate(window, &RepetitionRule::Daily).to_vec();
        assert_eq!(dates, window.iter().collect::<Vec<_>>());
        assert_eq!(dates.len(), 14);
    }

    #[test_log::test]
    fn interval_of_two_over_two_weeks() {
        let window = range(date(2023, 7, 18), date(2023, 7, 31));
        let dates = generate(window, &rule(2, &["2"])).to_vec();
        assert_eq!(
            dates,
            vec![
                date(2023, 7, 18),
                date(2023, 7, 20),
                date(2023, 7, 22),
                date(2023, 7, 24),
                date(2023, 7, 26),
                date(2023, 7, 28),
                date(2023, 7, 30),
            ]
        );
    }

    #[test_log::test]
    fn mon_wed_fri_over_two_weeks() {
        let window = range(date(2023, 7, 18), date(2023, 7, 31));
        let dates = generate(window, &rule(3, &["MON", "WED", "FRI"])).to_vec();
        assert_eq!(
            dates,
            vec![
                date(2023, 7, 19),
                date(2023, 7, 21),
                date(2023, 7, 24),
                date(2023, 7, 26),
                date(2023, 7, 28),
                date(2023, 7, 31),
            ]
        );
    }

    #[test]
    fn single_tuesday_with_mon_wed_fri_is_empty() {
        let window = DateRange::day(date(2023, 7, 18));
        let occurrences = generate(window, &rule(3, &["MON", "WED", "FRI"]));
        assert_eq!(occurrences.count(), 0);
        assert_eq!(occurrences.iter().next(), None);
    }

    #[test]
    fn single_day_with_daily_or_interval_yields_that_day() {
        let window = DateRange::day(date(2023, 7, 18));
        assert_eq!(
            generate(window, &RepetitionRule::Daily).to_vec(),
            vec![date(2023, 7, 18)]
        );
        let weekly = RepetitionRule::Interval(NonZeroU32::new(7).expect("non-zero"));
        assert_eq!(generate(window, &weekly).to_vec(), vec![date(2023, 7, 18)]);
    }

    #[test]
    fn interval_longer_than_window_yields_start_only() {
        let window = range(date(2023, 7, 18), date(2023, 7, 20));
        assert_eq!(
            generate(window, &rule(2, &["30"])).to_vec(),
            vec![date(2023, 7, 18)]
        );
    }

    #[test]
    fn occurrences_are_restartable_and_reversible() {
        let window = range(date(2023, 7, 18), date(2023, 7, 31));
        let occurrences = generate(window, &rule(2, &["5"]));
        let forward: Vec<_> = occurrences.iter().collect();
        let again: Vec<_> = (&occurrences).into_iter().collect();
        let mut backward: Vec<_> = occurrences.iter().rev().collect();
        backward.reverse();
        assert_eq!(forward, vec![date(2023, 7, 18), date(2023, 7, 23), date(2023, 7, 28)]);
        assert_eq!(forward, again);
        assert_eq!(forward, backward);
        assert!(occurrences.contains(date(2023, 7, 23)));
        assert!(!occurrences.contains(date(2023, 7, 24)));
    }
}
