//! Inclusive calendar date ranges.

use std::iter::FusedIterator;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// ## Summary
/// A closed interval of calendar dates, `start <= end`.
///
/// The only way to build one is [`DateRange::between`], so every value in
/// circulation is valid. Iteration is restartable: [`DateRange::iter`] hands
/// out a fresh cursor each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = EngineError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        Self::between(raw.start, raw.end)
    }
}

impl DateRange {
    /// ## Summary
    /// Builds the range of every date from `start` to `end`, both inclusive.
    ///
    /// ## Errors
    /// Returns [`EngineError::InvalidRange`] if `end < start`. The bounds are
    /// never swapped.
    pub fn between(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        if end < start {
            return Err(EngineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Single-day range.
    #[must_use]
    pub const fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Days from `start` to `end`; zero for a single-day range.
    #[must_use]
    pub fn span_days(&self) -> u64 {
        days_between(self.start, self.end)
    }

    /// Number of dates in the range, `span_days() + 1`.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.span_days()).map_or(usize::MAX, |span| span.saturating_add(1))
    }

    /// Always false: a range holds at least one date.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Days from `start` to `date`, or `None` when `date` is outside the range.
    #[must_use]
    pub fn offset_of(&self, date: NaiveDate) -> Option<u64> {
        self.contains(date)
            .then(|| days_between(self.start, date))
    }

    /// Smallest range covering both `self` and `other`, including any gap
    /// between them.
    #[must_use]
    pub fn union_span(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Fresh chronological cursor over the range.
    #[must_use]
    pub fn iter(&self) -> DateRangeIter {
        DateRangeIter {
            front: self.start,
            back: self.end,
            exhausted: false,
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

impl IntoIterator for &DateRange {
    type Item = NaiveDate;
    type IntoIter = DateRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = DateRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Cursor over a [`DateRange`].
#[derive(Debug, Clone)]
pub struct DateRangeIter {
    front: NaiveDate,
    back: NaiveDate,
    exhausted: bool,
}

impl Iterator for DateRangeIter {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let current = self.front;
        if current == self.back {
            self.exhausted = true;
        } else if let Some(next) = current.succ_opt() {
            self.front = next;
        } else {
            self.exhausted = true;
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.exhausted {
            return (0, Some(0));
        }
        let remaining = usize::try_from(days_between(self.front, self.back))
            .map_or(usize::MAX, |span| span.saturating_add(1));
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for DateRangeIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let current = self.back;
        if current == self.front {
            self.exhausted = true;
        } else if let Some(previous) = current.pred_opt() {
            self.back = previous;
        } else {
            self.exhausted = true;
        }
        Some(current)
    }
}

impl ExactSizeIterator for DateRangeIter {}

impl FusedIterator for DateRangeIter {}

/// Whole days from `from` to `to`; callers guarantee `from <= to`.
fn days_between(from: NaiveDate, to: NaiveDate) -> u64 {
    u64::try_from(to.signed_duration_since(from).num_days()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn between_yields_every_date_inclusive() {
        let range = DateRange::between(date(2023, 7, 18), date(2023, 7, 21)).expect("valid");
        let dates: Vec<_> = range.iter().collect();
        assert_eq!(
            dates,
            vec![
                date(2023, 7, 18),
                date(2023, 7, 19),
                date(2023, 7, 20),
                date(2023, 7, 21)
            ]
        );
        assert_eq!(range.len(), 4);
        assert_eq!(range.span_days(), 3);
    }

    #[test]
    fn single_day_range_has_one_element() {
        let range = DateRange::between(date(2023, 7, 18), date(2023, 7, 18)).expect("valid");
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![date(2023, 7, 18)]);
        assert_eq!(range.len(), 1);
        assert_eq!(range, DateRange::day(date(2023, 7, 18)));
    }

    #[test]
    fn inverted_bounds_are_rejected_not_swapped() {
        let err = DateRange::between(date(2023, 7, 31), date(2023, 7, 18))
            .expect_err("end before start");
        assert_eq!(
            err,
            EngineError::InvalidRange {
                start: date(2023, 7, 31),
                end: date(2023, 7, 18),
            }
        );
    }

    #[test]
    fn range_can_be_traversed_repeatedly() {
        let range = DateRange::between(date(2024, 2, 27), date(2024, 3, 1)).expect("valid");
        let first: Vec<_> = range.iter().collect();
        let second: Vec<_> = (&range).into_iter().collect();
        assert_eq!(first, second);
        // 2024 is a leap year
        assert_eq!(first.len(), 4);
        assert!(first.contains(&date(2024, 2, 29)));
    }

    #[test]
    fn iterator_is_double_ended_and_exact() {
        let range = DateRange::between(date(2023, 12, 30), date(2024, 1, 2)).expect("valid");
        let mut iter = range.iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next_back(), Some(date(2024, 1, 2)));
        assert_eq!(iter.next(), Some(date(2023, 12, 30)));
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.next(), Some(date(2023, 12, 31)));
        assert_eq!(iter.next_back(), Some(date(2024, 1, 1)));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn contains_and_offset_respect_both_bounds() {
        let range = DateRange::between(date(2023, 7, 18), date(2023, 7, 25)).expect("valid");
        assert!(range.contains(date(2023, 7, 18)));
        assert!(range.contains(date(2023, 7, 25)));
        assert!(!range.contains(date(2023, 7, 17)));
        assert!(!range.contains(date(2023, 7, 26)));
        assert_eq!(range.offset_of(date(2023, 7, 18)), Some(0));
        assert_eq!(range.offset_of(date(2023, 7, 25)), Some(7));
        assert_eq!(range.offset_of(date(2023, 7, 26)), None);
    }

    #[test]
    fn union_span_covers_gap_between_disjoint_ranges() {
        let old = DateRange::between(date(2023, 7, 18), date(2023, 7, 25)).expect("valid");
        let new = DateRange::between(date(2023, 7, 13), date(2023, 7, 16)).expect("valid");
        let span = old.union_span(&new);
        assert_eq!(span.start(), date(2023, 7, 13));
        assert_eq!(span.end(), date(2023, 7, 25));
        assert_eq!(span, new.union_span(&old));
    }

    #[test]
    fn deserialize_rejects_inverted_range() {
        let ok: DateRange =
            serde_json::from_str(r#"{"start":"2023-07-18","end":"2023-07-31"}"#).expect("valid");
        assert_eq!(ok.len(), 14);

        let err = serde_json::from_str::<DateRange>(r#"{"start":"2023-07-31","end":"2023-07-18"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn display_uses_inclusive_notation() {
        let range = DateRange::between(date(2023, 7, 18), date(2023, 7, 31)).expect("valid");
        assert_eq!(range.to_string(), "2023-07-18..=2023-07-31");
    }
}
