//! Per-date aggregation of plans and their checkboxes.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::range::DateRange;

/// ## Summary
/// Lookups the calendar aggregator needs from the persistence side.
///
/// Both lookups return items in the order they should appear.
pub trait CalendarSource {
    type Plan;
    type Checkbox;
    type Error;

    /// ## Summary
    /// Plans whose window contains `date`.
    ///
    /// ## Errors
    /// Whatever the backing store reports; aggregation stops on the first one.
    fn plans_on(&self, date: NaiveDate) -> Result<Vec<Self::Plan>, Self::Error>;

    /// ## Summary
    /// Checkboxes of `plan` dated exactly `date`.
    ///
    /// ## Errors
    /// Whatever the backing store reports; aggregation stops on the first one.
    fn checkboxes_on(
        &self,
        plan: &Self::Plan,
        date: NaiveDate,
    ) -> Result<Vec<Self::Checkbox>, Self::Error>;
}

/// One plan and its checkboxes on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanDay<P, C> {
    pub plan: P,
    pub checkboxes: Vec<C>,
}

/// ## Summary
/// Calendar view: every date of the search window, chronological, each with
/// the plans active that day in lookup order.
///
/// A date with no active plan is present with an empty list; it is never
/// missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Calendar<P, C> {
    days: BTreeMap<NaiveDate, Vec<PlanDay<P, C>>>,
}

impl<P, C> Calendar<P, C> {
    /// Number of dates, equal to the search window length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Plans on `date`; `None` only when `date` is outside the search window.
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<&[PlanDay<P, C>]> {
        self.days.get(&date).map(Vec::as_slice)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[PlanDay<P, C>])> + '_ {
        self.days.iter().map(|(date, plans)| (*date, plans.as_slice()))
    }

    /// Applies `f` to every plan entry, keeping dates and order.
    #[must_use]
    pub fn map_plans<Q, F>(self, mut f: F) -> Calendar<Q, C>
    where
        F: FnMut(P) -> Q,
    {
        let days = self
            .days
            .into_iter()
            .map(|(date, plans)| {
                let plans = plans
                    .into_iter()
                    .map(|day| PlanDay {
                        plan: f(day.plan),
                        checkboxes: day.checkboxes,
                    })
                    .collect();
                (date, plans)
            })
            .collect();
        Calendar { days }
    }
}

impl<'a, P, C> IntoIterator for &'a Calendar<P, C> {
    type Item = (&'a NaiveDate, &'a Vec<PlanDay<P, C>>);
    type IntoIter = std::collections::btree_map::Iter<'a, NaiveDate, Vec<PlanDay<P, C>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.iter()
    }
}

/// ## Summary
/// Builds the calendar for `search` from `source`.
///
/// For each date of the window, in order, fetches the active plans and then
/// each plan's checkboxes for that date.
///
/// ## Errors
/// Returns the first lookup error; no partial calendar is produced.
pub fn build_calendar<S>(
    search: DateRange,
    source: &S,
) -> Result<Calendar<S::Plan, S::Checkbox>, S::Error>
where
    S: CalendarSource + ?Sized,
{
    tracing::debug!(window = %search, days = search.len(), "Building calendar");

    let mut days = BTreeMap::new();
    for date in &search {
        let plans = source.plans_on(date)?;
        let mut entries = Vec::with_capacity(plans.len());
        for plan in plans {
            let checkboxes = source.checkboxes_on(&plan, date)?;
            entries.push(PlanDay { plan, checkboxes });
        }
        tracing::trace!(%date, plans = entries.len(), "Calendar day assembled");
        days.insert(date, entries);
    }

    Ok(Calendar { days })
}
