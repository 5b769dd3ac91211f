//! Classification of dates when a plan window is edited.
//!
//! ## Summary
//! [`revise`] compares an old and a new window and tags every date of their
//! union span. The service layer reads the tags to decide which checkboxes
//! to create (new only), delete (old only), or leave alone (both, neither).

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::range::DateRange;

/// Membership of one date in the old and new windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RevisionTag {
    /// In neither window: the gap between two disjoint windows.
    Neither,
    /// Only in the old window; its checkboxes are removed.
    OldOnly,
    /// Only in the new window; checkboxes may be created.
    NewOnly,
    /// In both windows; nothing changes.
    Both,
}

impl RevisionTag {
    #[must_use]
    pub const fn classify(in_old: bool, in_new: bool) -> Self {
        match (in_old, in_new) {
            (false, false) => Self::Neither,
            (true, false) => Self::OldOnly,
            (false, true) => Self::NewOnly,
            (true, true) => Self::Both,
        }
    }

    /// Stable numeric code: old contributes 2 and new contributes 3, so
    /// `Both` is 5.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Neither => 0,
            Self::OldOnly => 2,
            Self::NewOnly => 3,
            Self::Both => 5,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neither => "neither",
            Self::OldOnly => "old_only",
            Self::NewOnly => "new_only",
            Self::Both => "both",
        }
    }

    #[must_use]
    pub const fn is_structural(self) -> bool {
        matches!(self, Self::OldOnly | Self::NewOnly)
    }
}

impl fmt::Display for RevisionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RevisionTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// ## Summary
/// Date to [`RevisionTag`] mapping, chronological.
///
/// An empty map means the window did not change and nothing is to be
/// revised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RevisionMap {
    tags: BTreeMap<NaiveDate, RevisionTag>,
}

impl RevisionMap {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<RevisionTag> {
        self.tags.get(&date).copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (NaiveDate, RevisionTag)> + '_ {
        self.tags.iter().map(|(date, tag)| (*date, *tag))
    }

    /// Dates carrying `tag`, chronological.
    pub fn dates_tagged(&self, tag: RevisionTag) -> impl Iterator<Item = NaiveDate> + '_ {
        self.iter()
            .filter(move |(_, candidate)| *candidate == tag)
            .map(|(date, _)| date)
    }

    /// Dates entering the plan.
    pub fn added(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates_tagged(RevisionTag::NewOnly)
    }

    /// Dates leaving the plan.
    pub fn removed(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates_tagged(RevisionTag::OldOnly)
    }

    pub fn unchanged(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates_tagged(RevisionTag::Both)
    }

    /// Dates strictly between two disjoint windows.
    pub fn gap(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates_tagged(RevisionTag::Neither)
    }
}

impl<'a> IntoIterator for &'a RevisionMap {
    type Item = (&'a NaiveDate, &'a RevisionTag);
    type IntoIter = std::collections::btree_map::Iter<'a, NaiveDate, RevisionTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

/// ## Summary
/// Tags every date of `old.union_span(new)` by its membership in each window.
///
/// Identical windows short-circuit to an empty map without sweeping.
#[must_use]
pub fn revise(old: DateRange, new: DateRange) -> RevisionMap {
    if old == new {
        tracing::debug!(window = %old, "Window unchanged, nothing to revise");
        return RevisionMap::default();
    }

    let tags: BTreeMap<NaiveDate, RevisionTag> = old
        .union_span(&new)
        .iter()
        .map(|date| {
            (
                date,
                RevisionTag::classify(old.contains(date), new.contains(date)),
            )
        })
        .collect();

    let map = RevisionMap { tags };
    tracing::debug!(
        old = %old,
        new = %new,
        added = map.added().count(),
        removed = map.removed().count(),
        "Computed window revision"
    );
    map
}
