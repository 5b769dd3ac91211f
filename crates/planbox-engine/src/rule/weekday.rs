//! Weekday sets and their token and bit-string encodings.

use chrono::Weekday;

/// Canonical weekday order, Monday first. Drives iteration order, wire
/// token order and the bit positions of the storage string.
pub const CANONICAL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Width of the storage bit string.
pub const WEEKDAY_BITS_LEN: usize = CANONICAL_WEEKDAYS.len();

const fn index_of(day: Weekday) -> usize {
    match day {
        Weekday::Mon => 0,
        Weekday::Tue => 1,
        Weekday::Wed => 2,
        Weekday::Thu => 3,
        Weekday::Fri => 4,
        Weekday::Sat => 5,
        Weekday::Sun => 6,
    }
}

/// Upper-case three-letter token used on the wire.
#[must_use]
pub const fn weekday_token(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

/// Parses a wire token. Short and full English names are accepted in any
/// case (`MON`, `mon`, `Monday`).
#[must_use]
pub fn parse_weekday_token(token: &str) -> Option<Weekday> {
    token.trim().parse::<Weekday>().ok()
}

/// ## Summary
/// A set of weekdays stored as one flag per canonical weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet {
    days: [bool; WEEKDAY_BITS_LEN],
}

impl WeekdaySet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            days: [false; WEEKDAY_BITS_LEN],
        }
    }

    /// Adds `day`; returns `false` if it was already present.
    pub fn insert(&mut self, day: Weekday) -> bool {
        let slot = &mut self.days[index_of(day)];
        let inserted = !*slot;
        *slot = true;
        inserted
    }

    #[must_use]
    pub const fn contains(&self, day: Weekday) -> bool {
        self.days[index_of(day)]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.days.iter().filter(|set| **set).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.days.iter().any(|set| *set)
    }

    /// Members in canonical order, regardless of insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        CANONICAL_WEEKDAYS
            .iter()
            .copied()
            .filter(|day| self.contains(*day))
    }

    /// ## Summary
    /// Renders the fixed-width storage string: one `'0'`/`'1'` per weekday,
    /// Monday first.
    #[must_use]
    pub fn to_bits(&self) -> String {
        self.days
            .iter()
            .map(|set| if *set { '1' } else { '0' })
            .collect()
    }

    /// ## Summary
    /// Parses the storage string produced by [`WeekdaySet::to_bits`].
    ///
    /// Returns `None` unless `bits` is exactly seven `'0'`/`'1'` characters.
    #[must_use]
    pub fn from_bits(bits: &str) -> Option<Self> {
        if bits.len() != WEEKDAY_BITS_LEN {
            return None;
        }
        let mut set = Self::new();
        for (slot, ch) in set.days.iter_mut().zip(bits.chars()) {
            *slot = match ch {
                '1' => true,
                '0' => false,
                _ => return None,
            };
        }
        Some(set)
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::new();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl std::fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tokens: Vec<&str> = self.iter().map(weekday_token).collect();
        f.write_str(&tokens.join(","))
    }
}
