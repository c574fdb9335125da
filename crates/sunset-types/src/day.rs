//! The calendar day of a playthrough.
//!
//! A playthrough lasts exactly five days. [`Day`] can only hold values in
//! `1..=5`; anything read from outside the engine (save files, console
//! input) goes through [`Day::new`] or [`Day::clamped`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

/// A day of the playthrough, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Day(u8);

impl Day {
    /// The first day of a playthrough.
    pub const FIRST: Self = Self(1);

    /// The final day of a playthrough.
    pub const LAST: Self = Self(5);

    /// Number of days in a playthrough.
    pub const COUNT: usize = 5;

    /// Create a day, returning `None` when `value` is outside `1..=5`.
    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::FIRST.0 && value <= Self::LAST.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Create a day from a wide integer, returning `None` when out of range.
    pub fn from_i64(value: i64) -> Option<Self> {
        u8::try_from(value).ok().and_then(Self::new)
    }

    /// Create a day from a wide integer, clamping into `1..=5`.
    pub fn clamped(value: i64) -> Self {
        let bounded = value.clamp(i64::from(Self::FIRST.0), i64::from(Self::LAST.0));
        Self::from_i64(bounded).unwrap_or(Self::FIRST)
    }

    /// The day number as a plain integer.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based index of this day, for per-day arrays.
    pub const fn index(self) -> usize {
        self.0.saturating_sub(1) as usize
    }

    /// The following day, or `None` after the final day.
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Self::new(value),
            None => None,
        }
    }

    /// Whether this is the final day.
    pub const fn is_last(self) -> bool {
        self.0 == Self::LAST.0
    }

    /// Iterate over every day in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::FIRST.0..=Self::LAST.0).map(Self)
    }
}

impl Default for Day {
    fn default() -> Self {
        Self::FIRST
    }
}

impl core::fmt::Display for Day {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0
    }
}

impl TryFrom<u8> for Day {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(value)
    }
}

impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        Self::new(value)
            .ok_or_else(|| serde::de::Error::custom(format!("day {value} is outside 1..=5")))
    }
}
