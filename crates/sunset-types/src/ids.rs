//! Type-safe identifier wrappers around content strings.
//!
//! Rooms, puzzles, lore entries, and tasks are all named by stable string
//! identifiers taken from the content configuration (`room_1`,
//! `puzzle_day_3`, `lore_day_3`, ...). Each gets its own newtype so the
//! compiler rejects passing a room where a puzzle is expected.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::day::Day;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the identifier is empty or whitespace only.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }

            /// Return the inner [`String`] value.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Identifier for a room in the house (hidden, task, or normal).
    RoomId
}

define_id! {
    /// Identifier for a hidden-room puzzle.
    PuzzleId
}

define_id! {
    /// Identifier for a lore entry unlocked by solving a puzzle.
    LoreId
}

define_id! {
    /// Identifier for a daily task definition.
    TaskId
}

impl PuzzleId {
    /// The puzzle that gates leaving the night of `day` when off the pill.
    pub fn for_day(day: Day) -> Self {
        Self(format!("puzzle_day_{day}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn puzzle_for_day_uses_day_number() {
        let day = Day::new(3).unwrap_or(Day::FIRST);
        assert_eq!(PuzzleId::for_day(day).as_str(), "puzzle_day_3");
    }

    #[test]
    fn id_roundtrip_serde() {
        let original = RoomId::from("room_2");
        let json = serde_json::to_string(&original).ok();
        assert_eq!(json.as_deref(), Some("\"room_2\""));
        let restored: Result<RoomId, _> = serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(original));
    }

    #[test]
    fn blank_ids_are_detected() {
        assert!(LoreId::new("   ").is_blank());
        assert!(!LoreId::new("lore_day_2").is_blank());
    }
}
