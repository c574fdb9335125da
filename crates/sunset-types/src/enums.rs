//! Enumeration types for the Sunset day-cycle engine.
//!
//! Several of these are persisted as plain integers in a flat key-value
//! store. Each such enum exposes `code()` and `from_code()`; decoding is
//! strict and returns `None` for unknown codes so the loader can fall back
//! to the value it already holds.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Phase of day
// ---------------------------------------------------------------------------

/// The half of a day the player is currently in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Phase {
    /// Pill choice and the daily task happen in the morning.
    #[default]
    Morning,
    /// Hidden rooms and puzzles are only reachable at night.
    Night,
}

impl Phase {
    /// Persisted integer code (`0` = Morning, `1` = Night).
    pub const fn code(self) -> i64 {
        match self {
            Self::Morning => 0,
            Self::Night => 1,
        }
    }

    /// Decode a persisted phase code.
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Morning),
            1 => Some(Self::Night),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Pill choice
// ---------------------------------------------------------------------------

/// What the player did with the pill on a given day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum PillChoice {
    /// No choice recorded yet.
    #[default]
    None,
    /// The player took the pill ("on pill").
    Taken,
    /// The player refused the pill ("off pill").
    NotTaken,
}

impl PillChoice {
    /// Persisted integer code (`-1` = None, `0` = `NotTaken`, `1` = Taken).
    pub const fn code(self) -> i64 {
        match self {
            Self::None => -1,
            Self::NotTaken => 0,
            Self::Taken => 1,
        }
    }

    /// Decode a persisted pill code.
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(Self::None),
            0 => Some(Self::NotTaken),
            1 => Some(Self::Taken),
            _ => None,
        }
    }

    /// Whether an actual choice (not `None`) is recorded.
    pub const fn is_made(self) -> bool {
        !matches!(self, Self::None)
    }
}

// ---------------------------------------------------------------------------
// Doors and rooms
// ---------------------------------------------------------------------------

/// Progress state of a door in the room registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum DoorState {
    /// Hidden door not yet found.
    #[default]
    Locked,
    /// Found but never walked through.
    Discovered,
    /// Walked through at least once.
    Entered,
    /// An ordinary door that is always usable.
    Normal,
}

impl DoorState {
    /// Persisted integer code.
    pub const fn code(self) -> i64 {
        match self {
            Self::Locked => 0,
            Self::Discovered => 1,
            Self::Entered => 2,
            Self::Normal => 3,
        }
    }

    /// Decode a persisted door state code.
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Locked),
            1 => Some(Self::Discovered),
            2 => Some(Self::Entered),
            3 => Some(Self::Normal),
            _ => None,
        }
    }
}

/// What kind of room a door leads to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RoomType {
    /// Must be discovered on an off-pill night before it can be entered.
    #[default]
    Hidden,
    /// The room where daily tasks are performed.
    Task,
    /// Any other room.
    Normal,
}

impl RoomType {
    /// Persisted integer code.
    pub const fn code(self) -> i64 {
        match self {
            Self::Hidden => 0,
            Self::Task => 1,
            Self::Normal => 2,
        }
    }

    /// Decode a persisted room type code.
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Hidden),
            1 => Some(Self::Task),
            2 => Some(Self::Normal),
            _ => None,
        }
    }

    /// The door state a room of this type starts in.
    pub const fn initial_door_state(self) -> DoorState {
        match self {
            Self::Hidden => DoorState::Locked,
            Self::Task | Self::Normal => DoorState::Normal,
        }
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Difficulty of the daily task, derived from the day's pill choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TaskDifficulty {
    /// On pill: the task is easy.
    Easy,
    /// Off pill: the task is hard.
    Hard,
}

impl TaskDifficulty {
    /// Difficulty for a day on which `choice` was made.
    pub const fn for_choice(choice: PillChoice) -> Self {
        match choice {
            PillChoice::Taken => Self::Easy,
            PillChoice::None | PillChoice::NotTaken => Self::Hard,
        }
    }
}

// ---------------------------------------------------------------------------
// Endings
// ---------------------------------------------------------------------------

/// Classification of a playthrough from its pill history.
///
/// Uses the three-of-five threshold rule: three pills taken is the Bad
/// ending, three refused is the Good ending, anything else is undetermined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Ending {
    /// Three or more pills refused.
    Good,
    /// Three or more pills taken.
    Bad,
    /// Neither threshold reached yet.
    Undetermined,
}

impl Ending {
    /// Stable label shown to the player and written to logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Bad => "Bad",
            Self::Undetermined => "Undetermined",
        }
    }
}

impl core::fmt::Display for Ending {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// A player-adjustable setting stored as a float in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Setting {
    /// Overall output volume.
    MasterVolume,
    /// Music bus volume.
    MusicVolume,
    /// Sound effect bus volume.
    SfxVolume,
    /// Screen brightness.
    Brightness,
}

impl Setting {
    /// Every setting, in display order.
    pub const ALL: [Self; 4] = [
        Self::MasterVolume,
        Self::MusicVolume,
        Self::SfxVolume,
        Self::Brightness,
    ];

    /// Key name used in the key-value store.
    pub const fn key(self) -> &'static str {
        match self {
            Self::MasterVolume => "MasterVolume",
            Self::MusicVolume => "MusicVolume",
            Self::SfxVolume => "SFXVolume",
            Self::Brightness => "Brightness",
        }
    }

    /// Parse a setting from its console or config name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "master" | "master_volume" => Some(Self::MasterVolume),
            "music" | "music_volume" => Some(Self::MusicVolume),
            "sfx" | "sfx_volume" => Some(Self::SfxVolume),
            "brightness" => Some(Self::Brightness),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

/// Why an operation was refused.
///
/// No operation in the engine panics on expected misuse. Instead it returns
/// an error that classifies into one of these kinds, logs a warning, and
/// leaves state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum RejectionKind {
    /// Out-of-range day, unknown room, blank identifier.
    InvalidArgument,
    /// Phase, ordering, or gating rule not satisfied yet.
    PreconditionNotMet,
    /// Idempotency guard: the thing was already done.
    AlreadyDone,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pill_codes_roundtrip() {
        for choice in [PillChoice::None, PillChoice::Taken, PillChoice::NotTaken] {
            assert_eq!(PillChoice::from_code(choice.code()), Some(choice));
        }
        assert_eq!(PillChoice::from_code(2), None);
        assert_eq!(PillChoice::from_code(-2), None);
    }

    #[test]
    fn door_and_room_codes_reject_unknown() {
        assert_eq!(DoorState::from_code(2), Some(DoorState::Entered));
        assert_eq!(DoorState::from_code(7), None);
        assert_eq!(RoomType::from_code(1), Some(RoomType::Task));
        assert_eq!(RoomType::from_code(-1), None);
    }

    #[test]
    fn hidden_rooms_start_locked() {
        assert_eq!(RoomType::Hidden.initial_door_state(), DoorState::Locked);
        assert_eq!(RoomType::Task.initial_door_state(), DoorState::Normal);
    }

    #[test]
    fn difficulty_follows_pill() {
        assert_eq!(TaskDifficulty::for_choice(PillChoice::Taken), TaskDifficulty::Easy);
        assert_eq!(TaskDifficulty::for_choice(PillChoice::NotTaken), TaskDifficulty::Hard);
    }

    #[test]
    fn setting_names_parse() {
        assert_eq!(Setting::parse("SFX"), Some(Setting::SfxVolume));
        assert_eq!(Setting::parse("brightness"), Some(Setting::Brightness));
        assert_eq!(Setting::parse("gamma"), None);
        assert_eq!(Setting::SfxVolume.key(), "SFXVolume");
    }

    #[test]
    fn room_type_yaml_names_are_snake_case() {
        let json = serde_json::to_string(&RoomType::Hidden).ok();
        assert_eq!(json.as_deref(), Some("\"hidden\""));
    }
}
