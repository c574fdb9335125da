//! Plain-data structs shared between the engine and the persistence layer.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::day::Day;
use crate::enums::{DoorState, Phase, PillChoice, RoomType, Setting};
use crate::ids::{LoreId, PuzzleId, RoomId};

// ---------------------------------------------------------------------------
// Save snapshot
// ---------------------------------------------------------------------------

/// Everything a save file holds: the day cycle plus the contents of every
/// ledger.
///
/// The engine produces one with `Game::snapshot` and consumes one with
/// `Game::restore`; the persistence codec maps it to and from flat keys.
/// Room lists keep the registry's configured order so two snapshots of the
/// same state compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SaveSnapshot {
    /// Current day.
    pub day: Day,
    /// Current phase of day.
    pub phase: Phase,
    /// Whether the playthrough has ended.
    pub game_over: bool,
    /// Pill choice per day, index 0 is day 1.
    pub pills: [PillChoice; Day::COUNT],
    /// Task completion per day, index 0 is day 1.
    pub tasks: [bool; Day::COUNT],
    /// Door state per configured room.
    pub door_states: Vec<(RoomId, DoorState)>,
    /// Room type per configured room.
    pub room_types: Vec<(RoomId, RoomType)>,
    /// Rooms discovered since the current night began.
    pub rooms_discovered_tonight: u32,
    /// Room entries since the current night began.
    pub rooms_entered_tonight: u32,
    /// Puzzles solved so far.
    pub completed_puzzles: BTreeSet<PuzzleId>,
    /// Lore entries unlocked so far.
    pub unlocked_lore: BTreeSet<LoreId>,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Player settings. Every value lives in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Settings {
    /// Overall output volume.
    pub master_volume: f32,
    /// Music bus volume.
    pub music_volume: f32,
    /// Sound effect bus volume.
    pub sfx_volume: f32,
    /// Screen brightness.
    pub brightness: f32,
}

impl Settings {
    /// Read one setting.
    pub const fn get(&self, setting: Setting) -> f32 {
        match setting {
            Setting::MasterVolume => self.master_volume,
            Setting::MusicVolume => self.music_volume,
            Setting::SfxVolume => self.sfx_volume,
            Setting::Brightness => self.brightness,
        }
    }

    /// Overwrite one setting without clamping.
    pub const fn set(&mut self, setting: Setting, value: f32) {
        match setting {
            Setting::MasterVolume => self.master_volume = value,
            Setting::MusicVolume => self.music_volume = value,
            Setting::SfxVolume => self.sfx_volume = value,
            Setting::Brightness => self.brightness = value,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            music_volume: 0.7,
            sfx_volume: 0.7,
            brightness: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_is_day_one_morning() {
        let snapshot = SaveSnapshot::default();
        assert_eq!(snapshot.day, Day::FIRST);
        assert_eq!(snapshot.phase, Phase::Morning);
        assert!(!snapshot.game_over);
        assert!(snapshot.pills.iter().all(|p| *p == PillChoice::None));
        assert!(snapshot.tasks.iter().all(|t| !*t));
    }

    #[test]
    fn settings_get_set_by_key() {
        let mut settings = Settings::default();
        settings.set(Setting::Brightness, 0.25);
        assert!((settings.get(Setting::Brightness) - 0.25).abs() < f32::EPSILON);
        assert!((settings.get(Setting::MasterVolume) - 0.8).abs() < f32::EPSILON);
    }
}
