//! Names of the persisted keys.
//!
//! # Key Patterns
//!
//! | Key | Type | Description |
//! |-----|------|-------------|
//! | `CurrentDay` | Integer | Day, 1..=5 |
//! | `CurrentPhase` | Integer | 0 Morning, 1 Night |
//! | `IsGameOver` | Integer | 0/1 |
//! | `PillDay{n}` | Integer | -1 none, 0 refused, 1 taken |
//! | `TaskDay{n}Completed` | Integer | 0/1 |
//! | `DoorStates` | String | `roomId:state` comma list |
//! | `RoomTypes` | String | `roomId:type` comma list |
//! | `RoomsDiscoveredTonight` | Integer | discoveries this night |
//! | `RoomsEnteredTonight` | Integer | room entries this night |
//! | `CompletedPuzzles` | String | comma list |
//! | `UnlockedLore` | String | comma list |
//! | `SaveExists` | Integer | 0/1 |
//! | `MasterVolume` etc. | Float | settings, kept across deletes |
//!
//! Every key may carry a configured prefix so several slots can share a
//! store.

use sunset_types::{Day, Setting};

/// Builds the full key names for one save slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySchema {
    prefix: String,
}

impl KeySchema {
    /// Keys with the given prefix (empty for none).
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn key(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    /// `CurrentDay`
    pub fn current_day(&self) -> String {
        self.key("CurrentDay")
    }

    /// `CurrentPhase`
    pub fn current_phase(&self) -> String {
        self.key("CurrentPhase")
    }

    /// `IsGameOver`
    pub fn is_game_over(&self) -> String {
        self.key("IsGameOver")
    }

    /// `PillDay{n}`
    pub fn pill_day(&self, day: Day) -> String {
        self.key(&format!("PillDay{day}"))
    }

    /// `TaskDay{n}Completed`
    pub fn task_day_completed(&self, day: Day) -> String {
        self.key(&format!("TaskDay{day}Completed"))
    }

    /// `DoorStates`
    pub fn door_states(&self) -> String {
        self.key("DoorStates")
    }

    /// `RoomTypes`
    pub fn room_types(&self) -> String {
        self.key("RoomTypes")
    }

    /// `RoomsDiscoveredTonight`
    pub fn rooms_discovered_tonight(&self) -> String {
        self.key("RoomsDiscoveredTonight")
    }

    /// `RoomsEnteredTonight`
    pub fn rooms_entered_tonight(&self) -> String {
        self.key("RoomsEnteredTonight")
    }

    /// `CompletedPuzzles`
    pub fn completed_puzzles(&self) -> String {
        self.key("CompletedPuzzles")
    }

    /// `UnlockedLore`
    pub fn unlocked_lore(&self) -> String {
        self.key("UnlockedLore")
    }

    /// `SaveExists`
    pub fn save_exists(&self) -> String {
        self.key("SaveExists")
    }

    /// Key of a persisted setting.
    pub fn setting(&self, setting: Setting) -> String {
        self.key(setting.key())
    }

    /// Every key cleared by deleting the save. Settings are not included.
    pub fn all_save_keys(&self) -> Vec<String> {
        let mut keys = vec![
            self.current_day(),
            self.current_phase(),
            self.is_game_over(),
        ];
        keys.extend(Day::all().map(|day| self.pill_day(day)));
        keys.extend(Day::all().map(|day| self.task_day_completed(day)));
        keys.extend([
            self.door_states(),
            self.room_types(),
            self.rooms_discovered_tonight(),
            self.rooms_entered_tonight(),
            self.completed_puzzles(),
            self.unlocked_lore(),
            self.save_exists(),
        ]);
        keys
    }
}
