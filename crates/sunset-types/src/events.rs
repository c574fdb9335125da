//! Events emitted by the engine.
//!
//! Every accepted state change produces one or more [`GameEvent`] values,
//! delivered synchronously and in order to the subscribers of the event bus.
//! The presentation layer (audio, lighting, UI) reacts to these and never
//! mutates engine state directly.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::day::Day;
use crate::enums::{Ending, Phase, PillChoice, Setting, TaskDifficulty};
use crate::ids::{LoreId, PuzzleId, RoomId, TaskId};

/// Something that happened inside the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum GameEvent {
    // --- Day cycle ---
    /// The phase of day changed.
    PhaseChanged {
        /// The new phase.
        phase: Phase,
    },
    /// A new day started.
    DayChanged {
        /// The new day.
        day: Day,
    },
    /// Night began and the player is on the pill today.
    NightOnPill {
        /// The day whose night began.
        day: Day,
    },
    /// Night began and the player is off the pill today.
    NightOffPill {
        /// The day whose night began.
        day: Day,
    },
    /// The final off-pill discovery beat at the end of day 5.
    FinalDiscovery {
        /// Always the last day.
        day: Day,
    },
    /// The playthrough finished normally.
    GameComplete,
    /// An ending was reached before the final day.
    EndedEarly {
        /// The day on which the playthrough ended.
        day: Day,
    },

    // --- Pills ---
    /// A pill choice was recorded.
    PillRecorded {
        /// The day of the choice.
        day: Day,
        /// What the player chose.
        choice: PillChoice,
    },
    /// The pill history crossed the ending threshold.
    EndingReached {
        /// The ending the history classifies into.
        ending: Ending,
    },

    // --- Tasks ---
    /// A daily task was handed to the player.
    TaskSpawned {
        /// The task definition that was spawned.
        task_id: TaskId,
        /// The day the task belongs to.
        day: Day,
        /// How hard the task is.
        difficulty: TaskDifficulty,
    },
    /// The daily task for a day was completed.
    TaskCompleted {
        /// The day whose task completed.
        day: Day,
    },

    // --- Rooms ---
    /// A hidden room was discovered.
    RoomDiscovered {
        /// The room that was discovered.
        room_id: RoomId,
    },
    /// A hidden room was entered for the first time.
    RoomEntered {
        /// The room that was entered.
        room_id: RoomId,
    },
    /// On-pill night: the player is confined to the bedroom.
    BedroomRestrictionActive,

    // --- Puzzles ---
    /// A puzzle was presented to the player.
    PuzzleSpawned {
        /// The puzzle that was presented.
        puzzle_id: PuzzleId,
    },
    /// A puzzle was solved.
    PuzzleCompleted {
        /// The puzzle that was solved.
        puzzle_id: PuzzleId,
    },
    /// A lore entry became readable.
    LoreUnlocked {
        /// The lore entry that was unlocked.
        lore_id: LoreId,
    },

    // --- Settings and persistence ---
    /// A setting changed value.
    SettingChanged {
        /// Which setting changed.
        setting: Setting,
        /// The new, clamped value.
        value: f32,
    },
    /// The game state was written to the store.
    GameSaved,
    /// The game state was restored from the store.
    GameLoaded,
    /// The save was deleted and the engine reset to a new game.
    SaveDeleted,
}

impl GameEvent {
    /// Short name of the event, used as a structured log field.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PhaseChanged { .. } => "phase_changed",
            Self::DayChanged { .. } => "day_changed",
            Self::NightOnPill { .. } => "night_on_pill",
            Self::NightOffPill { .. } => "night_off_pill",
            Self::FinalDiscovery { .. } => "final_discovery",
            Self::GameComplete => "game_complete",
            Self::EndedEarly { .. } => "ended_early",
            Self::PillRecorded { .. } => "pill_recorded",
            Self::EndingReached { .. } => "ending_reached",
            Self::TaskSpawned { .. } => "task_spawned",
            Self::TaskCompleted { .. } => "task_completed",
            Self::RoomDiscovered { .. } => "room_discovered",
            Self::RoomEntered { .. } => "room_entered",
            Self::BedroomRestrictionActive => "bedroom_restriction_active",
            Self::PuzzleSpawned { .. } => "puzzle_spawned",
            Self::PuzzleCompleted { .. } => "puzzle_completed",
            Self::LoreUnlocked { .. } => "lore_unlocked",
            Self::SettingChanged { .. } => "setting_changed",
            Self::GameSaved => "game_saved",
            Self::GameLoaded => "game_loaded",
            Self::SaveDeleted => "save_deleted",
        }
    }
}
