//! Shared type definitions for the Sunset day-cycle engine.
//!
//! This crate is the single source of truth for the vocabulary used across
//! the workspace: the calendar day, the phase of day, pill choices, door and
//! room classifications, the events the engine emits, and the plain-data
//! snapshot the persistence layer encodes. Types flow downstream to
//! `TypeScript` via `ts-rs` for the presentation layer.
//!
//! # Modules
//!
//! - [`day`] -- The bounded [`Day`] newtype (1 through 5)
//! - [`ids`] -- String identifier wrappers for rooms, puzzles, lore, and tasks
//! - [`enums`] -- Enumeration types with their persisted integer codes
//! - [`events`] -- [`GameEvent`], everything the engine tells its subscribers
//! - [`structs`] -- [`SaveSnapshot`] and [`Settings`]

pub mod day;
pub mod enums;
pub mod events;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use day::Day;
pub use enums::{DoorState, Ending, Phase, PillChoice, RejectionKind, RoomType, Setting, TaskDifficulty};
pub use events::GameEvent;
pub use ids::{LoreId, PuzzleId, RoomId, TaskId};
pub use structs::{SaveSnapshot, Settings};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for the presentation layer.

    #[test]
    fn export_bindings() {
        // ts-rs writes the files to the `bindings/` directory relative to
        // the crate root when `export_all` is called.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::RoomId::export_all();
        let _ = crate::ids::PuzzleId::export_all();
        let _ = crate::ids::LoreId::export_all();
        let _ = crate::ids::TaskId::export_all();

        // Enums
        let _ = crate::day::Day::export_all();
        let _ = crate::enums::Phase::export_all();
        let _ = crate::enums::PillChoice::export_all();
        let _ = crate::enums::DoorState::export_all();
        let _ = crate::enums::RoomType::export_all();
        let _ = crate::enums::TaskDifficulty::export_all();
        let _ = crate::enums::Ending::export_all();
        let _ = crate::enums::Setting::export_all();

        // Events and snapshots
        let _ = crate::events::GameEvent::export_all();
        let _ = crate::structs::SaveSnapshot::export_all();
        let _ = crate::structs::Settings::export_all();
    }
}
