//! Ledgers for the Sunset day-cycle engine.
//!
//! Each ledger is a bounded, keyed record owned by exactly one component.
//! Ledgers are only ever mutated through their own operations; the day
//! cycle reads them to gate transitions and calls their operations when a
//! transition needs a side effect (resetting night counters, auto-discovering
//! a room).
//!
//! # Modules
//!
//! - [`pill`] -- [`PillLedger`]: one pill choice per day, forced early days,
//!   and the three-of-five ending threshold.
//! - [`task`] -- [`TaskTracker`]: per-day task completion flags.
//! - [`room`] -- [`RoomRegistry`]: hidden-room door states and the
//!   one-discovery-per-night quota.
//! - [`puzzle`] -- [`PuzzleLedger`]: solved puzzles and unlocked lore.
//!
//! # Failure Model
//!
//! Operations return `Result<_, LedgerError>`. A rejected operation logs a
//! warning and leaves the ledger exactly as it was. Callers that do not care
//! why an operation was refused can ignore the error; nothing panics.
//!
//! # Usage
//!
//! ```
//! use sunset_ledger::PillLedger;
//! use sunset_types::{Ending, GameEvent, PillChoice};
//!
//! let mut pills = PillLedger::new();
//! let mut events: Vec<GameEvent> = Vec::new();
//!
//! pills.record_choice(1, PillChoice::Taken, &mut events).ok();
//! pills.record_choice(3, PillChoice::Taken, &mut events).ok();
//! pills.record_choice(4, PillChoice::Taken, &mut events).ok();
//!
//! assert!(pills.is_ending_reached());
//! assert_eq!(pills.determine_ending(), Ending::Bad);
//! ```

pub mod pill;
pub mod puzzle;
pub mod room;
pub mod task;

// Re-export primary types at crate root.
pub use pill::{ENDING_THRESHOLD, PillLedger};
pub use puzzle::PuzzleLedger;
pub use room::{DISCOVERIES_PER_NIGHT, EntryOutcome, RoomRegistry};
pub use task::TaskTracker;

use sunset_types::{Day, DoorState, PillChoice, PuzzleId, RejectionKind, RoomId, RoomType};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Reasons a ledger operation can be refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The day is outside `1..=5`.
    #[error("invalid day {day}: must be within 1..=5")]
    InvalidDay {
        /// The rejected day number.
        day: u8,
    },

    /// `PillChoice::None` cannot be recorded as a choice.
    #[error("cannot record a 'None' pill choice")]
    NoneChoice,

    /// A choice is already recorded for this day.
    #[error("pill already chosen on day {day} ({choice:?})")]
    ChoiceAlreadyRecorded {
        /// The day in question.
        day: Day,
        /// The choice already on record.
        choice: PillChoice,
    },

    /// The ending threshold was already reached; no more choices.
    #[error("an ending has already been reached, no more pill choices")]
    EndingAlreadyReached,

    /// The day is scripted and the choice does not match the script.
    #[error("day {day} is scripted: the choice must be {forced:?}")]
    ForcedChoiceMismatch {
        /// The scripted day.
        day: Day,
        /// The only choice allowed on that day.
        forced: PillChoice,
    },

    /// The task for this day is already marked complete.
    #[error("task for day {day} already completed")]
    TaskAlreadyCompleted {
        /// The day in question.
        day: Day,
    },

    /// No room with this id is registered.
    #[error("unknown room id '{room_id}'")]
    UnknownRoom {
        /// The rejected room id.
        room_id: RoomId,
    },

    /// Only hidden rooms can be discovered.
    #[error("room '{room_id}' is not a hidden room (type: {room_type:?})")]
    NotHidden {
        /// The room in question.
        room_id: RoomId,
        /// Its actual type.
        room_type: RoomType,
    },

    /// The per-night discovery quota is already used up.
    #[error("cannot discover room '{room_id}': already discovered {limit} room this night")]
    NightQuotaUsed {
        /// The room the caller tried to discover.
        room_id: RoomId,
        /// The quota.
        limit: u32,
    },

    /// Discovery requires a locked door.
    #[error("room '{room_id}' is already {state:?}")]
    DoorNotLocked {
        /// The room in question.
        room_id: RoomId,
        /// Its current door state.
        state: DoorState,
    },

    /// Entry requires a discovered (or previously entered) door.
    #[error("room '{room_id}' must be discovered before entering (current: {state:?})")]
    DoorNotDiscovered {
        /// The room in question.
        room_id: RoomId,
        /// Its current door state.
        state: DoorState,
    },

    /// Puzzle identifiers may not be blank.
    #[error("puzzle id must not be blank")]
    BlankPuzzleId,

    /// The puzzle was already solved.
    #[error("puzzle '{puzzle_id}' already completed")]
    PuzzleAlreadyCompleted {
        /// The puzzle in question.
        puzzle_id: PuzzleId,
    },
}

impl LedgerError {
    /// Classify the rejection.
    pub const fn kind(&self) -> RejectionKind {
        match self {
            Self::InvalidDay { .. }
            | Self::NoneChoice
            | Self::UnknownRoom { .. }
            | Self::NotHidden { .. }
            | Self::BlankPuzzleId => RejectionKind::InvalidArgument,
            Self::EndingAlreadyReached
            | Self::ForcedChoiceMismatch { .. }
            | Self::NightQuotaUsed { .. }
            | Self::DoorNotLocked { .. }
            | Self::DoorNotDiscovered { .. } => RejectionKind::PreconditionNotMet,
            Self::ChoiceAlreadyRecorded { .. }
            | Self::TaskAlreadyCompleted { .. }
            | Self::PuzzleAlreadyCompleted { .. } => RejectionKind::AlreadyDone,
        }
    }
}

/// Validate a raw day number, logging when it is out of range.
pub(crate) fn checked_day(ledger: &'static str, day: u8) -> Result<Day, LedgerError> {
    Day::new(day).ok_or_else(|| {
        tracing::warn!(ledger, day, "Invalid day");
        LedgerError::InvalidDay { day }
    })
}
