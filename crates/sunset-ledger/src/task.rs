//! Per-day task completion flags.
//!
//! The tracker only records whether each day's task is done. Spawning a
//! task (which needs the phase and the day's pill choice) belongs to the
//! session layer; gating the phase on completion belongs to the day cycle.

use sunset_events::EventSink;
use sunset_types::{Day, GameEvent};
use tracing::{info, warn};

use crate::{LedgerError, checked_day};

/// Whether each day's task has been completed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskTracker {
    /// Completion per day, index 0 is day 1.
    completed: [bool; Day::COUNT],
}

impl TaskTracker {
    /// Create a tracker with every day incomplete.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every day incomplete.
    pub fn reset(&mut self) {
        self.completed = [false; Day::COUNT];
        info!("Task tracker reset");
    }

    /// Whether the task for `day` is complete. False (logged) for invalid days.
    pub fn is_completed(&self, day: u8) -> bool {
        checked_day("task", day).is_ok_and(|d| self.slot(d))
    }

    /// Overwrite the flag for `day`. Used by load and by task providers that
    /// track completion themselves.
    pub fn set_completed(&mut self, day: u8, completed: bool) -> Result<(), LedgerError> {
        let day = checked_day("task", day)?;
        if let Some(slot) = self.completed.get_mut(day.index()) {
            *slot = completed;
        }
        Ok(())
    }

    /// Mark the task for `day` complete and emit [`GameEvent::TaskCompleted`].
    ///
    /// Completing an already completed day is rejected with a warning.
    pub fn complete_day(&mut self, day: u8, sink: &mut impl EventSink) -> Result<(), LedgerError> {
        let day = checked_day("task", day)?;
        if self.slot(day) {
            warn!(day = %day, "Task already completed today");
            return Err(LedgerError::TaskAlreadyCompleted { day });
        }
        if let Some(slot) = self.completed.get_mut(day.index()) {
            *slot = true;
        }
        info!(day = %day, "Task completed");
        sink.emit(GameEvent::TaskCompleted { day });
        Ok(())
    }

    /// Copy of every day's flag, index 0 is day 1.
    pub const fn completed(&self) -> [bool; Day::COUNT] {
        self.completed
    }

    fn slot(&self, day: Day) -> bool {
        self.completed.get(day.index()).copied().unwrap_or(false)
    }
}
