//! The pill ledger: one choice per day and the ending threshold.
//!
//! The first two days are scripted (day 1 the pill is taken, day 2 it is
//! refused); days 3 through 5 are the player's call. Once three pills have
//! been taken, or three refused, the playthrough has reached its ending and
//! the ledger accepts no further choices.
//!
//! # Design
//!
//! - **Write-once per day**: [`PillLedger::record_choice`] never overwrites.
//!   Only [`PillLedger::set_choice`] (load/reset) can change a recorded day.
//! - **Monotone ending**: because choices are never un-recorded in play,
//!   [`PillLedger::is_ending_reached`] stays true once it becomes true.

use sunset_events::EventSink;
use sunset_types::{Day, Ending, GameEvent, PillChoice};
use tracing::{info, warn};

use crate::{LedgerError, checked_day};

/// Number of identical choices that ends the playthrough.
pub const ENDING_THRESHOLD: usize = 3;

/// Last day whose pill choice is scripted.
const LAST_FORCED_DAY: u8 = 2;

/// Record of the pill choice made on each day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PillLedger {
    /// Choice per day, index 0 is day 1.
    choices: [PillChoice; Day::COUNT],
}

impl PillLedger {
    /// Create a ledger with no choices recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every choice.
    pub fn reset(&mut self) {
        self.choices = [PillChoice::None; Day::COUNT];
        info!("Pill ledger reset");
    }

    /// Whether `day` has a scripted choice.
    pub const fn is_forced(day: u8) -> bool {
        day <= LAST_FORCED_DAY
    }

    /// The scripted choice for `day`, if it has one.
    pub const fn forced_choice(day: u8) -> Option<PillChoice> {
        match day {
            1 => Some(PillChoice::Taken),
            2 => Some(PillChoice::NotTaken),
            _ => None,
        }
    }

    /// Record the player's choice for `day`.
    ///
    /// Rejected (with a warning, leaving the ledger unchanged) when the day
    /// is out of range, a choice already exists for it, `choice` is `None`,
    /// the ending threshold was already reached, or the day is scripted and
    /// `choice` differs from the script. On success emits
    /// [`GameEvent::PillRecorded`], then [`GameEvent::EndingReached`] if this
    /// choice crossed the threshold.
    pub fn record_choice(
        &mut self,
        day: u8,
        choice: PillChoice,
        sink: &mut impl EventSink,
    ) -> Result<(), LedgerError> {
        let day = checked_day("pill", day)?;

        let existing = self.slot(day);
        if existing.is_made() {
            warn!(day = %day, choice = ?existing, "Pill already chosen today");
            return Err(LedgerError::ChoiceAlreadyRecorded {
                day,
                choice: existing,
            });
        }

        if !choice.is_made() {
            warn!(day = %day, "Cannot take a 'None' pill");
            return Err(LedgerError::NoneChoice);
        }

        if self.is_ending_reached() {
            warn!(day = %day, "Ending already reached, no more choices");
            return Err(LedgerError::EndingAlreadyReached);
        }

        match Self::forced_choice(day.get()) {
            Some(forced) if forced != choice => {
                warn!(day = %day, forced = ?forced, attempted = ?choice, "Day is scripted");
                return Err(LedgerError::ForcedChoiceMismatch { day, forced });
            }
            _ => {}
        }

        self.write(day, choice);
        info!(
            day = %day,
            choice = ?choice,
            forced = Self::is_forced(day.get()),
            "Pill choice recorded"
        );
        sink.emit(GameEvent::PillRecorded { day, choice });

        self.check_for_ending(sink);
        Ok(())
    }

    /// Whether a choice is recorded for `day`. False for invalid days.
    pub fn has_choice(&self, day: u8) -> bool {
        Day::new(day).is_some_and(|d| self.slot(d).is_made())
    }

    /// The choice recorded for `day`; `None` (logged) for invalid days.
    pub fn choice(&self, day: u8) -> PillChoice {
        checked_day("pill", day).map_or(PillChoice::None, |d| self.slot(d))
    }

    /// Overwrite the choice for `day` without any rule checks.
    ///
    /// Used by load and reset only.
    pub fn set_choice(&mut self, day: u8, choice: PillChoice) -> Result<(), LedgerError> {
        let day = checked_day("pill", day)?;
        self.write(day, choice);
        Ok(())
    }

    /// Number of days the pill was taken.
    pub fn count_taken(&self) -> usize {
        self.count(PillChoice::Taken)
    }

    /// Number of days the pill was refused.
    pub fn count_refused(&self) -> usize {
        self.count(PillChoice::NotTaken)
    }

    /// Whether either count has reached [`ENDING_THRESHOLD`].
    pub fn is_ending_reached(&self) -> bool {
        self.count_taken() >= ENDING_THRESHOLD || self.count_refused() >= ENDING_THRESHOLD
    }

    /// Classify the history with the threshold rule.
    ///
    /// Three taken is [`Ending::Bad`], three refused is [`Ending::Good`],
    /// otherwise [`Ending::Undetermined`].
    pub fn determine_ending(&self) -> Ending {
        if self.count_taken() >= ENDING_THRESHOLD {
            Ending::Bad
        } else if self.count_refused() >= ENDING_THRESHOLD {
            Ending::Good
        } else {
            Ending::Undetermined
        }
    }

    /// Copy of every day's choice, index 0 is day 1.
    pub const fn choices(&self) -> [PillChoice; Day::COUNT] {
        self.choices
    }

    fn check_for_ending(&self, sink: &mut impl EventSink) {
        if !self.is_ending_reached() {
            return;
        }
        let ending = self.determine_ending();
        info!(ending = %ending, "Ending reached");
        sink.emit(GameEvent::EndingReached { ending });
    }

    fn count(&self, wanted: PillChoice) -> usize {
        self.choices.iter().filter(|c| **c == wanted).count()
    }

    fn slot(&self, day: Day) -> PillChoice {
        self.choices
            .get(day.index())
            .copied()
            .unwrap_or(PillChoice::None)
    }

    fn write(&mut self, day: Day, choice: PillChoice) {
        if let Some(slot) = self.choices.get_mut(day.index()) {
            *slot = choice;
        }
    }
}
