//! The day cycle: current day, phase, and the game-over flag.
//!
//! The cycle is the single owner of temporal state. It never touches ledger
//! internals; it reads the ledgers to gate transitions and calls their
//! operations when a transition has side effects (resetting the nightly
//! room counters, auto-discovering a hidden room).
//!
//! # Transitions
//!
//! ```text
//! Morning --advance / task_completed--> Night --advance--> next Morning
//!                                          |                   (day 5: game over)
//!                                          +-- ending reached --> game over
//! ```
//!
//! Both ways into the night run the same night branch, in this order:
//! `PhaseChanged(Night)`, the pill-branch night event, the room counter
//! reset, auto-discovery (off pill) or the bedroom restriction (on pill),
//! and finally the ending check. The night event fires before the ending
//! check so its side effects still happen on the night the game ends.

use sunset_events::EventSink;
use sunset_ledger::{PillLedger, PuzzleLedger, RoomRegistry, TaskTracker};
use sunset_types::{Day, GameEvent, Phase, PillChoice, PuzzleId, RejectionKind};
use tracing::{debug, info, warn};

/// Every ledger the cycle consults, owned together by the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledgers {
    /// Pill choice per day.
    pub pills: PillLedger,
    /// Task completion per day.
    pub tasks: TaskTracker,
    /// Hidden-room door states.
    pub rooms: RoomRegistry,
    /// Solved puzzles and unlocked lore.
    pub puzzles: PuzzleLedger,
}

impl Ledgers {
    /// Fresh ledgers around the given room registry and puzzle rewards.
    pub fn new(rooms: RoomRegistry, puzzles: PuzzleLedger) -> Self {
        Self {
            pills: PillLedger::new(),
            tasks: TaskTracker::new(),
            rooms,
            puzzles,
        }
    }

    /// Reset every ledger to its initial state.
    pub fn reset(&mut self) {
        self.pills.reset();
        self.tasks.reset();
        self.rooms.reset();
        self.puzzles.reset();
    }
}

/// Reasons the cycle refuses to move.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CycleError {
    /// The playthrough is over.
    #[error("game is over, no further transitions")]
    GameOver,

    /// No pill choice has been recorded for today.
    #[error("no pill choice recorded for day {day}")]
    NoPillChoice {
        /// The current day.
        day: Day,
    },

    /// Today's task is not done.
    #[error("task for day {day} is not completed")]
    TaskIncomplete {
        /// The current day.
        day: Day,
    },

    /// Off-pill nights need tonight's puzzle solved before morning.
    #[error("puzzle '{puzzle_id}' must be completed before day {day} can end")]
    PuzzleIncomplete {
        /// The current day.
        day: Day,
        /// The puzzle still outstanding.
        puzzle_id: PuzzleId,
    },

    /// The operation is only valid in the morning.
    #[error("only valid in the morning (current phase: {phase:?})")]
    NotMorning {
        /// The current phase.
        phase: Phase,
    },
}

impl CycleError {
    /// Classify the rejection.
    pub const fn kind(&self) -> RejectionKind {
        RejectionKind::PreconditionNotMet
    }
}

/// What a successful transition did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Night began and play continues.
    NightBegan,
    /// Night began, an ending was reached before the last day, and the game
    /// is over.
    EndedEarly(Day),
    /// A new morning began on the given day.
    NewDay(Day),
    /// The game ran to completion.
    GameComplete,
}

impl Transition {
    /// Whether this transition ended the game.
    pub const fn ends_game(self) -> bool {
        matches!(self, Self::EndedEarly(_) | Self::GameComplete)
    }
}

/// Current day, phase, and game-over flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayCycle {
    day: Day,
    phase: Phase,
    game_over: bool,
}

impl DayCycle {
    /// Day 1, morning, game in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current day.
    pub const fn day(&self) -> Day {
        self.day
    }

    /// The current phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the playthrough is over.
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Back to day 1, morning, game in progress.
    pub fn reset(&mut self) {
        *self = Self::default();
        info!("Day cycle reset");
    }

    /// Set the day, clamped to `1..=5`. Load only.
    pub fn set_day(&mut self, day: i64) {
        self.day = Day::clamped(day);
    }

    /// Set the phase. Load only.
    pub const fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Set the game-over flag. Load only.
    pub const fn set_game_over(&mut self, game_over: bool) {
        self.game_over = game_over;
    }

    /// Whether hidden rooms may be used right now: it is night, today's pill
    /// was refused, and today's task is done.
    pub fn can_access_hidden_rooms(&self, ledgers: &Ledgers) -> bool {
        self.phase == Phase::Night
            && ledgers.pills.choice(self.day.get()) == PillChoice::NotTaken
            && ledgers.tasks.is_completed(self.day.get())
    }

    /// Move to the next phase.
    ///
    /// In the morning this requires today's pill choice and today's task. At
    /// night it requires today's task and, when today's pill was refused,
    /// tonight's puzzle. On a refusal the state is unchanged.
    pub fn advance(&mut self, ledgers: &mut Ledgers, sink: &mut impl EventSink) -> Result<Transition, CycleError> {
        self.ensure_running()?;
        match self.phase {
            Phase::Morning => {
                self.ensure_pill_chosen(ledgers)?;
                self.ensure_task_done(ledgers)?;
                Ok(self.begin_night(ledgers, sink))
            }
            Phase::Night => self.end_night(ledgers, sink),
        }
    }

    /// Move from morning to night because today's task was just completed.
    ///
    /// Unlike [`Self::advance`], this does not re-check the task flag; the
    /// caller has just set it.
    pub fn task_completed(&mut self, ledgers: &mut Ledgers, sink: &mut impl EventSink) -> Result<Transition, CycleError> {
        self.ensure_running()?;
        if self.phase != Phase::Morning {
            warn!(phase = ?self.phase, "Task completion outside the morning ignored");
            return Err(CycleError::NotMorning { phase: self.phase });
        }
        self.ensure_pill_chosen(ledgers)?;
        Ok(self.begin_night(ledgers, sink))
    }

    fn ensure_running(&self) -> Result<(), CycleError> {
        if self.game_over {
            warn!(day = %self.day, "Game is over, transition ignored");
            return Err(CycleError::GameOver);
        }
        Ok(())
    }

    fn ensure_pill_chosen(&self, ledgers: &Ledgers) -> Result<(), CycleError> {
        if !ledgers.pills.has_choice(self.day.get()) {
            warn!(day = %self.day, "Cannot advance: no pill choice today");
            return Err(CycleError::NoPillChoice { day: self.day });
        }
        Ok(())
    }

    fn ensure_task_done(&self, ledgers: &Ledgers) -> Result<(), CycleError> {
        if !ledgers.tasks.is_completed(self.day.get()) {
            warn!(day = %self.day, "Cannot advance: today's task is not completed");
            return Err(CycleError::TaskIncomplete { day: self.day });
        }
        Ok(())
    }

    fn begin_night(&mut self, ledgers: &mut Ledgers, sink: &mut impl EventSink) -> Transition {
        let day = self.day;
        self.phase = Phase::Night;
        info!(day = %day, "Night begins");
        sink.emit(GameEvent::PhaseChanged { phase: Phase::Night });

        let off_pill = ledgers.pills.choice(day.get()) == PillChoice::NotTaken;
        if off_pill {
            sink.emit(GameEvent::NightOffPill { day });
        } else {
            sink.emit(GameEvent::NightOnPill { day });
        }

        ledgers.rooms.reset_night_counters();

        if off_pill {
            self.auto_discover(ledgers, sink);
        } else {
            debug!(day = %day, "On pill, bedroom restricted tonight");
            sink.emit(GameEvent::BedroomRestrictionActive);
        }

        self.check_ending(ledgers, sink)
    }

    /// Discover the next locked hidden room, if tonight allows it.
    fn auto_discover(&self, ledgers: &mut Ledgers, sink: &mut impl EventSink) {
        if !self.can_access_hidden_rooms(ledgers) {
            debug!(day = %self.day, "Hidden rooms not accessible tonight");
            return;
        }
        let Some(room_id) = ledgers.rooms.next_locked_hidden_room().cloned() else {
            info!(day = %self.day, "All hidden rooms already discovered");
            return;
        };
        if let Err(e) = ledgers.rooms.discover(&room_id, sink) {
            warn!(room_id = %room_id, error = %e, "Auto-discovery failed");
        }
    }

    fn check_ending(&mut self, ledgers: &Ledgers, sink: &mut impl EventSink) -> Transition {
        if !ledgers.pills.is_ending_reached() {
            return Transition::NightBegan;
        }

        self.game_over = true;
        let ending = ledgers.pills.determine_ending();
        if self.day.is_last() {
            info!(day = %self.day, ending = %ending, "Ending reached on the last day");
            sink.emit(GameEvent::GameComplete);
            Transition::GameComplete
        } else {
            info!(day = %self.day, ending = %ending, "Game ended early");
            sink.emit(GameEvent::EndedEarly { day: self.day });
            Transition::EndedEarly(self.day)
        }
    }

    fn end_night(&mut self, ledgers: &Ledgers, sink: &mut impl EventSink) -> Result<Transition, CycleError> {
        let day = self.day;
        self.ensure_task_done(ledgers)?;

        let off_pill = ledgers.pills.choice(day.get()) == PillChoice::NotTaken;
        if off_pill {
            let puzzle_id = PuzzleId::for_day(day);
            if !ledgers.puzzles.is_completed(&puzzle_id) {
                warn!(day = %day, puzzle_id = %puzzle_id, "Cannot advance: tonight's puzzle is not completed");
                return Err(CycleError::PuzzleIncomplete { day, puzzle_id });
            }
        }

        let Some(next) = day.next() else {
            if off_pill {
                info!(day = %day, "Final discovery");
                sink.emit(GameEvent::FinalDiscovery { day });
            }
            self.game_over = true;
            info!(day = %day, "Game complete");
            sink.emit(GameEvent::GameComplete);
            return Ok(Transition::GameComplete);
        };

        self.day = next;
        self.phase = Phase::Morning;
        info!(day = %next, "New day");
        sink.emit(GameEvent::DayChanged { day: next });
        sink.emit(GameEvent::PhaseChanged {
            phase: Phase::Morning,
        });
        Ok(Transition::NewDay(next))
    }
}
