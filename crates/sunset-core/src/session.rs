//! The game session: the composition root that owns every component.
//!
//! [`Game`] owns the day cycle, the ledgers, the content catalog, the
//! settings, the save slot, and the event bus. Every player-facing
//! operation goes through it, and every event it causes is delivered to
//! bus subscribers before the operation returns. Subscribers receive only
//! `&GameEvent` and cannot call back into the game while it is borrowed.

use sunset_db::{DbError, KeySchema, KeyValueStore, SaveSlot};
use sunset_events::{EventBus, EventSink, SubscriptionId};
use sunset_ledger::{EntryOutcome, LedgerError, PuzzleLedger, RoomRegistry};
use sunset_types::{
    Day, Ending, GameEvent, Phase, PillChoice, PuzzleId, RejectionKind, RoomId, RoomType, SaveSnapshot,
    Setting, TaskDifficulty,
};
use tracing::{error, info, warn};

use crate::catalog::{ContentCatalog, TaskContent};
use crate::config::GameConfig;
use crate::cycle::{CycleError, DayCycle, Ledgers, Transition};
use crate::settings::{SettingsError, SettingsState};

/// Errors returned by [`Game`] operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A ledger refused the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The day cycle refused to move.
    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// A settings change was refused.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Reading or writing the save failed.
    #[error("persistence failed: {0}")]
    Persistence(#[from] DbError),

    /// The playthrough is over.
    #[error("game is over")]
    GameOver,

    /// The operation is only valid in the morning.
    #[error("only valid in the morning (current phase: {phase:?})")]
    NotMorning {
        /// The current phase.
        phase: Phase,
    },

    /// Today's pill has not been chosen.
    #[error("no pill choice made on day {day}")]
    NoPillChoice {
        /// The current day.
        day: Day,
    },

    /// Today's task is already done.
    #[error("task for day {day} already completed")]
    TaskAlreadyCompleted {
        /// The current day.
        day: Day,
    },

    /// A task is already in progress.
    #[error("task '{task_id}' is already active")]
    TaskAlreadyActive {
        /// The active task.
        task_id: String,
    },

    /// No task is configured for this day and difficulty.
    #[error("no task configured for day {day} ({difficulty:?})")]
    NoTaskContent {
        /// The current day.
        day: Day,
        /// The difficulty asked for.
        difficulty: TaskDifficulty,
    },

    /// Hidden rooms need night, a refused pill, and today's task done.
    #[error("hidden rooms are not accessible (night, off pill, and task completed required)")]
    HiddenRoomsInaccessible {
        /// The room the caller tried to use.
        room_id: RoomId,
    },
}

impl SessionError {
    /// Classify the rejection. Persistence failures are not rejections and
    /// have no kind.
    pub const fn kind(&self) -> Option<RejectionKind> {
        match self {
            Self::Ledger(e) => Some(e.kind()),
            Self::Cycle(e) => Some(e.kind()),
            Self::Settings(e) => Some(e.kind()),
            Self::Persistence(_) => None,
            Self::TaskAlreadyCompleted { .. } | Self::TaskAlreadyActive { .. } => Some(RejectionKind::AlreadyDone),
            Self::GameOver
            | Self::NotMorning { .. }
            | Self::NoPillChoice { .. }
            | Self::NoTaskContent { .. }
            | Self::HiddenRoomsInaccessible { .. } => Some(RejectionKind::PreconditionNotMet),
        }
    }
}

/// A running playthrough over a save store.
pub struct Game<S> {
    cycle: DayCycle,
    ledgers: Ledgers,
    catalog: ContentCatalog,
    settings: SettingsState,
    active_task: Option<TaskContent>,
    active_puzzle: Option<PuzzleId>,
    /// Room layout as configured, the base for loads.
    room_layout: Vec<(RoomId, RoomType)>,
    slot: SaveSlot<S>,
    bus: EventBus,
}

impl<S: KeyValueStore> Game<S> {
    /// Build a fresh game from `config` over `store`. Nothing is loaded
    /// until [`Self::initialize`].
    pub fn new(config: &GameConfig, store: S) -> Self {
        let catalog = ContentCatalog::from_config(config);
        let room_layout = config.room_layout();
        let ledgers = Ledgers::new(
            RoomRegistry::with_types(room_layout.iter().cloned()),
            PuzzleLedger::with_rewards(catalog.lore_rewards()),
        );
        info!(
            rooms = room_layout.len(),
            tasks = catalog.task_count(),
            "Game created"
        );
        Self {
            cycle: DayCycle::new(),
            ledgers,
            catalog,
            settings: SettingsState::new(config.settings.to_settings()),
            active_task: None,
            active_puzzle: None,
            room_layout,
            slot: SaveSlot::new(store, KeySchema::new(config.save.key_prefix.as_str())),
            bus: EventBus::new(),
        }
    }

    /// Load settings, then the save if one exists. Returns whether a save
    /// was loaded.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Persistence`] if a save exists but cannot be
    /// read. The game stays at its fresh state in that case.
    pub fn initialize(&mut self) -> Result<bool, SessionError> {
        let settings = self.slot.load_settings(self.settings.defaults());
        self.settings.replace(settings);

        if !self.slot.save_exists() {
            info!("No save found, starting a new game");
            return Ok(false);
        }
        self.load()?;
        Ok(true)
    }

    /// Register an event handler.
    pub fn subscribe(&mut self, handler: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        self.bus.subscribe(handler)
    }

    /// Remove an event handler.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The current day.
    pub const fn day(&self) -> Day {
        self.cycle.day()
    }

    /// The current phase.
    pub const fn phase(&self) -> Phase {
        self.cycle.phase()
    }

    /// Whether the playthrough is over.
    pub const fn is_game_over(&self) -> bool {
        self.cycle.is_game_over()
    }

    /// The day cycle.
    pub const fn cycle(&self) -> &DayCycle {
        &self.cycle
    }

    /// The ledgers.
    pub const fn ledgers(&self) -> &Ledgers {
        &self.ledgers
    }

    /// The content catalog.
    pub const fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    /// The settings.
    pub const fn settings(&self) -> &SettingsState {
        &self.settings
    }

    /// The task in progress, if any.
    pub const fn active_task(&self) -> Option<&TaskContent> {
        self.active_task.as_ref()
    }

    /// The puzzle presented tonight, if any.
    pub const fn active_puzzle(&self) -> Option<&PuzzleId> {
        self.active_puzzle.as_ref()
    }

    /// The save slot.
    pub const fn save_slot(&self) -> &SaveSlot<S> {
        &self.slot
    }

    /// Ending classification of the pill history so far.
    pub fn ending(&self) -> Ending {
        self.ledgers.pills.determine_ending()
    }

    /// Whether hidden rooms can be used right now.
    pub fn can_access_hidden_rooms(&self) -> bool {
        self.cycle.can_access_hidden_rooms(&self.ledgers)
    }

    // =========================================================================
    // Play
    // =========================================================================

    /// Record today's pill choice.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::GameOver`] after the game ended, or the
    /// ledger's rejection.
    pub fn record_pill(&mut self, choice: PillChoice) -> Result<(), SessionError> {
        self.ensure_running()?;
        let day = self.cycle.day().get();
        self.ledgers.pills.record_choice(day, choice, &mut self.bus)?;
        Ok(())
    }

    /// Present today's task.
    ///
    /// Requires the morning, today's pill, no task done or in progress, and
    /// configured content. Taking the pill gives the easy task, refusing it
    /// the hard one.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] naming the unmet precondition.
    pub fn spawn_task(&mut self) -> Result<&TaskContent, SessionError> {
        self.ensure_running()?;
        let day = self.cycle.day();
        self.ensure_morning()?;
        let choice = self.ledgers.pills.choice(day.get());
        if !choice.is_made() {
            warn!(day = %day, "Cannot spawn task: no pill choice made today");
            return Err(SessionError::NoPillChoice { day });
        }
        if self.ledgers.tasks.is_completed(day.get()) {
            warn!(day = %day, "Task already completed today");
            return Err(SessionError::TaskAlreadyCompleted { day });
        }
        if let Some(task) = &self.active_task {
            warn!(task_id = %task.id, "A task is already active");
            return Err(SessionError::TaskAlreadyActive {
                task_id: task.id.to_string(),
            });
        }

        let difficulty = TaskDifficulty::for_choice(choice);
        let Some(task) = self.catalog.task_for(day, difficulty).cloned() else {
            warn!(day = %day, difficulty = ?difficulty, "No task configured");
            return Err(SessionError::NoTaskContent { day, difficulty });
        };

        info!(task_id = %task.id, day = %day, difficulty = ?difficulty, "Task spawned");
        self.bus.emit(GameEvent::TaskSpawned {
            task_id: task.id.clone(),
            day,
            difficulty,
        });
        Ok(self.active_task.insert(task))
    }

    /// Finish today's task and move into the night.
    ///
    /// An active task is not required; a task provider may report completion
    /// on its own.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] naming the unmet precondition. Nothing is
    /// marked complete in that case.
    pub fn complete_active_task(&mut self) -> Result<Transition, SessionError> {
        self.ensure_running()?;
        self.ensure_morning()?;
        let day = self.cycle.day();
        if !self.ledgers.pills.has_choice(day.get()) {
            warn!(day = %day, "Cannot complete task: no pill choice made today");
            return Err(SessionError::NoPillChoice { day });
        }

        self.ledgers.tasks.complete_day(day.get(), &mut self.bus)?;
        self.active_task = None;
        let transition = self.cycle.task_completed(&mut self.ledgers, &mut self.bus)?;
        Ok(transition)
    }

    /// Advance the day cycle one phase.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Cycle`] with the unmet precondition.
    pub fn advance(&mut self) -> Result<Transition, SessionError> {
        let transition = self.cycle.advance(&mut self.ledgers, &mut self.bus)?;
        if let Transition::NewDay(_) = transition {
            self.active_task = None;
            self.active_puzzle = None;
        }
        Ok(transition)
    }

    /// Discover a hidden room by hand.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::HiddenRoomsInaccessible`] outside off-pill
    /// nights, or the registry's rejection.
    pub fn discover_room(&mut self, room_id: &RoomId) -> Result<(), SessionError> {
        self.ensure_hidden_room_access(room_id)?;
        self.ledgers.rooms.discover(room_id, &mut self.bus)?;
        Ok(())
    }

    /// Enter a discovered hidden room. Tonight's puzzle is presented if it
    /// is still unsolved.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::HiddenRoomsInaccessible`] outside off-pill
    /// nights, or the registry's rejection.
    pub fn enter_room(&mut self, room_id: &RoomId) -> Result<EntryOutcome, SessionError> {
        self.ensure_hidden_room_access(room_id)?;
        let outcome = self.ledgers.rooms.enter(room_id, &mut self.bus)?;

        let puzzle_id = PuzzleId::for_day(self.cycle.day());
        if self.ledgers.puzzles.is_completed(&puzzle_id) {
            info!(puzzle_id = %puzzle_id, "Tonight's puzzle already completed");
        } else {
            info!(puzzle_id = %puzzle_id, room_id = %room_id, "Puzzle spawned");
            self.bus.emit(GameEvent::PuzzleSpawned {
                puzzle_id: puzzle_id.clone(),
            });
            self.active_puzzle = Some(puzzle_id);
        }
        Ok(outcome)
    }

    /// Mark a puzzle solved and unlock its lore.
    ///
    /// # Errors
    ///
    /// Returns the ledger's rejection for blank or already solved puzzles.
    pub fn complete_puzzle(&mut self, puzzle_id: &PuzzleId) -> Result<(), SessionError> {
        self.ledgers.puzzles.complete(puzzle_id, &mut self.bus)?;
        if self.active_puzzle.as_ref() == Some(puzzle_id) {
            self.active_puzzle = None;
        }
        Ok(())
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Change a setting and persist it. A failed write is logged; the new
    /// value stays in effect.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Settings`] for non-finite values.
    pub fn set_setting(&mut self, setting: Setting, value: f32) -> Result<f32, SessionError> {
        let value = self.settings.set(setting, value, &mut self.bus)?;
        if let Err(e) = self.slot.save_setting(setting, value) {
            error!(setting = setting.key(), error = %e, "Failed to persist setting");
        }
        Ok(value)
    }

    /// Restore default settings and persist them.
    pub fn reset_settings(&mut self) {
        self.settings.reset(&mut self.bus);
        if let Err(e) = self.slot.save_settings(&self.settings.current()) {
            error!(error = %e, "Failed to persist settings");
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Everything a save holds, copied out of the live state.
    pub fn snapshot(&self) -> SaveSnapshot {
        SaveSnapshot {
            day: self.cycle.day(),
            phase: self.cycle.phase(),
            game_over: self.cycle.is_game_over(),
            pills: self.ledgers.pills.choices(),
            tasks: self.ledgers.tasks.completed(),
            door_states: self.ledgers.rooms.door_states(),
            room_types: self.ledgers.rooms.room_types(),
            rooms_discovered_tonight: self.ledgers.rooms.discovered_this_night(),
            rooms_entered_tonight: self.ledgers.rooms.entered_this_night(),
            completed_puzzles: self.ledgers.puzzles.completed_puzzles(),
            unlocked_lore: self.ledgers.puzzles.unlocked_lore(),
        }
    }

    /// Replace the live state with `snapshot`. No gameplay events fire.
    pub fn restore(&mut self, snapshot: &SaveSnapshot) {
        self.ledgers.reset();
        self.active_task = None;
        self.active_puzzle = None;

        self.cycle.set_day(i64::from(snapshot.day.get()));
        self.cycle.set_phase(snapshot.phase);
        self.cycle.set_game_over(snapshot.game_over);

        for (day, (choice, done)) in Day::all().zip(snapshot.pills.into_iter().zip(snapshot.tasks)) {
            // Days from `Day::all` are always in range.
            let _ = self.ledgers.pills.set_choice(day.get(), choice);
            let _ = self.ledgers.tasks.set_completed(day.get(), done);
        }
        for (room_id, room_type) in &snapshot.room_types {
            if let Err(e) = self.ledgers.rooms.set_room_type(room_id, *room_type) {
                warn!(error = %e, "Skipping saved room type");
            }
        }
        for (room_id, state) in &snapshot.door_states {
            if let Err(e) = self.ledgers.rooms.set_door_state(room_id, *state) {
                warn!(error = %e, "Skipping saved door state");
            }
        }
        self.ledgers
            .rooms
            .set_night_counters(snapshot.rooms_discovered_tonight, snapshot.rooms_entered_tonight);
        self.ledgers
            .puzzles
            .set_completed_puzzles(snapshot.completed_puzzles.clone());
        self.ledgers.puzzles.set_unlocked_lore(snapshot.unlocked_lore.clone());
    }

    /// The state a fresh game starts from, used as the base for loads.
    fn fresh_snapshot(&self) -> SaveSnapshot {
        SaveSnapshot {
            door_states: self
                .room_layout
                .iter()
                .map(|(id, room_type)| (id.clone(), room_type.initial_door_state()))
                .collect(),
            room_types: self.room_layout.clone(),
            ..SaveSnapshot::default()
        }
    }

    /// Write the current state to the save slot.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Persistence`] if the write fails. The previous
    /// save and the live state are both untouched.
    pub fn save(&mut self) -> Result<(), SessionError> {
        let snapshot = self.snapshot();
        if let Err(e) = self.slot.save(&snapshot) {
            error!(error = %e, "Save failed");
            return Err(e.into());
        }
        self.bus.emit(GameEvent::GameSaved);
        Ok(())
    }

    /// Replace the live state with the saved one.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Persistence`] if there is no save. The live
    /// state is untouched in that case.
    pub fn load(&mut self) -> Result<(), SessionError> {
        let snapshot = match self.slot.load(&self.fresh_snapshot()) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(error = %e, "Load failed");
                return Err(e.into());
            }
        };
        self.restore(&snapshot);
        info!(day = %self.cycle.day(), phase = ?self.cycle.phase(), "Save restored");
        self.bus.emit(GameEvent::GameLoaded);
        Ok(())
    }

    /// Delete the save and start over. Settings are kept.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Persistence`] if the store rejects the delete.
    /// The live state is untouched in that case.
    pub fn delete_save(&mut self) -> Result<(), SessionError> {
        if let Err(e) = self.slot.delete() {
            error!(error = %e, "Delete failed");
            return Err(e.into());
        }
        self.cycle.reset();
        self.ledgers.reset();
        self.active_task = None;
        self.active_puzzle = None;
        self.bus.emit(GameEvent::SaveDeleted);
        Ok(())
    }

    // =========================================================================
    // Guards
    // =========================================================================

    fn ensure_running(&self) -> Result<(), SessionError> {
        if self.cycle.is_game_over() {
            warn!("Game is over");
            return Err(SessionError::GameOver);
        }
        Ok(())
    }

    fn ensure_morning(&self) -> Result<(), SessionError> {
        let phase = self.cycle.phase();
        if phase != Phase::Morning {
            warn!(phase = ?phase, "Only valid in the morning");
            return Err(SessionError::NotMorning { phase });
        }
        Ok(())
    }

    /// Known hidden rooms need tonight's access; anything else falls
    /// through to the registry, which reports it.
    fn ensure_hidden_room_access(&self, room_id: &RoomId) -> Result<(), SessionError> {
        let hidden = self.ledgers.rooms.contains(room_id)
            && self.ledgers.rooms.room_type(room_id) == RoomType::Hidden;
        if hidden && !self.can_access_hidden_rooms() {
            warn!(room_id = %room_id, "Hidden room access not allowed");
            return Err(SessionError::HiddenRoomsInaccessible {
                room_id: room_id.clone(),
            });
        }
        Ok(())
    }
}

impl<S> core::fmt::Debug for Game<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Game")
            .field("cycle", &self.cycle)
            .field("active_task", &self.active_task)
            .field("active_puzzle", &self.active_puzzle)
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}
