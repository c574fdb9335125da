//! End-to-end playthroughs of the `sunset-core` game session.
//!
//! Every test drives a [`Game`] over an in-memory store and checks the
//! events delivered to a bus subscriber.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use sunset_core::{CycleError, Game, GameConfig, SessionError, Transition};
use sunset_db::{KeyValueStore, MemoryStore};
use sunset_ledger::{EntryOutcome, LedgerError, PillLedger};
use sunset_types::{
    Day, DoorState, Ending, GameEvent, LoreId, Phase, PillChoice, PuzzleId, RoomId, RoomType,
    SaveSnapshot, Setting, TaskDifficulty,
};

type Log = Rc<RefCell<Vec<GameEvent>>>;

fn game() -> (Game<MemoryStore>, Log) {
    let mut game = Game::new(&GameConfig::default(), MemoryStore::new());
    let log: Log = Rc::default();
    let sink = Rc::clone(&log);
    game.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    (game, log)
}

fn day(n: u8) -> Day {
    Day::new(n).unwrap()
}

/// Pill, task, and into the night.
fn play_morning(game: &mut Game<MemoryStore>, choice: PillChoice) -> Transition {
    game.record_pill(choice).unwrap();
    game.spawn_task().unwrap();
    game.complete_active_task().unwrap()
}

/// Enter tonight's room and solve tonight's puzzle, then advance.
fn play_off_pill_night(game: &mut Game<MemoryStore>) -> Transition {
    let room = game
        .ledgers()
        .rooms
        .door_states()
        .into_iter()
        .find(|(_, state)| *state == DoorState::Discovered || *state == DoorState::Entered)
        .map(|(id, _)| id)
        .unwrap();
    game.enter_room(&room).unwrap();
    game.complete_puzzle(&PuzzleId::for_day(game.day())).unwrap();
    game.advance().unwrap()
}

#[test]
fn scenario_a_second_choice_is_rejected() {
    let (mut game, _log) = game();
    game.record_pill(PillChoice::Taken).unwrap();

    let again = game.record_pill(PillChoice::NotTaken);
    assert!(matches!(
        again,
        Err(SessionError::Ledger(LedgerError::ChoiceAlreadyRecorded { .. }))
    ));
    assert_eq!(game.ledgers().pills.choice(1), PillChoice::Taken);
}

#[test]
fn scenario_b_three_taken_is_bad_ending() {
    let (mut game, log) = game();
    // Day 1 forced Taken, day 2 forced NotTaken, then Taken on days 3 and 4.
    assert_eq!(play_morning(&mut game, PillChoice::Taken), Transition::NightBegan);
    game.advance().unwrap();
    play_morning(&mut game, PillChoice::NotTaken);
    play_off_pill_night(&mut game);
    play_morning(&mut game, PillChoice::Taken);
    game.advance().unwrap();

    game.record_pill(PillChoice::Taken).unwrap();
    assert!(game.ledgers().pills.is_ending_reached());
    assert_eq!(game.ending(), Ending::Bad);
    assert!(log.borrow().contains(&GameEvent::EndingReached { ending: Ending::Bad }));

    // The night still falls and its event precedes the early ending.
    game.spawn_task().unwrap();
    assert_eq!(game.complete_active_task().unwrap(), Transition::EndedEarly(day(4)));
    let events = log.borrow();
    let night = events
        .iter()
        .position(|e| *e == GameEvent::NightOnPill { day: day(4) })
        .unwrap();
    let ended = events
        .iter()
        .position(|e| *e == GameEvent::EndedEarly { day: day(4) })
        .unwrap();
    assert!(night < ended);
    assert!(game.is_game_over());
}

#[test]
fn scenario_c_off_pill_night_waits_for_puzzle() {
    let (mut game, _log) = game();
    play_morning(&mut game, PillChoice::Taken);
    game.advance().unwrap();
    play_morning(&mut game, PillChoice::NotTaken);
    play_off_pill_night(&mut game);

    assert_eq!(game.day(), day(3));
    play_morning(&mut game, PillChoice::NotTaken);
    assert_eq!(game.phase(), Phase::Night);

    let refused = game.advance();
    assert!(matches!(
        refused,
        Err(SessionError::Cycle(CycleError::PuzzleIncomplete { .. }))
    ));
    assert_eq!((game.day(), game.phase()), (day(3), Phase::Night));

    game.complete_puzzle(&PuzzleId::from("puzzle_day_3")).unwrap();
    assert_eq!(game.advance().unwrap(), Transition::NewDay(day(4)));
    assert_eq!(game.phase(), Phase::Morning);
}

#[test]
fn scenario_d_last_off_pill_night_completes_game() {
    let (mut game, log) = game();
    play_morning(&mut game, PillChoice::Taken);
    game.advance().unwrap();
    play_morning(&mut game, PillChoice::NotTaken);
    play_off_pill_night(&mut game);
    play_morning(&mut game, PillChoice::Taken);
    game.advance().unwrap();
    play_morning(&mut game, PillChoice::NotTaken);
    play_off_pill_night(&mut game);

    assert_eq!(game.day(), day(5));
    assert_eq!(play_morning(&mut game, PillChoice::NotTaken), Transition::GameComplete);
    // Three refusals reach the good ending on the last night.
    assert_eq!(game.ending(), Ending::Good);
    assert!(game.is_game_over());
    assert!(matches!(
        game.advance(),
        Err(SessionError::Cycle(CycleError::GameOver))
    ));
    assert_eq!(log.borrow().last(), Some(&GameEvent::GameComplete));
}

#[test]
fn scenario_d_final_discovery_precedes_completion() {
    let (mut game, log) = game();
    let mut snapshot = game.snapshot();
    snapshot.day = day(5);
    snapshot.phase = Phase::Night;
    snapshot.pills = [
        PillChoice::Taken,
        PillChoice::NotTaken,
        PillChoice::Taken,
        PillChoice::NotTaken,
        PillChoice::NotTaken,
    ];
    snapshot.tasks = [true; Day::COUNT];
    snapshot.completed_puzzles.insert(PuzzleId::for_day(day(5)));
    game.restore(&snapshot);

    assert_eq!(game.advance().unwrap(), Transition::GameComplete);
    assert_eq!(
        *log.borrow(),
        vec![
            GameEvent::FinalDiscovery { day: day(5) },
            GameEvent::GameComplete,
        ]
    );
    let frozen = game.snapshot();
    assert!(game.advance().is_err());
    assert_eq!(game.snapshot(), frozen);
}

#[test]
fn task_board_follows_pill() {
    let (mut game, log) = game();
    assert!(matches!(game.spawn_task(), Err(SessionError::NoPillChoice { .. })));

    game.record_pill(PillChoice::Taken).unwrap();
    let task = game.spawn_task().unwrap();
    assert_eq!(task.difficulty, TaskDifficulty::Easy);
    assert!(matches!(game.spawn_task(), Err(SessionError::TaskAlreadyActive { .. })));

    game.complete_active_task().unwrap();
    assert!(game.active_task().is_none());
    assert!(matches!(game.spawn_task(), Err(SessionError::GameOver | SessionError::NotMorning { .. })));
    assert!(log.borrow().contains(&GameEvent::TaskCompleted { day: day(1) }));
}

#[test]
fn hidden_rooms_need_off_pill_night() {
    let (mut game, _log) = game();
    let room = RoomId::from("room_1");
    assert!(matches!(
        game.enter_room(&room),
        Err(SessionError::HiddenRoomsInaccessible { .. })
    ));

    play_morning(&mut game, PillChoice::Taken);
    assert!(!game.can_access_hidden_rooms());
    assert!(game.discover_room(&room).is_err());
    game.advance().unwrap();

    play_morning(&mut game, PillChoice::NotTaken);
    assert!(game.can_access_hidden_rooms());
    // Auto-discovery used tonight's quota on room_1.
    assert_eq!(game.ledgers().rooms.door_state(&room), DoorState::Discovered);
    assert!(matches!(
        game.discover_room(&RoomId::from("room_2")),
        Err(SessionError::Ledger(LedgerError::NightQuotaUsed { .. }))
    ));

    assert_eq!(game.enter_room(&room).unwrap(), EntryOutcome::FirstEntry);
    assert_eq!(game.active_puzzle(), Some(&PuzzleId::from("puzzle_day_2")));
    game.complete_puzzle(&PuzzleId::from("puzzle_day_2")).unwrap();
    assert!(game.active_puzzle().is_none());
    assert!(game
        .ledgers()
        .puzzles
        .is_lore_unlocked(&LoreId::from("lore_day_2")));
    assert_eq!(game.enter_room(&room).unwrap(), EntryOutcome::ReEntry);
}

#[test]
fn configured_room_without_type_is_discoverable() {
    let config = GameConfig::parse("rooms:\n  - id: attic\n").unwrap();
    let game = Game::new(&config, MemoryStore::new());
    let attic = RoomId::from("attic");

    let rooms = &game.ledgers().rooms;
    assert_eq!(rooms.room_type(&attic), RoomType::Hidden);
    assert_eq!(rooms.door_state(&attic), DoorState::Locked);
    assert_eq!(rooms.next_locked_hidden_room(), Some(&attic));
}

#[test]
fn save_load_delete_lifecycle() {
    let (mut game, log) = game();
    play_morning(&mut game, PillChoice::Taken);
    game.advance().unwrap();
    play_morning(&mut game, PillChoice::NotTaken);
    game.set_setting(Setting::MusicVolume, 0.3).unwrap();
    game.save().unwrap();
    let saved = game.snapshot();

    play_off_pill_night(&mut game);
    assert_ne!(game.snapshot(), saved);

    game.load().unwrap();
    assert_eq!(game.snapshot(), saved);

    game.delete_save().unwrap();
    assert_eq!((game.day(), game.phase(), game.is_game_over()), (Day::FIRST, Phase::Morning, false));
    assert!(!game.save_slot().save_exists());
    assert!(game.save_slot().store().has_key("MusicVolume"));
    assert!(matches!(game.load(), Err(SessionError::Persistence(_))));

    let events = log.borrow();
    for expected in [GameEvent::GameSaved, GameEvent::GameLoaded, GameEvent::SaveDeleted] {
        assert!(events.contains(&expected));
    }
}

#[test]
fn reload_mid_night_keeps_discovery_quota() {
    let (mut game, _log) = game();
    play_morning(&mut game, PillChoice::Taken);
    game.advance().unwrap();
    play_morning(&mut game, PillChoice::NotTaken);
    assert_eq!(game.ledgers().rooms.discovered_this_night(), 1);

    game.save().unwrap();
    game.load().unwrap();

    assert_eq!(game.ledgers().rooms.discovered_this_night(), 1);
    let second = game.discover_room(&RoomId::from("room_2"));
    assert!(matches!(
        second,
        Err(SessionError::Ledger(LedgerError::NightQuotaUsed { .. }))
    ));
    assert_eq!(game.ledgers().rooms.door_state(&RoomId::from("room_2")), DoorState::Locked);
}

#[test]
fn initialize_restores_previous_session() {
    let (mut first, _log) = game();
    play_morning(&mut first, PillChoice::Taken);
    first.set_setting(Setting::Brightness, 0.9).unwrap();
    first.save().unwrap();
    let store = first.save_slot().store().clone();

    let mut second = Game::new(&GameConfig::default(), store);
    assert!(second.initialize().unwrap());
    assert_eq!(second.snapshot(), first.snapshot());
    assert!((second.settings().get(Setting::Brightness) - 0.9).abs() < f32::EPSILON);

    let mut fresh = Game::new(&GameConfig::default(), MemoryStore::new());
    assert!(!fresh.initialize().unwrap());
}

/// A choice for days 3-5; days 1-2 are forced.
fn free_choice() -> impl Strategy<Value = PillChoice> {
    prop_oneof![Just(PillChoice::Taken), Just(PillChoice::NotTaken)]
}

proptest! {
    /// Play a random number of phases, save, scramble, load: the state
    /// comes back exactly.
    #[test]
    fn save_load_round_trips_reachable_states(
        choices in proptest::collection::vec(free_choice(), 3),
        steps in 0_usize..12,
    ) {
        let (mut game, _log) = game();
        for _ in 0..steps {
            if game.is_game_over() {
                break;
            }
            let today = game.day();
            match game.phase() {
                Phase::Morning => {
                    let choice = PillLedger::forced_choice(today.get())
                        .unwrap_or_else(|| choices[usize::from(today.get()) - 3]);
                    play_morning(&mut game, choice);
                }
                Phase::Night => {
                    if game.can_access_hidden_rooms() {
                        play_off_pill_night(&mut game);
                    } else {
                        game.advance().unwrap();
                    }
                }
            }
        }

        let before = game.snapshot();
        let ledgers = game.ledgers().clone();
        game.save().unwrap();

        // Scramble the live state, then load it back.
        game.restore(&SaveSnapshot::default());
        game.load().unwrap();
        prop_assert_eq!(game.snapshot(), before);
        prop_assert_eq!(game.ledgers(), &ledgers);
    }
}
