//! Integration tests for the `sunset-db` file store.
//!
//! Each test works in its own directory under the system temp dir.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

use std::fs;
use std::path::PathBuf;

use sunset_db::{DbError, FileStore, KeySchema, KeyValueStore, SaveSlot};
use sunset_types::{Day, DoorState, Phase, PillChoice, PuzzleId, RoomId, RoomType, SaveSnapshot, Settings};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sunset-db-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn snapshot() -> SaveSnapshot {
    SaveSnapshot {
        day: Day::new(2).unwrap(),
        phase: Phase::Night,
        pills: [
            PillChoice::Taken,
            PillChoice::NotTaken,
            PillChoice::None,
            PillChoice::None,
            PillChoice::None,
        ],
        tasks: [true, true, false, false, false],
        door_states: vec![(RoomId::from("room_1"), DoorState::Discovered)],
        room_types: vec![(RoomId::from("room_1"), RoomType::Hidden)],
        completed_puzzles: [PuzzleId::from("puzzle_day_1")].into_iter().collect(),
        ..SaveSnapshot::default()
    }
}

fn base() -> SaveSnapshot {
    SaveSnapshot {
        door_states: vec![(RoomId::from("room_1"), DoorState::Locked)],
        room_types: vec![(RoomId::from("room_1"), RoomType::Hidden)],
        ..SaveSnapshot::default()
    }
}

#[test]
fn save_survives_reopen() {
    let dir = scratch_dir("reopen");
    let path = dir.join("save.json");

    let mut slot = SaveSlot::new(FileStore::open(&path).unwrap(), KeySchema::default());
    slot.save(&snapshot()).unwrap();
    slot.save_settings(&Settings::default()).unwrap();

    let reopened = SaveSlot::new(FileStore::open(&path).unwrap(), KeySchema::default());
    assert!(reopened.save_exists());
    assert_eq!(reopened.load(&base()).unwrap(), snapshot());
    assert_eq!(reopened.load_settings(Settings::default()), Settings::default());

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn failed_write_keeps_previous_state() {
    let dir = scratch_dir("failed-write");
    let path = dir.join("save.json");

    let mut slot = SaveSlot::new(FileStore::open(&path).unwrap(), KeySchema::default());
    slot.save(&snapshot()).unwrap();

    // Removing the directory makes the temp file impossible to create.
    fs::remove_dir_all(&dir).unwrap();
    let mut later = snapshot();
    later.day = Day::LAST;
    let result = slot.save(&later);
    assert!(matches!(result, Err(DbError::Io(_))));

    // The in-memory view still holds the last successful save.
    assert_eq!(slot.load(&base()).unwrap(), snapshot());
}

#[test]
fn corrupt_file_is_reported() {
    let dir = scratch_dir("corrupt");
    let path = dir.join("save.json");
    fs::write(&path, "{not json").unwrap();

    let result = FileStore::open(&path);
    assert!(matches!(result, Err(DbError::Serialization(_))));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn delete_writes_through() {
    let dir = scratch_dir("delete");
    let path = dir.join("save.json");

    let mut slot = SaveSlot::new(FileStore::open(&path).unwrap(), KeySchema::new("slot1."));
    slot.save(&snapshot()).unwrap();
    slot.delete().unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert!(!reopened.has_key("slot1.SaveExists"));
    assert!(!reopened.has_key("slot1.CurrentDay"));
    assert!(!path.with_file_name("save.json.tmp").exists());

    let _ = fs::remove_dir_all(dir);
}
