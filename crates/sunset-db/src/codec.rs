//! Maps a [`SaveSnapshot`] to and from flat store keys.
//!
//! Encoding is lossless for every reachable state. Decoding is lenient: a
//! missing or malformed key keeps the caller's base value, out-of-range day
//! and phase values are clamped, and bad list entries are skipped. One bad
//! key never fails the whole load.

use std::collections::BTreeSet;
use std::str::FromStr;

use sunset_types::{
    Day, DoorState, LoreId, Phase, PillChoice, PuzzleId, RoomId, RoomType, SaveSnapshot, Setting,
    Settings,
};

use crate::error::DbError;
use crate::keys::KeySchema;
use crate::store::{KeyValueStore, StoreValue};

/// One save slot in a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct SaveSlot<S> {
    store: S,
    keys: KeySchema,
}

impl<S: KeyValueStore> SaveSlot<S> {
    /// Bind a slot to a store.
    pub const fn new(store: S, keys: KeySchema) -> Self {
        Self { store, keys }
    }

    /// The backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The key names in use.
    pub const fn keys(&self) -> &KeySchema {
        &self.keys
    }

    /// Whether the `SaveExists` flag is set.
    pub fn save_exists(&self) -> bool {
        self.store
            .get_int(&self.keys.save_exists())
            .is_ok_and(|flag| flag != 0)
    }

    /// Write every save key in one batch.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store rejects the write. The previous save
    /// is untouched in that case.
    pub fn save(&mut self, snapshot: &SaveSnapshot) -> Result<(), DbError> {
        let keys = &self.keys;
        let mut entries: Vec<(String, StoreValue)> = vec![
            (keys.current_day(), i64::from(snapshot.day.get()).into()),
            (keys.current_phase(), snapshot.phase.code().into()),
            (keys.is_game_over(), snapshot.game_over.into()),
        ];
        for (day, choice) in Day::all().zip(snapshot.pills) {
            entries.push((keys.pill_day(day), choice.code().into()));
        }
        for (day, done) in Day::all().zip(snapshot.tasks) {
            entries.push((keys.task_day_completed(day), done.into()));
        }
        entries.extend([
            (
                keys.door_states(),
                encode_pairs(&snapshot.door_states, |state| state.code()).into(),
            ),
            (
                keys.room_types(),
                encode_pairs(&snapshot.room_types, |room_type| room_type.code()).into(),
            ),
            (
                keys.rooms_discovered_tonight(),
                i64::from(snapshot.rooms_discovered_tonight).into(),
            ),
            (
                keys.rooms_entered_tonight(),
                i64::from(snapshot.rooms_entered_tonight).into(),
            ),
            (
                keys.completed_puzzles(),
                encode_list(snapshot.completed_puzzles.iter().map(PuzzleId::as_str)).into(),
            ),
            (
                keys.unlocked_lore(),
                encode_list(snapshot.unlocked_lore.iter().map(LoreId::as_str)).into(),
            ),
            (keys.save_exists(), true.into()),
        ]);

        let count = entries.len();
        self.store.write_batch(entries)?;
        tracing::info!(day = %snapshot.day, phase = ?snapshot.phase, keys = count, "Game saved");
        Ok(())
    }

    /// Read the save on top of `base`.
    ///
    /// `base` supplies the value for every key that is missing or malformed,
    /// and its room lists decide which rooms are recognised.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NoSaveData`] if no save exists.
    pub fn load(&self, base: &SaveSnapshot) -> Result<SaveSnapshot, DbError> {
        if !self.save_exists() {
            tracing::warn!("No save data found");
            return Err(DbError::NoSaveData);
        }

        let keys = &self.keys;
        let mut snapshot = base.clone();

        if let Some(day) = self.read(&keys.current_day(), S::get_int) {
            snapshot.day = Day::clamped(day);
        }
        if let Some(phase) = self.read(&keys.current_phase(), S::get_int) {
            snapshot.phase = if phase <= Phase::Morning.code() {
                Phase::Morning
            } else {
                Phase::Night
            };
        }
        if let Some(flag) = self.read(&keys.is_game_over(), S::get_int) {
            snapshot.game_over = flag != 0;
        }

        for (day, slot) in Day::all().zip(snapshot.pills.iter_mut()) {
            let key = keys.pill_day(day);
            match self.read(&key, S::get_int).map(PillChoice::from_code) {
                Some(Some(choice)) => *slot = choice,
                Some(None) => tracing::warn!(key = %key, "Unknown pill code, skipping"),
                None => {}
            }
        }
        for (day, slot) in Day::all().zip(snapshot.tasks.iter_mut()) {
            if let Some(flag) = self.read(&keys.task_day_completed(day), S::get_int) {
                *slot = flag != 0;
            }
        }

        if let Some(raw) = self.read(&keys.door_states(), S::get_text) {
            merge_pairs(&mut snapshot.door_states, &raw, DoorState::from_code);
        }
        if let Some(raw) = self.read(&keys.room_types(), S::get_text) {
            merge_pairs(&mut snapshot.room_types, &raw, RoomType::from_code);
        }
        if let Some(count) = self.read_count(&keys.rooms_discovered_tonight()) {
            snapshot.rooms_discovered_tonight = count;
        }
        if let Some(count) = self.read_count(&keys.rooms_entered_tonight()) {
            snapshot.rooms_entered_tonight = count;
        }
        if let Some(raw) = self.read(&keys.completed_puzzles(), S::get_text) {
            snapshot.completed_puzzles = decode_list(&raw);
        }
        if let Some(raw) = self.read(&keys.unlocked_lore(), S::get_text) {
            snapshot.unlocked_lore = decode_list(&raw);
        }

        tracing::info!(day = %snapshot.day, phase = ?snapshot.phase, "Game loaded");
        Ok(snapshot)
    }

    /// Clear every save key. Settings are kept.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store rejects the write.
    pub fn delete(&mut self) -> Result<(), DbError> {
        self.store.delete_keys(&self.keys.all_save_keys())?;
        tracing::info!("Save data deleted");
        Ok(())
    }

    /// Write every setting.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store rejects the write.
    pub fn save_settings(&mut self, settings: &Settings) -> Result<(), DbError> {
        let entries = Setting::ALL
            .into_iter()
            .map(|setting| {
                (
                    self.keys.setting(setting),
                    f64::from(settings.get(setting)).into(),
                )
            })
            .collect();
        self.store.write_batch(entries)
    }

    /// Write a single setting.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store rejects the write.
    pub fn save_setting(&mut self, setting: Setting, value: f32) -> Result<(), DbError> {
        self.store
            .write_batch(vec![(self.keys.setting(setting), f64::from(value).into())])
    }

    /// Read settings on top of `base`, clamping each value to `0.0..=1.0`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn load_settings(&self, base: Settings) -> Settings {
        let mut settings = base;
        for setting in Setting::ALL {
            if let Some(value) = self.read(&self.keys.setting(setting), S::get_float) {
                settings.set(setting, value.clamp(0.0, 1.0) as f32);
            }
        }
        settings
    }

    /// Read one key, logging and discarding anything but a clean value.
    fn read<T>(&self, key: &str, get: impl Fn(&S, &str) -> Result<T, DbError>) -> Option<T> {
        match get(&self.store, key) {
            Ok(value) => Some(value),
            Err(DbError::KeyNotFound(_)) => {
                tracing::debug!(key, "Key missing, keeping default");
                None
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Malformed key, keeping default");
                None
            }
        }
    }

    /// Read a non-negative counter.
    fn read_count(&self, key: &str) -> Option<u32> {
        let raw = self.read(key, S::get_int)?;
        let count = u32::try_from(raw).ok();
        if count.is_none() {
            tracing::warn!(key, value = raw, "Counter out of range, keeping default");
        }
        count
    }
}

fn encode_pairs<T: Copy>(pairs: &[(RoomId, T)], code: impl Fn(T) -> i64) -> String {
    pairs
        .iter()
        .map(|(id, value)| format!("{id}:{}", code(*value)))
        .collect::<Vec<_>>()
        .join(",")
}

fn encode_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.collect::<Vec<_>>().join(",")
}

/// Overwrite values in `pairs` from a `roomId:code` list. Entries that fail
/// to parse or name an unconfigured room are skipped.
fn merge_pairs<T>(pairs: &mut [(RoomId, T)], raw: &str, decode: impl Fn(i64) -> Option<T>) {
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let Some((id, code)) = entry.rsplit_once(':') else {
            tracing::warn!(entry, "Malformed room entry, skipping");
            continue;
        };
        let Some(value) = i64::from_str(code.trim()).ok().and_then(&decode) else {
            tracing::warn!(entry, "Invalid room code, skipping");
            continue;
        };
        let id = id.trim();
        match pairs.iter_mut().find(|(room_id, _)| room_id.as_str() == id) {
            Some((_, slot)) => *slot = value,
            None => tracing::warn!(room_id = id, "Saved room is not configured, skipping"),
        }
    }
}

fn decode_list<T: From<String> + Ord>(raw: &str) -> BTreeSet<T> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| T::from(item.to_owned()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn base() -> SaveSnapshot {
        SaveSnapshot {
            door_states: vec![
                (RoomId::from("room_1"), DoorState::Locked),
                (RoomId::from("room_2"), DoorState::Locked),
            ],
            room_types: vec![
                (RoomId::from("room_1"), RoomType::Hidden),
                (RoomId::from("room_2"), RoomType::Hidden),
            ],
            ..SaveSnapshot::default()
        }
    }

    fn slot() -> SaveSlot<MemoryStore> {
        SaveSlot::new(MemoryStore::new(), KeySchema::default())
    }

    #[test]
    fn save_then_load_restores_state() {
        let mut slot = slot();
        let mut state = base();
        state.day = Day::new(3).unwrap();
        state.phase = Phase::Night;
        state.pills = [
            PillChoice::Taken,
            PillChoice::NotTaken,
            PillChoice::NotTaken,
            PillChoice::None,
            PillChoice::None,
        ];
        state.tasks = [true, true, true, false, false];
        state.door_states[0].1 = DoorState::Entered;
        state.door_states[1].1 = DoorState::Discovered;
        state.rooms_discovered_tonight = 1;
        state.rooms_entered_tonight = 2;
        state.completed_puzzles.insert(PuzzleId::from("puzzle_day_2"));
        state.unlocked_lore.insert(LoreId::from("lore_day_2"));

        slot.save(&state).unwrap();
        assert!(slot.save_exists());
        assert_eq!(slot.load(&base()).unwrap(), state);
    }

    #[test]
    fn written_layout_matches_key_table() {
        let mut slot = slot();
        let mut state = base();
        state.door_states[1].1 = DoorState::Discovered;
        slot.save(&state).unwrap();

        let store = slot.store();
        assert_eq!(store.get_int("CurrentDay").unwrap(), 1);
        assert_eq!(store.get_int("PillDay4").unwrap(), -1);
        assert_eq!(store.get_text("DoorStates").unwrap(), "room_1:0,room_2:1");
        assert_eq!(store.get_text("RoomTypes").unwrap(), "room_1:0,room_2:0");
        assert_eq!(store.get_int("RoomsDiscoveredTonight").unwrap(), 0);
        assert_eq!(store.get_int("RoomsEnteredTonight").unwrap(), 0);
        assert_eq!(store.get_text("CompletedPuzzles").unwrap(), "");
    }

    #[test]
    fn load_without_save_fails() {
        assert!(matches!(slot().load(&base()), Err(DbError::NoSaveData)));
    }

    #[test]
    fn load_clamps_and_skips_malformed() {
        let mut store = MemoryStore::new();
        store.insert("SaveExists", 1_i64);
        store.insert("CurrentDay", 42_i64);
        store.insert("CurrentPhase", -7_i64);
        store.insert("PillDay3", 9_i64);
        store.insert("PillDay1", String::from("taken"));
        store.insert("DoorStates", String::from("room_1:2,garbage,room_2:77,attic:1,:x"));
        store.insert("CompletedPuzzles", String::from(" puzzle_day_1 ,,puzzle_day_2"));
        store.insert("RoomsDiscoveredTonight", -3_i64);
        store.insert("RoomsEnteredTonight", 4_i64);
        let slot = SaveSlot::new(store, KeySchema::default());

        let loaded = slot.load(&base()).unwrap();
        assert_eq!(loaded.day, Day::LAST);
        assert_eq!(loaded.phase, Phase::Morning);
        assert_eq!(loaded.pills, [PillChoice::None; Day::COUNT]);
        assert_eq!(
            loaded.door_states,
            vec![
                (RoomId::from("room_1"), DoorState::Entered),
                (RoomId::from("room_2"), DoorState::Locked),
            ]
        );
        assert_eq!(loaded.completed_puzzles.len(), 2);
        assert_eq!(loaded.room_types, base().room_types);
        assert_eq!(loaded.rooms_discovered_tonight, 0);
        assert_eq!(loaded.rooms_entered_tonight, 4);
    }

    #[test]
    fn delete_keeps_settings() {
        let mut slot = slot();
        slot.save(&base()).unwrap();
        let settings = Settings {
            music_volume: 0.25,
            ..Settings::default()
        };
        slot.save_settings(&settings).unwrap();

        slot.delete().unwrap();

        assert!(!slot.save_exists());
        assert!(!slot.store().has_key("CurrentDay"));
        assert_eq!(slot.load_settings(Settings::default()), settings);
    }

    #[test]
    fn settings_are_clamped_on_load() {
        let mut store = MemoryStore::new();
        store.insert("MasterVolume", 3.5_f64);
        store.insert("Brightness", String::from("bright"));
        let slot = SaveSlot::new(store, KeySchema::default());

        let settings = slot.load_settings(Settings::default());
        assert!((settings.master_volume - 1.0).abs() < f32::EPSILON);
        assert!((settings.brightness - Settings::default().brightness).abs() < f32::EPSILON);
    }
}
