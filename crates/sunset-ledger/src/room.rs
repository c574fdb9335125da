//! The room registry: hidden-room door states and the nightly quota.
//!
//! Rooms are registered once, in a fixed order, when the session starts.
//! Hidden rooms start locked and move `Locked -> Discovered -> Entered`;
//! nothing ever moves a door backwards except load and reset. At most
//! [`DISCOVERIES_PER_NIGHT`] discovery happens per night, and the day cycle
//! resets the nightly counters each time night begins.

use sunset_events::EventSink;
use sunset_types::{DoorState, GameEvent, RoomId, RoomType};
use tracing::{debug, info, warn};

use crate::LedgerError;

/// How many hidden rooms may be discovered in a single night.
pub const DISCOVERIES_PER_NIGHT: u32 = 1;

/// Outcome of a successful [`RoomRegistry::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// The room was entered for the first time.
    FirstEntry,
    /// The room had already been entered; nothing changed.
    ReEntry,
}

/// One registered room.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RoomEntry {
    id: RoomId,
    room_type: RoomType,
    door: DoorState,
    /// Type the room was configured with, restored by [`RoomRegistry::reset`].
    configured_type: RoomType,
}

impl RoomEntry {
    const fn new(id: RoomId, room_type: RoomType) -> Self {
        Self {
            id,
            room_type,
            door: room_type.initial_door_state(),
            configured_type: room_type,
        }
    }
}

/// Door state and type for each registered room, plus nightly counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomRegistry {
    /// Rooms in configured order.
    rooms: Vec<RoomEntry>,
    /// Discoveries made since night began.
    discovered_this_night: u32,
    /// Entries (first or repeat) made since night began.
    entered_this_night: u32,
}

impl RoomRegistry {
    /// Register the given rooms, all hidden and locked.
    pub fn new(room_ids: impl IntoIterator<Item = RoomId>) -> Self {
        Self::with_types(room_ids.into_iter().map(|id| (id, RoomType::Hidden)))
    }

    /// Register rooms with explicit types. Duplicate ids keep the first entry.
    pub fn with_types(rooms: impl IntoIterator<Item = (RoomId, RoomType)>) -> Self {
        let mut entries: Vec<RoomEntry> = Vec::new();
        for (id, room_type) in rooms {
            if entries.iter().any(|e| e.id == id) {
                warn!(room_id = %id, "Duplicate room id ignored");
                continue;
            }
            entries.push(RoomEntry::new(id, room_type));
        }
        debug!(rooms = entries.len(), "Room registry created");
        Self {
            rooms: entries,
            discovered_this_night: 0,
            entered_this_night: 0,
        }
    }

    /// Restore every room to its configured type and initial door state.
    pub fn reset(&mut self) {
        for room in &mut self.rooms {
            room.room_type = room.configured_type;
            room.door = room.configured_type.initial_door_state();
        }
        self.reset_night_counters();
        info!("All door states reset");
    }

    /// Discover a hidden room.
    ///
    /// Rejected when the room is unknown, is not hidden, tonight's discovery
    /// quota is used, or its door is not locked. On success the door becomes
    /// [`DoorState::Discovered`] and [`GameEvent::RoomDiscovered`] is emitted.
    pub fn discover(&mut self, room_id: &RoomId, sink: &mut impl EventSink) -> Result<(), LedgerError> {
        let quota_used = self.discovered_this_night >= DISCOVERIES_PER_NIGHT;
        let room = self.known_room_mut(room_id)?;

        if room.room_type != RoomType::Hidden {
            warn!(room_id = %room_id, room_type = ?room.room_type, "Not a hidden room");
            return Err(LedgerError::NotHidden {
                room_id: room_id.clone(),
                room_type: room.room_type,
            });
        }

        if quota_used {
            warn!(room_id = %room_id, limit = DISCOVERIES_PER_NIGHT, "Nightly discovery quota used");
            return Err(LedgerError::NightQuotaUsed {
                room_id: room_id.clone(),
                limit: DISCOVERIES_PER_NIGHT,
            });
        }

        if room.door != DoorState::Locked {
            warn!(room_id = %room_id, state = ?room.door, "Room already discovered");
            return Err(LedgerError::DoorNotLocked {
                room_id: room_id.clone(),
                state: room.door,
            });
        }

        room.door = DoorState::Discovered;
        self.discovered_this_night = self.discovered_this_night.saturating_add(1);
        info!(
            room_id = %room_id,
            discovered_this_night = self.discovered_this_night,
            "Room discovered"
        );
        sink.emit(GameEvent::RoomDiscovered {
            room_id: room_id.clone(),
        });
        Ok(())
    }

    /// Enter a discovered room.
    ///
    /// Rejected when the room is unknown or its door is neither discovered
    /// nor entered, so a locked room can never jump straight to entered. The
    /// first entry emits [`GameEvent::RoomEntered`]; re-entering is allowed
    /// and silent.
    pub fn enter(&mut self, room_id: &RoomId, sink: &mut impl EventSink) -> Result<EntryOutcome, LedgerError> {
        let room = self.known_room_mut(room_id)?;

        let outcome = match room.door {
            DoorState::Discovered => {
                room.door = DoorState::Entered;
                EntryOutcome::FirstEntry
            }
            DoorState::Entered => EntryOutcome::ReEntry,
            state @ (DoorState::Locked | DoorState::Normal) => {
                warn!(room_id = %room_id, state = ?state, "Room must be discovered before entering");
                return Err(LedgerError::DoorNotDiscovered {
                    room_id: room_id.clone(),
                    state,
                });
            }
        };

        self.entered_this_night = self.entered_this_night.saturating_add(1);
        match outcome {
            EntryOutcome::FirstEntry => {
                info!(room_id = %room_id, "Room entered for the first time");
                sink.emit(GameEvent::RoomEntered {
                    room_id: room_id.clone(),
                });
            }
            EntryOutcome::ReEntry => debug!(room_id = %room_id, "Re-entering room"),
        }
        Ok(outcome)
    }

    /// Zero the nightly discovery and entry counters.
    pub fn reset_night_counters(&mut self) {
        self.discovered_this_night = 0;
        self.entered_this_night = 0;
    }

    /// Overwrite the nightly counters, as when restoring a save made
    /// mid-night.
    pub const fn set_night_counters(&mut self, discovered: u32, entered: u32) {
        self.discovered_this_night = discovered;
        self.entered_this_night = entered;
    }

    /// Door state of a room; [`DoorState::Locked`] for unknown ids.
    pub fn door_state(&self, room_id: &RoomId) -> DoorState {
        self.find(room_id).map_or(DoorState::Locked, |room| room.door)
    }

    /// Type of a room; unknown ids are treated as [`RoomType::Task`] rooms.
    pub fn room_type(&self, room_id: &RoomId) -> RoomType {
        self.find(room_id).map_or(RoomType::Task, |room| room.room_type)
    }

    /// Whether `room_id` is registered.
    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.find(room_id).is_some()
    }

    /// Overwrite a door state without rule checks. Used by load.
    pub fn set_door_state(&mut self, room_id: &RoomId, state: DoorState) -> Result<(), LedgerError> {
        self.known_room_mut(room_id)?.door = state;
        Ok(())
    }

    /// Overwrite a room type without rule checks. Used by load.
    pub fn set_room_type(&mut self, room_id: &RoomId, room_type: RoomType) -> Result<(), LedgerError> {
        self.known_room_mut(room_id)?.room_type = room_type;
        Ok(())
    }

    /// First room, in configured order, that is hidden and still locked.
    pub fn next_locked_hidden_room(&self) -> Option<&RoomId> {
        self.rooms
            .iter()
            .find(|room| room.room_type == RoomType::Hidden && room.door == DoorState::Locked)
            .map(|room| &room.id)
    }

    /// Registered room ids in configured order.
    pub fn room_ids(&self) -> impl Iterator<Item = &RoomId> {
        self.rooms.iter().map(|room| &room.id)
    }

    /// Copy of every door state, in configured order.
    pub fn door_states(&self) -> Vec<(RoomId, DoorState)> {
        self.rooms.iter().map(|room| (room.id.clone(), room.door)).collect()
    }

    /// Copy of every room type, in configured order.
    pub fn room_types(&self) -> Vec<(RoomId, RoomType)> {
        self.rooms
            .iter()
            .map(|room| (room.id.clone(), room.room_type))
            .collect()
    }

    /// Discoveries made since night began.
    pub const fn discovered_this_night(&self) -> u32 {
        self.discovered_this_night
    }

    /// Entries made since night began.
    pub const fn entered_this_night(&self) -> u32 {
        self.entered_this_night
    }

    /// Whether any room was entered since night began.
    pub const fn has_entered_room_this_night(&self) -> bool {
        self.entered_this_night > 0
    }

    fn find(&self, room_id: &RoomId) -> Option<&RoomEntry> {
        self.rooms.iter().find(|room| &room.id == room_id)
    }

    fn known_room_mut(&mut self, room_id: &RoomId) -> Result<&mut RoomEntry, LedgerError> {
        match self.rooms.iter_mut().find(|room| &room.id == room_id) {
            Some(room) => Ok(room),
            None => {
                warn!(room_id = %room_id, "Unknown room id");
                Err(LedgerError::UnknownRoom {
                    room_id: room_id.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> RoomId {
        RoomId::from(s)
    }

    fn three_rooms() -> RoomRegistry {
        RoomRegistry::new([id("room_1"), id("room_2"), id("room_3")])
    }

    #[test]
    fn rooms_start_hidden_and_locked() {
        let registry = three_rooms();
        for room in ["room_1", "room_2", "room_3"] {
            assert_eq!(registry.door_state(&id(room)), DoorState::Locked);
            assert_eq!(registry.room_type(&id(room)), RoomType::Hidden);
        }
    }

    #[test]
    fn discover_then_enter() {
        let mut registry = three_rooms();
        let mut events = Vec::new();

        assert!(registry.discover(&id("room_1"), &mut events).is_ok());
        assert_eq!(registry.door_state(&id("room_1")), DoorState::Discovered);
        assert_eq!(registry.enter(&id("room_1"), &mut events), Ok(EntryOutcome::FirstEntry));
        assert_eq!(registry.door_state(&id("room_1")), DoorState::Entered);

        assert_eq!(
            events,
            vec![
                GameEvent::RoomDiscovered { room_id: id("room_1") },
                GameEvent::RoomEntered { room_id: id("room_1") },
            ]
        );
    }

    #[test]
    fn one_discovery_per_night() {
        let mut registry = three_rooms();
        let mut events = Vec::new();

        assert!(registry.discover(&id("room_1"), &mut events).is_ok());
        let second = registry.discover(&id("room_2"), &mut events);
        assert!(matches!(second, Err(LedgerError::NightQuotaUsed { .. })));
        assert_eq!(registry.door_state(&id("room_2")), DoorState::Locked);

        registry.reset_night_counters();
        assert!(registry.discover(&id("room_2"), &mut events).is_ok());
    }

    #[test]
    fn restored_counters_keep_the_quota_spent() {
        let mut registry = three_rooms();
        registry.set_night_counters(1, 0);
        assert!(matches!(
            registry.discover(&id("room_1"), &mut Vec::new()),
            Err(LedgerError::NightQuotaUsed { .. })
        ));
        assert_eq!(registry.door_state(&id("room_1")), DoorState::Locked);
    }

    #[test]
    fn locked_room_cannot_be_entered() {
        let mut registry = three_rooms();
        let result = registry.enter(&id("room_3"), &mut Vec::new());
        assert!(matches!(result, Err(LedgerError::DoorNotDiscovered { .. })));
        assert_eq!(registry.door_state(&id("room_3")), DoorState::Locked);
        assert_eq!(registry.entered_this_night(), 0);
    }

    #[test]
    fn re_entry_is_silent_but_counted() {
        let mut registry = three_rooms();
        let mut events = Vec::new();
        let _ = registry.discover(&id("room_1"), &mut events);
        let _ = registry.enter(&id("room_1"), &mut events);
        events.clear();

        assert_eq!(registry.enter(&id("room_1"), &mut events), Ok(EntryOutcome::ReEntry));
        assert!(events.is_empty());
        assert_eq!(registry.entered_this_night(), 2);
        assert!(registry.has_entered_room_this_night());
    }

    #[test]
    fn unknown_rooms_are_rejected_and_default_locked() {
        let mut registry = three_rooms();
        assert!(matches!(
            registry.discover(&id("attic"), &mut Vec::new()),
            Err(LedgerError::UnknownRoom { .. })
        ));
        assert_eq!(registry.door_state(&id("attic")), DoorState::Locked);
        assert_eq!(registry.room_type(&id("attic")), RoomType::Task);
        assert!(registry.set_door_state(&id("attic"), DoorState::Entered).is_err());
    }

    #[test]
    fn non_hidden_rooms_cannot_be_discovered() {
        let mut registry = RoomRegistry::with_types([
            (id("task_room"), RoomType::Task),
            (id("room_1"), RoomType::Hidden),
        ]);
        assert_eq!(registry.door_state(&id("task_room")), DoorState::Normal);
        assert!(matches!(
            registry.discover(&id("task_room"), &mut Vec::new()),
            Err(LedgerError::NotHidden { .. })
        ));
        assert_eq!(registry.discovered_this_night(), 0);
    }

    #[test]
    fn next_locked_hidden_room_follows_configured_order() {
        let mut registry = RoomRegistry::with_types([
            (id("lobby"), RoomType::Normal),
            (id("room_1"), RoomType::Hidden),
            (id("room_2"), RoomType::Hidden),
        ]);
        assert_eq!(registry.next_locked_hidden_room(), Some(&id("room_1")));
        let _ = registry.discover(&id("room_1"), &mut Vec::new());
        assert_eq!(registry.next_locked_hidden_room(), Some(&id("room_2")));
        let _ = registry.set_door_state(&id("room_2"), DoorState::Entered);
        assert_eq!(registry.next_locked_hidden_room(), None);
    }

    #[test]
    fn reset_restores_configuration() {
        let mut registry = three_rooms();
        let _ = registry.discover(&id("room_1"), &mut Vec::new());
        let _ = registry.set_room_type(&id("room_2"), RoomType::Normal);

        registry.reset();

        assert_eq!(registry, three_rooms());
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let registry = RoomRegistry::new([id("room_1"), id("room_1")]);
        assert_eq!(registry.room_ids().count(), 1);
    }
}
