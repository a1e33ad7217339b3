use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use super::{RoomState, StateBag, StateKind};

/// In-memory authoritative state for every room, keyed by room id.
///
/// Rooms are created lazily on first touch and live for the rest of the
/// process. Each room sits behind its own lock, so mutations to one room
/// are atomic while unrelated rooms never contend.
pub struct RoomStore {
    rooms: DashMap<String, Arc<Mutex<RoomState>>>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    fn room(&self, room_id: &str) -> Arc<Mutex<RoomState>> {
        if let Some(room) = self.rooms.get(room_id) {
            return room.clone();
        }
        self.rooms
            .entry(room_id.to_string())
            .or_insert_with(|| {
                debug!(%room_id, "Room state materialized");
                Arc::default()
            })
            .clone()
    }

    /// Runs `f` with exclusive access to the room's state bags.
    ///
    /// The map shard is released before the room lock is taken; a slow
    /// mutation in one room does not block lookups of others.
    pub fn with_room<R>(&self, room_id: &str, f: impl FnOnce(&mut RoomState) -> R) -> R {
        let room = self.room(room_id);
        let mut guard = room.lock();
        f(&mut guard)
    }

    /// Returns a snapshot of one bag, creating an empty room if needed.
    pub fn get(&self, room_id: &str, kind: StateKind) -> StateBag {
        self.with_room(room_id, |room| room.snapshot(kind))
    }

    /// Replaces one bag with an empty instance.
    pub fn reset(&self, room_id: &str, kind: StateKind) {
        self.with_room(room_id, |room| room.reset(kind));
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for RoomStore {
    fn default() -> Self {
        Self::new()
    }
}
