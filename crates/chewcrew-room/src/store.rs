//! Room registry: maps room IDs to live rooms.
//!
//! The store's lock only guards the map itself. It is released before a
//! caller touches a room, so it is never held together with a room lock.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{Room, RoomError};

/// Every room created during the life of the process.
///
/// There is no removal: rooms stay until the process exits.
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: RwLock<HashMap<chewcrew_protocol::RoomId, Arc<Room>>>,
}

impl RoomStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `room` under its ID and returns the shared handle.
    ///
    /// # Errors
    /// [`RoomError::DuplicateId`] if the ID is taken. The existing room
    /// is not touched.
    pub async fn create(&self, room: Room) -> Result<Arc<Room>, RoomError> {
        let mut rooms = self.rooms.write().await;
        let room = match rooms.entry(room.id().clone()) {
            Entry::Occupied(entry) => {
                return Err(RoomError::DuplicateId(entry.key().clone()));
            }
            Entry::Vacant(entry) => Arc::clone(entry.insert(Arc::new(room))),
        };
        tracing::debug!(room_id = %room.id(), total = rooms.len(), "room registered");
        Ok(room)
    }

    /// Finds a room by ID.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if no room has this ID.
    pub async fn lookup(&self, id: &str) -> Result<Arc<Room>, RoomError> {
        self.rooms
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(id.into()))
    }

    /// Returns `true` if a room is registered under `id`.
    pub async fn contains(&self, id: &str) -> bool {
        self.rooms.read().await.contains_key(id)
    }

    /// Number of registered rooms.
    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rooms.read().await.is_empty()
    }
}
