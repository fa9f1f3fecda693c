use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::models::{generate_room_code, RoomModel, SceneObject};
use crate::shared::AppError;

/// How many fresh codes to try before giving up on room creation. With a
/// 36^6 codespace a single retry is already rare.
const CODE_GENERATION_ATTEMPTS: usize = 16;

/// Result of attempting to join a room
#[derive(Debug, Clone)]
pub enum JoinRoomResult {
    /// Successfully joined; carries the object snapshot for the joiner's
    /// initial sync and the post-join member list for the count broadcast.
    Joined {
        objects: Vec<SceneObject>,
        members: Vec<String>,
    },
    /// Room does not exist
    RoomNotFound,
}

/// Result of removing a connection from a room
#[derive(Debug, Clone)]
pub enum LeaveRoomResult {
    /// Connection removed; carries the remaining members for notification.
    Departed { remaining: Vec<String> },
    /// Membership hit zero, so the room and its objects were discarded.
    RoomDeleted,
    /// Room does not exist (already deleted, or never existed)
    RoomNotFound,
}

/// Trait for the room registry: rooms, membership, and per-object state.
///
/// Every operation is atomic with respect to a single room; recipient sets
/// are snapshotted inside the critical section so a concurrent join/leave
/// cannot corrupt or skip a broadcast in flight.
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Creates a room with a freshly generated code and the creator as its
    /// sole member. Returns the code.
    async fn create_room(&self, connection_id: &str) -> Result<String, AppError>;

    /// Atomically adds a connection to a room's members, returning the state
    /// the joiner and the room need to hear about.
    async fn join_room(&self, code: &str, connection_id: &str)
        -> Result<JoinRoomResult, AppError>;

    /// Stores or replaces an object (last write wins by arrival order) and
    /// returns the fan-out recipients: members minus the originator. A
    /// missing room yields an empty recipient set.
    async fn upsert_object(
        &self,
        code: &str,
        connection_id: &str,
        object: SceneObject,
    ) -> Result<Vec<String>, AppError>;

    /// Removes an object by uuid (absent uuid is a no-op) and returns the
    /// fan-out recipients: members minus the originator.
    async fn delete_object(
        &self,
        code: &str,
        connection_id: &str,
        uuid: &str,
    ) -> Result<Vec<String>, AppError>;

    /// Atomically removes a connection from a room, deleting the room when
    /// its membership reaches zero.
    async fn leave_room(
        &self,
        code: &str,
        connection_id: &str,
    ) -> Result<LeaveRoomResult, AppError>;

    /// Snapshot of a room's current state.
    async fn get_room(&self, code: &str) -> Result<Option<RoomModel>, AppError>;
}

/// In-memory implementation of RoomRegistry. A single coarse lock guards the
/// whole map; every operation is pure map manipulation, so no critical
/// section outlives the computation of its return value.
pub struct InMemoryRoomRegistry {
    rooms: Mutex<HashMap<String, RoomModel>>,
}

impl Default for InMemoryRoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    #[instrument(skip(self))]
    async fn create_room(&self, connection_id: &str) -> Result<String, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        // Regenerate on collision so no two simultaneously active rooms
        // share a code.
        for _ in 0..CODE_GENERATION_ATTEMPTS {
            let code = generate_room_code();
            if rooms.contains_key(&code) {
                debug!(room_code = %code, "Generated code collides with active room, retrying");
                continue;
            }

            rooms.insert(
                code.clone(),
                RoomModel::new(code.clone(), connection_id.to_string()),
            );
            info!(room_code = %code, connection_id = %connection_id, "Room created");
            return Ok(code);
        }

        warn!(
            attempts = CODE_GENERATION_ATTEMPTS,
            "Failed to generate a free room code"
        );
        Err(AppError::RoomCodesExhausted)
    }

    #[instrument(skip(self))]
    async fn join_room(
        &self,
        code: &str,
        connection_id: &str,
    ) -> Result<JoinRoomResult, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        let room = match rooms.get_mut(code) {
            Some(room) => room,
            None => {
                debug!(room_code = %code, "Join attempt on unknown room");
                return Ok(JoinRoomResult::RoomNotFound);
            }
        };

        room.add_member(connection_id.to_string());

        info!(
            room_code = %code,
            connection_id = %connection_id,
            member_count = room.member_count(),
            "Connection joined room"
        );

        Ok(JoinRoomResult::Joined {
            objects: room.objects.clone(),
            members: room.members.clone(),
        })
    }

    #[instrument(skip(self, object))]
    async fn upsert_object(
        &self,
        code: &str,
        connection_id: &str,
        object: SceneObject,
    ) -> Result<Vec<String>, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        let room = match rooms.get_mut(code) {
            Some(room) => room,
            None => {
                // Stale mutation after the room was emptied out. Valid no-op.
                debug!(room_code = %code, "Upsert targeting unknown room");
                return Ok(Vec::new());
            }
        };

        debug!(
            room_code = %code,
            object_uuid = %object.uuid,
            object_count = room.objects.len(),
            "Upserting object"
        );
        room.upsert_object(object);

        Ok(room.members_except(connection_id))
    }

    #[instrument(skip(self))]
    async fn delete_object(
        &self,
        code: &str,
        connection_id: &str,
        uuid: &str,
    ) -> Result<Vec<String>, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        let room = match rooms.get_mut(code) {
            Some(room) => room,
            None => {
                debug!(room_code = %code, "Delete targeting unknown room");
                return Ok(Vec::new());
            }
        };

        debug!(room_code = %code, object_uuid = %uuid, "Deleting object");
        room.remove_object(uuid);

        Ok(room.members_except(connection_id))
    }

    #[instrument(skip(self))]
    async fn leave_room(
        &self,
        code: &str,
        connection_id: &str,
    ) -> Result<LeaveRoomResult, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        let room = match rooms.get_mut(code) {
            Some(room) => room,
            None => {
                debug!(room_code = %code, "Leave attempt on unknown room");
                return Ok(LeaveRoomResult::RoomNotFound);
            }
        };

        room.remove_member(connection_id);

        if room.members.is_empty() {
            rooms.remove(code);
            info!(room_code = %code, "Room is now empty, deleting");
            return Ok(LeaveRoomResult::RoomDeleted);
        }

        info!(
            room_code = %code,
            connection_id = %connection_id,
            member_count = room.member_count(),
            "Connection left room"
        );

        Ok(LeaveRoomResult::Departed {
            remaining: room.members.clone(),
        })
    }

    #[instrument(skip(self))]
    async fn get_room(&self, code: &str) -> Result<Option<RoomModel>, AppError> {
        let rooms = self.rooms.lock().unwrap();
        Ok(rooms.get(code).cloned())
    }
}
