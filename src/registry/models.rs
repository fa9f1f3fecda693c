use rand::Rng;
use serde::{Deserialize, Serialize};

/// Room code alphabet: uppercase base-36, matching the 6-character codes
/// clients type in to join.
const CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of a room code.
pub const ROOM_CODE_LEN: usize = 6;

/// A single scene object replicated across a room's members.
///
/// The registry only cares about the `uuid`; every other field the client
/// sent is carried opaquely and serializes back out byte-equivalent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub uuid: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// In-memory state of a single room: who is in it and what it contains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomModel {
    pub code: String,                 // 6-char uppercase base-36 code
    pub members: Vec<String>,         // Connection ids currently joined
    pub objects: Vec<SceneObject>,    // Ordered, keyed by object uuid
}

impl RoomModel {
    /// Creates a room with the given code and its creator as sole member.
    pub fn new(code: String, creator_id: String) -> Self {
        Self {
            code,
            members: vec![creator_id],
            objects: Vec::new(),
        }
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn has_member(&self, connection_id: &str) -> bool {
        self.members.iter().any(|m| m == connection_id)
    }

    /// Adds a member if not already present (duplicate joins are idempotent).
    pub fn add_member(&mut self, connection_id: String) {
        if !self.has_member(&connection_id) {
            self.members.push(connection_id);
        }
    }

    pub fn remove_member(&mut self, connection_id: &str) {
        self.members.retain(|m| m != connection_id);
    }

    /// All members except the originator, snapshotted for fan-out.
    pub fn members_except(&self, connection_id: &str) -> Vec<String> {
        self.members
            .iter()
            .filter(|m| m.as_str() != connection_id)
            .cloned()
            .collect()
    }

    /// Replaces the object with a matching uuid in place (last write wins,
    /// ordering position preserved), or appends it if the uuid is new.
    pub fn upsert_object(&mut self, object: SceneObject) {
        match self.objects.iter_mut().find(|o| o.uuid == object.uuid) {
            Some(existing) => *existing = object,
            None => self.objects.push(object),
        }
    }

    /// Removes the object with the given uuid. Absent uuid is a no-op.
    pub fn remove_object(&mut self, uuid: &str) {
        self.objects.retain(|o| o.uuid != uuid);
    }
}

/// Generates a random room code in the wire format clients expect.
pub fn generate_room_code() -> String {
    let mut rng = rand::rng();
    (0..ROOM_CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}
