use serde::{Deserialize, Serialize};

use crate::registry::SceneObject;

/// Client -> Server messages. UTF-8 JSON text frames tagged on `type`.
///
/// Object payloads must carry a string `uuid`; a `placeObject` without one
/// fails to parse and is handled as malformed input. An unrecognized `type`
/// lands on `Unknown` and is ignored without closing the connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    CreateRoom,
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: String },
    PlaceObject { object: SceneObject },
    UpdateObject { object: SceneObject },
    DeleteObject { uuid: String },
    #[serde(other)]
    Unknown,
}

/// Server -> Client messages.
///
/// Object mutations never appear here: those are relayed to the other
/// members as the original inbound frame, byte for byte.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    RoomCreated { room_id: String },
    InitialState { objects: Vec<SceneObject> },
    UpdateConnections { count: usize },
}

impl ServerMessage {
    pub fn room_created(room_id: String) -> Self {
        Self::RoomCreated { room_id }
    }

    pub fn initial_state(objects: Vec<SceneObject>) -> Self {
        Self::InitialState { objects }
    }

    pub fn update_connections(count: usize) -> Self {
        Self::UpdateConnections { count }
    }

    /// Wire encoding. These shapes contain nothing that can fail to
    /// serialize.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}
