use async_trait::async_trait;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::registry::{JoinRoomResult, LeaveRoomResult, RoomRegistry, SceneObject};
use crate::shared::AppState;

use super::connection_manager::ConnectionManager;
use super::messages::{ClientMessage, ServerMessage};
use super::socket::{Connection, MessageHandler};

/// Per-connection dispatch: decodes inbound frames, applies them to the
/// room registry, and fans the results out through the connection manager.
///
/// Tracks which room each connection has joined. A connection goes
/// Unjoined -> Joined on its first successful create/join and only returns
/// to Unjoined by disconnecting; there is no room switching.
pub struct RelayMessageHandler {
    registry: Arc<dyn RoomRegistry>,
    connections: Arc<dyn ConnectionManager>,
    // connection id -> joined room code
    memberships: RwLock<HashMap<String, String>>,
}

impl RelayMessageHandler {
    pub fn new(registry: Arc<dyn RoomRegistry>, connections: Arc<dyn ConnectionManager>) -> Self {
        Self {
            registry,
            connections,
            memberships: RwLock::new(HashMap::new()),
        }
    }

    /// Room the connection currently belongs to, if any.
    pub async fn joined_room(&self, connection_id: &str) -> Option<String> {
        self.memberships.read().await.get(connection_id).cloned()
    }

    async fn handle_create_room(&self, connection_id: &str) {
        if let Some(code) = self.joined_room(connection_id).await {
            debug!(
                connection_id = %connection_id,
                room_code = %code,
                "createRoom from a connection already in a room, ignoring"
            );
            return;
        }

        let code = match self.registry.create_room(connection_id).await {
            Ok(code) => code,
            Err(e) => {
                error!(connection_id = %connection_id, error = %e, "Failed to create room");
                return;
            }
        };

        self.memberships
            .write()
            .await
            .insert(connection_id.to_string(), code.clone());

        self.connections
            .send_to(
                connection_id,
                &ServerMessage::room_created(code.clone()).to_json(),
            )
            .await;
        self.connections
            .send_to(connection_id, &ServerMessage::update_connections(1).to_json())
            .await;
    }

    async fn handle_join_room(&self, connection_id: &str, room_id: String) {
        if let Some(code) = self.joined_room(connection_id).await {
            debug!(
                connection_id = %connection_id,
                room_code = %code,
                "joinRoom from a connection already in a room, ignoring"
            );
            return;
        }

        let result = match self.registry.join_room(&room_id, connection_id).await {
            Ok(result) => result,
            Err(e) => {
                error!(connection_id = %connection_id, error = %e, "Failed to join room");
                return;
            }
        };

        match result {
            JoinRoomResult::Joined { objects, members } => {
                self.memberships
                    .write()
                    .await
                    .insert(connection_id.to_string(), room_id);

                // Initial sync for the joiner, then the new head count to
                // everyone including the joiner.
                self.connections
                    .send_to(
                        connection_id,
                        &ServerMessage::initial_state(objects).to_json(),
                    )
                    .await;
                let count = members.len();
                self.connections
                    .send_to_many(&members, &ServerMessage::update_connections(count).to_json())
                    .await;
            }
            JoinRoomResult::RoomNotFound => {
                // Silent no-op: no error frame exists for a missed join.
                debug!(
                    connection_id = %connection_id,
                    room_code = %room_id,
                    "joinRoom for unknown room, dropping"
                );
            }
        }
    }

    /// placeObject and updateObject share semantics: upsert into the room
    /// and relay the untouched inbound frame to the other members.
    async fn handle_upsert(&self, connection_id: &str, object: SceneObject, raw: &str) {
        let Some(code) = self.joined_room(connection_id).await else {
            debug!(connection_id = %connection_id, "Object mutation from unjoined connection, dropping");
            return;
        };

        match self
            .registry
            .upsert_object(&code, connection_id, object)
            .await
        {
            Ok(recipients) => self.connections.send_to_many(&recipients, raw).await,
            Err(e) => {
                error!(connection_id = %connection_id, room_code = %code, error = %e, "Failed to upsert object")
            }
        }
    }

    async fn handle_delete(&self, connection_id: &str, uuid: &str, raw: &str) {
        let Some(code) = self.joined_room(connection_id).await else {
            debug!(connection_id = %connection_id, "deleteObject from unjoined connection, dropping");
            return;
        };

        match self
            .registry
            .delete_object(&code, connection_id, uuid)
            .await
        {
            Ok(recipients) => self.connections.send_to_many(&recipients, raw).await,
            Err(e) => {
                error!(connection_id = %connection_id, room_code = %code, error = %e, "Failed to delete object")
            }
        }
    }
}

#[async_trait]
impl MessageHandler for RelayMessageHandler {
    async fn handle_message(&self, connection_id: &str, message: String) {
        debug!(
            connection_id = %connection_id,
            message = %message,
            "Received message"
        );

        match serde_json::from_str::<ClientMessage>(&message) {
            Ok(ClientMessage::CreateRoom) => self.handle_create_room(connection_id).await,
            Ok(ClientMessage::JoinRoom { room_id }) => {
                self.handle_join_room(connection_id, room_id).await
            }
            Ok(ClientMessage::PlaceObject { object })
            | Ok(ClientMessage::UpdateObject { object }) => {
                self.handle_upsert(connection_id, object, &message).await
            }
            Ok(ClientMessage::DeleteObject { uuid }) => {
                self.handle_delete(connection_id, &uuid, &message).await
            }
            Ok(ClientMessage::Unknown) => {
                debug!(connection_id = %connection_id, "Unrecognized message type, ignoring");
            }
            Err(e) => {
                // Malformed input is not fatal: log, drop, keep the
                // connection open.
                warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to parse message, dropping"
                );
            }
        }
    }

    async fn handle_disconnect(&self, connection_id: &str) {
        let Some(code) = self.memberships.write().await.remove(connection_id) else {
            return; // Never joined a room
        };

        match self.registry.leave_room(&code, connection_id).await {
            Ok(LeaveRoomResult::Departed { remaining }) => {
                let count = remaining.len();
                self.connections
                    .send_to_many(
                        &remaining,
                        &ServerMessage::update_connections(count).to_json(),
                    )
                    .await;
            }
            Ok(LeaveRoomResult::RoomDeleted) | Ok(LeaveRoomResult::RoomNotFound) => {}
            Err(e) => {
                error!(connection_id = %connection_id, room_code = %code, error = %e, "Failed to leave room")
            }
        }
    }
}

/// WebSocket endpoint: GET /ws. No room in the path - a connection attaches
/// to a room later via createRoom/joinRoom.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_websocket_connection(socket, app_state))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(socket: axum::extract::ws::WebSocket, app_state: AppState) {
    let connection_id = Uuid::new_v4().to_string();

    info!(connection_id = %connection_id, "WebSocket connection established");

    // Outbound channel (relay -> client), registered so fan-out can reach
    // this connection by id.
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();
    app_state
        .connections
        .add_connection(connection_id.clone(), outbound_sender)
        .await;

    let connection = Connection::new(
        connection_id.clone(),
        Box::new(socket),
        outbound_receiver,
        app_state.relay.clone(),
    );

    // run() invokes handle_disconnect on every exit path, which covers
    // leaving the room and notifying the remaining members.
    if let Err(e) = connection.run().await {
        warn!(connection_id = %connection_id, error = ?e, "Connection ended with error");
    }

    app_state.connections.remove_connection(&connection_id).await;
    info!(connection_id = %connection_id, "WebSocket connection closed");
}
