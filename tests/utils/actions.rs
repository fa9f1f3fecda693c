//! Action helpers - drive the relay the way a connected client would
#![allow(dead_code)] // Test utilities may not all be used in every test

use scenesync::MessageHandler;
use serde_json::json;

use super::setup::TestSetup;

impl TestSetup {
    /// Send a raw inbound frame from a connection
    pub async fn send_raw(&self, connection_id: &str, message: &str) {
        self.handler
            .handle_message(connection_id, message.to_string())
            .await;
    }

    /// Send createRoom and return the code from the roomCreated reply.
    /// Consumes the reply and the creator's updateConnections{1} frame.
    pub async fn create_room(&self, connection_id: &str) -> String {
        self.send_raw(connection_id, r#"{"type":"createRoom"}"#).await;

        let reply = self
            .connections
            .consume_message_for(connection_id)
            .await
            .expect("no roomCreated reply");
        let reply: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(reply["type"], "roomCreated");

        let count = self
            .connections
            .consume_message_for(connection_id)
            .await
            .expect("no updateConnections after create");
        let count: serde_json::Value = serde_json::from_str(&count).unwrap();
        assert_eq!(count["type"], "updateConnections");
        assert_eq!(count["count"], 1);

        reply["roomId"].as_str().expect("roomId missing").to_string()
    }

    /// Send joinRoom for a code
    pub async fn join_room(&self, connection_id: &str, code: &str) {
        self.send_raw(
            connection_id,
            &json!({ "type": "joinRoom", "roomId": code }).to_string(),
        )
        .await;
    }

    /// Send placeObject with the given object payload, returning the raw
    /// frame for verbatim-relay assertions
    pub async fn place_object(&self, connection_id: &str, object: serde_json::Value) -> String {
        let raw = json!({ "type": "placeObject", "object": object }).to_string();
        self.send_raw(connection_id, &raw).await;
        raw
    }

    /// Send updateObject with the given object payload
    pub async fn update_object(&self, connection_id: &str, object: serde_json::Value) -> String {
        let raw = json!({ "type": "updateObject", "object": object }).to_string();
        self.send_raw(connection_id, &raw).await;
        raw
    }

    /// Send deleteObject for a uuid
    pub async fn delete_object(&self, connection_id: &str, uuid: &str) -> String {
        let raw = json!({ "type": "deleteObject", "uuid": uuid }).to_string();
        self.send_raw(connection_id, &raw).await;
        raw
    }

    /// Simulate the transport reporting the connection closed
    pub async fn disconnect(&self, connection_id: &str) {
        self.handler.handle_disconnect(connection_id).await;
    }
}
