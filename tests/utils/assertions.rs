//! Assertion helpers for verifying outbound frames
#![allow(dead_code)] // Test utilities may not all be used in every test

use super::setup::TestSetup;

impl TestSetup {
    /// Consume the next frame for a connection and parse it
    pub async fn expect_message(&self, connection_id: &str) -> serde_json::Value {
        let raw = self
            .connections
            .consume_message_for(connection_id)
            .await
            .unwrap_or_else(|| panic!("expected a frame for {connection_id}, queue is empty"));
        serde_json::from_str(&raw).unwrap()
    }

    /// Consume the next frame and assert it is byte-identical to `raw`
    /// (verbatim relay, no re-encoding)
    pub async fn expect_verbatim(&self, connection_id: &str, raw: &str) {
        let received = self
            .connections
            .consume_message_for(connection_id)
            .await
            .unwrap_or_else(|| panic!("expected a relayed frame for {connection_id}"));
        assert_eq!(received, raw, "relayed frame was re-encoded or altered");
    }

    /// Consume the next frame and assert it is updateConnections with the
    /// given count
    pub async fn expect_update_connections(&self, connection_id: &str, count: usize) {
        let msg = self.expect_message(connection_id).await;
        assert_eq!(msg["type"], "updateConnections");
        assert_eq!(msg["count"], count);
    }

    /// Assert a connection has no pending frames
    pub async fn assert_no_messages(&self, connection_id: &str) {
        let pending = self.connections.message_count(connection_id).await;
        assert_eq!(pending, 0, "expected no frames for {connection_id}, found {pending}");
    }
}
