//! Mock implementations for testing the relay without live sockets
#![allow(dead_code)] // Test utilities may not all be used in every test

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use tokio::sync::{mpsc, RwLock};

use scenesync::ConnectionManager;

/// ConnectionManager that records every outbound frame per connection id
/// instead of writing to a socket.
pub struct MockConnectionManager {
    messages: RwLock<HashMap<String, VecDeque<String>>>,
}

impl MockConnectionManager {
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(HashMap::new()),
        }
    }

    /// Pop the oldest recorded frame for a connection
    pub async fn consume_message_for(&self, connection_id: &str) -> Option<String> {
        let mut messages = self.messages.write().await;
        messages.get_mut(connection_id)?.pop_front()
    }

    /// Number of recorded frames waiting for a connection
    pub async fn message_count(&self, connection_id: &str) -> usize {
        let messages = self.messages.read().await;
        messages.get(connection_id).map(|q| q.len()).unwrap_or(0)
    }

    /// Drop all recorded frames
    pub async fn clear_messages(&self) {
        let mut messages = self.messages.write().await;
        messages.clear();
    }
}

#[async_trait]
impl ConnectionManager for MockConnectionManager {
    async fn add_connection(&self, _connection_id: String, _sender: mpsc::UnboundedSender<String>) {
        // Recording mock has no channels to track
    }

    async fn remove_connection(&self, _connection_id: &str) {}

    async fn send_to(&self, connection_id: &str, message: &str) {
        let mut messages = self.messages.write().await;
        messages
            .entry(connection_id.to_string())
            .or_default()
            .push_back(message.to_string());
    }

    async fn send_to_many(&self, connection_ids: &[String], message: &str) {
        let mut messages = self.messages.write().await;
        for connection_id in connection_ids {
            messages
                .entry(connection_id.clone())
                .or_default()
                .push_back(message.to_string());
        }
    }
}
