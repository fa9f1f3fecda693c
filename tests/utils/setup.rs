//! Test harness wiring the relay handler to an in-memory registry and the
//! recording mock connection manager.

use std::sync::Arc;

use scenesync::{ConnectionManager, InMemoryRoomRegistry, RelayMessageHandler, RoomRegistry};

use super::mocks::MockConnectionManager;

pub struct TestSetup {
    pub registry: Arc<InMemoryRoomRegistry>,
    pub connections: Arc<MockConnectionManager>,
    pub handler: RelayMessageHandler,
}

impl TestSetup {
    pub fn new() -> Self {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let connections = Arc::new(MockConnectionManager::new());

        let handler = RelayMessageHandler::new(
            registry.clone() as Arc<dyn RoomRegistry>,
            connections.clone() as Arc<dyn ConnectionManager>,
        );

        Self {
            registry,
            connections,
            handler,
        }
    }
}

impl Default for TestSetup {
    fn default() -> Self {
        Self::new()
    }
}
