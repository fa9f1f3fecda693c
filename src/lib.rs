// Library crate for the scene relay server
// This file exposes the public API for integration tests

pub mod registry;
pub mod relay;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use registry::{
    InMemoryRoomRegistry, JoinRoomResult, LeaveRoomResult, RoomModel, RoomRegistry, SceneObject,
};
pub use relay::{
    ClientMessage, ConnectionManager, InMemoryConnectionManager, MessageHandler,
    RelayMessageHandler, ServerMessage,
};
pub use shared::{AppError, AppState};
