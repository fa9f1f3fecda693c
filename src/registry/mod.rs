// Public API - what other modules can use
pub use models::{RoomModel, SceneObject};
pub use repository::{InMemoryRoomRegistry, JoinRoomResult, LeaveRoomResult, RoomRegistry};

// Internal modules
pub mod models;
pub mod repository;
