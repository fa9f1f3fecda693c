use std::sync::Arc;
use thiserror::Error;

use crate::registry::RoomRegistry;
use crate::relay::{ConnectionManager, RelayMessageHandler};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn RoomRegistry>,
    pub connections: Arc<dyn ConnectionManager>,
    pub relay: Arc<RelayMessageHandler>,
}

impl AppState {
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        connections: Arc<dyn ConnectionManager>,
        relay: Arc<RelayMessageHandler>,
    ) -> Self {
        Self {
            registry,
            connections,
            relay,
        }
    }
}

/// Failures the relay core can actually produce. Absence of a room or object
/// is a valid outcome, not an error, and lives in the registry's result
/// enums instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("could not generate a free room code after bounded retries")]
    RoomCodesExhausted,
}
