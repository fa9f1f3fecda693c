use axum::{routing::get, Router};
use scenesync::registry::{self, InMemoryRoomRegistry};
use scenesync::relay::{self, InMemoryConnectionManager, RelayMessageHandler};
use scenesync::shared::AppState;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scenesync=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting scene relay server");

    // Create shared application state with dependency injection
    let room_registry: Arc<dyn registry::RoomRegistry> = Arc::new(InMemoryRoomRegistry::new());
    let connection_manager: Arc<dyn relay::ConnectionManager> =
        Arc::new(InMemoryConnectionManager::new());
    let relay_handler = Arc::new(RelayMessageHandler::new(
        room_registry.clone(),
        connection_manager.clone(),
    ));

    let app_state = AppState::new(room_registry, connection_manager, relay_handler);

    // WebSocket relay endpoint plus the static client assets
    let app = Router::new()
        .route("/ws", get(relay::websocket_handler))
        .fallback_service(ServeDir::new("public"))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .unwrap();
    info!("Server running on http://localhost:{port}");
    axum::serve(listener, app).await.unwrap();
}
