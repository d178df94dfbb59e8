//! Huddle server binary
//!
//! Hosts the shared realtime store and serves the board API over HTTP and
//! WebSocket. All clients of one server converge through its store.

use huddle_api::{build_router, AppState, ServerConfig};
use huddle_store::MemoryStore;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "huddle_api=info,huddle_board=info,huddle_store=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::default();
    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(AppState::new(store));

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!("huddle server listening on http://{}", config.addr);
    axum::serve(listener, app).await?;

    Ok(())
}
