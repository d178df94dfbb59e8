//! HTTP and WebSocket surface for Huddle boards.
//!
//! Thin glue over the board core: the handlers call exactly the five core
//! operations (create, exists, get, add card, vote) and the WebSocket route
//! streams live snapshots from a [`BoardWatcher`] feed. The process hosting
//! this API also hosts the shared store, which is what makes it the single
//! coordination point for every connected client.

pub mod api;
pub mod ws;

pub use api::build_router;

use huddle_board::{BoardRegistry, BoardWatcher, CardLedger};
use huddle_store::RealtimeStore;
use std::net::SocketAddr;
use std::sync::Arc;

/// Configuration for the board server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen address.
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ServerConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let addr = std::env::var("HUDDLE_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8080)));
        Self { addr }
    }
}

/// Shared handler state: the three core components over one store.
pub struct AppState {
    pub registry: BoardRegistry,
    pub ledger: CardLedger,
    pub watcher: BoardWatcher,
}

impl AppState {
    pub fn new(store: Arc<dyn RealtimeStore>) -> Self {
        Self {
            registry: BoardRegistry::new(store.clone()),
            ledger: CardLedger::new(store.clone()),
            watcher: BoardWatcher::new(store),
        }
    }
}
