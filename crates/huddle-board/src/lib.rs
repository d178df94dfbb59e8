//! Huddle board core - collaborative retrospective boards.
//!
//! Any number of uncoordinated clients build and vote on a shared board: a
//! named document with fixed columns, short text cards, and per-card vote
//! counts deduplicated by browser session. The store is the single source of
//! truth and the sole coordination point; no component here holds
//! authoritative state longer than one request or subscription cycle.
//!
//! # Architecture
//!
//! - **Models**: [`Board`], [`Card`] and slug derivation
//! - **Registry**: board creation under collision-checked slugs
//! - **Ledger**: card appends and vote recording
//! - **Watcher**: per-observer live snapshot feeds
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use huddle_board::{BoardRegistry, CardLedger, unix_millis};
//! use huddle_store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new());
//!     let registry = BoardRegistry::new(store.clone());
//!     let ledger = CardLedger::new(store);
//!
//!     let slug = registry.create_board("Sprint 1").await?;
//!     ledger.add_card(&slug, 0, "Ship it", "Ann", unix_millis()).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod ledger;
pub mod models;
pub mod registry;
pub mod sync;

pub use error::{Error, Result};
pub use ledger::CardLedger;
pub use models::{slugify, Board, Card};
pub use registry::BoardRegistry;
pub use sync::{BoardFeed, BoardWatcher};

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as milliseconds since the Unix epoch, the
/// timestamp unit used throughout the stored document.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
