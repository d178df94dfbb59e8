//! Realtime key-value tree store for Huddle.
//!
//! The board core never talks to a concrete backend. It talks to
//! [`RealtimeStore`]: point reads and writes on `/`-delimited string paths,
//! atomic partial updates, time-ordered child key allocation, and
//! change-notification subscriptions. [`MemoryStore`] is the in-process
//! reference backend; the same contract maps onto any realtime document
//! store that offers per-key atomicity.

pub mod error;
pub mod key;
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

pub use error::{Error, Result};
pub use key::PushKeys;
pub use memory::MemoryStore;

/// A single named-field operation inside an atomic [`RealtimeStore::update`].
#[derive(Debug, Clone)]
pub enum FieldOp {
    /// Overwrite the field with a value. `Value::Null` removes it.
    Set(Value),
    /// Add to the field's current numeric value, treating absent or
    /// non-numeric as 0. Applied against the stored value at update time,
    /// never against the caller's earlier read.
    Increment(i64),
}

/// One delivery on a store subscription.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// The value at the subscribed path changed (a write at the path, inside
    /// its subtree, or at an ancestor replacing it). Carries the full current
    /// value; `None` means the node is gone.
    Changed(Option<Value>),
    /// The backend lost the subscription. Terminal: no further events follow.
    Lost(Error),
}

/// Handle to a change feed. Dropping it cancels the subscription and
/// detaches the underlying forwarding task.
pub struct Subscription {
    rx: mpsc::Receiver<StoreEvent>,
}

impl Subscription {
    pub(crate) fn new(rx: mpsc::Receiver<StoreEvent>) -> Self {
        Self { rx }
    }

    /// Wait for the next event. `None` once the feed has ended.
    pub async fn next(&mut self) -> Option<StoreEvent> {
        self.rx.recv().await
    }

    /// Explicitly release the subscription.
    pub fn cancel(self) {}
}

/// Contract the board core requires from the realtime backend.
///
/// Paths are `/`-delimited strings (`retro-boards/sprint-1/cards/abc`).
/// Per-path atomicity of [`update`](Self::update) is the only coordination
/// primitive the core relies on.
#[async_trait]
pub trait RealtimeStore: Send + Sync {
    /// Point read. `None` when nothing is stored at the path.
    async fn read(&self, path: &str) -> Result<Option<Value>>;

    /// Full overwrite of the node at the path. Writing `Value::Null` removes
    /// the node.
    async fn write(&self, path: &str, value: Value) -> Result<()>;

    /// Atomic merge of named sub-fields, applied relative to the current
    /// stored value. Field names may themselves be nested paths
    /// (`voters/s1`). All fields land together or not at all.
    async fn update(&self, path: &str, fields: Vec<(String, FieldOp)>) -> Result<()>;

    /// Allocate a unique, opaque, time-ordered child key under the parent.
    fn generate_child_key(&self, parent: &str) -> String;

    /// Subscribe to changes at and below the path.
    async fn subscribe(&self, path: &str) -> Result<Subscription>;
}
