//! In-process realtime store backend.
//!
//! A JSON tree behind an async `RwLock`, with a broadcast bus of changed
//! paths. Every mutation takes the write lock, which is what gives
//! [`RealtimeStore::update`] its per-path atomicity. Each subscription runs
//! one forwarding task that filters bus events and re-reads the subscribed
//! path, so observers always receive full current values rather than diffs.

use crate::error::{Error, Result};
use crate::key::PushKeys;
use crate::{FieldOp, RealtimeStore, StoreEvent, Subscription};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, mpsc, RwLock};

/// Capacity of the change bus. A lagged subscriber resynchronizes with a
/// fresh snapshot instead of failing, since deliveries are full-state.
const BUS_CAPACITY: usize = 256;

/// Per-observer delivery buffer. A slow observer backpressures its own
/// forwarding task only.
const FEED_CAPACITY: usize = 16;

/// In-memory realtime store.
#[derive(Clone)]
pub struct MemoryStore {
    tree: Arc<RwLock<Value>>,
    bus: broadcast::Sender<String>,
    keys: Arc<Mutex<PushKeys>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (bus, _) = broadcast::channel(BUS_CAPACITY);
        Self {
            tree: Arc::new(RwLock::new(Value::Object(Map::new()))),
            bus,
            keys: Arc::new(Mutex::new(PushKeys::new())),
        }
    }

    /// Number of live subscriptions. Lets tests assert that cancellation
    /// actually detaches the feed.
    pub fn subscriber_count(&self) -> usize {
        self.bus.receiver_count()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RealtimeStore for MemoryStore {
    async fn read(&self, path: &str) -> Result<Option<Value>> {
        let segments = split(path)?;
        let tree = self.tree.read().await;
        Ok(get_at(&tree, &segments).cloned())
    }

    async fn write(&self, path: &str, value: Value) -> Result<()> {
        let segments = split(path)?;
        {
            let mut tree = self.tree.write().await;
            set_at(&mut tree, &segments, value);
        }
        let _ = self.bus.send(path.to_string());
        Ok(())
    }

    async fn update(&self, path: &str, fields: Vec<(String, FieldOp)>) -> Result<()> {
        let segments = split(path)?;
        // Validate every field name up front so a bad one cannot leave a
        // half-applied merge.
        for (field, _) in &fields {
            split(field)?;
        }
        {
            let mut tree = self.tree.write().await;
            for (field, op) in fields {
                apply_field(&mut tree, &segments, &field, op);
            }
        }
        let _ = self.bus.send(path.to_string());
        Ok(())
    }

    fn generate_child_key(&self, _parent: &str) -> String {
        let mut keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        keys.next()
    }

    async fn subscribe(&self, path: &str) -> Result<Subscription> {
        split(path)?;
        let mut bus_rx = self.bus.subscribe();
        let (tx, rx) = mpsc::channel(FEED_CAPACITY);
        let tree = Arc::clone(&self.tree);
        let sub_path = path.to_string();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    // The observer dropped its handle; detach even if no
                    // change ever arrives again.
                    _ = tx.closed() => break,
                    changed = bus_rx.recv() => {
                        match changed {
                            Ok(p) if !paths_overlap(&sub_path, &p) => continue,
                            Ok(_) => {}
                            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                                tracing::debug!(path = %sub_path, skipped, "change bus lagged; resyncing");
                            }
                            Err(broadcast::error::RecvError::Closed) => break,
                        }
                        let snapshot = {
                            let tree = tree.read().await;
                            read_path(&tree, &sub_path)
                        };
                        if tx.send(StoreEvent::Changed(snapshot)).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Ok(Subscription::new(rx))
    }
}

fn split(path: &str) -> Result<Vec<&str>> {
    if path.is_empty() {
        return Err(Error::InvalidPath(path.to_string()));
    }
    let segments: Vec<&str> = path.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(Error::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

fn get_at<'a>(root: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    let mut node = root;
    for seg in segments {
        node = node.as_object()?.get(*seg)?;
    }
    Some(node)
}

fn read_path(root: &Value, path: &str) -> Option<Value> {
    split(path).ok().and_then(|segs| get_at(root, &segs).cloned())
}

/// Write `value` at the path, materializing intermediate objects. A null
/// value removes the leaf.
fn set_at(root: &mut Value, segments: &[&str], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut node = root;
    for seg in parents {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        node = match node {
            Value::Object(obj) => obj
                .entry(seg.to_string())
                .or_insert_with(|| Value::Object(Map::new())),
            _ => return,
        };
    }
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(obj) = node {
        if value.is_null() {
            obj.remove(*last);
        } else {
            obj.insert((*last).to_string(), value);
        }
    }
}

fn apply_field(root: &mut Value, base: &[&str], field: &str, op: FieldOp) {
    let Ok(extra) = split(field) else {
        return;
    };
    let mut segments = base.to_vec();
    segments.extend(extra);
    match op {
        FieldOp::Set(v) => set_at(root, &segments, v),
        FieldOp::Increment(delta) => {
            let current = get_at(root, &segments).and_then(Value::as_i64).unwrap_or(0);
            set_at(root, &segments, Value::from(current + delta));
        }
    }
}

/// True when a change at `changed` is visible from a subscription at `sub`:
/// same path, a descendant, or an ancestor overwriting the subtree.
fn paths_overlap(sub: &str, changed: &str) -> bool {
    if sub == changed {
        return true;
    }
    let (long, short) = if sub.len() > changed.len() {
        (sub, changed)
    } else {
        (changed, sub)
    };
    long.starts_with(short) && long.as_bytes()[short.len()] == b'/'
}
