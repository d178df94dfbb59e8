//! Live board snapshots for any number of independent observers.

use crate::error::Result;
use crate::models::Board;
use huddle_store::{RealtimeStore, StoreEvent};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Per-observer delivery buffer. A slow observer backpressures only its own
/// feed.
const FEED_CAPACITY: usize = 16;

/// Hands out live snapshot feeds of a board.
///
/// Every [`watch`](BoardWatcher::watch) call owns its own store subscription
/// and delivery sequence; observers of the same board are fully independent
/// and the store handles fan-out.
pub struct BoardWatcher {
    store: Arc<dyn RealtimeStore>,
}

impl BoardWatcher {
    pub fn new(store: Arc<dyn RealtimeStore>) -> Self {
        Self { store }
    }

    /// Start watching a board.
    ///
    /// The feed is primed with the current state, so a freshly attached
    /// observer never waits for the first remote mutation. The store
    /// subscription is taken out before the priming read; a write landing in
    /// between is delivered again rather than missed. Every subsequent
    /// change to the board's subtree produces one fresh full snapshot.
    pub async fn watch(&self, slug: &str) -> Result<BoardFeed> {
        let path = Board::path(slug);
        let mut sub = self.store.subscribe(&path).await?;
        let current = self.store.read(&path).await?;

        let (tx, rx) = mpsc::channel(FEED_CAPACITY);
        let watched = slug.to_string();
        tokio::spawn(async move {
            let primed = decode(current);
            let failed = primed.is_err();
            if tx.send(primed).await.is_err() || failed {
                return;
            }
            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    event = sub.next() => {
                        let snapshot = match event {
                            Some(StoreEvent::Changed(value)) => decode(value),
                            Some(StoreEvent::Lost(err)) => {
                                tracing::warn!(slug = %watched, error = %err, "board feed lost");
                                let _ = tx.send(Err(err.into())).await;
                                break;
                            }
                            None => break,
                        };
                        let failed = snapshot.is_err();
                        if tx.send(snapshot).await.is_err() || failed {
                            // A decode failure is terminal for this feed only.
                            break;
                        }
                    }
                }
            }
        });

        Ok(BoardFeed { rx })
    }
}

fn decode(value: Option<Value>) -> Result<Option<Board>> {
    match value {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// One observer's sequence of board snapshots.
///
/// `None` from a snapshot means the board does not exist (yet, or anymore at
/// the store level). An `Err` delivery is terminal: the feed closes and the
/// underlying subscription is released. Dropping the feed cancels it.
pub struct BoardFeed {
    rx: mpsc::Receiver<Result<Option<Board>>>,
}

impl BoardFeed {
    /// Wait for the next snapshot. `None` once the feed has ended.
    pub async fn next(&mut self) -> Option<Result<Option<Board>>> {
        self.rx.recv().await
    }

    /// Explicitly stop observing. Dropping the feed does the same.
    pub fn cancel(self) {}
}
