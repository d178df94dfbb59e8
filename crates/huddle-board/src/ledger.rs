//! Card appends and vote recording.

use crate::error::Result;
use crate::models::{Board, Card};
use huddle_store::{FieldOp, RealtimeStore};
use serde_json::Value;
use std::sync::Arc;

/// Appends cards to a board's column set and records votes against a
/// per-session dedup set.
pub struct CardLedger {
    store: Arc<dyn RealtimeStore>,
}

impl CardLedger {
    pub fn new(store: Arc<dyn RealtimeStore>) -> Self {
        Self { store }
    }

    /// Append a card and return its store-assigned id.
    ///
    /// `text` must be non-empty after trimming; that is the caller's
    /// precondition and is not re-validated here. The board itself is not
    /// checked either: writing under an absent board creates the card
    /// branch, which is accepted store semantics, not an error.
    pub async fn add_card(
        &self,
        slug: &str,
        column_index: u32,
        text: &str,
        author: &str,
        created_at: u64,
    ) -> Result<String> {
        let cards_path = Board::cards_path(slug);
        let card_id = self.store.generate_child_key(&cards_path);
        let card = Card::new(text, author, column_index, created_at);

        self.store
            .write(&Card::path(slug, &card_id), serde_json::to_value(&card)?)
            .await?;
        tracing::debug!(slug = %slug, card = %card_id, column = column_index, "card added");
        Ok(card_id)
    }

    /// Record one vote from `session_id` on a card.
    ///
    /// Returns `false` without touching the store when the card is missing
    /// or the session already voted. Otherwise sets the session's voter flag
    /// and increments the count in a single atomic merge, so votes from
    /// distinct sessions racing each other both land.
    ///
    /// Known race: two concurrent votes from the *same* session can both
    /// pass the dedup check before either lands, double-incrementing the
    /// count while the voter flag is set once. Tolerated; closing it needs a
    /// store-side read-check-write transaction.
    pub async fn vote_card(&self, slug: &str, card_id: &str, session_id: &str) -> Result<bool> {
        let path = Card::path(slug, card_id);
        let Some(value) = self.store.read(&path).await? else {
            return Ok(false);
        };
        let card: Card = serde_json::from_value(value)?;
        if card.has_voted(session_id) {
            return Ok(false);
        }

        self.store
            .update(
                &path,
                vec![
                    (Card::voter_field(session_id), FieldOp::Set(Value::Bool(true))),
                    ("votes".to_string(), FieldOp::Increment(1)),
                ],
            )
            .await?;
        tracing::debug!(slug = %slug, card = %card_id, "vote recorded");
        Ok(true)
    }
}
