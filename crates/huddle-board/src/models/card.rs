//! A single contributed card.

use crate::models::Board;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One note on a board. Text, author, column and creation time are immutable
/// after the initial write; only the vote fields mutate, and votes only grow.
///
/// `voters` is an optional capability: cards written before voter tracking
/// existed have none, in which case `votes` is an unguarded counter and every
/// vote is allowed. That is a compatibility decision, not missing data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Card text, non-empty after trimming (caller's precondition).
    pub text: String,

    /// Display name of the contributor.
    pub author: String,

    /// Index into the board's column list.
    pub column_index: u32,

    /// Creation time, milliseconds since the Unix epoch.
    pub created_at: u64,

    /// Vote count. Equals the voter set size whenever voter tracking is on.
    pub votes: u64,

    /// Sessions that have voted, as a presence map. Absent on the wire when
    /// empty.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub voters: HashMap<String, bool>,
}

impl Card {
    /// Create a fresh card with no votes.
    pub fn new(
        text: impl Into<String>,
        author: impl Into<String>,
        column_index: u32,
        created_at: u64,
    ) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            column_index,
            created_at,
            votes: 0,
            voters: HashMap::new(),
        }
    }

    /// Store path of one card.
    pub fn path(slug: &str, card_id: &str) -> String {
        format!("{}/{}", Board::cards_path(slug), card_id)
    }

    /// Field path of one session's presence flag, relative to the card.
    pub fn voter_field(session_id: &str) -> String {
        format!("voters/{}", session_id)
    }

    /// Whether this session already voted on the card.
    pub fn has_voted(&self, session_id: &str) -> bool {
        self.voters.get(session_id).copied().unwrap_or(false)
    }
}
