//! The retrospective board document.

use crate::models::Card;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A retrospective board: a named document with a fixed ordered column list
/// and a map of contributed cards.
///
/// Identified externally by its slug, which doubles as the store key under
/// [`Board::ROOT`]. Columns are set at creation and never change; cards are
/// only ever appended or vote-mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Display name as entered by the creator (arbitrary characters).
    pub name: String,

    /// Creation time, milliseconds since the Unix epoch.
    pub created_at: u64,

    /// Fixed ordered column titles.
    pub columns: Vec<String>,

    /// Cards keyed by store-assigned card id. Absent on the wire when empty.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub cards: HashMap<String, Card>,
}

impl Board {
    /// Store prefix all boards live under.
    pub const ROOT: &'static str = "retro-boards";

    /// Column set every new board starts with.
    pub const DEFAULT_COLUMNS: [&'static str; 3] =
        ["What went well", "What didn't go well", "Action items"];

    /// Create a board with the default columns and no cards.
    pub fn new(name: impl Into<String>, created_at: u64) -> Self {
        Self {
            name: name.into(),
            created_at,
            columns: Self::DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            cards: HashMap::new(),
        }
    }

    /// Store path of the board with the given slug.
    pub fn path(slug: &str) -> String {
        format!("{}/{}", Self::ROOT, slug)
    }

    /// Store path of a board's card map.
    pub fn cards_path(slug: &str) -> String {
        format!("{}/{}/cards", Self::ROOT, slug)
    }

    /// Cards belonging to one column, ordered by card id. Card ids are
    /// time-ordered push keys, so this is creation order.
    pub fn cards_in_column(&self, column_index: u32) -> Vec<(&str, &Card)> {
        let mut cards: Vec<(&str, &Card)> = self
            .cards
            .iter()
            .filter(|(_, card)| card.column_index == column_index)
            .map(|(id, card)| (id.as_str(), card))
            .collect();
        cards.sort_by_key(|(id, _)| *id);
        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_board_has_default_columns() {
        let board = Board::new("Sprint 1", 1_000);
        assert_eq!(board.columns.len(), 3);
        assert_eq!(board.columns[0], "What went well");
        assert!(board.cards.is_empty());
    }

    #[test]
    fn paths() {
        assert_eq!(Board::path("sprint-1"), "retro-boards/sprint-1");
        assert_eq!(Board::cards_path("sprint-1"), "retro-boards/sprint-1/cards");
    }

    #[test]
    fn empty_cards_absent_on_wire() {
        let board = Board::new("Sprint 1", 1_000);
        let json = serde_json::to_value(&board).unwrap();
        assert!(json.get("cards").is_none());
        assert_eq!(json["createdAt"], 1_000);
    }

    #[test]
    fn board_without_cards_field_decodes() {
        let json = serde_json::json!({
            "name": "Sprint 1",
            "createdAt": 1_000,
            "columns": ["a", "b", "c"],
        });
        let board: Board = serde_json::from_value(json).unwrap();
        assert!(board.cards.is_empty());
    }

    #[test]
    fn cards_in_column_sorted_by_id() {
        let mut board = Board::new("Sprint 1", 0);
        board
            .cards
            .insert("b".into(), Card::new("second", "Ann", 0, 2));
        board
            .cards
            .insert("a".into(), Card::new("first", "Bob", 0, 1));
        board
            .cards
            .insert("c".into(), Card::new("elsewhere", "Cay", 1, 3));

        let column: Vec<&str> = board
            .cards_in_column(0)
            .iter()
            .map(|(_, card)| card.text.as_str())
            .collect();
        assert_eq!(column, vec!["first", "second"]);
    }
}
