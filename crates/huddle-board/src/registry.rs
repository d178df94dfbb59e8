//! Board creation and lookup.

use crate::error::{Error, Result};
use crate::models::{slugify, Board};
use crate::unix_millis;
use huddle_store::RealtimeStore;
use std::sync::Arc;

/// Creates boards under human-chosen, collision-checked slugs and answers
/// existence checks.
pub struct BoardRegistry {
    store: Arc<dyn RealtimeStore>,
}

impl BoardRegistry {
    pub fn new(store: Arc<dyn RealtimeStore>) -> Self {
        Self { store }
    }

    /// Create a board named `display_name` and return its slug.
    ///
    /// Fails with [`Error::InvalidName`] when the name derives to an empty
    /// slug and [`Error::NameTaken`] when the slug is already occupied.
    ///
    /// The existence check and the write are two separate store calls: an
    /// identical creation racing inside that window can overwrite a
    /// just-created board. Accepted as a bounded race; a backend with a
    /// native create-if-absent primitive should use it here instead.
    pub async fn create_board(&self, display_name: &str) -> Result<String> {
        let slug = slugify(display_name);
        if slug.is_empty() {
            return Err(Error::InvalidName);
        }

        let path = Board::path(&slug);
        if self.store.read(&path).await?.is_some() {
            return Err(Error::NameTaken(slug));
        }

        let board = Board::new(display_name, unix_millis());
        self.store.write(&path, serde_json::to_value(&board)?).await?;
        tracing::info!(slug = %slug, name = %display_name, "board created");
        Ok(slug)
    }

    /// Whether a board exists at this slug. No side effects.
    pub async fn board_exists(&self, slug: &str) -> Result<bool> {
        Ok(self.store.read(&Board::path(slug)).await?.is_some())
    }

    /// One-shot read of a board, for access without subscribing.
    pub async fn get_board(&self, slug: &str) -> Result<Option<Board>> {
        match self.store.read(&Board::path(slug)).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_store::MemoryStore;

    fn registry() -> BoardRegistry {
        BoardRegistry::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn create_then_exists() {
        let registry = registry();
        let slug = registry.create_board("Sprint 1").await.unwrap();
        assert_eq!(slug, "sprint-1");
        assert!(registry.board_exists("sprint-1").await.unwrap());
        assert!(!registry.board_exists("sprint-2").await.unwrap());
    }

    #[tokio::test]
    async fn created_board_shape() {
        let registry = registry();
        let slug = registry.create_board("Sprint 1").await.unwrap();
        let board = registry.get_board(&slug).await.unwrap().unwrap();

        assert_eq!(board.name, "Sprint 1");
        assert_eq!(board.columns.len(), 3);
        assert!(board.cards.is_empty());
        assert!(board.created_at > 0);
    }

    #[tokio::test]
    async fn empty_slug_rejected() {
        let registry = registry();
        assert!(matches!(
            registry.create_board("!!!").await,
            Err(Error::InvalidName)
        ));
        assert!(matches!(
            registry.create_board("   ").await,
            Err(Error::InvalidName)
        ));
    }

    #[tokio::test]
    async fn colliding_slug_rejected() {
        let registry = registry();
        registry.create_board("Sprint 1").await.unwrap();

        // Different display name, same derived slug.
        match registry.create_board("sprint 1").await {
            Err(Error::NameTaken(slug)) => assert_eq!(slug, "sprint-1"),
            other => panic!("expected NameTaken, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn get_missing_board_is_none() {
        let registry = registry();
        assert!(registry.get_board("nope").await.unwrap().is_none());
    }
}
