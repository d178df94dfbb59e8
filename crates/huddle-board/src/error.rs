//! Error types for the board core.
//!
//! Validation failures (`InvalidName`, `NameTaken`) are synchronous and
//! user-correctable; they go straight back to the caller for inline display.
//! A missing board or card on a point operation is not an error - it is
//! `Ok(None)` or a `false` vote result. No failure here is fatal to the
//! process; each is scoped to the request or feed that raised it.

use thiserror::Error;

/// Result type for board operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in board operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The display name derives to an empty slug.
    #[error("board name has no usable characters")]
    InvalidName,

    /// Another board already owns this slug.
    #[error("a board with the id {0:?} already exists")]
    NameTaken(String),

    /// A stored document did not decode as the expected shape.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The realtime store failed.
    #[error("store error: {0}")]
    Store(#[from] huddle_store::Error),
}
