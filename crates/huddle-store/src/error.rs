//! Error types for huddle-store.

use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur against the realtime store.
///
/// Cloneable so a terminal failure can be fanned out to every live
/// subscription.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The backend could not be reached or failed mid-operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A path was empty or contained an empty segment.
    #[error("invalid path: {0:?}")]
    InvalidPath(String),
}
