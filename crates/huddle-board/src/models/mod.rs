//! Board document models.
//!
//! The stored document shape, shared verbatim by every client:
//!
//! - [`Board`] - name, creation time, fixed column list, card map
//! - [`Card`] - one contributed note with votes and voting sessions
//! - [`slugify`] - URL-safe board identifier derivation
//!
//! Serialized as camelCase JSON because the document is the wire format.

mod board;
mod card;
mod slug;

pub use board::Board;
pub use card::Card;
pub use slug::slugify;
