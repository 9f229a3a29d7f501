//! Error types for questboard.

use crate::catalog::ItemCategory;
use crate::ids::{ActivityId, IdError, ItemId};

/// Result type for questboard operations.
pub type Result<T> = std::result::Result<T, GameError>;

/// Errors that can occur in questboard operations.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Shop item not found.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// Activity not found.
    #[error("activity not found: {0}")]
    ActivityNotFound(ActivityId),

    /// The student cannot afford the purchase.
    #[error("insufficient points: balance={balance}, required={required}")]
    InsufficientPoints {
        /// Current balance.
        balance: i64,
        /// Price of the item.
        required: i64,
    },

    /// The item is already in the student's inventory.
    #[error("item already owned: {0}")]
    AlreadyOwned(ItemId),

    /// The item is not in the student's inventory.
    #[error("item not owned: {0}")]
    NotOwned(ItemId),

    /// The item does not belong to the requested cosmetic slot.
    #[error("item {item} is a {actual}, not a {requested}")]
    CategoryMismatch {
        /// The item being equipped.
        item: ItemId,
        /// The slot the caller asked for.
        requested: ItemCategory,
        /// The item's real category.
        actual: ItemCategory,
    },

    /// Invalid user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A unique field is already taken.
    #[error("{field} already in use: {value}")]
    Conflict {
        /// Which field collided (`name` or `email`).
        field: &'static str,
        /// The colliding value.
        value: String,
    },

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),
}
