//! Error types for depot inventory operations.

use thiserror::Error;

use crate::types::{Date, Quantity, Stock};

/// Error type for inventory operations.
///
/// None of these are fatal: an operation that fails leaves the index and
/// every order queue unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Attempted to receive a batch under a date that is already indexed.
    #[error("batch dated {date} already exists")]
    DuplicateKey { date: Date },

    /// No batch is indexed under the date.
    #[error("no batch dated {date}")]
    NotFound { date: Date },

    /// No batch holds the requested product.
    #[error("no batch available for product '{product}'")]
    ProductNotFound { product: String },

    /// Oldest batch of the product cannot cover the requested quantity.
    #[error("insufficient stock in batch {date} ({product}): available {available}, requested {requested}")]
    InsufficientStock {
        date: Date,
        product: String,
        available: Stock,
        requested: Quantity,
    },

    /// Dispatch quantity must be positive.
    #[error("invalid quantity: {quantity}")]
    InvalidQuantity { quantity: i64 },

    /// Batch queue holds no order with the given destination and quantity.
    #[error("order ({destination}, {quantity}) not found in queue of batch {date}")]
    OrderNotFound {
        date: Date,
        destination: String,
        quantity: Quantity,
    },

    /// Batch still has queued orders and the removal policy refuses to drop them.
    #[error("batch {date} has {pending} pending orders")]
    PendingOrders { date: Date, pending: usize },

    /// Memory for a new order could not be obtained.
    #[error("allocation failure while queueing order on batch {date}")]
    AllocationFailure { date: Date },
}

/// Result type for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;
