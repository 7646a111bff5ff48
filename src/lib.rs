//! Perishable-goods depot ledger.
//!
//! # Overview
//!
//! In-memory inventory of product batches keyed by expiration date.
//!
//! Batches live in a height-balanced ordered index ([`state::BatchIndex`]),
//! each batch owning a FIFO queue of pending dispatch orders
//! ([`state::OrderQueue`]) that reserve stock against it.
//!
//! Use [`inventory::Inventory`] to receive batches, dispatch against the
//! oldest batch of a product, cancel orders and remove batches, and
//! [`inventory::Inventory::report`] to get an ascending-by-date view of the
//! whole depot.
//!
//! # Limitations
//!
//! * State is not persisted across process runs.
//!
//! * Looking up the oldest batch of a product is a linear in-order scan, there
//!   is no secondary index by product name.
//!
//! * The inventory is not synchronized, callers sharing it between threads
//!   have to wrap each top-level operation in their own lock.

pub mod error;
pub mod inventory;
pub mod state;
pub mod types;

pub use error::{InventoryError, InventoryResult};
pub use inventory::{Inventory, InventoryConfig, RemovalPolicy};
