//! Depot state: the balanced batch index and the order queues it owns.
//!
//! [`BatchIndex`] is at the root and owns every [`Batch`], each of which owns
//! its [`OrderQueue`]. Mutation is only reachable through
//! [`crate::inventory::Inventory`], which keeps stock and queues consistent.

mod batch;
mod index;
mod queue;

pub use batch::{Batch, BatchSnapshot};
pub use index::{BatchIndex, Iter};
pub use queue::{Order, OrderQueue};
