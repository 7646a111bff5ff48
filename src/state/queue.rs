//! FIFO queue of pending dispatch orders attached to one batch.

use std::collections::{TryReserveError, VecDeque};

use crate::types::Quantity;

/// Pending dispatch request reserved against a batch's stock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    destination: String,
    quantity: Quantity,
}

impl Order {
    pub fn new(destination: impl Into<String>, quantity: Quantity) -> Self {
        Self {
            destination: destination.into(),
            quantity,
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    fn matches(&self, destination: &str, quantity: Quantity) -> bool {
        self.quantity == quantity && self.destination == destination
    }
}

/// Orders in arrival order, oldest at the head.
#[derive(Clone, Debug, Default)]
pub struct OrderQueue {
    orders: VecDeque<Order>,
    /// Cached aggregate: total quantity reserved by queued orders.
    cached_reserved: u64,
}

impl OrderQueue {
    /// Create a new empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued orders.
    pub fn count(&self) -> usize {
        self.orders.len()
    }

    /// Total quantity reserved by queued orders (cached, O(1)).
    pub fn reserved(&self) -> u64 {
        self.cached_reserved
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Iterator over queued orders, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Oldest queued order.
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Append an order at the tail.
    ///
    /// The queue is left untouched if memory for the order cannot be reserved.
    pub(crate) fn enqueue(&mut self, order: Order) -> Result<(), TryReserveError> {
        self.orders.try_reserve(1)?;
        self.cached_reserved += u64::from(order.quantity);
        self.orders.push_back(order);
        Ok(())
    }

    /// Remove the earliest order matching `(destination, quantity)` exactly.
    pub(crate) fn cancel(&mut self, destination: &str, quantity: Quantity) -> Option<Order> {
        let position = self
            .orders
            .iter()
            .position(|order| order.matches(destination, quantity))?;
        let order = self.orders.remove(position)?;
        self.cached_reserved -= u64::from(order.quantity);
        Some(order)
    }

    /// Discard every queued order, returning how many were dropped.
    pub(crate) fn release_all(&mut self) -> usize {
        let dropped = self.orders.len();
        self.orders.clear();
        self.cached_reserved = 0;
        dropped
    }
}
