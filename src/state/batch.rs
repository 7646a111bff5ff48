//! Inventory batch: one product lot keyed by its expiration date.

use std::fmt;

use tracing::debug;

use super::queue::{Order, OrderQueue};
use crate::{
    error::{InventoryError, InventoryResult},
    types::{Date, Quantity, Stock},
};

/// Indexed inventory entry.
///
/// Stock plus the quantity reserved by the order queue stays constant across
/// dispatches and cancellations: every queued order debits stock, every
/// cancelled order credits it back.
#[derive(Clone, Debug)]
pub struct Batch {
    date: Date,
    product: String,
    stock: Stock,
    orders: OrderQueue,
}

impl Batch {
    pub(crate) fn new(date: Date, stock: Stock, product: String) -> Self {
        Self {
            date,
            product,
            stock,
            orders: OrderQueue::new(),
        }
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn stock(&self) -> Stock {
        self.stock
    }

    /// Pending dispatch orders, oldest first.
    pub fn orders(&self) -> &OrderQueue {
        &self.orders
    }

    pub fn pending_orders(&self) -> usize {
        self.orders.count()
    }

    /// Read-only view used for reporting.
    pub fn snapshot(&self) -> BatchSnapshot {
        BatchSnapshot {
            date: self.date,
            product: self.product.clone(),
            stock: self.stock,
            pending_orders: self.orders.count(),
        }
    }

    /// Queue an order against this batch and debit its stock.
    ///
    /// No partial fulfillment: fails without side effects if stock is short.
    pub(crate) fn reserve(&mut self, destination: String, quantity: Quantity) -> InventoryResult<()> {
        if self.stock < quantity {
            return Err(InventoryError::InsufficientStock {
                date: self.date,
                product: self.product.clone(),
                available: self.stock,
                requested: quantity,
            });
        }
        self.orders
            .enqueue(Order::new(destination, quantity))
            .map_err(|_| InventoryError::AllocationFailure { date: self.date })?;
        self.stock -= quantity;
        debug!(date = self.date, quantity, stock = self.stock, "order queued");
        Ok(())
    }

    /// Cancel the earliest matching order and credit its quantity back.
    pub(crate) fn cancel(&mut self, destination: &str, quantity: Quantity) -> InventoryResult<Order> {
        let order = self.orders.cancel(destination, quantity).ok_or_else(|| {
            InventoryError::OrderNotFound {
                date: self.date,
                destination: destination.to_owned(),
                quantity,
            }
        })?;
        self.stock += order.quantity();
        debug!(date = self.date, quantity, stock = self.stock, "order cancelled");
        Ok(order)
    }

    /// Drop every pending order, returning how many were discarded.
    pub(crate) fn release_orders(&mut self) -> usize {
        self.orders.release_all()
    }
}

/// Read-only view of a batch, as shown in the depot report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchSnapshot {
    pub date: Date,
    pub product: String,
    pub stock: Stock,
    pub pending_orders: usize,
}

impl fmt::Display for BatchSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Fecha: {} | Producto: {} | Stock: {} | Pedidos en espera: {}",
            self.date, self.product, self.stock, self.pending_orders
        )
    }
}
