//! Inventory service: the business operations of the depot.
//!
//! [`Inventory`] exclusively owns the [`BatchIndex`] and is the only way to
//! mutate it. Every operation either completes fully or fails leaving the
//! index and every order queue unchanged.

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
    error::{InventoryError, InventoryResult},
    state::{Batch, BatchIndex, BatchSnapshot},
    types::{self, Date, Quantity, Stock},
};

/// What to do with queued orders when their batch is removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalPolicy {
    /// Remove the batch and silently drop its pending orders.
    #[default]
    Discard,
    /// Refuse to remove a batch while it has pending orders.
    Reject,
}

/// Inventory behavior knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InventoryConfig {
    /// Product and destination names are truncated to this many characters.
    pub max_name_len: usize,
    pub removal_policy: RemovalPolicy,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            max_name_len: types::DEFAULT_MAX_NAME_LEN,
            removal_policy: RemovalPolicy::default(),
        }
    }
}

/// Successful dispatch: the batch the order was queued on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchReceipt {
    pub date: Date,
    pub remaining_stock: Stock,
}

/// Successful cancellation: the batch stock after crediting the order back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CancelReceipt {
    pub date: Date,
    pub stock: Stock,
}

/// Successful batch removal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemovalReceipt {
    pub date: Date,
    pub product: String,
    pub stock: Stock,
    /// Pending orders lost together with the batch.
    pub dropped_orders: usize,
}

/// Depot inventory.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    config: InventoryConfig,
    index: BatchIndex,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InventoryConfig) -> Self {
        Self {
            config,
            index: BatchIndex::new(),
        }
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    /// Read-only access to the underlying index.
    pub fn index(&self) -> &BatchIndex {
        &self.index
    }

    /// Number of batches.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Batch with exactly this date.
    pub fn batch(&self, date: Date) -> Option<&Batch> {
        self.index.get(date)
    }

    /// Oldest batch of the product, the one dispatches are served from.
    pub fn oldest_batch(&self, product: &str) -> Option<&Batch> {
        self.index.oldest_by_product(&self.label(product))
    }

    /// Register a newly received batch.
    ///
    /// # Errors
    ///
    /// [`InventoryError::DuplicateKey`] if a batch with this date exists.
    pub fn receive_batch(&mut self, date: Date, stock: Stock, product: &str) -> InventoryResult<()> {
        let product = self.label(product);
        self.index.insert(date, stock, product)?;
        info!(date, stock, height = self.index.height(), "batch received");
        Ok(())
    }

    /// Queue a dispatch order on the oldest batch of `product`.
    ///
    /// The order is never split and never falls back to a newer batch.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::InvalidQuantity`] if `quantity` is zero
    /// - [`InventoryError::ProductNotFound`] if no batch holds the product
    /// - [`InventoryError::InsufficientStock`] if the oldest batch cannot cover it
    /// - [`InventoryError::AllocationFailure`] if the order cannot be queued
    pub fn dispatch(
        &mut self,
        product: &str,
        destination: &str,
        quantity: Quantity,
    ) -> InventoryResult<DispatchReceipt> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity { quantity: 0 });
        }
        let product = self.label(product);
        let date = self
            .index
            .oldest_by_product(&product)
            .map(Batch::date)
            .ok_or(InventoryError::ProductNotFound { product })?;
        let destination = self.label(destination);
        let batch = self
            .index
            .get_mut(date)
            .ok_or(InventoryError::NotFound { date })?;
        batch.reserve(destination, quantity)?;
        info!(date, quantity, remaining = batch.stock(), "order dispatched");
        Ok(DispatchReceipt {
            date,
            remaining_stock: batch.stock(),
        })
    }

    /// Cancel the earliest queued order matching `(destination, quantity)`
    /// on the batch dated `date`, crediting its quantity back.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::NotFound`] if no batch has this date
    /// - [`InventoryError::OrderNotFound`] if no queued order matches
    pub fn cancel_order(
        &mut self,
        date: Date,
        destination: &str,
        quantity: Quantity,
    ) -> InventoryResult<CancelReceipt> {
        let destination = self.label(destination);
        let batch = self
            .index
            .get_mut(date)
            .ok_or(InventoryError::NotFound { date })?;
        batch.cancel(&destination, quantity)?;
        info!(date, quantity, stock = batch.stock(), "order cancelled");
        Ok(CancelReceipt {
            date,
            stock: batch.stock(),
        })
    }

    /// Remove the batch dated `date`.
    ///
    /// Under [`RemovalPolicy::Discard`] its pending orders are lost.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::NotFound`] if no batch has this date
    /// - [`InventoryError::PendingOrders`] if the policy is
    ///   [`RemovalPolicy::Reject`] and orders are still queued
    pub fn remove_batch(&mut self, date: Date) -> InventoryResult<RemovalReceipt> {
        let pending = self
            .index
            .get(date)
            .ok_or(InventoryError::NotFound { date })?
            .pending_orders();
        if pending > 0 && self.config.removal_policy == RemovalPolicy::Reject {
            return Err(InventoryError::PendingOrders { date, pending });
        }

        let mut batch = self.index.remove(date)?;
        let dropped_orders = batch.release_orders();
        if dropped_orders > 0 {
            warn!(date, dropped_orders, "batch removed with pending orders");
        }
        debug!(date, height = self.index.height(), len = self.index.len(), "batch removed");
        Ok(RemovalReceipt {
            date,
            product: batch.product().to_owned(),
            stock: batch.stock(),
            dropped_orders,
        })
    }

    /// Ascending-by-date views of every batch.
    pub fn report(&self) -> Vec<BatchSnapshot> {
        self.index.snapshots()
    }

    fn label(&self, raw: &str) -> String {
        types::bounded_label(raw, self.config.max_name_len)
    }
}
