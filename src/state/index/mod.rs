//! Height-balanced (AVL) index of batches keyed by expiration date.
//!
//! Every node exclusively owns its children and its batch, and every batch
//! exclusively owns its order queue. Rotations only rewire child links, so a
//! batch and its queue never move between nodes except on two-children
//! removal, where the in-order successor's batch (queue included) is moved
//! into the surviving node.

mod iter;

#[cfg(test)]
mod tests;

pub use iter::Iter;

use std::{cmp::Ordering, mem};

use super::batch::{Batch, BatchSnapshot};
use crate::{
    error::{InventoryError, InventoryResult},
    types::{Date, Stock},
};

type Link = Option<Box<Node>>;

#[derive(Clone, Debug)]
struct Node {
    batch: Batch,
    /// Cached height of the subtree rooted here, leaves have height 1.
    height: u32,
    left: Link,
    right: Link,
}

impl Node {
    fn leaf(batch: Batch) -> Box<Self> {
        Box::new(Self {
            batch,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance_factor(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }
}

fn height(link: &Link) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

/// Ordered map from date to batch.
#[derive(Clone, Debug, Default)]
pub struct BatchIndex {
    root: Link,
    len: usize,
}

impl BatchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed batches.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree, 0 when empty.
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    /// Batch with exactly this date.
    pub fn get(&self, date: Date) -> Option<&Batch> {
        let mut link = &self.root;
        while let Some(node) = link {
            match date.cmp(&node.batch.date()) {
                Ordering::Less => link = &node.left,
                Ordering::Greater => link = &node.right,
                Ordering::Equal => return Some(&node.batch),
            }
        }
        None
    }

    pub fn contains(&self, date: Date) -> bool {
        self.get(date).is_some()
    }

    pub(crate) fn get_mut(&mut self, date: Date) -> Option<&mut Batch> {
        find_mut(&mut self.root, date)
    }

    /// Oldest (smallest date) batch holding exactly this product.
    ///
    /// Linear in-order scan stopping at the first match.
    pub fn oldest_by_product(&self, product: &str) -> Option<&Batch> {
        self.iter().find(|batch| batch.product() == product)
    }

    /// Batches in ascending date order.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root.as_deref(), self.len)
    }

    /// Ascending-by-date views of every batch.
    pub fn snapshots(&self) -> Vec<BatchSnapshot> {
        self.iter().map(Batch::snapshot).collect()
    }

    /// Insert a new batch with an empty order queue.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::DuplicateKey`] without touching the index if
    /// the date is already present.
    pub(crate) fn insert(&mut self, date: Date, stock: Stock, product: String) -> InventoryResult<()> {
        insert(&mut self.root, Batch::new(date, stock, product))?;
        self.len += 1;
        Ok(())
    }

    /// Remove the batch with this date, returning it along with its order queue.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NotFound`] if no batch has this date.
    pub(crate) fn remove(&mut self, date: Date) -> InventoryResult<Batch> {
        let batch = remove(&mut self.root, date).ok_or(InventoryError::NotFound { date })?;
        self.len -= 1;
        Ok(batch)
    }

    /// Checks cached heights and balance factors of every node, plus strict
    /// key ordering.
    pub fn is_height_balanced(&self) -> bool {
        check_subtree(&self.root, None, None).is_some()
    }
}

fn find_mut(link: &mut Link, date: Date) -> Option<&mut Batch> {
    let node = link.as_deref_mut()?;
    match date.cmp(&node.batch.date()) {
        Ordering::Less => find_mut(&mut node.left, date),
        Ordering::Greater => find_mut(&mut node.right, date),
        Ordering::Equal => Some(&mut node.batch),
    }
}

fn insert(slot: &mut Link, batch: Batch) -> InventoryResult<()> {
    match slot {
        None => {
            *slot = Some(Node::leaf(batch));
            return Ok(());
        }
        Some(node) => match batch.date().cmp(&node.batch.date()) {
            Ordering::Less => insert(&mut node.left, batch)?,
            Ordering::Greater => insert(&mut node.right, batch)?,
            Ordering::Equal => {
                return Err(InventoryError::DuplicateKey { date: batch.date() });
            }
        },
    }
    rebalance_slot(slot);
    Ok(())
}

fn remove(slot: &mut Link, date: Date) -> Option<Batch> {
    let node = slot.as_deref_mut()?;
    let removed = match date.cmp(&node.batch.date()) {
        Ordering::Less => remove(&mut node.left, date)?,
        Ordering::Greater => remove(&mut node.right, date)?,
        Ordering::Equal if node.left.is_some() && node.right.is_some() => {
            // Successor promotion: detach the successor's batch (queue
            // included) from the right subtree, then swap it in.
            let successor_date = min_node(&node.right)?.batch.date();
            let successor = remove(&mut node.right, successor_date)?;
            mem::replace(&mut node.batch, successor)
        }
        Ordering::Equal => {
            let mut node = slot.take()?;
            *slot = node.left.take().or_else(|| node.right.take());
            node.batch
        }
    };
    rebalance_slot(slot);
    Some(removed)
}

fn min_node(link: &Link) -> Option<&Node> {
    let mut node = link.as_deref()?;
    while let Some(left) = node.left.as_deref() {
        node = left;
    }
    Some(node)
}

fn rebalance_slot(slot: &mut Link) {
    if let Some(node) = slot.take() {
        *slot = Some(rebalance(node));
    }
}

fn rebalance(mut node: Box<Node>) -> Box<Node> {
    node.update_height();
    let bf = node.balance_factor();
    if bf > 1 {
        if node.left.as_ref().is_some_and(|left| left.balance_factor() < 0) {
            node.left = node.left.take().map(rotate_left);
        }
        rotate_right(node)
    } else if bf < -1 {
        if node.right.as_ref().is_some_and(|right| right.balance_factor() > 0) {
            node.right = node.right.take().map(rotate_right);
        }
        rotate_left(node)
    } else {
        node
    }
}

fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

/// Returns the subtree height if it is well-formed within `(lower, upper)`.
fn check_subtree(link: &Link, lower: Option<Date>, upper: Option<Date>) -> Option<u32> {
    let Some(node) = link else {
        return Some(0);
    };
    let date = node.batch.date();
    if lower.is_some_and(|l| date <= l) || upper.is_some_and(|u| date >= u) {
        return None;
    }
    let left = check_subtree(&node.left, lower, Some(date))?;
    let right = check_subtree(&node.right, Some(date), upper)?;
    let expected = 1 + left.max(right);
    (left.abs_diff(right) <= 1 && node.height == expected).then_some(expected)
}
