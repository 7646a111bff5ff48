//! Tests for the balanced batch index.

use super::*;

// ============================================================================
// TEST DSL MACROS
// ============================================================================

/// Build an index from (date, stock, product) triples, checking balance
/// after every insert.
/// index![(date, stock, product), ...]
macro_rules! index {
    ($(($date:expr, $stock:expr, $product:expr)),* $(,)?) => {{
        let mut index = BatchIndex::new();
        $(
            index.insert($date, $stock, $product.to_string()).expect("fresh date");
            assert!(index.is_height_balanced(), "unbalanced after inserting {}", $date);
        )*
        index
    }};
}

/// Assert the in-order sequence of dates.
macro_rules! assert_dates {
    ($index:expr => [$($date:expr),*]) => {
        let dates: Vec<Date> = $index.iter().map(|b| b.date()).collect();
        assert_eq!(dates, vec![$($date),*], "in-order dates");
    };
}

/// Assert batch state: (product, stock, pending orders).
macro_rules! assert_batch {
    ($index:expr, $date:expr => ($product:expr, $stock:expr, $pending:expr)) => {
        let batch = $index.get($date).expect(&format!("batch {} exists", $date));
        assert_eq!(batch.product(), $product, "batch {} product", $date);
        assert_eq!(batch.stock(), $stock, "batch {} stock", $date);
        assert_eq!(batch.pending_orders(), $pending, "batch {} pending", $date);
    };
}

fn root_date(index: &BatchIndex) -> Option<Date> {
    index.root.as_ref().map(|node| node.batch.date())
}

// ============================================================================
// INSERT / SEARCH
// ============================================================================

#[test]
fn insert_and_get() {
    let index = index![(20240101, 100, "Rice"), (20240105, 50, "Rice"), (20240103, 70, "Rice")];

    assert_eq!(index.len(), 3);
    assert_batch!(index, 20240103 => ("Rice", 70, 0));
    assert!(index.get(20240102).is_none());
    assert!(index.contains(20240105));
}

#[test]
fn insert_duplicate_leaves_index_unchanged() {
    let mut index = index![(20240101, 100, "Rice"), (20240105, 50, "Rice")];

    let err = index.insert(20240101, 10, "Wheat".into()).unwrap_err();
    assert_eq!(err, InventoryError::DuplicateKey { date: 20240101 });
    assert_eq!(index.len(), 2);
    assert_batch!(index, 20240101 => ("Rice", 100, 0));
}

#[test]
fn ascending_inserts_trigger_left_rotation() {
    let index = index![(1, 1, "a"), (2, 1, "a"), (3, 1, "a")];

    assert_eq!(root_date(&index), Some(2));
    assert_eq!(index.height(), 2);
}

#[test]
fn descending_inserts_trigger_right_rotation() {
    let index = index![(3, 1, "a"), (2, 1, "a"), (1, 1, "a")];

    assert_eq!(root_date(&index), Some(2));
    assert_eq!(index.height(), 2);
}

#[test]
fn left_right_case_double_rotation() {
    let index = index![(30, 1, "a"), (10, 1, "a"), (20, 1, "a")];

    assert_eq!(root_date(&index), Some(20));
    assert_dates!(index => [10, 20, 30]);
}

#[test]
fn right_left_case_double_rotation() {
    let index = index![(10, 1, "a"), (30, 1, "a"), (20, 1, "a")];

    assert_eq!(root_date(&index), Some(20));
    assert_dates!(index => [10, 20, 30]);
}

#[test]
fn rotations_keep_batch_contents() {
    let mut index = index![(1, 10, "a"), (2, 20, "b")];
    index
        .get_mut(1)
        .unwrap()
        .reserve("Lima".into(), 4)
        .unwrap();

    // Triggers a left rotation at the root, moving node 1 down.
    index.insert(3, 30, "c".into()).unwrap();
    assert!(index.is_height_balanced());
    assert_batch!(index, 1 => ("a", 6, 1));
    assert_batch!(index, 2 => ("b", 20, 0));
    assert_batch!(index, 3 => ("c", 30, 0));
}

#[test]
fn height_is_logarithmic_for_sequential_inserts() {
    let mut index = BatchIndex::new();
    for date in 0..1024 {
        index.insert(date, 1, "x".into()).unwrap();
    }

    assert!(index.is_height_balanced());
    // AVL bound: h < 1.44 * log2(n + 2).
    assert!(index.height() <= 14, "height {}", index.height());
    assert_eq!(index.iter().len(), 1024);
}

// ============================================================================
// PRODUCT LOOKUP / TRAVERSAL
// ============================================================================

#[test]
fn oldest_by_product_returns_smallest_date() {
    let index = index![
        (20240110, 5, "Wheat"),
        (20240105, 50, "Rice"),
        (20240101, 100, "Beans"),
        (20240103, 70, "Rice"),
        (20240120, 9, "Rice"),
    ];

    assert_eq!(index.oldest_by_product("Rice").map(|b| b.date()), Some(20240103));
    assert_eq!(index.oldest_by_product("Wheat").map(|b| b.date()), Some(20240110));
    assert!(index.oldest_by_product("rice").is_none());
    assert!(index.oldest_by_product("Corn").is_none());
}

#[test]
fn empty_index() {
    let mut index = BatchIndex::new();

    assert!(index.is_empty());
    assert_eq!(index.height(), 0);
    assert_eq!(index.iter().next().map(|b| b.date()), None);
    assert!(index.snapshots().is_empty());
    assert_eq!(index.remove(1).unwrap_err(), InventoryError::NotFound { date: 1 });
    assert!(index.is_height_balanced());
}

#[test]
fn snapshots_are_ascending() {
    let index = index![(5, 1, "a"), (1, 2, "b"), (3, 3, "c")];
    let snapshots = index.snapshots();

    let dates: Vec<_> = snapshots.iter().map(|s| s.date).collect();
    assert_eq!(dates, vec![1, 3, 5]);
    assert_eq!(snapshots[1].product, "c");
    assert_eq!(snapshots[1].stock, 3);
}

// ============================================================================
// REMOVE
// ============================================================================

#[test]
fn remove_leaf() {
    let mut index = index![(2, 1, "a"), (1, 1, "a"), (3, 1, "a")];

    let removed = index.remove(3).unwrap();
    assert_eq!(removed.date(), 3);
    assert_dates!(index => [1, 2]);
    assert!(index.is_height_balanced());
}

#[test]
fn remove_node_with_single_child() {
    let mut index = index![(2, 1, "a"), (1, 1, "a"), (3, 1, "a"), (4, 1, "a")];

    index.remove(3).unwrap();
    assert_dates!(index => [1, 2, 4]);
    assert!(index.is_height_balanced());
}

#[test]
fn remove_missing_date_is_noop() {
    let mut index = index![(2, 1, "a"), (1, 1, "a")];

    assert_eq!(index.remove(7).unwrap_err(), InventoryError::NotFound { date: 7 });
    assert_eq!(index.len(), 2);
    assert_dates!(index => [1, 2]);
}

#[test]
fn remove_two_children_promotes_successor_with_its_queue() {
    let mut index = index![(20, 1, "a"), (10, 2, "b"), (30, 3, "c"), (25, 40, "d"), (35, 5, "e")];
    index.get_mut(20).unwrap().reserve("Lima".into(), 1).unwrap();
    index.get_mut(25).unwrap().reserve("Cusco".into(), 15).unwrap();
    index.get_mut(25).unwrap().reserve("Puno".into(), 5).unwrap();

    let removed = index.remove(20).unwrap();
    assert_eq!(removed.pending_orders(), 1);
    assert_eq!(removed.orders().front().map(|o| o.destination()), Some("Lima"));

    assert_eq!(root_date(&index), Some(25));
    assert_dates!(index => [10, 25, 30, 35]);
    assert_batch!(index, 25 => ("d", 20, 2));
    let destinations: Vec<_> = index
        .get(25)
        .unwrap()
        .orders()
        .iter()
        .map(|o| o.destination().to_owned())
        .collect();
    assert_eq!(destinations, vec!["Cusco", "Puno"]);
    assert_batch!(index, 10 => ("b", 2, 0));
    assert_batch!(index, 30 => ("c", 3, 0));
    assert_batch!(index, 35 => ("e", 5, 0));
    assert!(index.is_height_balanced());
}

#[test]
fn remove_rebalances_ancestors() {
    // Removing 1 leaves the root right-heavy by two.
    let mut index = index![(2, 1, "a"), (1, 1, "a"), (3, 1, "a"), (4, 1, "a")];

    index.remove(1).unwrap();
    assert_eq!(root_date(&index), Some(3));
    assert!(index.is_height_balanced());
    assert_dates!(index => [2, 3, 4]);
}

#[test]
fn remove_everything() {
    let mut index = BatchIndex::new();
    for date in [50, 20, 80, 10, 30, 70, 90, 25, 35, 75] {
        index.insert(date, 1, "x".into()).unwrap();
    }
    for date in [20, 50, 90, 10, 35, 25, 80, 30, 75, 70] {
        index.remove(date).unwrap();
        assert!(index.is_height_balanced(), "unbalanced after removing {date}");
        assert!(!index.contains(date));
    }
    assert!(index.is_empty());
    assert_eq!(index.len(), 0);
}
