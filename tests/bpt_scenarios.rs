//! End-to-end BPT scenarios worked out in the specification's testable-properties
//! section: split cascade, delete-with-merge, cross-leaf range scan, and auto-clamp.

use tuple_index_engines::config::BptConfig;
use tuple_index_engines::record::Record;
use tuple_index_engines::BPlusTree;

fn fresh(num_fields: usize, page_size: usize) -> BPlusTree {
    let (tree, _) = BPlusTree::new(&BptConfig::new(num_fields, page_size));
    tree
}

#[test]
fn split_cascade() {
    // num_fields=3, page_size=64 -> leaf_max_keys=3. Inserting 1..=4 forces a leaf
    // split and a new internal root.
    let mut tree = fresh(3, 64);
    for k in 1..=4 {
        tree.insert(Record::new(vec![k, k * 10, k * 100])).unwrap();
    }
    tree.check_invariants();
    assert_eq!(tree.height(), 2);
    for k in 1..=4 {
        assert_eq!(tree.search(k).unwrap().key(), k);
    }
}

#[test]
fn delete_with_merge_collapses_root() {
    let mut tree = fresh(3, 64);
    for k in 1..=4 {
        tree.insert(Record::new(vec![k, k * 10, k * 100])).unwrap();
    }
    tree.check_invariants();

    assert!(tree.delete(4));
    tree.check_invariants();
    assert!(tree.delete(3));
    tree.check_invariants();

    assert_eq!(tree.height(), 1);
    assert_eq!(tree.range(i32::MIN, i32::MAX).iter().map(|r| r.key()).collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn range_scan_across_leaves() {
    let mut tree = fresh(3, 64);
    for k in 1..=10 {
        tree.insert(Record::new(vec![k, k * 10, k * 100])).unwrap();
    }
    tree.check_invariants();

    let got: Vec<Vec<i32>> = tree.range(3, 7).into_iter().map(|r| r.fields().to_vec()).collect();
    let expected: Vec<Vec<i32>> = (3..=7).map(|k| vec![k, k * 10, k * 100]).collect();
    assert_eq!(got, expected);
}

#[test]
fn range_with_inverted_bounds_is_empty() {
    let mut tree = fresh(3, 64);
    tree.insert(Record::new(vec![5, 50, 500])).unwrap();
    assert!(tree.range(10, 1).is_empty());
}

#[test]
fn auto_clamp_still_satisfies_invariants() {
    // num_fields=3, page_size=10: required minimum is 2*(4+4+12)=40, so this clamps.
    let (mut tree, warning) = BPlusTree::new(&BptConfig::new(3, 10));
    assert!(warning.is_some());
    assert_eq!(tree.capacity().page_size, 40);

    for k in 0..10 {
        tree.insert(Record::new(vec![k, k * 10, k * 100])).unwrap();
    }
    tree.check_invariants();
    for k in 0..10 {
        assert_eq!(tree.search(k).unwrap().key(), k);
    }
}

#[test]
fn duplicate_key_insert_behaves_as_a_multimap() {
    let mut tree = fresh(2, 64);
    tree.insert(Record::new(vec![5, 1])).unwrap();
    tree.insert(Record::new(vec![5, 2])).unwrap();
    tree.check_invariants();

    // search returns the first one encountered in leaf order.
    assert_eq!(tree.search(5).unwrap().fields(), &[5, 1]);
    let all: Vec<Vec<i32>> = tree.range(5, 5).into_iter().map(|r| r.fields().to_vec()).collect();
    assert_eq!(all, vec![vec![5, 1], vec![5, 2]]);
}

#[test]
fn delete_nonexistent_key_is_a_noop() {
    let mut tree = fresh(2, 64);
    tree.insert(Record::new(vec![1, 1])).unwrap();
    assert!(!tree.delete(99));
    assert_eq!(tree.search(1).unwrap().key(), 1);
}

#[test]
fn delete_from_empty_tree_returns_false() {
    let mut tree = fresh(2, 64);
    assert!(!tree.delete(1));
}

#[test]
fn wrong_arity_insert_is_rejected() {
    let mut tree = fresh(3, 64);
    let err = tree.insert(Record::new(vec![1, 2])).unwrap_err();
    assert!(matches!(
        err,
        tuple_index_engines::IndexError::ArityMismatch { expected: 3, actual: 2 }
    ));
}
