//! Two in-memory, page-size–parameterized indexing engines over fixed-arity tuples of
//! 32-bit signed integers keyed by their first field: a B+ tree ([`bpt::BPlusTree`])
//! and an open-addressed linear-probe hash table ([`lht::LinearHashTable`]).
//!
//! Both share the same record/schema model ([`record`]), capacity planner
//! ([`capacity`]), and error taxonomy ([`error`]); [`driver`] is the CSV/interactive
//! operation feeder built on top of them, and [`dump`] is the serializable snapshot
//! shape both engines' `dump()` returns.

pub mod bpt;
pub mod capacity;
pub mod config;
pub mod driver;
pub mod dump;
pub mod error;
pub mod lht;
pub mod record;

use parking_lot::RwLock;
use std::sync::Arc;

pub use bpt::BPlusTree;
pub use config::{BptConfig, LhtConfig};
pub use error::{IndexError, Result};
pub use lht::LinearHashTable;
pub use record::{Record, Schema};

/// A thread-safe handle to a [`BPlusTree`], serializing access behind a `RwLock`.
///
/// Grounded in the teacher's `Db { btree: Arc<RwLock<BTree>>, .. }`: this is additive
/// sugar at the engine boundary, not a change to `BPlusTree` itself, which stays
/// single-threaded cooperative internally.
#[derive(Clone)]
pub struct SharedBTree {
    inner: Arc<RwLock<BPlusTree>>,
}

impl SharedBTree {
    pub fn new(config: &BptConfig) -> (Self, Option<capacity::ConfigWarning>) {
        let (tree, warning) = BPlusTree::new(config);
        (
            Self {
                inner: Arc::new(RwLock::new(tree)),
            },
            warning,
        )
    }

    pub fn insert(&self, record: Record) -> Result<()> {
        self.inner.write().insert(record)
    }

    pub fn delete(&self, key: i32) -> bool {
        self.inner.write().delete(key)
    }

    pub fn search(&self, key: i32) -> Option<Record> {
        self.inner.read().search(key).cloned()
    }

    pub fn range(&self, lo: i32, hi: i32) -> Vec<Record> {
        self.inner.read().range(lo, hi).into_iter().cloned().collect()
    }

    pub fn dump(&self) -> dump::BptDump {
        dump::BptDump::capture(&self.inner.read())
    }
}

/// A thread-safe handle to a [`LinearHashTable`], the LHT counterpart to
/// [`SharedBTree`].
#[derive(Clone)]
pub struct SharedHashTable {
    inner: Arc<RwLock<LinearHashTable>>,
}

impl SharedHashTable {
    pub fn new(config: &LhtConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(LinearHashTable::new(config))),
        }
    }

    pub fn insert(&self, record: Record) -> Result<()> {
        self.inner.write().insert(record)
    }

    pub fn delete(&self, key: i32) -> bool {
        self.inner.write().delete(key)
    }

    pub fn search(&self, key: i32) -> Option<Record> {
        self.inner.read().search(key).cloned()
    }

    pub fn range(&self, lo: i32, hi: i32) -> Vec<Record> {
        self.inner.read().range(lo, hi).into_iter().cloned().collect()
    }

    pub fn dump(&self) -> dump::LhtDump {
        dump::LhtDump::capture(&self.inner.read())
    }
}
