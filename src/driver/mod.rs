//! The driver: an external collaborator that feeds operations into either engine from a
//! CSV operation log or an interactive menu, timing each operation and printing
//! results/errors — never the core itself. Grounded in the teacher's `bin/btree_cli.rs`:
//! plain argv parsing, `println!("OK")` / `eprintln!("ERROR: {}", e)` reporting, and
//! `Instant`-based timing, generalized to dispatch over either engine and both entry
//! modes.

mod csv_driver;
mod interactive;
mod timing;

pub use csv_driver::run_csv;
pub use interactive::run_interactive;
pub use timing::{OpTimer, TimingRecorder, TimingSummary};

use crate::bpt::BPlusTree;
use crate::config::{BptConfig, LhtConfig};
use crate::dump::{BptDump, LhtDump};
use crate::error::Result;
use crate::lht::LinearHashTable;
use crate::record::Record;

/// Either engine, behind one surface the driver can operate uniformly over. Not part of
/// the core: the core types never know this wrapper exists.
pub enum Engine {
    Bpt(BPlusTree),
    Lht(LinearHashTable),
}

impl Engine {
    pub fn new_bpt(config: &BptConfig) -> (Self, Option<crate::capacity::ConfigWarning>) {
        let (tree, warning) = BPlusTree::new(config);
        (Self::Bpt(tree), warning)
    }

    pub fn new_lht(config: &LhtConfig) -> Self {
        Self::Lht(LinearHashTable::new(config))
    }

    pub fn insert(&mut self, record: Record) -> Result<()> {
        match self {
            Engine::Bpt(tree) => tree.insert(record),
            Engine::Lht(table) => table.insert(record),
        }
    }

    pub fn delete(&mut self, key: i32) -> bool {
        match self {
            Engine::Bpt(tree) => tree.delete(key),
            Engine::Lht(table) => table.delete(key),
        }
    }

    pub fn search(&self, key: i32) -> Option<&Record> {
        match self {
            Engine::Bpt(tree) => tree.search(key),
            Engine::Lht(table) => table.search(key),
        }
    }

    pub fn range(&self, lo: i32, hi: i32) -> Vec<&Record> {
        match self {
            Engine::Bpt(tree) => tree.range(lo, hi),
            Engine::Lht(table) => table.range(lo, hi),
        }
    }

    /// Render a diagnostic dump as text, for the driver to print directly.
    pub fn dump_text(&self) -> String {
        match self {
            Engine::Bpt(tree) => {
                let dump = BptDump::capture(tree);
                serde_json::to_string_pretty(&dump).unwrap_or_else(|e| format!("<dump error: {e}>"))
            }
            Engine::Lht(table) => {
                let dump = LhtDump::capture(table);
                serde_json::to_string_pretty(&dump).unwrap_or_else(|e| format!("<dump error: {e}>"))
            }
        }
    }

    pub fn num_fields(&self) -> usize {
        match self {
            Engine::Bpt(tree) => tree.schema().num_fields(),
            Engine::Lht(table) => table.schema().num_fields(),
        }
    }
}
