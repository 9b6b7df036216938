//! In-memory B+ tree indexing engine.

mod arena;
mod node;
mod tree;

pub use tree::{BPlusTree, DumpEntry};
