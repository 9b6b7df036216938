//! Error types shared by both indexing engines.

use thiserror::Error;

/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors that can occur while operating on a [`BPlusTree`](crate::bpt::BPlusTree) or a
/// [`LinearHashTable`](crate::lht::LinearHashTable).
///
/// `NotFound` is deliberately absent: per the spec, a missing key on `search`/`delete` is
/// not an error, and is reported through `Option`/`bool` return values instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// The record did not have exactly `num_fields` values.
    #[error("record has {actual} fields, expected {expected}")]
    ArityMismatch { expected: usize, actual: usize },

    /// LHT rejected an insert because the key is already present (live).
    #[error("duplicate key {key} already occupies slot {slot}")]
    DuplicateKey { key: i32, slot: usize },

    /// LHT rejected an insert because every slot is live.
    #[error("hash table is full ({slot_count} slots occupied)")]
    Full { slot_count: usize },

    /// The driver could not parse an operation or its operands.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A driver-level operation was invalid for the current state.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

impl IndexError {
    /// Construct a [`IndexError::MalformedInput`] from anything `Display`-able.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    /// Construct an [`IndexError::InvalidOperation`] from anything `Display`-able.
    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }
}
