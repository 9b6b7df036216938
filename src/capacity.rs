//! Capacity planning: derives node/table sizing constants from byte budgets.

use crate::record::{Schema, POINTER_SIZE};

/// A non-fatal, constructor-time correction the capacity planner had to make.
///
/// The core never prints this itself; callers ([`crate::config::BptConfig`] and the
/// CLI driver) decide whether and how to report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigWarning {
    /// The requested BPT page size was below the safety minimum and was clamped up.
    PageSizeClamped { requested: usize, clamped_to: usize },
}

/// Derived BPT sizing constants for a given schema and page-byte budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BptCapacity {
    /// Page size actually used (after any clamping).
    pub page_size: usize,
    pub leaf_max_keys: usize,
    pub leaf_min_keys: usize,
    pub internal_order: usize,
    pub internal_max_keys: usize,
    pub internal_min_keys: usize,
}

/// Derive BPT leaf/internal capacity from `num_fields` and a requested `page_size`.
///
/// Mirrors `implementacao_btree_bd.py::BPlusTree.__init__` exactly, including its
/// integer-division `ceil` idiom (`ceil(n / 2) == (n + 1) / 2` for positive `n`).
pub fn derive_bpt_capacity(schema: Schema, page_size: usize) -> (BptCapacity, Option<ConfigWarning>) {
    let key_size = schema.key_size();
    let record_size = schema.record_size();

    let min_page_required = 2 * (POINTER_SIZE + key_size + record_size);
    let (effective_page_size, warning) = if page_size < min_page_required {
        (
            min_page_required,
            Some(ConfigWarning::PageSizeClamped {
                requested: page_size,
                clamped_to: min_page_required,
            }),
        )
    } else {
        (page_size, None)
    };

    let leaf_entry_size = key_size + record_size;
    let leaf_max_keys = ((effective_page_size - POINTER_SIZE) / leaf_entry_size).max(1);
    let leaf_min_keys = ceil_div(leaf_max_keys, 2);

    let denom = POINTER_SIZE + key_size;
    let internal_order = ((effective_page_size + key_size) / denom).max(3);
    let internal_max_keys = internal_order - 1;
    let internal_min_keys = ceil_div(internal_order, 2) - 1;

    (
        BptCapacity {
            page_size: effective_page_size,
            leaf_max_keys,
            leaf_min_keys,
            internal_order,
            internal_max_keys,
            internal_min_keys,
        },
        warning,
    )
}

/// Derive LHT slot count from `num_fields` and a total-byte budget.
///
/// Mirrors `implementacao_linearhash_bd.py::HashLinear.__init__`.
pub fn derive_lht_capacity(schema: Schema, total_bytes: usize) -> usize {
    (total_bytes / schema.record_size()).max(1)
}

fn ceil_div(n: usize, d: usize) -> usize {
    (n + d - 1) / d
}
