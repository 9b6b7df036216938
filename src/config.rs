//! Builder-style configuration for both engines, modeled on the teacher's
//! `Config::new(path).buffer_pool_size(n)` chained-setter style.

use crate::capacity::{derive_bpt_capacity, BptCapacity, ConfigWarning};
use crate::record::Schema;

/// Configuration for a [`crate::bpt::BPlusTree`].
#[derive(Debug, Clone)]
pub struct BptConfig {
    pub schema: Schema,
    pub requested_page_size: usize,
}

impl BptConfig {
    /// `num_fields` defaults per spec typically 3; `page_size` typically 64 (pedagogy)
    /// or 256 KiB (stress). Neither is defaulted here — both are required, matching the
    /// distilled spec's "Configuration (both engines)" contract.
    pub fn new(num_fields: usize, page_size: usize) -> Self {
        Self {
            schema: Schema::new(num_fields),
            requested_page_size: page_size,
        }
    }

    /// Derive the capacity this configuration resolves to, along with any clamp warning.
    pub fn resolve(&self) -> (BptCapacity, Option<ConfigWarning>) {
        derive_bpt_capacity(self.schema, self.requested_page_size)
    }
}

/// Configuration for a [`crate::lht::LinearHashTable`].
#[derive(Debug, Clone)]
pub struct LhtConfig {
    pub schema: Schema,
    pub total_bytes: usize,
}

impl LhtConfig {
    pub fn new(num_fields: usize, total_bytes: usize) -> Self {
        Self {
            schema: Schema::new(num_fields),
            total_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bpt_config_resolves_capacity() {
        let cfg = BptConfig::new(3, 64);
        let (cap, warn) = cfg.resolve();
        assert!(warn.is_none());
        assert_eq!(cap.leaf_max_keys, 3);
    }

    #[test]
    fn bpt_config_surfaces_clamp_warning() {
        let cfg = BptConfig::new(3, 10);
        let (cap, warn) = cfg.resolve();
        assert_eq!(cap.page_size, 40);
        assert!(warn.is_some());
    }
}
