//! Record and schema: fixed-arity tuples of 32-bit signed integers keyed by field 0.

use crate::error::{IndexError, Result};

/// Nominal size, in bytes, of a single stored integer. Used only in capacity math.
pub const INT_SIZE: usize = 4;

/// Nominal size, in bytes, of a node/child pointer. Used only in capacity math.
pub const POINTER_SIZE: usize = 4;

/// Describes the shape of records an engine accepts: how many `i32` fields each one has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    num_fields: usize,
}

impl Schema {
    /// Create a schema for records with `num_fields` fields (at least 1).
    pub fn new(num_fields: usize) -> Self {
        Self {
            num_fields: num_fields.max(1),
        }
    }

    /// Number of `i32` fields each record under this schema carries.
    pub fn num_fields(self) -> usize {
        self.num_fields
    }

    /// Nominal record width in bytes (`num_fields * INT_SIZE`), used only for capacity
    /// derivation, never for actual in-memory layout.
    pub fn record_size(self) -> usize {
        self.num_fields * INT_SIZE
    }

    /// Nominal key width in bytes. Always `INT_SIZE`: the key is always a single `i32`.
    pub fn key_size(self) -> usize {
        INT_SIZE
    }

    /// Validate a record's field count against this schema, returning an
    /// [`IndexError::ArityMismatch`] on mismatch.
    pub fn validate(self, record: &Record) -> Result<()> {
        let actual = record.fields.len();
        if actual != self.num_fields {
            return Err(IndexError::ArityMismatch {
                expected: self.num_fields,
                actual,
            });
        }
        Ok(())
    }
}

/// An ordered tuple of `i32` fields. `fields[0]` is the key; the rest is opaque payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<i32>,
}

impl Record {
    /// Build a record from its fields. Does not validate arity against any schema;
    /// callers go through `Schema::validate` (which both engines do on every insert).
    pub fn new(fields: Vec<i32>) -> Self {
        Self { fields }
    }

    /// The key: the first field. Panics if the record has zero fields, which cannot
    /// happen for any record that passed `Schema::validate` (schemas require
    /// `num_fields >= 1`).
    pub fn key(&self) -> i32 {
        self.fields[0]
    }

    /// All fields, including the key.
    pub fn fields(&self) -> &[i32] {
        &self.fields
    }

    /// Consume the record, returning its fields.
    pub fn into_fields(self) -> Vec<i32> {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_sizes() {
        let s = Schema::new(3);
        assert_eq!(s.num_fields(), 3);
        assert_eq!(s.record_size(), 12);
        assert_eq!(s.key_size(), 4);
    }

    #[test]
    fn schema_floors_num_fields_at_one() {
        assert_eq!(Schema::new(0).num_fields(), 1);
    }

    #[test]
    fn validate_rejects_wrong_arity() {
        let s = Schema::new(3);
        let r = Record::new(vec![1, 2]);
        assert_eq!(
            s.validate(&r),
            Err(IndexError::ArityMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn record_key_is_first_field() {
        let r = Record::new(vec![7, 70, 700]);
        assert_eq!(r.key(), 7);
        assert_eq!(r.fields(), &[7, 70, 700]);
    }
}
