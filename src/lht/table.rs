//! Linear-probe hash table engine: open addressing over a fixed slot array, with
//! tombstone-based lazy deletion.
//!
//! Grounded in `implementacao_linearhash_bd.py`'s `HashLinear` (probe-on-collision,
//! `%`-based slot selection made Euclidean for negative keys, tombstone reuse), written
//! in the teacher's `Db`/`BTree` style: plain methods over an owned `Vec`, errors
//! surfaced through `crate::error::IndexError` rather than the Python's silent
//! `bool`/`None` returns where the distilled spec promotes them to proper error variants
//! (`DuplicateKey`, `Full`).

use crate::capacity::derive_lht_capacity;
use crate::config::LhtConfig;
use crate::error::{IndexError, Result};
use crate::record::{Record, Schema};

/// A single slot in the table.
#[derive(Debug, Clone)]
enum Slot {
    Empty,
    Occupied(Record),
    Tombstone,
}

/// An in-memory, open-addressed hash table keyed by a record's first field.
pub struct LinearHashTable {
    schema: Schema,
    slots: Vec<Slot>,
    live_count: usize,
}

impl LinearHashTable {
    /// Build a table from a [`LhtConfig`]. Slot count is derived once, up front, and
    /// never resized: this engine does not rehash (spec Non-goal).
    pub fn new(config: &LhtConfig) -> Self {
        let slot_count = derive_lht_capacity(config.schema, config.total_bytes);
        Self {
            schema: config.schema,
            slots: vec![Slot::Empty; slot_count],
            live_count: 0,
        }
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of live (non-tombstone, non-empty) entries.
    pub fn len(&self) -> usize {
        self.live_count
    }

    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Euclidean hash: `key.rem_euclid(slot_count)`, so negative keys still land in
    /// `0..slot_count` instead of Rust's default truncating-toward-zero `%`.
    fn home_slot(&self, key: i32) -> usize {
        key.rem_euclid(self.slots.len() as i32) as usize
    }

    fn next_slot(&self, idx: usize) -> usize {
        (idx + 1) % self.slots.len()
    }

    /// Insert a record, keyed by its first field.
    ///
    /// Probes linearly from the key's home slot. A live duplicate anywhere *before* the
    /// first tombstone or empty slot on the probe chain is rejected with
    /// [`IndexError::DuplicateKey`]. This intentionally preserves a quirk present in the
    /// reference implementation this engine is modeled on: once the probe reaches a
    /// tombstone, the record is inserted there immediately without continuing to scan
    /// the rest of the chain for a live duplicate that might sit further along. A
    /// duplicate key can therefore end up stored twice if a tombstone happens to sit
    /// between the two insert attempts. `search` and `delete` both return the first
    /// match encountered, so this is benign for point lookups but means `range` can
    /// surface two records sharing a key.
    pub fn insert(&mut self, record: Record) -> Result<()> {
        self.schema.validate(&record)?;
        let key = record.key();

        if self.live_count == self.slots.len() {
            return Err(IndexError::Full {
                slot_count: self.slots.len(),
            });
        }

        let start = self.home_slot(key);
        let mut idx = start;
        loop {
            match &self.slots[idx] {
                Slot::Occupied(existing) if existing.key() == key => {
                    return Err(IndexError::DuplicateKey { key, slot: idx });
                }
                Slot::Empty | Slot::Tombstone => {
                    self.slots[idx] = Slot::Occupied(record);
                    self.live_count += 1;
                    return Ok(());
                }
                Slot::Occupied(_) => {
                    idx = self.next_slot(idx);
                    if idx == start {
                        // live_count < slot_count guarantees a free slot exists; a full
                        // revolution without finding one means bookkeeping is broken.
                        unreachable!("probe cycle exhausted slots with live_count < slot_count");
                    }
                }
            }
        }
    }

    /// Look up `key`, probing forward from its home slot until an empty slot (probe
    /// terminator) or a live match is found.
    pub fn search(&self, key: i32) -> Option<&Record> {
        let start = self.home_slot(key);
        let mut idx = start;
        loop {
            match &self.slots[idx] {
                Slot::Empty => return None,
                Slot::Occupied(record) if record.key() == key => return Some(record),
                Slot::Occupied(_) | Slot::Tombstone => {
                    idx = self.next_slot(idx);
                    if idx == start {
                        return None;
                    }
                }
            }
        }
    }

    /// Delete the first occurrence of `key` found on its probe chain, leaving a
    /// tombstone behind so later probes for other keys that hashed past this slot still
    /// terminate correctly.
    pub fn delete(&mut self, key: i32) -> bool {
        let start = self.home_slot(key);
        let mut idx = start;
        loop {
            match &self.slots[idx] {
                Slot::Empty => return false,
                Slot::Occupied(record) if record.key() == key => {
                    self.slots[idx] = Slot::Tombstone;
                    self.live_count -= 1;
                    return true;
                }
                Slot::Occupied(_) | Slot::Tombstone => {
                    idx = self.next_slot(idx);
                    if idx == start {
                        return false;
                    }
                }
            }
        }
    }

    /// Full scan for every live record with `lo <= key <= hi`, returned in ascending
    /// key order. Open addressing has no useful key-contiguity to exploit, so per spec
    /// this is a linear scan followed by a sort rather than a probe-driven walk.
    pub fn range(&self, lo: i32, hi: i32) -> Vec<&Record> {
        let mut out: Vec<&Record> = self
            .slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Occupied(record) if record.key() >= lo && record.key() <= hi => Some(record),
                _ => None,
            })
            .collect();
        out.sort_by_key(|r| r.key());
        out
    }

    /// Snapshot every slot's status, in slot order, for diagnostics/dump.
    pub fn dump(&self) -> Vec<LhtSlotDump> {
        self.slots
            .iter()
            .enumerate()
            .map(|(idx, slot)| match slot {
                Slot::Empty => LhtSlotDump::Empty { slot: idx },
                Slot::Tombstone => LhtSlotDump::Tombstone { slot: idx },
                Slot::Occupied(record) => LhtSlotDump::Occupied {
                    slot: idx,
                    key: record.key(),
                },
            })
            .collect()
    }
}

/// One slot's status, as reported by [`LinearHashTable::dump`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LhtSlotDump {
    Empty { slot: usize },
    Tombstone { slot: usize },
    Occupied { slot: usize, key: i32 },
}
