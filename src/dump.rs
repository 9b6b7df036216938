//! Serializable snapshot structures for both engines' `dump` operation, modeled on the
//! teacher's `TreeNode` export struct (camelCase-over-the-wire via `serde_json`).

use serde::Serialize;

use crate::bpt::{BPlusTree, DumpEntry};
use crate::lht::{LhtSlotDump, LinearHashTable};

/// One node in a [`BptDump`], as reported by [`BPlusTree::dump`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BptDumpNode {
    pub level: usize,
    pub is_leaf: bool,
    pub keys: Vec<i32>,
}

impl From<DumpEntry> for BptDumpNode {
    fn from(entry: DumpEntry) -> Self {
        Self {
            level: entry.level,
            is_leaf: entry.is_leaf,
            keys: entry.keys,
        }
    }
}

/// A full, JSON-serializable snapshot of a [`BPlusTree`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BptDump {
    pub height: usize,
    pub nodes: Vec<BptDumpNode>,
}

impl BptDump {
    pub fn capture(tree: &BPlusTree) -> Self {
        Self {
            height: tree.height(),
            nodes: tree.dump().into_iter().map(BptDumpNode::from).collect(),
        }
    }
}

/// One slot's status in a [`LhtDump`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum LhtDumpSlot {
    Empty { slot: usize },
    Tombstone { slot: usize },
    Occupied { slot: usize, key: i32 },
}

impl From<LhtSlotDump> for LhtDumpSlot {
    fn from(slot: LhtSlotDump) -> Self {
        match slot {
            LhtSlotDump::Empty { slot } => Self::Empty { slot },
            LhtSlotDump::Tombstone { slot } => Self::Tombstone { slot },
            LhtSlotDump::Occupied { slot, key } => Self::Occupied { slot, key },
        }
    }
}

/// A full, JSON-serializable snapshot of a [`LinearHashTable`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LhtDump {
    pub slot_count: usize,
    pub live_count: usize,
    pub slots: Vec<LhtDumpSlot>,
}

impl LhtDump {
    pub fn capture(table: &LinearHashTable) -> Self {
        Self {
            slot_count: table.slot_count(),
            live_count: table.len(),
            slots: table.dump().into_iter().map(LhtDumpSlot::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BptConfig, LhtConfig};
    use crate::record::Record;

    #[test]
    fn bpt_dump_serializes_to_camel_case() {
        let (mut tree, _) = BPlusTree::new(&BptConfig::new(3, 64));
        tree.insert(Record::new(vec![1, 2, 3])).unwrap();
        let dump = BptDump::capture(&tree);
        let json = serde_json::to_string(&dump).unwrap();
        assert!(json.contains("\"isLeaf\""));
    }

    #[test]
    fn lht_dump_serializes_with_status_tag() {
        let mut table = LinearHashTable::new(&LhtConfig::new(2, 40));
        table.insert(Record::new(vec![3, 30])).unwrap();
        let dump = LhtDump::capture(&table);
        let json = serde_json::to_string(&dump).unwrap();
        assert!(json.contains("\"status\":\"occupied\""));
    }
}
