//! Key-based table diff

use crate::compare::modified_columns;
use crate::index::RowIndex;
use crate::set_ops;
use crate::table::{Row, Table};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Result of comparing a base table against a head table.
///
/// The three partitions never share a key. `added` follows head order;
/// `removed` and `modified` follow base order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDiff {
    pub added: IndexMap<String, Row>,
    pub removed: IndexMap<String, Row>,
    /// `(base row, head row)` for keys with at least one changed column.
    pub modified: IndexMap<String, (Row, Row)>,
}

impl TableDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    pub fn total_changes(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }

    /// Changed columns of a modified key, empty for anything else.
    pub fn changed_columns(&self, key: &str) -> Vec<String> {
        self.modified
            .get(key)
            .map(|(base, head)| modified_columns(base, head))
            .unwrap_or_default()
    }
}

/// Classify every identity key of `base` and `head` as added, removed or
/// modified. Keys whose rows match are left out.
///
/// Never fails: when no row carries `identity_column` the diff is empty.
pub fn diff_tables(base: &Table, head: &Table, identity_column: &str) -> TableDiff {
    let base_index = RowIndex::build(base, identity_column);
    let head_index = RowIndex::build(head, identity_column);
    let base_keys = base_index.keys();
    let head_keys = head_index.keys();

    let mut diff = TableDiff::default();

    for key in set_ops::subtract(&head_keys, &base_keys) {
        if let Some(row) = head_index.get(key) {
            diff.added.insert(key.to_string(), row.clone());
        }
    }

    for key in set_ops::subtract(&base_keys, &head_keys) {
        if let Some(row) = base_index.get(key) {
            diff.removed.insert(key.to_string(), row.clone());
        }
    }

    for key in set_ops::intersect(&base_keys, &head_keys) {
        if let (Some(base_row), Some(head_row)) = (base_index.get(key), head_index.get(key)) {
            if !modified_columns(base_row, head_row).is_empty() {
                diff.modified
                    .insert(key.to_string(), (base_row.clone(), head_row.clone()));
            }
        }
    }

    log::debug!(
        "Table diff on '{}': {} added, {} removed, {} modified ({} base keys, {} head keys)",
        identity_column,
        diff.added.len(),
        diff.removed.len(),
        diff.modified.len(),
        base_index.len(),
        head_index.len()
    );

    diff
}
