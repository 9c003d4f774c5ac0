//! Identity-keyed row index

use crate::table::{Row, Table};
use indexmap::{IndexMap, IndexSet};

/// Rows of one table keyed by their identity column.
///
/// Keys iterate in the order they were first seen. A duplicate key replaces
/// the stored row but keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct RowIndex<'a> {
    rows: IndexMap<&'a str, &'a Row>,
}

impl<'a> RowIndex<'a> {
    /// Index `table` by `identity_column`, dropping rows whose identity value
    /// is missing or empty.
    pub fn build(table: &'a Table, identity_column: &str) -> Self {
        let mut rows = IndexMap::new();
        let mut skipped = 0usize;

        for row in table {
            match row.get(identity_column).map(String::as_str) {
                Some(key) if !key.is_empty() => {
                    if rows.insert(key, row).is_some() {
                        log::warn!("Duplicate {} '{}', keeping the last row", identity_column, key);
                    }
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            log::debug!("Skipped {} rows without a {} value", skipped, identity_column);
        }

        Self { rows }
    }

    pub fn get(&self, key: &str) -> Option<&'a Row> {
        self.rows.get(key).copied()
    }

    pub fn keys(&self) -> IndexSet<&'a str> {
        self.rows.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
