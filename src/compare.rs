//! Per-column change detection between two versions of a row

use crate::set_ops;
use crate::table::Row;
use indexmap::IndexSet;

/// Columns whose value differs between `a` and `b`.
///
/// Only columns present on both sides are considered, so schema additions and
/// removals never count as changes. Values that only differ in `\r\n` versus
/// `\n` line endings are treated as equal.
pub fn modified_columns(a: &Row, b: &Row) -> Vec<String> {
    let a_columns: IndexSet<&str> = a.keys().map(String::as_str).collect();
    let b_columns: IndexSet<&str> = b.keys().map(String::as_str).collect();

    set_ops::union(&a_columns, &b_columns)
        .into_iter()
        .filter(|column| match (a.get(*column), b.get(*column)) {
            (Some(old), Some(new)) => values_differ(old, new),
            _ => false,
        })
        .map(str::to_string)
        .collect()
}

/// Compare two cell values, ignoring CRLF/LF differences.
pub fn values_differ(old: &str, new: &str) -> bool {
    old != new && normalize_line_endings(old) != normalize_line_endings(new)
}

fn normalize_line_endings(value: &str) -> String {
    value.replace("\r\n", "\n")
}
