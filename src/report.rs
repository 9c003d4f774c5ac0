//! Markdown rendering of a table diff

use crate::compare::modified_columns;
use crate::diff::TableDiff;
use crate::table::Row;
use indexmap::IndexSet;

/// Placeholder used when a row has no display label.
pub const MISSING_LABEL: &str = "missing title";

/// Values at or above this many characters are summarized as "changed".
pub const DEFAULT_VALUE_THRESHOLD: usize = 40;

/// Substitutions applied, in order, to every free-text value.
const MARKDOWN_REPLACEMENTS: &[(char, &str)] = &[
    ('*', "\\*"),
    ('#', "\\#"),
    ('/', "\\/"),
    ('(', "\\("),
    (')', "\\)"),
    ('[', "\\["),
    (']', "\\]"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('_', "\\_"),
    ('`', "\\`"),
];

/// Escape markdown structure characters. Every occurrence is replaced.
pub fn markdown_escape(text: &str) -> String {
    MARKDOWN_REPLACEMENTS
        .iter()
        .fold(text.to_string(), |acc, (pattern, replacement)| {
            acc.replace(*pattern, replacement)
        })
}

/// Options controlling how a [`TableDiff`] is rendered.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Column shown as the entry text.
    pub label_column: String,
    /// Plural noun used in section headings, e.g. "activities".
    pub entity_name: String,
    pub value_threshold: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            label_column: "Title".to_string(),
            entity_name: "activities".to_string(),
            value_threshold: DEFAULT_VALUE_THRESHOLD,
        }
    }
}

/// Renders a [`TableDiff`] as a markdown summary.
///
/// Entries link to their identity key through reference-style link
/// definitions emitted ahead of the body, so raw keys never appear in prose.
pub struct ReportRenderer {
    options: ReportOptions,
}

impl ReportRenderer {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn render(&self, diff: &TableDiff) -> String {
        let mut anchors: IndexSet<&str> = IndexSet::new();
        let mut body = String::new();
        let noun = &self.options.entity_name;

        if !diff.added.is_empty() {
            body.push_str(&format!("### New {}\n", noun));
            for (key, row) in &diff.added {
                anchors.insert(key);
                body.push_str(&self.entry_line(key, row));
            }
        }

        if !diff.removed.is_empty() {
            body.push_str(&format!("### Removed {}\n", noun));
            for (key, row) in &diff.removed {
                anchors.insert(key);
                body.push_str(&self.entry_line(key, row));
            }
        }

        if !diff.modified.is_empty() {
            body.push_str(&format!("### Modified {}\n", noun));
            for (key, (base_row, head_row)) in &diff.modified {
                anchors.insert(key);
                body.push_str(&self.entry_line(key, head_row));
                for column in modified_columns(base_row, head_row) {
                    body.push_str(&self.change_line(&column, base_row, head_row));
                }
            }
        }

        let mut report: String = anchors
            .iter()
            .map(|key| format!("[{}]: ## \"{}\"\n", key, key))
            .collect();
        report.push_str(&body);
        report
    }

    /// Escaped label of `row`, or the placeholder when it has none.
    pub fn escaped_label(&self, row: &Row) -> String {
        match row.get(&self.options.label_column) {
            Some(label) if !label.is_empty() => markdown_escape(label),
            _ => MISSING_LABEL.to_string(),
        }
    }

    fn entry_line(&self, key: &str, row: &Row) -> String {
        format!(" - [{}][{}]\n", self.escaped_label(row), key)
    }

    fn change_line(&self, column: &str, base_row: &Row, head_row: &Row) -> String {
        let old = escaped_value(base_row, column);
        let new = escaped_value(head_row, column);
        let threshold = self.options.value_threshold;

        if old.chars().count() < threshold && new.chars().count() < threshold {
            format!("   - **{}** changed from \"{}\" to \"{}\"\n", column, old, new)
        } else {
            format!("   - **{}** changed\n", column)
        }
    }
}

fn escaped_value(row: &Row, column: &str) -> String {
    row.get(column)
        .map(|value| markdown_escape(value))
        .unwrap_or_else(|| "(null)".to_string())
}
