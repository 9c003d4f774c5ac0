//! Cross-check of the row → task file → media file reference graph

use crate::config::CheckConfig;
use crate::error::{RefcheckError, Result};
use crate::set_ops;
use crate::table::Table;
use crate::workspace::CheckWorkspace;
use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;

/// Step fields that point at media files
const MEDIA_FIELDS: &[&str] = &["videoUrl", "audioUrl"];

/// Outcome of a reference check. Paths are workspace-relative with `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceReport {
    pub missing_task_files: IndexSet<String>,
    pub unused_task_files: IndexSet<String>,
    pub missing_media_files: IndexSet<String>,
    pub unused_media_files: IndexSet<String>,
}

impl ReferenceReport {
    /// Referenced files that do not exist
    pub fn has_missing(&self) -> bool {
        !self.missing_task_files.is_empty() || !self.missing_media_files.is_empty()
    }
}

/// Task files referenced by the link column, in table order
pub fn referenced_task_files(table: &Table, link_column: &str) -> IndexSet<String> {
    table
        .iter()
        .filter_map(|row| row.get(link_column))
        .filter(|link| !link.is_empty())
        .cloned()
        .collect()
}

/// Characters whose escapes stay encoded when decoding a reference
const URI_RESERVED: &str = ";/?:@&=+$,#";

/// Media references of a task document: URI-decoded `videoUrl`/`audioUrl`
/// of every entry in its `steps` array.
///
/// A document without a `steps` array references no media.
pub fn media_references(task: &serde_json::Value) -> Result<IndexSet<String>> {
    let mut files = IndexSet::new();
    let steps = match task.get("steps").and_then(|s| s.as_array()) {
        Some(steps) => steps,
        None => return Ok(files),
    };

    for step in steps {
        for field in MEDIA_FIELDS {
            if let Some(url) = step.get(*field).and_then(|v| v.as_str()) {
                files.insert(decode_reference(url)?);
            }
        }
    }
    Ok(files)
}

/// Percent-decode a URI reference, leaving escapes of reserved characters
/// (`%2F`, `%23`, `%3F`, ...) untouched. A truncated or non-hex escape, or
/// escapes that do not form valid UTF-8, is an error.
pub fn decode_reference(url: &str) -> Result<String> {
    let bytes = url.as_bytes();
    let mut decoded = String::with_capacity(url.len());
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'%' {
            let next = url[pos..].find('%').map_or(url.len(), |offset| pos + offset);
            decoded.push_str(&url[pos..next]);
            pos = next;
            continue;
        }

        // Maximal run of consecutive escapes, so multi-byte sequences decode together
        let start = pos;
        while pos < bytes.len() && bytes[pos] == b'%' {
            let escape = url
                .get(pos..pos + 3)
                .filter(|escape| escape[1..].bytes().all(|b| b.is_ascii_hexdigit()))
                .ok_or_else(|| {
                    RefcheckError::invalid_input(format!(
                        "Malformed escape at byte {} of reference '{}'",
                        pos, url
                    ))
                })?;
            pos += escape.len();
        }

        let run = &url[start..pos];
        let text = urlencoding::decode(run).map_err(|_| {
            RefcheckError::invalid_input(format!(
                "Reference '{}' does not decode to valid UTF-8",
                url
            ))
        })?;

        let mut escape_index = 0;
        for ch in text.chars() {
            let width = ch.len_utf8();
            if width == 1 && URI_RESERVED.contains(ch) {
                decoded.push_str(&run[escape_index * 3..escape_index * 3 + 3]);
            } else {
                decoded.push(ch);
            }
            escape_index += width;
        }
    }

    Ok(decoded)
}

/// Runs the task/media reference check over a workspace
pub struct ReferenceChecker<'a> {
    workspace: &'a CheckWorkspace,
    config: &'a CheckConfig,
}

impl<'a> ReferenceChecker<'a> {
    pub fn new(workspace: &'a CheckWorkspace, config: &'a CheckConfig) -> Self {
        Self { workspace, config }
    }

    pub fn check(&self, head: &Table) -> Result<ReferenceReport> {
        let task_files = self.workspace.glob(&self.config.task_glob)?;
        let mut used_tasks = referenced_task_files(head, &self.config.link_column);

        let existing_used = set_ops::intersect(&used_tasks, &task_files);
        let media_by_task = self.collect_media_references(&existing_used)?;

        used_tasks.extend(self.config.magic_tasks.iter().cloned());

        let media_files = self.workspace.glob(&self.config.media_glob)?;
        let used_media = media_by_task
            .values()
            .fold(IndexSet::new(), |acc, refs| set_ops::union(&acc, refs));

        log::debug!(
            "{} task files referenced, {} found; {} media files referenced, {} found",
            used_tasks.len(),
            task_files.len(),
            used_media.len(),
            media_files.len()
        );

        Ok(ReferenceReport {
            missing_task_files: set_ops::subtract(&used_tasks, &task_files),
            unused_task_files: set_ops::subtract(&task_files, &used_tasks),
            missing_media_files: set_ops::subtract(&used_media, &media_files),
            unused_media_files: set_ops::subtract(&media_files, &used_media),
        })
    }

    /// Parse each task file in parallel; results keep `task_files` order
    pub fn collect_media_references(
        &self,
        task_files: &IndexSet<String>,
    ) -> Result<IndexMap<String, IndexSet<String>>> {
        let tasks: Vec<&String> = task_files.iter().collect();
        let parsed: Vec<Result<(String, IndexSet<String>)>> = tasks
            .par_iter()
            .map(|task| {
                let path = self.workspace.resolve(task);
                let content = fs::read_to_string(&path)
                    .map_err(|e| RefcheckError::task_file(&path, e.to_string()))?;
                let value: serde_json::Value = serde_json::from_str(&content)
                    .map_err(|e| RefcheckError::task_file(&path, e.to_string()))?;
                let media = media_references(&value)
                    .map_err(|e| RefcheckError::task_file(&path, e.to_string()))?;
                Ok(((*task).clone(), media))
            })
            .collect();

        parsed.into_iter().collect()
    }
}
