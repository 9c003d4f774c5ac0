//! Check configuration

use crate::error::{RefcheckError, Result};
use crate::report::{ReportOptions, DEFAULT_VALUE_THRESHOLD};
use crate::workspace::CheckWorkspace;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything the diff and reference check need, passed explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Column holding each row's stable identifier
    pub identity_column: String,
    /// Column shown as the entry text in reports
    pub label_column: String,
    /// Column holding the task file a row points at
    pub link_column: String,
    /// Plural noun for report headings
    pub entity_name: String,
    pub task_glob: String,
    pub media_glob: String,
    /// Task files always treated as referenced
    pub magic_tasks: Vec<String>,
    pub summary_threshold: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            identity_column: "UUID".to_string(),
            label_column: "Title".to_string(),
            link_column: "Action Link".to_string(),
            entity_name: "activities".to_string(),
            task_glob: "tasks/*.json".to_string(),
            media_glob: "video/*".to_string(),
            magic_tasks: Vec::new(),
            summary_threshold: DEFAULT_VALUE_THRESHOLD,
        }
    }
}

impl CheckConfig {
    /// Load from a JSON file; unspecified fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            RefcheckError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            RefcheckError::config(format!("Invalid config {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Explicit file if given, else the workspace's `.refcheck.json`, else defaults
    pub fn load(workspace: &CheckWorkspace, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let default_path = workspace.config_path();
        if default_path.exists() {
            log::debug!("Loading config from {}", default_path.display());
            return Self::from_file(&default_path);
        }

        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        if self.identity_column.is_empty() {
            return Err(RefcheckError::config("identity_column must not be empty"));
        }
        if self.identity_column == self.label_column {
            return Err(RefcheckError::config(
                "label_column must differ from identity_column",
            ));
        }
        if self.summary_threshold == 0 {
            return Err(RefcheckError::config("summary_threshold must be greater than 0"));
        }
        Ok(())
    }

    /// Add comma-separated task files to `magic_tasks`, skipping blanks
    pub fn add_magic_tasks(&mut self, list: &str) {
        for task in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if !self.magic_tasks.iter().any(|existing| existing == task) {
                self.magic_tasks.push(task.to_string());
            }
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            label_column: self.label_column.clone(),
            entity_name: self.entity_name.clone(),
            value_threshold: self.summary_threshold,
        }
    }
}
