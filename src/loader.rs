//! Table loading from the working tree, files, or git history

use crate::error::{RefcheckError, Result};
use crate::git::GitHelper;
use crate::table::{parse_csv, Table};
use crate::workspace::CheckWorkspace;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Where a table snapshot comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableSource {
    /// The CSV as currently checked out
    WorkingTree,
    /// An arbitrary CSV file, relative to the workspace unless absolute
    File(PathBuf),
    /// The CSV as of a git revision
    Revision(String),
}

impl fmt::Display for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WorkingTree => write!(f, "working tree"),
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Revision(rev) => write!(f, "revision {}", rev),
        }
    }
}

/// Supplies fully materialized tables to the differ
pub trait TableLoader {
    fn load_table(&self, source: &TableSource) -> Result<Table>;
}

/// Loads one CSV path from a checked-out git repository
pub struct GitTableLoader {
    workspace: CheckWorkspace,
    csv_path: String,
}

impl GitTableLoader {
    /// `csv_path` is relative to the workspace root, `/`-separated
    pub fn new(workspace: CheckWorkspace, csv_path: impl Into<String>) -> Self {
        Self {
            workspace,
            csv_path: csv_path.into(),
        }
    }

    fn read_source(&self, source: &TableSource) -> Result<Vec<u8>> {
        match source {
            TableSource::WorkingTree => {
                let path = self.workspace.resolve(&self.csv_path);
                fs::read(&path).map_err(|e| {
                    RefcheckError::invalid_input(format!(
                        "Failed to read {}: {}",
                        path.display(),
                        e
                    ))
                })
            }
            TableSource::File(path) => {
                let path = if path.is_absolute() {
                    path.clone()
                } else {
                    self.workspace.root.join(path)
                };
                fs::read(&path).map_err(|e| {
                    RefcheckError::invalid_input(format!(
                        "Failed to read {}: {}",
                        path.display(),
                        e
                    ))
                })
            }
            TableSource::Revision(rev) => {
                if !GitHelper::is_git_repo(&self.workspace.root) {
                    return Err(RefcheckError::git(format!(
                        "Cannot load revision {}: {} is not inside a git repository",
                        rev,
                        self.workspace.root.display()
                    )));
                }
                GitHelper::show_file(&self.workspace.root, rev, &self.csv_path)
            }
        }
    }
}

impl TableLoader for GitTableLoader {
    fn load_table(&self, source: &TableSource) -> Result<Table> {
        log::info!("Loading {} from {}", self.csv_path, source);
        let content = self.read_source(source)?;
        parse_csv(&content)
    }
}

/// Serves preloaded tables, for tests and embedding
#[derive(Debug, Default, Clone)]
pub struct InMemoryTableLoader {
    tables: HashMap<TableSource, Table>,
}

impl InMemoryTableLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, source: TableSource, table: Table) -> Self {
        self.tables.insert(source, table);
        self
    }
}

impl TableLoader for InMemoryTableLoader {
    fn load_table(&self, source: &TableSource) -> Result<Table> {
        self.tables
            .get(source)
            .cloned()
            .ok_or_else(|| RefcheckError::invalid_input(format!("No table for {}", source)))
    }
}
