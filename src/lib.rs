//! # refcheck
//!
//! Compares two snapshots of an activity table keyed by a stable identity
//! column, renders the added, removed and modified rows as a markdown
//! summary, and cross-checks the task and media files the table references.

pub mod cli;
pub mod error;
pub mod config;
pub mod workspace;
pub mod git;
pub mod set_ops;
pub mod table;
pub mod loader;
pub mod index;
pub mod compare;
pub mod diff;
pub mod report;
pub mod references;
pub mod output;
pub mod progress;
pub mod commands;

pub use config::CheckConfig;
pub use diff::{diff_tables, TableDiff};
pub use error::{RefcheckError, Result};
pub use loader::{TableLoader, TableSource};
pub use report::{markdown_escape, ReportRenderer};
pub use table::{Row, Table};
pub use workspace::CheckWorkspace;
