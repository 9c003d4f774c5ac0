//! Command-line interface for refcheck

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "refcheck")]
#[command(about = "Diff activity tables between revisions and check referenced files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Repository root (defaults to the enclosing git repository)
    #[arg(long, global = true, env = "GITHUB_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// JSON config file (defaults to .refcheck.json in the workspace)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Options naming the columns the checks read
#[derive(Args, Debug, Clone, Default)]
pub struct ColumnArgs {
    /// Column holding each row's unique identifier
    #[arg(long)]
    pub identity_column: Option<String>,

    /// Column used as the display label in reports
    #[arg(long)]
    pub label_column: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare the table between two snapshots
    Diff {
        /// Workspace-relative path of the CSV table
        #[arg(long, env = "INPUT_CSV")]
        csv: String,

        /// Git revision to load the base table from
        #[arg(long, conflicts_with = "base_file", required_unless_present = "base_file")]
        base_rev: Option<String>,

        /// CSV file to use as the base table
        #[arg(long)]
        base_file: Option<PathBuf>,

        /// Git revision to load the head table from (defaults to the working tree)
        #[arg(long, conflicts_with = "head_file")]
        head_rev: Option<String>,

        /// CSV file to use as the head table
        #[arg(long)]
        head_file: Option<PathBuf>,

        /// Output format: "markdown" or "json"
        #[arg(long, default_value = "markdown")]
        format: String,

        /// File the markdown report is appended to
        #[arg(long, env = "GITHUB_STEP_SUMMARY")]
        summary: Option<PathBuf>,

        #[command(flatten)]
        columns: ColumnArgs,
    },

    /// Check task and media references of the current table
    Check {
        /// Workspace-relative path of the CSV table
        #[arg(long, env = "INPUT_CSV")]
        csv: String,

        /// Comma-separated task files that count as referenced
        #[arg(long, env = "INPUT_MAGIC_TASKS")]
        magic_tasks: Option<String>,

        /// Output format: "pretty", "github" or "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },

    /// Diff against a base revision, then check references
    Run {
        /// Workspace-relative path of the CSV table
        #[arg(long, env = "INPUT_CSV")]
        csv: String,

        /// Base revision; the diff is skipped when absent
        #[arg(long, env = "INPUT_GIT_BASE_SHA")]
        base_rev: Option<String>,

        /// Head revision, used to list changed files
        #[arg(long, env = "INPUT_GIT_HEAD_SHA")]
        head_rev: Option<String>,

        /// Comma-separated task files that count as referenced
        #[arg(long, env = "INPUT_MAGIC_TASKS")]
        magic_tasks: Option<String>,

        /// File the markdown report is appended to
        #[arg(long, env = "GITHUB_STEP_SUMMARY")]
        summary: Option<PathBuf>,

        /// Output format: "pretty", "github" or "json"
        #[arg(long, default_value = "pretty")]
        format: String,

        #[command(flatten)]
        columns: ColumnArgs,
    },
}

/// Treat empty strings (unset action inputs) as absent
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
