//! Command implementations for refcheck CLI

use crate::cli::{non_empty, ColumnArgs, Commands};
use crate::config::CheckConfig;
use crate::diff::{diff_tables, TableDiff};
use crate::error::{RefcheckError, Result};
use crate::git::GitHelper;
use crate::loader::{GitTableLoader, TableLoader, TableSource};
use crate::output::{
    sink_for, DiffFormat, GithubFormatter, JsonFormatter, OutputFormat, PrettyPrinter,
};
use crate::progress::ProgressReporter;
use crate::references::{ReferenceChecker, ReferenceReport};
use crate::report::ReportRenderer;
use crate::table::Table;
use crate::workspace::CheckWorkspace;
use std::path::{Path, PathBuf};

/// Whether a command's checks passed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Passed,
    /// Referenced task or media files do not exist
    MissingReferences,
}

impl CheckOutcome {
    pub fn from_report(report: &ReferenceReport) -> Self {
        if report.has_missing() {
            Self::MissingReferences
        } else {
            Self::Passed
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Passed
    }
}

/// Execute a command
pub fn execute_command(
    command: Commands,
    workspace_path: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<CheckOutcome> {
    let workspace = CheckWorkspace::find(workspace_path)?;
    let mut config = CheckConfig::load(&workspace, config_path)?;

    match command {
        Commands::Diff {
            csv,
            base_rev,
            base_file,
            head_rev,
            head_file,
            format,
            summary,
            columns,
        } => {
            apply_columns(&mut config, &columns)?;
            let base = match (non_empty(base_rev), base_file) {
                (Some(rev), _) => TableSource::Revision(rev),
                (None, Some(path)) => TableSource::File(path),
                (None, None) => {
                    return Err(RefcheckError::invalid_input(
                        "A base revision or base file is required",
                    ))
                }
            };
            let head = match (non_empty(head_rev), head_file) {
                (Some(rev), _) => TableSource::Revision(rev),
                (None, Some(path)) => TableSource::File(path),
                (None, None) => TableSource::WorkingTree,
            };
            diff_command(&workspace, &config, &csv, &base, &head, &format, summary)
        }
        Commands::Check {
            csv,
            magic_tasks,
            format,
        } => {
            if let Some(list) = magic_tasks {
                config.add_magic_tasks(&list);
            }
            check_command(&workspace, &config, &csv, &format)
        }
        Commands::Run {
            csv,
            base_rev,
            head_rev,
            magic_tasks,
            summary,
            format,
            columns,
        } => {
            apply_columns(&mut config, &columns)?;
            if let Some(list) = magic_tasks {
                config.add_magic_tasks(&list);
            }
            run_command(
                &workspace,
                &config,
                &csv,
                non_empty(base_rev).as_deref(),
                non_empty(head_rev).as_deref(),
                summary,
                &format,
            )
        }
    }
}

/// Load both snapshots and diff them. Either load failing aborts the diff.
pub fn compare_sources(
    loader: &dyn TableLoader,
    base: &TableSource,
    head: &TableSource,
    config: &CheckConfig,
) -> Result<TableDiff> {
    let base_table = loader.load_table(base)?;
    let head_table = loader.load_table(head)?;
    Ok(diff_tables(&base_table, &head_table, &config.identity_column))
}

/// Markdown report for a diff using the configured columns
pub fn render_report(diff: &TableDiff, config: &CheckConfig) -> String {
    ReportRenderer::new(config.report_options()).render(diff)
}

fn apply_columns(config: &mut CheckConfig, columns: &ColumnArgs) -> Result<()> {
    if let Some(identity) = &columns.identity_column {
        config.identity_column = identity.clone();
    }
    if let Some(label) = &columns.label_column {
        config.label_column = label.clone();
    }
    config.validate()
}

/// Diff the table between two sources and emit the report
fn diff_command(
    workspace: &CheckWorkspace,
    config: &CheckConfig,
    csv: &str,
    base: &TableSource,
    head: &TableSource,
    format: &str,
    summary: Option<PathBuf>,
) -> Result<CheckOutcome> {
    let format = DiffFormat::parse(format).map_err(RefcheckError::invalid_input)?;
    let loader = GitTableLoader::new(workspace.clone(), csv);

    let mut progress = progress_for(format == DiffFormat::Json);
    progress.update_load(&format!("Loading {} from {} and {}...", csv, base, head));
    let diff = compare_sources(&loader, base, head, config)?;
    progress.finish_load(&PrettyPrinter::format_diff_summary(&diff));

    match format {
        DiffFormat::Markdown => emit_report(&diff, config, summary.as_deref())?,
        DiffFormat::Json => println!("{}", JsonFormatter::format_table_diff(&diff)?),
    }

    Ok(CheckOutcome::Passed)
}

/// Check task and media references of the working tree table
fn check_command(
    workspace: &CheckWorkspace,
    config: &CheckConfig,
    csv: &str,
    format: &str,
) -> Result<CheckOutcome> {
    let format = OutputFormat::parse(format).map_err(RefcheckError::invalid_input)?;
    let loader = GitTableLoader::new(workspace.clone(), csv);
    let head = loader.load_table(&TableSource::WorkingTree)?;

    let report = check_references(workspace, config, &head)?;
    print_reference_report(&report, format)?;
    Ok(CheckOutcome::from_report(&report))
}

/// Full pipeline: changed files, optional diff, reference check
fn run_command(
    workspace: &CheckWorkspace,
    config: &CheckConfig,
    csv: &str,
    base_rev: Option<&str>,
    head_rev: Option<&str>,
    summary: Option<PathBuf>,
    format: &str,
) -> Result<CheckOutcome> {
    let format = OutputFormat::parse(format).map_err(RefcheckError::invalid_input)?;
    let loader = GitTableLoader::new(workspace.clone(), csv);
    let mut progress = progress_for(format == OutputFormat::Json);

    let base_table: Option<Table> = match base_rev {
        Some(rev) => {
            progress.update_load(&format!("Loading {} at {}...", csv, rev));
            Some(loader.load_table(&TableSource::Revision(rev.to_string()))?)
        }
        None => None,
    };

    if let (Some(base), Some(head)) = (base_rev, head_rev) {
        log_changed_files(workspace, base, head);
    }

    progress.update_load(&format!("Loading {} from working tree...", csv));
    let head_table = loader.load_table(&TableSource::WorkingTree)?;
    progress.finish_load(&format!("Loaded {} rows", head_table.len()));

    if let Some(base_table) = &base_table {
        let diff = diff_tables(base_table, &head_table, &config.identity_column);
        log::info!("{}", PrettyPrinter::format_diff_summary(&diff));
        emit_report(&diff, config, summary.as_deref())?;
    }

    progress.update_scan("Checking task and media references...");
    let report = check_references(workspace, config, &head_table)?;
    progress.finish_scan("Reference check complete");

    print_reference_report(&report, format)?;
    Ok(CheckOutcome::from_report(&report))
}

/// Informational listing; a failing `git diff` does not stop the run
fn log_changed_files(workspace: &CheckWorkspace, base: &str, head: &str) {
    match GitHelper::changed_files(&workspace.root, base, head) {
        Ok(changed) => {
            log::info!("{} files changed between {} and {}", changed.len(), base, head);
            for file in &changed {
                log::info!("  {}", file);
            }
        }
        Err(e) => log::warn!("Could not list files changed between {} and {}: {}", base, head, e),
    }
}

/// No spinners when stdout carries machine-readable output
fn progress_for(machine_readable: bool) -> ProgressReporter {
    if machine_readable {
        ProgressReporter::new_minimal()
    } else {
        ProgressReporter::new()
    }
}

fn check_references(
    workspace: &CheckWorkspace,
    config: &CheckConfig,
    head: &Table,
) -> Result<ReferenceReport> {
    ReferenceChecker::new(workspace, config).check(head)
}

fn emit_report(diff: &TableDiff, config: &CheckConfig, summary: Option<&Path>) -> Result<()> {
    let report = render_report(diff, config);
    if report.is_empty() {
        log::info!("No {} changed, nothing to report", config.entity_name);
        return Ok(());
    }
    sink_for(summary).emit(&report)
}

fn print_reference_report(report: &ReferenceReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Pretty => PrettyPrinter::print_reference_report(report),
        OutputFormat::Github => print!("{}", GithubFormatter::format_reference_report(report)),
        OutputFormat::Json => println!("{}", JsonFormatter::format(report)?),
    }
    Ok(())
}
