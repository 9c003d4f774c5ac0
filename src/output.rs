//! Output formatting and report sinks

use crate::diff::TableDiff;
use crate::error::Result;
use crate::references::ReferenceReport;
use indexmap::IndexSet;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Destination for a rendered markdown report
pub trait ReportSink {
    fn emit(&mut self, text: &str) -> Result<()>;
}

/// Prints the report to standard output
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn emit(&mut self, text: &str) -> Result<()> {
        print!("{}", text);
        std::io::stdout().flush()?;
        Ok(())
    }
}

/// Appends the report to a CI step summary file
pub struct SummaryFileSink {
    path: PathBuf,
}

impl SummaryFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for SummaryFileSink {
    fn emit(&mut self, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(text.as_bytes())?;
        log::info!("Wrote report to {}", self.path.display());
        Ok(())
    }
}

/// Summary file sink when a path is configured, stdout otherwise
pub fn sink_for(summary: Option<&Path>) -> Box<dyn ReportSink> {
    match summary {
        Some(path) => Box::new(SummaryFileSink::new(path)),
        None => {
            log::info!("No step summary file configured, printing report to stdout");
            Box::new(StdoutSink)
        }
    }
}

/// How reference check results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    /// GitHub Actions workflow commands (`::group::`, `::error::`)
    Github,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "github" => Ok(Self::Github),
            "json" => Ok(Self::Json),
            _ => Err(format!(
                "Invalid output format: {}. Use 'pretty', 'github' or 'json'",
                s
            )),
        }
    }
}

/// Format of the table diff output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffFormat {
    Markdown,
    Json,
}

impl DiffFormat {
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid diff format: {}. Use 'markdown' or 'json'", s)),
        }
    }
}

/// Reference report groups in display order: (title, files, is_error)
fn report_groups(report: &ReferenceReport) -> [(&'static str, &IndexSet<String>, bool); 4] {
    [
        ("Missing task files", &report.missing_task_files, true),
        ("Unused task files", &report.unused_task_files, false),
        ("Missing media files", &report.missing_media_files, true),
        ("Unused media files", &report.unused_media_files, false),
    ]
}

/// Pretty printer for refcheck output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Tree view of the non-empty reference groups
    pub fn format_reference_report(report: &ReferenceReport) -> String {
        let mut out = String::new();
        out.push_str("🔗 Reference check\n");

        for (title, files, is_error) in report_groups(report) {
            if files.is_empty() {
                continue;
            }
            let marker = if is_error { "❌" } else { "⚠️" };
            out.push_str(&format!("├─ {} {}: {}\n", marker, title, files.len()));
            for (i, file) in files.iter().enumerate() {
                let prefix = if i == files.len() - 1 { "└─" } else { "├─" };
                out.push_str(&format!("│  {} {}\n", prefix, file));
            }
        }

        if report.has_missing() {
            out.push_str("└─ ❌ Referenced files are missing\n");
        } else {
            out.push_str("└─ ✅ All referenced files exist\n");
        }
        out
    }

    pub fn print_reference_report(report: &ReferenceReport) {
        print!("{}", Self::format_reference_report(report));
    }

    /// One-line summary of a table diff
    pub fn format_diff_summary(diff: &TableDiff) -> String {
        if diff.is_empty() {
            return "✅ Tables are identical".to_string();
        }
        format!(
            "🔍 {} added, {} removed, {} modified",
            diff.added.len(),
            diff.removed.len(),
            diff.modified.len()
        )
    }
}

/// GitHub Actions workflow command formatter
pub struct GithubFormatter;

impl GithubFormatter {
    /// Collapsible log group per non-empty set; missing files as `::error::`
    pub fn format_reference_report(report: &ReferenceReport) -> String {
        let mut out = String::new();
        for (title, files, is_error) in report_groups(report) {
            if files.is_empty() {
                continue;
            }
            out.push_str(&format!("::group::{}\n", title));
            for file in files {
                if is_error {
                    out.push_str(&format!("::error::{}\n", escape_workflow_data(file)));
                } else {
                    out.push_str(&format!("{}\n", file));
                }
            }
            out.push_str("::endgroup::\n");
        }
        out
    }
}

/// Escape a workflow command message (`%`, CR and LF)
fn escape_workflow_data(text: &str) -> String {
    text.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format any serializable data as JSON
    pub fn format<T: Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    /// Table diff with changed columns and a generation timestamp
    pub fn format_table_diff(diff: &TableDiff) -> Result<String> {
        let changed_columns: serde_json::Map<String, serde_json::Value> = diff
            .modified
            .keys()
            .map(|key| (key.clone(), serde_json::json!(diff.changed_columns(key))))
            .collect();

        let json = serde_json::json!({
            "generated_at": chrono::Utc::now(),
            "added": diff.added,
            "removed": diff.removed,
            "modified": diff.modified,
            "changed_columns": changed_columns,
            "total_changes": diff.total_changes(),
        });
        Ok(serde_json::to_string_pretty(&json)?)
    }
}
