//! Git integration utilities

use crate::error::{RefcheckError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git integration helper
pub struct GitHelper;

impl GitHelper {
    /// Check if a directory is inside a git repository
    pub fn is_git_repo(path: &Path) -> bool {
        Self::find_git_root(path).is_some()
    }

    /// Get git repository root
    pub fn find_git_root(path: &Path) -> Option<PathBuf> {
        let mut current = path;
        loop {
            if current.join(".git").exists() {
                return Some(current.to_path_buf());
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    /// Contents of `path` as of `revision` (`git show <rev>:<path>`)
    pub fn show_file(repo: &Path, revision: &str, path: &str) -> Result<Vec<u8>> {
        let spec = format!("{}:{}", revision, path);
        Self::run(repo, &["show", &spec])
    }

    /// Files touched between two revisions (`git diff --name-only base...head`)
    pub fn changed_files(repo: &Path, base: &str, head: &str) -> Result<Vec<String>> {
        let range = format!("{}...{}", base, head);
        let output = Self::run(repo, &["diff", "--name-only", &range])?;
        let text = String::from_utf8(output)?;
        Ok(text
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn run(repo: &Path, args: &[&str]) -> Result<Vec<u8>> {
        log::debug!("Running git {} in {}", args.join(" "), repo.display());

        let output = Command::new("git")
            .args(args)
            .current_dir(repo)
            .output()
            .map_err(|e| RefcheckError::git(format!("failed to run git: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RefcheckError::git(format!(
                "git {} exited with {}: {}",
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}
