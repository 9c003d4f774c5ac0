//! Repository workspace the checks run against

use crate::error::{RefcheckError, Result};
use crate::git::GitHelper;
use indexmap::IndexSet;
use std::path::{Component, Path, PathBuf};

/// Name of the optional per-repository config file
pub const CONFIG_FILE_NAME: &str = ".refcheck.json";

/// The checked-out repository that tables and referenced files live in
#[derive(Debug, Clone)]
pub struct CheckWorkspace {
    /// Repository root directory
    pub root: PathBuf,
}

impl CheckWorkspace {
    /// Use the given directory, or find the enclosing git repository
    pub fn find(start_dir: Option<&Path>) -> Result<Self> {
        if let Some(dir) = start_dir {
            return Self::from_root(dir.to_path_buf());
        }

        let current_dir = std::env::current_dir()?;
        let root = GitHelper::find_git_root(&current_dir).unwrap_or(current_dir);
        Self::from_root(root)
    }

    /// Create workspace from root directory path
    pub fn from_root(root: PathBuf) -> Result<Self> {
        if !root.is_dir() {
            return Err(RefcheckError::invalid_input(format!(
                "Workspace is not a directory: {}",
                root.display()
            )));
        }

        let root = root.canonicalize()?;
        log::debug!("Using workspace at {}", root.display());
        Ok(Self { root })
    }

    /// Absolute path of a workspace-relative path written with `/` separators
    pub fn resolve(&self, relative: &str) -> PathBuf {
        let path = Path::new(relative);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        relative
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }

    /// Path relative to the root with `/` separators
    pub fn to_posix_relative(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        Some(parts.join("/"))
    }

    /// Workspace-relative paths of every entry matching `pattern`, sorted
    pub fn glob(&self, pattern: &str) -> Result<IndexSet<String>> {
        let absolute = self.resolve(pattern);
        let absolute = absolute.to_string_lossy();

        let mut matches = Vec::new();
        for entry in glob::glob(&absolute)? {
            let path = entry?;
            if let Some(relative) = self.to_posix_relative(&path) {
                matches.push(relative);
            }
        }
        matches.sort();

        log::debug!("Pattern '{}' matched {} entries", pattern, matches.len());
        Ok(matches.into_iter().collect())
    }

    /// Path of the optional per-repository config file
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }
}
