//! Unit tests for workspace and configuration loading

use refcheck::workspace::CONFIG_FILE_NAME;
use refcheck::{CheckConfig, CheckWorkspace};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_workspace_from_root() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = CheckWorkspace::from_root(temp_dir.path().to_path_buf()).unwrap();
    assert_eq!(workspace.root, temp_dir.path().canonicalize().unwrap());
    assert_eq!(workspace.config_path(), workspace.root.join(CONFIG_FILE_NAME));
}

#[test]
fn test_workspace_explicit_directory_wins() {
    let temp_dir = TempDir::new().unwrap();
    let sub_dir = temp_dir.path().join("checkout");
    fs::create_dir(&sub_dir).unwrap();

    let workspace = CheckWorkspace::find(Some(&sub_dir)).unwrap();
    assert_eq!(workspace.root, sub_dir.canonicalize().unwrap());
}

#[test]
fn test_workspace_rejects_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("activities.csv");
    fs::write(&file, "UUID\n").unwrap();
    assert!(CheckWorkspace::from_root(file).is_err());
}

#[test]
fn test_nested_glob_paths_use_forward_slashes() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = CheckWorkspace::from_root(temp_dir.path().to_path_buf()).unwrap();
    fs::create_dir_all(workspace.root.join("video").join("clips")).unwrap();
    fs::write(workspace.root.join("video").join("intro.mp4"), "").unwrap();

    let found: Vec<_> = workspace.glob("video/*").unwrap().into_iter().collect();
    assert_eq!(found, vec!["video/clips", "video/intro.mp4"]);
}

#[test]
fn test_config_defaults_without_file() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = CheckWorkspace::from_root(temp_dir.path().to_path_buf()).unwrap();
    let config = CheckConfig::load(&workspace, None).unwrap();
    assert_eq!(config, CheckConfig::default());
}

#[test]
fn test_config_explicit_file_overrides_workspace_file() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = CheckWorkspace::from_root(temp_dir.path().to_path_buf()).unwrap();
    fs::write(workspace.config_path(), r#"{"entity_name": "from-workspace"}"#).unwrap();
    let explicit = temp_dir.path().join("other.json");
    fs::write(&explicit, r#"{"entity_name": "from-flag"}"#).unwrap();

    let config = CheckConfig::load(&workspace, Some(&explicit)).unwrap();
    assert_eq!(config.entity_name, "from-flag");
}

#[test]
fn test_config_missing_explicit_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = CheckWorkspace::from_root(temp_dir.path().to_path_buf()).unwrap();
    let missing = temp_dir.path().join("missing.json");
    assert!(CheckConfig::load(&workspace, Some(&missing)).is_err());
}
