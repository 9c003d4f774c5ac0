//! Integration tests for the reference check

use crate::common::{sample_data, CliTestRunner, TestFixture};
use refcheck::commands::CheckOutcome;
use refcheck::references::ReferenceChecker;
use refcheck::table::parse_csv;
use refcheck::CheckConfig;
use refcheck::RefcheckError;

/// Fixture with every referenced file present plus one unused of each kind
fn complete_fixture(fixture: &TestFixture) {
    fixture.create_csv("activities.csv", &sample_data::head_activities()).unwrap();
    fixture
        .create_task("tasks/counting.json", &["video/count%20song.mp4"], &["video/count.mp3"])
        .unwrap();
    fixture.create_task("tasks/colours.json", &["video/colours.mp4"], &[]).unwrap();
    fixture.create_task("tasks/letters.json", &[], &[]).unwrap();
    fixture.create_task("tasks/unused.json", &["video/orphan-ref.mp4"], &[]).unwrap();
    fixture.create_media("video/count song.mp4").unwrap();
    fixture.create_media("video/count.mp3").unwrap();
    fixture.create_media("video/colours.mp4").unwrap();
    fixture.create_media("video/spare.mp4").unwrap();
}

fn check(fixture: &TestFixture, config: &CheckConfig) -> refcheck::references::ReferenceReport {
    let table = parse_csv(fixture.read("activities.csv").as_bytes()).unwrap();
    ReferenceChecker::new(&fixture.workspace, config).check(&table).unwrap()
}

#[test]
fn test_complete_references() {
    let fixture = TestFixture::new().unwrap();
    complete_fixture(&fixture);

    let report = check(&fixture, &CheckConfig::default());

    assert!(report.missing_task_files.is_empty());
    assert_eq!(
        report.unused_task_files.iter().collect::<Vec<_>>(),
        vec!["tasks/unused.json"]
    );
    assert!(report.missing_media_files.is_empty());
    // Media referenced only by an unused task does not count as used
    assert_eq!(
        report.unused_media_files.iter().collect::<Vec<_>>(),
        vec!["video/spare.mp4"]
    );
    assert!(!report.has_missing());
}

#[test]
fn test_missing_task_and_media_files() {
    let fixture = TestFixture::new().unwrap();
    complete_fixture(&fixture);
    std::fs::remove_file(fixture.workspace.resolve("tasks/letters.json")).unwrap();
    std::fs::remove_file(fixture.workspace.resolve("video/colours.mp4")).unwrap();

    let report = check(&fixture, &CheckConfig::default());

    assert_eq!(
        report.missing_task_files.iter().collect::<Vec<_>>(),
        vec!["tasks/letters.json"]
    );
    assert_eq!(
        report.missing_media_files.iter().collect::<Vec<_>>(),
        vec!["video/colours.mp4"]
    );
    assert!(report.has_missing());
}

#[test]
fn test_magic_tasks_count_as_used() {
    let fixture = TestFixture::new().unwrap();
    complete_fixture(&fixture);

    let mut config = CheckConfig::default();
    config.add_magic_tasks("tasks/unused.json,tasks/ghost.json");
    let report = check(&fixture, &config);

    assert!(report.unused_task_files.is_empty());
    assert_eq!(
        report.missing_task_files.iter().collect::<Vec<_>>(),
        vec!["tasks/ghost.json"]
    );
    // Magic tasks are not scanned for media
    assert!(report.missing_media_files.is_empty());
}

#[test]
fn test_check_command_outcomes() {
    let runner = CliTestRunner::new().unwrap();
    complete_fixture(runner.fixture());

    let outcome = runner.expect_success(&["check", "--csv", "activities.csv"]);
    assert_eq!(outcome, CheckOutcome::Passed);

    std::fs::remove_file(runner.fixture().workspace.resolve("video/count.mp3")).unwrap();
    let outcome = runner.expect_success(&["check", "--csv", "activities.csv", "--format", "github"]);
    assert_eq!(outcome, CheckOutcome::MissingReferences);
}

#[test]
fn test_malformed_task_file_is_fatal() {
    let runner = CliTestRunner::new().unwrap();
    complete_fixture(runner.fixture());
    runner
        .fixture()
        .create_file("tasks/colours.json", "{ not json")
        .unwrap();

    let err = runner.expect_failure(&["check", "--csv", "activities.csv"]);
    assert!(matches!(err, RefcheckError::TaskFile { .. }));
}

#[test]
fn test_malformed_media_escape_is_fatal() {
    let runner = CliTestRunner::new().unwrap();
    complete_fixture(runner.fixture());
    runner
        .fixture()
        .create_task("tasks/colours.json", &["video/100%.mp4"], &[])
        .unwrap();

    let err = runner.expect_failure(&["check", "--csv", "activities.csv"]);
    match err {
        RefcheckError::TaskFile { path, .. } => assert!(path.ends_with("tasks/colours.json")),
        other => panic!("expected a task file error, got {:?}", other),
    }
}

#[test]
fn test_reserved_escape_is_not_decoded() {
    let fixture = TestFixture::new().unwrap();
    complete_fixture(&fixture);
    fixture
        .create_task("tasks/colours.json", &["video/colours%23alt.mp4"], &[])
        .unwrap();
    fixture.create_media("video/colours#alt.mp4").unwrap();

    let report = check(&fixture, &CheckConfig::default());

    assert_eq!(
        report.missing_media_files.iter().collect::<Vec<_>>(),
        vec!["video/colours%23alt.mp4"]
    );
    assert!(report.unused_media_files.contains("video/colours#alt.mp4"));
}

#[test]
fn test_task_without_steps_references_no_media() {
    let fixture = TestFixture::new().unwrap();
    complete_fixture(&fixture);
    fixture
        .create_file("tasks/colours.json", r#"{"title": "Colours"}"#)
        .unwrap();

    let report = check(&fixture, &CheckConfig::default());

    assert!(report.missing_task_files.is_empty());
    assert!(report.unused_media_files.contains("video/colours.mp4"));
    assert!(!report.has_missing());
}

#[test]
fn test_run_without_base_only_checks_references() {
    let runner = CliTestRunner::new().unwrap();
    complete_fixture(runner.fixture());
    let summary = runner.fixture().root().join("summary.md");

    let outcome = runner.expect_success(&[
        "run",
        "--csv",
        "activities.csv",
        "--base-rev",
        "",
        "--summary",
        summary.to_str().unwrap(),
        "--format",
        "json",
    ]);

    assert_eq!(outcome, CheckOutcome::Passed);
    assert!(!summary.exists());
}

#[test]
fn test_run_with_unknown_base_revision_fails() {
    let runner = CliTestRunner::new().unwrap();
    complete_fixture(runner.fixture());

    runner.expect_failure(&["run", "--csv", "activities.csv", "--base-rev", "nope"]);
}
