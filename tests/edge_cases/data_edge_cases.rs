//! Edge cases in CSV content and loading

use crate::common::{CliTestRunner, TestFixture};
use refcheck::loader::{GitTableLoader, TableLoader, TableSource};
use refcheck::table::parse_csv;
use refcheck::{diff_tables, RefcheckError, ReportRenderer};
use std::path::PathBuf;

fn load_pair(fixture: &TestFixture) -> (refcheck::Table, refcheck::Table) {
    let loader = GitTableLoader::new(fixture.workspace.clone(), "activities.csv");
    let base = loader
        .load_table(&TableSource::File(PathBuf::from("base.csv")))
        .unwrap();
    let head = loader.load_table(&TableSource::WorkingTree).unwrap();
    (base, head)
}

#[test]
fn test_crlf_file_against_lf_file_is_unchanged() {
    let fixture = TestFixture::new().unwrap();
    fixture
        .create_file(
            "base.csv",
            "UUID,Title,Desc\r\n1,A,\"multi\r\nline\"\r\n2,B,plain\r\n",
        )
        .unwrap();
    fixture
        .create_file("activities.csv", "UUID,Title,Desc\n1,A,\"multi\nline\"\n2,B,plain\n")
        .unwrap();

    let (base, head) = load_pair(&fixture);
    assert_eq!(base.len(), 2);
    assert!(diff_tables(&base, &head, "UUID").is_empty());
}

#[test]
fn test_quoted_commas_and_quotes() {
    let table = parse_csv(b"UUID,Title\n1,\"Hello, world\"\n2,\"Say \"\"hi\"\"\"\n").unwrap();
    assert_eq!(table[0]["Title"], "Hello, world");
    assert_eq!(table[1]["Title"], "Say \"hi\"");
}

#[test]
fn test_rows_without_identity_in_files() {
    let fixture = TestFixture::new().unwrap();
    fixture.create_file("base.csv", "UUID,Title\n,Draft\n1,A\n").unwrap();
    fixture
        .create_file("activities.csv", "UUID,Title\n,Draft renamed\n1,A\n,Another draft\n")
        .unwrap();

    let (base, head) = load_pair(&fixture);
    assert_eq!(head.len(), 3);
    assert!(diff_tables(&base, &head, "UUID").is_empty());
}

#[test]
fn test_schema_evolution_between_files() {
    let fixture = TestFixture::new().unwrap();
    fixture.create_file("base.csv", "UUID,Title,Legacy\n1,A,old\n").unwrap();
    fixture.create_file("activities.csv", "UUID,Title,Video\n1,A,intro.mp4\n").unwrap();

    let (base, head) = load_pair(&fixture);
    assert!(diff_tables(&base, &head, "UUID").is_empty());
}

#[test]
fn test_blank_lines_and_bom() {
    let fixture = TestFixture::new().unwrap();
    fixture
        .create_file("base.csv", "\u{feff}UUID,Title\n\n1,A\n\n\n2,B\n")
        .unwrap();
    fixture.create_file("activities.csv", "UUID,Title\n1,A\n2,B\n").unwrap();

    let (base, head) = load_pair(&fixture);
    assert_eq!(base.len(), 2);
    assert!(diff_tables(&base, &head, "UUID").is_empty());
}

#[test]
fn test_unicode_labels_render() {
    let base = parse_csv("UUID,Title\n".as_bytes()).unwrap();
    let head = parse_csv("UUID,Title\n1,Café ☕\n2,北京\n".as_bytes()).unwrap();
    let report = ReportRenderer::new(Default::default()).render(&diff_tables(&base, &head, "UUID"));
    assert!(report.contains(" - [Café ☕][1]\n"));
    assert!(report.contains(" - [北京][2]\n"));
}

#[test]
fn test_short_row_aborts_instead_of_hiding_change() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    fixture.create_file("base.csv", "UUID,Title,Desc\n1,A,important text\n").unwrap();
    fixture.create_file("activities.csv", "UUID,Title,Desc\n1,A\n").unwrap();
    let summary = fixture.root().join("summary.md");

    let err = runner.expect_failure(&[
        "diff",
        "--csv",
        "activities.csv",
        "--base-file",
        "base.csv",
        "--summary",
        summary.to_str().unwrap(),
    ]);
    assert!(matches!(err, RefcheckError::Csv(_)));
    assert!(!summary.exists());
}

#[test]
fn test_emptied_trailing_value_is_modified() {
    let base = parse_csv(b"UUID,Title,Desc\n1,A,x\n").unwrap();
    let head = parse_csv(b"UUID,Title,Desc\n1,A,\n").unwrap();
    assert_eq!(diff_tables(&base, &head, "UUID").changed_columns("1"), vec!["Desc"]);
}

#[test]
fn test_missing_identity_column_in_file() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    fixture.create_file("base.csv", "Title\nA\n").unwrap();
    fixture.create_file("activities.csv", "Title\nB\n").unwrap();
    let summary = fixture.root().join("summary.md");

    runner.expect_success(&[
        "diff",
        "--csv",
        "activities.csv",
        "--base-file",
        "base.csv",
        "--summary",
        summary.to_str().unwrap(),
    ]);
    assert!(!summary.exists());
}

#[test]
fn test_empty_file() {
    let table = parse_csv(b"").unwrap();
    assert!(table.is_empty());
}
