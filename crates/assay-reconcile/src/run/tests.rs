use std::fs;
use std::path::{Path, PathBuf};

use assay_config::TagConfig;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use super::*;
use crate::test_support::memory::MemoryGateway;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn question(question_type: &str, tags: &[&str]) -> String {
    format!(
        "---\ntype: {question_type}\ntags: [{}]\n---\nQuestion body.\n",
        tags.join(", ")
    )
}

struct Fixture {
    dir: TempDir,
    parser: QuestionParser,
    repository: QuestionRepository,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "Databases/joins.md", &question("open", &["backend"]));
    write(
        root,
        "Databases/indexes.md",
        &question("multiple-choice", &["backend", "frontend"]),
    );
    write(root, "Python/palindrome/palindrome.md", &question("coding", &["backend"]));
    write(root, "Python/palindrome/solution.py", "def solve(): ...\n");
    let parser = QuestionParser::new(TagConfig::new(["backend", "frontend", "data"]).unwrap());
    let repository = QuestionRepository::new(root, Vec::new());
    Fixture {
        dir,
        parser,
        repository,
    }
}

fn id_of(report: &CommitReport, path: &str) -> i64 {
    report
        .new_assignments
        .iter()
        .find(|persisted| persisted.source_path == Path::new(path))
        .map(|persisted| persisted.id)
        .unwrap()
}

fn bootstrap_request() -> UploadRequest {
    UploadRequest {
        added: vec![
            PathBuf::from("Databases/joins.md"),
            PathBuf::from("Databases/indexes.md"),
            PathBuf::from("Python/palindrome/palindrome.md"),
            PathBuf::from("Python/palindrome/solution.py"),
        ],
        reconcile_config: true,
        commit_hash: "c1".into(),
        ..UploadRequest::default()
    }
}

#[tokio::test]
async fn first_upload_creates_every_configured_tag() {
    let fixture = fixture();
    let mut gateway = MemoryGateway::default();

    let outcome = run_upload(
        &mut gateway,
        &fixture.parser,
        &fixture.repository,
        bootstrap_request(),
    )
    .await
    .unwrap();

    assert!(!outcome.skipped);
    let tags: Vec<&str> = outcome.report.created.iter().map(|c| c.tag.as_str()).collect();
    assert_eq!(tags, vec!["backend", "data", "frontend"]);
    assert_eq!(outcome.report.new_assignments.len(), 3);

    let backend = gateway.latest_for("backend").unwrap();
    let titles: Vec<&str> = backend.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Databases", "Python"]);
    assert!(gateway.latest_for("data").unwrap().sections.is_empty());
    assert_eq!(
        gateway.latest_for("frontend").unwrap().sections[0].assignment_ids,
        vec![id_of(&outcome.report, "Databases/indexes.md")]
    );
}

#[tokio::test]
async fn incremental_upload_after_renames() {
    let fixture = fixture();
    let mut gateway = MemoryGateway::default();
    let first = run_upload(
        &mut gateway,
        &fixture.parser,
        &fixture.repository,
        bootstrap_request(),
    )
    .await
    .unwrap();

    let renamed = embed_new_ids(&fixture.repository, &first.report).unwrap();
    assert_eq!(renamed.len(), 3);
    let joins_id = id_of(&first.report, "Databases/joins.md");
    let indexes_id = id_of(&first.report, "Databases/indexes.md");
    let joins = PathBuf::from(format!("Databases/joins_qid{joins_id}.md"));
    let indexes = PathBuf::from(format!("Databases/indexes_qid{indexes_id}.md"));
    assert!(fixture.dir.path().join(&joins).is_file());
    assert!(!fixture.dir.path().join("Databases/joins.md").exists());

    fs::remove_file(fixture.dir.path().join(&joins)).unwrap();
    fs::write(
        fixture.dir.path().join(&indexes),
        question("multiple-choice", &["frontend"]),
    )
    .unwrap();

    let second = run_upload(
        &mut gateway,
        &fixture.parser,
        &fixture.repository,
        UploadRequest {
            modified: vec![indexes],
            deleted: vec![joins],
            commit_hash: "c2".into(),
            ..UploadRequest::default()
        },
    )
    .await
    .unwrap();

    assert!(second.report.new_assignments.is_empty());
    assert_eq!(second.report.deactivated.len(), 1);

    let backend = gateway.latest_for("backend").unwrap();
    let titles: Vec<&str> = backend.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Python"]);
    assert_eq!(backend.git_commit_hash.as_deref(), Some("c2"));

    let frontend = gateway.latest_for("frontend").unwrap();
    assert_eq!(frontend.sections[0].assignment_ids, vec![indexes_id]);
    assert_eq!(frontend.git_commit_hash.as_deref(), Some("c1"));

    for tag in ["backend", "frontend", "data"] {
        assert_eq!(gateway.latest_count(tag), 1);
    }
}

#[tokio::test]
async fn non_markdown_changes_are_a_noop() {
    let fixture = fixture();
    let mut gateway = MemoryGateway::default();

    let outcome = run_upload(
        &mut gateway,
        &fixture.parser,
        &fixture.repository,
        UploadRequest {
            added: vec![PathBuf::from("Python/palindrome/solution.py")],
            commit_hash: "c1".into(),
            ..UploadRequest::default()
        },
    )
    .await
    .unwrap();

    assert!(outcome.skipped);
    assert!(outcome.report.is_empty());
    assert!(gateway.writes.is_empty());
}

#[tokio::test]
async fn parse_failure_aborts_before_any_write() {
    let fixture = fixture();
    write(
        fixture.dir.path(),
        "Security/xss.md",
        &question("open", &["devops"]),
    );
    let mut gateway = MemoryGateway::default();

    let err = run_upload(
        &mut gateway,
        &fixture.parser,
        &fixture.repository,
        UploadRequest {
            added: vec![PathBuf::from("Security/xss.md")],
            commit_hash: "c1".into(),
            ..UploadRequest::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ReconcileError::Parse(ParseError::UnknownTag { .. })));
    assert!(gateway.writes.is_empty());
}

#[tokio::test]
async fn reset_rebuilds_everything_and_reassigns_ids() {
    let fixture = fixture();
    fs::rename(
        fixture.dir.path().join("Databases/joins.md"),
        fixture.dir.path().join("Databases/joins_qid42.md"),
    )
    .unwrap();
    let mut gateway = MemoryGateway::default();
    gateway.seed_assignment(42, "Databases/joins.md", assay_core::enums::AssignmentType::Open);
    gateway.seed_assessment("retired", &[("Databases", &[42])]);

    let report = reset(&mut gateway, &fixture.parser, &fixture.repository, "c9")
        .await
        .unwrap();

    assert_eq!(gateway.writes.first(), Some(&"clear_all"));
    assert!(gateway.latest_for("retired").is_none());
    let tags: Vec<&str> = report.created.iter().map(|c| c.tag.as_str()).collect();
    assert_eq!(tags, vec!["backend", "data", "frontend"]);
    assert_eq!(gateway.assignment_count(), 3);

    let joins_id = id_of(&report, "Databases/joins_qid42.md");
    assert_ne!(joins_id, 42);
    embed_new_ids(&fixture.repository, &report).unwrap();
    assert!(
        fixture
            .dir
            .path()
            .join(format!("Databases/joins_qid{joins_id}.md"))
            .is_file()
    );
    assert!(!fixture.dir.path().join("Databases/joins_qid42.md").exists());
}

#[tokio::test]
async fn relabel_moves_latest_assessments_to_new_hash() {
    let fixture = fixture();
    let mut gateway = MemoryGateway::default();
    run_upload(
        &mut gateway,
        &fixture.parser,
        &fixture.repository,
        bootstrap_request(),
    )
    .await
    .unwrap();

    let count = relabel_commit(&mut gateway, "c1", "c1-amended").await.unwrap();

    assert_eq!(count, 3);
    assert_eq!(
        gateway.latest_for("data").unwrap().git_commit_hash.as_deref(),
        Some("c1-amended")
    );
    assert_eq!(relabel_commit(&mut gateway, "c1", "x").await.unwrap(), 0);
}
