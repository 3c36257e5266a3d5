//! Integration tests for factory repository snapshots.
//!
//! These tests build real git repositories with pinned commit dates and
//! clone them through `RepositorySnapshot`, exercising date resolution,
//! in-place re-checkout, cleanup and the historical series.
//!
//! Commit times sit at noon UTC and probe dates are days away from any
//! commit, so the local time zone of the test host cannot change which
//! commit a date selects.

use std::path::Path;
use std::process::Command;

use chrono::NaiveDate;
use tempfile::TempDir;

use ce_census::engine::{FactorySource, HistoricalSeries, MonthSteps};
use ce_census::factory::{extract_endpoints, ExtractError, OnMalformed, RepositorySnapshot, SnapshotError};

// =============================================================================
// Test Fixtures
// =============================================================================

/// A factory configuration repository with a merged side branch.
///
/// First-parent history of `master`:
///
/// ```text
/// A 2020-01-10  prod.xml {ce1}, test-itb.xml {itb}
/// B 2020-02-10  prod.xml {ce1, ce2}
/// M 2020-04-10  merge of side (S 2020-03-10: side.xml {ce9})
/// ```
struct FactoryRepo {
    dir: TempDir,
    a: String,
    b: String,
    s: String,
    m: String,
}

impl FactoryRepo {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = dir.path();
        init_repo(path);

        write(path, "prod.xml", &factory_xml(&["ce1.example.org:9619"]));
        write(path, "test-itb.xml", &factory_xml(&["itb.example.org:9619"]));
        let a = commit_all(path, "A", "2020-01-10 12:00:00 +0000");

        run_git(path, &["checkout", "-q", "-b", "side"], None);
        write(path, "side.xml", &factory_xml(&["ce9.example.org ce9.example.org:9619"]));
        let s = commit_all(path, "S", "2020-03-10 12:00:00 +0000");

        run_git(path, &["checkout", "-q", "master"], None);
        write(
            path,
            "prod.xml",
            &factory_xml(&["ce1.example.org:9619", "ce2.example.org"]),
        );
        let b = commit_all(path, "B", "2020-02-10 12:00:00 +0000");

        run_git(
            path,
            &["merge", "-q", "--no-ff", "-m", "M", "side"],
            Some("2020-04-10 12:00:00 +0000"),
        );
        let m = rev_parse(path, "HEAD");

        Self { dir, a, b, s, m }
    }

    fn url(&self) -> String {
        self.dir.path().to_string_lossy().into_owned()
    }

    fn snapshot(&self) -> RepositorySnapshot {
        RepositorySnapshot::clone_from(&self.url(), "master").expect("failed to clone fixture")
    }
}

fn init_repo(path: &Path) {
    run_git(path, &["init", "-q"], None);
    run_git(path, &["symbolic-ref", "HEAD", "refs/heads/master"], None);
    run_git(path, &["config", "user.email", "test@example.com"], None);
    run_git(path, &["config", "user.name", "Test User"], None);
    run_git(path, &["config", "commit.gpgsign", "false"], None);
}

fn factory_xml(gatekeepers: &[&str]) -> String {
    let entries: String = gatekeepers
        .iter()
        .enumerate()
        .map(|(i, gk)| {
            format!(
                "    <entry name=\"E{}\" gatekeeper=\"{}\" enabled=\"True\" gridtype=\"condor\"/>\n",
                i, gk
            )
        })
        .collect();
    format!("<glidein>\n  <entries>\n{}  </entries>\n</glidein>\n", entries)
}

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn commit_all(dir: &Path, message: &str, date: &str) -> String {
    run_git(dir, &["add", "-A"], None);
    run_git(dir, &["commit", "-q", "-m", message], Some(date));
    rev_parse(dir, "HEAD")
}

fn rev_parse(dir: &Path, rev: &str) -> String {
    let output = Command::new("git")
        .args(["rev-parse", rev])
        .current_dir(dir)
        .output()
        .expect("git rev-parse failed");
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

/// Run a git command in the given directory, optionally with pinned dates.
fn run_git(dir: &Path, args: &[&str], date: Option<&str>) {
    let mut cmd = Command::new("git");
    cmd.args(args).current_dir(dir);
    if let Some(date) = date {
        cmd.env("GIT_AUTHOR_DATE", date).env("GIT_COMMITTER_DATE", date);
    }
    let output = cmd.output().expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn hosts(snapshot: &RepositorySnapshot, production_only: bool) -> Vec<String> {
    extract_endpoints(snapshot.path(), production_only, OnMalformed::Fail)
        .unwrap()
        .iter()
        .map(|e| e.to_string())
        .collect()
}

// =============================================================================
// Commit Selection
// =============================================================================

#[test]
fn clone_checks_out_branch_tip() {
    let repo = FactoryRepo::new();
    let snapshot = repo.snapshot();

    assert_eq!(snapshot.head().as_str(), repo.m);
    assert_eq!(snapshot.timeline().len(), 3);
    assert_eq!(
        hosts(&snapshot, true),
        vec!["ce1.example.org", "ce2.example.org", "ce9.example.org"]
    );
}

#[test]
fn date_before_history_selects_earliest_commit() {
    let repo = FactoryRepo::new();
    let mut snapshot = repo.snapshot();

    let commit = snapshot.checkout_at_date(date(2019, 6, 1)).unwrap();
    assert_eq!(commit.as_str(), repo.a);
    assert_eq!(hosts(&snapshot, true), vec!["ce1.example.org"]);
}

#[test]
fn date_between_commits_selects_latest_before() {
    let repo = FactoryRepo::new();
    let mut snapshot = repo.snapshot();

    let commit = snapshot.checkout_at_date(date(2020, 3, 1)).unwrap();
    assert_eq!(commit.as_str(), repo.b);
    assert_eq!(snapshot.head().as_str(), repo.b);
}

#[test]
fn future_date_selects_tip() {
    let repo = FactoryRepo::new();
    let mut snapshot = repo.snapshot();
    snapshot.checkout_at_date(date(2020, 1, 20)).unwrap();

    let commit = snapshot.checkout_at_date(date(2035, 1, 1)).unwrap();
    assert_eq!(commit.as_str(), repo.m);
}

#[test]
fn merged_side_branch_is_not_selected() {
    let repo = FactoryRepo::new();
    let mut snapshot = repo.snapshot();

    // S (2020-03-10) is the newest commit before this date overall, but it
    // is not on the first-parent chain.
    let commit = snapshot.checkout_at_date(date(2020, 3, 20)).unwrap();
    assert_eq!(commit.as_str(), repo.b);
    assert_ne!(commit.as_str(), repo.s);
    assert!(!snapshot.path().join("side.xml").exists());
}

#[test]
fn checkout_moves_snapshot_in_place() {
    let repo = FactoryRepo::new();
    let mut snapshot = repo.snapshot();
    let path = snapshot.path().to_path_buf();
    assert!(path.join("side.xml").exists());

    snapshot.checkout_at_date(date(2020, 1, 20)).unwrap();
    assert_eq!(snapshot.path(), path);
    assert!(!path.join("side.xml").exists());

    snapshot.checkout_latest().unwrap();
    assert_eq!(snapshot.head().as_str(), repo.m);
    assert!(path.join("side.xml").exists());
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn snapshot_removed_on_drop() {
    let repo = FactoryRepo::new();
    let snapshot = repo.snapshot();
    let path = snapshot.path().to_path_buf();
    assert!(path.join("prod.xml").exists());

    drop(snapshot);
    assert!(!path.exists());
}

#[test]
fn missing_repository_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let result = RepositorySnapshot::clone_from(&missing.to_string_lossy(), "master");
    assert!(matches!(
        result,
        Err(SnapshotError::RepositoryUnavailable { .. })
    ));
}

#[test]
fn missing_branch_is_unavailable() {
    let repo = FactoryRepo::new();
    let result = RepositorySnapshot::clone_from(&repo.url(), "no-such-branch");
    assert!(matches!(
        result,
        Err(SnapshotError::RepositoryUnavailable { .. })
    ));
}

// =============================================================================
// Extraction
// =============================================================================

#[test]
fn production_filter_excludes_itb_documents() {
    let repo = FactoryRepo::new();
    let mut snapshot = repo.snapshot();
    snapshot.checkout_at_date(date(2020, 1, 20)).unwrap();

    assert_eq!(hosts(&snapshot, true), vec!["ce1.example.org"]);
    assert_eq!(
        hosts(&snapshot, false),
        vec!["ce1.example.org", "itb.example.org"]
    );
}

#[test]
fn malformed_document_fails_or_is_skipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path();
    init_repo(path);
    write(path, "good.xml", &factory_xml(&["ce1.example.org"]));
    write(path, "broken.xml", "<glidein><entries><entry");
    commit_all(path, "A", "2021-06-10 12:00:00 +0000");

    let snapshot =
        RepositorySnapshot::clone_from(&path.to_string_lossy(), "master").unwrap();

    let strict = extract_endpoints(snapshot.path(), true, OnMalformed::Fail);
    assert!(matches!(strict, Err(ExtractError::Parse { .. })));

    let lenient = extract_endpoints(snapshot.path(), true, OnMalformed::Skip).unwrap();
    assert_eq!(lenient.len(), 1);
}

// =============================================================================
// Historical Series
// =============================================================================

#[test]
fn monthly_series_over_fixture() {
    let repo = FactoryRepo::new();
    let source = FactorySource {
        repository: repo.url(),
        branch: "master".to_string(),
        production_only: true,
        on_malformed: OnMalformed::Fail,
    };
    let mut snapshot = source.snapshot().unwrap();

    let rows: Vec<_> = HistoricalSeries::new(
        &mut snapshot,
        &source,
        MonthSteps::new(date(2020, 1, 1), date(2020, 6, 1)),
    )
    .collect::<Result<_, _>>()
    .unwrap();

    let months: Vec<_> = rows.iter().map(|r| r.month).collect();
    assert_eq!(
        months,
        vec![
            date(2020, 1, 1),
            date(2020, 2, 1),
            date(2020, 3, 1),
            date(2020, 4, 1),
            date(2020, 5, 1),
        ]
    );

    let counts: Vec<_> = rows.iter().map(|r| r.count).collect();
    assert_eq!(counts, vec![1, 1, 2, 2, 3]);

    let commits: Vec<_> = rows.iter().map(|r| r.commit.as_str().to_string()).collect();
    assert_eq!(
        commits,
        vec![
            repo.a.clone(),
            repo.a.clone(),
            repo.b.clone(),
            repo.b.clone(),
            repo.m.clone(),
        ]
    );
}

#[test]
fn series_reuses_one_snapshot() {
    let repo = FactoryRepo::new();
    let source = FactorySource {
        repository: repo.url(),
        branch: "master".to_string(),
        production_only: true,
        on_malformed: OnMalformed::Fail,
    };
    let mut snapshot = source.snapshot().unwrap();
    let path = snapshot.path().to_path_buf();

    let count = HistoricalSeries::new(
        &mut snapshot,
        &source,
        MonthSteps::new(date(2020, 1, 1), date(2020, 3, 1)),
    )
    .count();
    assert_eq!(count, 2);

    // The last probe left the snapshot at A.
    assert_eq!(snapshot.path(), path);
    assert_eq!(snapshot.head().as_str(), repo.a);
}
