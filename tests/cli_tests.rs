//! Command-line tests

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn write(dir: &Path, name: &str, content: &[u8]) {
    std::fs::write(dir.join(name), content).unwrap();
}

/// A query plus a three-record database directory
fn fixture() -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    let db = root.path().join("games");
    std::fs::create_dir(&db).unwrap();

    write(&db, "a-same.sgf", b"(;GM[1]\n;B[pd];W[dd];B[pp])");
    write(&db, "b-mirrored.sgf", b"(;GM[1]\n;B[dd];W[pd];B[dp])");
    write(&db, "c-other.sgf", b"(;GM[1]\n;B[jj];W[aa];B[ss])");
    write(root.path(), "query.sgf", b"(;GM[1]\n;B[pd];W[dd];B[pp])");

    root
}

fn kifu_finder() -> Command {
    Command::cargo_bin("kifu-finder").unwrap()
}

#[test]
fn test_search_text_output() {
    let root = fixture();

    kifu_finder()
        .current_dir(root.path())
        .args(["search", "query.sgf", "--database", "games", "-n", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a-same.sgf"))
        .stdout(predicate::str::contains("b-mirrored.sgf"))
        .stdout(predicate::str::contains("c-other.sgf").not());
}

#[test]
fn test_search_json_output() {
    let root = fixture();

    let output = kifu_finder()
        .current_dir(root.path())
        .args(["search", "query.sgf", "-d", "games", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let matches = json["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 3);
    assert_eq!(matches[0]["id"], "a-same.sgf");
    assert_eq!(matches[0]["score"], 100.0);
    assert_eq!(matches[1]["id"], "b-mirrored.sgf");
    assert_eq!(matches[1]["score"], 100.0);
    assert_eq!(json["query"]["moves"], 3);
}

#[test]
fn test_search_writes_all_scores() {
    let root = fixture();

    kifu_finder()
        .current_dir(root.path())
        .args([
            "search", "query.sgf", "-d", "games", "-n", "1", "--output", "result.txt",
        ])
        .assert()
        .success();

    let result = std::fs::read_to_string(root.path().join("result.txt")).unwrap();
    let lines: Vec<&str> = result.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("a-same.sgf, 100.0"));
    assert!(lines[2].ends_with("c-other.sgf, 0.0"));
}

#[test]
fn test_search_empty_database_still_writes_output() {
    let root = fixture();
    std::fs::create_dir(root.path().join("empty")).unwrap();

    kifu_finder()
        .current_dir(root.path())
        .args(["search", "query.sgf", "-d", "empty", "--output", "result.txt"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Database is empty"));

    let result = std::fs::read_to_string(root.path().join("result.txt")).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_search_missing_query_fails() {
    let root = fixture();

    kifu_finder()
        .current_dir(root.path())
        .args(["search", "missing.sgf", "-d", "games"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.sgf"));
}

#[test]
fn test_search_missing_database_fails() {
    let root = fixture();

    kifu_finder()
        .current_dir(root.path())
        .args(["search", "query.sgf", "-d", "no-such-dir"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-such-dir"));
}

#[test]
fn test_zero_moves_rejected() {
    let root = fixture();

    kifu_finder()
        .current_dir(root.path())
        .args(["search", "query.sgf", "-d", "games", "--moves", "0"])
        .assert()
        .failure();
}

#[test]
fn test_compare_reports_variant() {
    let root = fixture();

    kifu_finder()
        .current_dir(root.path())
        .args(["compare", "query.sgf", "games/b-mirrored.sgf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Similarity: 100.00"))
        .stdout(predicate::str::contains("Best variant: x"));
}

#[test]
fn test_database_list() {
    let root = fixture();
    write(&root.path().join("games"), "broken.sgf", b"(;B[pd];W[zz])");

    kifu_finder()
        .current_dir(root.path())
        .args(["database", "list", "-d", "games"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 3 records"))
        .stdout(predicate::str::contains("Skipped: 1 unreadable"));
}

#[test]
fn test_database_show_tsv() {
    let root = fixture();

    kifu_finder()
        .current_dir(root.path())
        .args(["database", "show", "b-mirrored.sgf", "-d", "games", "-f", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1\tB\tdd"))
        .stdout(predicate::str::contains("3\tB\tdp"));
}

#[test]
fn test_database_show_unknown_record() {
    let root = fixture();

    kifu_finder()
        .current_dir(root.path())
        .args(["database", "show", "nope.sgf", "-d", "games"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
