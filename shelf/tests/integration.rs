//! Integration tests for the shelf CLI.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn shelf_cmd(root: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_shelf"));
    cmd.env("SHELF_ROOT", root);
    cmd.env_remove("SHELF_LOG");
    cmd
}

fn run(root: &Path, args: &[&str]) -> Output {
    shelf_cmd(root)
        .args(args)
        .output()
        .expect("failed to run shelf")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn init_catalog(root: &Path) {
    let output = run(root, &["init"]);
    assert!(output.status.success(), "shelf init failed: {:?}", output);
}

/// Initialize a catalog and import the records used by the search tests.
fn seeded() -> TempDir {
    let tmp = TempDir::new().unwrap();
    init_catalog(tmp.path());

    let import = tmp.path().join("seed.json");
    std::fs::write(
        &import,
        r#"{
            "books": [
                {"book_id": "1024", "title": "test basic query book"},
                {"book_id": "2048", "title": "test quote book", "rating": "4.1"}
            ],
            "authors": [
                {"author_id": "8848", "name": "test comparison 1", "rating": "4.5"},
                {"author_id": "9981", "name": "test comparison 2", "rating": "3.5"}
            ]
        }"#,
    )
    .unwrap();

    let output = run(tmp.path(), &["import", import.to_str().unwrap()]);
    assert!(output.status.success(), "import failed: {:?}", output);
    assert!(stdout(&output).contains("4 created"));
    tmp
}

#[test]
fn test_init() {
    let tmp = TempDir::new().unwrap();
    init_catalog(tmp.path());

    assert!(tmp.path().join("catalog.json").exists());
    assert!(tmp.path().join("config.toml").exists());

    // Second init leaves the catalog alone
    let output = run(tmp.path(), &["init"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("already initialized"));
}

#[test]
fn test_search_before_init_fails() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["search", "book.book_id:1"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not initialized"));
}

#[test]
fn test_search_substring() {
    let tmp = seeded();
    let output = run(tmp.path(), &["search", "book.book_id:10"]);
    assert!(output.status.success());

    let found: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["book_id"], "1024");
}

#[test]
fn test_search_exact() {
    let tmp = seeded();

    let output = run(tmp.path(), &["search", "book.book_id:\"20\""]);
    assert_eq!(output.status.code(), Some(1), "no match is not found");

    let output = run(tmp.path(), &["search", "book.book_id:\"2048\""]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("test quote book"));
}

#[test]
fn test_search_comparisons() {
    let tmp = seeded();

    let output = run(tmp.path(), &["search", "author.rating:>4.4"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("8848"));
    assert!(!stdout(&output).contains("9981"));

    let output = run(tmp.path(), &["search", "author.rating: < 0.5"]);
    assert_eq!(output.status.code(), Some(1));

    let output = run(tmp.path(), &["search", "author.name: > eee"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_search_bad_requests() {
    let tmp = seeded();
    for query in [
        "book_id in book:1024",
        "dog.book_id:256",
        "book.title:test AND author.name:no",
        "book.publisher:x",
        "book.book_id:abc",
    ] {
        let output = run(tmp.path(), &["search", query]);
        assert_eq!(output.status.code(), Some(2), "query {:?} should be rejected", query);
    }
}

#[test]
fn test_search_connectives_and_count() {
    let tmp = seeded();

    let output = run(tmp.path(), &["search", "--count", "book.title:test AND book.title:quote"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "1");

    let output = run(tmp.path(), &["search", "-c", "book.title:none OR book.book_id:0"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "2");
}

#[test]
fn test_compile_prints_filter() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["compile", "author.rating: > 4.4"]);
    assert!(output.status.success(), "compile needs no catalog: {:?}", output);

    let compiled: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(compiled["entity"], "author");
    assert_eq!(compiled["filter"]["$expr"]["$gt"][1], 4.4);

    let output = run(tmp.path(), &["compile", "book.title"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_get_update_delete() {
    let tmp = seeded();

    let output = run(tmp.path(), &["get", "book", "1024"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("test basic query book"));

    let output = run(tmp.path(), &["get", "book", "123"]);
    assert_eq!(output.status.code(), Some(1));

    let output = run(tmp.path(), &["get", "book", "abc"]);
    assert_eq!(output.status.code(), Some(2));

    let patch = tmp.path().join("patch.json");
    std::fs::write(&patch, r#"{"ISBN": "1234567890"}"#).unwrap();
    let output = run(tmp.path(), &["update", "book", "1024", patch.to_str().unwrap()]);
    assert!(output.status.success(), "update failed: {:?}", output);

    let output = run(tmp.path(), &["search", "book.ISBN:\"1234567890\""]);
    assert!(output.status.success());

    let output = run(tmp.path(), &["delete", "book", "1024"]);
    assert!(output.status.success());
    let output = run(tmp.path(), &["get", "book", "1024"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_insert_from_file() {
    let tmp = seeded();

    let file = tmp.path().join("new.json");
    std::fs::write(
        &file,
        r#"[
            {"author_id": "45372", "name": "Robert C. Martin"},
            {"author_id": "1", "name": "Other"}
        ]"#,
    )
    .unwrap();
    let output = run(tmp.path(), &["insert", "author", file.to_str().unwrap()]);
    assert!(output.status.success(), "insert failed: {:?}", output);
    assert!(stdout(&output).contains("Inserted 2"));

    // Duplicate id is a bad request
    let output = run(tmp.path(), &["insert", "author", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));

    let output = run(tmp.path(), &["insert", "dog", file.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn test_export_round_trip() {
    let tmp = seeded();
    let file = tmp.path().join("export.json");

    let output = run(tmp.path(), &["export", file.to_str().unwrap()]);
    assert!(output.status.success());

    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(exported["books"].as_array().unwrap().len(), 2);
    assert_eq!(exported["authors"].as_array().unwrap().len(), 2);
}

#[test]
fn test_top() {
    let tmp = seeded();

    let output = run(tmp.path(), &["top", "author", "-k", "1"]);
    assert!(output.status.success());
    let ranked: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(ranked.as_array().unwrap().len(), 1);
    assert_eq!(ranked[0]["id"], "8848");
    assert_eq!(ranked[0]["name"], "test comparison 1");

    // Unrated books are left out
    let output = run(tmp.path(), &["top", "book"]);
    let ranked: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(ranked.as_array().unwrap().len(), 1);
}
