use std::fs;
use std::path::PathBuf;

use warden::site::guard::{self, PathRejection};
use warden::site::{FileIndex, RedirectTable, Resolution, Site};

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("warden-site-{}-{}", tag, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_guard_rejects_traversal_independent_of_charset() {
    assert_eq!(guard::check("/../etc/passwd"), Err(PathRejection::Traversal));
    assert!(guard::has_allowed_charset("/../etc/passwd"));
    assert!(guard::escapes_root("/../etc/passwd"));
}

#[test]
fn test_guard_rejects_space_and_query() {
    assert_eq!(guard::check("/a b"), Err(PathRejection::Charset));
    assert_eq!(guard::check("/index.html?x=1"), Err(PathRejection::Charset));
}

#[test]
fn test_guard_structure() {
    assert_eq!(guard::check(""), Err(PathRejection::Empty));
    assert_eq!(guard::check("a/b"), Err(PathRejection::NotAbsolute));
    assert_eq!(guard::check("/docs/../index.html"), Ok(()));
}

#[test]
fn test_redirect_table_builds_urls() {
    let table = RedirectTable::parse("/a.txt mirror.example.org 8080\n/b 10.0.0.7 80\n");

    assert_eq!(table.len(), 2);
    assert_eq!(
        table.get("/a.txt").unwrap().location(),
        "http://mirror.example.org:8080/a.txt"
    );
    assert_eq!(table.get("/b").unwrap().url().host_str(), Some("10.0.0.7"));
    assert!(table.get("/c").is_none());
}

#[test]
fn test_redirect_table_first_definition_wins() {
    let table = RedirectTable::parse("/a one.example 1000\n/a two.example 2000\n");

    assert_eq!(table.len(), 1);
    assert_eq!(table.get("/a").unwrap().url().host_str(), Some("one.example"));
}

#[test]
fn test_redirect_table_is_token_stream() {
    let table = RedirectTable::parse("/a\n  host.example\n\t9000   /b host.example 9001");

    assert_eq!(table.get("/a").unwrap().url().port(), Some(9000));
    assert_eq!(table.get("/b").unwrap().url().port(), Some(9001));
}

#[test]
fn test_redirect_table_skips_bad_entries() {
    let table = RedirectTable::parse("/a host.example notaport\n/b host.example 70000\n/c host.example 81\n/d host");

    assert!(table.get("/a").is_none());
    assert!(table.get("/b").is_none());
    assert!(table.get("/c").is_some());
    assert!(table.get("/d").is_none());
    assert_eq!(table.len(), 1);
}

#[test]
fn test_redirect_location_is_literal() {
    let table = RedirectTable::parse("/r/../x h.example 80\n/plain h.example 80\n");

    assert_eq!(table.get("/r/../x").unwrap().location(), "http://h.example:80/r/../x");
    assert_eq!(table.get("/plain").unwrap().location(), "http://h.example:80/plain");
}

#[test]
fn test_redirect_table_malformed_entry_still_claims_path() {
    let table = RedirectTable::parse("/a host.example notaport\n/a host.example 81\n");

    assert!(table.get("/a").is_none());
    assert!(table.is_empty());
}

#[test]
fn test_redirect_table_exact_match_only() {
    let table = RedirectTable::parse("/a host.example 81");

    assert!(table.get("/a/").is_none());
    assert!(table.get("/A").is_none());
}

#[test]
fn test_redirect_table_load_missing_file() {
    assert!(RedirectTable::load(&temp_dir("missing").join("nope")).is_err());
}

#[test]
fn test_file_index_scans_recursively() {
    let root = temp_dir("index");
    fs::create_dir_all(root.join("sub/deeper")).unwrap();
    fs::write(root.join("top.txt"), b"1").unwrap();
    fs::write(root.join("sub/deeper/leaf.bin"), b"2").unwrap();

    let index = FileIndex::scan(&root).unwrap();

    assert_eq!(index.len(), 2);
    assert!(index.contains("/top.txt"));
    assert!(index.contains("/sub/deeper/leaf.bin"));
    assert!(!index.contains("/sub"));
    assert!(!index.contains("/missing"));
    assert!(!index.contains("/top.txt/"));
    assert!(!index.contains("/sub//deeper/leaf.bin"));
}

#[test]
fn test_file_index_missing_root_fails() {
    let root = temp_dir("noroot").join("absent");
    assert!(FileIndex::scan(&root).is_err());
}

#[tokio::test]
async fn test_resolve_prefers_file_on_disk() {
    let root = temp_dir("resolve-file");
    fs::write(root.join("a.txt"), b"data").unwrap();
    let index = FileIndex::scan(&root).unwrap();
    let site = Site::new(&root, index, RedirectTable::parse("/a.txt elsewhere.example 80"));

    assert!(matches!(site.resolve("/a.txt").await, Resolution::File(_)));
}

#[tokio::test]
async fn test_resolve_falls_back_to_index() {
    let root = temp_dir("resolve-index");
    fs::write(root.join("gone.txt"), b"data").unwrap();
    let index = FileIndex::scan(&root).unwrap();
    fs::remove_file(root.join("gone.txt")).unwrap();

    let site = Site::new(&root, index, RedirectTable::default());

    assert!(matches!(site.resolve("/gone.txt").await, Resolution::Indexed));
}

#[tokio::test]
async fn test_resolve_trailing_slash_on_file_is_not_found() {
    let root = temp_dir("resolve-slash");
    fs::write(root.join("hello.txt"), b"hello").unwrap();
    let site = Site::new(&root, FileIndex::scan(&root).unwrap(), RedirectTable::default());

    assert!(matches!(site.resolve("/hello.txt").await, Resolution::File(_)));
    assert!(matches!(site.resolve("/hello.txt/").await, Resolution::NotFound));
    assert!(matches!(site.resolve("/hello.txt//").await, Resolution::NotFound));
}

#[tokio::test]
async fn test_resolve_redirect_then_not_found() {
    let root = temp_dir("resolve-redirect");
    let site = Site::new(
        &root,
        FileIndex::default(),
        RedirectTable::parse("/moved other.example 8081"),
    );

    match site.resolve("/moved").await {
        Resolution::Redirect(target) => assert_eq!(target.location(), "http://other.example:8081/moved"),
        other => panic!("expected redirect, got {:?}", other),
    }
    assert!(matches!(site.resolve("/nothing").await, Resolution::NotFound));
}

#[tokio::test]
async fn test_resolve_directory_is_not_a_file() {
    let root = temp_dir("resolve-dir");
    fs::create_dir_all(root.join("sub")).unwrap();
    let site = Site::new(&root, FileIndex::scan(&root).unwrap(), RedirectTable::default());

    assert!(matches!(site.resolve("/sub").await, Resolution::NotFound));
    assert!(matches!(site.resolve("/").await, Resolution::NotFound));
}
