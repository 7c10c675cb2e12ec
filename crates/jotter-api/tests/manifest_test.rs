//! Guards on how the server binary links its dependencies.

const MANIFEST: &str = include_str!("../Cargo.toml");

fn section<'a>(manifest: &'a str, header: &str) -> &'a str {
    let start = manifest
        .find(header)
        .unwrap_or_else(|| panic!("missing {header}"))
        + header.len();
    let rest = &manifest[start..];
    let end = rest.find("\n[").unwrap_or(rest.len());
    &rest[..end]
}

#[test]
fn test_in_memory_repository_is_test_only() {
    let runtime = section(MANIFEST, "\n[dependencies]");
    let runtime_db: Vec<&str> = runtime
        .lines()
        .filter(|l| l.starts_with("jotter-db"))
        .collect();
    assert_eq!(runtime_db, vec!["jotter-db.workspace = true"]);
    assert!(!runtime.contains("memory"));

    let dev = section(MANIFEST, "\n[dev-dependencies]");
    assert!(dev
        .lines()
        .any(|l| l.starts_with("jotter-db") && l.contains("\"memory\"")));
}
