mod common;

use std::io::Write;

use common::*;
use meeple_import::UserIdentityMap;

fn catalog_with_users() -> FakeCatalog {
    let mut catalog = FakeCatalog::default();
    catalog.users.insert("bobludo".to_string(), "700".to_string());
    catalog
}

#[test]
fn numeric_values_are_trusted_and_names_looked_up() {
    let catalog = catalog_with_users();
    let map = UserIdentityMap::from_store(
        "Alice = 42\nbob = bobludo\ncarol = ghost\ndave = offline\n",
        &catalog,
    );

    assert_eq!(map.resolve("ALICE"), Some("42"));
    assert_eq!(map.resolve("bob"), Some("700"));
    assert_eq!(map.resolve("carol"), None);
    assert_eq!(map.resolve("dave"), None);
    assert_eq!(map.len(), 2);
    // Only non-numeric values hit the destination.
    assert_eq!(
        *catalog.user_lookups.borrow(),
        vec!["bobludo".to_string(), "ghost".to_string(), "offline".to_string()]
    );
}

#[test]
fn loads_from_file() {
    let catalog = catalog_with_users();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# players").unwrap();
    writeln!(file, "zed = 9").unwrap();
    writeln!(file, "bob = bobludo").unwrap();

    let map = UserIdentityMap::load(file.path(), &catalog);
    assert_eq!(map.entries(), vec![("bob", "700"), ("zed", "9")]);
}

#[test]
fn missing_file_is_an_empty_map() {
    let dir = tempfile::tempdir().unwrap();
    let map = UserIdentityMap::load(&dir.path().join("usuarios.txt"), &FakeCatalog::default());
    assert!(map.is_empty());
}

#[test]
fn importing_user_is_added_only_when_absent() {
    let mut map = UserIdentityMap::new();
    map.insert("alice", "42");

    map.ensure_user("Alice", Some("99"));
    assert_eq!(map.resolve("alice"), Some("42"));

    map.ensure_user("Carol", Some("5"));
    assert_eq!(map.resolve("carol"), Some("5"));

    map.ensure_user("dave", None);
    assert_eq!(map.resolve("dave"), None);
}
