//! Driver contract tests
//!
//! Every driver must:
//! - fail `read` and `delete` on an absent path with NotFound
//! - create intermediate structure on `write`
//! - answer `exists` without failing
//! - return an empty listing for an absent namespace

use serde_json::json;
use tempfile::TempDir;
use typedstore::{Driver, DriverError, FieldDef, LocalDriver, MemoryDriver, Schema, Storage};

fn check_contract(driver: &dyn Driver) {
    assert!(matches!(
        driver.read("user/ghost"),
        Err(DriverError::NotFound(_))
    ));
    assert!(matches!(
        driver.delete("user/ghost"),
        Err(DriverError::NotFound(_))
    ));
    assert!(!driver.exists("user/ghost").unwrap());
    assert!(driver.list("user").unwrap().is_empty());

    driver.write("user/alice", "{}").unwrap();
    driver.write("user/bob", "[]").unwrap();
    driver.write("user/admin/root", "1").unwrap();

    assert!(driver.exists("user/alice").unwrap());
    assert_eq!(driver.read("user/bob").unwrap(), "[]");
    assert_eq!(driver.read("user/admin/root").unwrap(), "1");

    let mut names = driver.list("user").unwrap();
    names.sort();
    assert_eq!(names, vec!["admin", "alice", "bob"]);
    assert_eq!(driver.list("user/admin").unwrap(), vec!["root"]);

    driver.write("user/alice", "{\"v\": 2}").unwrap();
    assert_eq!(driver.read("user/alice").unwrap(), "{\"v\": 2}");

    driver.delete("user/alice").unwrap();
    assert!(!driver.exists("user/alice").unwrap());
    assert!(!driver.list("user").unwrap().contains(&"alice".to_string()));
}

fn check_storage(driver: Box<dyn Driver>) {
    let storage = Storage::new(driver);
    storage
        .add_schema("note", Schema::object([("text", FieldDef::required_string())]))
        .unwrap();

    let note = json!({ "text": "hello" });
    storage.create("note", "n1", &note).unwrap();
    assert_eq!(storage.get("note", "n1").unwrap(), note);
    assert_eq!(storage.list("note").unwrap(), vec!["n1"]);

    storage.delete("note", "n1").unwrap();
    assert_eq!(storage.lookup("note", "n1").unwrap(), None);
}

#[test]
fn test_local_driver_contract() {
    let temp_dir = TempDir::new().unwrap();
    check_contract(&LocalDriver::new(temp_dir.path()));
}

#[test]
fn test_memory_driver_contract() {
    check_contract(&MemoryDriver::new());
}

#[test]
fn test_storage_over_local_driver() {
    let temp_dir = TempDir::new().unwrap();
    check_storage(Box::new(LocalDriver::new(temp_dir.path())));
}

#[test]
fn test_storage_over_memory_driver() {
    check_storage(Box::new(MemoryDriver::new()));
}

/// Needs a reachable server, e.g.
/// `TYPEDSTORE_REDIS_URL=redis://127.0.0.1:6379/15 cargo test -- --ignored`.
/// Keys under `user/` and `note/` are overwritten and deleted.
#[test]
#[ignore]
fn test_remote_driver_contract() {
    use typedstore::RemoteDriver;

    let Ok(raw) = std::env::var("TYPEDSTORE_REDIS_URL") else {
        return;
    };
    let url = url::Url::parse(&raw).unwrap();
    let database = url
        .path()
        .trim_start_matches('/')
        .parse::<u32>()
        .unwrap_or(0);

    let driver = RemoteDriver::new(
        url.host_str().unwrap_or("127.0.0.1"),
        url.port().unwrap_or(6379),
        url.username(),
        url.password().unwrap_or(""),
        database,
    )
    .unwrap();

    for path in ["user/alice", "user/bob", "user/admin/root"] {
        let _ = driver.delete(path);
    }
    check_contract(&driver);
    for path in ["user/bob", "user/admin/root"] {
        driver.delete(path).unwrap();
    }

    check_storage(Box::new(driver));
}
