//! CLI end-to-end tests
//!
//! Runs commands against a store opened from a configuration file on disk.

use std::fs;
use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;
use typedstore::cli::{run_command, Cli, CliErrorCode, Command};

fn write_config(temp_dir: &TempDir) -> PathBuf {
    let config = json!({
        "driver": { "kind": "local", "path": temp_dir.path().join("data") },
        "schemas": [
            {
                "type": "user",
                "schema": {
                    "type": "object",
                    "fields": {
                        "name": { "type": "string" },
                        "age": { "type": "number" }
                    }
                }
            }
        ]
    });
    let path = temp_dir.path().join("typedstore.json");
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path
}

fn cli(config: &PathBuf, command: Command) -> Cli {
    Cli {
        config: config.clone(),
        command,
    }
}

#[test]
fn test_create_writes_record() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&temp_dir);

    run_command(cli(
        &config,
        Command::Create {
            type_name: "user".into(),
            name: "alice".into(),
            data: Some(r#"{"name": "Alice", "age": 30}"#.into()),
        },
    ))
    .unwrap();

    let stored = fs::read_to_string(temp_dir.path().join("data/user/alice")).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored, json!({ "name": "Alice", "age": 30 }));
}

#[test]
fn test_get_missing_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&temp_dir);

    let err = run_command(cli(
        &config,
        Command::Get {
            type_name: "user".into(),
            name: "ghost".into(),
        },
    ))
    .unwrap_err();
    assert_eq!(err.code(), CliErrorCode::CommandFailed);
}

#[test]
fn test_lookup_missing_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&temp_dir);

    run_command(cli(
        &config,
        Command::Lookup {
            type_name: "user".into(),
            name: "ghost".into(),
        },
    ))
    .unwrap();
}

#[test]
fn test_invalid_payload_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&temp_dir);

    let err = run_command(cli(
        &config,
        Command::Create {
            type_name: "user".into(),
            name: "alice".into(),
            data: Some("{ nope".into()),
        },
    ))
    .unwrap_err();
    assert_eq!(err.code(), CliErrorCode::InvalidPayload);
    assert!(!temp_dir.path().join("data/user/alice").exists());
}

#[test]
fn test_missing_config_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let err = run_command(cli(
        &temp_dir.path().join("absent.json"),
        Command::Schemas,
    ))
    .unwrap_err();
    assert_eq!(err.code(), CliErrorCode::ConfigError);
}
