//! Shared utilities for integration testing.

use std::fs;
use std::path::PathBuf;

use serde_json::{Map, Value};

/// Write a config file under the system temp dir, unique per test process.
pub fn write_config(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "task-router-it-{}-{}",
        std::process::id(),
        name
    ));
    fs::write(&path, content).unwrap();
    path
}

/// Build publish options from a JSON literal.
#[allow(dead_code)]
pub fn options(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}
