//! Snapshot tests for Rust code generation.
//!
//! These run full conversions, preprocessing and linking included, and
//! pin the shape of the generated modules. Run `cargo insta review` to
//! update snapshots after intentional changes.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use wiregen_codegen::{ConvertOptions, Converter};
use wiregen_codegen_rust::RustGenerator;

/// Convert a set of schema sources and return units sorted by path.
fn generate_units(sources: &[(&str, &str)]) -> Vec<(String, String)> {
    let dir = TempDir::new().unwrap();
    for (rel, src) in sources {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, src).unwrap();
    }

    let converter = Converter::new(RustGenerator, ConvertOptions::default());
    let preview = converter.preview(dir.path()).unwrap();
    assert!(
        preview.failures.is_empty(),
        "generation failed: {:?}",
        preview.failures
    );

    let mut units: Vec<(String, String)> = preview
        .units
        .iter()
        .map(|unit| (rel_display(unit.rel_path()), unit.content().to_string()))
        .collect();
    units.sort();
    units
}

fn rel_display(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Get a specific unit from the generated output.
fn get_unit<'a>(units: &'a [(String, String)], rel: &str) -> &'a str {
    units
        .iter()
        .find(|(path, _)| path == rel)
        .map(|(_, content)| content.as_str())
        .unwrap_or_else(|| panic!("no unit generated at {rel}"))
}

#[test]
fn test_data_module() {
    let units = generate_units(&[(
        "item.proto",
        r#"package shop;

enum Status {
  STATUS_UNKNOWN = 0;
  STATUS_ACTIVE = 1;
}

message Item {
  uint64 id = 1;
  string label = 2;
  Status status = 3;
  repeated string tags = 4;
}
"#,
    )]);

    insta::assert_snapshot!("data_module", get_unit(&units, "item.rs"));
}

#[test]
fn test_service_module() {
    let units = generate_units(&[(
        "a/user.proto",
        r#"package a;

message User {
  uint64 id = 1;
}

message UserQuery {
  string name_filter = 1;
}

service UserService {
  rpc GetUser(UserQuery) returns (User);
}
"#,
    )]);

    insta::assert_snapshot!("service_module", get_unit(&units, "a/user.rs"));
}

#[test]
fn test_flattened_module() {
    let units = generate_units(&[(
        "shop/order.proto",
        r#"package shop;

message Order {
  message Line {
    string sku = 1;
    uint32 count = 2;
  }

  string id = 1;
  repeated shop.Order.Line lines = 2;
}
"#,
    )]);

    insta::assert_snapshot!("flattened_module", get_unit(&units, "shop/order.rs"));
}

#[test]
fn test_cross_file_modules() {
    let units = generate_units(&[
        (
            "a/user.proto",
            r#"package a;

import "common/base.proto";

message User {
  uint64 id = 1;
  common.Timestamp created = 2;
}
"#,
        ),
        (
            "common/base.proto",
            r#"package common;

message Timestamp {
  int64 seconds = 1;
}
"#,
        ),
    ]);

    assert_eq!(units.len(), 2);
    insta::assert_snapshot!("cross_file_user", get_unit(&units, "a/user.rs"));
}
