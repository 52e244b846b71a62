//! # CLI Command Tests
//!
//! This file contains tests for the `extract` and `inspect` commands of the
//! `personachat` binary.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

const EXPORT: &str = "DjjD:\n\n时间: 2025-12-30 10:00:00\n\n内容: 赫赫我显示\n\n提及: 无\n\n\
swern:\n\n时间: 2025-12-30 10:01:00\n\n内容: [图片: a.png]\n\n\
DjjD:\n\n时间: 2025-12-30 10:02:00\n\n内容: [回复 u_123: 原消息]: 卷狗别叫   [图片: b.png]\n";

/// Helper to create a temporary chat export within a given directory.
fn create_export(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("group_export.txt");
    fs::write(&path, EXPORT).expect("Failed to write fixture file");
    path
}

#[test]
fn test_extract_writes_delimited_sample() {
    // Arrange
    let temp_dir = tempdir().unwrap();
    let export_path = create_export(temp_dir.path());
    let output_path = temp_dir.path().join("data").join("1.txt");

    // Act
    let mut cmd = Command::cargo_bin("personachat").unwrap();
    cmd.arg("extract")
        .arg(export_path.to_str().unwrap())
        .arg("DjjD")
        .arg("--output")
        .arg(output_path.to_str().unwrap());

    // Assert
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Extracted 2 messages"));
    assert_eq!(fs::read_to_string(&output_path).unwrap(), "赫赫我显示:卷狗别叫");
}

#[test]
fn test_extract_fails_when_person_has_no_messages() {
    let temp_dir = tempdir().unwrap();
    let export_path = create_export(temp_dir.path());
    let output_path = temp_dir.path().join("2.txt");

    Command::cargo_bin("personachat")
        .unwrap()
        .arg("extract")
        .arg(export_path.to_str().unwrap())
        .arg("swern")
        .arg("--output")
        .arg(output_path.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Extract failed"))
        .stderr(predicate::str::contains("no messages found for 'swern'"));
    assert!(!output_path.exists());
}

#[test]
fn test_extract_missing_input_file() {
    Command::cargo_bin("personachat")
        .unwrap()
        .arg("extract")
        .arg("a/non/existent/export.txt")
        .arg("DjjD")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read input file"));
}

#[test]
fn test_inspect_reports_both_formats() {
    // Arrange
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("1.txt"), "a:b::c").unwrap();
    fs::write(
        temp_dir.path().join("1.json"),
        r#"[{"content": "x"}, {"message": "y"}, "z", {"foo": "bar"}]"#,
    )
    .unwrap();

    // Act
    let output = Command::cargo_bin("personachat")
        .unwrap()
        .arg("inspect")
        .arg("--data-dir")
        .arg(temp_dir.path().to_str().unwrap())
        .arg("--json")
        .output()
        .unwrap();

    // Assert
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["text"]["exists"], true);
    assert_eq!(report["text"]["chars"], 6);
    assert_eq!(report["text"]["raw_segments"], 4);
    assert_eq!(report["text"]["segments"], 3);
    assert_eq!(report["json"]["data_type"], "array");
    assert_eq!(report["json"]["array_len"], 4);
    assert_eq!(report["json"]["entries"], 3);
}

#[test]
fn test_inspect_reports_missing_files() {
    let temp_dir = tempdir().unwrap();

    Command::cargo_bin("personachat")
        .unwrap()
        .arg("inspect")
        .arg("--data-dir")
        .arg(temp_dir.path().to_str().unwrap())
        .arg("--stem")
        .arg("wjd")
        .assert()
        .success()
        .stdout(predicate::str::contains("wjd.txt does not exist"))
        .stdout(predicate::str::contains("wjd.json does not exist"));
}
