//! Corruption recovery tests for astrofit.
//!
//! These tests verify the system can handle:
//! - Unparseable data files
//! - Valid JSON of the wrong shape
//! - Missing files and directories

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("astrofit"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"));
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[test]
fn test_corrupted_data_file_is_quarantined() {
    let temp_dir = setup_test_dir();
    let path = temp_dir.path().join("fitness_data.json");
    fs::write(&path, "{ invalid json }}}}").expect("Failed to write corrupted data");

    cli(&temp_dir)
        .args(["exercise", "--name", "Squats", "--duration", "5", "-u", "ana"])
        .arg("--data-file")
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning: Data file"))
        .stderr(predicate::str::contains("backup created at"));

    let backup = temp_dir.path().join("fitness_data.json.corrupt");
    assert_eq!(fs::read_to_string(&backup).unwrap(), "{ invalid json }}}}");

    // A fresh store replaced the damaged one
    let content = fs::read_to_string(&path).unwrap();
    let store: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(store["ana"]["exercises"].is_object());
}

#[test]
fn test_wrong_shape_is_quarantined() {
    let temp_dir = setup_test_dir();
    let path = temp_dir.path().join("fitness_data.json");
    fs::write(&path, "[1, 2, 3]").unwrap();

    cli(&temp_dir)
        .args(["summary", "--date", "2024-01-01", "-u", "ana"])
        .arg("--data-file")
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning:"))
        .stdout(predicate::str::contains("No data found for 2024-01-01."));

    assert!(temp_dir.path().join("fitness_data.json.corrupt").exists());
    // Summaries never write
    assert!(!path.exists());
}

#[test]
fn test_empty_data_file_is_quarantined() {
    let temp_dir = setup_test_dir();
    let path = temp_dir.path().join("fitness_data.json");
    fs::write(&path, "").unwrap();

    cli(&temp_dir)
        .args(["summary", "-u", "ana"])
        .arg("--data-file")
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning:"));
}

#[test]
fn test_missing_data_dir_is_created_on_save() {
    let temp_dir = setup_test_dir();
    let path = temp_dir.path().join("nested/deeper/fitness_data.json");

    cli(&temp_dir)
        .args(["exercise", "--name", "Plank", "--duration", "3", "-u", "ana"])
        .arg("--data-file")
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning").not());

    assert!(path.exists());
}

#[test]
fn test_invalid_config_file_is_reported() {
    let temp_dir = setup_test_dir();
    let config_dir = temp_dir.path().join("config/astrofit");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "[data\nfile_name = ").unwrap();

    cli(&temp_dir)
        .arg("catalog")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TOML error"));
}
