//! End-to-end tests for the `clemens` binary
//!
//! Every command runs with its config directory pointed at a temp folder so
//! a real user config never leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use clemens_parser::test_utils::ProtocolFixture;

fn clemens(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("clemens").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("CLEMENS_LOG_LEVEL")
        .env_remove("CLEMENS_VAULT_NAME")
        .env_remove("CLEMENS_FOOTER_DENSITY");
    cmd
}

fn sample_folder() -> TempDir {
    ProtocolFixture::new()
        .protocol(1, "River", "✅ OPERATIONAL")
        .protocol(3, "Fog", "draft")
        .file("journal.md", "# Journal\n\nMark Twain wrote about the river. 🌊")
        .build()
        .unwrap()
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_version() {
    let home = TempDir::new().unwrap();
    clemens(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_cli_help_lists_commands() {
    let home = TempDir::new().unwrap();
    clemens(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("vault"))
        .stdout(predicate::str::contains("pdf"));
}

// ============================================================================
// Parse Command Tests
// ============================================================================

#[test]
fn test_parse_folder_table() {
    let home = TempDir::new().unwrap();
    let folder = sample_folder();
    clemens(home.path())
        .args(["parse", "--protocol"])
        .arg(folder.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("PROTOCOL_1.md"))
        .stdout(predicate::str::contains("journal.md"))
        .stdout(predicate::str::contains("3 documents"));
}

#[test]
fn test_parse_file_json() {
    let home = TempDir::new().unwrap();
    let folder = sample_folder();
    let output = clemens(home.path())
        .args(["parse", "--protocol", "--format", "json"])
        .arg(folder.path().join("PROTOCOL_3.md"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let docs = value.as_array().unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["kind"], "protocol");
    assert_eq!(docs[0]["protocol_number"], 3);
}

#[test]
fn test_parse_missing_path_fails() {
    let home = TempDir::new().unwrap();
    clemens(home.path())
        .args(["parse", "/definitely/not/here.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found"));
}

// ============================================================================
// Export Command Tests
// ============================================================================

#[test]
fn test_export_writes_reports() {
    let home = TempDir::new().unwrap();
    let folder = sample_folder();
    let out = TempDir::new().unwrap();

    clemens(home.path())
        .arg("export")
        .arg(folder.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 documents"));

    for name in [
        "summary.md",
        "summary.json",
        "emoji_report.md",
        "structure.md",
        "protocol_index.md",
        "documents/PROTOCOL_1.md",
        "documents/PROTOCOL_1.json",
        "documents/journal.md",
    ] {
        assert!(out.path().join(name).exists(), "missing {}", name);
    }

    let index = fs::read_to_string(out.path().join("protocol_index.md")).unwrap();
    assert!(index.find("P1").unwrap() < index.find("P3").unwrap());
}

#[test]
fn test_export_protocols_only() {
    let home = TempDir::new().unwrap();
    let folder = sample_folder();
    let out = TempDir::new().unwrap();

    clemens(home.path())
        .arg("export")
        .arg(folder.path())
        .arg("-o")
        .arg(out.path())
        .arg("--protocols")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 documents"));
    assert!(!out.path().join("documents/journal.md").exists());
}

// ============================================================================
// Vault Command Tests
// ============================================================================

#[test]
fn test_vault_with_name_override() {
    let home = TempDir::new().unwrap();
    let folder = sample_folder();
    let out = TempDir::new().unwrap();

    clemens(home.path())
        .arg("vault")
        .arg(folder.path())
        .arg("-o")
        .arg(out.path())
        .args(["--name", "Riverboat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vault 'Riverboat'"));

    let readme = fs::read_to_string(out.path().join("README.md")).unwrap();
    assert!(readme.contains("Riverboat Knowledge Base"));
    assert!(out.path().join("Protocols/Protocol_1.md").exists());
    assert!(out.path().join("Documents").is_dir());
}

// ============================================================================
// PDF Command Tests
// ============================================================================

#[cfg(not(feature = "pdf"))]
#[test]
fn test_pdf_without_backend_warns() {
    let home = TempDir::new().unwrap();
    let folder = sample_folder();
    let out = TempDir::new().unwrap();
    let pdf = out.path().join("protocols.pdf");

    clemens(home.path())
        .arg("pdf")
        .arg(folder.path())
        .arg("-o")
        .arg(&pdf)
        .assert()
        .success()
        .stdout(predicate::str::contains("Warning:"))
        .stdout(predicate::str::contains("rebuild with the `pdf` feature").count(1));
    assert!(!pdf.exists());
}

#[cfg(feature = "pdf")]
#[test]
fn test_pdf_summary_is_written() {
    let home = TempDir::new().unwrap();
    let folder = sample_folder();
    let out = TempDir::new().unwrap();
    let pdf = out.path().join("summary.pdf");

    clemens(home.path())
        .arg("pdf")
        .arg(folder.path())
        .arg("-o")
        .arg(&pdf)
        .args(["--summary", "--title", "River Log"])
        .assert()
        .success();
    assert!(fs::read(&pdf).unwrap().starts_with(b"%PDF"));
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
#[serial]
fn test_config_init_creates_file() {
    let home = TempDir::new().unwrap();
    let config_path = home.path().join("clemens.toml");

    clemens(home.path())
        .args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config file at"));

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.starts_with("# Clemens configuration"));
    assert!(content.contains("[extraction]"));
}

#[test]
#[serial]
fn test_config_init_refuses_overwrite() {
    let home = TempDir::new().unwrap();
    let config_path = home.path().join("clemens.toml");
    fs::write(&config_path, "existing content").unwrap();

    clemens(home.path())
        .args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Config file already exists"))
        .stdout(predicate::str::contains("--force"));
    assert_eq!(fs::read_to_string(&config_path).unwrap(), "existing content");

    clemens(home.path())
        .args(["config", "init", "--force", "--path"])
        .arg(&config_path)
        .assert()
        .success();
    assert_ne!(fs::read_to_string(&config_path).unwrap(), "existing content");
}

#[test]
#[serial]
fn test_config_show_applies_file_and_env() {
    let home = TempDir::new().unwrap();
    let config_path = home.path().join("clemens.toml");
    fs::write(&config_path, "[obsidian]\nvault_name = \"Mississippi\"\n").unwrap();

    clemens(home.path())
        .arg("-C")
        .arg(&config_path)
        .args(["config", "show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"vault_name\": \"Mississippi\""));

    clemens(home.path())
        .env("CLEMENS_VAULT_NAME", "Hannibal")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vault_name = \"Hannibal\""));
}

#[test]
fn test_missing_explicit_config_fails() {
    let home = TempDir::new().unwrap();
    clemens(home.path())
        .arg("-C")
        .arg(home.path().join("absent.toml"))
        .args(["config", "show"])
        .assert()
        .failure();
}
