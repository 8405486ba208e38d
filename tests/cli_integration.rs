//! CLI integration tests for relnotes
//!
//! These tests run the binary against a temporary config directory and CSV
//! export, verifying the generated report and the version detection output.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the relnotes binary
fn relnotes_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("relnotes"))
}

const CONFIG_JSON: &str = r#"{
    "input_csv_file": "export.csv",
    "output_report_file": "output/ReleaseNotes_{global_release_version}.md",
    "report_title_template": "Release notes {global_release_version}",
    "links_label": "implemented in",
    "auto_detect_global_version": true,
    "auto_detect_component_versions": true,
    "components": {
        "version_source_header": "Fix Version/s",
        "prefixes": [
            {"prefix": "AUTH-", "component": "Auth Service"},
            {"prefix": "PAY-", "component": "Payments"}
        ]
    },
    "sort": {
        "issue_type_order": ["Bug", "Improvement"],
        "sort_tasks_by": "priority_val",
        "priority_order": ["Highest", "High", "Medium", "Low"]
    }
}"#;

const FIELDS_JSON: &str = r#"[
    {"csv_header": "Issue key", "internal_name": "issue_key",
     "display_in_changes": true, "changes_order": 1},
    {"csv_header": "Summary", "internal_name": "summary_text"},
    {"csv_header": "Issue Type", "internal_name": "type"},
    {"csv_header": "Priority", "internal_name": "priority_val"},
    {"csv_header": "Custom field (Setup instructions)",
     "internal_name": "setup_instructions"},
    {"csv_header": "Fix Version/s", "internal_name": "fix_versions"},
    {"internal_name": "task_report_text",
     "display_in_changes": true, "changes_order": 2}
]"#;

const EXPORT_CSV: &str = "\
Issue key,Summary,Issue Type,Priority,Custom field (Setup instructions),Fix Version/s,Fix Version/s
A-1,Fix login loop,Bug,High,Run the auth migration,AUTH-1.2.0,1.2 (GLOBAL)
A-2,Add refund flow,Improvement,Medium,,PAY-2.0.1,
A-3,Crash on empty cart,Bug,Highest,,PAY-2.0.1,1.2 (GLOBAL)
";

/// Writes a config directory and CSV export into the temp dir
fn setup_fixture(dir: &TempDir) -> std::path::PathBuf {
    let config_dir = dir.path().join("configs");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.json"), CONFIG_JSON).unwrap();
    fs::write(config_dir.join("fields_mapping.json"), FIELDS_JSON).unwrap();
    fs::write(dir.path().join("export.csv"), EXPORT_CSV).unwrap();
    config_dir
}

fn read_report(dir: &Path) -> String {
    fs::read_to_string(dir.join("output/ReleaseNotes_1.2.md")).unwrap()
}

// =============================================================================
// Generate Tests
// =============================================================================

#[test]
fn test_generate_writes_report() {
    let dir = TempDir::new().unwrap();
    setup_fixture(&dir);

    relnotes_cmd()
        .current_dir(dir.path())
        .args(["generate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let report = read_report(dir.path());
    assert!(report.contains("# Release notes 1.2"));
    assert!(report.contains("| Auth Service | 1.2.0 |"));
    assert!(report.contains("| Payments | 2.0.1 |"));
    assert!(report.contains("### Auth Service"));
    assert!(report.contains("### Payments"));
    assert!(report.contains("#### Bug"));
}

#[test]
fn test_generate_orders_changes_by_priority() {
    let dir = TempDir::new().unwrap();
    setup_fixture(&dir);

    relnotes_cmd()
        .current_dir(dir.path())
        .args(["generate"])
        .assert()
        .success();

    let report = read_report(dir.path());
    // Within Payments / Bug + Improvement: Bug group comes first per the
    // configured issue type order, and A-3 (Highest) precedes nothing else
    // in its group but must appear before the Improvement group.
    let bug_pos = report.find("#### Bug").unwrap();
    let improvement_pos = report.find("#### Improvement").unwrap();
    assert!(bug_pos < improvement_pos);
    assert!(report.contains("**A-3** Crash on empty cart"));
}

#[test]
fn test_generate_includes_setup_instructions() {
    let dir = TempDir::new().unwrap();
    setup_fixture(&dir);

    relnotes_cmd()
        .current_dir(dir.path())
        .args(["generate"])
        .assert()
        .success();

    let report = read_report(dir.path());
    assert!(report.contains("## System setup"));
    assert!(report.contains("- **A-1: Fix login loop**"));
    assert!(report.contains("  Run the auth migration"));
    // Rows without instructions stay out of the setup section
    assert!(!report.contains("- **A-2"));
}

#[test]
fn test_generate_json_output() {
    let dir = TempDir::new().unwrap();
    setup_fixture(&dir);

    let output = relnotes_cmd()
        .current_dir(dir.path())
        .args(["generate", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let data: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(data["global_version"], "1.2");
    assert_eq!(data["component_versions"][0]["component"], "Auth Service");
    assert!(data["changes"]["components"].is_array());
    // JSON mode prints the data instead of writing a file
    assert!(!dir.path().join("output").exists());
}

#[test]
fn test_generate_with_input_and_output_overrides() {
    let dir = TempDir::new().unwrap();
    let config_dir = setup_fixture(&dir);

    let other_csv = dir.path().join("other.csv");
    fs::write(
        &other_csv,
        "Issue key,Summary,Issue Type,Priority,Custom field (Setup instructions),Fix Version/s\n\
         B-1,Standalone fix,Bug,Low,,AUTH-3.0.0\n",
    )
    .unwrap();
    let report_path = dir.path().join("custom.md");

    relnotes_cmd()
        .current_dir(dir.path())
        .arg("generate")
        .arg("--config-dir")
        .arg(&config_dir)
        .arg("--input")
        .arg(&other_csv)
        .arg("--output")
        .arg(&report_path)
        .assert()
        .success();

    let report = fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("**B-1** Standalone fix"));
    assert!(report.contains("| Auth Service | 3.0.0 |"));
}

#[test]
fn test_generate_no_changes_report() {
    let dir = TempDir::new().unwrap();
    setup_fixture(&dir);
    fs::write(
        dir.path().join("export.csv"),
        "Issue key,Summary,Issue Type,Priority,Custom field (Setup instructions),Fix Version/s\n\
         A-1,No versions here,Bug,High,,\n",
    )
    .unwrap();

    relnotes_cmd()
        .current_dir(dir.path())
        .args(["generate"])
        .assert()
        .success();

    // Global detection finds nothing, the configured fallback names the file
    let report =
        fs::read_to_string(dir.path().join("output/ReleaseNotes_N-A.md")).unwrap();
    assert!(report.contains("_No changes in this release._"));
    assert!(!report.contains("## System setup"));
}

// =============================================================================
// Versions Tests
// =============================================================================

#[test]
fn test_versions_prints_detections() {
    let dir = TempDir::new().unwrap();
    setup_fixture(&dir);

    relnotes_cmd()
        .current_dir(dir.path())
        .args(["versions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Global version: 1.2"))
        .stdout(predicate::str::contains("Auth Service: 1.2.0"))
        .stdout(predicate::str::contains("Payments: 2.0.1"));
}

#[test]
fn test_versions_json_output() {
    let dir = TempDir::new().unwrap();
    setup_fixture(&dir);

    let output = relnotes_cmd()
        .current_dir(dir.path())
        .args(["versions", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let data: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(data["global_version"], "1.2");
    assert_eq!(data["component_versions"].as_array().unwrap().len(), 2);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_missing_config_dir_fails() {
    let dir = TempDir::new().unwrap();

    relnotes_cmd()
        .current_dir(dir.path())
        .args(["generate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_missing_input_file_fails() {
    let dir = TempDir::new().unwrap();
    setup_fixture(&dir);
    fs::remove_file(dir.path().join("export.csv")).unwrap();

    relnotes_cmd()
        .current_dir(dir.path())
        .args(["generate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open CSV file"));
}

#[test]
fn test_unconfigured_input_fails() {
    let dir = TempDir::new().unwrap();
    let config_dir = setup_fixture(&dir);
    fs::write(config_dir.join("config.json"), "{}").unwrap();

    relnotes_cmd()
        .current_dir(dir.path())
        .args(["generate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No input file"));
}
