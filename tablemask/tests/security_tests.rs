//! Security tests for the command-line tool.
//!
//! These tests run the binary and verify that cell values and the hash salt
//! never reach logs, reports or error messages.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::uninlined_format_args)]

use std::path::Path;
use std::process::{Command, Output};

const SECRET_EMAIL: &str = "jane.secret@example.org";
const SECRET_NAME: &str = "Zebulon Quartermaine";
const SECRET_SALT: &str = "pepper_do_not_print_42";

fn tablemask(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tablemask"))
        .args(args)
        .env_remove("TABLEMASK_HASH_SALT")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run tablemask")
}

fn write_customers(dir: &Path) -> String {
    let path = dir.join("customers.csv");
    std::fs::write(
        &path,
        format!(
            "email,full_name,age\n{},{},30\nother@example.org,Ann Lee,41\n",
            SECRET_EMAIL, SECRET_NAME
        ),
    )
    .unwrap();
    path.to_str().unwrap().to_string()
}

fn assert_no_secrets(label: &str, text: &str) {
    for secret in [SECRET_EMAIL, SECRET_NAME, SECRET_SALT] {
        assert!(!text.contains(secret), "{} leaked {}: {}", label, secret, text);
    }
}

#[test]
fn test_analyze_never_leaks_values_or_salt() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_customers(dir.path());
    let masked = dir.path().join("masked.csv");

    let output = tablemask(&[
        "-vvv",
        "analyze",
        &input,
        "--profile-stage",
        "anonymized",
        "--hash-salt",
        SECRET_SALT,
        "--masked-output",
        masked.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "analyze failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_no_secrets("stdout", &stdout);
    assert_no_secrets("stderr", &stderr);
    assert_no_secrets("masked csv", &std::fs::read_to_string(&masked).unwrap());

    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["privacy_report"]["anonymization_applied"], true);
    assert_eq!(report["privacy_report"]["total_rows"], 2);
}

#[test]
fn test_default_analyze_report_has_no_cell_values() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_customers(dir.path());
    let report_path = dir.path().join("report.json");

    let output = tablemask(&["analyze", &input, "--output", report_path.to_str().unwrap()]);

    assert!(output.status.success(), "analyze failed: {:?}", output);
    let report = std::fs::read_to_string(&report_path).unwrap();
    assert_no_secrets("report", &report);
    assert!(!report.contains("other@example.org"));
    assert!(!report.contains("Ann Lee"));
}

#[test]
fn test_salt_from_environment_is_not_logged() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_customers(dir.path());

    let output = Command::new(env!("CARGO_BIN_EXE_tablemask"))
        .args(["-vvv", "--json-logs", "analyze", &input])
        .env("TABLEMASK_HASH_SALT", SECRET_SALT)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_no_secrets("stderr", &String::from_utf8_lossy(&output.stderr));
}

#[test]
fn test_malformed_input_fails_without_echoing_cells() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.csv");
    std::fs::write(&path, format!("email,name\n{},{},extra\n", SECRET_EMAIL, SECRET_NAME)).unwrap();

    let output = tablemask(&["analyze", path.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("row 1"), "unexpected error: {}", stderr);
    assert_no_secrets("stderr", &stderr);
}

#[test]
fn test_classify_reports_reasons() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_customers(dir.path());

    let output = tablemask(&["classify", &input]);
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows[0]["column_name"], "email");
    assert_eq!(rows[0]["is_sensitive"], true);
    assert_eq!(rows[0]["masking_method"], "email_masking");
    assert_eq!(rows[2]["column_name"], "age");
    assert_eq!(rows[2]["is_sensitive"], false);
    assert!(rows[2]["masking_method"].is_null());
}
