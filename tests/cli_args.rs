//! Integration tests for CLI argument handling
//!
//! Only paths that exit before any network request are exercised here.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_livesports"))
        .args(args)
        .output()
        .expect("Failed to execute livesports")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("livesports"), "Help should mention livesports");
    assert!(stdout.contains("--format"), "Help should mention --format");
    assert!(stdout.contains("--filter"), "Help should mention --filter");
    assert!(stdout.contains("--watch"), "Help should mention --watch");
}

#[test]
fn test_version_flag_exits_successfully() {
    let output = run_cli(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_invalid_format_prints_error_and_exits() {
    let output = run_cli(&["--format", "yaml"]);
    assert!(!output.status.success(), "Expected invalid format to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid format") && stderr.contains("yaml"),
        "Should print error message about invalid format: {}",
        stderr
    );
}

#[test]
fn test_unknown_flag_is_rejected() {
    let output = run_cli(&["--no-such-flag"]);
    assert!(!output.status.success());
}

#[test]
fn test_filter_with_help_is_valid() {
    // With --help, it should succeed regardless of other flags
    let output = run_cli(&["--filter", "bask", "--format", "xml", "--help"]);
    assert!(output.status.success());
}
