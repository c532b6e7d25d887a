//! End-to-end runs of the `flux-parse` binary

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn write_source(name: &str, source: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("flux-parse-{}-{}.fx", std::process::id(), name));
    fs::write(&path, source).expect("write test source");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_flux-parse"))
        .args(args)
        .output()
        .expect("run flux-parse")
}

#[test]
fn test_clean_file_reports_ok() {
    let path = write_source("clean", "def main() -> void { }\nint x;");
    let output = run(&[path.to_str().unwrap_or_default()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ok (2 declarations)"), "stdout: {}", stdout);
    let _ = fs::remove_file(path);
}

#[test]
fn test_errors_exit_with_failure() {
    let path = write_source("broken", "def main() -> void {\n    x = ;\n}");
    let output = run(&[path.to_str().unwrap_or_default(), "--no-color"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Expected expression"), "stderr: {}", stderr);
    let _ = fs::remove_file(path);
}

#[test]
fn test_json_and_print_output() {
    let path = write_source("json", "int x = 1;");
    let output = run(&[path.to_str().unwrap_or_default(), "--json"]);
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid JSON on stdout");
    assert!(json["program"]["declarations"].is_array());
    assert!(json["errors"]["errors"].as_array().map_or(false, Vec::is_empty));

    let output = run(&[path.to_str().unwrap_or_default(), "--print"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "int x = 1;\n");
    let _ = fs::remove_file(path);
}

#[test]
fn test_usage_errors() {
    assert_eq!(run(&[]).status.code(), Some(2));
    assert_eq!(run(&["--bogus", "file.fx"]).status.code(), Some(2));
    assert_eq!(run(&["a.fx", "b.fx"]).status.code(), Some(2));
    assert_eq!(run(&["/nonexistent/input.fx"]).status.code(), Some(1));
}
