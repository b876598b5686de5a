//! Integration tests for the ls8 CLI.

use ls8 as _;
use ls8_core as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use thiserror as _;

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ls8"))
}

fn program(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("programs")
        .join(name)
}

fn create_temp_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn ls8(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .output()
        .expect("failed to run ls8")
}

fn run_fixture(name: &str) -> Output {
    let path = program(name);
    ls8(&["run", path.to_str().unwrap()])
}

#[test]
fn mult_prints_72() {
    let output = run_fixture("mult.ls8");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "72\n");
    assert!(output.stderr.is_empty());
}

#[test]
fn bundled_programs_produce_expected_output() {
    let cases = [
        ("print8.ls8", "8\n"),
        ("stack.ls8", "2\n4\n1\n"),
        ("call.ls8", "20\n30\n36\n60\n"),
        ("sctest.ls8", "1\n1\n1\n"),
    ];

    for (name, expected) in cases {
        let output = run_fixture(name);
        assert!(output.status.success(), "{name} did not halt cleanly");
        assert_eq!(String::from_utf8_lossy(&output.stdout), expected, "{name}");
    }
}

#[test]
fn bare_path_runs_program() {
    let path = program("print8.ls8");
    let output = ls8(&[path.to_str().unwrap()]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "8\n");
}

#[test]
fn trace_goes_to_stderr() {
    let path = program("print8.ls8");
    let output = ls8(&["run", path.to_str().unwrap(), "--trace"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "8\n");

    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(
        lines[0],
        "TRACE: 00 | 82 00 08 | 00 00 00 00 00 00 00 F4 | LDI R0,8"
    );
    assert_eq!(lines.last().copied(), Some("TRACE: 05 | halted"));
}

#[test]
fn disasm_lists_instructions() {
    let path = program("mult.ls8");
    let output = ls8(&["disasm", path.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("00: 82 00 08"));
    assert!(lines[0].ends_with("LDI R0,8"));
    assert!(lines[2].ends_with("MUL R0,R1"));
    assert!(lines[4].ends_with("HLT"));
}

#[test]
fn missing_program_exits_with_load_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("nope.ls8");

    let output = ls8(&["run", missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("file not found"));
}

#[test]
fn malformed_program_reports_line() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = create_temp_file(
        temp_dir.path(),
        "bad.ls8",
        "10000010 # LDI R0,1\n00000000\nLDI\n",
    );

    let output = ls8(&["run", source.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 3"));
}

#[test]
fn unknown_opcode_exits_with_fault_after_earlier_output() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = create_temp_file(
        temp_dir.path(),
        "bad_op.ls8",
        "10000010\n00000000\n00000101\n01000111\n00000000\n11111111\n",
    );

    let output = ls8(&["run", source.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(3));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "5\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown opcode 0xff"));
}

#[test]
fn missing_arguments_is_a_usage_error() {
    let output = ls8(&[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage: ls8"));
}

#[test]
fn help_prints_usage() {
    let output = ls8(&["--help"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage: ls8"));
}
