use std::fs;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;

fn eqc_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("eqc");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Check that "eqc --version" works correctly
#[test]
fn version_command() {
    let assert = eqc_cmd().arg("--version").assert();
    assert.success().stdout("eqc 0.1.0\n");
}

/// Check that "eqc check" works correctly
#[test]
fn check_command() {
    let assert = eqc_cmd().args(["check", "../test/suites/success/001-add.eqc"]).assert();
    assert.success().stdout("../test/suites/success/001-add.eqc compiled successfully!\n");
}

/// Check that "eqc check" fails with a diagnostic for a non-exhaustive definition
#[test]
fn check_command_fails() {
    let output = eqc_cmd()
        .args(["check", "../test/suites/fail/001-non-exhaustive.eqc"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("E-001"), "{stderr}");
}

/// Check that warnings are reported without failing the command
#[test]
fn check_command_warns() {
    let output =
        eqc_cmd().args(["check", "../test/suites/success/002-overlap.eqc"]).output().unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("W-001"), "{stderr}");
}

/// Check that "eqc norm" works correctly
#[test]
fn norm_command() {
    let assert =
        eqc_cmd().args(["norm", "../test/suites/success/001-add.eqc", "add(1, 2)"]).assert();
    assert.success().stdout("succ(succ(succ(zero)))\n");
}

/// Check that "eqc compile" prints case trees and kernel terms
#[test]
fn compile_command() {
    let file = "../test/suites/success/003-vec.eqc";
    let tree = eqc_cmd().args(["compile", file, "--tree", "--def", "head"]).output().unwrap();
    assert!(tree.status.success());
    let tree = String::from_utf8(tree.stdout).unwrap();
    assert!(tree.starts_with("def head(A, n, v)"), "{tree}");
    assert!(tree.contains("no_confusion[Nat]"), "{tree}");

    let term = eqc_cmd().args(["compile", file, "--def", "append"]).output().unwrap();
    assert!(term.status.success());
    let term = String::from_utf8(term.stdout).unwrap();
    assert!(term.contains("fix append[struct 1]"), "{term}");
}

/// Check that "eqc compile --output" writes to a file
#[test]
fn compile_command_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("add.txt");
    eqc_cmd()
        .args(["compile", "../test/suites/success/001-add.eqc", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout("");
    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("def add ="), "{content}");
    assert!(content.contains("def mul ="), "{content}");
}

/// Check that an unknown definition is reported
#[test]
fn compile_command_unknown_def() {
    let output = eqc_cmd()
        .args(["compile", "../test/suites/success/001-add.eqc", "--def", "sub"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("D-002"), "{stderr}");
}
