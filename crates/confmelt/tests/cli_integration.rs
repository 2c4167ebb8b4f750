/*
 * cli_integration.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for the confmelt command line.
 */

//! Integration tests for the command line.
//!
//! These tests run the built binary against a temporary configuration
//! directory and check both its output and the files it leaves behind.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const SERVER: &str = "\
port: 8080
hosts:
  - alpha
  - beta
";

/// Helper to create a config directory with a single `server` section.
fn config_dir() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    fs::write(temp.path().join("server.yaml"), SERVER).expect("Failed to write config");
    temp
}

fn confmelt(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_confmelt"))
        .arg("--config-dir")
        .arg(dir)
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to run confmelt")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is not UTF-8")
}

#[test]
fn test_melt_lists_leaves_in_order() {
    let temp = config_dir();
    let output = confmelt(temp.path(), &["melt"]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "server/port\t8080\tinteger\n\
         server/hosts/-LIST-: 0\talpha\tstring\n\
         server/hosts/-LIST-: 1\tbeta\tstring\n"
    );
}

#[test]
fn test_set_keeps_type_and_saves() {
    let temp = config_dir();
    let output = confmelt(temp.path(), &["set", "--value", "9090", "server", "port"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "server/port = 9090 (integer)\n");

    let saved = fs::read_to_string(temp.path().join("server.yaml")).unwrap();
    assert!(saved.starts_with("port: 9090\n"));
}

#[test]
fn test_set_rejects_bad_input_without_writing() {
    let temp = config_dir();
    let output = confmelt(temp.path(), &["set", "--value", "12x", "server", "port"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Value must be integer number."));
    assert_eq!(fs::read_to_string(temp.path().join("server.yaml")).unwrap(), SERVER);
}

#[test]
fn test_delete_renumbers_sequence() {
    let temp = config_dir();
    let output = confmelt(temp.path(), &["delete", "server", "hosts", "-LIST-: 0"]);
    assert!(output.status.success());

    let output = confmelt(temp.path(), &["get", "server", "hosts", "-LIST-: 0"]);
    assert_eq!(stdout(&output), "beta\n");
}

#[test]
fn test_get_sub_tree_prints_yaml() {
    let temp = config_dir();
    let output = confmelt(temp.path(), &["get", "server", "hosts"]);
    assert_eq!(stdout(&output), "- alpha\n- beta\n");
}

#[test]
fn test_reset_without_default_fails() {
    let temp = config_dir();
    let output = confmelt(temp.path(), &["reset"]);
    assert!(!output.status.success());
}

#[test]
fn test_delete_section_removes_its_file() {
    let temp = config_dir();
    fs::write(temp.path().join("logging.yaml"), "level: info\n").unwrap();

    let output = confmelt(temp.path(), &["delete", "logging"]);
    assert!(output.status.success());
    assert!(!temp.path().join("logging.yaml").exists());

    let output = confmelt(temp.path(), &["melt"]);
    assert!(!stdout(&output).contains("logging"));
}

#[test]
fn test_set_null_leaf_requires_type() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("x.yaml"), "a: ~\n").unwrap();

    let output = confmelt(temp.path(), &["set", "--value", "5", "x", "a"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("pass --type"));
    assert_eq!(fs::read_to_string(temp.path().join("x.yaml")).unwrap(), "a: ~\n");

    let output = confmelt(temp.path(), &["set", "--type", "integer", "--value", "5", "x", "a"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "x/a = 5 (integer)\n");
    assert_eq!(stdout(&confmelt(temp.path(), &["get", "x", "a"])), "5\n");
}
