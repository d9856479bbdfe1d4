//! Integration tests for the CLI interface
//!
//! Tests argument parsing, exit codes and the hidden worker subcommands

mod common;

use assert_cmd::Command;
use common::PipelineFixtureBuilder;
use predicates::prelude::*;

#[test]
fn test_cli_help_flag() {
    let mut cmd = Command::cargo_bin("lexan").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Count words in a corpus"))
        .stdout(predicate::str::contains("Reduce worker").not());
}

#[test]
fn test_run_help_lists_original_flags() {
    let mut cmd = Command::cargo_bin("lexan").unwrap();
    cmd.args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-l, --splitters"))
        .stdout(predicate::str::contains("-m, --builders"))
        .stdout(predicate::str::contains("-t, --top-k"))
        .stdout(predicate::str::contains("--keep-channels"));
}

#[test]
fn test_missing_subcommand_is_usage_error() {
    let mut cmd = Command::cargo_bin("lexan").unwrap();
    cmd.assert().code(1);
}

#[test]
fn test_invalid_number_is_usage_error() {
    let mut cmd = Command::cargo_bin("lexan").unwrap();
    cmd.args(["run", "-l", "many"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_missing_paths_is_config_error() {
    let fixture = PipelineFixtureBuilder::new().unwrap().build().unwrap();
    fixture
        .lexan()
        .args(["run", "-l", "2"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("E1004"));
}

#[test]
fn test_zero_builders_is_config_error() {
    let fixture = PipelineFixtureBuilder::new().unwrap().build().unwrap();
    fixture
        .run("top.txt", 2, 0, 3)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("builders must be at least 1"));
    assert!(fixture.leftover_namespaces().is_empty());
}

#[test]
fn test_broken_config_file_is_config_error() {
    let fixture = PipelineFixtureBuilder::new()
        .unwrap()
        .with_config("[pipeline\nsplitters = 2\n")
        .build()
        .unwrap();
    fixture
        .lexan()
        .arg("run")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("E1002"));
}

#[test]
fn test_explicit_config_must_exist() {
    let fixture = PipelineFixtureBuilder::new().unwrap().build().unwrap();
    fixture
        .lexan()
        .args(["run", "--config", "absent.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("E1001"));
}

#[test]
fn test_splitter_without_exclusion_fails_silently_on_stdout() {
    let fixture = PipelineFixtureBuilder::new().unwrap().build().unwrap();
    fixture
        .lexan()
        .args([
            "splitter",
            "--id",
            "0",
            "--input",
            "corpus.txt",
            "--exclusion",
            "absent.txt",
            "--builders",
            "1",
            "--start-line",
            "0",
            "--line-count",
            "1",
            "--max-word-len",
            "63",
            "--channel-dir",
            "channels",
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("E6001"));
}
