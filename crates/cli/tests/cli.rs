//! Black-box tests for the cinegraph binary.
//!
//! These only exercise argument handling: a bad invocation must fail in the
//! argument parser, before any store or network access happens.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn ask_without_a_question_fails_with_usage() {
    Command::cargo_bin("cinegraph")
        .unwrap()
        .arg("ask")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn no_subcommand_fails_with_usage() {
    Command::cargo_bin("cinegraph")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unknown_subcommand_fails() {
    Command::cargo_bin("cinegraph")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure();
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("cinegraph")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("load"))
        .stdout(predicate::str::contains("index"))
        .stdout(predicate::str::contains("stats"));
}
