//! End-to-end tests for the `graph-kit` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn graph_kit() -> Command {
    let mut cmd = Command::cargo_bin("graph-kit").expect("binary should build");
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn project_with_greeter() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let graphs = dir.path().join(".graph-kit/graphs");
    fs::create_dir_all(&graphs).expect("Failed to create graphs dir");
    fs::write(
        graphs.join("greeter.yaml"),
        r#"name: greeter
description: Ask twice, then say goodbye
entry: human
finish: end
steps:
  - name: human
    behavior: oblobbles.human
  - name: end
    behavior: oblobbles.end
edges:
  human: end
"#,
    )
    .expect("Failed to write graph file");
    dir
}

#[test]
fn test_graphs_lists_builtins() {
    let dir = tempfile::tempdir().unwrap();

    graph_kit()
        .args(["graphs", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("millibelle"))
        .stdout(predicate::str::contains("oblobbles"));
}

#[test]
fn test_graphs_lists_configured() {
    let project = project_with_greeter();

    graph_kit()
        .args(["graphs", "--root"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configured graphs"))
        .stdout(predicate::str::contains("Ask twice, then say goodbye"));
}

#[test]
fn test_run_oblobbles_answers_every_prompt() {
    let dir = tempfile::tempdir().unwrap();

    graph_kit()
        .args(["run", "oblobbles", "--root"])
        .arg(dir.path())
        .write_stdin("one\ntwo\nthree\nfour\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello from sample_tool_1"))
        .stdout(predicate::str::contains("Hello Oblobbles!"))
        .stdout(predicate::str::contains("Hello again Human!"))
        .stdout(predicate::str::contains("[human] three"))
        .stdout(predicate::str::contains("End!"));
}

#[test]
fn test_run_fails_when_input_closes_early() {
    let dir = tempfile::tempdir().unwrap();

    graph_kit()
        .args(["run", "oblobbles", "--root"])
        .arg(dir.path())
        .write_stdin("only one\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input closed"));
}

#[test]
fn test_run_millibelle_completes_without_input() {
    let dir = tempfile::tempdir().unwrap();

    graph_kit()
        .args(["run", "millibelle", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated random number:"));
}

#[test]
fn test_run_configured_graph_with_events() {
    let project = project_with_greeter();

    graph_kit()
        .args(["run", "greeter", "--events", "--root"])
        .arg(project.path())
        .write_stdin("hi\nbye\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("End!"))
        .stderr(predicate::str::contains("runSuspended"));
}

#[test]
fn test_run_unknown_graph() {
    let dir = tempfile::tempdir().unwrap();

    graph_kit()
        .args(["run", "nope", "--root"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown graph 'nope'"));
}
