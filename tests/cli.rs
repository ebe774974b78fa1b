//! End-to-end tests for the kollect binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const PEOPLE: &str = r#"[
    {"name": "ada", "age": 36, "team": "core"},
    {"name": "bob", "age": 17, "team": "web"},
    {"name": "cy", "age": 52, "team": "core"}
]"#;

fn kollect() -> Command {
    Command::cargo_bin("kollect").unwrap()
}

fn people_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(PEOPLE.as_bytes()).unwrap();
    file
}

#[test]
fn test_sum_from_stdin() {
    kollect()
        .args(["run", "sum"])
        .write_stdin("[1, 2, 3]")
        .assert()
        .success()
        .stdout("6\n");
}

#[test]
fn test_pipeline_from_file_as_json() {
    let file = people_file();
    kollect()
        .args(["run", "filter(age >= 18) | sortByDesc(age) | pluck(name)", "--json", "--input"])
        .arg(file.path())
        .assert()
        .success()
        .stdout("[\"cy\",\"ada\"]\n");
}

#[test]
fn test_human_output_for_mapping() {
    kollect()
        .args(["run", "except(a)"])
        .write_stdin(r#"{"a": 1, "b": {"c": [true, null]}}"#)
        .assert()
        .success()
        .stdout("b:\n  c:\n    - true\n    - null\n");
}

#[test]
fn test_group_by_keeps_first_seen_order() {
    let file = people_file();
    kollect()
        .args(["run", "groupBy(team) | keys", "--json", "-i"])
        .arg(file.path())
        .assert()
        .success()
        .stdout("[\"core\",\"web\"]\n");
}

#[test]
fn test_null_input_with_times() {
    kollect()
        .args(["run", "-n", "times(3) | map(_key)", "--json"])
        .assert()
        .success()
        .stdout("[0,1,2]\n");
}

#[test]
fn test_pretty_json() {
    kollect()
        .args(["run", "all", "--json", "--pretty"])
        .write_stdin(r#"{"a": 1}"#)
        .assert()
        .success()
        .stdout("{\n  \"a\": 1\n}\n");
}

#[test]
fn test_seeded_shuffle_is_reproducible() {
    let run = || {
        kollect()
            .args(["run", "-n", "times(20) | shuffle | values", "--json", "--seed", "42"])
            .output()
            .unwrap()
    };
    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_seed_from_env() {
    let run = |seed: &str| {
        kollect()
            .args(["run", "-n", "times(20) | shuffle | values", "--json"])
            .env("KOLLECT_SEED", seed)
            .output()
            .unwrap()
    };
    assert_eq!(run("9").stdout, run("9").stdout);
}

#[test]
fn test_explain() {
    kollect()
        .args(["explain", "filter(age > 1) | sort_by(age) | pluck(name)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. filter(age > 1) - "))
        .stdout(predicate::str::contains("3. pluck(name) - "));
}

#[test]
fn test_stages_lists_table() {
    kollect()
        .arg("stages")
        .assert()
        .success()
        .stdout(predicate::str::contains("sort_by(expr, flags?)"))
        .stdout(predicate::str::contains("cross_joins(lists...)"));
}

#[test]
fn test_unknown_stage_fails() {
    kollect()
        .args(["run", "-n", "frobnicate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown stage: frobnicate"));
}

#[test]
fn test_parse_error_fails() {
    kollect()
        .args(["run", "-n", "take(1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"));
}

#[test]
fn test_invalid_json_fails() {
    kollect()
        .args(["run", "count"])
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("input is not valid JSON"));
}

#[test]
fn test_combine_length_mismatch_fails() {
    kollect()
        .args(["run", "combine([1])"])
        .write_stdin(r#"["a", "b"]"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Length mismatch: 2 keys but 1 values"));
}

#[test]
fn test_dd_stops_pipeline() {
    kollect()
        .args(["run", "dd | count", "--json"])
        .write_stdin("[1, 2]")
        .assert()
        .success()
        .stdout("[1,2]\n")
        .stderr(predicate::str::contains("Halted at stage 1"));
}

#[test]
fn test_missing_input_file_fails() {
    kollect()
        .args(["run", "count", "--input", "/definitely/not/here.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn test_for_page_far_past_the_end_is_empty() {
    kollect()
        .args(["run", "forPage(9223372036854775807, 2)", "--json"])
        .write_stdin("[1, 2, 3]")
        .assert()
        .success()
        .stdout("[]\n");
}
