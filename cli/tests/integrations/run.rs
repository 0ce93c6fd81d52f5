use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const BLOCKS: &str = r#"
# blocks world
fact: (isa cube block)
fact: (isa pyramid block)
fact: (size cube big)
rule: ((isa ?x block)) -> (movable ?x)
rule: ((isa ?x block) (size ?x big)) -> (heavy ?x)
"#;

fn workspace(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (name, content) in files {
        fs::write(temp_dir.path().join(name), content).unwrap();
    }
    temp_dir
}

#[test]
fn test_cli_run_answers_query() {
    let temp_dir = workspace(&[("blocks.kb", BLOCKS)]);

    let mut cmd = Command::cargo_bin("chainer").unwrap();
    cmd.arg("run")
        .arg("(movable ?x)")
        .arg("--dir")
        .arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("?x"))
        .stdout(predicate::str::contains("(movable cube)"))
        .stdout(predicate::str::contains("(movable pyramid)"));
}

#[test]
fn test_cli_run_with_retraction() {
    let temp_dir = workspace(&[("blocks.kb", BLOCKS)]);

    let mut cmd = Command::cargo_bin("chainer").unwrap();
    cmd.arg("run")
        .arg("(heavy ?x)")
        .arg("--retract")
        .arg("(size cube big)")
        .arg("--dir")
        .arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("removed 2 fact(s)"))
        .stdout(predicate::str::contains("(heavy cube)"))
        .stdout(predicate::str::contains("no\n"));
}

#[test]
fn test_cli_run_json_output() {
    let temp_dir = workspace(&[("blocks.kb", BLOCKS)]);

    let output = Command::cargo_bin("chainer")
        .unwrap()
        .arg("run")
        .arg("(heavy ?x)")
        .arg("--json")
        .arg("--dir")
        .arg(temp_dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["queries"][0]["query"], "fact: (heavy ?x)");
    assert_eq!(
        value["queries"][0]["answers"][0]["bindings"][0]["value"]["name"],
        "cube"
    );
    assert_eq!(value["retractions"], serde_json::json!([]));
}

#[test]
fn test_cli_loads_every_kb_file() {
    let temp_dir = workspace(&[
        ("facts.kb", "fact: (parent tom bob)\nfact: (parent bob ann)\n"),
        (
            "rules.kb",
            "rule: ((parent ?x ?y) (parent ?y ?z)) -> (grandparent ?x ?z)\n",
        ),
        ("notes.txt", "fact: (parent ann joe)\n"),
    ]);

    let mut cmd = Command::cargo_bin("chainer").unwrap();
    cmd.arg("run")
        .arg("(grandparent ?x ?y)")
        .arg("--dir")
        .arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(grandparent tom ann)"))
        .stdout(predicate::str::contains("joe").not());
}

#[test]
fn test_cli_run_without_query() {
    let temp_dir = workspace(&[("blocks.kb", BLOCKS)]);

    let mut cmd = Command::cargo_bin("chainer").unwrap();
    cmd.arg("run").arg("--dir").arg(temp_dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No query specified"));
}

#[test]
fn test_cli_reports_parse_errors() {
    let temp_dir = workspace(&[("broken.kb", "fact: (isa cube block)\nfact: (isa cube\n")]);

    let mut cmd = Command::cargo_bin("chainer").unwrap();
    cmd.arg("run")
        .arg("(isa ?x ?y)")
        .arg("--dir")
        .arg(temp_dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"))
        .stderr(predicate::str::contains("broken.kb"));
}

#[test]
fn test_cli_show_lists_justifications() {
    let temp_dir = workspace(&[("blocks.kb", BLOCKS)]);

    let mut cmd = Command::cargo_bin("chainer").unwrap();
    cmd.arg("show").arg("--dir").arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("fact: (heavy cube)"))
        .stdout(predicate::str::contains(
            "(isa cube block) + ((isa ?x block)) -> (movable ?x)",
        ));
}

#[test]
fn test_cli_show_json() {
    let temp_dir = workspace(&[("blocks.kb", BLOCKS)]);

    let output = Command::cargo_bin("chainer")
        .unwrap()
        .arg("show")
        .arg("--json")
        .arg("--dir")
        .arg(temp_dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["facts"].as_array().unwrap().len(), 6);
    assert_eq!(value["rules"].as_array().unwrap().len(), 4);
}

#[test]
fn test_cli_list_summary() {
    let temp_dir = workspace(&[("blocks.kb", BLOCKS)]);

    let mut cmd = Command::cargo_bin("chainer").unwrap();
    cmd.arg("list").arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Workspace contains 1 files"))
        .stdout(predicate::str::contains("facts: 6 (3 asserted, 3 derived)"));
}

#[test]
fn test_cli_check_consistent() {
    let temp_dir = workspace(&[("blocks.kb", BLOCKS)]);

    let mut cmd = Command::cargo_bin("chainer").unwrap();
    cmd.arg("check").arg("--dir").arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Knowledge base is consistent"));
}
