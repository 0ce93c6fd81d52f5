use assert_cmd::Command;

#[test]
fn test_interactive_mode_help() {
    // The prompt needs a terminal, so only check that the command is wired up
    let mut cmd = Command::cargo_bin("chainer").unwrap();
    cmd.arg("interactive").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("--dir"));
}
