use assert_cmd::Command;

#[test]
fn test_server_command_is_listed() {
    let mut cmd = Command::cargo_bin("chainer").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("server"));
}

#[test]
fn test_server_help_lists_routes() {
    let mut cmd = Command::cargo_bin("chainer").unwrap();
    cmd.arg("server").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("POST /retract"));
}
