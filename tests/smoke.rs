use assert_cmd::Command;

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("ticket-triage").expect("binary exists");
    let output = cmd.arg("--help").output().unwrap();
    assert!(output.status.success());
    let help = String::from_utf8(output.stdout).unwrap();
    assert!(help.contains("run `predict [TEXT]` for a JSON prediction"));
}

#[test]
fn predict_help_mentions_default_text() {
    let mut cmd = Command::cargo_bin("ticket-triage").expect("binary exists");
    let output = cmd.args(["predict", "--help"]).output().unwrap();
    assert!(output.status.success());
    let help = String::from_utf8(output.stdout).unwrap();
    assert!(help.contains("Default ticket message for testing"));
}
