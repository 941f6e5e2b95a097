use assert_cmd::Command;

#[test]
fn help_lists_browser_backends() {
    let assert = Command::cargo_bin("pagerunner").unwrap().arg("--help").assert();
    let output = assert.get_output().stdout.clone();
    let help = String::from_utf8(output).unwrap();
    assert!(help.contains("--browser"));
    assert!(help.contains("chrome"));
    assert!(help.contains("dockerfirefox"));
}

#[test]
fn rejects_unknown_browser() {
    Command::cargo_bin("pagerunner")
        .unwrap()
        .args(["--browser", "safari"])
        .assert()
        .failure();
}

#[test]
fn fails_cleanly_without_project_assets() {
    let root = tempfile::tempdir().unwrap();
    Command::cargo_bin("pagerunner")
        .unwrap()
        .args(["--root", root.path().to_str().unwrap()])
        .assert()
        .failure();
}
