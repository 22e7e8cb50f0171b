use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn status_when_not_installed() {
    let project = TestProject::new();
    project
        .cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not installed."));
}

#[test]
fn status_reports_profile_and_branch() {
    let project = TestProject::installed("counterblock", "develop");
    project
        .cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("profile counterblock on branch develop"));
}

#[test]
fn root_from_environment() {
    let project = TestProject::installed("base", "master");
    let mut cmd = assert_cmd::Command::new(env!("CARGO_BIN_EXE_fednode"));
    cmd.env("FEDNODE_ROOT", project.root())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("profile base on branch master"));
}

#[test]
fn missing_root_is_an_error() {
    let project = TestProject::new();
    let missing = project.root().join("nowhere");
    let mut cmd = assert_cmd::Command::new(env!("CARGO_BIN_EXE_fednode"));
    cmd.arg("--root")
        .arg(&missing)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Deployment root not found"));
}
