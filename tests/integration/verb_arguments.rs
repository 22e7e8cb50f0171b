use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn install_rejects_unknown_profile_and_branch() {
    let project = TestProject::new();

    project
        .cmd()
        .args(["install", "extended", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("extended"));

    project
        .cmd()
        .args(["install", "base", "main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("main"));

    assert!(!project.record_path().exists());
    assert!(!project.root().join("src").exists());
}

#[test]
fn unknown_verb_is_rejected() {
    TestProject::new()
        .cmd()
        .arg("frobnicate")
        .assert()
        .failure();
}

#[test]
fn exec_needs_a_command() {
    TestProject::installed("base", "master")
        .cmd()
        .args(["exec", "counterparty"])
        .assert()
        .failure();
}

#[test]
fn install_suggests_the_closest_profile() {
    TestProject::new()
        .cmd()
        .args(["install", "ful", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("did you mean `full`"));
}
