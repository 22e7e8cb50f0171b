use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn refuses_without_explicit_intent() {
    let project = TestProject::new();
    project
        .cmd()
        .arg("docker_clean")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn runs_outside_the_state_machine() {
    // no record exists, yet the refusal is about confirmation, not install state
    let project = TestProject::new();
    project
        .cmd()
        .arg("docker_clean")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not_installed").not());
}
