use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn verbs_require_an_install() {
    let project = TestProject::new();
    for verb in [
        vec!["uninstall"],
        vec!["start"],
        vec!["stop", "counterparty"],
        vec!["restart"],
        vec!["reparse", "counterparty"],
        vec!["ps"],
        vec!["logs"],
        vec!["tail"],
        vec!["exec", "counterparty", "ls"],
        vec!["shell", "counterparty"],
        vec!["update"],
        vec!["rebuild"],
    ] {
        project
            .cmd()
            .args(&verb)
            .assert()
            .failure()
            .stderr(predicate::str::contains("fednode::not_installed"));
    }
    assert!(!project.record_path().exists());
}

#[test]
fn second_install_is_refused_without_side_effects() {
    let project = TestProject::installed("base", "master");
    let before = std::fs::read_to_string(project.record_path()).unwrap();

    project
        .cmd()
        .args(["install", "full", "develop"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fednode::already_installed"));

    assert!(!project.root().join("src").exists());
    assert_eq!(std::fs::read_to_string(project.record_path()).unwrap(), before);
}

#[test]
fn unreadable_record_is_an_error() {
    let project = TestProject::new();
    project.write_record("[Default]\nconfig = \"tiny\"\n");

    project
        .cmd()
        .arg("ps")
        .assert()
        .failure()
        .stderr(predicate::str::contains("fednode::bad_record"));
}

#[test]
fn update_validates_services_before_touching_git() {
    let project = TestProject::installed("base", "master");

    project
        .cmd()
        .args(["update", "counterparty", "bitcoind"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fednode::unknown_service"));

    project
        .cmd()
        .args(["update", "counterwallet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fednode::service_not_in_profile"));
}

#[test]
fn reparse_rejects_ineligible_services() {
    let project = TestProject::installed("full", "master");

    project
        .cmd()
        .args(["reparse", "armory-utxsvr"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fednode::not_reparsable"));
}
