use clap::CommandFactory;
use clap_complete::aot::{generate, Shell};
use std::io::BufWriter;

fn completions_for(shell: Shell) -> String {
    let mut buf = BufWriter::new(Vec::new());
    generate(shell, &mut fednode::cli::Cli::command(), "fednode", &mut buf);
    String::from_utf8(buf.into_inner().unwrap()).unwrap()
}

#[test]
fn completions_bash_generates_output() {
    let output = completions_for(Shell::Bash);
    assert!(!output.is_empty(), "bash completions should not be empty");
    assert!(output.contains("fednode"));
    assert!(output.contains("docker_clean"));
}

#[test]
fn completions_zsh_generates_output() {
    let output = completions_for(Shell::Zsh);
    assert!(!output.is_empty(), "zsh completions should not be empty");
    assert!(output.contains("fednode"));
}

#[test]
fn completions_subcommand_prints_script() {
    let project = crate::common::TestProject::new();
    project
        .cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicates::str::contains("fednode"));
}
