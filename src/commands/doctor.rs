use anyhow::Result;
use std::process::Command;

/// Tools fednode drives, with the argv used to probe each one.
const CHECKS: [(&str, &str, &[&str]); 3] = [
    ("docker", "docker", &["--version"]),
    ("docker compose", "docker", &["compose", "version"]),
    ("git", "git", &["--version"]),
];

pub fn run() -> Result<()> {
    println!("fednode doctor");
    println!("==============");
    println!();

    let mut all_ok = true;

    for (name, bin, args) in CHECKS {
        match probe(bin, args) {
            Some(version) => println!("  [ok] {:<16} {}", name, version),
            None => {
                println!("  [!!] {:<16} not found", name);
                all_ok = false;
            }
        }
    }

    println!();
    if all_ok {
        println!("All dependencies found.");
    } else {
        println!("Some dependencies are missing. Install them before running `fednode install`.");
    }

    Ok(())
}

/// First line of the tool's version output, or `None` if it cannot run.
fn probe(bin: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(bin).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    // Some tools print their version to stderr
    let text = if output.stdout.is_empty() {
        String::from_utf8_lossy(&output.stderr).into_owned()
    } else {
        String::from_utf8_lossy(&output.stdout).into_owned()
    };
    Some(text.lines().next().unwrap_or("").trim().to_string())
}
