use std::io::{BufRead, Write};

use anyhow::{bail, Result};
use is_terminal::IsTerminal;
use tracing::{info, warn};

use crate::docker::DockerBackend;

/// What a clean removed, and what it could not.
#[derive(Debug, Default, PartialEq)]
pub struct CleanReport {
    pub containers: usize,
    pub images: usize,
    pub failed: Vec<String>,
}

/// Remove every container and image on the docker host.
///
/// Runs outside the installed-state machine. `yes` skips the prompt; without
/// it the operator must confirm on an interactive terminal.
pub async fn run<D: DockerBackend>(docker: &D, yes: bool) -> Result<()> {
    if !yes {
        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            bail!("docker_clean removes ALL containers and images on this host; pass --yes to confirm");
        }
        if !confirm(stdin.lock(), std::io::stderr())? {
            println!("Aborted.");
            return Ok(());
        }
    }

    let report = clean(docker).await?;
    println!(
        "Removed {} container(s) and {} image(s).",
        report.containers, report.images
    );
    if !report.failed.is_empty() {
        println!("Could not remove: {}", report.failed.join(", "));
    }
    Ok(())
}

fn confirm(mut input: impl BufRead, mut prompt: impl Write) -> Result<bool> {
    write!(
        prompt,
        "Remove ALL docker containers and images on this host? [y/N] "
    )?;
    prompt.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Containers go first so their images are no longer referenced. A failed
/// removal is reported and the rest continue.
pub async fn clean<D: DockerBackend>(docker: &D) -> Result<CleanReport> {
    let containers = docker.list_containers().await?;
    let images = docker.list_images().await?;
    let mut report = CleanReport::default();

    for id in &containers {
        info!("Removing container {} ...", id);
        match docker.remove_container(id).await {
            Ok(()) => report.containers += 1,
            Err(e) => {
                warn!(container = %id, error = %e, "removal failed");
                report.failed.push(id.clone());
            }
        }
    }
    for id in &images {
        info!("Removing image {} ...", id);
        match docker.remove_image(id).await {
            Ok(()) => report.images += 1,
            Err(e) => {
                warn!(image = %id, error = %e, "removal failed");
                report.failed.push(id.clone());
            }
        }
    }

    Ok(report)
}
