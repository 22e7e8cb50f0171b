use anyhow::Result;

use crate::compose::ComposeBackend;
use crate::docker::DockerBackend;
use crate::git::GitBackend;
use crate::orchestrator::ports::PortProbe;
use crate::orchestrator::Orchestrator;
use crate::ui::summary;

pub async fn run<C, G, D, P>(orchestrator: &Orchestrator<C, G, D, P>) -> Result<()>
where
    C: ComposeBackend,
    G: GitBackend,
    D: DockerBackend,
    P: PortProbe,
{
    let (config, services) = orchestrator.ps().await?;
    summary::print_ps(&config, &services);
    Ok(())
}
