use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::model::{Branch, Profile};
use crate::error::FednodeError;

#[derive(Debug, Parser)]
#[command(
    name = "fednode",
    version,
    about = "Manage a Counterparty federated node deployment"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Deployment root (defaults to the directory holding this executable)
    #[arg(long, env = "FEDNODE_ROOT", global = true)]
    pub root: Option<PathBuf>,

    /// Run git operations as this user
    #[arg(long, env = "FEDNODE_AS_USER", global = true)]
    pub as_user: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clone sources, save the configuration and bring the deployment up
    Install {
        /// Service profile to deploy: base, counterblock or full
        #[arg(value_parser = parse_profile)]
        profile: Profile,
        /// Source branch to check out: master or develop
        #[arg(value_parser = parse_branch)]
        branch: Branch,
        /// Clone over SSH instead of HTTPS
        #[arg(long)]
        use_ssh_uris: bool,
    },
    /// Bring the deployment down and remove the saved configuration
    Uninstall,
    /// Start services (all if none given)
    Start { services: Vec<String> },
    /// Stop services (all if none given)
    Stop { services: Vec<String> },
    /// Restart services (all if none given)
    Restart { services: Vec<String> },
    /// Re-run a service with its reparse directive
    Reparse { service: String },
    /// Show container status
    Ps,
    /// Follow logs, starting from the last 50 lines
    Tail { services: Vec<String> },
    /// Print logs
    Logs { services: Vec<String> },
    /// Run a command in a service container
    Exec {
        service: String,
        /// Command to run through `bash -c`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Open a shell in a service container
    Shell { service: String },
    /// Pull source updates and restart the affected services
    Update {
        /// Skip restarting services after pulling
        #[arg(long)]
        no_restart: bool,
        /// Services to update (all available if none given)
        services: Vec<String>,
    },
    /// Refetch images and recreate services
    Rebuild { services: Vec<String> },
    /// Remove every container and image on this docker host
    #[command(name = "docker_clean")]
    DockerClean {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Check that docker, docker compose and git are installed
    Doctor,
    /// Show the installed configuration
    Status,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::aot::Shell,
    },
}

fn parse_profile(name: &str) -> Result<Profile, FednodeError> {
    name.parse()
}

fn parse_branch(name: &str) -> Result<Branch, FednodeError> {
    name.parse()
}
