use serde::Deserialize;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

use crate::config::model::{Branch, PROJECT_NAME};
use crate::error::FednodeError;
use crate::platform;

/// Everything a compose invocation needs besides the subcommand itself.
///
/// `branch` and `hostname` are exported to the compose child process only
/// (as `FEDNODE_RELEASE_TAG` and `HOSTNAME_BASE`) for descriptor variable
/// substitution.
#[derive(Debug, Clone)]
pub struct ComposeContext {
    pub descriptor: PathBuf,
    pub project: String,
    pub branch: Branch,
    pub hostname: String,
}

impl ComposeContext {
    pub fn new(descriptor: PathBuf, branch: Branch, hostname: String) -> Self {
        Self {
            descriptor,
            project: PROJECT_NAME.to_string(),
            branch,
            hostname,
        }
    }

    /// Name of the first container compose creates for `service`.
    pub fn container_name(&self, service: &str) -> String {
        format!("{}_{}_1", self.project, service)
    }

    fn env(&self) -> [(&'static str, String); 2] {
        [
            ("FEDNODE_RELEASE_TAG", self.branch.to_string()),
            ("HOSTNAME_BASE", self.hostname.clone()),
        ]
    }
}

/// A compose subcommand with its options, rendered to argv by [`ComposeCommand::to_args`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeCommand {
    Pull {
        ignore_failures: bool,
        services: Vec<String>,
    },
    Up {
        recreate: bool,
        services: Vec<String>,
    },
    Down,
    Start(Vec<String>),
    Stop(Vec<String>),
    Restart(Vec<String>),
    Logs {
        follow: bool,
        tail: Option<u32>,
        services: Vec<String>,
    },
    Run {
        service: String,
        no_deps: bool,
        rm: bool,
        entrypoint: Option<String>,
        env: Vec<(String, String)>,
        args: Vec<String>,
    },
}

impl ComposeCommand {
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        match self {
            ComposeCommand::Pull {
                ignore_failures,
                services,
            } => {
                args.push("pull".into());
                if *ignore_failures {
                    args.push("--ignore-pull-failures".into());
                }
                args.extend(services.iter().cloned());
            }
            ComposeCommand::Up { recreate, services } => {
                args.extend(["up".into(), "-d".into()]);
                if *recreate {
                    args.extend([
                        "--build".into(),
                        "--force-recreate".into(),
                        "--no-deps".into(),
                    ]);
                }
                args.extend(services.iter().cloned());
            }
            ComposeCommand::Down => args.push("down".into()),
            ComposeCommand::Start(services) => {
                args.push("start".into());
                args.extend(services.iter().cloned());
            }
            ComposeCommand::Stop(services) => {
                args.push("stop".into());
                args.extend(services.iter().cloned());
            }
            ComposeCommand::Restart(services) => {
                args.push("restart".into());
                args.extend(services.iter().cloned());
            }
            ComposeCommand::Logs {
                follow,
                tail,
                services,
            } => {
                args.push("logs".into());
                if *follow {
                    args.push("-f".into());
                }
                if let Some(n) = tail {
                    args.push(format!("--tail={}", n));
                }
                args.extend(services.iter().cloned());
            }
            ComposeCommand::Run {
                service,
                no_deps,
                rm,
                entrypoint,
                env,
                args: extra,
            } => {
                args.push("run".into());
                if *rm {
                    args.push("--rm".into());
                }
                if *no_deps {
                    args.push("--no-deps".into());
                }
                if let Some(ep) = entrypoint {
                    args.extend(["--entrypoint".into(), ep.clone()]);
                }
                for (key, value) in env {
                    args.extend(["-e".into(), format!("{}={}", key, value)]);
                }
                args.push(service.clone());
                args.extend(extra.iter().cloned());
            }
        }
        args
    }
}

/// Represents a service reported by `docker compose ps --format json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ComposeService {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Service")]
    pub service: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(default, rename = "Health")]
    pub health: String,
    #[serde(default, rename = "Publishers")]
    pub publishers: Vec<ComposePublisher>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComposePublisher {
    #[serde(rename = "TargetPort")]
    pub target_port: u16,
    #[serde(rename = "PublishedPort")]
    pub published_port: u16,
}

/// The container-orchestration backend.
#[allow(async_fn_in_trait)]
pub trait ComposeBackend {
    /// Run a compose subcommand with the terminal attached.
    async fn invoke(&self, ctx: &ComposeContext, command: &ComposeCommand) -> Result<(), FednodeError>;

    /// Run a compose subcommand with the terminal attached and hand back its
    /// exit code instead of failing on a non-zero one.
    async fn run_attached(&self, ctx: &ComposeContext, command: &ComposeCommand) -> Result<i32, FednodeError>;

    /// Query the running services of the project.
    async fn services(&self, ctx: &ComposeContext) -> Result<Vec<ComposeService>, FednodeError>;
}

/// Drives `docker compose` (in compatibility mode, so containers are named
/// `<project>_<service>_1`).
#[derive(Debug, Clone, Default)]
pub struct DockerCompose;

impl DockerCompose {
    fn command(&self, ctx: &ComposeContext, sub: &[String]) -> (Command, Vec<String>) {
        let mut args = vec![
            "compose".to_string(),
            "--compatibility".to_string(),
            "-f".to_string(),
            ctx.descriptor.to_string_lossy().into_owned(),
            "-p".to_string(),
            ctx.project.clone(),
        ];
        args.extend(sub.iter().cloned());

        let mut cmd = Command::new("docker");
        cmd.args(&args);
        for (key, value) in ctx.env() {
            cmd.env(key, value);
        }
        (cmd, args)
    }
}

impl ComposeBackend for DockerCompose {
    async fn invoke(&self, ctx: &ComposeContext, command: &ComposeCommand) -> Result<(), FednodeError> {
        let (cmd, args) = self.command(ctx, &command.to_args());
        debug!(args = ?args, "docker");
        platform::run_status(cmd, "docker", args).await
    }

    async fn run_attached(&self, ctx: &ComposeContext, command: &ComposeCommand) -> Result<i32, FednodeError> {
        let (cmd, args) = self.command(ctx, &command.to_args());
        debug!(args = ?args, "docker");
        platform::run_exit_code(cmd, "docker").await
    }

    async fn services(&self, ctx: &ComposeContext) -> Result<Vec<ComposeService>, FednodeError> {
        let sub = ["ps".to_string(), "--format".to_string(), "json".to_string()];
        let (cmd, args) = self.command(ctx, &sub);
        debug!(args = ?args, "docker");
        let stdout = platform::run_output(cmd, "docker", args).await?;
        parse_ps_output(&stdout)
    }
}

/// Parse `docker compose ps --format json`, which is either a JSON array or
/// one JSON object per line depending on the compose version.
pub fn parse_ps_output(stdout: &str) -> Result<Vec<ComposeService>, FednodeError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if let Ok(services) = serde_json::from_str::<Vec<ComposeService>>(trimmed) {
        return Ok(services);
    }

    let mut services = Vec::new();
    for line in trimmed.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let svc: ComposeService = serde_json::from_str(line).map_err(|e| {
            FednodeError::io("parsing docker compose ps output", std::io::Error::other(e))
        })?;
        services.push(svc);
    }

    Ok(services)
}
