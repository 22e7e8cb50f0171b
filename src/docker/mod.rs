use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::FednodeError;
use crate::platform;

/// Direct access to the docker engine, outside of any compose project.
#[allow(async_fn_in_trait)]
pub trait DockerBackend {
    /// Whether a container with this name exists and is running.
    async fn is_running(&self, container: &str) -> Result<bool, FednodeError>;

    /// Run `argv` inside a running container with the terminal attached,
    /// returning the command's exit code.
    async fn exec(&self, container: &str, argv: &[String], tty: bool) -> Result<i32, FednodeError>;

    /// IDs of every container on the host, running or not.
    async fn list_containers(&self) -> Result<Vec<String>, FednodeError>;

    /// IDs of every image on the host.
    async fn list_images(&self) -> Result<Vec<String>, FednodeError>;

    async fn remove_container(&self, id: &str) -> Result<(), FednodeError>;

    async fn remove_image(&self, id: &str) -> Result<(), FednodeError>;
}

#[derive(Debug, Clone, Default)]
pub struct DockerCli;

fn docker(args: &[&str]) -> (Command, Vec<String>) {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    let mut cmd = Command::new("docker");
    cmd.args(&args);
    debug!(args = ?args, "docker");
    (cmd, args)
}

/// Split `docker ... -q` output into IDs, dropping blanks and repeats.
pub fn parse_ids(stdout: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

/// Argv for `docker exec`.
pub fn exec_args(container: &str, argv: &[String], tty: bool) -> Vec<String> {
    let mut args = vec!["exec".to_string(), "-i".to_string()];
    if tty {
        args.push("-t".to_string());
    }
    args.push(container.to_string());
    args.extend(argv.iter().cloned());
    args
}

impl DockerBackend for DockerCli {
    async fn is_running(&self, container: &str) -> Result<bool, FednodeError> {
        let (mut cmd, _) = docker(&["inspect", "-f", "{{.State.Running}}", container]);
        let output = cmd
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|source| FednodeError::BackendLaunch {
                program: "docker".to_string(),
                source,
            })?;
        // inspect fails when the container does not exist
        Ok(output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true")
    }

    async fn exec(&self, container: &str, argv: &[String], tty: bool) -> Result<i32, FednodeError> {
        let args = exec_args(container, argv, tty);
        debug!(args = ?args, "docker");
        let mut cmd = Command::new("docker");
        cmd.args(&args);
        platform::run_exit_code(cmd, "docker").await
    }

    async fn list_containers(&self) -> Result<Vec<String>, FednodeError> {
        let (cmd, args) = docker(&["ps", "-a", "-q"]);
        Ok(parse_ids(&platform::run_output(cmd, "docker", args).await?))
    }

    async fn list_images(&self) -> Result<Vec<String>, FednodeError> {
        let (cmd, args) = docker(&["images", "-q"]);
        Ok(parse_ids(&platform::run_output(cmd, "docker", args).await?))
    }

    async fn remove_container(&self, id: &str) -> Result<(), FednodeError> {
        let (cmd, args) = docker(&["rm", id]);
        platform::run_status(cmd, "docker", args).await
    }

    async fn remove_image(&self, id: &str) -> Result<(), FednodeError> {
        let (cmd, args) = docker(&["rmi", id]);
        platform::run_status(cmd, "docker", args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_trimmed_and_deduplicated() {
        let ids = parse_ids("abc123\n\ndef456\nabc123\n  \n");
        assert_eq!(ids, vec!["abc123", "def456"]);
    }

    #[test]
    fn exec_argv_keeps_command_as_one_element() {
        let argv = vec!["bash".to_string(), "-c".to_string(), "ls -la | head".to_string()];
        assert_eq!(
            exec_args("federatednode_counterparty_1", &argv, false),
            vec!["exec", "-i", "federatednode_counterparty_1", "bash", "-c", "ls -la | head"]
        );
        assert_eq!(exec_args("c", &[], true), vec!["exec", "-i", "-t", "c"]);
    }
}
