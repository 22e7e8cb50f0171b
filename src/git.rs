use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::config::model::Branch;
use crate::error::FednodeError;
use crate::identity::EffectiveIdentity;
use crate::platform;

/// The version-control backend.
#[allow(async_fn_in_trait)]
pub trait GitBackend {
    /// `git clone -b <branch> <url> <dest>`
    async fn clone_repo(&self, url: &str, branch: Branch, dest: &Path) -> Result<(), FednodeError>;

    /// Current branch of `checkout`, or `None` when HEAD is detached.
    async fn current_branch(&self, checkout: &Path) -> Result<Option<String>, FednodeError>;

    /// `git pull origin <branch>` inside `checkout`.
    async fn pull(&self, checkout: &Path, branch: &str) -> Result<(), FednodeError>;
}

/// Runs the `git` binary, optionally as another user.
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    identity: EffectiveIdentity,
}

impl GitCli {
    pub fn new(identity: EffectiveIdentity) -> Self {
        Self { identity }
    }

    fn command(&self, git_args: &[&str], cwd: Option<&Path>) -> (Command, String, Vec<String>) {
        let (program, mut args) = self.identity.wrap("git");
        args.extend(git_args.iter().map(|a| a.to_string()));
        let mut cmd = Command::new(&program);
        cmd.args(&args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        debug!(program = %program, args = ?args, cwd = ?cwd, "git");
        (cmd, program, args)
    }
}

impl GitBackend for GitCli {
    async fn clone_repo(&self, url: &str, branch: Branch, dest: &Path) -> Result<(), FednodeError> {
        let dest = dest.to_string_lossy();
        let (cmd, program, args) =
            self.command(&["clone", "-b", branch.as_str(), url, dest.as_ref()], None);
        platform::run_status(cmd, &program, args).await
    }

    async fn current_branch(&self, checkout: &Path) -> Result<Option<String>, FednodeError> {
        let (mut cmd, program, args) =
            self.command(&["symbolic-ref", "--short", "-q", "HEAD"], Some(checkout));
        let output = cmd
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| FednodeError::BackendLaunch {
                program: program.clone(),
                source,
            })?;
        match output.status.code() {
            Some(0) => {
                let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
                Ok((!branch.is_empty()).then_some(branch))
            }
            // `-q` exits 1 silently when HEAD is not a symbolic ref
            Some(1) => Ok(None),
            code => Err(FednodeError::BackendFailed {
                program,
                args,
                code,
            }),
        }
    }

    async fn pull(&self, checkout: &Path, branch: &str) -> Result<(), FednodeError> {
        let (cmd, program, args) = self.command(&["pull", "origin", branch], Some(checkout));
        platform::run_status(cmd, &program, args).await
    }
}
