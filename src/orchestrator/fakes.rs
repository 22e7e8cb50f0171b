//! Recording in-memory backends for lifecycle tests.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::compose::{ComposeBackend, ComposeCommand, ComposeContext, ComposeService};
use crate::config::model::Branch;
use crate::docker::DockerBackend;
use crate::error::FednodeError;
use crate::git::GitBackend;
use crate::orchestrator::ports::PortProbe;

fn failure(program: &str, args: Vec<String>) -> FednodeError {
    FednodeError::BackendFailed {
        program: program.to_string(),
        args,
        code: Some(1),
    }
}

#[derive(Debug, Default)]
pub struct FakeCompose {
    calls: Mutex<Vec<(PathBuf, ComposeCommand)>>,
    failing: Mutex<Vec<ComposeCommand>>,
    run_code: Mutex<i32>,
    services: Vec<ComposeService>,
}

impl FakeCompose {
    pub fn with_services(services: Vec<ComposeService>) -> Self {
        Self {
            services,
            ..Self::default()
        }
    }

    pub fn fail_on(&self, command: ComposeCommand) {
        self.failing.lock().unwrap().push(command);
    }

    /// Exit code reported by attached runs.
    pub fn set_run_code(&self, code: i32) {
        *self.run_code.lock().unwrap() = code;
    }

    pub fn commands(&self) -> Vec<ComposeCommand> {
        self.calls.lock().unwrap().iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn descriptors(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().iter().map(|(d, _)| d.clone()).collect()
    }
}

impl ComposeBackend for FakeCompose {
    async fn invoke(&self, ctx: &ComposeContext, command: &ComposeCommand) -> Result<(), FednodeError> {
        self.calls
            .lock()
            .unwrap()
            .push((ctx.descriptor.clone(), command.clone()));
        if self.failing.lock().unwrap().contains(command) {
            return Err(failure("docker", command.to_args()));
        }
        Ok(())
    }

    async fn run_attached(&self, ctx: &ComposeContext, command: &ComposeCommand) -> Result<i32, FednodeError> {
        self.invoke(ctx, command).await?;
        Ok(*self.run_code.lock().unwrap())
    }

    async fn services(&self, _ctx: &ComposeContext) -> Result<Vec<ComposeService>, FednodeError> {
        Ok(self.services.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Clone(String, Branch, PathBuf),
    CurrentBranch(PathBuf),
    Pull(PathBuf, String),
}

/// Checkouts report the branch they were cloned with (`master` by default);
/// `set_branch(path, None)` simulates a detached HEAD.
#[derive(Debug, Default)]
pub struct FakeGit {
    calls: Mutex<Vec<GitCall>>,
    branches: Mutex<HashMap<PathBuf, Option<String>>>,
}

impl FakeGit {
    pub fn set_branch(&self, checkout: &Path, branch: Option<&str>) {
        self.branches
            .lock()
            .unwrap()
            .insert(checkout.to_path_buf(), branch.map(String::from));
    }

    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clones(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                GitCall::Clone(_, _, dest) => Some(dest),
                _ => None,
            })
            .collect()
    }

    pub fn pulls(&self) -> Vec<(PathBuf, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                GitCall::Pull(dir, branch) => Some((dir, branch)),
                _ => None,
            })
            .collect()
    }
}

impl GitBackend for FakeGit {
    async fn clone_repo(&self, url: &str, branch: Branch, dest: &Path) -> Result<(), FednodeError> {
        self.calls
            .lock()
            .unwrap()
            .push(GitCall::Clone(url.to_string(), branch, dest.to_path_buf()));
        std::fs::create_dir_all(dest).map_err(|e| FednodeError::io("fake clone", e))?;
        self.set_branch(dest, Some(branch.as_str()));
        Ok(())
    }

    async fn current_branch(&self, checkout: &Path) -> Result<Option<String>, FednodeError> {
        self.calls
            .lock()
            .unwrap()
            .push(GitCall::CurrentBranch(checkout.to_path_buf()));
        Ok(self
            .branches
            .lock()
            .unwrap()
            .get(checkout)
            .cloned()
            .unwrap_or_else(|| Some("master".to_string())))
    }

    async fn pull(&self, checkout: &Path, branch: &str) -> Result<(), FednodeError> {
        self.calls
            .lock()
            .unwrap()
            .push(GitCall::Pull(checkout.to_path_buf(), branch.to_string()));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockerCall {
    Exec(String, Vec<String>),
    RemoveContainer(String),
    RemoveImage(String),
}

#[derive(Debug, Default)]
pub struct FakeDocker {
    pub running: HashSet<String>,
    pub exec_code: i32,
    pub containers: Vec<String>,
    pub images: Vec<String>,
    calls: Mutex<Vec<DockerCall>>,
}

impl FakeDocker {
    pub fn with_inventory(containers: &[&str], images: &[&str]) -> Self {
        Self {
            containers: containers.iter().map(|c| c.to_string()).collect(),
            images: images.iter().map(|i| i.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<DockerCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl DockerBackend for FakeDocker {
    async fn is_running(&self, container: &str) -> Result<bool, FednodeError> {
        Ok(self.running.contains(container))
    }

    async fn exec(&self, container: &str, argv: &[String], _tty: bool) -> Result<i32, FednodeError> {
        self.calls
            .lock()
            .unwrap()
            .push(DockerCall::Exec(container.to_string(), argv.to_vec()));
        Ok(self.exec_code)
    }

    async fn list_containers(&self) -> Result<Vec<String>, FednodeError> {
        Ok(self.containers.clone())
    }

    async fn list_images(&self) -> Result<Vec<String>, FednodeError> {
        Ok(self.images.clone())
    }

    async fn remove_container(&self, id: &str) -> Result<(), FednodeError> {
        self.calls
            .lock()
            .unwrap()
            .push(DockerCall::RemoveContainer(id.to_string()));
        Ok(())
    }

    async fn remove_image(&self, id: &str) -> Result<(), FednodeError> {
        self.calls
            .lock()
            .unwrap()
            .push(DockerCall::RemoveImage(id.to_string()));
        if id.starts_with("busy") {
            return Err(failure("docker", vec!["rmi".into(), id.into()]));
        }
        Ok(())
    }
}

/// Treats exactly the listed ports as bound.
#[derive(Debug, Default)]
pub struct FakeProbe {
    pub bound: HashSet<u16>,
}

impl PortProbe for FakeProbe {
    async fn in_use(&self, port: u16) -> bool {
        self.bound.contains(&port)
    }
}
