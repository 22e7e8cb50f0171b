#![allow(dead_code)]
use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch deployment root.
pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// A project that already carries an installed record.
    pub fn installed(profile: &str, branch: &str) -> Self {
        let project = Self::new();
        project.write_record(&format!(
            "[Default]\nconfig = \"{}\"\nbranch = \"{}\"\n",
            profile, branch
        ));
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn record_path(&self) -> PathBuf {
        self.root().join(".fednode.config")
    }

    pub fn write_record(&self, contents: &str) {
        std::fs::write(self.record_path(), contents).unwrap();
    }

    /// The fednode binary pointed at this root, with a non-terminal stdin.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_fednode"));
        cmd.arg("--root")
            .arg(self.root())
            .env_remove("FEDNODE_ROOT")
            .env_remove("FEDNODE_AS_USER")
            .env("RUST_LOG", "info")
            .write_stdin("");
        cmd
    }
}
