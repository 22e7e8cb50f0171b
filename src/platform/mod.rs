use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::FednodeError;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
use unix as imp;
#[cfg(windows)]
use windows as imp;

/// Run `cmd` with the terminal attached and fail on a non-zero exit.
pub async fn run_status(cmd: Command, program: &str, args: Vec<String>) -> Result<(), FednodeError> {
    match run_exit_code(cmd, program).await? {
        0 => Ok(()),
        code => Err(FednodeError::BackendFailed {
            program: program.to_string(),
            args,
            code: (code >= 0).then_some(code),
        }),
    }
}

/// Run `cmd` with the terminal attached and return its exit code
/// (`-1` when killed by a signal).
pub async fn run_exit_code(mut cmd: Command, program: &str) -> Result<i32, FednodeError> {
    let status = cmd.status().await.map_err(|source| FednodeError::BackendLaunch {
        program: program.to_string(),
        source,
    })?;
    Ok(status.code().unwrap_or(-1))
}

/// Run `cmd`, capture stdout, and fail on a non-zero exit.
pub async fn run_output(mut cmd: Command, program: &str, args: Vec<String>) -> Result<String, FednodeError> {
    let output = cmd
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()
        .await
        .map_err(|source| FednodeError::BackendLaunch {
            program: program.to_string(),
            source,
        })?;
    if !output.status.success() {
        return Err(FednodeError::BackendFailed {
            program: program.to_string(),
            args,
            code: output.status.code(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Identify which process owns a given TCP port.
pub fn identify_port_owner(port: u16) -> Option<String> {
    imp::identify_port_owner(port)
}

/// Local host name, exported to compose descriptors as `HOSTNAME_BASE`.
pub fn hostname() -> String {
    imp::hostname().unwrap_or_else(|| "localhost".to_string())
}

/// Whether the current process runs with root privileges.
pub fn is_root() -> bool {
    imp::is_root()
}

/// Give `target` the same owner as `template`, where the platform supports it.
pub fn copy_ownership(template: &Path, target: &Path) -> std::io::Result<()> {
    imp::copy_ownership(template, target)
}
