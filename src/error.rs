// The miette/thiserror derive macros generate code that triggers false
// positive unused_assignments warnings on enum variant fields.
#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::orchestrator::ports::PortConflict;

#[derive(Debug, Error, Diagnostic)]
pub enum FednodeError {
    #[error("no installed configuration found at {}", path.display())]
    #[diagnostic(
        code(fednode::not_installed),
        help("run `fednode install <profile> <branch>` first")
    )]
    NotInstalled { path: PathBuf },

    #[error("cannot install: a configuration already exists at {}", path.display())]
    #[diagnostic(
        code(fednode::already_installed),
        help("run `fednode uninstall` first")
    )]
    AlreadyInstalled { path: PathBuf },

    #[error("cannot install: {} host port(s) already in use:\n{}", conflicts.len(), format_conflicts(conflicts))]
    #[diagnostic(
        code(fednode::ports_in_use),
        help("stop whatever is listening on these ports, then re-run install")
    )]
    PortsInUse { conflicts: Vec<PortConflict> },

    #[error("checkout {} has no current branch (detached HEAD or unknown state)", checkout.display())]
    #[diagnostic(
        code(fednode::detached_head),
        help("check out a branch in that repository, then re-run update")
    )]
    DetachedHead { checkout: PathBuf },

    #[error("checkout {} does not exist", checkout.display())]
    #[diagnostic(
        code(fednode::missing_checkout),
        help("the repository was never cloned; reinstall to fetch it")
    )]
    MissingCheckout { checkout: PathBuf },

    #[error("invalid service `{name}`{}", did_you_mean(suggestion))]
    #[diagnostic(code(fednode::unknown_service))]
    UnknownService {
        name: String,
        suggestion: Option<String>,
    },

    #[error("invalid profile `{name}`{}", did_you_mean(suggestion))]
    #[diagnostic(
        code(fednode::unknown_profile),
        help("valid profiles are: base, counterblock, full")
    )]
    UnknownProfile {
        name: String,
        suggestion: Option<String>,
    },

    #[error("invalid branch `{name}`{}", did_you_mean(suggestion))]
    #[diagnostic(
        code(fednode::unknown_branch),
        help("valid branches are: master, develop")
    )]
    UnknownBranch {
        name: String,
        suggestion: Option<String>,
    },

    #[error("service `{service}` is not part of the installed `{profile}` profile")]
    #[diagnostic(code(fednode::service_not_in_profile))]
    ServiceNotInProfile { service: String, profile: String },

    #[error("service `{service}` does not support reparse")]
    #[diagnostic(
        code(fednode::not_reparsable),
        help("reparse works on: counterparty, counterparty-testnet, counterblock, counterblock-testnet")
    )]
    NotReparsable { service: String },

    #[error("`{program} {}` exited with {}", args.join(" "), status_text(*code))]
    #[diagnostic(code(fednode::backend_failed))]
    BackendFailed {
        program: String,
        args: Vec<String>,
        code: Option<i32>,
    },

    #[error("failed to launch `{program}`")]
    #[diagnostic(
        code(fednode::backend_missing),
        help("run `fednode doctor` to check that docker and git are installed")
    )]
    BackendLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("source updated, but restarting {} failed", services.join(", "))]
    #[diagnostic(
        code(fednode::restart_failed),
        help("source changes are already applied; retry with `fednode restart <service>`")
    )]
    RestartsFailed { services: Vec<String> },

    #[error("configuration record {} is unreadable", path.display())]
    #[diagnostic(code(fednode::bad_record))]
    Record {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{context}")]
    #[diagnostic(code(fednode::io))]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl FednodeError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        FednodeError::Io {
            context: context.into(),
            source,
        }
    }
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean `{}`?)", s))
        .unwrap_or_default()
}

fn status_text(code: Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {}", c),
        None => "a signal".to_string(),
    }
}

fn format_conflicts(conflicts: &[PortConflict]) -> String {
    conflicts
        .iter()
        .map(|c| format!("  - {}", c))
        .collect::<Vec<_>>()
        .join("\n")
}
