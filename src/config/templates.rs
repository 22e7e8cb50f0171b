use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::FednodeError;
use crate::platform;

const TEMPLATE_SUFFIX: &str = ".default";

/// Active path for a template: the same path without its `.default` suffix.
pub fn active_path(template: &Path) -> Option<PathBuf> {
    let name = template.file_name()?.to_str()?;
    let active = name.strip_suffix(TEMPLATE_SUFFIX)?;
    if active.is_empty() {
        return None;
    }
    Some(template.with_file_name(active))
}

/// Copy every `*.default` under `config_dir` to its active name, unless the
/// active file already exists. Returns the files created.
///
/// A missing `config_dir` means there is nothing to materialize.
pub fn materialize_defaults(config_dir: &Path) -> Result<Vec<PathBuf>, FednodeError> {
    let mut created = Vec::new();
    if !config_dir.is_dir() {
        return Ok(created);
    }

    for entry in WalkDir::new(config_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            FednodeError::io(
                format!("walking {}", config_dir.display()),
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
            )
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let template = entry.path();
        let Some(active) = active_path(template) else {
            continue;
        };
        if active.exists() {
            continue;
        }

        info!("Generating config from defaults at {} ...", active.display());
        std::fs::copy(template, &active).map_err(|e| {
            FednodeError::io(
                format!("copying {} to {}", template.display(), active.display()),
                e,
            )
        })?;
        if let Err(e) = platform::copy_ownership(template, &active) {
            warn!(path = %active.display(), error = %e, "could not match template ownership");
        }
        created.push(active);
    }

    Ok(created)
}
