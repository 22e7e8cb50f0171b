use std::path::{Path, PathBuf};

/// Resolve the deployment root. If `cli_root` is provided, verify it is a
/// directory and return it. Otherwise use the directory holding the running
/// executable, so the operator's working directory never matters.
pub fn resolve_root(cli_root: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli_root {
        if path.is_dir() {
            return Ok(path.canonicalize()?);
        }
        anyhow::bail!("Deployment root not found: {}", path.display());
    }

    let current_exe = std::env::current_exe()?;
    let exe_dir = current_exe
        .parent()
        .ok_or_else(|| anyhow::anyhow!("cannot determine install directory"))?;
    Ok(exe_dir.to_path_buf())
}
