use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::model::{Branch, Profile};
use crate::error::FednodeError;

pub const RECORD_FILE: &str = ".fednode.config";

/// The single persisted record marking a deployment as installed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstalledConfig {
    #[serde(rename = "config")]
    pub profile: Profile,
    pub branch: Branch,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_at: Option<DateTime<Utc>>,
}

impl InstalledConfig {
    pub fn new(profile: Profile, branch: Branch) -> Self {
        Self {
            profile,
            branch,
            installed_at: Some(Utc::now()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordFile {
    #[serde(rename = "Default")]
    default: InstalledConfig,
}

/// Reads and writes the installed-configuration record at a fixed path.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(root: &Path) -> Self {
        Self {
            path: root.join(RECORD_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the record. `Ok(None)` means not installed; a record that exists
    /// but cannot be parsed is an error.
    pub fn load(&self) -> Result<Option<InstalledConfig>, FednodeError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(FednodeError::io(
                    format!("reading {}", self.path.display()),
                    e,
                ))
            }
        };
        let record: RecordFile = toml::from_str(&content).map_err(|source| FednodeError::Record {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(record.default))
    }

    /// Overwrite the record atomically: write a temp file, then rename.
    pub fn save(&self, config: &InstalledConfig) -> Result<(), FednodeError> {
        let record = RecordFile {
            default: config.clone(),
        };
        let content = toml::to_string(&record)
            .map_err(|e| FednodeError::io("serializing configuration record", std::io::Error::other(e)))?;
        let tmp_path = self.path.with_extension("config.tmp");
        std::fs::write(&tmp_path, content)
            .map_err(|e| FednodeError::io(format!("writing {}", tmp_path.display()), e))?;
        std::fs::rename(&tmp_path, &self.path)
            .map_err(|e| FednodeError::io(format!("replacing {}", self.path.display()), e))?;
        Ok(())
    }

    /// Delete the record. A missing record is an error, not a no-op.
    pub fn remove(&self) -> Result<(), FednodeError> {
        std::fs::remove_file(&self.path)
            .map_err(|e| FednodeError::io(format!("removing {}", self.path.display()), e))
    }
}
