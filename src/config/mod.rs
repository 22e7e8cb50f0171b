pub mod model;
pub mod resolve;
pub mod templates;

use std::path::{Path, PathBuf};

use crate::identity::EffectiveIdentity;
use crate::orchestrator::state::StateStore;
use model::{Profile, Repo};

/// Runtime settings resolved once at startup and passed down explicitly.
///
/// Layout under `root`:
///   .fednode.config              installed-configuration record
///   docker-compose.<profile>.yml compose descriptors
///   src/<repo>/                  repository checkouts
///   config/**/*.default          configuration templates
#[derive(Debug, Clone)]
pub struct Settings {
    pub root: PathBuf,
    pub identity: EffectiveIdentity,
    pub hostname: String,
}

impl Settings {
    pub fn new(root: PathBuf, identity: EffectiveIdentity, hostname: String) -> Self {
        Self {
            root,
            identity,
            hostname,
        }
    }

    pub fn state_store(&self) -> StateStore {
        StateStore::new(&self.root)
    }

    pub fn descriptor_path(&self, profile: Profile) -> PathBuf {
        self.root.join(profile.descriptor_file())
    }

    pub fn src_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    pub fn checkout_dir(&self, repo: Repo) -> PathBuf {
        checkout_dir(&self.src_dir(), repo)
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.join("config")
    }
}

pub fn checkout_dir(src_dir: &Path, repo: Repo) -> PathBuf {
    src_dir.join(repo.name())
}
