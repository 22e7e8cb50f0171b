use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::compose::{ComposeBackend, ComposeCommand, ComposeContext};
use crate::config::checkout_dir;
use crate::config::model::{LogicalService, Profile, RepoFamily};
use crate::error::FednodeError;
use crate::git::GitBackend;

/// What a sync run did before it returned.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SyncReport {
    pub pulled: Vec<PathBuf>,
    pub restarted: Vec<LogicalService>,
}

/// Pulls source updates for logical services, touching each repository
/// family at most once per run, and restarts the requested services.
///
/// Work is strictly sequential. A detached checkout or a failed git call
/// stops the run; whatever was pulled before that stays pulled.
pub struct SyncEngine<'a, C, G> {
    compose: &'a C,
    git: &'a G,
    ctx: &'a ComposeContext,
    src_dir: &'a Path,
    profile: Profile,
}

impl<'a, C: ComposeBackend, G: GitBackend> SyncEngine<'a, C, G> {
    pub fn new(
        compose: &'a C,
        git: &'a G,
        ctx: &'a ComposeContext,
        src_dir: &'a Path,
        profile: Profile,
    ) -> Self {
        Self {
            compose,
            git,
            ctx,
            src_dir,
            profile,
        }
    }

    /// Validate requested names up front. An empty request means every
    /// updatable service available in the installed profile.
    pub fn resolve_services(&self, requested: &[String]) -> Result<Vec<LogicalService>, FednodeError> {
        let available = self.profile.updatable_services();
        if requested.is_empty() {
            return Ok(available);
        }

        let mut services: Vec<LogicalService> = Vec::with_capacity(requested.len());
        for name in requested {
            let service: LogicalService = name.parse()?;
            if !available.contains(&service) {
                return Err(FednodeError::ServiceNotInProfile {
                    service: service.to_string(),
                    profile: self.profile.to_string(),
                });
            }
            if !services.contains(&service) {
                services.push(service);
            }
        }
        Ok(services)
    }

    pub async fn sync(&self, requested: &[String], restart: bool) -> Result<SyncReport, FednodeError> {
        let services = self.resolve_services(requested)?;
        let mut synced: HashSet<RepoFamily> = HashSet::new();
        let mut report = SyncReport::default();
        let mut failed_restarts: Vec<String> = Vec::new();

        for service in services {
            let family = service.family();
            if synced.insert(family) {
                for repo in family.checkouts() {
                    let checkout = checkout_dir(self.src_dir, *repo);
                    self.pull_checkout(&checkout).await?;
                    report.pulled.push(checkout);
                }
            } else {
                debug!(service = %service, family = family.name(), "family already synced this run");
            }

            if restart {
                info!("Restarting {} ...", service);
                let command = ComposeCommand::Restart(vec![service.to_string()]);
                match self.compose.invoke(self.ctx, &command).await {
                    Ok(()) => report.restarted.push(service),
                    Err(e) => {
                        error!(service = %service, error = %e, "restart failed");
                        failed_restarts.push(service.to_string());
                    }
                }
            }
        }

        if !failed_restarts.is_empty() {
            return Err(FednodeError::RestartsFailed {
                services: failed_restarts,
            });
        }
        Ok(report)
    }

    async fn pull_checkout(&self, checkout: &Path) -> Result<(), FednodeError> {
        if !checkout.is_dir() {
            return Err(FednodeError::MissingCheckout {
                checkout: checkout.to_path_buf(),
            });
        }
        let branch = self
            .git
            .current_branch(checkout)
            .await?
            .ok_or_else(|| FednodeError::DetachedHead {
                checkout: checkout.to_path_buf(),
            })?;
        info!("Updating {} from origin/{} ...", checkout.display(), branch);
        self.git.pull(checkout, &branch).await
    }
}
