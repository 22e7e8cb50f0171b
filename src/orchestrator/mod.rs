pub mod ports;
pub mod state;
pub mod sync;

#[cfg(test)]
pub(crate) mod fakes;

use tracing::{error, info, warn};

use crate::compose::{ComposeBackend, ComposeCommand, ComposeContext, ComposeService, DockerCompose};
use crate::config::model::{Branch, LogicalService, Profile};
use crate::config::{templates, Settings};
use crate::docker::{DockerBackend, DockerCli};
use crate::error::FednodeError;
use crate::git::{GitBackend, GitCli};
use crate::identity::EffectiveIdentity;

use ports::{check_ports_free, PortProbe, TcpProbe};
use state::{InstalledConfig, StateStore};
use sync::{SyncEngine, SyncReport};

/// The external tools the orchestrator drives.
pub struct Backends<C, G, D, P> {
    pub compose: C,
    pub git: G,
    pub docker: D,
    pub probe: P,
}

impl Backends<DockerCompose, GitCli, DockerCli, TcpProbe> {
    /// The real docker/git tooling, with git running as `identity`.
    pub fn system(identity: EffectiveIdentity) -> Self {
        Self {
            compose: DockerCompose,
            git: GitCli::new(identity),
            docker: DockerCli,
            probe: TcpProbe::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InstallOptions {
    pub profile: Profile,
    pub branch: Branch,
    pub use_ssh_uris: bool,
}

/// Lifecycle state machine over the installed-configuration record.
///
/// `install` is the only verb allowed while not installed and the only verb
/// refused once installed. Every other verb reads the record first and
/// routes to the compose, git or docker backend.
pub struct Orchestrator<C, G, D, P> {
    settings: Settings,
    store: StateStore,
    backends: Backends<C, G, D, P>,
}

impl<C, G, D, P> Orchestrator<C, G, D, P>
where
    C: ComposeBackend,
    G: GitBackend,
    D: DockerBackend,
    P: PortProbe,
{
    pub fn new(settings: Settings, backends: Backends<C, G, D, P>) -> Self {
        let store = settings.state_store();
        Self {
            settings,
            store,
            backends,
        }
    }

    /// The installed record, or `None` when not installed.
    pub fn status(&self) -> Result<Option<InstalledConfig>, FednodeError> {
        self.store.load()
    }

    fn installed(&self) -> Result<InstalledConfig, FednodeError> {
        self.store.load()?.ok_or_else(|| FednodeError::NotInstalled {
            path: self.store.path().to_path_buf(),
        })
    }

    fn context(&self, config: &InstalledConfig) -> ComposeContext {
        ComposeContext::new(
            self.settings.descriptor_path(config.profile),
            config.branch,
            self.settings.hostname.clone(),
        )
    }

    fn installed_context(&self) -> Result<(InstalledConfig, ComposeContext), FednodeError> {
        let config = self.installed()?;
        let ctx = self.context(&config);
        Ok((config, ctx))
    }

    /// Preflight, fetch sources, persist the record, then bring the
    /// deployment up.
    pub async fn install(&self, opts: InstallOptions) -> Result<(), FednodeError> {
        if self.store.exists() {
            return Err(FednodeError::AlreadyInstalled {
                path: self.store.path().to_path_buf(),
            });
        }

        check_ports_free(&self.backends.probe, opts.profile).await?;

        let src_dir = self.settings.src_dir();
        if !src_dir.is_dir() {
            std::fs::create_dir_all(&src_dir)
                .map_err(|e| FednodeError::io(format!("creating {}", src_dir.display()), e))?;
            if let Err(e) = crate::platform::copy_ownership(&self.settings.root, &src_dir) {
                warn!(path = %src_dir.display(), error = %e, "could not match root ownership");
            }
        }

        for repo in opts.profile.repos() {
            let dir = self.settings.checkout_dir(repo);
            if dir.exists() {
                info!("{} already checked out, skipping clone", repo);
                continue;
            }
            let url = repo.remote_url(opts.use_ssh_uris);
            info!(
                "Cloning {} ({}) as {} ...",
                repo, opts.branch, self.settings.identity
            );
            self.backends.git.clone_repo(&url, opts.branch, &dir).await?;
        }

        let config = InstalledConfig::new(opts.profile, opts.branch);
        self.store.save(&config)?;
        info!(profile = %config.profile, branch = %config.branch, "configuration saved");

        let ctx = self.context(&config);
        self.compose(
            &ctx,
            ComposeCommand::Pull {
                ignore_failures: true,
                services: Vec::new(),
            },
        )
        .await?;

        templates::materialize_defaults(&self.settings.config_dir())?;

        self.compose(
            &ctx,
            ComposeCommand::Up {
                recreate: false,
                services: Vec::new(),
            },
        )
        .await
    }

    /// Tear the deployment down and forget it. The record is removed even
    /// when `down` fails; that failure is still returned.
    pub async fn uninstall(&self) -> Result<(), FednodeError> {
        let (_, ctx) = self.installed_context()?;
        let down = self.compose(&ctx, ComposeCommand::Down).await;
        if let Err(e) = &down {
            error!(error = %e, "bringing containers down failed");
        }
        self.store.remove()?;
        info!("configuration removed");
        down
    }

    pub async fn start(&self, services: Vec<String>) -> Result<(), FednodeError> {
        let (_, ctx) = self.installed_context()?;
        self.compose(&ctx, ComposeCommand::Start(services)).await
    }

    pub async fn stop(&self, services: Vec<String>) -> Result<(), FednodeError> {
        let (_, ctx) = self.installed_context()?;
        self.compose(&ctx, ComposeCommand::Stop(services)).await
    }

    pub async fn restart(&self, services: Vec<String>) -> Result<(), FednodeError> {
        let (_, ctx) = self.installed_context()?;
        self.compose(&ctx, ComposeCommand::Restart(services)).await
    }

    /// Stop `service` and re-run it with its reparse directive.
    pub async fn reparse(&self, service: &str) -> Result<(), FednodeError> {
        let (config, ctx) = self.installed_context()?;
        let svc: LogicalService = service.parse()?;
        let directive = svc.reparse_directive().ok_or_else(|| FednodeError::NotReparsable {
            service: svc.to_string(),
        })?;
        if !config.profile.updatable_services().contains(&svc) {
            return Err(FednodeError::ServiceNotInProfile {
                service: svc.to_string(),
                profile: config.profile.to_string(),
            });
        }

        self.compose(&ctx, ComposeCommand::Stop(vec![svc.to_string()]))
            .await?;
        info!("Starting {} with {}={} ...", svc, directive.key, directive.value);
        self.compose(
            &ctx,
            ComposeCommand::Run {
                service: svc.to_string(),
                no_deps: false,
                rm: false,
                entrypoint: None,
                env: vec![(directive.key.to_string(), directive.value.to_string())],
                args: Vec::new(),
            },
        )
        .await
    }

    /// Pull source updates for `services` (all available when empty) and
    /// optionally restart them.
    pub async fn update(&self, services: &[String], restart: bool) -> Result<SyncReport, FednodeError> {
        let (config, ctx) = self.installed_context()?;
        let src_dir = self.settings.src_dir();
        let engine = SyncEngine::new(
            &self.backends.compose,
            &self.backends.git,
            &ctx,
            &src_dir,
            config.profile,
        );
        engine.sync(services, restart).await
    }

    /// Refetch images and force-recreate `services` (all when empty).
    pub async fn rebuild(&self, services: Vec<String>) -> Result<(), FednodeError> {
        let (_, ctx) = self.installed_context()?;
        self.compose(
            &ctx,
            ComposeCommand::Pull {
                ignore_failures: true,
                services: services.clone(),
            },
        )
        .await?;
        self.compose(
            &ctx,
            ComposeCommand::Up {
                recreate: true,
                services,
            },
        )
        .await
    }

    pub async fn ps(&self) -> Result<(InstalledConfig, Vec<ComposeService>), FednodeError> {
        let (config, ctx) = self.installed_context()?;
        let services = self.backends.compose.services(&ctx).await?;
        Ok((config, services))
    }

    /// Show logs; `follow` streams the last 50 lines and everything after.
    pub async fn logs(&self, services: Vec<String>, follow: bool) -> Result<(), FednodeError> {
        let (_, ctx) = self.installed_context()?;
        let command = if follow {
            ComposeCommand::Logs {
                follow: true,
                tail: Some(50),
                services,
            }
        } else {
            ComposeCommand::Logs {
                follow: false,
                tail: None,
                services,
            }
        };
        self.compose(&ctx, command).await
    }

    /// Run `command` through `bash -c` in the service's container, returning
    /// the command's exit code. The words are joined with single spaces into
    /// one script; no further quoting is applied.
    pub async fn exec(&self, service: &str, command: &[String], tty: bool) -> Result<i32, FednodeError> {
        let script = command.join(" ");
        self.attach(
            service,
            vec!["bash".to_string(), "-c".to_string(), script.clone()],
            vec!["-c".to_string(), script],
            tty,
        )
        .await
    }

    /// Open a bash shell in the service's container.
    pub async fn shell(&self, service: &str, tty: bool) -> Result<i32, FednodeError> {
        self.attach(service, vec!["bash".to_string()], Vec::new(), tty)
            .await
    }

    /// Attach to the running container, or fall back to a disposable
    /// one-off container with a bash entrypoint when it is not running.
    /// Either way the exit code is the container command's own.
    async fn attach(
        &self,
        service: &str,
        exec_argv: Vec<String>,
        run_args: Vec<String>,
        tty: bool,
    ) -> Result<i32, FednodeError> {
        let (_, ctx) = self.installed_context()?;
        let container = ctx.container_name(service);
        if self.backends.docker.is_running(&container).await? {
            return self.backends.docker.exec(&container, &exec_argv, tty).await;
        }

        warn!(
            "Container {} is not running -- creating a transient container with a 'bash' shell entrypoint...",
            container
        );
        let command = ComposeCommand::Run {
            service: service.to_string(),
            no_deps: true,
            rm: true,
            entrypoint: Some("bash".to_string()),
            env: Vec::new(),
            args: run_args,
        };
        self.backends.compose.run_attached(&ctx, &command).await
    }

    async fn compose(&self, ctx: &ComposeContext, command: ComposeCommand) -> Result<(), FednodeError> {
        self.backends.compose.invoke(ctx, &command).await
    }
}
