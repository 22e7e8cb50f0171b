use clap::{CommandFactory, Parser};
use clap_complete::aot::generate;
use is_terminal::IsTerminal;
use tracing::info;

use fednode::cli::{Cli, Commands, GlobalOpts};
use fednode::commands;
use fednode::config::resolve::resolve_root;
use fednode::config::Settings;
use fednode::docker::DockerCli;
use fednode::error::FednodeError;
use fednode::identity::EffectiveIdentity;
use fednode::orchestrator::{Backends, InstallOptions, Orchestrator};
use fednode::platform;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; --debug only changes the default level.
    let default_level = if cli.global.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            match e.downcast::<FednodeError>() {
                Ok(err) => {
                    let report: miette::Report = err.into();
                    eprintln!("{:?}", report);
                }
                Err(e) => eprintln!("Error: {:#}", e),
            }
            std::process::exit(1);
        }
    }
}

/// Run one verb, returning the process exit code.
async fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "fednode", &mut std::io::stdout());
            Ok(0)
        }
        Commands::Doctor => commands::doctor::run().map(|_| 0),
        Commands::DockerClean { yes } => commands::clean::run(&DockerCli, yes).await.map(|_| 0),
        command => run_lifecycle(&cli.global, command).await,
    }
}

fn settings(global: &GlobalOpts) -> anyhow::Result<Settings> {
    let root = resolve_root(global.root.as_deref())?;
    let identity = EffectiveIdentity::resolve(global.as_user.as_deref());
    Ok(Settings::new(root, identity, platform::hostname()))
}

async fn run_lifecycle(global: &GlobalOpts, command: Commands) -> anyhow::Result<i32> {
    let settings = settings(global)?;
    tracing::debug!(root = %settings.root.display(), identity = %settings.identity, "resolved settings");

    if let Commands::Status = command {
        commands::status::run(&settings)?;
        return Ok(0);
    }

    let backends = Backends::system(settings.identity.clone());
    let orchestrator = Orchestrator::new(settings, backends);
    let tty = std::io::stdin().is_terminal();

    match command {
        Commands::Install {
            profile,
            branch,
            use_ssh_uris,
        } => {
            orchestrator
                .install(InstallOptions {
                    profile,
                    branch,
                    use_ssh_uris,
                })
                .await?;
            info!("Install of {} ({}) complete", profile, branch);
        }
        Commands::Uninstall => orchestrator.uninstall().await?,
        Commands::Start { services } => orchestrator.start(services).await?,
        Commands::Stop { services } => orchestrator.stop(services).await?,
        Commands::Restart { services } => orchestrator.restart(services).await?,
        Commands::Reparse { service } => orchestrator.reparse(&service).await?,
        Commands::Ps => commands::ps::run(&orchestrator).await?,
        Commands::Tail { services } => orchestrator.logs(services, true).await?,
        Commands::Logs { services } => orchestrator.logs(services, false).await?,
        Commands::Exec { service, command } => {
            return Ok(orchestrator.exec(&service, &command, tty).await?);
        }
        Commands::Shell { service } => {
            return Ok(orchestrator.shell(&service, tty).await?);
        }
        Commands::Update {
            no_restart,
            services,
        } => {
            let report = orchestrator.update(&services, !no_restart).await?;
            info!(
                "Updated {} checkout(s), restarted {} service(s)",
                report.pulled.len(),
                report.restarted.len()
            );
        }
        Commands::Rebuild { services } => orchestrator.rebuild(services).await?,
        Commands::Status
        | Commands::Completions { .. }
        | Commands::Doctor
        | Commands::DockerClean { .. } => unreachable!("handled before settings are resolved"),
    }

    Ok(0)
}
