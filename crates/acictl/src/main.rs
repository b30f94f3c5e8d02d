mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use aci_core::Fabric;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a controller connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "acictl", &mut std::io::stdout());
            Ok(())
        }

        // All other commands require an authenticated APIC session
        cmd => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(&cli.global, &cfg);
            let controller_config = build_controller_config(&cfg, &profile_name, &cli.global)?;
            let fabric = Fabric::new(controller_config)?;
            fabric
                .connect()
                .await
                .map_err(|e| CliError::from(e).with_profile(&profile_name))?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &fabric, &cli.global)
                .await
                .map_err(|e| e.with_profile(&profile_name));

            fabric.disconnect().await;
            result
        }
    }
}

/// Build a `ControllerConfig` from the config file, profile, and CLI overrides.
fn build_controller_config(
    cfg: &config::Config,
    profile_name: &str,
    global: &cli::GlobalOpts,
) -> Result<aci_core::ControllerConfig, CliError> {
    // If a profile exists, use it with CLI flag overrides
    if let Some(profile) = cfg.profiles.get(profile_name) {
        return config::resolve_profile(profile, profile_name, global);
    }

    // No profile found -- try to build from CLI flags / env vars alone
    config::resolve_flags_only(global)
}
