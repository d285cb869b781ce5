use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use extpolicy_core::ActionResult;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "extpolicy",
    about = "Force-install or block a browser extension through machine policy"
)]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file layered over the user config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Force-install the extension (installer install step)
    Install(commands::install::InstallArgs),
    /// Block the extension (installer uninstall step)
    Remove(commands::remove::RemoveArgs),
    /// Print the current policy, or one extension's state
    Show(commands::show::ShowArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli);
    if let Err(e) = &result {
        // Installer logs capture stderr; the exit status alone is generic.
        error!("{:?}", e);
    }
    std::process::exit(ActionResult::from(&result).exit_code());
}

fn run(cli: Cli) -> Result<()> {
    let config = config::ConfigLoader::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Install(args) => commands::install::run(args, &config),
        Commands::Remove(args) => commands::remove::run(args, &config),
        Commands::Show(args) => commands::show::run(args, &config),
        Commands::Config(args) => commands::config::run(args, &config),
    }
}
