use crate::config::{ConfigLoader, PolicyConfig};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (merged)
    Show,
    /// Show configuration file path
    Path,
}

pub fn run(args: ConfigArgs, config: &PolicyConfig) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(config),
        ConfigCommands::Path => show_path(),
    }
}

fn show_config(config: &PolicyConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{}", toml_str);
    Ok(())
}

fn show_path() -> Result<()> {
    println!("User config: {}", ConfigLoader::user_config_path().display());
    Ok(())
}
