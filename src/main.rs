//! X-Bows custom layer programmer CLI
//!
//! Builds the packet sequence that programs a custom layer from a TOML
//! config, and inspects packet dumps.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{Cli, Commands};

mod commands;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Build {
            config,
            layer,
            out,
            hex,
        } => commands::program::build(config, layer, out.as_deref(), hex)?,
        Commands::Inspect { file } => commands::program::inspect(&file)?,
        Commands::Keys => commands::utility::keys()?,
        Commands::InitConfig { path, force } => commands::utility::init_config(path, force)?,
    }
    Ok(())
}
