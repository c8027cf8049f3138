mod cli;
mod config;
mod hosts;
mod keys;
mod paths;
mod prompt;
mod remote;
mod table;

use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Entry point wiring the CLI to the stores. Everything is synchronous:
/// each invocation runs one operation to completion and exits.
fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = cli::Cli::parse();
    let config = config::load()?;
    tracing::debug!(?config, "loaded configuration");
    match cli.command {
        cli::Command::Hosts(cmd) => hosts::handle(cmd, &config)?,
        cli::Command::Remote(cmd) => remote::handle(cmd, &config)?,
        cli::Command::Key(cmd) => keys::handle(cmd, &config)?,
        cli::Command::Config(cli::ConfigCommand::Init) => init_config(&config)?,
        cli::Command::Version => print_version(),
    }

    Ok(())
}

fn init_tracing() {
    // Respect user-provided filters, default to info to avoid noisy stdout.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn print_version() {
    println!("moor {}", env!("CARGO_PKG_VERSION"));
}

fn init_config(config: &config::Config) -> Result<()> {
    let path = config::write_default_if_missing(config)?;
    println!("Config initialized at {}", path.display());
    Ok(())
}
