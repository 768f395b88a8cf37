use clap::Parser;

mod cli;
mod commands;
mod config;
mod console;
mod render;
mod scenario;
mod script;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = config::FclConfig::load(cli.config.as_deref())?;
    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level(cli.verbose)?)
        .with_writer(std::io::stderr)
        .init();
    commands::run_command(cli, config)
}
