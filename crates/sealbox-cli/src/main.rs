//! Sealbox CLI - an encrypted account vault unlocked by a single passphrase
//!
//! Command-line front end over `sealbox-core`.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Init(args) => commands::handle_init(cli, args).await,
        Commands::Add(args) => commands::handle_add(cli, args).await,
        Commands::List(args) => commands::handle_list(cli, args).await,
        Commands::Show(args) => commands::handle_show(cli, args).await,
        Commands::Status(args) => commands::handle_status(cli, args).await,
        Commands::Completions { shell } => commands::handle_completions(*shell),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(&cli).await {
        std::process::exit(errors::report(&err));
    }
}
