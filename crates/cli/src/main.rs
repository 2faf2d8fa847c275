//! `gh-property-manager` entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse arguments** with `clap` and validate them into a [`config::CliConfig`]
//!    before any network work starts.
//! 2. **Wire logging**: `tracing-subscriber` with an `EnvFilter` and either a
//!    human or JSON layer on stderr.
//! 3. **Construct infrastructure**: a [`github::GithubClient`] injected into
//!    the reconciliation engine as a `RepositoryClient`.
//! 4. **Run** `plan` or `apply`, cancelling cooperatively on Ctrl-C.

mod cli;
mod commands;
mod config;
mod logging;
mod report;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use reconcile::CancellationToken;
use tracing::warn;

use cli::{Cli, Commands};
use config::CliConfig;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format, cli.verbose);

    let args = match &cli.command {
        Commands::Plan(args) | Commands::Apply(args) => args,
    };
    let config = CliConfig::new(cli.token.as_deref(), &cli.api_url, args)?;
    let client = Arc::new(github::GithubClient::new(&config.api_url, config.token.as_str())?);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; stopping before the next request");
            on_signal.cancel();
        }
    });

    let mut stdout = std::io::stdout().lock();
    match &cli.command {
        Commands::Plan(_) => commands::plan(&config, client, &cancel, &mut stdout).await,
        Commands::Apply(_) => commands::apply(&config, client, &cancel, &mut stdout).await,
    }
}
