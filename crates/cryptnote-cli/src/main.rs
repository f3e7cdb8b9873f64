//! cryptnote CLI - an encrypted note vault behind one master password
//!
//! This is the command-line front end for cryptnote. It resolves the vault
//! location, reads passwords and bodies, and prints results; everything else
//! lives in `cryptnote-core`.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod editor;
mod helpers;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::{exit_code, load_config};
use crate::cli::{Cli, Commands};
use crate::commands::{entries, import, init, passwd};
use crate::config::CryptnoteConfig;
use crate::constants::{env, DEFAULT_LOG_FILTER};

fn main() {
    let cli = Cli::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };
    init_tracing(&config);

    if let Err(err) = run(&cli, &config) {
        tracing::debug!(error = ?err, "command failed");
        eprintln!("Error: {}", err);
        std::process::exit(exit_code(&err));
    }
}

/// Log to stderr, filtered by `CRYPTNOTE_LOG`, then the config file.
fn init_tracing(config: &CryptnoteConfig) {
    let filter = EnvFilter::try_from_env(env::LOG).unwrap_or_else(|_| {
        let fallback = config
            .logging
            .filter
            .as_deref()
            .unwrap_or(DEFAULT_LOG_FILTER);
        EnvFilter::try_new(fallback).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli, config: &CryptnoteConfig) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Init => init::handle_init(cli, config),
        Commands::List(args) => entries::handle_list(cli, config, args),
        Commands::Show(args) => entries::handle_show(cli, config, args),
        Commands::Add(args) => entries::handle_add(cli, config, args),
        Commands::Edit(args) => entries::handle_edit(cli, config, args),
        Commands::Import(args) => import::handle_import(cli, config, args),
        Commands::Passwd => passwd::handle_passwd(cli, config),
    }
}
