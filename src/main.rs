//! tacomap - offline Taiwan map installer
//!
//! Keeps the installed offline map in step with the map resources packaged
//! alongside it, extracting a packaged map only when it is newer than the
//! recorded installed version.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod error;
mod hash;
mod prefs;
mod progress;
mod reconciler;
mod resource;
mod source;
mod storage;
mod transaction;
mod ui;

use cli::{Cli, Commands};
use commands::AppContext;
use error::Result;

/// Log to stderr, honouring RUST_LOG over the verbosity flag
fn init_logging(verbose: bool) {
    let default_level = if verbose { "tacomap=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
        command => {
            let ctx = AppContext::resolve(cli.data_dir, cli.resources)?;
            match command {
                Commands::Check => commands::check::run(&ctx),
                Commands::Update(args) => commands::update::run(&ctx, args),
                Commands::Status => commands::status::run(&ctx),
                Commands::Clean => commands::clean::run(&ctx),
                Commands::Version | Commands::Completions(_) => Ok(()),
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
