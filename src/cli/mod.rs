//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - update: Update command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod update;

pub use completions::CompletionsArgs;
pub use update::UpdateArgs;

/// tacomap - offline Taiwan map installer
///
/// Keeps the installed map current with the packaged map resources.
#[derive(Parser, Debug)]
#[command(
    name = "tacomap",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Keeps the offline Taiwan map installed from packaged map resources",
    long_about = "tacomap compares the packaged map resources (gzipped-taiwan-taco-<version>.map) \
                  with the installed map version and, when a newer one is packaged, decompresses \
                  it into place and records the installed version.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  tacomap check                          \x1b[90m# Is a newer map packaged?\x1b[0m\n   \
                  tacomap update                         \x1b[90m# Install the newer map\x1b[0m\n   \
                  tacomap status                         \x1b[90m# Show installed map details\x1b[0m\n   \
                  tacomap --resources ./assets update    \x1b[90m# Use another resource directory\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Data directory holding map/ and prefs/ (defaults to the platform data directory)
    #[arg(long, short = 'd', global = true, env = "TACOMAP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory with packaged map resources (defaults to <data dir>/assets)
    #[arg(long, short = 'r', global = true, env = "TACOMAP_RESOURCES")]
    pub resources: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether a newer packaged map is available
    Check,

    /// Install the packaged map if it is newer than the installed one
    Update(UpdateArgs),

    /// Show installed map details
    Status,

    /// Remove leftovers of interrupted extractions
    Clean,

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
