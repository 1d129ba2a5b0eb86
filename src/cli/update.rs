use clap::Parser;

/// Arguments for update command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install a newer packaged map:\n    tacomap update\n\n\
                  Install without a progress bar:\n    tacomap update --quiet")]
pub struct UpdateArgs {
    /// Do not show a progress bar
    #[arg(long, short = 'q')]
    pub quiet: bool,
}
