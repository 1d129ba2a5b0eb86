use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  tacomap completions bash > ~/.local/share/bash-completion/completions/tacomap\n  \
                  tacomap completions zsh > ~/.zfunc/_tacomap")]
pub struct CompletionsArgs {
    /// Target shell: bash, elvish, fish, powershell (or pwsh), zsh
    pub shell: String,
}
