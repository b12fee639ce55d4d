use clap::Parser;

use pixel_vault::{
    cli::{Cli, Commands},
    handler::{handle_capacity, handle_hide, handle_keygen, handle_reveal},
};

/// Parses the command line and dispatches to the matching handler.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Hide(args) => handle_hide(args),
        Commands::Reveal(args) => handle_reveal(args),
        Commands::Keygen(args) => handle_keygen(args),
        Commands::Capacity(args) => handle_capacity(args),
    }
}
