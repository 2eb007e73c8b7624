use anyhow::Result;
use clap::Parser;

use direnv_reload::cli::{Cli, Commands};
use direnv_reload::{commands, logging};

fn main() -> Result<()> {
    // Initialize structured logging
    logging::init();

    let cli = Cli::parse();

    match cli.command {
        None => commands::reload::run(cli.reload),
        Some(Commands::Init(args)) => commands::init::run(args),
        Some(Commands::Doctor(args)) => commands::doctor::run(args),
    }
}
