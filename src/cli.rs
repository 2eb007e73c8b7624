use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// direnv-reload - force a direnv cache rebuild for a project
///
/// With no subcommand, rebuilds the cached environment of the pinned source
/// directory and restamps `.envrc` and the cached profiles so direnv does not
/// rebuild again on the next prompt.
#[derive(Parser, Debug)]
#[command(name = "direnv-reload")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Force a direnv cache rebuild and restamp its watch files", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub reload: ReloadArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pin a project directory by writing direnv-reload.toml into it
    Init(InitArgs),

    /// Check the configuration and the direnv setup
    Doctor(DoctorArgs),
}

/// Arguments of the default reload operation
#[derive(Parser, Debug, Clone)]
pub struct ReloadArgs {
    /// Project directory to reload (overrides the pinned one)
    #[arg(long, env = "DIRENV_RELOAD_SOURCE_DIR")]
    pub source_dir: Option<PathBuf>,

    /// Config file path
    #[arg(short = 'c', long, env = "DIRENV_RELOAD_CONFIG")]
    pub config: Option<PathBuf>,

    /// direnv program name or path
    #[arg(long, env = "DIRENV_RELOAD_DIRENV")]
    pub direnv: Option<String>,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Directory to pin (defaults to the current directory)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Overwrite an existing direnv-reload.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct DoctorArgs {
    #[command(flatten)]
    pub reload: ReloadArgs,

    /// Show details for each check
    #[arg(short, long)]
    pub verbose: bool,
}
