/// Configuration merger: CLI args > Env vars > Config file > Build-time default > Defaults
///
/// Environment variables are folded into the CLI args by clap, so only the
/// file, the build-time constant and the built-in defaults are handled here.
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::cli::ReloadArgs;
use crate::config::ReloadConfig;
use crate::reload::ReloadPlan;

/// Source directory baked in at compile time, if any
pub const BUILD_SOURCE_DIR: Option<&str> = option_env!("DIRENV_RELOAD_SOURCE_DIR");

/// Merge configuration from CLI args and config file into a reload plan
pub fn merge(args: &ReloadArgs, file_config: Option<ReloadConfig>) -> Result<ReloadPlan> {
    let file = file_config.unwrap_or_default();

    let source_dir = match args
        .source_dir
        .clone()
        .or(file.source_dir)
        .or_else(|| BUILD_SOURCE_DIR.map(PathBuf::from))
    {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let program = args
        .direnv
        .clone()
        .unwrap_or_else(|| file.direnv.program.clone());

    Ok(ReloadPlan {
        envrc: resolve(&source_dir, &file.layout.envrc),
        cache_dir: resolve(&source_dir, &file.layout.cache_dir),
        profile_glob: file.layout.profile_glob,
        program,
        force_env: file.direnv.force_env,
        command: file.direnv.command,
        source_dir,
    })
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
