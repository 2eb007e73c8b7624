use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::cli::InitArgs;
use crate::cli_utils::reload_prefix;
use crate::config::{ReloadConfig, CONFIG_FILE_NAME};

pub fn run(args: InitArgs) -> Result<()> {
    let dir = match args.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let config_path = write_config(&dir, args.force)?;

    println!(
        "{} Pinned {} in {}",
        reload_prefix(),
        dir.display(),
        config_path.display()
    );

    Ok(())
}

/// Write a config file pinning the canonical form of `dir`
pub fn write_config(dir: &Path, force: bool) -> Result<std::path::PathBuf> {
    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {}", dir.display());
    }

    let source_dir = dir
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", dir.display()))?;
    let config_path = source_dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite",
            config_path.display()
        );
    }

    let config = ReloadConfig {
        source_dir: Some(source_dir),
        ..Default::default()
    };

    let content = format!(
        "# direnv-reload configuration\n# Generated by `direnv-reload init`\n\n{}",
        config.to_toml()?
    );
    fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    Ok(config_path)
}
