use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{ReloadConfig, CONFIG_FILE_NAME};
use crate::xdg;

/// Discovers direnv-reload configuration by traversing up the directory tree
pub fn discover_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            return Ok(Some(config_path));
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    // Fallback to global config
    let global_config = xdg::global_config_file();
    if global_config.is_file() {
        return Ok(Some(global_config));
    }

    Ok(None)
}

/// Loads configuration with auto-discovery support
///
/// An explicit path must exist. Otherwise the tree above the current
/// directory is searched, then the global config file.
///
/// Returns the config together with the file it came from, or Ok(None) if
/// nothing was found.
pub fn load_config_with_discovery(
    explicit_path: Option<&Path>,
) -> Result<Option<(PathBuf, ReloadConfig)>> {
    if let Some(config_path) = explicit_path {
        let config = ReloadConfig::from_file(config_path)?;
        return Ok(Some((config_path.to_path_buf(), config)));
    }

    let current_dir =
        std::env::current_dir().context("Failed to get current directory for config discovery")?;

    match discover_config(&current_dir)? {
        Some(discovered) => {
            let config = ReloadConfig::from_file(&discovered)?;
            Ok(Some((discovered, config)))
        }
        None => Ok(None),
    }
}
