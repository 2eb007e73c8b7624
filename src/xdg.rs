//! XDG Base Directory support for direnv-reload
//!
//! Only the configuration directory is used:
//! `$XDG_CONFIG_HOME/direnv-reload/` (default: `~/.config/direnv-reload/`)

use std::path::PathBuf;

/// Get the direnv-reload configuration directory
///
/// Respects XDG_CONFIG_HOME environment variable.
/// Falls back to `$HOME/.config/direnv-reload`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("direnv-reload")
    } else if let Some(home) = dirs::home_dir() {
        // XDG spec default: $HOME/.config
        home.join(".config").join("direnv-reload")
    } else {
        PathBuf::from(".direnv-reload")
    }
}

/// Global configuration file used when no project file is found
pub fn global_config_file() -> PathBuf {
    config_dir().join("config.toml")
}
