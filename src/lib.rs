// Library interface for direnv-reload
// The binary is a thin dispatcher; integration tests use these modules directly

pub mod cli;
pub mod cli_utils;
pub mod commands;
pub mod config;
pub mod config_discovery;
pub mod error;
pub mod logging;
pub mod merger;
pub mod reload;
pub mod xdg;

// Re-export commonly used types
pub use config::ReloadConfig;
pub use config_discovery::discover_config;
pub use error::ReloadError;
pub use reload::{reload, Direnv, EnvTool, ReloadOutcome, ReloadPlan};
