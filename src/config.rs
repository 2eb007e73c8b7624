use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up while walking towards the filesystem root
pub const CONFIG_FILE_NAME: &str = "direnv-reload.toml";

/// Complete direnv-reload configuration (loaded from TOML file)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ReloadConfig {
    /// Project directory whose cached environment is rebuilt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,

    #[serde(default)]
    pub direnv: DirenvConfig,

    #[serde(default)]
    pub layout: LayoutConfig,
}

/// How the external environment tool is invoked
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirenvConfig {
    /// Program name or path (looked up on PATH)
    #[serde(default = "default_program")]
    pub program: String,

    /// Variable set to "1" in the child to request a forced rebuild
    #[serde(default = "default_force_env")]
    pub force_env: String,

    /// No-op command run inside the managed environment
    #[serde(default = "default_command")]
    pub command: Vec<String>,
}

impl Default for DirenvConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            force_env: default_force_env(),
            command: default_command(),
        }
    }
}

/// Where the watched files live, relative to the source directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutConfig {
    /// Environment-declaration file
    #[serde(default = "default_envrc")]
    pub envrc: PathBuf,

    /// The tool's per-project cache directory
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Cached profile files inside `cache_dir`
    #[serde(default = "default_profile_glob")]
    pub profile_glob: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            envrc: default_envrc(),
            cache_dir: default_cache_dir(),
            profile_glob: default_profile_glob(),
        }
    }
}

fn default_program() -> String {
    "direnv".to_string()
}

fn default_force_env() -> String {
    "_nix_direnv_force_reload".to_string()
}

fn default_command() -> Vec<String> {
    vec!["true".to_string()]
}

fn default_envrc() -> PathBuf {
    PathBuf::from(".envrc")
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".direnv")
}

fn default_profile_glob() -> String {
    "*.rc".to_string()
}

impl ReloadConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ReloadConfig = toml::from_str(content)?;
        if config.direnv.command.is_empty() {
            anyhow::bail!("direnv.command must name at least one program");
        }
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
