use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Failures of the reload-and-restamp operation
#[derive(Error, Debug)]
pub enum ReloadError {
    /// The pinned source directory is gone (moved or deleted)
    #[error("Cannot find source directory {}", .0.display())]
    SourceDirMissing(PathBuf),

    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exec exited with {status}")]
    ToolFailed { program: String, status: ExitStatus },

    #[error("Failed to update timestamp of {}: {source}", path.display())]
    Timestamp {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid profile glob {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl ReloadError {
    /// The two lines shown to the user when the source directory is missing
    pub fn diagnostic(&self) -> Option<[String; 2]> {
        match self {
            ReloadError::SourceDirMissing(dir) => Some([
                format!(
                    "Cannot find source directory {}; did you move it?",
                    dir.display()
                ),
                "Cannot force reload with this tool - use \"direnv reload\" manually and then try again"
                    .to_string(),
            ]),
            _ => None,
        }
    }
}
