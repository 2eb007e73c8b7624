//! Force-reload and restamp a direnv-managed project
//!
//! The operation runs in three ordered steps:
//!
//! 1. The external tool rebuilds its cached environment (`direnv exec` with the
//!    force variable set).
//! 2. The environment-declaration file (`.envrc`) is touched, so direnv notices
//!    a change and reloads once more, this time from the fresh cache.
//! 3. The declaration file's new timestamps are copied onto every cached
//!    profile file, so the cache layer's staleness check sees them as current
//!    and skips a second rebuild.
//!
//! Nothing is touched unless the previous step succeeded.

use filetime::FileTime;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

use crate::error::ReloadError;
use crate::logging::{operations, status};

/// Everything needed to reload one project
#[derive(Debug, Clone, PartialEq)]
pub struct ReloadPlan {
    pub source_dir: PathBuf,
    pub envrc: PathBuf,
    pub cache_dir: PathBuf,
    pub profile_glob: String,
    pub program: String,
    pub force_env: String,
    pub command: Vec<String>,
}

/// Result of a successful reload
#[derive(Debug, Clone)]
pub struct ReloadOutcome {
    /// Modification time written to the declaration file
    pub stamp: FileTime,
    /// Profile files that received the same timestamp
    pub restamped: Vec<PathBuf>,
}

/// The external environment-caching tool
pub trait EnvTool {
    /// Discard and rebuild the cached environment for `plan.source_dir`
    fn force_rebuild(&self, plan: &ReloadPlan) -> Result<(), ReloadError>;
}

/// Runs `<program> exec <source_dir> <command...>` with the force variable set
#[derive(Debug, Default, Clone, Copy)]
pub struct Direnv;

impl EnvTool for Direnv {
    fn force_rebuild(&self, plan: &ReloadPlan) -> Result<(), ReloadError> {
        let status = Command::new(&plan.program)
            .arg("exec")
            .arg(&plan.source_dir)
            .args(&plan.command)
            .env(&plan.force_env, "1")
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| ReloadError::Spawn {
                program: plan.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(ReloadError::ToolFailed {
                program: plan.program.clone(),
                status,
            });
        }

        Ok(())
    }
}

/// Run the full reload-and-restamp sequence
pub fn reload(plan: &ReloadPlan, tool: &dyn EnvTool) -> Result<ReloadOutcome, ReloadError> {
    if !plan.source_dir.is_dir() {
        // The caller prints the user-facing diagnostic
        debug!(
            operation = operations::CHECK,
            status = status::MISSING,
            path = %plan.source_dir.display(),
            "source directory not found"
        );
        return Err(ReloadError::SourceDirMissing(plan.source_dir.clone()));
    }

    info!(
        operation = operations::FORCE_REBUILD,
        path = %plan.source_dir.display(),
        program = %plan.program,
        "rebuilding cached environment"
    );
    tool.force_rebuild(plan)?;

    let stamp = touch(&plan.envrc)?;
    info!(
        operation = operations::TOUCH,
        status = status::SUCCESS,
        path = %plan.envrc.display(),
        mtime = stamp.unix_seconds(),
        "declaration file touched"
    );

    let restamped = restamp_profiles(&plan.cache_dir, &plan.profile_glob, &plan.envrc)?;
    info!(
        operation = operations::RESTAMP,
        status = status::SUCCESS,
        count = restamped.len(),
        "profile files restamped"
    );

    Ok(ReloadOutcome { stamp, restamped })
}

/// Set access and modification time to now, creating the file if needed
///
/// The new modification time is always later than the previous one.
fn touch(path: &Path) -> Result<FileTime, ReloadError> {
    let previous = match fs::metadata(path) {
        Ok(meta) => Some(FileTime::from_last_modification_time(&meta)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| timestamp_error(path, source))?;
            None
        }
        Err(source) => return Err(timestamp_error(path, source)),
    };

    advance_stamp(FileTime::now(), previous, |candidate| {
        filetime::set_file_times(path, candidate, candidate)?;
        let meta = fs::metadata(path)?;
        Ok(FileTime::from_last_modification_time(&meta))
    })
    .map_err(|source| timestamp_error(path, source))
}

/// Attempts before accepting a stored time that did not advance
const MAX_STAMP_ATTEMPTS: usize = 4;

/// Store a timestamp later than `previous`, as the filesystem records it
///
/// `store` writes a candidate and returns the value read back. Filesystems
/// truncate to their own resolution (1 s, 2 s on FAT), so a candidate that
/// lands on or before `previous` is retried at the next whole second.
fn advance_stamp<F>(
    now: FileTime,
    previous: Option<FileTime>,
    mut store: F,
) -> io::Result<FileTime>
where
    F: FnMut(FileTime) -> io::Result<FileTime>,
{
    let mut candidate = next_stamp(now, previous);
    let mut stored = store(candidate)?;

    if let Some(prev) = previous {
        for _ in 1..MAX_STAMP_ATTEMPTS {
            if stored > prev {
                break;
            }
            let floor = candidate.unix_seconds().max(prev.unix_seconds());
            candidate = FileTime::from_unix_time(floor + 1, 0);
            stored = store(candidate)?;
        }
    }

    Ok(stored)
}

fn next_stamp(now: FileTime, previous: Option<FileTime>) -> FileTime {
    match previous {
        Some(prev) if now <= prev => FileTime::from_unix_time(prev.unix_seconds() + 1, 0),
        _ => now,
    }
}

/// Copy the reference file's timestamps onto every matching profile file
fn restamp_profiles(
    cache_dir: &Path,
    profile_glob: &str,
    reference: &Path,
) -> Result<Vec<PathBuf>, ReloadError> {
    let meta = fs::metadata(reference).map_err(|source| timestamp_error(reference, source))?;
    let atime = FileTime::from_last_access_time(&meta);
    let mtime = FileTime::from_last_modification_time(&meta);

    let mut restamped = Vec::new();
    for path in profile_files(cache_dir, profile_glob)? {
        filetime::set_file_times(&path, atime, mtime)
            .map_err(|source| timestamp_error(&path, source))?;
        debug!(path = %path.display(), "restamped");
        restamped.push(path);
    }

    Ok(restamped)
}

/// Regular files in `cache_dir` matching `profile_glob`
///
/// A missing cache directory yields no files.
pub fn profile_files(cache_dir: &Path, profile_glob: &str) -> Result<Vec<PathBuf>, ReloadError> {
    if !cache_dir.is_dir() {
        debug!(
            operation = operations::RESTAMP,
            status = status::MISSING,
            path = %cache_dir.display(),
            "no cache directory"
        );
        return Ok(Vec::new());
    }

    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&cache_dir.to_string_lossy()),
        profile_glob
    );
    let entries = glob::glob(&pattern).map_err(|source| ReloadError::Pattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            timestamp_error(&path, e.into_error())
        })?;
        if path.is_file() {
            files.push(path);
        }
    }

    Ok(files)
}

fn timestamp_error(path: &Path, source: io::Error) -> ReloadError {
    ReloadError::Timestamp {
        path: path.to_path_buf(),
        source,
    }
}
