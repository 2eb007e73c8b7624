/// Acceptance tests for direnv-reload
///
/// These drive the built binary against a throwaway project and a fake
/// `direnv` script that records how it was invoked.
use assert_cmd::Command;
use filetime::FileTime;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const OLD: i64 = 1_000_000_000;

/// Helper to set up an isolated project with a fake direnv
struct TestProject {
    temp_dir: TempDir,
}

impl TestProject {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let project = Self { temp_dir };

        fs::create_dir_all(project.cache_dir()).unwrap();
        fs::create_dir_all(project.xdg_home()).unwrap();
        fs::write(project.envrc(), "use flake\n").unwrap();
        for name in ["flake-profile-x86.rc", "flake-profile-arm.rc", "flake-inputs"] {
            fs::write(project.cache_dir().join(name), "").unwrap();
        }
        for path in project.watched_files() {
            filetime::set_file_mtime(path, FileTime::from_unix_time(OLD, 0)).unwrap();
        }

        project.write_fake_direnv(0);
        project
    }

    fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    fn source_dir(&self) -> PathBuf {
        self.root().join("project")
    }

    fn envrc(&self) -> PathBuf {
        self.source_dir().join(".envrc")
    }

    fn cache_dir(&self) -> PathBuf {
        self.source_dir().join(".direnv")
    }

    fn xdg_home(&self) -> PathBuf {
        self.root().join("xdg")
    }

    fn fake_direnv(&self) -> PathBuf {
        self.root().join("bin").join("direnv")
    }

    fn invocation_log(&self) -> PathBuf {
        self.root().join("invocations.log")
    }

    fn watched_files(&self) -> Vec<PathBuf> {
        vec![
            self.envrc(),
            self.cache_dir().join("flake-profile-x86.rc"),
            self.cache_dir().join("flake-profile-arm.rc"),
            self.cache_dir().join("flake-inputs"),
        ]
    }

    fn write_fake_direnv(&self, exit_code: i32) {
        let script = self.fake_direnv();
        fs::create_dir_all(script.parent().unwrap()).unwrap();
        fs::write(
            &script,
            format!(
                "#!/bin/sh\necho \"force=${{_nix_direnv_force_reload:-unset}} $*\" >> '{}'\nexit {}\n",
                self.invocation_log().display(),
                exit_code
            ),
        )
        .unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    fn invocations(&self) -> Vec<String> {
        fs::read_to_string(self.invocation_log())
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn mtime(&self, path: &Path) -> FileTime {
        FileTime::from_last_modification_time(&fs::metadata(path).unwrap())
    }

    /// Binary isolated from the developer's own config and environment
    fn direnv_reload(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_direnv-reload"));
        cmd.current_dir(self.root())
            .env("XDG_CONFIG_HOME", self.xdg_home())
            .env("DIRENV_RELOAD_DIRENV", self.fake_direnv())
            .env_remove("DIRENV_RELOAD_SOURCE_DIR")
            .env_remove("DIRENV_RELOAD_CONFIG")
            .env_remove("RUST_LOG")
            .env_remove("DIRENV_RELOAD_LOG_FORMAT");
        cmd
    }
}

#[cfg(unix)]
#[test]
fn test_reload_succeeds_silently_and_restamps() {
    let project = TestProject::new();

    project
        .direnv_reload()
        .arg("--source-dir")
        .arg(project.source_dir())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(
        project.invocations(),
        vec![format!(
            "force=1 exec {} true",
            project.source_dir().display()
        )]
    );

    let stamp = project.mtime(&project.envrc());
    assert!(stamp > FileTime::from_unix_time(OLD, 0));
    assert_eq!(
        project.mtime(&project.cache_dir().join("flake-profile-x86.rc")),
        stamp
    );
    assert_eq!(
        project.mtime(&project.cache_dir().join("flake-profile-arm.rc")),
        stamp
    );
    assert_eq!(
        project.mtime(&project.cache_dir().join("flake-inputs")),
        FileTime::from_unix_time(OLD, 0)
    );
}

#[cfg(unix)]
#[test]
fn test_missing_directory_exits_one_with_two_lines() {
    let project = TestProject::new();
    let moved = project.root().join("moved-away");

    let output = project
        .direnv_reload()
        .arg("--source-dir")
        .arg(&moved)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Cannot find source directory"))
        .stdout(predicate::str::contains("direnv reload"))
        .stderr(predicate::str::is_empty())
        .get_output()
        .stdout
        .clone();

    assert_eq!(String::from_utf8(output).unwrap().lines().count(), 2);
    assert!(project.invocations().is_empty());
    for path in project.watched_files() {
        assert_eq!(project.mtime(&path), FileTime::from_unix_time(OLD, 0));
    }
}

#[cfg(unix)]
#[test]
fn test_piped_logs_carry_no_color_codes() {
    let project = TestProject::new();

    project
        .direnv_reload()
        .env("RUST_LOG", "info")
        .env("DIRENV_RELOAD_LOG_FORMAT", "pretty")
        .arg("--source-dir")
        .arg(project.source_dir())
        .assert()
        .success()
        .stderr(predicate::str::contains("(direnv-reload)"))
        .stderr(predicate::str::contains("\x1b[").not());
}

#[cfg(unix)]
#[test]
fn test_failing_direnv_leaves_timestamps_alone() {
    let project = TestProject::new();
    project.write_fake_direnv(3);

    project
        .direnv_reload()
        .arg("--source-dir")
        .arg(project.source_dir())
        .assert()
        .failure()
        .stderr(predicate::str::contains("exec exited with"));

    assert_eq!(project.invocations().len(), 1);
    for path in project.watched_files() {
        assert_eq!(project.mtime(&path), FileTime::from_unix_time(OLD, 0));
    }
}

#[cfg(unix)]
#[test]
fn test_init_pins_directory_for_later_runs() {
    let project = TestProject::new();

    project
        .direnv_reload()
        .arg("init")
        .arg("--dir")
        .arg(project.source_dir())
        .assert()
        .success()
        .stdout(predicate::str::contains("Pinned"));

    assert!(project.source_dir().join("direnv-reload.toml").is_file());

    // A run from a subdirectory discovers the pinned project
    let nested = project.source_dir().join("src");
    fs::create_dir_all(&nested).unwrap();
    project
        .direnv_reload()
        .current_dir(&nested)
        .assert()
        .success();

    let pinned = project.source_dir().canonicalize().unwrap();
    assert_eq!(
        project.invocations(),
        vec![format!("force=1 exec {} true", pinned.display())]
    );

    // Second init without --force refuses to overwrite
    project
        .direnv_reload()
        .arg("init")
        .arg("--dir")
        .arg(project.source_dir())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[cfg(unix)]
#[test]
fn test_pinned_directory_that_moved_is_reported() {
    let project = TestProject::new();
    let config = project.root().join("reload.toml");
    fs::write(
        &config,
        format!(
            "source_dir = \"{}\"\n",
            project.root().join("old-location").display()
        ),
    )
    .unwrap();

    project
        .direnv_reload()
        .arg("--config")
        .arg(&config)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("old-location"));

    assert!(project.invocations().is_empty());
}

#[cfg(unix)]
#[test]
fn test_doctor_reports_setup() {
    let project = TestProject::new();

    project
        .direnv_reload()
        .arg("doctor")
        .arg("--source-dir")
        .arg(project.source_dir())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 profile file(s)"))
        .stdout(predicate::str::contains("All checks passed"));
}

#[test]
fn test_doctor_fails_for_missing_directory() {
    let project = TestProject::new();

    project
        .direnv_reload()
        .arg("doctor")
        .arg("--source-dir")
        .arg(project.root().join("gone"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Source directory missing"));
}
