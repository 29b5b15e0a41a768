//! Blocking invocation of the external `git` executable.
//!
//! One `Runner` wraps one working directory. Every operation in the crate
//! funnels through [`Runner::run`], which enforces the preconditions that
//! keep the rest of the code simple: a verified repository directory, a
//! non-empty argument vector, and at most one child process in flight.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Captured result of a single git invocation.
///
/// Immutable once produced; consumed by the caller right away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Child exit code, or -1 if the child did not exit normally.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug)]
pub enum GitError {
    /// The working directory is not a verified git repository. Nothing was spawned.
    NoRepository(PathBuf),
    /// A command is already in flight on this runner. Nothing was spawned.
    Busy,
    /// Empty argument vector. Nothing was spawned.
    EmptyCommand,
    /// The git executable could not be started.
    Spawn(std::io::Error),
    /// git ran and exited with a non-zero (or abnormal, -1) code.
    CommandFailed { exit_code: i32, stderr: String },
}

impl std::fmt::Display for GitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitError::NoRepository(dir) => {
                write!(f, "{} is not a git repository", dir.display())
            }
            GitError::Busy => write!(f, "a git command is already running"),
            GitError::EmptyCommand => write!(f, "empty git command"),
            GitError::Spawn(e) => write!(f, "failed to start git: {}", e),
            GitError::CommandFailed { exit_code, stderr } => {
                let detail = stderr.trim();
                if detail.is_empty() {
                    write!(f, "git exited with code {}", exit_code)
                } else {
                    write!(f, "git exited with code {}: {}", exit_code, detail)
                }
            }
        }
    }
}

impl std::error::Error for GitError {}

/// Synchronous command runner bound to one repository directory.
///
/// Single-threaded by design: `run` blocks until the child exits, and a
/// second call made while one is outstanding (e.g. from a re-entrant
/// callback) is rejected without spawning rather than queued.
#[derive(Debug)]
pub struct Runner {
    dir: PathBuf,
    repo_valid: bool,
    busy: Cell<bool>,
}

impl Runner {
    /// Bind a runner to `dir` and probe whether it is a git repository.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let repo_valid = probe_repository(&dir);
        Self {
            dir,
            repo_valid,
            busy: Cell::new(false),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether the bound directory was verified to be a git repository.
    pub fn is_repository(&self) -> bool {
        self.repo_valid
    }

    /// Re-bind to a new directory, re-probing it. Returns the probe result.
    pub fn set_dir(&mut self, dir: impl Into<PathBuf>) -> bool {
        self.dir = dir.into();
        self.repo_valid = probe_repository(&self.dir);
        self.repo_valid
    }

    /// Run `git <args>`, blocking until the child exits.
    ///
    /// Precondition failures (`NoRepository`, `Busy`, `EmptyCommand`) are
    /// reported without spawning anything. A child killed by a signal is
    /// reported with the -1 sentinel exit code.
    pub fn run(&self, args: &[&str]) -> Result<CommandOutput, GitError> {
        if args.is_empty() {
            return Err(GitError::EmptyCommand);
        }
        if !self.repo_valid {
            return Err(GitError::NoRepository(self.dir.clone()));
        }
        if self.busy.get() {
            return Err(GitError::Busy);
        }

        self.busy.set(true);
        let result = self.spawn(args);
        self.busy.set(false);
        result
    }

    /// Like [`run`](Self::run), but a non-zero exit becomes
    /// `GitError::CommandFailed` carrying the captured stderr, and success
    /// yields stdout directly.
    pub fn run_ok(&self, args: &[&str]) -> Result<String, GitError> {
        let output = self.run(args)?;
        if !output.success() {
            return Err(GitError::CommandFailed {
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }
        Ok(output.stdout)
    }

    fn spawn(&self, args: &[&str]) -> Result<CommandOutput, GitError> {
        log::debug!("$ git {}", args.join(" "));

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .output()
            .map_err(GitError::Spawn)?;

        // No code means the child was terminated by a signal; normalize to
        // the -1 sentinel regardless of what the platform reports.
        let exit_code = output.status.code().unwrap_or(-1);

        Ok(CommandOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Check whether `dir` is inside a git repository.
///
/// This probe runs outside the repository gate; it is how the gate gets set.
fn probe_repository(dir: &Path) -> bool {
    Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .current_dir(dir)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
