//! Panel operations.
//!
//! Builds the git argument vector for each user action, runs it through the
//! [`Runner`], and drives the follow-up refresh of the affected lists. A
//! failed command surfaces its captured stderr and skips the refresh step.

use anyhow::{Context, Result, bail};

use crate::git::Runner;
use crate::panel::StatusLists;
use crate::refname::{current_from_branch_lines, normalize_ref_lines, validate_ref_name};
use crate::status::parse_status;

/// Fallback message when the user commits without one.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Commit without message";

/// Attempts for the read-only list re-reads that follow a mutating ref
/// operation. Bounded so a persistently failing query reports instead of
/// looping forever.
const LIST_RETRY_LIMIT: u32 = 3;

/// The headless staging panel: one runner plus all the list state a
/// front-end renders.
#[derive(Debug)]
pub struct Panel {
    runner: Runner,
    pub lists: StatusLists,
    /// Amend-in-progress flag; keeps commit available with an empty staged list.
    pub amend: bool,
    pub branches: Vec<String>,
    pub current_branch: Option<String>,
    pub tags: Vec<String>,
    pub remotes: Vec<String>,
}

impl Panel {
    pub fn open(dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            runner: Runner::open(dir),
            lists: StatusLists::default(),
            amend: false,
            branches: Vec::new(),
            current_branch: None,
            tags: Vec::new(),
            remotes: Vec::new(),
        }
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    pub fn is_repository(&self) -> bool {
        self.runner.is_repository()
    }

    pub fn commit_available(&self) -> bool {
        self.lists.commit_available(self.amend)
    }

    // ----- refresh pipeline -----

    /// Re-read `git status -s` and converge the staged/unstaged/unmerged lists.
    pub fn refresh_status(&mut self) -> Result<()> {
        let out = self.runner.run_ok(&["status", "-s"])?;
        self.lists.reconcile(&parse_status(&out));
        Ok(())
    }

    pub fn refresh_branches(&mut self) -> Result<()> {
        let out = self.runner.run_ok(&["branch"])?;
        self.current_branch = current_from_branch_lines(&out);
        self.branches = normalize_ref_lines(&out);
        Ok(())
    }

    pub fn refresh_tags(&mut self) -> Result<()> {
        let out = self.runner.run_ok(&["tag"])?;
        self.tags = normalize_ref_lines(&out);
        Ok(())
    }

    pub fn refresh_remotes(&mut self) -> Result<()> {
        let out = self.runner.run_ok(&["remote"])?;
        self.remotes = normalize_ref_lines(&out);
        Ok(())
    }

    pub fn refresh_all(&mut self) -> Result<()> {
        self.refresh_branches()?;
        self.refresh_status()?;
        self.refresh_remotes()
    }

    // ----- staging actions -----

    /// Stage the given paths, or everything when the selection is empty.
    pub fn add(&mut self, paths: &[String]) -> Result<()> {
        log::info!("add {} path(s)", paths.len());
        if paths.is_empty() {
            self.runner.run_ok(&["add", "."])?;
        } else {
            let mut args = vec!["add"];
            args.extend(paths.iter().map(String::as_str));
            self.runner.run_ok(&args)?;
        }
        self.refresh_status()
    }

    /// Unstage the given paths, or everything when the selection is empty.
    pub fn reset(&mut self, paths: &[String]) -> Result<()> {
        log::info!("reset {} path(s)", paths.len());
        if paths.is_empty() {
            self.runner.run_ok(&["reset", "HEAD"])?;
        } else {
            let mut args = vec!["reset"];
            args.extend(paths.iter().map(String::as_str));
            self.runner.run_ok(&args)?;
        }
        self.refresh_status()
    }

    /// Discard working-tree changes to the given paths. Destructive, so an
    /// empty selection is a no-op rather than "everything"; the front-end is
    /// expected to confirm before calling.
    pub fn checkout_paths(&mut self, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        log::info!("checkout -- {} path(s)", paths.len());
        let mut args = vec!["checkout", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.runner.run_ok(&args)?;
        self.refresh_status()
    }

    /// Commit the staged changes. A blank message falls back to
    /// [`DEFAULT_COMMIT_MESSAGE`]; `--amend` is added while the amend flag
    /// is set, and the flag is cleared on success.
    pub fn commit(&mut self, message: &str) -> Result<()> {
        let message = message.trim();
        let message = if message.is_empty() {
            DEFAULT_COMMIT_MESSAGE
        } else {
            message
        };
        log::info!("commit (amend: {})", self.amend);

        let mut args = vec!["commit"];
        if self.amend {
            args.push("--amend");
        }
        args.push("-m");
        args.push(message);

        self.runner.run_ok(&args)?;
        self.amend = false;
        self.refresh_status()
    }

    /// Subject line of the last commit, used to prefill an amend message.
    pub fn last_commit_subject(&self) -> Result<String> {
        let out = self.runner.run_ok(&["log", "-n1", "--pretty=format:%s"])?;
        Ok(out.trim().to_string())
    }

    // ----- stash -----

    pub fn stash(&mut self) -> Result<()> {
        self.runner.run_ok(&["stash"])?;
        self.refresh_status()
    }

    pub fn stash_pop(&mut self) -> Result<()> {
        self.runner.run_ok(&["stash", "pop"])?;
        self.refresh_status()
    }

    pub fn has_stash(&self) -> Result<bool> {
        let out = self.runner.run_ok(&["stash", "list"])?;
        Ok(!out.trim().is_empty())
    }

    // ----- remote interaction -----

    pub fn push(&mut self, remote: &str, branch: &str) -> Result<()> {
        self.runner.run_ok(&["push", remote, branch])?;
        Ok(())
    }

    pub fn fetch(&mut self, remote: &str) -> Result<()> {
        self.runner.run_ok(&["fetch", remote])?;
        Ok(())
    }

    pub fn rebase(&mut self) -> Result<()> {
        self.runner.run_ok(&["rebase"])?;
        self.refresh_status()
    }

    pub fn merge(&mut self, branch: &str) -> Result<()> {
        self.runner.run_ok(&["merge", branch])?;
        self.refresh_status()
    }

    pub fn switch(&mut self, branch: &str) -> Result<()> {
        self.runner.run_ok(&["checkout", branch])?;
        self.refresh_branches()
    }

    // ----- branch management -----

    pub fn create_branch(&mut self, name: &str) -> Result<()> {
        validate_ref_name(name)?;
        self.runner.run_ok(&["branch", name])?;
        self.reload_branches()
    }

    pub fn rename_branch(&mut self, from: &str, to: &str) -> Result<()> {
        validate_ref_name(to)?;
        self.runner.run_ok(&["branch", "-m", from, to])?;
        self.reload_branches()
    }

    pub fn copy_branch(&mut self, from: &str, to: &str) -> Result<()> {
        validate_ref_name(to)?;
        self.runner.run_ok(&["branch", "-c", from, to])?;
        self.reload_branches()
    }

    pub fn delete_branch(&mut self, name: &str) -> Result<()> {
        self.runner.run_ok(&["branch", "-d", name])?;
        self.reload_branches()
    }

    fn reload_branches(&mut self) -> Result<()> {
        with_retry(LIST_RETRY_LIMIT, "branch list", || {
            let out = self.runner.run_ok(&["branch"])?;
            Ok(out)
        })
        .map(|out| {
            self.current_branch = current_from_branch_lines(&out);
            self.branches = normalize_ref_lines(&out);
        })
    }

    // ----- tag management -----

    pub fn create_tag(&mut self, name: &str) -> Result<()> {
        validate_ref_name(name)?;
        self.runner.run_ok(&["tag", name])?;
        self.reload_tags()
    }

    pub fn delete_tag(&mut self, name: &str) -> Result<()> {
        self.runner.run_ok(&["tag", "-d", name])?;
        self.reload_tags()
    }

    pub fn push_tags(&mut self, remote: &str) -> Result<()> {
        self.runner.run_ok(&["push", remote, "--tags"])?;
        Ok(())
    }

    fn reload_tags(&mut self) -> Result<()> {
        with_retry(LIST_RETRY_LIMIT, "tag list", || {
            let out = self.runner.run_ok(&["tag"])?;
            Ok(out)
        })
        .map(|out| {
            self.tags = normalize_ref_lines(&out);
        })
    }

    // ----- free-form command -----

    /// Run an arbitrary git command line, then refresh everything. The line
    /// is split with shell-style quoting rules; unbalanced quotes are
    /// rejected before anything is spawned.
    pub fn run_custom(&mut self, line: &str) -> Result<()> {
        let Some(words) = shlex::split(line) else {
            bail!("unbalanced quotes in command: {line}");
        };
        if words.is_empty() {
            bail!("empty command");
        }
        let args: Vec<&str> = words.iter().map(String::as_str).collect();
        self.runner.run_ok(&args)?;
        self.refresh_all()
    }
}

/// Retry a read-only query up to `limit` times, reporting the final failure
/// instead of looping forever.
fn with_retry<T>(limit: u32, what: &str, mut attempt: impl FnMut() -> Result<T>) -> Result<T> {
    let mut tries = 0;
    loop {
        tries += 1;
        match attempt() {
            Ok(value) => return Ok(value),
            Err(err) if tries < limit => {
                log::warn!("{what} refresh attempt {tries}/{limit} failed: {err:#}");
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("{what} refresh failed after {tries} attempts"));
            }
        }
    }
}
