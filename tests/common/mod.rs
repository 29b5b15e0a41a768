use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// A throwaway git repository for exercising the panel end to end.
pub struct TestRepo {
    // Held for its Drop; the directory disappears with the fixture.
    _temp_dir: TempDir,
    root: PathBuf,
}

impl TestRepo {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp directory");
        // Canonicalize to resolve symlinks (on macOS /var points into /private/var)
        let root = temp_dir
            .path()
            .canonicalize()
            .expect("failed to canonicalize temp path");

        let repo = Self {
            _temp_dir: temp_dir,
            root,
        };

        repo.git(&["init", "-b", "main"]);
        // Local config so commits work regardless of the user's global setup
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo
    }

    /// A repository with one initial commit, the usual starting point.
    pub fn with_initial_commit() -> Self {
        let repo = Self::new();
        repo.write_file("file.txt", "initial content\n");
        repo.git(&["add", "."]);
        repo.git(&["commit", "-m", "initial commit"]);
        repo
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    pub fn write_file(&self, name: &str, contents: &str) {
        std::fs::write(self.root.join(name), contents).expect("failed to write file");
    }

    /// Run git directly (fixture setup only; the code under test goes
    /// through the library).
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .expect("failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed:\nstdout: {}\nstderr: {}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }
}
