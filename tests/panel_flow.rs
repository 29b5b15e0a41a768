mod common;

use common::TestRepo;
use gitpanel::git::{GitError, Runner};
use gitpanel::ops::Panel;

#[test]
fn status_reflects_worktree_and_index() {
    let repo = TestRepo::with_initial_commit();
    let mut panel = Panel::open(repo.root_path());
    assert!(panel.is_repository());

    repo.write_file("file.txt", "changed\n");
    repo.write_file("new.txt", "brand new\n");

    panel.refresh_status().unwrap();
    assert!(panel.lists.unstaged.contains("Modified : file.txt"));
    assert!(panel.lists.unstaged.contains("Untracked : new.txt"));
    assert!(panel.lists.staged.is_empty());
    assert!(!panel.commit_available());
}

#[test]
fn add_commit_reset_round_trip() {
    let repo = TestRepo::with_initial_commit();
    let mut panel = Panel::open(repo.root_path());

    repo.write_file("new.txt", "brand new\n");
    panel.add(&["new.txt".to_string()]).unwrap();
    assert!(panel.lists.staged.contains("Added : new.txt"));
    assert!(panel.commit_available());

    panel.reset(&["new.txt".to_string()]).unwrap();
    assert!(panel.lists.staged.is_empty());
    assert!(panel.lists.unstaged.contains("Untracked : new.txt"));

    // Empty selection stages everything
    panel.add(&[]).unwrap();
    assert!(panel.lists.staged.contains("Added : new.txt"));

    panel.commit("add new file").unwrap();
    assert!(panel.lists.staged.is_empty());
    assert_eq!(panel.last_commit_subject().unwrap(), "add new file");
}

#[test]
fn blank_commit_message_falls_back_to_default() {
    let repo = TestRepo::with_initial_commit();
    let mut panel = Panel::open(repo.root_path());

    repo.write_file("file.txt", "changed\n");
    panel.add(&[]).unwrap();
    panel.commit("   ").unwrap();
    assert_eq!(
        panel.last_commit_subject().unwrap(),
        gitpanel::ops::DEFAULT_COMMIT_MESSAGE
    );
}

#[test]
fn selection_survives_refresh_while_other_files_change() {
    let repo = TestRepo::with_initial_commit();
    let mut panel = Panel::open(repo.root_path());

    repo.write_file("file.txt", "changed\n");
    panel.refresh_status().unwrap();
    assert!(panel.lists.unstaged.select("Modified : file.txt"));

    // A new file appearing must not disturb the existing selection
    repo.write_file("other.txt", "hello\n");
    panel.refresh_status().unwrap();
    assert_eq!(
        panel.lists.unstaged.selected_labels(),
        vec!["Modified : file.txt"]
    );
    assert!(panel.lists.unstaged.contains("Untracked : other.txt"));

    // Staging the selected file moves it out; the selection is dropped
    panel.add(&["file.txt".to_string()]).unwrap();
    assert!(panel.lists.unstaged.selected_labels().is_empty());
    assert!(panel.lists.staged.contains("Modified : file.txt"));
}

#[test]
fn checkout_discards_selected_changes_only() {
    let repo = TestRepo::with_initial_commit();
    let mut panel = Panel::open(repo.root_path());

    repo.write_file("file.txt", "changed\n");
    panel.refresh_status().unwrap();

    // Empty selection is a no-op
    panel.checkout_paths(&[]).unwrap();
    assert!(panel.lists.unstaged.contains("Modified : file.txt"));

    panel.checkout_paths(&["file.txt".to_string()]).unwrap();
    assert!(panel.lists.unstaged.is_empty());
}

#[test]
fn stash_and_pop_cycle() {
    let repo = TestRepo::with_initial_commit();
    let mut panel = Panel::open(repo.root_path());

    assert!(!panel.has_stash().unwrap());

    repo.write_file("file.txt", "changed\n");
    panel.stash().unwrap();
    assert!(panel.has_stash().unwrap());
    assert!(panel.lists.unstaged.is_empty());

    panel.stash_pop().unwrap();
    assert!(!panel.has_stash().unwrap());
    assert!(panel.lists.unstaged.contains("Modified : file.txt"));
}

#[test]
fn custom_command_honors_quoting() {
    let repo = TestRepo::with_initial_commit();
    let mut panel = Panel::open(repo.root_path());

    panel
        .run_custom("commit --allow-empty -m \"two words\"")
        .unwrap();
    assert_eq!(panel.last_commit_subject().unwrap(), "two words");
}

#[test]
fn runner_rejects_non_repository_directory() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut runner = Runner::open(dir.path());
    assert!(!runner.is_repository());
    assert!(matches!(
        runner.run(&["status"]),
        Err(GitError::NoRepository(_))
    ));

    // Re-pointing at a real repository opens the gate
    let repo = TestRepo::with_initial_commit();
    assert!(runner.set_dir(repo.root_path()));
    let output = runner.run(&["status", "-s"]).unwrap();
    assert!(output.success());
    assert_eq!(output.exit_code, 0);
}

#[test]
fn runner_reports_command_failure_with_stderr() {
    let repo = TestRepo::with_initial_commit();
    let runner = Runner::open(repo.root_path());

    let err = runner
        .run_ok(&["rev-parse", "--verify", "no-such-ref"])
        .unwrap_err();
    match err {
        GitError::CommandFailed { exit_code, stderr } => {
            assert_ne!(exit_code, 0);
            assert!(!stderr.is_empty());
        }
        other => panic!("expected CommandFailed, got {:?}", other),
    }
}

#[test]
fn unmerged_files_route_to_the_conflict_set() {
    let repo = TestRepo::with_initial_commit();

    // Build a genuine conflict: two branches touching the same line
    repo.git(&["checkout", "-b", "feature"]);
    repo.write_file("file.txt", "feature change\n");
    repo.git(&["commit", "-am", "feature change"]);
    repo.git(&["checkout", "main"]);
    repo.write_file("file.txt", "main change\n");
    repo.git(&["commit", "-am", "main change"]);

    let mut panel = Panel::open(repo.root_path());
    let merge_result = panel.merge("feature");
    assert!(merge_result.is_err(), "merge should conflict");

    panel.refresh_status().unwrap();
    assert_eq!(panel.lists.unmerged, vec!["file.txt"]);
    assert!(panel.lists.staged.is_empty());
    assert!(panel.lists.unstaged.is_empty());
}
