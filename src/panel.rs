//! Display-list state for the staging panel.
//!
//! The lists are mutated in place rather than rebuilt on each refresh: a
//! front-end keeps its widget identities (and therefore the user's current
//! selection) for every entry that survives a reconcile, and only the
//! entries that actually changed are inserted or removed.

use crate::status::{FileStatusEntry, state_label};

/// One displayed row: a `"<StateLabel> : <path>"` label plus its selection flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub label: String,
    pub selected: bool,
}

/// Ordered list of labels with a selected subset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileList {
    entries: Vec<ListEntry>,
}

impl FileList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ListEntry> {
        self.entries.iter()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|e| e.label == label)
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.label.clone()).collect()
    }

    pub fn selected_labels(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.label.clone())
            .collect()
    }

    /// Paths of the selected entries, for building git argument vectors.
    pub fn selected_paths(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.selected)
            .map(|e| entry_path(&e.label).to_string())
            .collect()
    }

    /// Mark the entry with this exact label selected. Returns whether it exists.
    pub fn select(&mut self, label: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.label == label) {
            Some(entry) => {
                entry.selected = true;
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        for entry in &mut self.entries {
            entry.selected = false;
        }
    }

    /// Converge this list onto `target` by exact label equality: labels in
    /// `target` but not here are appended (unselected), labels here but not
    /// in `target` are removed, intersecting entries keep their selection.
    /// The list is re-sorted alphabetically afterwards.
    fn converge(&mut self, target: &[String]) {
        self.entries.retain(|e| target.contains(&e.label));
        for label in target {
            if !self.contains(label) {
                self.entries.push(ListEntry {
                    label: label.clone(),
                    selected: false,
                });
            }
        }
        self.entries.sort_by(|a, b| a.label.cmp(&b.label));
    }
}

/// Build the display label for a state/path pair.
pub fn format_label(state: &str, path: &str) -> String {
    format!("{} : {}", state, path)
}

/// Recover the path from a display label. A path containing the separator
/// sequence itself is ambiguous; the text after the first separator wins.
pub fn entry_path(label: &str) -> &str {
    label
        .split_once(" : ")
        .map(|(_, path)| path.trim())
        .unwrap_or(label)
}

/// The staged/unstaged/unmerged state of the panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLists {
    pub staged: FileList,
    pub unstaged: FileList,
    /// Conflicted paths needing manual resolution; rebuilt on every reconcile.
    pub unmerged: Vec<String>,
}

impl StatusLists {
    /// Converge both lists onto freshly parsed status entries.
    ///
    /// A path with a `U` in either column goes exclusively to the unmerged
    /// set. Every other entry contributes a staged label from its index
    /// character and an unstaged label from its worktree character
    /// independently, so a partially staged path appears in both lists.
    pub fn reconcile(&mut self, entries: &[FileStatusEntry]) {
        self.unmerged.clear();

        let mut staged_target = Vec::new();
        let mut unstaged_target = Vec::new();

        for entry in entries {
            if entry.is_unmerged() {
                self.unmerged.push(entry.path.clone());
                continue;
            }
            if let Some(label) = state_label(entry.index_state, true) {
                staged_target.push(format_label(label, &entry.path));
            }
            if let Some(label) = state_label(entry.worktree_state, false) {
                unstaged_target.push(format_label(label, &entry.path));
            }
        }

        self.staged.converge(&staged_target);
        self.unstaged.converge(&unstaged_target);
    }

    /// Commit is unavailable exactly when the staged list is empty and no
    /// amend is in progress.
    pub fn commit_available(&self, amend: bool) -> bool {
        amend || !self.staged.is_empty()
    }
}
