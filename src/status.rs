//! Parsing of `git status -s` porcelain output.

/// One parsed line of short-format status output.
///
/// The two status characters come from the code space
/// `{' ', 'M', 'A', 'D', 'R', 'C', 'U', '?', '!'}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatusEntry {
    /// Status of the path relative to the staged snapshot (left column).
    pub index_state: char,
    /// Status of the path relative to the last commit (right column).
    pub worktree_state: char,
    pub path: String,
}

impl FileStatusEntry {
    /// A `U` in either column marks an unresolved conflict; such paths are
    /// routed to the unmerged set instead of the staged/unstaged lists.
    pub fn is_unmerged(&self) -> bool {
        self.index_state == 'U' || self.worktree_state == 'U'
    }
}

// "XY path": two status columns, one separator column, path from byte 3.
const PATH_OFFSET: usize = 3;

/// Parse raw short-format status output into entries, ordered by the raw
/// line (stable sort, so ties keep their input order).
///
/// Lines too short to carry a path are partial or blank output and are
/// dropped silently. Paths are trimmed but never unescaped; a path that
/// itself contains the column separator is a known upstream ambiguity.
pub fn parse_status(raw: &str) -> Vec<FileStatusEntry> {
    let mut lines: Vec<&str> = raw.lines().collect();
    lines.sort();
    lines.into_iter().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<FileStatusEntry> {
    let mut chars = line.chars();
    let index_state = chars.next()?;
    let worktree_state = chars.next()?;
    // get() rather than indexing: a multi-byte character in the status
    // columns would not land on a byte boundary at the fixed offset.
    let path = line.get(PATH_OFFSET..)?.trim();
    if path.is_empty() {
        return None;
    }
    Some(FileStatusEntry {
        index_state,
        worktree_state,
        path: path.to_string(),
    })
}

/// Display label for a status character, or `None` when the character has
/// no meaning in that column (`?`/`!` never appear staged; `A`/`R`/`C`
/// never appear unstaged; space and unknown characters produce no entry).
pub fn state_label(c: char, staged: bool) -> Option<&'static str> {
    match c {
        'M' => Some("Modified"),
        'D' => Some("Deleted"),
        'A' if staged => Some("Added"),
        'R' if staged => Some("Renamed"),
        'C' if staged => Some("Copied"),
        '?' if !staged => Some("Untracked"),
        '!' if !staged => Some("Ignored"),
        _ => None,
    }
}
