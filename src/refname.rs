//! Branch/tag list cleanup and ref-name validation.
//!
//! `git branch` and `git tag` listings go through the same normalization;
//! names for create/rename/copy requests are validated locally against the
//! ref-naming restrictions before any command is forwarded.

/// Why a proposed ref name was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRefName {
    pub name: String,
    pub reason: &'static str,
}

impl std::fmt::Display for InvalidRefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid ref name `{}`: {}", self.name, self.reason)
    }
}

impl std::error::Error for InvalidRefName {}

/// Clean up a raw `git branch`/`git tag` listing: blank lines dropped, the
/// current-branch `*` marker stripped, internal whitespace collapsed.
pub fn normalize_ref_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            let line = line.strip_prefix("* ").unwrap_or(line);
            Some(collapse_whitespace(line))
        })
        .collect()
}

/// The name carried on the `*` line of a `git branch` listing, if any.
pub fn current_from_branch_lines(raw: &str) -> Option<String> {
    raw.lines()
        .find_map(|line| line.trim().strip_prefix("* ").map(collapse_whitespace))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

const FORBIDDEN_CHARS: [char; 7] = ['~', '^', ':', '\\', '?', '[', '*'];

/// Validate a branch/tag name against git's ref-naming restrictions.
///
/// The whole-name rules cover the first and last characters; the
/// per-character scan covers only the interior ones.
pub fn validate_ref_name(name: &str) -> Result<(), InvalidRefName> {
    let fail = |reason: &'static str| {
        Err(InvalidRefName {
            name: name.to_string(),
            reason,
        })
    };

    if name.is_empty() {
        return fail("empty name");
    }
    if name.contains("..") {
        return fail("contains `..`");
    }
    if name.ends_with(".lock") {
        return fail("ends with `.lock`");
    }
    if name.ends_with('/') {
        return fail("ends with `/`");
    }
    if name.contains("/.") {
        return fail("contains `/.`");
    }
    if name.starts_with('.') {
        return fail("starts with `.`");
    }
    if name.contains("@{") {
        return fail("contains `@{`");
    }

    let chars: Vec<char> = name.chars().collect();
    let interior = chars.iter().skip(1).take(chars.len().saturating_sub(2));
    for &c in interior {
        if c <= ' ' || FORBIDDEN_CHARS.contains(&c) {
            return fail("contains a forbidden character");
        }
    }

    Ok(())
}
