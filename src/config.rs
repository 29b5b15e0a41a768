//! Persisted panel settings.
//!
//! A flat `key=value` file, one pair per line: the last-used repository
//! directory, the auto-refresh flag, and the refresh interval in seconds.
//! Read at startup, written back at shutdown. The format is kept
//! byte-compatible with the file the original front-end wrote.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const KEY_REPO_DIR: &str = "git-dir";
const KEY_AUTO_REFRESH: &str = "timer-enable";
const KEY_REFRESH_SECS: &str = "timer-seconds";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub repo_dir: PathBuf,
    pub auto_refresh: bool,
    /// Refresh interval in seconds, floor-clamped to 1.
    pub refresh_secs: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            repo_dir: PathBuf::from("."),
            auto_refresh: false,
            refresh_secs: 1,
        }
    }
}

impl Settings {
    /// Default settings file location, under the user config directory when
    /// one exists, otherwise next to the working directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("gitpanel").join("gitpanel.conf"))
            .unwrap_or_else(|| PathBuf::from("gitpanel.conf"))
    }

    /// Load settings from `path`. A missing file is seeded with the defaults
    /// (first run), matching the original behavior.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let settings = Self::default();
            settings.save(path)?;
            return Ok(settings);
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Ok(Self::parse(&text))
    }

    /// Parse the key=value body. Lines without `=` and unknown keys are
    /// ignored; values are trimmed; a bad interval falls back to 1.
    fn parse(text: &str) -> Self {
        let mut settings = Self::default();
        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            match key {
                KEY_REPO_DIR => settings.repo_dir = PathBuf::from(value),
                KEY_AUTO_REFRESH => settings.auto_refresh = value == "true",
                KEY_REFRESH_SECS => {
                    settings.refresh_secs = value.parse().unwrap_or(1).max(1);
                }
                _ => {}
            }
        }
        settings
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create settings directory {}", parent.display())
                })?;
            }
        }
        let body = format!(
            "{}={}\n{}={}\n{}={}\n",
            KEY_REPO_DIR,
            self.repo_dir.display(),
            KEY_AUTO_REFRESH,
            if self.auto_refresh { "true" } else { "false" },
            KEY_REFRESH_SECS,
            self.refresh_secs,
        );
        fs::write(path, body)
            .with_context(|| format!("failed to write settings file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.repo_dir, PathBuf::from("."));
        assert!(!settings.auto_refresh);
        assert_eq!(settings.refresh_secs, 1);
    }

    #[test]
    fn round_trips_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gitpanel.conf");

        let settings = Settings {
            repo_dir: PathBuf::from("/work/repo"),
            auto_refresh: true,
            refresh_secs: 30,
        };
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn missing_file_is_seeded_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fresh.conf");

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, Settings::default());
        assert!(path.exists());
    }

    #[test]
    fn interval_floor_clamped_to_one() {
        let settings = Settings::parse("timer-seconds=0\n");
        assert_eq!(settings.refresh_secs, 1);

        let settings = Settings::parse("timer-seconds=-5\n");
        assert_eq!(settings.refresh_secs, 1);

        let settings = Settings::parse("timer-seconds=garbage\n");
        assert_eq!(settings.refresh_secs, 1);
    }

    #[test]
    fn unknown_keys_and_malformed_lines_ignored() {
        let settings = Settings::parse(
            "color=blue\nno equals sign here\ngit-dir=/repo\n  timer-enable = true \n",
        );
        assert_eq!(settings.repo_dir, PathBuf::from("/repo"));
        assert!(settings.auto_refresh);
    }

    #[test]
    fn non_true_flag_values_read_as_false() {
        assert!(!Settings::parse("timer-enable=yes\n").auto_refresh);
        assert!(!Settings::parse("timer-enable=True\n").auto_refresh);
    }
}
