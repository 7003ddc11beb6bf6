//! Backup management for copies of a workbook taken before it is overwritten.

use crate::error::Res;
use crate::{utils, Config};
use anyhow::Context;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Manages backup file creation and rotation.
///
/// The `Backup` struct is immutable and owns copies of the paths and settings it needs.
/// Create a new instance via `Config::backup()` or `Backup::new()`.
#[derive(Debug, Clone)]
pub struct Backup {
    backups_dir: PathBuf,
    backup_copies: u32,
}

impl Backup {
    /// Creates a new `Backup` instance from a `Config`.
    pub fn new(config: &Config) -> Self {
        Self {
            backups_dir: config.backups().to_path_buf(),
            backup_copies: config.backup_copies(),
        }
    }

    /// Copies the workbook at `path` into the backups directory, if it exists.
    ///
    /// The filename format is `{stem}.YYYY-MM-DD-NNN.{ext}` where NNN is a sequence number.
    /// Automatically rotates old backups, keeping only `backup_copies` files per stem.
    ///
    /// Returns the path to the created backup file, or `None` when there was nothing to copy.
    pub fn save_copy(&self, path: &Path) -> Res<Option<PathBuf>> {
        if !path.is_file() {
            return Ok(None);
        }
        let prefix = path
            .file_stem()
            .with_context(|| format!("Cannot back up {}, it has no file name", path.display()))?
            .to_string_lossy()
            .to_string();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();

        let date = today();
        let seq = self.next_sequence_number(&prefix, &date, &extension)?;
        let filename = if extension.is_empty() {
            format!("{prefix}.{date}-{seq:03}")
        } else {
            format!("{prefix}.{date}-{seq:03}.{extension}")
        };
        let backup_path = self.backups_dir.join(&filename);

        utils::copy(path, &backup_path)?;
        debug!("Backed up {} to {}", path.display(), backup_path.display());

        self.rotate(&prefix, &extension)?;

        Ok(Some(backup_path))
    }

    /// Scans the backups directory for existing files with the given prefix and date,
    /// and returns the next sequence number.
    fn next_sequence_number(&self, prefix: &str, date: &str, extension: &str) -> Res<u32> {
        let mut max_seq: u32 = 0;
        for name in self.file_names()? {
            if let Some(seq) = parse_sequence_number(&name, prefix, date, extension) {
                max_seq = max_seq.max(seq);
            }
        }
        Ok(max_seq + 1)
    }

    /// Rotates old backup files, keeping only `backup_copies` files with the given prefix.
    fn rotate(&self, prefix: &str, extension: &str) -> Res<()> {
        let mut files: Vec<String> = self
            .file_names()?
            .into_iter()
            .filter(|name| is_backup_file(name, prefix, extension))
            .collect();

        // Sort by filename (which sorts by date and sequence number due to format)
        files.sort();

        let to_delete = files.len().saturating_sub(self.backup_copies as usize);
        for name in files.into_iter().take(to_delete) {
            utils::remove(self.backups_dir.join(name))?;
        }

        Ok(())
    }

    fn file_names(&self) -> Res<Vec<String>> {
        let mut names = Vec::new();
        for entry in utils::read_dir(&self.backups_dir)? {
            let entry = entry.context("Failed to read directory entry")?;
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        Ok(names)
    }
}

/// Returns today's date in YYYY-MM-DD format.
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Parses the sequence number from a backup filename.
/// Returns None if the filename doesn't match the expected pattern.
fn parse_sequence_number(filename: &str, prefix: &str, date: &str, extension: &str) -> Option<u32> {
    // Pattern: {prefix}.{date}-{NNN}.{ext} or {prefix}.{date}-{NNN} (no extension)
    let remainder = filename.strip_prefix(&format!("{prefix}.{date}-"))?;

    let seq_str = if extension.is_empty() {
        remainder
    } else {
        remainder.strip_suffix(&format!(".{extension}"))?
    };

    if seq_str.is_empty() || !seq_str.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    seq_str.parse().ok()
}

/// Checks if a filename is a backup of the file with the given stem and extension.
fn is_backup_file(filename: &str, prefix: &str, extension: &str) -> bool {
    let Some(rest) = filename.strip_prefix(&format!("{prefix}.")) else {
        return false;
    };
    let stamp = if extension.is_empty() {
        rest
    } else {
        match rest.strip_suffix(&format!(".{extension}")) {
            Some(stamp) => stamp,
            None => return false,
        }
    };
    // YYYY-MM-DD-NNN
    stamp.len() >= 14
        && stamp
            .chars()
            .all(|c| c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[test]
    fn test_parse_sequence_number() {
        assert_eq!(
            parse_sequence_number("leave.2025-12-14-001.xlsx", "leave", "2025-12-14", "xlsx"),
            Some(1)
        );
        assert_eq!(
            parse_sequence_number("leave.2025-12-14-042.xlsx", "leave", "2025-12-14", "xlsx"),
            Some(42)
        );
        assert_eq!(
            parse_sequence_number("leave.2025-12-14-003", "leave", "2025-12-14", ""),
            Some(3)
        );
        // Wrong prefix
        assert_eq!(
            parse_sequence_number("other.2025-12-14-001.xlsx", "leave", "2025-12-14", "xlsx"),
            None
        );
        // Wrong date
        assert_eq!(
            parse_sequence_number("leave.2025-12-13-001.xlsx", "leave", "2025-12-14", "xlsx"),
            None
        );
    }

    #[test]
    fn test_is_backup_file() {
        assert!(is_backup_file("leave.2025-12-14-001.xlsx", "leave", "xlsx"));
        assert!(is_backup_file("leave.2025-12-14-001", "leave", ""));
        assert!(!is_backup_file("leave.2025-12-14-001.xlsx", "other", "xlsx"));
        assert!(!is_backup_file("leave.old.2025-12-14-001.xlsx", "leave", "xlsx"));
        assert!(!is_backup_file("leave.2025-12-14-001.csv", "leave", "xlsx"));
    }

    #[test]
    fn test_save_copy_rotates() {
        let env = TestEnv::new();
        let backup = env.config().backup();
        let workbook = env.dir().join("leave.xlsx");

        assert_eq!(backup.save_copy(&workbook).unwrap(), None);

        utils::write(&workbook, "not really a workbook").unwrap();
        let mut made = Vec::new();
        for _ in 0..7 {
            made.push(backup.save_copy(&workbook).unwrap().unwrap());
        }

        let mut kept: Vec<String> = std::fs::read_dir(env.config().backups())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        kept.sort();
        assert_eq!(kept.len(), 5);
        assert!(kept[0].ends_with("-003.xlsx"));
        assert!(kept[4].ends_with("-007.xlsx"));
        assert!(made[6].is_file());
        assert!(!made[0].exists());
    }
}
