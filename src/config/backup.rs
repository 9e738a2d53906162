//! Timestamped config backups with retention pruning
//!
//! Every tracked file gets a `prefix_YYYYMMDD_HHMMSS.json` snapshot into its
//! backup directory immediately before each overwrite; the pool is pruned to
//! the most recently modified `max_count` entries. A failed snapshot is
//! logged and never aborts the write that triggered it.

use crate::error::Result;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

/// Default retention for group-data backups
pub const GROUPS_BACKUP_RETENTION: usize = 5;

/// Default retention for settings backups
pub const SETTINGS_BACKUP_RETENTION: usize = 10;

/// Snapshot and pruning service shared by the group and settings stores
pub struct BackupRotator;

impl BackupRotator {
    /// Copy `source` into `backup_dir` under a timestamped name
    ///
    /// Returns `Ok(None)` when `source` does not exist yet (nothing to back
    /// up on first run).
    pub fn snapshot(source: &Path, backup_dir: &Path, prefix: &str) -> Result<Option<PathBuf>> {
        if !source.exists() {
            return Ok(None);
        }
        std::fs::create_dir_all(backup_dir)?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let backup_path = backup_dir.join(format!("{prefix}_{stamp}.json"));
        std::fs::copy(source, &backup_path)?;
        debug!("Created backup {}", backup_path.display());
        Ok(Some(backup_path))
    }

    /// Delete every `prefix_*.json` entry beyond the `max_count` most
    /// recently modified ones
    pub fn prune(backup_dir: &Path, prefix: &str, max_count: usize) -> Result<()> {
        let mut backups = list_backups(backup_dir, prefix)?;
        for (path, _) in backups.drain(..).skip(max_count) {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!("Failed to prune backup {}: {}", path.display(), e);
            }
        }
        Ok(())
    }

    /// Snapshot then prune, swallowing errors so the triggering save proceeds
    pub fn rotate(source: &Path, backup_dir: &Path, prefix: &str, max_count: usize) {
        match Self::snapshot(source, backup_dir, prefix) {
            Ok(Some(_)) => {
                if let Err(e) = Self::prune(backup_dir, prefix, max_count) {
                    warn!("Backup pruning failed in {}: {}", backup_dir.display(), e);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Backup of {} failed: {}", source.display(), e),
        }
    }

    /// The most recently modified backup, used for corruption recovery
    pub fn latest(backup_dir: &Path, prefix: &str) -> Option<PathBuf> {
        list_backups(backup_dir, prefix)
            .ok()?
            .into_iter()
            .next()
            .map(|(path, _)| path)
    }

    /// Count of matching backups (diagnostics)
    pub fn count(backup_dir: &Path, prefix: &str) -> usize {
        list_backups(backup_dir, prefix).map_or(0, |b| b.len())
    }
}

/// List `prefix_*.json` files sorted by modification time descending.
/// Filename is the secondary key so pruning is deterministic when stamps tie.
fn list_backups(backup_dir: &Path, prefix: &str) -> Result<Vec<(PathBuf, SystemTime)>> {
    let mut entries = Vec::new();
    let read_dir = match std::fs::read_dir(backup_dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(entries),
        Err(e) => return Err(e.into()),
    };

    let wanted_prefix = format!("{prefix}_");
    for entry in read_dir {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.starts_with(&wanted_prefix) || !name.ends_with(".json") {
            continue;
        }
        let mtime = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        entries.push((entry.path(), mtime));
    }

    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_backup(dir: &Path, name: &str, mtime_offset_secs: u64) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "{}").unwrap();
        // Spread mtimes so ordering is unambiguous on coarse-grained filesystems
        let mtime = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000 + mtime_offset_secs);
        let file = fs::File::options().append(true).open(&path).unwrap();
        file.set_modified(mtime).unwrap();
        path
    }

    #[test]
    fn test_snapshot_missing_source_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let result = BackupRotator::snapshot(
            &dir.path().join("absent.json"),
            &dir.path().join("backups"),
            "groups",
        )
        .unwrap();
        assert!(result.is_none());
        assert!(!dir.path().join("backups").exists());
    }

    #[test]
    fn test_snapshot_copies_source_content() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("groups.json");
        fs::write(&source, r#"{"groups":[]}"#).unwrap();

        let backup_dir = dir.path().join("backups");
        let backup = BackupRotator::snapshot(&source, &backup_dir, "groups")
            .unwrap()
            .unwrap();

        assert!(backup.file_name().unwrap().to_string_lossy().starts_with("groups_"));
        assert_eq!(fs::read_to_string(backup).unwrap(), r#"{"groups":[]}"#);
    }

    #[test]
    fn test_prune_keeps_most_recent_max_count() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..8u64 {
            write_backup(dir.path(), &format!("groups_2024010{i}_000000.json"), i);
        }

        BackupRotator::prune(dir.path(), "groups", 5).unwrap();

        let mut remaining: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        remaining.sort();
        assert_eq!(remaining.len(), 5);
        // The three oldest (offsets 0..=2) were deleted
        assert_eq!(remaining[0], "groups_20240103_000000.json");
    }

    #[test]
    fn test_prune_ignores_other_prefixes() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..3u64 {
            write_backup(dir.path(), &format!("groups_2024010{i}_000000.json"), i);
        }
        write_backup(dir.path(), "settings_20240101_000000.json", 10);

        BackupRotator::prune(dir.path(), "groups", 1).unwrap();

        assert!(dir.path().join("settings_20240101_000000.json").exists());
        assert_eq!(BackupRotator::count(dir.path(), "groups"), 1);
    }

    #[test]
    fn test_latest_returns_newest_by_mtime() {
        let dir = tempfile::tempdir().unwrap();
        write_backup(dir.path(), "groups_20240101_000000.json", 1);
        let newest = write_backup(dir.path(), "groups_20240102_000000.json", 2);
        write_backup(dir.path(), "groups_20231231_000000.json", 0);

        assert_eq!(BackupRotator::latest(dir.path(), "groups"), Some(newest));
    }

    #[test]
    fn test_latest_on_missing_dir_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(BackupRotator::latest(&dir.path().join("nope"), "groups").is_none());
    }

    #[test]
    fn test_retention_after_many_rotations() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("settings.json");
        let backup_dir = dir.path().join("settings_backups");

        for i in 0..15 {
            fs::write(&source, format!("{{\"gen\":{i}}}")).unwrap();
            let backup = BackupRotator::snapshot(&source, &backup_dir, "settings")
                .unwrap()
                .unwrap();
            // Force distinct, increasing mtimes regardless of timer resolution
            let mtime = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000 + i);
            fs::File::options()
                .append(true)
                .open(&backup)
                .unwrap()
                .set_modified(mtime)
                .unwrap();
            // Distinct names too, since the stamp has second granularity
            let renamed = backup_dir.join(format!("settings_stamp{i:02}.json"));
            fs::rename(&backup, &renamed).unwrap();
            BackupRotator::prune(&backup_dir, "settings", 10).unwrap();
        }

        assert_eq!(BackupRotator::count(&backup_dir, "settings"), 10);
        // The survivors are the 10 most recent generations
        assert!(backup_dir.join("settings_stamp14.json").exists());
        assert!(!backup_dir.join("settings_stamp04.json").exists());
    }
}
