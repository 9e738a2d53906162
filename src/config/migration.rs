//! One-shot migration from the old product's config directory
//!
//! Earlier releases shipped under the name `DesktopLauncher` and kept their
//! config under that directory. On the first start after an upgrade the data
//! is copied into the new location; each artifact migrates independently so a
//! failure on one never blocks the others. The old directory is left in place
//! as an implicit backup.

use crate::config::store::{APP_NAME, ConfigStore, OLD_APP_NAME, config_directory_for};
use crate::utils::autostart::RunKey;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of a migration run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Whether any artifact was found and copied
    pub migrated_anything: bool,
    /// Artifacts copied, by file or directory name
    pub copied: Vec<String>,
    /// Whether the autostart registration moved to the new name
    pub autostart_migrated: bool,
}

/// Copies legacy config data into the new config directory
pub struct MigrationAgent {
    old_dir: PathBuf,
    store: ConfigStore,
}

impl MigrationAgent {
    /// Agent over the default old and new directories
    pub fn new(store: ConfigStore) -> Self {
        Self {
            old_dir: config_directory_for(OLD_APP_NAME),
            store,
        }
    }

    /// Agent over explicit directories (tests)
    pub fn with_dirs(old_dir: impl Into<PathBuf>, store: ConfigStore) -> Self {
        Self {
            old_dir: old_dir.into(),
            store,
        }
    }

    /// Whether a migration should run at all
    ///
    /// Only when the old directory exists and the new one holds no group data
    /// yet, so the copy never overwrites data the user already created.
    pub fn is_needed(&self) -> bool {
        self.old_dir.is_dir() && !self.store.groups_path().exists()
    }

    /// Copy all known artifacts from the old directory
    ///
    /// Each artifact is copied independently; a failed step is logged and the
    /// run continues with the next one.
    pub fn run(&self) -> MigrationReport {
        let mut report = MigrationReport::default();
        if !self.is_needed() {
            return report;
        }
        info!(
            "Migrating config from {} to {}",
            self.old_dir.display(),
            self.store.config_dir().display()
        );

        self.copy_file("groups.json", &self.store.groups_path(), &mut report);
        self.copy_dir("backups", &self.store.backups_dir(), &mut report);
        self.copy_file("settings.json", &self.store.settings_path(), &mut report);
        self.copy_dir(
            "settings_backups",
            &self.store.settings_backups_dir(),
            &mut report,
        );
        self.copy_dir("exports", &self.store.exports_dir(), &mut report);

        info!(
            "Migration finished: {} artifact(s) copied",
            report.copied.len()
        );
        report
    }

    /// Move the autostart registration from the old product name to the new
    ///
    /// Runs only when the old entry exists and no new-name entry does yet.
    /// The new entry points at the current executable (the old command names
    /// the uninstalled binary); the old entry is then deleted. A failed
    /// deletion only leaves a stale entry behind and is not fatal.
    pub fn migrate_autostart(&self, run_key: &mut dyn RunKey, report: &mut MigrationReport) {
        match run_key.get(APP_NAME) {
            Ok(None) => {}
            Ok(Some(_)) => return,
            Err(e) => {
                warn!("Could not read autostart entry: {}", e);
                return;
            }
        }
        match run_key.get(OLD_APP_NAME) {
            Ok(Some(_)) => {}
            Ok(None) => return,
            Err(e) => {
                warn!("Could not read old autostart entry: {}", e);
                return;
            }
        }

        let command = match crate::utils::autostart::current_exe_command() {
            Ok(command) => command,
            Err(e) => {
                warn!("Could not determine current executable: {}", e);
                return;
            }
        };
        if let Err(e) = run_key.set(APP_NAME, &command) {
            warn!("Could not register autostart under new name: {}", e);
            return;
        }
        report.autostart_migrated = true;
        info!("Autostart entry migrated to '{}'", APP_NAME);

        if let Err(e) = run_key.remove(OLD_APP_NAME) {
            warn!("Could not remove old autostart entry: {}", e);
        }
    }

    fn copy_file(&self, name: &str, dest: &Path, report: &mut MigrationReport) {
        let source = self.old_dir.join(name);
        if !source.is_file() {
            return;
        }
        let result = dest
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|()| std::fs::copy(&source, dest).map(|_| ()));
        match result {
            Ok(()) => {
                info!("Migrated {}", name);
                report.copied.push(name.to_string());
                report.migrated_anything = true;
            }
            Err(e) => warn!("Failed to migrate {}: {}", name, e),
        }
    }

    fn copy_dir(&self, name: &str, dest: &Path, report: &mut MigrationReport) {
        let source = self.old_dir.join(name);
        if !source.is_dir() {
            return;
        }
        match copy_dir_contents(&source, dest) {
            Ok(count) => {
                info!("Migrated {}/ ({} file(s))", name, count);
                report.copied.push(name.to_string());
                report.migrated_anything = true;
            }
            Err(e) => warn!("Failed to migrate {}/: {}", name, e),
        }
    }
}

/// Replace `dest` with a flat copy of `source`'s files
///
/// The destination is cleared first so a retried migration cannot mix
/// generations of backups.
fn copy_dir_contents(source: &Path, dest: &Path) -> std::io::Result<usize> {
    if dest.exists() {
        std::fs::remove_dir_all(dest)?;
    }
    std::fs::create_dir_all(dest)?;

    let mut count = 0;
    for entry in std::fs::read_dir(source)? {
        let entry = entry?;
        if entry.path().is_file() {
            std::fs::copy(entry.path(), dest.join(entry.file_name()))?;
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::autostart::MemoryRunKey;
    use std::fs;

    fn seed_old_dir(root: &Path) -> PathBuf {
        let old = root.join("DesktopLauncher");
        fs::create_dir_all(old.join("backups")).unwrap();
        fs::write(old.join("groups.json"), r#"{"groups":[{"name":"Apps"}]}"#).unwrap();
        fs::write(old.join("settings.json"), r#"{"appearance":{}}"#).unwrap();
        fs::write(old.join("backups").join("groups_20240101_000000.json"), "{}").unwrap();
        old
    }

    #[test]
    fn test_not_needed_without_old_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::with_root(dir.path().join("iconLaunch"));
        let agent = MigrationAgent::with_dirs(dir.path().join("DesktopLauncher"), store);
        assert!(!agent.is_needed());
        assert_eq!(agent.run(), MigrationReport::default());
    }

    #[test]
    fn test_not_needed_when_new_data_exists() {
        let dir = tempfile::tempdir().unwrap();
        seed_old_dir(dir.path());
        let new_dir = dir.path().join("iconLaunch");
        fs::create_dir_all(&new_dir).unwrap();
        fs::write(new_dir.join("groups.json"), "{\"groups\":[]}").unwrap();

        let store = ConfigStore::with_root(&new_dir);
        let agent = MigrationAgent::with_dirs(dir.path().join("DesktopLauncher"), store.clone());
        assert!(!agent.is_needed());
        agent.run();

        // Existing data untouched
        let value = store.read_value(&store.groups_path()).unwrap();
        assert_eq!(value["groups"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_copies_all_present_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let old = seed_old_dir(dir.path());
        fs::create_dir_all(old.join("exports")).unwrap();
        fs::write(old.join("exports").join("bundle.json"), "{}").unwrap();

        let new_dir = dir.path().join("iconLaunch");
        let agent = MigrationAgent::with_dirs(&old, ConfigStore::with_root(&new_dir));
        let report = agent.run();

        assert!(report.migrated_anything);
        assert_eq!(
            report.copied,
            vec!["groups.json", "backups", "settings.json", "exports"]
        );
        assert!(new_dir.join("groups.json").exists());
        assert!(new_dir.join("backups").join("groups_20240101_000000.json").exists());
        assert!(new_dir.join("exports").join("bundle.json").exists());
        // Old directory is kept as a fallback
        assert!(old.join("groups.json").exists());
    }

    #[test]
    fn test_partial_old_dir_copies_what_exists() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("DesktopLauncher");
        fs::create_dir_all(&old).unwrap();
        fs::write(old.join("groups.json"), "[]").unwrap();

        let agent =
            MigrationAgent::with_dirs(&old, ConfigStore::with_root(dir.path().join("iconLaunch")));
        let report = agent.run();
        assert_eq!(report.copied, vec!["groups.json"]);
    }

    #[test]
    fn test_stale_destination_backups_are_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let old = seed_old_dir(dir.path());
        let new_dir = dir.path().join("iconLaunch");
        fs::create_dir_all(new_dir.join("backups")).unwrap();
        fs::write(new_dir.join("backups").join("stale.json"), "{}").unwrap();

        let agent = MigrationAgent::with_dirs(&old, ConfigStore::with_root(&new_dir));
        agent.run();

        assert!(!new_dir.join("backups").join("stale.json").exists());
        assert!(new_dir.join("backups").join("groups_20240101_000000.json").exists());
    }

    #[test]
    fn test_autostart_entry_moves_to_new_name() {
        let dir = tempfile::tempdir().unwrap();
        let old = seed_old_dir(dir.path());
        let agent =
            MigrationAgent::with_dirs(&old, ConfigStore::with_root(dir.path().join("iconLaunch")));

        let mut run_key = MemoryRunKey::default();
        run_key.set("DesktopLauncher", "\"C:\\old\\launcher.exe\"").unwrap();

        let mut report = MigrationReport::default();
        agent.migrate_autostart(&mut run_key, &mut report);

        assert!(report.autostart_migrated);
        assert_eq!(run_key.get("DesktopLauncher").unwrap(), None);
        // The new entry points at the running executable, not the old binary
        let command = run_key.get("iconLaunch").unwrap().unwrap();
        assert_ne!(command, "\"C:\\old\\launcher.exe\"");
        assert!(command.starts_with('"') && command.ends_with('"'));
    }

    #[test]
    fn test_autostart_existing_new_entry_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let old = seed_old_dir(dir.path());
        let agent =
            MigrationAgent::with_dirs(&old, ConfigStore::with_root(dir.path().join("iconLaunch")));

        let mut run_key = MemoryRunKey::default();
        run_key.set("DesktopLauncher", "\"C:\\old.exe\"").unwrap();
        run_key.set("iconLaunch", "\"C:\\already\\configured.exe\"").unwrap();

        let mut report = MigrationReport::default();
        agent.migrate_autostart(&mut run_key, &mut report);

        assert!(!report.autostart_migrated);
        assert_eq!(
            run_key.get("iconLaunch").unwrap(),
            Some("\"C:\\already\\configured.exe\"".to_string())
        );
        // The old entry stays; only a successful migration removes it
        assert!(run_key.get("DesktopLauncher").unwrap().is_some());
    }

    #[test]
    fn test_autostart_absent_entry_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let agent = MigrationAgent::with_dirs(
            dir.path().join("DesktopLauncher"),
            ConfigStore::with_root(dir.path().join("iconLaunch")),
        );
        let mut run_key = MemoryRunKey::default();
        let mut report = MigrationReport::default();
        agent.migrate_autostart(&mut run_key, &mut report);
        assert!(!report.autostart_migrated);
    }
}
