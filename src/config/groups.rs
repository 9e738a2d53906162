//! Persistence for the live group collection (`groups.json`)
//!
//! Saves rotate a backup first and go through the atomic write in
//! [`ConfigStore`]. A corrupt file is transparently recovered from the most
//! recent backup; if that fails too, the store reports an empty collection
//! rather than failing startup.

use crate::config::backup::{BackupRotator, GROUPS_BACKUP_RETENTION};
use crate::config::models::{Group, GroupsFile};
use crate::config::store::ConfigStore;
use crate::error::{LauncherError, Result};
use std::path::Path;
use tracing::{info, warn};

/// Store for the default (non-profile) group collection
pub struct GroupStore {
    store: ConfigStore,
}

impl GroupStore {
    /// Create a group store over the given config store
    pub fn new(store: ConfigStore) -> Self {
        Self { store }
    }

    /// Save the group collection, rotating a backup first
    pub fn save(&self, groups: &[Group]) -> Result<()> {
        let path = self.store.groups_path();
        BackupRotator::rotate(
            &path,
            &self.store.backups_dir(),
            "groups",
            GROUPS_BACKUP_RETENTION,
        );
        self.store
            .write_json(&path, &GroupsFile::now(groups.to_vec()))
    }

    /// Load the group collection
    ///
    /// Missing file yields an empty collection. A parse failure falls back to
    /// the newest backup; an unrecoverable state also yields an empty
    /// collection so the application can start.
    pub fn load(&self) -> Vec<Group> {
        let path = self.store.groups_path();
        if !path.exists() {
            return Vec::new();
        }

        match self.read_groups(&path) {
            Ok(groups) => groups,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                self.restore_from_backup()
            }
        }
    }

    fn read_groups(&self, path: &Path) -> Result<Vec<Group>> {
        let value = self.store.read_value(path)?;
        ConfigStore::unwrap_groups(value)
    }

    /// Recover the group list from the most recent backup
    fn restore_from_backup(&self) -> Vec<Group> {
        let Some(backup) = BackupRotator::latest(&self.store.backups_dir(), "groups") else {
            warn!("No backups available for recovery");
            return Vec::new();
        };

        info!("Recovering groups from backup {}", backup.display());
        match self.read_groups(&backup) {
            Ok(groups) => groups,
            Err(e) => {
                warn!("Backup recovery failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Copy the current `groups.json` to an external path
    pub fn export_to(&self, export_path: &Path) -> Result<()> {
        let source = self.store.groups_path();
        if !source.exists() {
            return Err(LauncherError::NotFound("groups.json".to_string()));
        }
        std::fs::copy(source, export_path)?;
        Ok(())
    }

    /// Replace the current group data with a validated external file
    ///
    /// The existing data is backed up first; the import is rejected if it is
    /// not a group list (bare array or `groups`-keyed object) or any group
    /// lacks a name.
    pub fn import_from(&self, import_path: &Path) -> Result<()> {
        let raw = std::fs::read_to_string(import_path)?;
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        let groups = ConfigStore::unwrap_groups(value)?;
        if groups.iter().any(|g| g.name.trim().is_empty()) {
            return Err(LauncherError::Format(
                "imported group without a name".to_string(),
            ));
        }
        self.save(&groups)
    }

    /// Back up and delete the current group data
    pub fn reset(&self) -> Result<()> {
        let path = self.store.groups_path();
        BackupRotator::rotate(
            &path,
            &self.store.backups_dir(),
            "groups",
            GROUPS_BACKUP_RETENTION,
        );
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}
