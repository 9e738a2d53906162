//! Named profile snapshots of the group collection
//!
//! Each profile lives in its own directory under `profiles/<name>/profile.json`
//! and holds an independent copy of the groups. At most one profile is
//! current at a time, tracked by the separate pointer record
//! `current_profile.json` rather than a per-profile flag.

use crate::config::models::{CurrentProfileFile, FORMAT_VERSION, Group, Profile, ProfileExport};
use crate::config::store::{APP_NAME, ConfigStore};
use crate::error::{LauncherError, Result};
use crate::hotkey::HotkeyBinding;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Characters rejected in profile names (not filesystem-safe)
const RESERVED_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Summary entry returned by [`ProfileStore::list`]
#[derive(Debug, Clone)]
pub struct ProfileInfo {
    /// Profile name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Creation timestamp
    pub created: DateTime<Utc>,
    /// Last-update timestamp
    pub updated: DateTime<Utc>,
    /// Number of groups in the snapshot
    pub groups_count: usize,
    /// Whether this profile is the current one
    pub is_current: bool,
}

/// Store managing profile snapshots and the current-profile pointer
pub struct ProfileStore {
    store: ConfigStore,
    current: Option<String>,
}

impl ProfileStore {
    /// Load the profile store, validating the pointer record
    ///
    /// A pointer at a profile that no longer exists is cleared.
    pub fn load(store: ConfigStore) -> Self {
        let mut profiles = Self {
            store,
            current: None,
        };

        let pointer_path = profiles.store.current_profile_path();
        if pointer_path.exists() {
            match profiles.store.read_value(&pointer_path) {
                Ok(value) => {
                    let name = value
                        .get("current_profile")
                        .and_then(|v| v.as_str())
                        .map(str::to_string);
                    if let Some(name) = name {
                        if profiles.exists(&name) {
                            profiles.current = Some(name);
                        } else {
                            warn!("Current profile '{}' no longer exists, clearing pointer", name);
                        }
                    }
                }
                Err(e) => warn!("Failed to read current profile pointer: {}", e),
            }
        }

        profiles
    }

    /// The name of the current profile, if any
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Whether a profile with this name exists on disk
    pub fn exists(&self, name: &str) -> bool {
        self.profile_file(name).exists()
    }

    fn profile_dir(&self, name: &str) -> PathBuf {
        self.store.profiles_dir().join(name)
    }

    fn profile_file(&self, name: &str) -> PathBuf {
        self.profile_dir(name).join("profile.json")
    }

    /// Create an empty profile
    pub fn create_empty(
        &self,
        name: &str,
        description: &str,
        hotkey: Option<HotkeyBinding>,
    ) -> Result<()> {
        let name = validate_name(name)?;
        self.write_profile(Profile::now(name, description, Vec::new(), hotkey))
    }

    /// Snapshot the live group collection under `name`, overwriting any
    /// existing profile of that name
    ///
    /// An overwrite keeps the existing creation timestamp and hotkey binding;
    /// only the groups, description, and `updated` stamp change.
    pub fn save_snapshot(&self, name: &str, description: &str, groups: &[Group]) -> Result<()> {
        let name = validate_name(name)?;

        let mut profile = Profile::now(name.clone(), description, groups.to_vec(), None);
        if let Ok(existing) = self.get(&name) {
            profile.created = existing.created;
            profile.hotkey = existing.hotkey;
        }
        self.write_profile(profile)
    }

    /// Read a profile's full document
    pub fn get(&self, name: &str) -> Result<Profile> {
        if !self.exists(name) {
            return Err(LauncherError::NotFound(name.to_string()));
        }
        let value = self.store.read_value(&self.profile_file(name))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Load a profile's group snapshot
    pub fn load_groups(&self, name: &str) -> Result<Vec<Group>> {
        Ok(self.get(name)?.groups)
    }

    /// Switch to `name`, auto-saving the outgoing current profile
    ///
    /// `live_groups` is the live collection's present state; it is snapshotted
    /// under the outgoing profile's own name before the target's groups are
    /// returned for the caller to apply. The pointer is updated and persisted.
    /// On a missing target nothing changes.
    pub fn switch_to(&mut self, name: &str, live_groups: &[Group]) -> Result<Vec<Group>> {
        let incoming = self.load_groups(name)?;

        if let Some(outgoing) = self.current.clone() {
            if let Err(e) = self.save_snapshot(&outgoing, "auto-save", live_groups) {
                warn!("Auto-save of outgoing profile '{}' failed: {}", outgoing, e);
            }
        }

        self.current = Some(name.to_string());
        self.save_pointer()?;
        info!("Switched to profile '{}'", name);
        Ok(incoming)
    }

    /// Delete a profile; the current profile is refused
    pub fn delete(&self, name: &str) -> Result<()> {
        if !self.exists(name) {
            return Err(LauncherError::NotFound(name.to_string()));
        }
        if self.current.as_deref() == Some(name) {
            return Err(LauncherError::CurrentProfile(name.to_string()));
        }
        std::fs::remove_dir_all(self.profile_dir(name))?;
        info!("Deleted profile '{}'", name);
        Ok(())
    }

    /// Rename a profile, updating the directory, the embedded name, and the
    /// pointer when the renamed profile was current
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        if !self.exists(old) {
            return Err(LauncherError::NotFound(old.to_string()));
        }
        let new = validate_name(new)?;
        if self.exists(&new) {
            return Err(LauncherError::Conflict(new));
        }

        std::fs::rename(self.profile_dir(old), self.profile_dir(&new))?;

        let mut profile = self.get(&new)?;
        profile.name.clone_from(&new);
        profile.updated = Utc::now();
        self.write_profile(profile)?;

        if self.current.as_deref() == Some(old) {
            self.current = Some(new.clone());
            self.save_pointer()?;
        }
        info!("Renamed profile '{}' to '{}'", old, new);
        Ok(())
    }

    /// Import a profile from an export file
    ///
    /// On a name collision the imported profile is renamed `name (N)` with
    /// the first free `N`; existing profiles are never overwritten. Returns
    /// the final name.
    pub fn import_from_file(&self, path: &Path) -> Result<String> {
        let value = self.store.read_value(path)?;
        let profile_value = value
            .get("profile")
            .cloned()
            .ok_or_else(|| LauncherError::Format("missing 'profile' key".to_string()))?;
        let mut profile: Profile = serde_json::from_value(profile_value)?;

        let base = validate_name(&profile.name).unwrap_or_else(|_| "Imported Profile".to_string());
        let mut name = base.clone();
        let mut counter = 1;
        while self.exists(&name) {
            name = format!("{base} ({counter})");
            counter += 1;
        }

        profile.name.clone_from(&name);
        profile.updated = Utc::now();
        self.write_profile(profile)?;
        info!("Imported profile '{}'", name);
        Ok(name)
    }

    /// Export a profile's full data with format-version and product tags
    pub fn export_to_file(&self, name: &str, path: &Path) -> Result<()> {
        let profile = self.get(name)?;
        self.store.write_json(
            path,
            &ProfileExport {
                export_version: FORMAT_VERSION.to_string(),
                exported: Utc::now(),
                app_name: APP_NAME.to_string(),
                profile,
            },
        )
    }

    /// Set or clear a profile's hotkey binding
    ///
    /// A binding already held by another profile is cleared there first, so a
    /// binding belongs to at most one profile.
    pub fn set_hotkey(&self, name: &str, binding: Option<HotkeyBinding>) -> Result<()> {
        if !self.exists(name) {
            return Err(LauncherError::NotFound(name.to_string()));
        }

        if let Some(binding) = &binding {
            for other in self.list() {
                if other.name == name {
                    continue;
                }
                if let Ok(mut profile) = self.get(&other.name) {
                    if profile.hotkey.as_ref() == Some(binding) {
                        info!(
                            "Hotkey {} moved from profile '{}' to '{}'",
                            binding, other.name, name
                        );
                        profile.hotkey = None;
                        profile.updated = Utc::now();
                        self.write_profile(profile)?;
                    }
                }
            }
        }

        let mut profile = self.get(name)?;
        profile.hotkey = binding;
        profile.updated = Utc::now();
        self.write_profile(profile)
    }

    /// Write a full profile document as-is (bundle restore), overwriting any
    /// existing profile of that name
    pub fn restore(&self, mut profile: Profile) -> Result<()> {
        profile.name = validate_name(&profile.name)?;
        self.write_profile(profile)
    }

    /// Re-point the current-profile pointer during a bundle restore
    ///
    /// Unlike [`switch_to`](Self::switch_to) this never auto-saves; a name
    /// that does not resolve to an existing profile clears the pointer.
    pub fn restore_pointer(&mut self, name: Option<&str>) -> Result<()> {
        self.current = match name {
            Some(n) if self.exists(n) => Some(n.to_string()),
            _ => None,
        };
        self.save_pointer()
    }

    /// All profiles, newest created first
    pub fn list(&self) -> Vec<ProfileInfo> {
        let mut infos = Vec::new();
        let Ok(read_dir) = std::fs::read_dir(self.store.profiles_dir()) else {
            return infos;
        };

        for entry in read_dir.flatten() {
            if !entry.path().is_dir() {
                continue;
            }
            let dir_name = entry.file_name().to_string_lossy().into_owned();
            match self.get(&dir_name) {
                Ok(profile) => infos.push(ProfileInfo {
                    is_current: self.current.as_deref() == Some(dir_name.as_str()),
                    name: dir_name,
                    description: profile.description,
                    created: profile.created,
                    updated: profile.updated,
                    groups_count: profile.groups.len(),
                }),
                Err(e) => warn!("Skipping unreadable profile '{}': {}", dir_name, e),
            }
        }

        infos.sort_by(|a, b| b.created.cmp(&a.created));
        infos
    }

    /// Find the profile bound to a hotkey, if any
    pub fn find_by_hotkey(&self, binding: &HotkeyBinding) -> Option<String> {
        self.list().into_iter().find_map(|info| {
            let profile = self.get(&info.name).ok()?;
            (profile.hotkey.as_ref() == Some(binding)).then_some(info.name)
        })
    }

    fn write_profile(&self, profile: Profile) -> Result<()> {
        let dir = self.profile_dir(&profile.name);
        std::fs::create_dir_all(&dir)?;
        self.store.write_json(&dir.join("profile.json"), &profile)
    }

    fn save_pointer(&self) -> Result<()> {
        self.store.write_json(
            &self.store.current_profile_path(),
            &CurrentProfileFile {
                current_profile: self.current.clone(),
                updated: Utc::now(),
            },
        )
    }
}

/// Validate and normalize a user-supplied profile name
fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LauncherError::NameEmpty);
    }
    if let Some(c) = trimmed.chars().find(|c| RESERVED_CHARS.contains(c)) {
        return Err(LauncherError::NameInvalid(c));
    }
    Ok(trimmed.to_string())
}
