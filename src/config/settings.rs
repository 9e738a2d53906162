//! Category-partitioned application settings
//!
//! Settings live in `settings.json` as four fixed categories (appearance,
//! behavior, hotkey, advanced). On every load the persisted values are merged
//! over a copy of the hardcoded defaults: missing keys are filled in, unknown
//! keys within a known category are preserved, and categories the defaults do
//! not know are dropped. The very first load writes the defaults so the file
//! always exists after first run.

use crate::config::backup::{BackupRotator, SETTINGS_BACKUP_RETENTION};
use crate::config::store::ConfigStore;
use crate::error::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Category name → flat key/value map
pub type SettingsMap = BTreeMap<String, Map<String, Value>>;

/// Wrapper for `settings.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SettingsFile {
    version: String,
    created: chrono::DateTime<Utc>,
    settings: SettingsMap,
}

/// The hardcoded defaults every load merges against
pub fn default_settings() -> SettingsMap {
    let mut map = SettingsMap::new();
    map.insert(
        "appearance".to_string(),
        object(json!({
            "icon_size": 80,
            "opacity": 80,
            "icon_color": "#6496ff",
            "always_on_top": true,
            "show_group_names": true,
            "show_file_paths": true,
        })),
    );
    map.insert(
        "behavior".to_string(),
        object(json!({
            "startup_with_windows": false,
            "minimize_to_tray": true,
            "launch_interval": 3,
        })),
    );
    map.insert(
        "hotkey".to_string(),
        object(json!({
            "toggle_visibility": "Ctrl+Alt+L",
        })),
    );
    map.insert(
        "advanced".to_string(),
        object(json!({
            "max_backups": 10,
        })),
    );
    map
}

fn object(value: Value) -> Map<String, Value> {
    // The default literals above are all JSON objects
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Store for category-partitioned settings
pub struct SettingsStore {
    store: ConfigStore,
    settings: SettingsMap,
}

impl SettingsStore {
    /// Load settings from disk, merging over defaults
    ///
    /// Writes the defaults immediately when no settings file exists yet.
    pub fn load(store: ConfigStore) -> Self {
        let path = store.settings_path();
        let settings = if path.exists() {
            match store
                .read_value(&path)
                .and_then(ConfigStore::unwrap_settings)
            {
                Ok(raw) => merge_over_defaults(&raw),
                Err(e) => {
                    warn!("Failed to read settings, using defaults: {}", e);
                    default_settings()
                }
            }
        } else {
            info!("No settings file found, writing defaults");
            let defaults = default_settings();
            let mut fresh = Self {
                store,
                settings: defaults,
            };
            if let Err(e) = fresh.save() {
                warn!("Failed to write default settings: {}", e);
            }
            return fresh;
        };

        Self { store, settings }
    }

    /// The full in-memory settings map
    pub fn settings(&self) -> &SettingsMap {
        &self.settings
    }

    /// Get a setting value
    pub fn get(&self, category: &str, key: &str) -> Option<&Value> {
        self.settings.get(category)?.get(key)
    }

    /// Get a setting value, falling back to `default` when absent
    pub fn get_or<'a>(&'a self, category: &str, key: &str, default: &'a Value) -> &'a Value {
        self.get(category, key).unwrap_or(default)
    }

    /// Retention count for settings backups, read from the store's own
    /// current `advanced.max_backups` value
    pub fn max_backups(&self) -> usize {
        self.get("advanced", "max_backups")
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(SETTINGS_BACKUP_RETENTION)
    }

    /// Set a value in a known category and persist immediately
    ///
    /// Values for categories outside the fixed set are refused (they would be
    /// dropped on the next load anyway).
    pub fn set(&mut self, category: &str, key: &str, value: Value) -> Result<()> {
        let Some(entries) = self.settings.get_mut(category) else {
            return Err(crate::error::LauncherError::NotFound(category.to_string()));
        };
        entries.insert(key.to_string(), value);
        self.save()
    }

    /// Replace a whole category's values (bulk edit from a settings dialog)
    pub fn update_category(&mut self, category: &str, values: Map<String, Value>) -> Result<()> {
        let Some(entries) = self.settings.get_mut(category) else {
            return Err(crate::error::LauncherError::NotFound(category.to_string()));
        };
        for (key, value) in values {
            entries.insert(key, value);
        }
        self.save()
    }

    /// Persist the current settings, rotating a backup first
    pub fn save(&self) -> Result<()> {
        let path = self.store.settings_path();
        BackupRotator::rotate(
            &path,
            &self.store.settings_backups_dir(),
            "settings",
            self.max_backups(),
        );
        self.store.write_json(
            &path,
            &SettingsFile {
                version: crate::config::models::FORMAT_VERSION.to_string(),
                created: Utc::now(),
                settings: self.settings.clone(),
            },
        )
    }

    /// Restore the hardcoded defaults and persist them
    pub fn reset(&mut self) -> Result<()> {
        self.settings = default_settings();
        self.save()
    }

    /// Replace the in-memory map with an imported one (merged over defaults)
    /// and persist
    pub fn import(&mut self, imported: &SettingsMap) -> Result<()> {
        let raw = Value::Object(
            imported
                .iter()
                .map(|(k, v)| (k.clone(), Value::Object(v.clone())))
                .collect(),
        );
        self.settings = merge_over_defaults(&raw);
        self.save()
    }
}

/// Merge persisted values over a copy of the defaults, category by category
fn merge_over_defaults(raw: &Value) -> SettingsMap {
    let mut merged = default_settings();
    let Some(categories) = raw.as_object() else {
        return merged;
    };
    for (category, values) in categories {
        // Categories unknown to the defaults are dropped
        let Some(target) = merged.get_mut(category) else {
            continue;
        };
        let Some(values) = values.as_object() else {
            continue;
        };
        for (key, value) in values {
            target.insert(key.clone(), value.clone());
        }
    }
    merged
}
