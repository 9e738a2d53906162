//! Atomic JSON persistence for the config directory
//!
//! All writes go through a sibling temp file (`<path>.tmp`) followed by an
//! atomic rename, so readers never observe a partially written document.
//! The store is a stateless read/write service; it owns no entities and does
//! no caching.

use crate::error::{LauncherError, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Product name, used for the config directory and registry entries
pub const APP_NAME: &str = "iconLaunch";

/// Previous product name, used only by migration
pub const OLD_APP_NAME: &str = "DesktopLauncher";

/// Atomic JSON read/write service rooted at the config directory
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_dir: PathBuf,
}

impl ConfigStore {
    /// Create a store rooted at the default per-user config directory
    pub fn new() -> Self {
        Self {
            config_dir: config_directory_for(APP_NAME),
        }
    }

    /// Create a store rooted at an explicit directory (tests, migration)
    pub fn with_root(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// The config directory root
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path to `groups.json`
    pub fn groups_path(&self) -> PathBuf {
        self.config_dir.join("groups.json")
    }

    /// Path to `settings.json`
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    /// Path to the pointer record `current_profile.json`
    pub fn current_profile_path(&self) -> PathBuf {
        self.config_dir.join("current_profile.json")
    }

    /// Directory holding `groups_<ts>.json` backups
    pub fn backups_dir(&self) -> PathBuf {
        self.config_dir.join("backups")
    }

    /// Directory holding `settings_<ts>.json` backups
    pub fn settings_backups_dir(&self) -> PathBuf {
        self.config_dir.join("settings_backups")
    }

    /// Directory holding per-profile subdirectories
    pub fn profiles_dir(&self) -> PathBuf {
        self.config_dir.join("profiles")
    }

    /// Directory holding export bundles
    pub fn exports_dir(&self) -> PathBuf {
        self.config_dir.join("exports")
    }

    /// Create the config directory and its standard subdirectories
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(self.backups_dir())?;
        std::fs::create_dir_all(self.profiles_dir())?;
        Ok(())
    }

    /// Serialize `document` as pretty JSON and atomically replace `path`
    ///
    /// On any failure the temp file is removed and the previous content of
    /// `path` stays intact.
    pub fn write_json<T: Serialize>(&self, path: &Path, document: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp_path = temp_path_for(path);
        let result = serde_json::to_string_pretty(document)
            .map_err(LauncherError::from)
            .and_then(|json| {
                std::fs::write(&temp_path, json)?;
                std::fs::rename(&temp_path, path)?;
                Ok(())
            });

        if result.is_err() && temp_path.exists() {
            if let Err(e) = std::fs::remove_file(&temp_path) {
                warn!("Failed to remove temp file {}: {}", temp_path.display(), e);
            }
        }
        result
    }

    /// Read and parse a JSON document
    pub fn read_value(&self, path: &Path) -> Result<Value> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Unwrap a groups document: either a bare array (legacy format) or an
    /// object with a `groups` key. Any other shape is a format error.
    pub fn unwrap_groups(value: Value) -> Result<Vec<super::models::Group>> {
        let list = match value {
            Value::Array(_) => value,
            Value::Object(mut map) => map
                .remove("groups")
                .ok_or_else(|| LauncherError::Format("missing 'groups' key".to_string()))?,
            other => {
                return Err(LauncherError::Format(format!(
                    "expected array or object, got {}",
                    type_name(&other)
                )));
            }
        };
        Ok(serde_json::from_value(list)?)
    }

    /// Unwrap a settings document: either the category map directly (legacy
    /// format) or an object with a `settings` key.
    pub fn unwrap_settings(value: Value) -> Result<Value> {
        match value {
            Value::Object(mut map) => {
                if let Some(inner) = map.remove("settings") {
                    Ok(inner)
                } else {
                    Ok(Value::Object(map))
                }
            }
            other => Err(LauncherError::Format(format!(
                "expected object, got {}",
                type_name(&other)
            ))),
        }
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Sibling temp path used by the atomic write
fn temp_path_for(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Resolve the per-user config directory for a product name
///
/// `%APPDATA%\<name>` on Windows, `~/.<name lowercased>` elsewhere (and as a
/// fallback when `APPDATA` is unset).
pub fn config_directory_for(name: &str) -> PathBuf {
    if cfg!(windows) {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join(name);
        }
    }
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(format!(".{}", name.to_lowercase()))
}

/// Log a short summary of the config tree state (startup diagnostics)
pub fn log_config_info(store: &ConfigStore) {
    info!("Config directory: {}", store.config_dir().display());
    info!("groups.json present: {}", store.groups_path().exists());
    info!("settings.json present: {}", store.settings_path().exists());
}
