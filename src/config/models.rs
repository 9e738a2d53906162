//! Configuration data models
//!
//! This module defines the data structures persisted to the config directory.
//! Field renames keep the on-disk JSON compatible with configs written by
//! earlier releases (`path`, `name`, `type`, `original_path`, `checked`).

use crate::hotkey::HotkeyBinding;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current on-disk format version tag
pub const FORMAT_VERSION: &str = "1.0";

/// Kind of filesystem entry an item points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Regular file (launched directly)
    File,
    /// Directory (opened in the file manager)
    #[serde(rename = "folder")]
    Directory,
}

impl ItemKind {
    /// Classify a resolved path by what it points at on disk
    pub fn of(path: &Path) -> Self {
        if path.is_dir() {
            ItemKind::Directory
        } else {
            ItemKind::File
        }
    }
}

/// A single launchable reference inside a group
///
/// `resolved_path` is the dedup key: two items in one group never share it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Canonical filesystem target after shortcut resolution
    #[serde(rename = "path")]
    pub resolved_path: PathBuf,
    /// Name shown in the UI, derived from the original reference
    #[serde(rename = "name")]
    pub display_name: String,
    /// File or directory
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Pre-resolution reference, e.g. the shortcut file the user dropped
    #[serde(rename = "original_path")]
    pub original_reference: PathBuf,
    /// Included in bulk launch (default on)
    #[serde(default = "default_checked")]
    pub checked: bool,
}

fn default_checked() -> bool {
    true
}

/// A named, positioned container of launchable items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Group name, unique within the collection
    pub name: String,
    /// Desktop X position
    #[serde(default)]
    pub x: i32,
    /// Desktop Y position
    #[serde(default)]
    pub y: i32,
    /// Ordered items, deduplicated by resolved path
    #[serde(default)]
    pub items: Vec<Item>,
    /// Optional opaque icon identifier
    #[serde(rename = "custom_icon_path", default, skip_serializing_if = "Option::is_none")]
    pub custom_icon: Option<String>,
}

impl Group {
    /// Create an empty group at the given position
    pub fn new(name: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            items: Vec::new(),
            custom_icon: None,
        }
    }
}

/// Wrapper for `groups.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupsFile {
    /// Format version tag
    pub version: String,
    /// Write timestamp
    pub created: DateTime<Utc>,
    /// The group collection
    pub groups: Vec<Group>,
}

impl GroupsFile {
    /// Wrap a group list with current metadata
    pub fn now(groups: Vec<Group>) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            created: Utc::now(),
            groups,
        }
    }
}

/// A complete named snapshot of the group collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Profile name, unique and filesystem-safe
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Creation timestamp
    pub created: DateTime<Utc>,
    /// Last-update timestamp
    pub updated: DateTime<Utc>,
    /// Format version tag
    pub version: String,
    /// Snapshotted groups (independent copies, never shared with the live collection)
    #[serde(default)]
    pub groups: Vec<Group>,
    /// Optional global hotkey that switches to this profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotkey: Option<HotkeyBinding>,
}

impl Profile {
    /// Create a profile snapshot with current timestamps
    pub fn now(
        name: impl Into<String>,
        description: impl Into<String>,
        groups: Vec<Group>,
        hotkey: Option<HotkeyBinding>,
    ) -> Self {
        let stamp = Utc::now();
        Self {
            name: name.into(),
            description: description.into(),
            created: stamp,
            updated: stamp,
            version: FORMAT_VERSION.to_string(),
            groups,
            hotkey,
        }
    }
}

/// Pointer record `current_profile.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentProfileFile {
    /// Name of the active profile, if any
    pub current_profile: Option<String>,
    /// Last pointer update
    pub updated: DateTime<Utc>,
}

/// Wrapper produced by profile export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileExport {
    /// Export format version
    pub export_version: String,
    /// Export timestamp
    pub exported: DateTime<Utc>,
    /// Product name tag
    pub app_name: String,
    /// The exported profile
    pub profile: Profile,
}

/// Whole-system export bundle: settings, current groups, and all profiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportBundle {
    /// Format version tag
    pub version: String,
    /// Export timestamp
    pub exported: DateTime<Utc>,
    /// Product name tag
    pub app_name: String,
    /// Settings map at export time
    pub settings: crate::config::settings::SettingsMap,
    /// Live group collection at export time
    pub groups: Vec<Group>,
    /// All saved profiles plus the current pointer
    pub profiles: ProfilesExport,
}

/// Profile section of an [`ExportBundle`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilesExport {
    /// Full profile documents keyed by name
    #[serde(default)]
    pub entries: Vec<Profile>,
    /// Name of the profile that was current at export time
    #[serde(default)]
    pub current_profile: Option<String>,
}
