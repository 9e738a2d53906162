//! Configuration management module
//!
//! This module handles loading, saving, and managing the config directory
//! tree (`groups.json`, `settings.json`, profiles, backups). All writes are
//! atomic to prevent corruption.

pub mod backup;
pub mod groups;
pub mod migration;
pub mod models;
pub mod profiles;
pub mod settings;
pub mod store;

pub use backup::BackupRotator;
pub use groups::GroupStore;
pub use migration::{MigrationAgent, MigrationReport};
pub use models::{Group, GroupsFile, Item, ItemKind, Profile};
pub use profiles::{ProfileInfo, ProfileStore};
pub use settings::{SettingsMap, SettingsStore};
pub use store::ConfigStore;
