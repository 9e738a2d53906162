//! Application context: owned core state, no ambient singletons
//!
//! `AppContext` owns the stores, the live group collection, and the event
//! dispatcher, and is passed by reference to whatever needs it. Every
//! mutation persists synchronously before the matching event goes out, so a
//! listener always observes on-disk state that matches the payload.

use crate::config::models::{ExportBundle, FORMAT_VERSION, Group, ProfilesExport};
use crate::config::store::APP_NAME;
use crate::config::{ConfigStore, GroupStore, MigrationAgent, ProfileStore, SettingsStore};
use crate::error::Result;
use crate::events::{AppEvent, EventDispatcher, Listener};
use crate::groups::GroupCollection;
use crate::hotkey::{HotkeyBinding, HotkeyRegistrar};
use crate::utils::autostart::Autostart;
use crate::utils::shortcut::ShortcutResolver;
use chrono::Utc;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Owned core state for one application instance
pub struct AppContext {
    store: ConfigStore,
    settings: SettingsStore,
    profiles: ProfileStore,
    group_store: GroupStore,
    collection: GroupCollection,
    dispatcher: EventDispatcher,
    autostart: Autostart,
    resolver: Box<dyn ShortcutResolver>,
}

impl AppContext {
    /// Start the application core
    ///
    /// Creates the config tree, runs the one-shot migration when this looks
    /// like a first start after an upgrade, loads settings and profiles, and
    /// populates the live collection from the current profile's snapshot or,
    /// with no current profile, from `groups.json`.
    pub fn startup(
        store: ConfigStore,
        mut autostart: Autostart,
        resolver: Box<dyn ShortcutResolver>,
    ) -> Result<Self> {
        store.ensure_directories()?;

        let agent = MigrationAgent::new(store.clone());
        if agent.is_needed() {
            let mut report = agent.run();
            agent.migrate_autostart(autostart.run_key_mut(), &mut report);
        }

        let settings = SettingsStore::load(store.clone());
        let profiles = ProfileStore::load(store.clone());
        let group_store = GroupStore::new(store.clone());

        let groups = match profiles.current() {
            Some(current) => match profiles.load_groups(current) {
                Ok(groups) => groups,
                Err(e) => {
                    warn!("Failed to load current profile, using groups.json: {}", e);
                    group_store.load()
                }
            },
            None => group_store.load(),
        };
        info!("Loaded {} group(s)", groups.len());

        Ok(Self {
            store,
            settings,
            profiles,
            group_store,
            collection: GroupCollection::from_groups(groups),
            dispatcher: EventDispatcher::new(),
            autostart,
            resolver,
        })
    }

    /// The config store
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// The settings store
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// The profile store
    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    /// The live group collection
    pub fn groups(&self) -> &GroupCollection {
        &self.collection
    }

    /// Register an event listener
    pub fn subscribe(&mut self, listener: Listener) {
        self.dispatcher.subscribe(listener);
    }

    fn save_groups(&self) -> Result<()> {
        self.group_store.save(self.collection.groups())
    }

    /// Add a new group and persist
    pub fn add_group(&mut self, name: &str, x: i32, y: i32) -> Result<()> {
        self.collection.add_group(name, x, y)?;
        self.save_groups()?;
        self.dispatcher.dispatch(&AppEvent::ItemsChanged {
            group: name.trim().to_string(),
        });
        Ok(())
    }

    /// Remove a group and persist
    pub fn remove_group(&mut self, name: &str) -> Result<Group> {
        let removed = self.collection.remove_group(name)?;
        self.save_groups()?;
        self.dispatcher.dispatch(&AppEvent::ItemsChanged {
            group: name.to_string(),
        });
        Ok(removed)
    }

    /// Rename a group and persist
    pub fn rename_group(&mut self, old: &str, new: &str) -> Result<()> {
        self.collection.rename_group(old, new)?;
        self.save_groups()?;
        self.dispatcher.dispatch(&AppEvent::ItemsChanged {
            group: new.trim().to_string(),
        });
        Ok(())
    }

    /// Move a group's desktop icon and persist
    pub fn set_group_position(&mut self, name: &str, x: i32, y: i32) -> Result<()> {
        self.collection.set_position(name, x, y)?;
        self.save_groups()?;
        self.dispatcher.dispatch(&AppEvent::PositionChanged {
            group: name.to_string(),
            x,
            y,
        });
        Ok(())
    }

    /// Add a dropped path to a group and persist
    ///
    /// Returns `false` for the silent dedup no-op; nothing is saved or
    /// dispatched in that case.
    pub fn add_item(&mut self, group: &str, path: &Path) -> Result<bool> {
        if !self.collection.add_item(group, path, &*self.resolver)? {
            return Ok(false);
        }
        self.save_groups()?;
        self.dispatcher.dispatch(&AppEvent::ItemsChanged {
            group: group.to_string(),
        });
        Ok(true)
    }

    /// Remove an item and persist
    pub fn remove_item(&mut self, group: &str, resolved_path: &Path) -> Result<()> {
        self.collection.remove_item(group, resolved_path)?;
        self.save_groups()?;
        self.dispatcher.dispatch(&AppEvent::ItemsChanged {
            group: group.to_string(),
        });
        Ok(())
    }

    /// Reorder an item within its group and persist
    pub fn reorder_item(
        &mut self,
        group: &str,
        resolved_path: &Path,
        target_index: usize,
    ) -> Result<()> {
        self.collection.reorder(group, resolved_path, target_index)?;
        self.save_groups()?;
        self.dispatcher.dispatch(&AppEvent::ItemsChanged {
            group: group.to_string(),
        });
        Ok(())
    }

    /// Toggle an item's bulk-launch flag and persist
    pub fn set_item_checked(
        &mut self,
        group: &str,
        resolved_path: &Path,
        checked: bool,
    ) -> Result<()> {
        self.collection.set_checked(group, resolved_path, checked)?;
        self.save_groups()?;
        self.dispatcher.dispatch(&AppEvent::ItemsChanged {
            group: group.to_string(),
        });
        Ok(())
    }

    /// Snapshot the live collection under a profile name
    pub fn save_profile(&self, name: &str, description: &str) -> Result<()> {
        self.profiles
            .save_snapshot(name, description, self.collection.groups())
    }

    /// Switch profiles, auto-saving the outgoing one
    pub fn switch_profile(&mut self, name: &str) -> Result<()> {
        let incoming = self.profiles.switch_to(name, self.collection.groups())?;
        self.collection.replace(incoming);
        self.save_groups()?;
        self.dispatcher.dispatch(&AppEvent::ProfileSwitched {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Set a setting, persist, and apply side effects
    ///
    /// `behavior.startup_with_windows` additionally toggles the registry
    /// autostart entry; a registry failure is logged but does not undo the
    /// setting.
    pub fn set_setting(&mut self, category: &str, key: &str, value: Value) -> Result<()> {
        self.settings.set(category, key, value.clone())?;

        if category == "behavior" && key == "startup_with_windows" {
            let result = if value.as_bool() == Some(true) {
                self.autostart.enable()
            } else {
                self.autostart.disable()
            };
            if let Err(e) = result {
                warn!("Autostart update failed: {}", e);
            }
        }

        self.dispatcher.dispatch(&AppEvent::SettingsChanged {
            category: category.to_string(),
        });
        Ok(())
    }

    /// Restore default settings and remove the autostart entry
    pub fn reset_settings(&mut self) -> Result<()> {
        self.settings.reset()?;
        if let Err(e) = self.autostart.disable() {
            warn!("Autostart removal failed: {}", e);
        }
        self.dispatcher.dispatch(&AppEvent::SettingsChanged {
            category: "*".to_string(),
        });
        Ok(())
    }

    /// Export a whole-system bundle into the exports directory under a
    /// timestamped name, returning the written path
    pub fn export_bundle_timestamped(&self) -> Result<std::path::PathBuf> {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = self
            .store
            .exports_dir()
            .join(format!("launcher_settings_{stamp}.json"));
        self.export_bundle(&path)?;
        Ok(path)
    }

    /// Export settings, the live groups, and every profile into one bundle
    pub fn export_bundle(&self, path: &Path) -> Result<()> {
        let entries = self
            .profiles
            .list()
            .into_iter()
            .filter_map(|info| self.profiles.get(&info.name).ok())
            .collect();

        self.store.write_json(
            path,
            &ExportBundle {
                version: FORMAT_VERSION.to_string(),
                exported: Utc::now(),
                app_name: APP_NAME.to_string(),
                settings: self.settings.settings().clone(),
                groups: self.collection.groups().to_vec(),
                profiles: ProfilesExport {
                    entries,
                    current_profile: self.profiles.current().map(str::to_string),
                },
            },
        )
    }

    /// Import a whole-system bundle written by [`export_bundle`](Self::export_bundle)
    ///
    /// Settings are merged over defaults, the live groups are replaced, and
    /// every profile in the bundle is restored (a profile with an invalid
    /// name is skipped and logged). Both `settings.json` and `groups.json`
    /// rotate a backup before they are overwritten, so a bad import can be
    /// recovered from.
    pub fn import_bundle(&mut self, path: &Path) -> Result<()> {
        let bundle: ExportBundle = serde_json::from_value(self.store.read_value(path)?)?;

        self.settings.import(&bundle.settings)?;

        self.collection.replace(bundle.groups);
        self.save_groups()?;

        for profile in bundle.profiles.entries {
            let name = profile.name.clone();
            if let Err(e) = self.profiles.restore(profile) {
                warn!("Skipping bundled profile '{}': {}", name, e);
            }
        }
        self.profiles
            .restore_pointer(bundle.profiles.current_profile.as_deref())?;

        info!("Imported bundle from {}", path.display());
        self.dispatcher.dispatch(&AppEvent::SettingsChanged {
            category: "*".to_string(),
        });
        Ok(())
    }

    /// Register the global hotkeys through `registrar`
    ///
    /// Id 0 is the visibility toggle from the settings file; profile bindings
    /// follow under incrementing ids. An unparseable settings string skips
    /// that registration and is logged.
    pub fn register_hotkeys(&self, registrar: &mut dyn HotkeyRegistrar) -> Result<u32> {
        let mut next_id = 0;

        if let Some(binding) = self
            .settings
            .get("hotkey", "toggle_visibility")
            .and_then(Value::as_str)
            .and_then(HotkeyBinding::parse_lenient)
        {
            registrar.register(next_id, &binding)?;
            next_id += 1;
        }

        for info in self.profiles.list() {
            let binding = self.profiles.get(&info.name).ok().and_then(|p| p.hotkey);
            if let Some(binding) = binding {
                registrar.register(next_id, &binding)?;
                next_id += 1;
            }
        }

        info!("Registered {} hotkey(s)", next_id);
        Ok(next_id)
    }
}
