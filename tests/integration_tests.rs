//! Integration tests for `iconLaunch`
//!
//! Exercises the full core lifecycle on a temporary config root: startup,
//! group mutations, profile switching, settings merge, backup recovery, and
//! migration from the old product directory.

use iconlaunch::config::store::log_config_info;
use iconlaunch::config::{ConfigStore, GroupStore, MigrationAgent};
use iconlaunch::context::AppContext;
use iconlaunch::error::{LauncherError, get_user_friendly_error};
use iconlaunch::utils::autostart::{Autostart, MemoryRunKey, RunKey};
use iconlaunch::utils::shortcut::PassthroughResolver;
use serde_json::json;
use std::path::Path;

fn context_in(dir: &Path) -> AppContext {
    AppContext::startup(
        ConfigStore::with_root(dir),
        Autostart::new(Box::new(MemoryRunKey::default())),
        Box::new(PassthroughResolver),
    )
    .unwrap()
}

/// Full lifecycle: first start, build groups, restart, data survives
#[test]
fn test_cold_start_then_restart_preserves_state() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut context = context_in(dir.path());
        log_config_info(context.store());
        context.add_group("Apps", 100, 200).unwrap();
        context.add_item("Apps", Path::new("C:\\Tools\\editor.exe")).unwrap();
        context.add_item("Apps", Path::new("C:\\Tools\\terminal.exe")).unwrap();
        context
            .reorder_item("Apps", Path::new("C:\\Tools\\terminal.exe"), 0)
            .unwrap();
    }

    let context = context_in(dir.path());
    let group = context.groups().get("Apps").unwrap();
    assert_eq!((group.x, group.y), (100, 200));
    assert_eq!(group.items[0].resolved_path, Path::new("C:\\Tools\\terminal.exe"));
    assert_eq!(group.items[1].resolved_path, Path::new("C:\\Tools\\editor.exe"));
}

/// Profile round trip across restarts, including the auto-save on switch
#[test]
fn test_profile_workflow_end_to_end() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut context = context_in(dir.path());
        context.add_group("Work Apps", 0, 0).unwrap();
        context.add_item("Work Apps", Path::new("C:\\w\\mail.exe")).unwrap();
        context.save_profile("Work", "office").unwrap();
        context.switch_profile("Work").unwrap();

        context.profiles().create_empty("Home", "", None).unwrap();
        context.switch_profile("Home").unwrap();
        assert!(context.groups().is_empty());
    }

    let mut context = context_in(dir.path());
    assert_eq!(context.profiles().current(), Some("Home"));

    // Switching to an unknown profile fails and changes nothing
    let err = context.switch_profile("Vacation").unwrap_err();
    assert!(matches!(err, LauncherError::NotFound(_)));
    assert_eq!(context.profiles().current(), Some("Home"));

    context.switch_profile("Work").unwrap();
    let group = context.groups().get("Work Apps").unwrap();
    assert_eq!(group.items.len(), 1);
}

/// Settings written by an older release merge cleanly over current defaults
#[test]
fn test_settings_merge_on_startup() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("settings.json"),
        r#"{"appearance":{"icon_size":100},"legacy_category":{"x":1}}"#,
    )
    .unwrap();

    let context = context_in(dir.path());
    let settings = context.settings();
    assert_eq!(settings.get("appearance", "icon_size"), Some(&json!(100)));
    assert_eq!(settings.get("appearance", "opacity"), Some(&json!(80)));
    assert_eq!(settings.get("behavior", "launch_interval"), Some(&json!(3)));
    assert_eq!(settings.get("advanced", "max_backups"), Some(&json!(10)));
    assert!(settings.get("legacy_category", "x").is_none());
}

/// Corrupted group data recovers from the rotated backup
#[test]
fn test_backup_recovery_after_corruption() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut context = context_in(dir.path());
        context.add_group("Apps", 0, 0).unwrap();
        context.add_item("Apps", Path::new("C:\\a.exe")).unwrap();
    }
    std::fs::write(dir.path().join("groups.json"), "{definitely not json").unwrap();

    let context = context_in(dir.path());
    let group = context.groups().get("Apps").unwrap();
    assert_eq!(group.items.len(), 1);
}

/// A prior installation's directory migrates on first start
#[test]
fn test_migration_from_old_installation() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("DesktopLauncher");
    std::fs::create_dir_all(&old).unwrap();
    std::fs::write(
        old.join("groups.json"),
        r#"{"groups":[{"name":"Carried Over","x":5,"y":6,"items":[
            {"path":"C:\\a.exe","name":"a","type":"file","original_path":"C:\\a.exe","checked":true}
        ]}]}"#,
    )
    .unwrap();
    std::fs::write(old.join("settings.json"), r#"{"appearance":{"icon_size":64}}"#).unwrap();

    let new_root = dir.path().join("iconLaunch");
    let store = ConfigStore::with_root(&new_root);
    let agent = MigrationAgent::with_dirs(&old, store.clone());
    let report = agent.run();
    assert!(report.migrated_anything);

    let mut run_key = MemoryRunKey::default();
    run_key.set("DesktopLauncher", "\"C:\\old.exe\"").unwrap();
    let mut report = report;
    agent.migrate_autostart(&mut run_key, &mut report);
    assert!(report.autostart_migrated);
    assert_eq!(run_key.get("DesktopLauncher").unwrap(), None);
    assert!(run_key.get("iconLaunch").unwrap().is_some());

    let context = AppContext::startup(
        store,
        Autostart::new(Box::new(MemoryRunKey::default())),
        Box::new(PassthroughResolver),
    )
    .unwrap();
    let group = context.groups().get("Carried Over").unwrap();
    assert_eq!(group.items.len(), 1);
    assert_eq!(context.settings().get("appearance", "icon_size"), Some(&json!(64)));
}

/// Group export/import through the standalone group store
#[test]
fn test_group_export_import_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut context = context_in(dir.path());
    context.add_group("Apps", 10, 10).unwrap();
    context.add_item("Apps", Path::new("C:\\a.exe")).unwrap();

    let export = dir.path().join("exports").join("groups_export.json");
    std::fs::create_dir_all(export.parent().unwrap()).unwrap();
    let store = GroupStore::new(ConfigStore::with_root(dir.path()));
    store.export_to(&export).unwrap();

    // Import into a fresh root
    let other = tempfile::tempdir().unwrap();
    let other_store = GroupStore::new(ConfigStore::with_root(other.path()));
    other_store.import_from(&export).unwrap();
    let loaded = other_store.load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].items.len(), 1);
}

/// Expected failures map to messages a dialog can show verbatim
#[test]
fn test_user_facing_error_messages() {
    let dir = tempfile::tempdir().unwrap();
    let mut context = context_in(dir.path());
    context.add_group("Apps", 0, 0).unwrap();

    let err = context.add_group("Apps", 0, 0).unwrap_err();
    assert!(get_user_friendly_error(&err).contains("already exists"));

    let err = context.switch_profile("Nope").unwrap_err();
    assert!(get_user_friendly_error(&err).contains("not found"));
}
