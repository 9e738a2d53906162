#![no_main]

use iconlaunch::config::ConfigStore;
use iconlaunch::config::models::{GroupsFile, Profile};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Try to parse arbitrary bytes as the persisted config documents
    // This tests for crashes, panics, and undefined behavior
    if let Ok(s) = std::str::from_utf8(data) {
        let _groups: Result<GroupsFile, _> = serde_json::from_str(s);
        let _profile: Result<Profile, _> = serde_json::from_str(s);
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(s) {
            let _ = ConfigStore::unwrap_groups(value.clone());
            let _ = ConfigStore::unwrap_settings(value);
        }
    }
});
