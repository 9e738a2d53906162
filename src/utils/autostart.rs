//! Start-with-Windows via the per-user Run registry key
//!
//! The launcher registers itself under
//! `HKCU\SOFTWARE\Microsoft\Windows\CurrentVersion\Run` when
//! `behavior.startup_with_windows` is enabled. The [`RunKey`] trait isolates
//! the registry so migration and the settings path are testable off-Windows.

use crate::error::{LauncherError, Result};
use crate::config::store::APP_NAME;
use std::path::Path;
use tracing::info;

/// Registry value name for the autostart entry
const RUN_VALUE_NAME: &str = APP_NAME;

/// Minimal view of a registry Run key
pub trait RunKey {
    /// Read the command registered under `name`, if any
    fn get(&self, name: &str) -> Result<Option<String>>;
    /// Register `command` under `name`
    fn set(&mut self, name: &str, command: &str) -> Result<()>;
    /// Delete the entry under `name` (absent entries are a no-op)
    fn remove(&mut self, name: &str) -> Result<()>;
}

/// Run key backed by the Windows registry
#[cfg(windows)]
pub struct WindowsRunKey;

#[cfg(windows)]
impl RunKey for WindowsRunKey {
    fn get(&self, name: &str) -> Result<Option<String>> {
        use winreg::RegKey;
        use winreg::enums::{HKEY_CURRENT_USER, KEY_READ};

        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let run = hkcu
            .open_subkey_with_flags(
                r"SOFTWARE\Microsoft\Windows\CurrentVersion\Run",
                KEY_READ,
            )
            .map_err(registry_error)?;
        match run.get_value::<String, _>(name) {
            Ok(command) => Ok(Some(command)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(registry_error(e)),
        }
    }

    fn set(&mut self, name: &str, command: &str) -> Result<()> {
        use winreg::RegKey;
        use winreg::enums::{HKEY_CURRENT_USER, KEY_SET_VALUE};

        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let run = hkcu
            .open_subkey_with_flags(
                r"SOFTWARE\Microsoft\Windows\CurrentVersion\Run",
                KEY_SET_VALUE,
            )
            .map_err(registry_error)?;
        run.set_value(name, &command).map_err(registry_error)
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        use winreg::RegKey;
        use winreg::enums::{HKEY_CURRENT_USER, KEY_SET_VALUE};

        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let run = hkcu
            .open_subkey_with_flags(
                r"SOFTWARE\Microsoft\Windows\CurrentVersion\Run",
                KEY_SET_VALUE,
            )
            .map_err(registry_error)?;
        match run.delete_value(name) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(registry_error(e)),
        }
    }
}

#[cfg(windows)]
fn registry_error(e: std::io::Error) -> LauncherError {
    LauncherError::Registry(Box::new(e))
}

/// In-memory run key for tests and non-Windows builds
#[derive(Debug, Default)]
pub struct MemoryRunKey {
    entries: std::collections::BTreeMap<String, String>,
}

impl RunKey for MemoryRunKey {
    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.entries.get(name).cloned())
    }

    fn set(&mut self, name: &str, command: &str) -> Result<()> {
        self.entries.insert(name.to_string(), command.to_string());
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        self.entries.remove(name);
        Ok(())
    }
}

/// The platform's default run key
#[cfg(windows)]
pub fn platform_run_key() -> Box<dyn RunKey> {
    Box::new(WindowsRunKey)
}

/// The platform's default run key
#[cfg(not(windows))]
pub fn platform_run_key() -> Box<dyn RunKey> {
    Box::new(MemoryRunKey::default())
}

/// Autostart service bound to a run key
pub struct Autostart {
    run_key: Box<dyn RunKey>,
}

impl Autostart {
    /// Create the service over a run key implementation
    pub fn new(run_key: Box<dyn RunKey>) -> Self {
        Self { run_key }
    }

    /// Create the service over the platform's registry
    pub fn platform() -> Self {
        Self::new(platform_run_key())
    }

    /// Whether an autostart entry is registered
    pub fn is_enabled(&self) -> Result<bool> {
        Ok(self.run_key.get(RUN_VALUE_NAME)?.is_some())
    }

    /// Register the current executable for startup
    pub fn enable(&mut self) -> Result<()> {
        let exe = std::env::current_exe()?;
        self.enable_with_command(&quote_command(&exe))
    }

    /// Register an explicit command for startup
    pub fn enable_with_command(&mut self, command: &str) -> Result<()> {
        self.run_key.set(RUN_VALUE_NAME, command)?;
        info!("Autostart enabled: {}", command);
        Ok(())
    }

    /// Remove the startup entry
    pub fn disable(&mut self) -> Result<()> {
        self.run_key.remove(RUN_VALUE_NAME)?;
        info!("Autostart disabled");
        Ok(())
    }

    /// The run key, for migration of the old product's entry
    pub fn run_key_mut(&mut self) -> &mut dyn RunKey {
        &mut *self.run_key
    }
}

/// The Run-key command for the current executable
pub fn current_exe_command() -> Result<String> {
    Ok(quote_command(&std::env::current_exe()?))
}

/// Quote an executable path the way the Run key expects
fn quote_command(exe: &Path) -> String {
    format!("\"{}\"", exe.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_disable_round_trip() {
        let mut autostart = Autostart::new(Box::new(MemoryRunKey::default()));
        assert!(!autostart.is_enabled().unwrap());

        autostart
            .enable_with_command("\"C:\\Apps\\iconLaunch.exe\"")
            .unwrap();
        assert!(autostart.is_enabled().unwrap());

        autostart.disable().unwrap();
        assert!(!autostart.is_enabled().unwrap());
    }

    #[test]
    fn test_disable_when_absent_is_noop() {
        let mut autostart = Autostart::new(Box::new(MemoryRunKey::default()));
        autostart.disable().unwrap();
        assert!(!autostart.is_enabled().unwrap());
    }

    #[test]
    fn test_command_is_quoted() {
        assert_eq!(
            quote_command(Path::new("C:\\Program Files\\iconLaunch\\iconLaunch.exe")),
            "\"C:\\Program Files\\iconLaunch\\iconLaunch.exe\""
        );
    }
}
