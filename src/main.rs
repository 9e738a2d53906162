//! `iconLaunch` - desktop launcher groups for Windows
//!
//! Boots the application core: logging, config migration, settings, profiles,
//! and the live group collection. The desktop shell attaches on top of the
//! [`AppContext`] built here.

// Set Windows subsystem to hide console window
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::{Context, Result};
use iconlaunch::config::ConfigStore;
use iconlaunch::config::store::log_config_info;
use iconlaunch::context::AppContext;
use iconlaunch::hotkey::NullRegistrar;
use iconlaunch::utils::autostart::Autostart;
use iconlaunch::utils::shortcut::LnkResolver;
use iconlaunch::utils::init_logging;
use tracing::info;

fn main() -> Result<()> {
    init_logging().context("Failed to initialize logging system")?;

    info!("iconLaunch v{} starting...", env!("CARGO_PKG_VERSION"));

    let store = ConfigStore::new();
    log_config_info(&store);

    let context = AppContext::startup(store, Autostart::platform(), Box::new(LnkResolver))
        .context("Failed to start application core")?;

    // The shell swaps in the RegisterHotKey-backed registrar once it owns a
    // message loop to receive WM_HOTKEY on
    let mut registrar = NullRegistrar;
    context
        .register_hotkeys(&mut registrar)
        .context("Failed to register hotkeys")?;

    info!(
        "Core ready: {} group(s), {} profile(s), current profile: {}",
        context.groups().len(),
        context.profiles().list().len(),
        context.profiles().current().unwrap_or("none")
    );

    // The desktop shell event loop mounts here
    info!("iconLaunch shutting down");

    Ok(())
}
