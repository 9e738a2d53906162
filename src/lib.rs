//! `iconLaunch` - desktop launcher groups for Windows
//!
//! Organizes files, folders, and shortcuts into named desktop groups that
//! launch together. This crate is the application core: config persistence
//! with atomic writes and backup rotation, named profiles of the group
//! collection, category-partitioned settings, hotkey bindings, and migration
//! from the previous product name. UI layers drive it through [`context::AppContext`]
//! and subscribe to [`events::AppEvent`].

// Module declarations
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod groups;
pub mod hotkey;
pub mod utils;

// Re-export commonly used types
pub use error::{LauncherError, Result};
