//! Utility modules
//!
//! Provides auto-start management, shortcut resolution, and logging.

pub mod autostart;
pub mod logging;
pub mod shortcut;

pub use autostart::Autostart;
pub use logging::init_logging;
pub use shortcut::{ShortcutResolver, is_shortcut_file};
