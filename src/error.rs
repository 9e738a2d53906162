//! Error types for the `iconLaunch` core
//!
//! This module defines all error types used throughout the application,
//! providing clear error messages and proper error propagation.
//!
//! Expected failures (missing profiles, invalid names, conflicts) are modeled
//! as dedicated variants so callers can match on them instead of parsing
//! message strings.

use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new `StringError` from a string message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// Main error type for the `iconLaunch` core
#[derive(Debug, Error)]
pub enum LauncherError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A config document had an unexpected JSON shape
    #[error("Unexpected config format: {0}")]
    Format(String),

    /// A user-supplied name was empty or whitespace-only
    #[error("Name is empty")]
    NameEmpty,

    /// A user-supplied name contained a reserved character
    #[error("Name contains invalid character '{0}'")]
    NameInvalid(char),

    /// A name collided with an existing entry
    #[error("'{0}' already exists")]
    Conflict(String),

    /// A referenced profile or entry does not exist
    #[error("'{0}' was not found")]
    NotFound(String),

    /// The operation is not allowed on the currently active profile
    #[error("'{0}' is the current profile")]
    CurrentProfile(String),

    /// A hotkey string did not match the expected grammar
    #[error("Invalid hotkey string: {0}")]
    Hotkey(String),

    /// Registry access error (autostart management)
    /// Preserves the underlying error source for full error chain transparency
    #[error("Registry error: {0}")]
    Registry(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Logging system initialization error
    #[error("Logging error: {0}")]
    Logging(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias for `iconLaunch` operations
pub type Result<T> = std::result::Result<T, LauncherError>;

/// Convert an error to a user-friendly message
///
/// Validation and conflict errors carry the precise reason so the UI can show
/// it inline; IO and format errors map to generic failure notices.
pub fn get_user_friendly_error(error: &LauncherError) -> String {
    match error {
        LauncherError::Io(e) => {
            format!(
                "A file system error occurred:\n\n{e}\n\n\
                 Please check file permissions and disk space."
            )
        }
        LauncherError::Json(e) => {
            format!(
                "Configuration file is corrupted:\n\n{e}\n\n\
                 The most recent backup will be used if available."
            )
        }
        LauncherError::Format(detail) => {
            format!(
                "Configuration file has an unexpected format:\n\n{detail}\n\n\
                 The application will fall back to defaults."
            )
        }
        LauncherError::NameEmpty => "The name cannot be empty.".to_string(),
        LauncherError::NameInvalid(c) => {
            format!("The name contains the invalid character '{c}'.\n\nNot allowed: \\ / : * ? \" < > |")
        }
        LauncherError::Conflict(name) => {
            format!("'{name}' already exists.\n\nPlease choose a different name.")
        }
        LauncherError::NotFound(name) => {
            format!("'{name}' was not found.\n\nIt may have been renamed or deleted.")
        }
        LauncherError::CurrentProfile(name) => {
            format!(
                "'{name}' is the profile currently in use.\n\n\
                 Switch to another profile before deleting it."
            )
        }
        LauncherError::Hotkey(s) => {
            format!(
                "'{s}' is not a valid hotkey.\n\n\
                 Use modifiers (Ctrl, Alt, Shift, Win) joined with '+' and a\n\
                 letter, digit, or function key, e.g. Ctrl+Alt+L."
            )
        }
        LauncherError::Registry(e) => {
            format!(
                "A registry error occurred:\n\n{e}\n\n\
                 Autostart settings may not have been applied."
            )
        }
        LauncherError::Logging(e) => {
            format!("The logging system could not be started:\n\n{e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = LauncherError::NotFound("Work".to_string());
        assert_eq!(error.to_string(), "'Work' was not found");
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: LauncherError = io_error.into();
        assert!(matches!(error, LauncherError::Io(_)));
    }

    #[test]
    fn test_name_invalid_user_friendly() {
        let error = LauncherError::NameInvalid('/');
        let message = get_user_friendly_error(&error);
        assert!(message.contains('/'));
        assert!(message.contains("Not allowed"));
    }

    #[test]
    fn test_current_profile_user_friendly() {
        let error = LauncherError::CurrentProfile("Home".to_string());
        let message = get_user_friendly_error(&error);
        assert!(message.contains("Home"));
        assert!(message.contains("currently in use"));
    }

    #[test]
    fn test_json_error_mentions_backup_recovery() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let message = get_user_friendly_error(&LauncherError::Json(json_error));
        assert!(message.contains("backup"));
    }
}
