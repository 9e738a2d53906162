//! Global hotkey bindings
//!
//! Parses the `(Modifier '+')+ Key` grammar used by the settings file and
//! profile bindings, and defines the registrar seam the OS-level registration
//! code plugs into. Actual `RegisterHotKey` mechanics live outside the core;
//! an unparseable string means registration is skipped and logged, never a
//! crash.

use crate::error::{LauncherError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Hotkey modifier, in canonical display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    /// Control key
    Ctrl,
    /// Alt key
    Alt,
    /// Shift key
    Shift,
    /// Windows key
    Win,
}

impl Modifier {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Modifier::Ctrl),
            "alt" => Some(Modifier::Alt),
            "shift" => Some(Modifier::Shift),
            "win" | "windows" => Some(Modifier::Win),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Modifier::Ctrl => "Ctrl",
            Modifier::Alt => "Alt",
            Modifier::Shift => "Shift",
            Modifier::Win => "Win",
        }
    }
}

/// The non-modifier part of a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A single `A`–`Z` or `0`–`9` character (stored uppercase)
    Char(char),
    /// A function key `F1`–`F12`
    Function(u8),
}

impl Key {
    fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(num) = s.strip_prefix(['F', 'f']) {
            if let Ok(n) = num.parse::<u8>() {
                if (1..=12).contains(&n) {
                    return Some(Key::Function(n));
                }
            }
            // "F" alone falls through to the single-character case
        }
        let mut chars = s.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let c = c.to_ascii_uppercase();
        c.is_ascii_uppercase().then_some(Key::Char(c)).or_else(|| {
            c.is_ascii_digit().then_some(Key::Char(c))
        })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Function(n) => write!(f, "F{n}"),
        }
    }
}

/// A parsed hotkey binding, serialized as its string form (`Ctrl+Alt+L`)
///
/// Modifiers are stored sorted and deduplicated, so two bindings written with
/// different modifier order compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HotkeyBinding {
    modifiers: Vec<Modifier>,
    key: Key,
}

impl HotkeyBinding {
    /// Parse a binding from the `(Modifier '+')+ Key` grammar
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('+').map(str::trim).collect();
        if parts.len() < 2 {
            return Err(LauncherError::Hotkey(s.to_string()));
        }

        let Some((key_part, modifier_parts)) = parts.split_last() else {
            return Err(LauncherError::Hotkey(s.to_string()));
        };

        let mut modifiers = Vec::new();
        for part in modifier_parts {
            let modifier =
                Modifier::parse(part).ok_or_else(|| LauncherError::Hotkey(s.to_string()))?;
            if !modifiers.contains(&modifier) {
                modifiers.push(modifier);
            }
        }
        modifiers.sort_unstable();

        let key = Key::parse(key_part).ok_or_else(|| LauncherError::Hotkey(s.to_string()))?;
        Ok(Self { modifiers, key })
    }

    /// Parse a binding, logging and discarding failures
    ///
    /// This is the path registration uses: a bad string in the settings file
    /// skips registration instead of failing startup.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        match Self::parse(s) {
            Ok(binding) => Some(binding),
            Err(e) => {
                warn!("Skipping hotkey registration: {}", e);
                None
            }
        }
    }

    /// The modifier set, sorted canonically
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// The key part
    pub fn key(&self) -> Key {
        self.key
    }
}

impl fmt::Display for HotkeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier.label())?;
        }
        write!(f, "{}", self.key)
    }
}

impl TryFrom<String> for HotkeyBinding {
    type Error = LauncherError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<HotkeyBinding> for String {
    fn from(binding: HotkeyBinding) -> Self {
        binding.to_string()
    }
}

/// Seam to the OS-level global hotkey registration
///
/// The core only decides *what* to register; delivery of the pressed-hotkey
/// signal back onto the event thread is the embedder's concern.
pub trait HotkeyRegistrar {
    /// Register `binding` under a stable numeric id
    fn register(&mut self, id: u32, binding: &HotkeyBinding) -> Result<()>;
    /// Unregister a previously registered id (absent ids are a no-op)
    fn unregister(&mut self, id: u32) -> Result<()>;
}

/// Registrar that records nothing; used when the platform offers no global
/// hotkeys
#[derive(Debug, Default)]
pub struct NullRegistrar;

impl HotkeyRegistrar for NullRegistrar {
    fn register(&mut self, _id: u32, _binding: &HotkeyBinding) -> Result<()> {
        Ok(())
    }

    fn unregister(&mut self, _id: u32) -> Result<()> {
        Ok(())
    }
}

/// In-memory registrar recording what would be registered with the OS
#[derive(Debug, Default)]
pub struct MemoryRegistrar {
    bindings: Vec<(u32, HotkeyBinding)>,
}

impl MemoryRegistrar {
    /// The currently registered (id, binding) pairs, in registration order
    pub fn bindings(&self) -> &[(u32, HotkeyBinding)] {
        &self.bindings
    }
}

impl HotkeyRegistrar for MemoryRegistrar {
    fn register(&mut self, id: u32, binding: &HotkeyBinding) -> Result<()> {
        // Re-registering an id replaces its binding, like RegisterHotKey
        // after an UnregisterHotKey
        self.bindings.retain(|(existing, _)| *existing != id);
        self.bindings.push((id, binding.clone()));
        Ok(())
    }

    fn unregister(&mut self, id: u32) -> Result<()> {
        self.bindings.retain(|(existing, _)| *existing != id);
        Ok(())
    }
}
