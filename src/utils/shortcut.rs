//! Windows shortcut (`.lnk`) handling
//!
//! Dropped shortcuts are stored by their resolved target so deduplication
//! works across "the exe" and "a shortcut to the exe". Resolution is best
//! effort: scanning the shell link binary for an existing `.exe` path covers
//! the common case, and anything unresolvable keeps its original path.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Whether the path names a Windows shortcut file
pub fn is_shortcut_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("lnk"))
}

/// File name for display, with a trailing `.lnk` stripped
///
/// Splits on both separators by hand: persisted item paths are Windows-style
/// (`C:\...`), which `Path::file_name` does not split on a non-Windows host.
pub fn display_name(path: &Path) -> String {
    let full = path.to_string_lossy();
    let name = full.rsplit(['/', '\\']).next().unwrap_or(&full);
    match name.len().checked_sub(4) {
        Some(stem_len)
            if name.is_char_boundary(stem_len)
                && name[stem_len..].eq_ignore_ascii_case(".lnk") =>
        {
            name[..stem_len].to_string()
        }
        _ => name.to_string(),
    }
}

/// Seam for shortcut resolution, so collection logic is testable without
/// real `.lnk` files
pub trait ShortcutResolver {
    /// Resolve `path` to its target; non-shortcuts and failures return the
    /// input unchanged
    fn resolve(&self, path: &Path) -> PathBuf;
}

/// Resolver that scans the shell link binary for an embedded target path
#[derive(Debug, Default)]
pub struct LnkResolver;

impl ShortcutResolver for LnkResolver {
    fn resolve(&self, path: &Path) -> PathBuf {
        if !is_shortcut_file(path) {
            return path.to_path_buf();
        }
        match scan_lnk_for_target(path) {
            Some(target) => {
                debug!("Resolved {} -> {}", path.display(), target.display());
                target
            }
            None => {
                debug!("Could not resolve {}, keeping original", path.display());
                path.to_path_buf()
            }
        }
    }
}

/// Resolver that never resolves; for platforms and tests without shortcuts
#[derive(Debug, Default)]
pub struct PassthroughResolver;

impl ShortcutResolver for PassthroughResolver {
    fn resolve(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}

/// Pull a plausible target out of a shell link file
///
/// Decodes the content as UTF-16LE and takes the first NUL-separated run that
/// names an existing `.exe`. Not a full shell link parser, but the stored
/// path sections make this reliable for locally created shortcuts.
fn scan_lnk_for_target(path: &Path) -> Option<PathBuf> {
    let bytes = std::fs::read(path).ok()?;
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let decoded = String::from_utf16_lossy(&units);

    for run in decoded.split('\0') {
        let candidate = run.trim_matches('\u{fffd}');
        if candidate.to_ascii_lowercase().ends_with(".exe") {
            let target = PathBuf::from(candidate);
            if target.exists() {
                return Some(target);
            }
        }
    }
    None
}
