//! The live, in-memory group collection
//!
//! Groups hold an ordered item list deduplicated by resolved path; an item
//! belongs to at most one group across the whole collection. All mutation
//! goes through this type so the invariants hold no matter which UI surface
//! drives the change. Persistence is the caller's job (the context saves
//! after every successful mutation).

use crate::config::models::{Group, Item, ItemKind};
use crate::error::{LauncherError, Result};
use crate::utils::shortcut::{ShortcutResolver, display_name};
use std::path::Path;

/// Pixel height of one item row in the list window (40px row + 2px gap)
pub const ROW_HEIGHT: f64 = 42.0;

/// Pixel height of the list window header above the first row
pub const HEADER_HEIGHT: f64 = 48.0;

/// Map a drop position inside the item area to an insertion index
///
/// The same function serves both the drag preview and the final commit, so
/// the row highlighted during the drag is always the row the item lands on.
/// `offset_y` is relative to the top of the item area (header already
/// subtracted); anything above the first row maps to 0, anything past the
/// last row maps to `item_count`.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "index is non-negative and bounded by item_count before the cast"
)]
pub fn drop_index(offset_y: f64, item_count: usize) -> usize {
    if offset_y <= 0.0 {
        return 0;
    }
    let index = (offset_y / ROW_HEIGHT).floor();
    if index >= item_count as f64 {
        item_count
    } else {
        index as usize
    }
}

/// Ordered collection of groups with cross-group item exclusivity
#[derive(Debug, Default)]
pub struct GroupCollection {
    groups: Vec<Group>,
}

impl GroupCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection from persisted groups
    pub fn from_groups(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    /// Replace the whole collection (profile switch)
    pub fn replace(&mut self, groups: Vec<Group>) {
        self.groups = groups;
    }

    /// The groups, in collection order
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the collection holds no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Look up a group by name
    pub fn get(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Group> {
        self.groups
            .iter_mut()
            .find(|g| g.name == name)
            .ok_or_else(|| LauncherError::NotFound(name.to_string()))
    }

    /// Add a new empty group at the given position
    ///
    /// Names are unique within the collection; a blank name is refused.
    pub fn add_group(&mut self, name: &str, x: i32, y: i32) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LauncherError::NameEmpty);
        }
        if self.get(name).is_some() {
            return Err(LauncherError::Conflict(name.to_string()));
        }
        self.groups.push(Group::new(name, x, y));
        Ok(())
    }

    /// Remove a group and everything in it
    pub fn remove_group(&mut self, name: &str) -> Result<Group> {
        let index = self
            .groups
            .iter()
            .position(|g| g.name == name)
            .ok_or_else(|| LauncherError::NotFound(name.to_string()))?;
        Ok(self.groups.remove(index))
    }

    /// Rename a group, keeping names unique
    pub fn rename_group(&mut self, old: &str, new: &str) -> Result<()> {
        let new = new.trim();
        if new.is_empty() {
            return Err(LauncherError::NameEmpty);
        }
        if new != old && self.get(new).is_some() {
            return Err(LauncherError::Conflict(new.to_string()));
        }
        let group = self.get_mut(old)?;
        group.name = new.to_string();
        Ok(())
    }

    /// Move a group's desktop icon
    pub fn set_position(&mut self, name: &str, x: i32, y: i32) -> Result<()> {
        let group = self.get_mut(name)?;
        group.x = x;
        group.y = y;
        Ok(())
    }

    /// Set or clear a group's custom icon reference
    pub fn set_custom_icon(&mut self, name: &str, icon: Option<String>) -> Result<()> {
        self.get_mut(name)?.custom_icon = icon;
        Ok(())
    }

    /// Add a dropped path to a group
    ///
    /// The path is resolved through `resolver` first; the resolved path is
    /// the dedup key. An item already present in the destination group is a
    /// silent no-op (returns `false`); one present in another group moves to
    /// the destination. The display name comes from the reference the user
    /// actually dropped, with a shortcut suffix stripped.
    pub fn add_item(
        &mut self,
        group: &str,
        path: &Path,
        resolver: &dyn ShortcutResolver,
    ) -> Result<bool> {
        let resolved = resolver.resolve(path);

        if self
            .get_mut(group)?
            .items
            .iter()
            .any(|i| i.resolved_path == resolved)
        {
            return Ok(false);
        }

        // At most one group holds a given resolved path
        for other in &mut self.groups {
            if other.name != group {
                other.items.retain(|i| i.resolved_path != resolved);
            }
        }

        let item = Item {
            display_name: display_name(path),
            kind: ItemKind::of(&resolved),
            original_reference: path.to_path_buf(),
            checked: true,
            resolved_path: resolved,
        };
        self.get_mut(group)?.items.push(item);
        Ok(true)
    }

    /// Remove an item by resolved path; absent paths are a no-op
    pub fn remove_item(&mut self, group: &str, resolved_path: &Path) -> Result<()> {
        self.get_mut(group)?
            .items
            .retain(|i| i.resolved_path != resolved_path);
        Ok(())
    }

    /// Move an item to `target_index` within its group
    ///
    /// The index is clamped to the valid insertion range; moving an item onto
    /// its own position is a no-op. Unknown paths are ignored (the drag
    /// source vanished mid-gesture).
    pub fn reorder(&mut self, group: &str, resolved_path: &Path, target_index: usize) -> Result<()> {
        let group = self.get_mut(group)?;
        let Some(current) = group
            .items
            .iter()
            .position(|i| i.resolved_path == resolved_path)
        else {
            return Ok(());
        };

        let target = target_index.min(group.items.len());
        if target == current {
            return Ok(());
        }

        let item = group.items.remove(current);
        group.items.insert(target.min(group.items.len()), item);
        Ok(())
    }

    /// Toggle an item's inclusion in bulk launch
    pub fn set_checked(&mut self, group: &str, resolved_path: &Path, checked: bool) -> Result<()> {
        let group = self.get_mut(group)?;
        for item in &mut group.items {
            if item.resolved_path == resolved_path {
                item.checked = checked;
            }
        }
        Ok(())
    }

    /// The checked items of a group, in order, for bulk launch
    pub fn launch_list(&self, group: &str) -> Result<Vec<&Item>> {
        let group = self
            .get(group)
            .ok_or_else(|| LauncherError::NotFound(group.to_string()))?;
        Ok(group.items.iter().filter(|i| i.checked).collect())
    }
}
