//! Ordered item storage with id lookup.
//!
//! - `order` is the current sort order and the only list engines walk
//! - `index` maps caller keys to slotmap ids and always mirrors `order`
//! - `selection` keeps selected ids, lazily re-sorted on read

use std::cmp::Ordering;
use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};
use tracing::warn;

use super::item::{Icon, IntrinsicSize, ItemKey};

new_key_type! {
    /// Internal handle of a registered item.
    pub struct IconId;
}

#[derive(Debug, Default)]
pub struct IconRegistry {
    icons: SlotMap<IconId, Icon>,
    order: Vec<IconId>,
    index: HashMap<ItemKey, IconId>,
    new_icons: Vec<IconId>,
    selection: Vec<IconId>,
    needs_resort: bool,
    selection_needs_resort: bool,
}

impl IconRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Registers a new unpositioned item. Returns `None` for a duplicate key.
    pub fn insert(&mut self, key: ItemKey, size: IntrinsicSize) -> Option<IconId> {
        if self.index.contains_key(&key) {
            return None;
        }

        let id = self.icons.insert(Icon::new(key.clone(), size));
        self.order.push(id);
        self.new_icons.push(id);
        self.index.insert(key, id);
        self.needs_resort = true;
        Some(id)
    }

    /// Drops an item from every list. Returns the removed item.
    pub fn remove(&mut self, id: IconId) -> Option<Icon> {
        let icon = self.icons.remove(id)?;
        self.order.retain(|&other| other != id);
        self.new_icons.retain(|&other| other != id);
        self.selection.retain(|&other| other != id);
        self.index.remove(&icon.key);
        self.needs_resort = true;
        self.debug_check();
        Some(icon)
    }

    /// Successor of `id` in list order, else its predecessor.
    pub fn neighbor(&self, id: IconId) -> Option<IconId> {
        let pos = self.position_of(id)?;
        self.order
            .get(pos + 1)
            .or_else(|| pos.checked_sub(1).and_then(|prev| self.order.get(prev)))
            .copied()
    }

    pub fn position_of(&self, id: IconId) -> Option<usize> {
        self.order.iter().position(|&other| other == id)
    }

    pub fn clear(&mut self) {
        self.icons.clear();
        self.order.clear();
        self.index.clear();
        self.new_icons.clear();
        self.selection.clear();
        self.needs_resort = false;
        self.selection_needs_resort = false;
    }

    pub fn lookup(&self, key: &ItemKey) -> Option<IconId> {
        self.index.get(key).copied()
    }

    pub fn get(&self, id: IconId) -> Option<&Icon> {
        self.icons.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: IconId) -> Option<&mut Icon> {
        self.icons.get_mut(id)
    }

    pub fn contains(&self, id: IconId) -> bool {
        self.icons.contains_key(id)
    }

    /// Ids in current list order.
    pub fn ids(&self) -> &[IconId] {
        &self.order
    }

    /// Items in current list order.
    pub fn iter(&self) -> impl Iterator<Item = (IconId, &Icon)> + '_ {
        self.order
            .iter()
            .filter_map(move |&id| self.icons.get(id).map(|icon| (id, icon)))
    }

    pub(crate) fn icons_mut(&mut self) -> impl Iterator<Item = &mut Icon> + '_ {
        self.icons.values_mut()
    }

    pub fn needs_resort(&self) -> bool {
        self.needs_resort
    }

    pub fn mark_needs_resort(&mut self) {
        self.needs_resort = true;
    }

    /// Hands over the items added since the last call, in insertion order.
    pub fn take_new_icons(&mut self) -> Vec<IconId> {
        std::mem::take(&mut self.new_icons)
    }

    pub fn has_new_icons(&self) -> bool {
        !self.new_icons.is_empty()
    }

    // ========================================================================
    // Selection flags
    // ========================================================================

    /// Flips one item's selection flag.
    pub fn toggle_selected(&mut self, id: IconId) {
        let Some(icon) = self.icons.get_mut(id) else {
            return;
        };
        icon.is_selected = !icon.is_selected;
        if icon.is_selected {
            self.selection.push(id);
            self.selection_needs_resort = true;
        } else {
            self.selection.retain(|&other| other != id);
        }
    }

    /// Sets one item's flag, returning whether it changed.
    pub fn set_selected(&mut self, id: IconId, select: bool) -> bool {
        match self.icons.get(id) {
            Some(icon) if icon.is_selected != select => {
                self.toggle_selected(id);
                true
            }
            _ => false,
        }
    }

    pub fn is_selected(&self, id: IconId) -> bool {
        self.icons.get(id).is_some_and(|icon| icon.is_selected)
    }

    /// The `n`th selected item in list order, counting from 1.
    pub fn nth_selected(&self, n: usize) -> Option<IconId> {
        debug_assert!(n > 0);
        self.iter()
            .filter(|(_, icon)| icon.is_selected)
            .nth(n.saturating_sub(1))
            .map(|(id, _)| id)
    }

    pub fn first_selected(&self) -> Option<IconId> {
        self.nth_selected(1)
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn has_multiple_selection(&self) -> bool {
        self.nth_selected(2).is_some()
    }

    /// True when every item is selected (vacuously true when empty).
    pub fn all_selected(&self) -> bool {
        self.iter().all(|(_, icon)| icon.is_selected)
    }

    /// Selected ids in list order.
    pub fn selected_in_order(&self) -> Vec<IconId> {
        self.iter()
            .filter(|(_, icon)| icon.is_selected)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    /// Selected ids sorted by the host comparator.
    pub fn sorted_selection<F>(&mut self, mut compare: F) -> Vec<IconId>
    where
        F: FnMut(&ItemKey, &ItemKey) -> Ordering,
    {
        if self.selection_needs_resort {
            self.sort_selection(&mut compare);
        }
        self.selection.clone()
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    fn sort_selection<F>(&mut self, compare: &mut F)
    where
        F: FnMut(&ItemKey, &ItemKey) -> Ordering,
    {
        let icons = &self.icons;
        self.selection
            .sort_by(|&a, &b| match (icons.get(a), icons.get(b)) {
                (Some(a), Some(b)) => compare(&a.key, &b.key),
                _ => Ordering::Equal,
            });
        self.selection_needs_resort = false;
    }

    /// Sorts items and selection, then caches every item's ordinal.
    pub fn resort<F>(&mut self, mut compare: F)
    where
        F: FnMut(&ItemKey, &ItemKey) -> Ordering,
    {
        let icons = &self.icons;
        self.order
            .sort_by(|&a, &b| match (icons.get(a), icons.get(b)) {
                (Some(a), Some(b)) => compare(&a.key, &b.key),
                _ => Ordering::Equal,
            });
        self.sort_selection(&mut compare);
        self.cache_positions();
        self.needs_resort = false;
    }

    fn cache_positions(&mut self) {
        for (idx, &id) in self.order.iter().enumerate() {
            if let Some(icon) = self.icons.get_mut(id) {
                icon.sequence_index = idx;
            }
        }
    }

    /// Verifies index/list agreement in debug builds, logs otherwise.
    fn debug_check(&self) {
        let consistent = self.order.len() == self.index.len()
            && self.order.len() == self.icons.len()
            && self
                .order
                .iter()
                .all(|&id| self.icons.get(id).is_some_and(|icon| self.index.get(&icon.key) == Some(&id)));
        debug_assert!(consistent, "registry index out of sync with item list");
        if !consistent {
            warn!(
                items = self.order.len(),
                indexed = self.index.len(),
                "Registry index out of sync with item list"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(keys: &[&str]) -> (IconRegistry, Vec<IconId>) {
        let mut registry = IconRegistry::new();
        let ids = keys
            .iter()
            .map(|k| {
                registry
                    .insert(ItemKey::from(*k), IntrinsicSize::new(10.0, 10.0, 10.0))
                    .unwrap()
            })
            .collect();
        (registry, ids)
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let (mut registry, _) = registry_with(&["a"]);
        assert!(registry
            .insert(ItemKey::from("a"), IntrinsicSize::default())
            .is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_cleans_every_list() {
        let (mut registry, ids) = registry_with(&["a", "b", "c"]);
        registry.set_selected(ids[1], true);
        let removed = registry.remove(ids[1]).unwrap();
        assert_eq!(removed.key().as_str(), "b");
        assert!(registry.lookup(&ItemKey::from("b")).is_none());
        assert!(!registry.has_selection());
        assert_eq!(registry.ids(), &[ids[0], ids[2]]);
        assert!(registry.remove(ids[1]).is_none());
    }

    #[test]
    fn test_neighbor_prefers_successor() {
        let (registry, ids) = registry_with(&["a", "b", "c"]);
        assert_eq!(registry.neighbor(ids[1]), Some(ids[2]));
        assert_eq!(registry.neighbor(ids[2]), Some(ids[1]));

        let (registry, ids) = registry_with(&["solo"]);
        assert_eq!(registry.neighbor(ids[0]), None);
    }

    #[test]
    fn test_resort_caches_sequence_indices() {
        let (mut registry, _) = registry_with(&["c", "a", "b"]);
        registry.resort(|a, b| a.cmp(b));
        let keys: Vec<&str> = registry.iter().map(|(_, i)| i.key().as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        let mut indices: Vec<usize> = registry.iter().map(|(_, i)| i.sequence_index()).collect();
        indices.sort();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(!registry.needs_resort());
    }

    #[test]
    fn test_sorted_selection_uses_comparator() {
        let (mut registry, ids) = registry_with(&["a", "b", "c"]);
        registry.set_selected(ids[2], true);
        registry.set_selected(ids[0], true);
        let selection = registry.sorted_selection(|a, b| b.cmp(a));
        assert_eq!(selection, vec![ids[2], ids[0]]);
        assert_eq!(registry.selected_in_order(), vec![ids[0], ids[2]]);
        assert!(registry.has_multiple_selection());
        assert!(!registry.all_selected());
    }

    #[test]
    fn test_take_new_icons_keeps_insertion_order() {
        let (mut registry, ids) = registry_with(&["x", "y"]);
        assert_eq!(registry.take_new_icons(), ids);
        assert!(!registry.has_new_icons());
    }
}
