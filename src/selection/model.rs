//! Selection transitions over the registry.
//!
//! Every function returns whether any item's flag actually changed; callers
//! decide when to emit the notification.

use crate::geometry::Rect;
use crate::models::{IconId, IconRegistry};

/// Selects everything between `a` and `b` in list order, inclusive.
///
/// Whichever of the pair comes first opens the range and the other closes
/// it, so argument order does not matter. Items outside the range are only
/// touched when `unselect_outside` is set.
pub fn select_range(registry: &mut IconRegistry, a: IconId, b: IconId, unselect_outside: bool) -> bool {
    let mut changed = false;
    let mut unmatched: Option<IconId> = None;
    let mut select = false;

    for id in registry.ids().to_vec() {
        if unmatched.is_none() {
            if id == a {
                unmatched = Some(b);
                select = true;
            } else if id == b {
                unmatched = Some(a);
                select = true;
            }
        }

        if select || unselect_outside {
            changed |= registry.set_selected(id, select);
        }

        if unmatched == Some(id) {
            select = false;
        }
    }

    changed
}

/// Selects `target` alone. `None` unselects everything.
pub fn select_one_unselect_others(registry: &mut IconRegistry, target: Option<IconId>) -> bool {
    let mut changed = false;
    for id in registry.ids().to_vec() {
        changed |= registry.set_selected(id, Some(id) == target);
    }
    changed
}

pub fn unselect_all(registry: &mut IconRegistry) -> bool {
    select_one_unselect_others(registry, None)
}

pub fn select_all(registry: &mut IconRegistry) -> bool {
    let mut changed = false;
    for id in registry.ids().to_vec() {
        changed |= registry.set_selected(id, true);
    }
    changed
}

/// Flips every item.
pub fn invert(registry: &mut IconRegistry) {
    for id in registry.ids().to_vec() {
        registry.toggle_selected(id);
    }
}

/// Selects exactly `ids`; ids not in the registry are ignored.
pub fn select_exactly(registry: &mut IconRegistry, ids: &[IconId]) -> bool {
    let mut changed = false;
    for id in registry.ids().to_vec() {
        changed |= registry.set_selected(id, ids.contains(&id));
    }
    changed
}

/// Remembers every item's flag before a rubber-band gesture.
pub fn snapshot_for_rubberband(registry: &mut IconRegistry) {
    for icon in registry.icons_mut() {
        icon.was_selected_before_rubberband = icon.is_selected;
    }
}

/// Forgets the pre-gesture flags, so the next band selects exactly what it
/// covers.
pub fn discard_rubberband_snapshot(registry: &mut IconRegistry) {
    for icon in registry.icons_mut() {
        icon.was_selected_before_rubberband = false;
    }
}

/// Applies a band: hit items flip relative to their snapshot, the rest
/// return to it.
pub fn rubberband_select(registry: &mut IconRegistry, band: &Rect) -> bool {
    let mut changed = false;
    for id in registry.ids().to_vec() {
        let Some(icon) = registry.get(id) else {
            continue;
        };
        let hit = icon.bounds().intersects(band);
        let select = hit ^ icon.was_selected_before_rubberband;
        changed |= registry.set_selected(id, select);
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IntrinsicSize, ItemKey};

    fn registry_with(count: usize) -> (IconRegistry, Vec<IconId>) {
        let mut registry = IconRegistry::new();
        let ids = (0..count)
            .map(|i| {
                registry
                    .insert(ItemKey::from(format!("item{}", i)), IntrinsicSize::new(40.0, 40.0, 40.0))
                    .unwrap()
            })
            .collect();
        (registry, ids)
    }

    fn selected(registry: &IconRegistry) -> Vec<IconId> {
        registry.selected_in_order()
    }

    #[test]
    fn test_select_range_is_symmetric() {
        let (mut registry, ids) = registry_with(5);
        assert!(select_range(&mut registry, ids[1], ids[3], true));
        let forward = selected(&registry);

        unselect_all(&mut registry);
        select_range(&mut registry, ids[3], ids[1], true);
        assert_eq!(selected(&registry), forward);
        assert_eq!(forward, vec![ids[1], ids[2], ids[3]]);
    }

    #[test]
    fn test_select_range_keeps_outside_unless_asked() {
        let (mut registry, ids) = registry_with(5);
        registry.set_selected(ids[4], true);

        select_range(&mut registry, ids[0], ids[1], false);
        assert_eq!(selected(&registry), vec![ids[0], ids[1], ids[4]]);

        select_range(&mut registry, ids[0], ids[1], true);
        assert_eq!(selected(&registry), vec![ids[0], ids[1]]);
    }

    #[test]
    fn test_select_range_same_endpoint() {
        let (mut registry, ids) = registry_with(3);
        select_range(&mut registry, ids[1], ids[1], true);
        assert_eq!(selected(&registry), vec![ids[1]]);
    }

    #[test]
    fn test_select_one_reports_change_only_when_different() {
        let (mut registry, ids) = registry_with(3);
        assert!(select_one_unselect_others(&mut registry, Some(ids[2])));
        assert!(!select_one_unselect_others(&mut registry, Some(ids[2])));
        assert!(unselect_all(&mut registry));
        assert!(!unselect_all(&mut registry));
    }

    #[test]
    fn test_select_all_and_invert() {
        let (mut registry, ids) = registry_with(3);
        registry.set_selected(ids[0], true);
        invert(&mut registry);
        assert_eq!(selected(&registry), vec![ids[1], ids[2]]);
        assert!(select_all(&mut registry));
        assert!(registry.all_selected());
        assert!(!select_all(&mut registry));
    }

    #[test]
    fn test_select_exactly_round_trips() {
        let (mut registry, ids) = registry_with(4);
        let wanted = vec![ids[3], ids[0]];
        select_exactly(&mut registry, &wanted);
        let mut got = selected(&registry);
        got.sort();
        let mut wanted = wanted;
        wanted.sort();
        assert_eq!(got, wanted);
    }

    #[test]
    fn test_rubberband_xor_restores_snapshot() {
        let (mut registry, ids) = registry_with(2);
        for (i, &id) in ids.iter().enumerate() {
            registry.get_mut(id).unwrap().set_position(i as f64 * 100.0, 0.0);
        }
        registry.set_selected(ids[0], true);
        snapshot_for_rubberband(&mut registry);

        // Cover both: item 0 flips off, item 1 flips on
        rubberband_select(&mut registry, &Rect::new(0.0, 0.0, 200.0, 50.0));
        assert_eq!(selected(&registry), vec![ids[1]]);

        // Shrink away from both: back to the snapshot
        rubberband_select(&mut registry, &Rect::new(300.0, 300.0, 301.0, 301.0));
        assert_eq!(selected(&registry), vec![ids[0]]);
    }

    #[test]
    fn test_discarded_snapshot_selects_only_the_band() {
        let (mut registry, ids) = registry_with(3);
        for (i, &id) in ids.iter().enumerate() {
            registry.get_mut(id).unwrap().set_position(i as f64 * 100.0, 0.0);
        }
        registry.set_selected(ids[2], true);
        snapshot_for_rubberband(&mut registry);
        discard_rubberband_snapshot(&mut registry);

        rubberband_select(&mut registry, &Rect::new(0.0, 0.0, 150.0, 50.0));
        assert_eq!(selected(&registry), vec![ids[0], ids[1]]);
    }
}
