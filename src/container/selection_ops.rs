use crate::geometry::{Point, Rect};
use crate::input::PointerId;
use crate::models::{IconId, ItemKey, Slot};
use crate::selection::{band_rect, edge_scroll, model, RubberbandSession};
use crate::source::IconSource;
use crate::viewport::ScrollSurface;

use super::{CanvasContainer, CanvasTask};

impl<S: IconSource, V: ScrollSurface> CanvasContainer<S, V> {
    // ========================================================================
    // Queries
    // ========================================================================

    /// Selected items, sorted by the host comparator.
    pub fn selection(&mut self) -> Vec<ItemKey> {
        let source = &self.source;
        let ids = self.registry.sorted_selection(|a, b| source.compare(a, b));
        self.keys_of(&ids)
    }

    pub fn is_selected(&self, key: &ItemKey) -> bool {
        self.lookup(key).is_some_and(|icon| icon.is_selected())
    }

    pub fn has_selection(&self) -> bool {
        self.registry.has_selection()
    }

    pub fn has_multiple_selection(&self) -> bool {
        self.registry.has_multiple_selection()
    }

    /// True when every item is selected.
    pub fn all_selected(&self) -> bool {
        self.registry.all_selected()
    }

    /// Positions of the selected items, in display order.
    pub fn selected_locations(&self) -> Vec<Point> {
        self.registry
            .iter()
            .filter(|(_, icon)| icon.is_selected())
            .map(|(_, icon)| icon.position())
            .collect()
    }

    /// Item that Shift-extended selections grow from.
    pub fn range_anchor(&self) -> Option<&ItemKey> {
        self.slots
            .get(Slot::RangeAnchor)
            .and_then(|id| self.registry.get(id))
            .map(|icon| icon.key())
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Selects one item exclusively and reveals it.
    pub fn select_one(&mut self, key: &ItemKey) -> bool {
        let Some(id) = self.registry.lookup(key) else {
            return false;
        };
        let changed = self.select_one_unselect_others(Some(id));
        if changed {
            self.emit_selection_changed();
        }
        changed
    }

    pub(crate) fn select_one_unselect_others(&mut self, id: Option<IconId>) -> bool {
        let changed = model::select_one_unselect_others(&mut self.registry, id);
        if let (true, Some(id)) = (changed, id) {
            self.reveal_icon(id);
        }
        changed
    }

    /// Flips one item.
    pub fn toggle(&mut self, key: &ItemKey) -> bool {
        let Some(id) = self.registry.lookup(key) else {
            return false;
        };
        self.registry.toggle_selected(id);
        self.emit_selection_changed();
        true
    }

    /// Selects every item between `anchor` and `target` in display order.
    pub fn select_range(&mut self, anchor: &ItemKey, target: &ItemKey, unselect_outside: bool) -> bool {
        let (Some(a), Some(b)) = (self.registry.lookup(anchor), self.registry.lookup(target)) else {
            return false;
        };
        let changed = model::select_range(&mut self.registry, a, b, unselect_outside);
        if changed {
            self.emit_selection_changed();
        }
        changed
    }

    pub fn select_all(&mut self) -> bool {
        let changed = model::select_all(&mut self.registry);
        if changed {
            self.emit_selection_changed();
        }
        changed
    }

    pub fn unselect_all(&mut self) -> bool {
        let changed = model::unselect_all(&mut self.registry);
        if changed {
            self.emit_selection_changed();
        }
        changed
    }

    /// Flips every item. Always notifies.
    pub fn invert_selection(&mut self) {
        model::invert(&mut self.registry);
        self.emit_selection_changed();
    }

    /// Selects the first item in display order, resorting first if needed.
    pub fn select_first(&mut self) -> bool {
        if self.registry.needs_resort() {
            let source = &self.source;
            self.registry.resort(|a, b| source.compare(a, b));
        }
        let Some(&id) = self.registry.ids().first() else {
            return false;
        };
        let changed = self.registry.set_selected(id, true);
        if changed {
            self.emit_selection_changed();
        }
        changed
    }

    /// Selects exactly `keys`. A single key also becomes the range anchor.
    pub fn set_selection(&mut self, keys: &[ItemKey]) -> bool {
        let ids = self.ids_for(keys);
        let changed = model::select_exactly(&mut self.registry, &ids);
        if changed {
            if let [only] = ids.as_slice() {
                self.slots.set(Slot::RangeAnchor, Some(*only));
            }
            self.emit_selection_changed();
        }
        changed
    }

    /// Selects exactly `keys`, leaving the range anchor alone.
    pub fn select_list(&mut self, keys: &[ItemKey]) -> bool {
        let ids = self.ids_for(keys);
        let changed = model::select_exactly(&mut self.registry, &ids);
        if changed {
            self.emit_selection_changed();
        }
        changed
    }

    fn ids_for(&self, keys: &[ItemKey]) -> Vec<IconId> {
        keys.iter().filter_map(|key| self.registry.lookup(key)).collect()
    }

    // ========================================================================
    // Rubber-band
    // ========================================================================

    pub fn is_rubberbanding(&self) -> bool {
        self.rubberband.is_some()
    }

    /// Current band in canvas coordinates.
    pub fn rubberband_rect(&self) -> Option<Rect> {
        self.rubberband.as_ref().and_then(|band| band.rect)
    }

    /// Starts a band at `position` (widget coordinates) for `pointer`.
    pub fn start_rubberband(&mut self, pointer: PointerId, position: Point) {
        if let Some(active) = self.rubberband.as_ref().map(|band| band.pointer) {
            tracing::debug!(?active, "Canceling active rubber-band");
            self.stop_rubberband_internal();
        }

        self.signals.band_select_started.emit(&());
        model::snapshot_for_rubberband(&mut self.registry);

        let timer = self
            .queue
            .schedule_repeating(self.config.rubberband_interval, CanvasTask::RubberbandTick);
        let offset = self.surface.scroll_offset();
        self.rubberband = Some(RubberbandSession::new(pointer, position, offset, timer));
        tracing::debug!(?pointer, x = position.x, y = position.y, "Rubber-band started");
    }

    /// Latest pointer position (widget coordinates) for the next tick.
    pub fn rubberband_pointer_moved(&mut self, position: Point) {
        if let Some(band) = self.rubberband.as_mut() {
            band.pointer_position = position;
        }
    }

    /// Applies a band rectangle directly. Returns whether the selection changed.
    pub fn update_rubberband(&mut self, rect: Rect) -> bool {
        let Some(band) = self.rubberband.as_mut() else {
            return false;
        };
        band.rect = Some(rect);
        let changed = model::rubberband_select(&mut self.registry, &rect);
        if changed {
            self.emit_selection_changed();
        }
        changed
    }

    /// Ends the band owned by `pointer`. Releases from other devices are
    /// ignored.
    pub fn stop_rubberband(&mut self, pointer: PointerId) {
        match self.rubberband.as_ref() {
            Some(band) if band.pointer == pointer => self.stop_rubberband_internal(),
            Some(band) => {
                tracing::trace!(owner = ?band.pointer, ?pointer, "Ignoring release from another device");
            }
            None => {}
        }
    }

    /// The host lost its pointer grab (e.g. a modal dialog opened).
    pub fn grab_lost(&mut self) {
        if self.rubberband.is_some() {
            tracing::debug!("Grab lost, stopping rubber-band");
            self.stop_rubberband_internal();
        }
    }

    fn stop_rubberband_internal(&mut self) {
        let Some(band) = self.rubberband.take() else {
            return;
        };
        self.queue.cancel(band.timer);
        model::discard_rubberband_snapshot(&mut self.registry);

        if self.registry.selection_len() == 1 {
            self.slots.set(Slot::RangeAnchor, self.registry.first_selected());
        }

        tracing::debug!(pointer = ?band.pointer, "Rubber-band stopped");
        self.signals.band_select_ended.emit(&());
    }

    /// One timer step: auto-scroll at the edges and regrow the band.
    pub(crate) fn rubberband_tick(&mut self) {
        let Some(viewport) = self.surface.viewport_size() else {
            return;
        };
        let offset = self.surface.scroll_offset();
        let threshold = self.config.rubberband_scroll_threshold;

        let Some(band) = self.rubberband.as_mut() else {
            return;
        };
        let offset_changed = band.last_offset != offset;
        band.last_offset = offset;

        let scroll = edge_scroll(band.pointer_position, viewport, threshold);
        if !scroll.is_scrolling() && band.prev == scroll.position && !offset_changed {
            return;
        }
        let start = band.start;

        self.scroll(scroll.dx, scroll.dy);

        let offset = self.surface.scroll_offset();
        let world = Point::new(scroll.position.x + offset.x, scroll.position.y + offset.y);
        self.update_rubberband(band_rect(start, world));

        if let Some(band) = self.rubberband.as_mut() {
            band.prev = scroll.position;
        }
    }
}
