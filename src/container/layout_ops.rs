use crate::config::ZoomLevel;
use crate::geometry::{Point, Rect};
use crate::layout::FlowLayout;
use crate::models::{IconId, ItemKey, Slot};
use crate::navigation::compare::{compare_horizontal, compare_vertical};
use crate::source::IconSource;
use crate::viewport::{reveal_offset, scroll_region, ScrollSurface};

use super::{CanvasContainer, CanvasTask};

impl<S: IconSource, V: ScrollSurface> CanvasContainer<S, V> {
    // ========================================================================
    // Layout scheduling
    // ========================================================================

    /// Queues one idle relayout, once the surface has been allocated.
    pub(crate) fn schedule_redo_layout(&mut self) {
        if self.tasks.redo_layout.is_none() && self.allocation.allocated {
            self.tasks.redo_layout = Some(self.queue.schedule_idle(CanvasTask::RedoLayout));
        }
    }

    fn unschedule_redo_layout(&mut self) {
        if let Some(id) = self.tasks.redo_layout.take() {
            self.queue.cancel(id);
        }
    }

    pub(crate) fn redo_layout(&mut self) {
        self.unschedule_redo_layout();
        self.redo_layout_internal();
    }

    /// Runs a pending layout pass right away.
    pub fn layout_now(&mut self) {
        if self.tasks.redo_layout.is_some() {
            self.redo_layout();
        }
    }

    pub fn is_layout_pending(&self) -> bool {
        self.tasks.redo_layout.is_some()
    }

    pub(crate) fn redo_layout_internal(&mut self) {
        if !self.finish_adding_new_icons() {
            self.schedule_redo_layout();
            return;
        }

        if self.registry.needs_resort() {
            let source = &self.source;
            self.registry.resort(|a, b| source.compare(a, b));
        }
        self.lay_down_icons();
        self.update_scroll_region();
        self.process_pending_reveal();
        self.update_visible_icons();
    }

    /// Sizes the items added since the last pass and announces them. Returns
    /// `false` while the surface has no size to lay out into.
    fn finish_adding_new_icons(&mut self) -> bool {
        if self.surface.viewport_size().is_none() {
            tracing::trace!("Viewport not sized yet, deferring layout");
            return false;
        }

        for id in self.registry.take_new_icons() {
            self.refresh_size(id);
            let Some(icon) = self.registry.get_mut(id) else {
                continue;
            };
            icon.is_visible = true;
            let key = icon.key.clone();
            self.signals.item_added.emit(&key);
        }
        true
    }

    fn lay_down_icons(&mut self) {
        let Some(viewport) = self.surface.viewport_size() else {
            return;
        };
        let canvas_width = viewport.width;
        let flow = FlowLayout::from_config(&self.config, self.zoom);

        let ids = self.registry.ids().to_vec();
        let (keys, sizes): (Vec<_>, Vec<_>) = self
            .registry
            .iter()
            .map(|(_, icon)| (icon.key.clone(), icon.size))
            .unzip();

        let rows = self
            .layout
            .compute(&flow, self.zoom, &keys, &sizes, canvas_width);
        let placements = flow.place(&sizes, &rows, canvas_width);

        for (id, placement) in ids.into_iter().zip(placements) {
            if let Some(icon) = self.registry.get_mut(id) {
                icon.set_position(placement.x, placement.y);
                icon.saved_ltr_x = placement.saved_ltr_x;
            }
        }

        tracing::debug!(
            items = sizes.len(),
            canvas_width,
            grid_width = flow.grid_width(canvas_width, sizes.len()),
            rows = rows.len(),
            rtl = flow.rtl,
            "Laid out icons"
        );
    }

    /// Applies the scroll extent and step for the current layout.
    pub(crate) fn update_scroll_region(&mut self) {
        let bounds = Rect::union_all(
            self.registry
                .iter()
                .filter(|(_, icon)| icon.is_positioned())
                .map(|(_, icon)| icon.bounds()),
        );
        let viewport_width = self.surface.viewport_size().map_or(0.0, |size| size.width);
        let region = scroll_region(
            bounds,
            viewport_width,
            &self.config.icon_padding,
            &self.config.container_padding,
        );
        self.surface.set_scroll_extent(region);

        let step = self.config.step_increment(self.zoom);
        if self.surface.step_increment() != step {
            self.surface.set_step_increment(step);
        }
    }

    fn update_visible_icons(&mut self) {
        let Some(viewport) = self.surface.viewport_size() else {
            return;
        };
        let min_y = self.surface.scroll_offset().y;
        let max_y = min_y + viewport.height;

        for icon in self.registry.icons_mut() {
            if icon.is_positioned() {
                let bounds = icon.bounds();
                icon.is_visible = bounds.y1 >= min_y && bounds.y0 <= max_y;
            }
        }
    }

    /// Items overlapping the viewport vertically after the last pass.
    pub fn visible_items(&self) -> Vec<ItemKey> {
        self.registry
            .iter()
            .filter(|(_, icon)| icon.is_positioned() && icon.is_visible())
            .map(|(_, icon)| icon.key.clone())
            .collect()
    }

    /// Top-most item whose bottom edge lies below the viewport top.
    pub fn first_visible_item(&self) -> Option<ItemKey> {
        let top = self.surface.scroll_offset().y + self.config.icon_padding.top;
        let mut best: Option<(f64, &ItemKey)> = None;

        for (_, icon) in self.registry.iter() {
            if !icon.is_positioned() {
                continue;
            }
            let bounds = icon.bounds();
            if bounds.y1 > top && best.map_or(true, |(best_y, _)| best_y > bounds.y0) {
                best = Some((bounds.y0, icon.key()));
            }
        }

        best.map(|(_, key)| key.clone())
    }

    // ========================================================================
    // Allocation and zoom
    // ========================================================================

    /// Tells the container the surface was (re)allocated. Reads the new size
    /// from the surface and relayouts on first allocation or a size change.
    pub fn size_allocate(&mut self) {
        let size = self.surface.viewport_size();
        let previous = self.allocation.size;
        let mut need_layout = !self.allocation.allocated || size != previous;

        if self.tasks.reset_allocation.is_none() {
            self.tasks.reset_allocation = Some(self.queue.schedule_idle(CanvasTask::ResetAllocationCount));
        }
        self.allocation.count += 1;

        let new_width = size.map_or(0.0, |s| s.width);
        let old_width = previous.map_or(0.0, |s| s.width);
        if self.allocation.count > 2 && new_width >= old_width {
            tracing::debug!(count = self.allocation.count, "Breaking allocation loop");
            need_layout = false;
        }

        self.allocation.size = size;
        self.allocation.allocated = true;

        if need_layout {
            self.redo_layout();
        }
    }

    pub fn is_allocated(&self) -> bool {
        self.allocation.allocated
    }

    pub fn zoom_level(&self) -> ZoomLevel {
        self.zoom
    }

    /// Changes zoom, pinning out-of-range levels. No-op if unchanged.
    pub fn set_zoom_level(&mut self, level: i32) {
        let zoom = ZoomLevel::from_level(level);
        if zoom == self.zoom {
            return;
        }
        tracing::debug!(?zoom, "Zoom level changed");
        self.zoom = zoom;
        self.request_update_all();
    }

    // ========================================================================
    // Scrolling
    // ========================================================================

    /// Scrolls by a delta. Returns `true` if the offset actually moved.
    pub fn scroll(&mut self, dx: f64, dy: f64) -> bool {
        let old = self.surface.scroll_offset();
        self.surface.set_scroll_offset(Point::new(old.x + dx, old.y + dy));
        self.surface.scroll_offset() != old
    }

    /// Lays out if needed, then puts the item's row at the top of the viewport.
    pub fn scroll_to_item(&mut self, key: &ItemKey) {
        self.layout_now();

        let Some(id) = self.registry.lookup(key) else {
            return;
        };
        if !self.registry.get(id).is_some_and(|icon| icon.is_positioned()) {
            return;
        }
        if let Some(bounds) = self.row_and_column_bounds(id) {
            let offset = self.surface.scroll_offset();
            self.surface.set_scroll_offset(Point::new(offset.x, bounds.y0));
        }
    }

    /// Scrolls the item, with its row and column, into view. An item that
    /// has not been laid out yet is revealed after the next pass.
    pub fn reveal(&mut self, key: &ItemKey) {
        if let Some(id) = self.registry.lookup(key) {
            self.reveal_icon(id);
        }
    }

    pub(crate) fn reveal_icon(&mut self, id: IconId) {
        let Some(icon) = self.registry.get(id) else {
            return;
        };
        if !icon.is_positioned() {
            self.slots.set(Slot::PendingReveal, Some(id));
            return;
        }
        self.slots.clear(Slot::PendingReveal);

        let (Some(viewport), Some(bounds)) = (self.surface.viewport_size(), self.row_and_column_bounds(id)) else {
            return;
        };
        let offset = reveal_offset(self.surface.scroll_offset(), viewport, bounds);
        self.surface.set_scroll_offset(offset);
    }

    fn process_pending_reveal(&mut self) {
        if let Some(id) = self.slots.get(Slot::PendingReveal) {
            self.reveal_icon(id);
        }
    }

    /// Padded bounds of the item grown to cover every item sharing its row
    /// or its column.
    fn row_and_column_bounds(&self, id: IconId) -> Option<Rect> {
        let icon = self.registry.get(id)?;
        let padding = &self.config.icon_padding;
        let dx = padding.horizontal();
        let dy = padding.vertical();
        let mut bounds = icon.bounds().inflate(dx, dy);

        for (other_id, other) in self.registry.iter() {
            if other_id == id {
                continue;
            }
            let other_bounds = other.bounds().inflate(dx, dy);
            if compare_horizontal(icon, other).is_eq() {
                bounds.x0 = bounds.x0.min(other_bounds.x0);
                bounds.x1 = bounds.x1.max(other_bounds.x1);
            }
            if compare_vertical(icon, other).is_eq() {
                bounds.y0 = bounds.y0.min(other_bounds.y0);
                bounds.y1 = bounds.y1.max(other_bounds.y1);
            }
        }

        Some(bounds)
    }
}
