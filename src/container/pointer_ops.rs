use std::time::Duration;

use crate::geometry::Point;
use crate::input::{Modifiers, MouseButton, PointerId};
use crate::models::{IconId, ItemKey, Slot};
use crate::pointer::DragState;
use crate::selection::model;
use crate::source::IconSource;
use crate::viewport::ScrollSurface;

use super::CanvasContainer;

impl<S: IconSource, V: ScrollSurface> CanvasContainer<S, V> {
    // ========================================================================
    // Hit-testing
    // ========================================================================

    /// Topmost item whose full bounds contain `position` (widget coordinates).
    pub fn item_at(&self, position: Point) -> Option<&ItemKey> {
        let world = self.to_canvas(position);
        self.registry
            .iter()
            .filter(|(_, icon)| icon.is_positioned() && icon.bounds().contains(world))
            .last()
            .map(|(_, icon)| icon.key())
    }

    fn to_canvas(&self, position: Point) -> Point {
        let offset = self.surface.scroll_offset();
        Point::new(position.x + offset.x, position.y + offset.y)
    }

    // ========================================================================
    // Press
    // ========================================================================

    /// Routes a press to the item under the pointer, or to the background.
    pub fn button_press(
        &mut self,
        button: MouseButton,
        modifiers: Modifiers,
        pointer: PointerId,
        position: Point,
        time: Duration,
    ) -> bool {
        match self.item_at(position).cloned() {
            Some(key) => self.button_press_on_item(&key, button, modifiers, position, time),
            None => {
                self.button_press_background(button, modifiers, pointer, position, time);
                true
            }
        }
    }

    /// Press on an item. `position` is in widget coordinates and becomes the
    /// drag origin. Returns `false` for unknown items and unhandled buttons.
    pub fn button_press_on_item(
        &mut self,
        key: &ItemKey,
        button: MouseButton,
        modifiers: Modifiers,
        position: Point,
        time: Duration,
    ) -> bool {
        let Some(id) = self.registry.lookup(key) else {
            return false;
        };
        self.begin_press(time);
        self.press.double_clicked = false;

        if matches!(button, MouseButton::Other(_)) {
            return false;
        }

        if button == MouseButton::Primary {
            let current = self.slots.get(Slot::DoubleClickCurrent);
            self.slots.set(Slot::DoubleClickPrevious, current);
            self.slots.set(Slot::DoubleClickCurrent, Some(id));
            self.press.double_click_buttons[1] = self.press.double_click_buttons[0];
            self.press.double_click_buttons[0] = Some(button);

            if self.is_double_click(time) {
                tracing::trace!(%key, "Double click");
                self.press.double_clicked = true;
                self.press.drag_button = None;
                self.slots.clear(Slot::DragIcon);
                return true;
            }
        }

        if matches!(button, MouseButton::Primary | MouseButton::Middle) {
            self.press.drag_button = Some(button);
            self.slots.set(Slot::DragIcon, Some(id));
            self.press.drag = DragState::arm(self.to_canvas(position));
        }

        let was_selected = self.registry.is_selected(id);
        self.press.icon_selected_on_button_down = was_selected;

        if button != MouseButton::Secondary && modifiers.shift {
            self.set_focus(Some(id), false);
            let anchor = match self.slots.get(Slot::RangeAnchor) {
                Some(anchor) if self.registry.is_selected(anchor) => anchor,
                _ => {
                    self.slots.set(Slot::RangeAnchor, Some(id));
                    id
                }
            };
            if model::select_range(&mut self.registry, anchor, id, !modifiers.control) {
                self.emit_selection_changed();
            }
        } else if !was_selected {
            self.set_focus(Some(id), false);
            self.slots.set(Slot::RangeAnchor, Some(id));
            if modifiers.modifies_selection() {
                self.registry.toggle_selected(id);
            } else {
                self.select_one_unselect_others(Some(id));
            }
            self.emit_selection_changed();
        }

        if button == MouseButton::Secondary {
            self.press.clear_drag();
            self.signals.context_click_selection.emit(&());
        }
        true
    }

    /// Press on empty canvas. `position` is in widget coordinates.
    pub fn button_press_background(
        &mut self,
        button: MouseButton,
        modifiers: Modifiers,
        pointer: PointerId,
        position: Point,
        time: Duration,
    ) {
        self.begin_press(time);
        self.set_focus(None, false);

        if button == MouseButton::Primary {
            let current = self.slots.clear(Slot::DoubleClickCurrent);
            self.slots.set(Slot::DoubleClickPrevious, current);

            if !modifiers.modifies_selection() {
                self.unselect_all();
            }
            self.start_rubberband(pointer, position);
            return;
        }

        if self.is_rubberbanding() {
            return;
        }

        match button {
            MouseButton::Middle => {
                self.unselect_all();
                self.signals.middle_click.emit(&());
            }
            MouseButton::Secondary => {
                self.unselect_all();
                self.signals.context_click_background.emit(&());
            }
            _ => {}
        }
    }

    fn begin_press(&mut self, time: Duration) {
        self.press.button_down_time = time;
        self.slots.clear(Slot::KeyboardRubberbandStart);
    }

    /// Second primary press on the same item within the interval.
    fn is_double_click(&mut self, time: Duration) -> bool {
        if self.config.single_click_mode {
            return false;
        }
        let interval = self.config.double_click_interval;
        self.press.double_click.is_double_click(time, interval)
            && self.slots.get(Slot::DoubleClickCurrent) == self.slots.get(Slot::DoubleClickPrevious)
            && self.press.double_click_buttons[0] == self.press.double_click_buttons[1]
    }

    // ========================================================================
    // Release and motion
    // ========================================================================

    pub fn button_release(&mut self, button: MouseButton, modifiers: Modifiers, pointer: PointerId, time: Duration) {
        if button == MouseButton::Primary && self.is_rubberbanding() {
            self.stop_rubberband(pointer);
            return;
        }

        if self.press.drag_button == Some(button) {
            self.press.drag_button = None;
            if self.press.drag.armed && !self.press.drag.started {
                self.did_not_drag(button, modifiers, time);
            }
            self.slots.clear(Slot::DragIcon);
            self.press.clear_drag();
            return;
        }

        if button == MouseButton::Primary && self.press.double_clicked {
            if !modifiers.modifies_selection() {
                self.activate_selection();
            } else if modifiers.shift_only() {
                let icon = self.slots.get(Slot::DoubleClickCurrent);
                self.activate_alternate(icon);
            }
        }
        self.press.double_clicked = false;
    }

    /// Pointer moved to `position` (widget coordinates).
    pub fn pointer_motion(&mut self, position: Point) {
        if self.press.drag_button.is_some() && self.press.drag.armed && !self.press.drag.started {
            let world = self.to_canvas(position);
            if self.press.drag.exceeds_threshold(world, self.config.drag_threshold) {
                tracing::debug!(x = world.x, y = world.y, "Drag threshold exceeded");
                self.press.drag.started = true;
            }
        }
        if self.is_rubberbanding() {
            self.rubberband_pointer_moved(position);
        }
    }

    /// Whether the current press turned into a drag.
    pub fn is_dragging(&self) -> bool {
        self.press.drag.started
    }

    /// A press on an item was released without dragging: finish the
    /// selection change deferred at press time and handle single clicks.
    fn did_not_drag(&mut self, button: MouseButton, modifiers: Modifiers, time: Duration) {
        let drag_icon = self.slots.get(Slot::DragIcon);

        if self.press.icon_selected_on_button_down && (modifiers.control || !modifiers.shift) {
            if let Some(icon) = drag_icon {
                if modifiers.modifies_selection() {
                    self.slots.clear(Slot::RangeAnchor);
                    self.registry.toggle_selected(icon);
                    self.emit_selection_changed();
                } else {
                    self.slots.set(Slot::RangeAnchor, Some(icon));
                    if self.select_one_unselect_others(Some(icon)) {
                        self.emit_selection_changed();
                    }
                }
            }
        }

        if drag_icon.is_some() && (self.config.single_click_mode || button == MouseButton::Middle) {
            let interval = self.config.double_click_interval;
            let count = self.press.single_click.register(time, interval);
            let quick = time.saturating_sub(self.press.button_down_time) < self.config.max_click_time;
            if count == 0 && quick && !modifiers.modifies_selection() {
                self.activate_single_click(button, drag_icon);
            }
        }
    }

    fn activate_single_click(&mut self, button: MouseButton, icon: Option<IconId>) {
        tracing::trace!(?button, ?icon, "Single click activation");
        if button == MouseButton::Middle {
            self.activate_alternate(None);
        } else {
            self.activate_selection();
        }
    }
}
