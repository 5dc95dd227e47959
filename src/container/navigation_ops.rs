use crate::events::Preview;
use crate::geometry::Point;
use crate::input::{Key, Modifiers};
use crate::models::{IconId, Slot};
use crate::navigation::{cmp_point, ArrowPlan, Direction, Heuristic, KeyAction, Navigator};
use crate::selection::model;
use crate::source::IconSource;
use crate::viewport::ScrollSurface;

use super::{CanvasContainer, CanvasTask};

impl<S: IconSource, V: ScrollSurface> CanvasContainer<S, V> {
    /// Handles a key press. Returns `true` if the container consumed it.
    pub fn handle_key(&mut self, key: Key, modifiers: Modifiers) -> bool {
        let Some(action) = KeyAction::from_key(key, modifiers) else {
            return false;
        };

        match action {
            KeyAction::Home => self.keyboard_home(modifiers),
            KeyAction::End => self.keyboard_end(modifiers),
            KeyAction::Arrow(direction) => self.keyboard_arrow_key(direction, modifiers),
            KeyAction::Space => self.keyboard_space(modifiers),
            KeyAction::ContextMenu => {
                self.press.drag_button = None;
                self.press.clear_drag();
                self.signals.context_click_background.emit(&());
            }
            KeyAction::Swallow => {}
        }
        true
    }

    /// Moves as an unmodified arrow press would, e.g. from a previewer.
    pub fn preview_selection_event(&mut self, direction: Direction) {
        self.keyboard_arrow_key(direction, Modifiers::NONE);
    }

    fn keyboard_home(&mut self, modifiers: Modifiers) {
        let nav = Navigator::new(&self.registry, &self.source);
        let from = nav.find_best_selected(None, Heuristic::RightmostInBottomRow);
        let to = nav.find_best(None, Heuristic::LeftmostInTopRow);
        self.keyboard_move_to(to, from, modifiers);
    }

    fn keyboard_end(&mut self, modifiers: Modifiers) {
        let nav = Navigator::new(&self.registry, &self.source);
        let from = nav.find_best_selected(None, Heuristic::LeftmostInTopRow);
        let to = nav.find_best(None, Heuristic::RightmostInBottomRow);
        self.keyboard_move_to(to, from, modifiers);
    }

    fn keyboard_arrow_key(&mut self, direction: Direction, modifiers: Modifiers) {
        let plan = ArrowPlan::for_direction(direction, self.config.rtl, modifiers);
        let nav = Navigator::new(&self.registry, &self.source);

        // Focus first, then the single selected item, then the selection
        // extreme farthest toward the end.
        let from = self.slots.get(Slot::Focus).or_else(|| {
            if !self.registry.has_multiple_selection() {
                self.registry.first_selected()
            } else if self.registry.all_selected() {
                nav.find_best_selected(None, plan.empty_start)
            } else {
                nav.find_best_selected(None, plan.better_start)
            }
        });

        let from_icon = from.and_then(|id| self.registry.get(id).map(|icon| (id, icon)));
        let (to, from) = match from_icon {
            None => {
                let to = nav.find_best(None, plan.empty_start);
                (to, to)
            }
            Some((from, icon)) => {
                let start = self.arrow.record(from, cmp_point(icon), direction);
                let nav = nav.with_arrow_start(start);
                let to = plan
                    .destinations()
                    .find_map(|heuristic| nav.find_best(Some(from), heuristic))
                    .unwrap_or(from);
                (Some(to), Some(from))
            }
        };

        tracing::trace!(?direction, ?from, ?to, "Arrow key");
        self.arrow.finish(to);
        self.keyboard_move_to(to, from, modifiers);
    }

    /// Moves focus to `target` and applies the modifier policy.
    fn keyboard_move_to(&mut self, target: Option<IconId>, from: Option<IconId>, modifiers: Modifiers) {
        let Some(target) = target else {
            return;
        };

        self.set_focus(Some(target), true);

        if modifiers.control_only() {
            self.slots.clear(Slot::KeyboardRubberbandStart);
        } else if modifiers.is_rectangle_selection() {
            if from.is_some() && self.slots.get(Slot::KeyboardRubberbandStart).is_none() {
                self.slots.set(Slot::KeyboardRubberbandStart, from);
                model::discard_rubberband_snapshot(&mut self.registry);
            }
            let band = self
                .slots
                .get(Slot::KeyboardRubberbandStart)
                .and_then(|start| self.registry.get(start))
                .zip(self.registry.get(target))
                .map(|(start, target)| start.bounds().union(&target.bounds()));
            if let Some(band) = band {
                if model::rubberband_select(&mut self.registry, &band) {
                    self.emit_selection_changed();
                }
            }
        } else if modifiers.shift_only() {
            let anchor = match self.slots.get(Slot::RangeAnchor) {
                Some(anchor) if self.registry.is_selected(anchor) => anchor,
                _ => {
                    self.slots.set(Slot::RangeAnchor, Some(target));
                    target
                }
            };
            if model::select_range(&mut self.registry, anchor, target, true) {
                self.emit_selection_changed();
            }
        } else {
            self.slots.clear(Slot::KeyboardRubberbandStart);
            self.slots.set(Slot::RangeAnchor, Some(target));
            if self.select_one_unselect_others(Some(target)) {
                self.emit_selection_changed();
            }
        }

        self.schedule_keyboard_reveal(target);
    }

    fn keyboard_space(&mut self, modifiers: Modifiers) {
        let focus = self.slots.get(Slot::Focus);

        if let (false, Some(focus)) = (self.registry.has_selection(), focus) {
            self.keyboard_move_to(Some(focus), None, Modifiers::NONE);
        } else if modifiers.control_only() {
            match focus {
                Some(focus) => {
                    self.registry.toggle_selected(focus);
                    self.emit_selection_changed();
                    if self.registry.is_selected(focus) {
                        self.slots.set(Slot::RangeAnchor, Some(focus));
                    }
                }
                None => {
                    let nav = Navigator::new(&self.registry, &self.source);
                    let icon = nav
                        .find_best_selected(None, Heuristic::LeftmostInTopRow)
                        .or_else(|| nav.find_best(None, Heuristic::LeftmostInTopRow));
                    if icon.is_some() {
                        self.set_focus(icon, true);
                    }
                }
            }
        } else if modifiers.shift {
            self.activate_alternate(None);
        } else {
            self.preview_selection();
        }
    }

    // ========================================================================
    // Activation
    // ========================================================================

    pub(crate) fn activate_selection(&mut self) {
        let selection = self.selection();
        if !selection.is_empty() {
            self.signals.activate.emit(&selection);
        }
    }

    /// Alternate activation of `icon` alone, or of the selection.
    pub(crate) fn activate_alternate(&mut self, icon: Option<IconId>) {
        let items = match icon {
            Some(id) => self.keys_of(&[id]),
            None => self.selection(),
        };
        if !items.is_empty() {
            self.signals.activate_alternate.emit(&items);
        }
    }

    /// Asks the host to preview the selection, with each item's image
    /// corner in widget coordinates.
    fn preview_selection(&mut self) {
        let items = self.selection();
        if items.is_empty() {
            return;
        }
        let offset = self.surface.scroll_offset();
        let locations = items
            .iter()
            .filter_map(|key| self.lookup(key))
            .map(|icon| {
                let position = icon.position();
                Point::new(position.x - offset.x, position.y - offset.y)
            })
            .collect();
        self.signals.activate_previewer.emit(&Preview { items, locations });
    }

    // ========================================================================
    // Keyboard reveal
    // ========================================================================

    /// Reveals `id` shortly, replacing any reveal already waiting.
    fn schedule_keyboard_reveal(&mut self, id: IconId) {
        self.unschedule_keyboard_reveal();
        self.slots.set(Slot::KeyboardReveal, Some(id));
        self.tasks.keyboard_reveal = Some(
            self.queue
                .schedule_once(self.config.keyboard_reveal_delay, CanvasTask::KeyboardReveal),
        );
    }

    pub(crate) fn unschedule_keyboard_reveal(&mut self) {
        if let Some(task) = self.tasks.keyboard_reveal.take() {
            self.queue.cancel(task);
        }
        self.slots.clear(Slot::KeyboardReveal);
    }

    /// Only reveals an item that is still focused or selected.
    pub(crate) fn keyboard_reveal_fired(&mut self) {
        let Some(id) = self.slots.clear(Slot::KeyboardReveal) else {
            return;
        };
        if self.slots.holds(Slot::Focus, id) || self.registry.is_selected(id) {
            self.reveal_icon(id);
        }
    }
}
