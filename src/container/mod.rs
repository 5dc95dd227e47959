//! The canvas container: item registry, layout, selection and navigation
//! behind one host-facing facade.
//!
//! The container never renders and never blocks. The host feeds it input
//! events and clock ticks; it answers through [`CanvasSignals`] and by
//! driving the [`ScrollSurface`].

mod layout_ops;
mod navigation_ops;
mod pointer_ops;
mod selection_ops;


use std::time::Duration;

use crate::config::{EngineConfig, ZoomLevel};
use crate::error::{CanvasError, Result};
use crate::events::CanvasSignals;
use crate::geometry::{Rect, Size};
use crate::layout::CachedLayoutComputer;
use crate::models::{Icon, IconId, IconRegistry, IntrinsicSize, ItemKey, ItemSlots, Slot};
use crate::navigation::ArrowKeyState;
use crate::pointer::PressState;
use crate::scheduler::{DeferredQueue, TaskId};
use crate::selection::RubberbandSession;
use crate::source::IconSource;
use crate::viewport::{ScrollSurface, SimpleViewport};

/// Work the container defers to the host's event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CanvasTask {
    RedoLayout,
    KeyboardReveal,
    RubberbandTick,
    SelectionChanged,
    ResetAllocationCount,
}

/// Ids of the pending one-per-kind tasks. A fired task whose id no longer
/// matches is stale and skipped.
#[derive(Debug, Default)]
struct PendingTasks {
    redo_layout: Option<TaskId>,
    keyboard_reveal: Option<TaskId>,
    selection_changed: Option<TaskId>,
    reset_allocation: Option<TaskId>,
}

#[derive(Debug, Default)]
struct Allocation {
    allocated: bool,
    size: Option<Size>,
    /// Allocations since the last idle; breaks scrollbar on/off loops.
    count: u32,
}

/// Spatial icon container.
///
/// `S` supplies item sizes and ordering, `V` is the scrollable surface the
/// items are laid out into.
pub struct CanvasContainer<S, V = SimpleViewport> {
    source: S,
    surface: V,
    config: EngineConfig,
    zoom: ZoomLevel,
    registry: IconRegistry,
    slots: ItemSlots,
    keyboard_focus: bool,
    queue: DeferredQueue<CanvasTask>,
    tasks: PendingTasks,
    signals: CanvasSignals,
    layout: CachedLayoutComputer,
    allocation: Allocation,
    press: PressState,
    rubberband: Option<RubberbandSession>,
    arrow: ArrowKeyState,
}

impl<S: IconSource, V: ScrollSurface> CanvasContainer<S, V> {
    pub fn new(source: S, surface: V, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let layout = CachedLayoutComputer::new(config.layout_cache_entries);
        Ok(Self {
            source,
            surface,
            config,
            zoom: ZoomLevel::Standard,
            registry: IconRegistry::new(),
            slots: ItemSlots::new(),
            keyboard_focus: false,
            queue: DeferredQueue::new(),
            tasks: PendingTasks::default(),
            signals: CanvasSignals::default(),
            layout,
            allocation: Allocation::default(),
            press: PressState::default(),
            rubberband: None,
            arrow: ArrowKeyState::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replaces the configuration and lays everything out again.
    pub fn set_config(&mut self, config: EngineConfig) -> Result<()> {
        config.validate()?;
        if config.layout_cache_entries != self.config.layout_cache_entries {
            self.layout.cache.resize(config.layout_cache_entries);
        }
        self.config = config;
        self.layout.invalidate();
        self.request_update_all();
        Ok(())
    }

    pub fn signals(&self) -> &CanvasSignals {
        &self.signals
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    /// Host-side access to the scroll surface, e.g. to resize it before
    /// calling [`size_allocate`](Self::size_allocate).
    pub fn surface_mut(&mut self) -> &mut V {
        &mut self.surface
    }

    pub fn registry(&self) -> &IconRegistry {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// Registers a new item. Returns `false` if the key is already present.
    pub fn add(&mut self, key: impl Into<ItemKey>) -> bool {
        let key = key.into();
        if self.registry.insert(key.clone(), IntrinsicSize::default()).is_none() {
            tracing::trace!(%key, "Ignoring duplicate item");
            return false;
        }
        self.schedule_redo_layout();
        true
    }

    /// Removes an item and every reference to it. Returns `false` if the key
    /// is unknown.
    pub fn remove(&mut self, key: &ItemKey) -> bool {
        let Some(id) = self.registry.lookup(key) else {
            return false;
        };
        self.destroy_icon(id);
        self.schedule_redo_layout();
        self.signals.item_removed.emit(key);
        true
    }

    fn destroy_icon(&mut self, id: IconId) {
        let was_selected = self.registry.is_selected(id);
        let neighbor = self.registry.neighbor(id);

        if self.slots.holds(Slot::Focus, id) {
            self.set_focus(neighbor, true);
        }
        if self.slots.holds(Slot::KeyboardReveal, id) {
            self.unschedule_keyboard_reveal();
        }
        if self.slots.holds(Slot::DragIcon, id) {
            self.press.clear_drag();
        }

        let released = self.slots.release(id);
        if !released.is_empty() {
            tracing::trace!(?released, "Released references to removed item");
        }
        self.registry.remove(id);

        if was_selected {
            self.schedule_selection_changed();
        }
    }

    pub fn lookup(&self, key: &ItemKey) -> Option<&Icon> {
        self.registry.lookup(key).and_then(|id| self.registry.get(id))
    }

    pub fn contains(&self, key: &ItemKey) -> bool {
        self.registry.lookup(key).is_some()
    }

    /// Visits every item in display order.
    pub fn for_each<F>(&self, mut callback: F)
    where
        F: FnMut(&Icon),
    {
        for (_, icon) in self.registry.iter() {
            callback(icon);
        }
    }

    /// Drops every item and transient reference.
    pub fn clear(&mut self) {
        if self.registry.is_empty() {
            return;
        }

        self.set_focus(None, false);
        self.slots.clear(Slot::KeyboardRubberbandStart);
        self.unschedule_keyboard_reveal();
        self.slots.clear_all();
        self.press.clear_drag();
        self.registry.clear();
        self.update_scroll_region();
        tracing::debug!("Cleared container");
        self.signals.cleared.emit(&());
    }

    /// Re-queries one item's size. No-op for an unknown key.
    pub fn request_update(&mut self, key: &ItemKey) {
        let Some(id) = self.registry.lookup(key) else {
            return;
        };
        self.refresh_size(id);
        self.registry.mark_needs_resort();
        self.schedule_redo_layout();
    }

    /// Re-queries every size and lays out immediately.
    pub fn request_update_all(&mut self) {
        for id in self.registry.ids().to_vec() {
            self.refresh_size(id);
        }
        self.registry.mark_needs_resort();
        self.redo_layout();
    }

    /// Resorts with the host comparator and lays out immediately.
    pub fn sort(&mut self) {
        self.registry.mark_needs_resort();
        self.redo_layout();
    }

    pub(crate) fn refresh_size(&mut self, id: IconId) {
        let icon_size = self.config.icon_size(self.zoom);
        let Some(icon) = self.registry.get_mut(id) else {
            return;
        };
        icon.size = self
            .source
            .intrinsic_size(&icon.key, self.zoom, icon_size)
            .sanitized();
    }

    /// Full bounds of an item in canvas coordinates.
    pub fn icon_bounding_box(&self, key: &ItemKey) -> Result<Rect> {
        self.lookup(key)
            .map(Icon::bounds)
            .ok_or_else(|| CanvasError::UnknownItem(key.clone()))
    }

    pub(crate) fn key_of(&self, id: IconId) -> Option<ItemKey> {
        self.registry.get(id).map(|icon| icon.key.clone())
    }

    pub(crate) fn keys_of(&self, ids: &[IconId]) -> Vec<ItemKey> {
        ids.iter().filter_map(|&id| self.key_of(id)).collect()
    }

    // ========================================================================
    // Focus
    // ========================================================================

    pub fn focus(&self) -> Option<&ItemKey> {
        self.slots
            .get(Slot::Focus)
            .and_then(|id| self.registry.get(id))
            .map(Icon::key)
    }

    /// Item the host is currently hovering a drop over.
    pub fn drop_target(&self) -> Option<&ItemKey> {
        self.slots
            .get(Slot::DropTarget)
            .and_then(|id| self.registry.get(id))
            .map(Icon::key)
    }

    /// Marks `key` as the drop target, or clears it with `None`. Unknown
    /// keys clear the target.
    pub fn set_drop_target(&mut self, key: Option<&ItemKey>) {
        let id = key.and_then(|key| self.registry.lookup(key));
        self.slots.set(Slot::DropTarget, id);
    }

    /// Whether the focus was last moved from the keyboard.
    pub fn has_keyboard_focus(&self) -> bool {
        self.keyboard_focus && self.slots.get(Slot::Focus).is_some()
    }

    pub(crate) fn set_focus(&mut self, id: Option<IconId>, from_keyboard: bool) {
        self.slots.set(Slot::Focus, id);
        self.keyboard_focus = from_keyboard && id.is_some();
    }

    // ========================================================================
    // Deferred work
    // ========================================================================

    /// Current time on the container's clock.
    pub fn now(&self) -> Duration {
        self.queue.now()
    }

    /// Time until the next deferred task is due, if any.
    pub fn time_until_next_task(&mut self) -> Option<Duration> {
        self.queue.time_until_next()
    }

    /// Moves the clock forward by `elapsed`, running every task that falls
    /// due on the way, in order. Idle work queued by those tasks runs on the
    /// next call.
    pub fn advance(&mut self, elapsed: Duration) {
        let deadline = self.queue.now() + elapsed;
        self.queue.begin_round();
        while let Some((id, task)) = self.queue.pop_due(deadline) {
            self.run_task(id, task);
        }
        self.queue.end_round();
        self.queue.set_now(deadline);
    }

    /// Runs idle tasks and anything else due now.
    pub fn run_idle(&mut self) {
        self.advance(Duration::ZERO);
    }

    fn run_task(&mut self, id: TaskId, task: CanvasTask) {
        match task {
            CanvasTask::RedoLayout => {
                if self.tasks.redo_layout != Some(id) {
                    tracing::trace!("Skipping stale layout task");
                    return;
                }
                self.tasks.redo_layout = None;
                self.redo_layout_internal();
            }
            CanvasTask::KeyboardReveal => {
                if self.tasks.keyboard_reveal != Some(id) {
                    tracing::trace!("Skipping stale keyboard reveal");
                    return;
                }
                self.tasks.keyboard_reveal = None;
                self.keyboard_reveal_fired();
            }
            CanvasTask::RubberbandTick => {
                if self.rubberband.as_ref().map(|band| band.timer) != Some(id) {
                    tracing::trace!("Skipping stale rubber-band tick");
                    self.queue.cancel(id);
                    return;
                }
                self.rubberband_tick();
            }
            CanvasTask::SelectionChanged => {
                if self.tasks.selection_changed != Some(id) {
                    return;
                }
                self.tasks.selection_changed = None;
                self.emit_selection_changed();
            }
            CanvasTask::ResetAllocationCount => {
                self.tasks.reset_allocation = None;
                self.allocation.count = 0;
            }
        }
    }

    /// One coalesced notification for a batch of removals.
    fn schedule_selection_changed(&mut self) {
        if self.tasks.selection_changed.is_none() {
            self.tasks.selection_changed = Some(self.queue.schedule_idle(CanvasTask::SelectionChanged));
        }
    }

    pub(crate) fn emit_selection_changed(&self) {
        self.signals.selection_changed.emit(&());
    }
}
