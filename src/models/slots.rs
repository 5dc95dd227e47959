//! Named weak references to items.
//!
//! Focus, anchors and pending targets all point at registered items. Removing
//! an item releases it from every slot in one place.

use super::registry::IconId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Focus,
    KeyboardRubberbandStart,
    KeyboardReveal,
    PendingReveal,
    RangeAnchor,
    DragIcon,
    DropTarget,
    /// Item hit by the latest primary press.
    DoubleClickCurrent,
    /// Item hit by the press before that.
    DoubleClickPrevious,
}

impl Slot {
    pub const ALL: [Slot; 9] = [
        Slot::Focus,
        Slot::KeyboardRubberbandStart,
        Slot::KeyboardReveal,
        Slot::PendingReveal,
        Slot::RangeAnchor,
        Slot::DragIcon,
        Slot::DropTarget,
        Slot::DoubleClickCurrent,
        Slot::DoubleClickPrevious,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Default, Clone)]
pub struct ItemSlots {
    slots: [Option<IconId>; 9],
}

impl ItemSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Slot) -> Option<IconId> {
        self.slots[slot.index()]
    }

    /// Stores `id`, returning the previous occupant.
    pub fn set(&mut self, slot: Slot, id: Option<IconId>) -> Option<IconId> {
        std::mem::replace(&mut self.slots[slot.index()], id)
    }

    pub fn clear(&mut self, slot: Slot) -> Option<IconId> {
        self.set(slot, None)
    }

    pub fn holds(&self, slot: Slot, id: IconId) -> bool {
        self.get(slot) == Some(id)
    }

    /// Clears `id` from every slot and reports which ones held it.
    pub fn release(&mut self, id: IconId) -> Vec<Slot> {
        Slot::ALL
            .into_iter()
            .filter(|&slot| {
                if self.holds(slot, id) {
                    self.clear(slot);
                    true
                } else {
                    false
                }
            })
            .collect()
    }

    pub fn clear_all(&mut self) {
        self.slots = [None; 9];
    }
}
