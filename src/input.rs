//! Toolkit-neutral input events.
//!
//! The host translates its native key and button events into these before
//! handing them to the container.

/// Keys the container reacts to. Anything else maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Home,
    End,
    Left,
    Right,
    Up,
    Down,
    Space,
    F10,
    Char(char),
    Other,
}

/// Held modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
        alt: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        control: false,
        alt: false,
    };
    pub const CONTROL: Modifiers = Modifiers {
        shift: false,
        control: true,
        alt: false,
    };
    pub const CONTROL_SHIFT: Modifiers = Modifiers {
        shift: true,
        control: true,
        alt: false,
    };
    pub const ALT: Modifiers = Modifiers {
        shift: false,
        control: false,
        alt: true,
    };

    /// Shift or Control: the event edits the selection instead of replacing it.
    pub fn modifies_selection(&self) -> bool {
        self.shift || self.control
    }

    pub fn control_only(&self) -> bool {
        self.control && !self.shift
    }

    pub fn shift_only(&self) -> bool {
        self.shift && !self.control
    }

    /// Control+Shift: keyboard rubber-band.
    pub fn is_rectangle_selection(&self) -> bool {
        self.control && self.shift
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Selects, rubber-bands and drags.
    Primary,
    /// Alternate activation and drag menu.
    Middle,
    /// Context menu.
    Secondary,
    Other(u32),
}

/// Identity of the input device driving a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PointerId(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_predicates() {
        assert!(!Modifiers::NONE.modifies_selection());
        assert!(Modifiers::SHIFT.shift_only());
        assert!(Modifiers::CONTROL.control_only());
        assert!(Modifiers::CONTROL_SHIFT.is_rectangle_selection());
        assert!(!Modifiers::CONTROL_SHIFT.control_only());
        assert!(!Modifiers::ALT.modifies_selection());
    }
}
