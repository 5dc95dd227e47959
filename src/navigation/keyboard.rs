// Keyboard handling for the canvas
// Maps key presses to container actions and picks the search heuristics
// for each arrow direction
//
// Keybindings:
// - Arrow keys: Move focus/selection (not consumed with Alt)
// - Home / End: First item of the top row / last item of the bottom row
// - Space: Select focus, toggle (Ctrl), activate alternate (Shift), preview
// - Ctrl+F10: Background context menu
// - Ctrl+V: Consumed so the host's paste binding does not see it twice
//
// Modifiers on movement keys:
// - none: select the target only
// - Shift: extend the range from the anchor
// - Ctrl: move focus only
// - Ctrl+Shift: keyboard rubber-band from the last Ctrl-anchored item

use super::compare::CmpPoint;
use super::search::{ArrowStart, Heuristic};
use crate::input::{Key, Modifiers};
use crate::models::IconId;

/// Navigation direction for arrow movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// What a key press asks the container to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Home,
    End,
    Arrow(Direction),
    Space,
    ContextMenu,
    /// Consumed without effect
    Swallow,
}

impl KeyAction {
    /// Returns `None` for keys the container leaves to the host.
    pub fn from_key(key: Key, modifiers: Modifiers) -> Option<Self> {
        let arrow = |direction| (!modifiers.alt).then_some(KeyAction::Arrow(direction));
        match key {
            Key::Home => Some(KeyAction::Home),
            Key::End => Some(KeyAction::End),
            Key::Left => arrow(Direction::Left),
            Key::Right => arrow(Direction::Right),
            Key::Up => arrow(Direction::Up),
            Key::Down => arrow(Direction::Down),
            Key::Space => Some(KeyAction::Space),
            Key::F10 if modifiers.control => Some(KeyAction::ContextMenu),
            Key::Char('v' | 'V') if modifiers.control => Some(KeyAction::Swallow),
            _ => None,
        }
    }
}

/// Heuristics one arrow press tries, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrowPlan {
    pub direction: Direction,
    /// Picks the start among several selected items.
    pub better_start: Heuristic,
    /// Picks the start when nothing is focused or selected.
    pub empty_start: Heuristic,
    pub destination: Heuristic,
    /// Row wraparound.
    pub fallback: Option<Heuristic>,
    /// Ragged last row, e.g. Down from the first row onto a shorter second row.
    pub fallback_fallback: Option<Heuristic>,
    /// Last resort for orphans with no row or column peers.
    pub manual: Heuristic,
}

impl ArrowPlan {
    pub fn for_direction(direction: Direction, rtl: bool, modifiers: Modifiers) -> Self {
        let wrap = !modifiers.is_rectangle_selection();
        let (destination, fallback, fallback_fallback) = match direction {
            Direction::Right => (
                Heuristic::SameRowRightSideLeftmost,
                wrap.then_some(Heuristic::NextRowLeftmost),
                None,
            ),
            Direction::Left => (
                Heuristic::SameRowLeftSideRightmost,
                wrap.then_some(Heuristic::PreviousRowRightmost),
                None,
            ),
            Direction::Down => (
                Heuristic::SameColumnBelowHighest,
                None,
                Some(if rtl {
                    Heuristic::NextRowLeftmost
                } else {
                    Heuristic::NextRowRightmost
                }),
            ),
            Direction::Up => (Heuristic::SameColumnAboveLowest, None, None),
        };

        Self {
            direction,
            better_start: Heuristic::RightmostInBottomRow,
            empty_start: if rtl {
                Heuristic::RightmostInTopRow
            } else {
                Heuristic::LeftmostInTopRow
            },
            destination,
            fallback,
            fallback_fallback,
            manual: Heuristic::ClosestIn90Degrees,
        }
    }

    /// Destination heuristics in the order they are tried.
    pub fn destinations(&self) -> impl Iterator<Item = Heuristic> + '_ {
        std::iter::once(self.destination)
            .chain(self.fallback)
            .chain(self.fallback_fallback)
            .chain(std::iter::once(self.manual))
    }
}

/// Arrow start point remembered between presses.
///
/// Repeated Up or Down presses that continue from the item the previous
/// press landed on keep the column of the first press, so walking through
/// ragged rows does not drift sideways.
#[derive(Debug, Clone, Default)]
pub struct ArrowKeyState {
    start: Option<ArrowStart>,
    last_target: Option<IconId>,
}

impl ArrowKeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the start of a press from `from`, whose comparison point is
    /// `point`.
    pub fn record(&mut self, from: IconId, point: CmpPoint, direction: Direction) -> ArrowStart {
        let continues_run = direction.is_vertical()
            && self.last_target == Some(from)
            && self.start.is_some_and(|start| start.direction == direction);

        let x = match self.start {
            Some(start) if continues_run => start.point.x,
            _ => point.x,
        };

        let start = ArrowStart {
            point: CmpPoint { x, y: point.y },
            direction,
        };
        self.start = Some(start);
        start
    }

    /// Remembers where the press landed.
    pub fn finish(&mut self, target: Option<IconId>) {
        self.last_target = target;
    }

    pub fn start(&self) -> Option<ArrowStart> {
        self.start
    }

    pub fn reset(&mut self) {
        self.start = None;
        self.last_target = None;
    }
}
