//! Rubber-band gesture state and geometry.

use crate::geometry::{Point, Rect, Size};
use crate::input::PointerId;
use crate::scheduler::TaskId;

/// One active drag-rectangle gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct RubberbandSession {
    /// Device that owns the gesture; releases from other devices are ignored.
    pub pointer: PointerId,
    /// Band origin in canvas coordinates.
    pub start: Point,
    /// Latest pointer position reported by the host, in widget coordinates.
    pub pointer_position: Point,
    /// Pointer position used by the previous tick, after edge clamping.
    pub prev: Point,
    /// Scroll offset seen by the previous tick.
    pub last_offset: Point,
    pub timer: TaskId,
    /// Current band, once a tick has computed one.
    pub rect: Option<Rect>,
}

impl RubberbandSession {
    pub fn new(pointer: PointerId, widget_position: Point, offset: Point, timer: TaskId) -> Self {
        Self {
            pointer,
            start: Point::new(widget_position.x + offset.x, widget_position.y + offset.y),
            pointer_position: widget_position,
            prev: widget_position,
            last_offset: offset,
            timer,
            rect: None,
        }
    }
}

/// Auto-scroll request for a pointer near or past a viewport edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeScroll {
    pub dx: f64,
    pub dy: f64,
    /// Pointer position clamped into the viewport.
    pub position: Point,
}

impl EdgeScroll {
    pub fn is_scrolling(&self) -> bool {
        self.dx != 0.0 || self.dy != 0.0
    }
}

fn edge_axis(position: f64, extent: f64, threshold: f64) -> (f64, f64) {
    if position < threshold {
        (position - threshold, 0.0)
    } else if position >= extent - threshold {
        (position - extent + threshold + 1.0, extent - 1.0)
    } else {
        (0.0, position)
    }
}

/// Scroll by however far the pointer overshoots the edge threshold.
pub fn edge_scroll(position: Point, viewport: Size, threshold: f64) -> EdgeScroll {
    let (dx, x) = edge_axis(position.x, viewport.width, threshold);
    let (dy, y) = edge_axis(position.y, viewport.height, threshold);
    EdgeScroll {
        dx,
        dy,
        position: Point::new(x, y),
    }
}

/// Band spanning `start` and `current`, never thinner than one unit.
pub fn band_rect(start: Point, current: Point) -> Rect {
    let mut rect = Rect::from_corners(start, current);
    rect.x1 = rect.x1.max(rect.x0 + 1.0);
    rect.y1 = rect.y1.max(rect.y0 + 1.0);
    rect
}
