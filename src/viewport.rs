//! The scrollable surface the container lays out into.

use crate::config::Padding;
use crate::geometry::{sanitize_extent, Point, Rect, Size};

/// Host-side scroll state the container reads and drives.
///
/// Offsets are the canvas coordinates of the viewport's top-left corner.
pub trait ScrollSurface {
    /// Size of the visible area, `None` until the host has allocated it.
    fn viewport_size(&self) -> Option<Size>;

    fn scroll_offset(&self) -> Point;

    /// Moves the viewport. Implementations clamp to the scroll extent.
    fn set_scroll_offset(&mut self, offset: Point);

    fn scroll_extent(&self) -> Rect;

    fn set_scroll_extent(&mut self, extent: Rect);

    fn step_increment(&self) -> f64;

    fn set_step_increment(&mut self, step: f64);
}

/// In-memory scroll surface that clamps offsets the way a scroll adjustment does.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleViewport {
    size: Option<Size>,
    offset: Point,
    extent: Rect,
    step: f64,
}

impl Default for SimpleViewport {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleViewport {
    /// A viewport that has not been allocated yet.
    pub fn new() -> Self {
        Self {
            size: None,
            offset: Point::default(),
            extent: Rect::default(),
            step: 1.0,
        }
    }

    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            size: Some(Size::new(width, height)),
            ..Self::new()
        }
    }

    pub fn resize(&mut self, size: Size) {
        self.size = Some(size);
        self.offset = self.clamp(self.offset);
    }

    fn clamp(&self, offset: Point) -> Point {
        let size = self.size.unwrap_or_default();
        // Extents are inclusive: x1 is the last addressable unit.
        let max_x = (self.extent.x1 + 1.0 - size.width).max(self.extent.x0);
        let max_y = (self.extent.y1 + 1.0 - size.height).max(self.extent.y0);
        Point::new(
            clamp_finite(offset.x, self.extent.x0, max_x),
            clamp_finite(offset.y, self.extent.y0, max_y),
        )
    }
}

fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

impl ScrollSurface for SimpleViewport {
    fn viewport_size(&self) -> Option<Size> {
        self.size
    }

    fn scroll_offset(&self) -> Point {
        self.offset
    }

    fn set_scroll_offset(&mut self, offset: Point) {
        self.offset = self.clamp(offset);
    }

    fn scroll_extent(&self) -> Rect {
        self.extent
    }

    fn set_scroll_extent(&mut self, extent: Rect) {
        self.extent = extent;
        self.offset = self.clamp(self.offset);
    }

    fn step_increment(&self) -> f64 {
        self.step
    }

    fn set_step_increment(&mut self, step: f64) {
        self.step = step;
    }
}

/// Scrollable region for the laid-out items.
///
/// Starts at the origin, spans at least the viewport width and leaves a
/// padding band below the last row. The result uses inclusive far edges.
pub fn scroll_region(
    item_bounds: Option<Rect>,
    viewport_width: f64,
    icon_padding: &Padding,
    container_padding: &Padding,
) -> Rect {
    let bounds = item_bounds.unwrap_or_default();

    let mut y2 = bounds.y1 + icon_padding.bottom + container_padding.bottom;
    let x1 = bounds.x0.min(0.0);
    let mut x2 = bounds.x1.max(sanitize_extent(viewport_width));
    let y1 = 0.0;

    x2 -= 1.0;
    x2 = x2.max(x1);
    y2 -= 1.0;
    y2 = y2.max(y1);

    Rect::new(x1, y1, x2, y2)
}

/// Smallest offset change that brings `target` into the viewport.
/// Vertical first, then horizontal; an axis already in view is left alone.
pub fn reveal_offset(current: Point, viewport: Size, target: Rect) -> Point {
    let mut offset = current;

    if target.y0 < current.y {
        offset.y = target.y0;
    } else if target.y1 > current.y + viewport.height {
        offset.y = target.y1 - viewport.height;
    }

    if target.x0 < current.x {
        offset.x = target.x0;
    } else if target.x1 > current.x + viewport.width {
        offset.x = target.x1 - viewport.width;
    }

    offset
}
