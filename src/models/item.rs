use std::fmt;
use std::sync::Arc;

use crate::geometry::{Point, Rect};

/// Sentinel coordinate of an item that has not been through a layout pass yet.
pub const UNPOSITIONED: f64 = -1.0;

/// Opaque caller-owned identifier of an item, typically a URI.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemKey(Arc<str>);

impl ItemKey {
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemKey {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

/// Rendered extent of an item as reported by the host.
///
/// The image sits at the top of the item, `image_width` wide and
/// `baseline_offset` tall; the label hangs below it. `width`/`height` cover
/// image and label together, centred on the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntrinsicSize {
    pub width: f64,
    pub height: f64,
    /// Distance from the top of the item to the bottom of its image.
    pub baseline_offset: f64,
    pub image_width: f64,
}

impl IntrinsicSize {
    /// An item whose image spans the full width.
    pub fn new(width: f64, height: f64, baseline_offset: f64) -> Self {
        Self {
            width,
            height,
            baseline_offset,
            image_width: width,
        }
    }

    /// A square image of `image_size` with a label block below it.
    pub fn icon_with_label(image_size: f64, label_width: f64, label_height: f64) -> Self {
        Self {
            width: image_size.max(label_width),
            height: image_size + label_height,
            baseline_offset: image_size,
            image_width: image_size,
        }
    }

    pub fn with_image_width(mut self, image_width: f64) -> Self {
        self.image_width = image_width;
        self
    }

    /// Replaces NaN and negative extents with zero.
    pub fn sanitized(self) -> Self {
        fn clean(v: f64) -> f64 {
            if v.is_finite() && v > 0.0 {
                v
            } else {
                0.0
            }
        }
        Self {
            width: clean(self.width),
            height: clean(self.height),
            baseline_offset: clean(self.baseline_offset),
            image_width: clean(self.image_width),
        }
    }

    /// Width of the whole item, never narrower than its image.
    pub fn bounds_width(&self) -> f64 {
        self.width.max(self.image_width)
    }

    pub fn bounds_height(&self) -> f64 {
        self.height.max(self.baseline_offset)
    }

    /// Part of the item above the image bottom.
    pub fn height_above(&self) -> f64 {
        self.baseline_offset
    }

    /// Part of the item below the image bottom (the label).
    pub fn height_below(&self) -> f64 {
        (self.bounds_height() - self.baseline_offset).max(0.0)
    }
}

impl Default for IntrinsicSize {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// One placed item. Read-only outside the crate; every mutation goes through
/// the container so registry invariants hold.
#[derive(Debug, Clone)]
pub struct Icon {
    pub(crate) key: ItemKey,
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) saved_ltr_x: f64,
    pub(crate) size: IntrinsicSize,
    pub(crate) is_selected: bool,
    pub(crate) was_selected_before_rubberband: bool,
    pub(crate) is_visible: bool,
    pub(crate) sequence_index: usize,
}

impl Icon {
    pub(crate) fn new(key: ItemKey, size: IntrinsicSize) -> Self {
        Self {
            key,
            x: UNPOSITIONED,
            y: UNPOSITIONED,
            saved_ltr_x: UNPOSITIONED,
            size: size.sanitized(),
            is_selected: false,
            was_selected_before_rubberband: false,
            is_visible: false,
            sequence_index: 0,
        }
    }

    pub fn key(&self) -> &ItemKey {
        &self.key
    }

    /// Top-left corner of the image.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Left edge the item would have in a left-to-right layout.
    pub fn saved_ltr_x(&self) -> f64 {
        self.saved_ltr_x
    }

    pub fn size(&self) -> IntrinsicSize {
        self.size
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    /// Ordinal of the item after the last resort.
    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }

    pub fn is_positioned(&self) -> bool {
        self.x != UNPOSITIONED || self.y != UNPOSITIONED
    }

    pub(crate) fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// The image rectangle, used for navigation comparisons.
    pub fn image_rect(&self) -> Rect {
        Rect::new(
            self.x,
            self.y,
            self.x + self.size.image_width,
            self.y + self.size.baseline_offset,
        )
    }

    /// Image plus label, used for hit-testing, reveal and scroll extents.
    pub fn bounds(&self) -> Rect {
        let width = self.size.bounds_width();
        let x0 = self.x + (self.size.image_width - width) / 2.0;
        Rect::new(x0, self.y, x0 + width, self.y + self.size.bounds_height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_icon_is_unpositioned() {
        let icon = Icon::new(ItemKey::from("a"), IntrinsicSize::new(10.0, 10.0, 10.0));
        assert!(!icon.is_positioned());
        assert!(!icon.is_selected());
    }

    #[test]
    fn test_bounds_center_label_under_image() {
        let mut icon = Icon::new(
            ItemKey::from("a"),
            IntrinsicSize::icon_with_label(48.0, 80.0, 20.0),
        );
        icon.set_position(100.0, 10.0);

        let image = icon.image_rect();
        assert!((image.width() - 48.0).abs() < 0.01);
        assert!((image.y1 - 58.0).abs() < 0.01);

        let bounds = icon.bounds();
        assert!((bounds.x0 - 84.0).abs() < 0.01);
        assert!((bounds.x1 - 164.0).abs() < 0.01);
        assert!((bounds.y1 - 78.0).abs() < 0.01);
        assert!((bounds.center_x() - image.center_x()).abs() < 0.01);
    }

    #[test]
    fn test_sanitized_drops_invalid_extents() {
        let size = IntrinsicSize {
            width: f64::NAN,
            height: -4.0,
            baseline_offset: 12.0,
            image_width: f64::INFINITY,
        }
        .sanitized();
        assert!((size.width).abs() < 0.01);
        assert!((size.height).abs() < 0.01);
        assert!((size.baseline_offset - 12.0).abs() < 0.01);
        assert!((size.height_below()).abs() < 0.01);
    }
}
