//! Host-supplied item metadata.

use std::cmp::Ordering;

use crate::config::ZoomLevel;
use crate::models::{IntrinsicSize, ItemKey};

/// What the container needs to know about the items it places.
///
/// The container never renders anything; it asks the host how large each
/// item is drawn and in which order items sort.
pub trait IconSource {
    /// Rendered size of the item at `zoom`, whose nominal icon size is `icon_size`.
    fn intrinsic_size(&self, key: &ItemKey, zoom: ZoomLevel, icon_size: f64) -> IntrinsicSize;

    /// Sort order of the view.
    fn compare(&self, a: &ItemKey, b: &ItemKey) -> Ordering {
        a.cmp(b)
    }

    /// Location used as the final tie-break of keyboard navigation.
    fn uri(&self, key: &ItemKey) -> String {
        key.as_str().to_owned()
    }

    /// Display text of the item, if any.
    fn label(&self, key: &ItemKey) -> Option<String> {
        let _ = key;
        None
    }
}

/// Square icons with a one-line label sized from the file name.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformSource {
    /// Average glyph advance (default: 7)
    pub char_width: f64,
    /// Height of one label line (default: 16)
    pub line_height: f64,
    /// Labels wider than this wrap onto more lines (default: 2x the icon size)
    pub max_label_factor: f64,
}

impl Default for UniformSource {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            line_height: 16.0,
            max_label_factor: 2.0,
        }
    }
}

impl UniformSource {
    /// Last path segment of the key.
    pub fn display_name(key: &ItemKey) -> &str {
        let trimmed = key.as_str().trim_end_matches('/');
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }
}

impl IconSource for UniformSource {
    fn intrinsic_size(&self, key: &ItemKey, _zoom: ZoomLevel, icon_size: f64) -> IntrinsicSize {
        let text_width = Self::display_name(key).chars().count() as f64 * self.char_width;
        let max_label_width = icon_size * self.max_label_factor;
        let lines = (text_width / max_label_width).ceil().max(1.0);
        IntrinsicSize::icon_with_label(icon_size, text_width.min(max_label_width), lines * self.line_height)
    }

    fn label(&self, key: &ItemKey) -> Option<String> {
        Some(Self::display_name(key).to_owned())
    }
}
