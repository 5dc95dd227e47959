//! Orderings between items for keyboard navigation.
//!
//! Items compare by a point at the horizontal centre of the image and the
//! image bottom, truncated to whole units, so items on one visual row tie
//! vertically even when their images differ in height.

use std::cmp::Ordering;

use crate::models::Icon;
use crate::source::IconSource;

/// Integer comparison point of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CmpPoint {
    pub x: i64,
    pub y: i64,
}

pub fn cmp_point(icon: &Icon) -> CmpPoint {
    let rect = icon.image_rect();
    CmpPoint {
        x: rect.center_x().trunc() as i64,
        y: rect.y1.trunc() as i64,
    }
}

pub fn compare_horizontal(a: &Icon, b: &Icon) -> Ordering {
    cmp_point(a).x.cmp(&cmp_point(b).x)
}

pub fn compare_vertical(a: &Icon, b: &Icon) -> Ordering {
    cmp_point(a).y.cmp(&cmp_point(b).y)
}

fn compare_by_uri(source: &dyn IconSource, a: &Icon, b: &Icon) -> Ordering {
    source.uri(a.key()).cmp(&source.uri(b.key()))
}

/// x, then y, then URI.
pub fn compare_horizontal_first(source: &dyn IconSource, a: &Icon, b: &Icon) -> Ordering {
    let (pa, pb) = (cmp_point(a), cmp_point(b));
    pa.x.cmp(&pb.x)
        .then(pa.y.cmp(&pb.y))
        .then_with(|| compare_by_uri(source, a, b))
}

/// y, then x, then URI.
pub fn compare_vertical_first(source: &dyn IconSource, a: &Icon, b: &Icon) -> Ordering {
    let (pa, pb) = (cmp_point(a), cmp_point(b));
    pa.y.cmp(&pb.y)
        .then(pa.x.cmp(&pb.x))
        .then_with(|| compare_by_uri(source, a, b))
}

/// `Less` when the item lies entirely below `start_y`, `Greater` when
/// entirely above, `Equal` when its bounds straddle it.
pub fn compare_with_start_row(start_y: i64, icon: &Icon) -> Ordering {
    let bounds = icon.bounds();
    let start_y = start_y as f64;
    if start_y < bounds.y0 {
        Ordering::Less
    } else if start_y > bounds.y1 {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Column analogue of [`compare_with_start_row`].
pub fn compare_with_start_column(start_x: i64, icon: &Icon) -> Ordering {
    let bounds = icon.bounds();
    let start_x = start_x as f64;
    if start_x < bounds.x0 {
        Ordering::Less
    } else if start_x > bounds.x1 {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IntrinsicSize, ItemKey};
    use crate::source::UniformSource;

    fn icon_at(key: &str, x: f64, y: f64, image: f64) -> Icon {
        let mut icon = Icon::new(ItemKey::from(key), IntrinsicSize::icon_with_label(image, image, 16.0));
        icon.set_position(x, y);
        icon
    }

    #[test]
    fn test_cmp_point_uses_image_bottom_centre() {
        let icon = icon_at("a", 10.0, 20.0, 48.0);
        assert_eq!(cmp_point(&icon), CmpPoint { x: 34, y: 68 });
    }

    #[test]
    fn test_row_tie_ignores_image_height() {
        // Bottoms align at y = 68
        let tall = icon_at("a", 0.0, 20.0, 48.0);
        let short = icon_at("b", 100.0, 44.0, 24.0);
        assert_eq!(compare_vertical(&tall, &short), Ordering::Equal);
        assert_eq!(compare_horizontal(&tall, &short), Ordering::Less);
    }

    #[test]
    fn test_uri_breaks_ties() {
        let source = UniformSource::default();
        let a = icon_at("a", 0.0, 0.0, 48.0);
        let b = icon_at("b", 0.0, 0.0, 48.0);
        assert_eq!(compare_horizontal_first(&source, &a, &b), Ordering::Less);
        assert_eq!(compare_vertical_first(&source, &b, &a), Ordering::Greater);
    }

    #[test]
    fn test_compare_with_start_row() {
        let icon = icon_at("a", 0.0, 100.0, 48.0);
        assert_eq!(compare_with_start_row(50, &icon), Ordering::Less);
        assert_eq!(compare_with_start_row(120, &icon), Ordering::Equal);
        assert_eq!(compare_with_start_row(200, &icon), Ordering::Greater);
        assert_eq!(compare_with_start_column(24, &icon), Ordering::Equal);
        assert_eq!(compare_with_start_column(-5, &icon), Ordering::Greater);
    }
}
