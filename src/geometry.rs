//! Canvas-space geometry primitives.
//!
//! All coordinates are `f64` canvas units with y growing downwards.

/// A point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle stored as two corners (`x0,y0` top-left, `x1,y1` bottom-right).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            x0: origin.x,
            y0: origin.y,
            x1: origin.x + size.width,
            y1: origin.y + size.height,
        }
    }

    /// Rectangle spanning two arbitrary corner points.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x0: a.x.min(b.x),
            y0: a.y.min(b.y),
            x1: a.x.max(b.x),
            y1: a.y.max(b.y),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn center_x(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Union of every rectangle in the iterator, `None` when it is empty.
    pub fn union_all<I>(rects: I) -> Option<Rect>
    where
        I: IntoIterator<Item = Rect>,
    {
        rects.into_iter().reduce(|acc, r| acc.union(&r))
    }

    /// True when the two rectangles share any area or edge.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x0 <= other.x1 && other.x0 <= self.x1 && self.y0 <= other.y1 && other.y0 <= self.y1
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x0 && p.x <= self.x1 && p.y >= self.y0 && p.y <= self.y1
    }

    /// Grows the rectangle by `dx` on the left and right and `dy` on top and bottom.
    pub fn inflate(&self, dx: f64, dy: f64) -> Rect {
        Rect {
            x0: self.x0 - dx,
            y0: self.y0 - dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect {
            x0: self.x0 + dx,
            y0: self.y0 + dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
        }
    }
}

/// Clamps NaN, infinite and non-positive extents to a floor of 1.0.
pub fn sanitize_extent(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value.max(1.0)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_and_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 20.0, 15.0);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(0.0, 0.0, 20.0, 15.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&Rect::new(11.0, 0.0, 12.0, 1.0)));
    }

    #[test]
    fn test_union_all_empty() {
        assert!(Rect::union_all(Vec::new()).is_none());
        let r = Rect::union_all(vec![Rect::new(1.0, 2.0, 3.0, 4.0), Rect::new(-1.0, 0.0, 0.0, 9.0)]);
        assert_eq!(r, Some(Rect::new(-1.0, 0.0, 3.0, 9.0)));
    }

    #[test]
    fn test_from_corners_normalizes() {
        let r = Rect::from_corners(Point::new(10.0, 2.0), Point::new(3.0, 8.0));
        assert_eq!(r, Rect::new(3.0, 2.0, 10.0, 8.0));
        assert!((r.center_x() - 6.5).abs() < 0.01);
    }

    #[test]
    fn test_sanitize_extent_rejects_invalid_numbers() {
        assert!((sanitize_extent(f64::NAN) - 1.0).abs() < 0.01);
        assert!((sanitize_extent(-20.0) - 1.0).abs() < 0.01);
        assert!((sanitize_extent(0.25) - 1.0).abs() < 0.01);
        assert!((sanitize_extent(640.0) - 640.0).abs() < 0.01);
    }
}
