//! Click timing and drag tracking.

use std::time::Duration;

use crate::geometry::Point;
use crate::input::MouseButton;

/// Counts clicks that follow each other within the double-click interval.
///
/// Each container owns its own trackers, so clicks in one view never pair
/// with clicks in another.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last_click: Option<Duration>,
    click_count: u32,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a click at `now` and returns how many clicks preceded it in
    /// the current burst (0 for an isolated click).
    pub fn register(&mut self, now: Duration, interval: Duration) -> u32 {
        match self.last_click {
            Some(last) if now.saturating_sub(last) < interval => self.click_count += 1,
            _ => self.click_count = 0,
        }
        self.last_click = Some(now);
        self.click_count
    }

    /// True on the second click of a burst. The count restarts afterwards, so
    /// every further quick click pairs with the one before it.
    pub fn is_double_click(&mut self, now: Duration, interval: Duration) -> bool {
        if self.register(now, interval) == 1 {
            self.click_count = 0;
            true
        } else {
            false
        }
    }
}

/// Drag bookkeeping between a press on an item and its release.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragState {
    /// Press position in canvas coordinates.
    pub origin: Point,
    /// Pressed on an item with a drag-capable button.
    pub armed: bool,
    /// Pointer travelled past the drag threshold.
    pub started: bool,
}

impl DragState {
    pub fn arm(origin: Point) -> Self {
        Self {
            origin,
            armed: true,
            started: false,
        }
    }

    /// Whether `position` is far enough from the press to start a drag.
    pub fn exceeds_threshold(&self, position: Point, threshold: f64) -> bool {
        (position.x - self.origin.x).abs() > threshold || (position.y - self.origin.y).abs() > threshold
    }
}

/// Everything the container remembers about the current press.
#[derive(Debug, Clone, Default)]
pub struct PressState {
    pub button_down_time: Duration,
    /// Button the drag state belongs to; cleared on its release.
    pub drag_button: Option<MouseButton>,
    pub drag: DragState,
    pub icon_selected_on_button_down: bool,
    pub double_clicked: bool,
    /// Buttons of the latest and the previous primary press.
    pub double_click_buttons: [Option<MouseButton>; 2],
    pub double_click: ClickTracker,
    pub single_click: ClickTracker,
}

impl PressState {
    pub fn clear_drag(&mut self) {
        self.drag = DragState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(400);

    #[test]
    fn test_first_click_is_isolated() {
        let mut tracker = ClickTracker::new();
        assert_eq!(tracker.register(Duration::from_millis(5), INTERVAL), 0);
    }

    #[test]
    fn test_double_click_within_interval() {
        let mut tracker = ClickTracker::new();
        assert!(!tracker.is_double_click(Duration::from_millis(1000), INTERVAL));
        assert!(tracker.is_double_click(Duration::from_millis(1200), INTERVAL));
        assert!(tracker.is_double_click(Duration::from_millis(1300), INTERVAL));
        assert!(!tracker.is_double_click(Duration::from_millis(2000), INTERVAL));
    }

    #[test]
    fn test_slow_clicks_do_not_pair() {
        let mut tracker = ClickTracker::new();
        assert!(!tracker.is_double_click(Duration::from_millis(0), INTERVAL));
        assert!(!tracker.is_double_click(Duration::from_millis(500), INTERVAL));
    }

    #[test]
    fn test_trackers_are_independent() {
        let mut a = ClickTracker::new();
        let mut b = ClickTracker::new();
        a.register(Duration::from_millis(100), INTERVAL);
        assert_eq!(b.register(Duration::from_millis(150), INTERVAL), 0);
    }

    #[test]
    fn test_drag_threshold() {
        let drag = DragState::arm(Point::new(10.0, 10.0));
        assert!(!drag.exceeds_threshold(Point::new(18.0, 10.0), 8.0));
        assert!(drag.exceeds_threshold(Point::new(10.0, 19.0), 8.0));
    }
}
