//! Engine configuration.
//!
//! Everything that used to be process-wide tuning lives here and is passed
//! into the container at construction; `CanvasContainer::set_config` swaps it
//! at runtime.

use std::time::Duration;

use crate::error::{CanvasError, Result};

/// Discrete zoom steps of the icon view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ZoomLevel {
    Small,
    #[default]
    Standard,
    Large,
    Larger,
}

impl ZoomLevel {
    pub const ALL: [ZoomLevel; 4] = [
        ZoomLevel::Small,
        ZoomLevel::Standard,
        ZoomLevel::Large,
        ZoomLevel::Larger,
    ];

    /// Maps a numeric level onto the enum, pinning out-of-range values.
    pub fn from_level(level: i32) -> Self {
        match level {
            i32::MIN..=0 => ZoomLevel::Small,
            1 => ZoomLevel::Standard,
            2 => ZoomLevel::Large,
            _ => ZoomLevel::Larger,
        }
    }

    pub fn as_level(self) -> i32 {
        match self {
            ZoomLevel::Small => 0,
            ZoomLevel::Standard => 1,
            ZoomLevel::Large => 2,
            ZoomLevel::Larger => 3,
        }
    }
}

/// One value per zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomSizes {
    pub small: f64,
    pub standard: f64,
    pub large: f64,
    pub larger: f64,
}

impl ZoomSizes {
    pub const fn new(small: f64, standard: f64, large: f64, larger: f64) -> Self {
        Self {
            small,
            standard,
            large,
            larger,
        }
    }

    pub fn get(&self, zoom: ZoomLevel) -> f64 {
        match zoom {
            ZoomLevel::Small => self.small,
            ZoomLevel::Standard => self.standard,
            ZoomLevel::Large => self.large,
            ZoomLevel::Larger => self.larger,
        }
    }

    fn validate(&self, field: &'static str) -> Result<()> {
        for zoom in ZoomLevel::ALL {
            let value = self.get(zoom);
            if !value.is_finite() || value <= 0.0 {
                return Err(CanvasError::invalid_config(
                    field,
                    format!("{:?} must be a positive number, got {}", zoom, value),
                ));
            }
        }
        Ok(())
    }
}

/// Padding on the four sides of a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Padding {
    pub const fn uniform(value: f64) -> Self {
        Self {
            left: value,
            right: value,
            top: value,
            bottom: value,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    fn validate(&self, field: &'static str) -> Result<()> {
        for value in [self.left, self.right, self.top, self.bottom] {
            if !value.is_finite() || value < 0.0 {
                return Err(CanvasError::invalid_config(
                    field,
                    format!("padding must be finite and non-negative, got {}", value),
                ));
            }
        }
        Ok(())
    }
}

/// Configuration for the canvas container.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Nominal icon size per zoom level (default: 48/64/96/128)
    pub icon_sizes: ZoomSizes,
    /// Minimum grid cell width per zoom level (default: 124/112/106/128)
    pub grid_widths: ZoomSizes,
    /// Space kept around every item (default: 4 on each side)
    pub icon_padding: Padding,
    /// Space kept inside the canvas edges (default: 4 on each side)
    pub container_padding: Padding,
    /// Rubber-band tick interval (default: 10ms)
    pub rubberband_interval: Duration,
    /// Distance from a viewport edge that starts rubber-band auto-scroll (default: 5)
    pub rubberband_scroll_threshold: f64,
    /// Delay before a keyboard move scrolls its target into view (default: 10ms)
    pub keyboard_reveal_delay: Duration,
    /// Two presses closer than this form a double click (default: 400ms)
    pub double_click_interval: Duration,
    /// Presses held longer than this never activate in single-click mode (default: 1500ms)
    pub max_click_time: Duration,
    /// Pointer travel that turns a press into a drag (default: 8)
    pub drag_threshold: f64,
    /// Mirror rows for right-to-left locales (default: false)
    pub rtl: bool,
    /// Activate items on a single click (default: false)
    pub single_click_mode: bool,
    /// Number of layout passes kept in the layout cache (default: 8)
    pub layout_cache_entries: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            icon_sizes: ZoomSizes::new(48.0, 64.0, 96.0, 128.0),
            grid_widths: ZoomSizes::new(124.0, 112.0, 106.0, 128.0),
            icon_padding: Padding::uniform(4.0),
            container_padding: Padding::uniform(4.0),
            rubberband_interval: Duration::from_millis(10),
            rubberband_scroll_threshold: 5.0,
            keyboard_reveal_delay: Duration::from_millis(10),
            double_click_interval: Duration::from_millis(400),
            max_click_time: Duration::from_millis(1500),
            drag_threshold: 8.0,
            rtl: false,
            single_click_mode: false,
            layout_cache_entries: 8,
        }
    }
}

impl EngineConfig {
    pub fn icon_size(&self, zoom: ZoomLevel) -> f64 {
        self.icon_sizes.get(zoom)
    }

    pub fn grid_width(&self, zoom: ZoomLevel) -> f64 {
        self.grid_widths.get(zoom)
    }

    /// Scroll step for the given zoom: a quarter of the icon size.
    pub fn step_increment(&self, zoom: ZoomLevel) -> f64 {
        self.icon_size(zoom) / 4.0
    }

    pub fn with_rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    pub fn with_single_click_mode(mut self, single_click_mode: bool) -> Self {
        self.single_click_mode = single_click_mode;
        self
    }

    /// Checks every field, returning the first offending one.
    pub fn validate(&self) -> Result<()> {
        self.icon_sizes.validate("icon_sizes")?;
        self.grid_widths.validate("grid_widths")?;
        self.icon_padding.validate("icon_padding")?;
        self.container_padding.validate("container_padding")?;

        if self.rubberband_interval.is_zero() {
            return Err(CanvasError::invalid_config(
                "rubberband_interval",
                "interval must be non-zero",
            ));
        }
        if !self.rubberband_scroll_threshold.is_finite() || self.rubberband_scroll_threshold < 0.0 {
            return Err(CanvasError::invalid_config(
                "rubberband_scroll_threshold",
                format!("expected a non-negative number, got {}", self.rubberband_scroll_threshold),
            ));
        }
        if !self.drag_threshold.is_finite() || self.drag_threshold < 0.0 {
            return Err(CanvasError::invalid_config(
                "drag_threshold",
                format!("expected a non-negative number, got {}", self.drag_threshold),
            ));
        }
        if self.layout_cache_entries == 0 {
            return Err(CanvasError::invalid_config(
                "layout_cache_entries",
                "cache needs room for at least one layout",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.grid_width(ZoomLevel::Standard) - 112.0).abs() < 0.01);
        assert!((config.step_increment(ZoomLevel::Standard) - 16.0).abs() < 0.01);
    }

    #[test]
    fn test_zoom_level_is_pinned() {
        assert_eq!(ZoomLevel::from_level(-3), ZoomLevel::Small);
        assert_eq!(ZoomLevel::from_level(2), ZoomLevel::Large);
        assert_eq!(ZoomLevel::from_level(99), ZoomLevel::Larger);
        for zoom in ZoomLevel::ALL {
            assert_eq!(ZoomLevel::from_level(zoom.as_level()), zoom);
        }
    }

    #[test]
    fn test_validate_rejects_bad_grid_width() {
        let mut config = EngineConfig::default();
        config.grid_widths.large = f64::NAN;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("grid_widths"));

        let mut config = EngineConfig::default();
        config.icon_padding.left = -1.0;
        assert!(config.validate().is_err());

        let config = EngineConfig {
            rubberband_interval: Duration::ZERO,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
