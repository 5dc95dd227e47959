use crate::config::{EngineConfig, Padding, ZoomLevel};
use crate::geometry::sanitize_extent;
use crate::models::{IntrinsicSize, RowItem, RowModel};

/// Configuration for the row-wrapping icon flow.
///
/// Items are placed left-to-right on a quantized grid; each row shares one
/// baseline so images line up independently of label height.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowLayout {
    /// Space around every item (default: 4 on each side)
    pub icon_padding: Padding,
    /// Space inside the canvas edges (default: 4 on each side)
    pub container_padding: Padding,
    /// Narrowest allowed grid cell (default: 112, standard zoom)
    pub min_grid_width: f64,
    /// Nominal icon size; cells are never narrower (default: 64, standard zoom)
    pub icon_size: f64,
    /// Mirror rows for right-to-left layouts (default: false)
    pub rtl: bool,
}

impl Default for FlowLayout {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default(), ZoomLevel::Standard)
    }
}

/// Final coordinates of one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub saved_ltr_x: f64,
}

impl FlowLayout {
    pub fn from_config(config: &EngineConfig, zoom: ZoomLevel) -> Self {
        Self {
            icon_padding: config.icon_padding,
            container_padding: config.container_padding,
            min_grid_width: config.grid_width(zoom),
            icon_size: config.icon_size(zoom),
            rtl: config.rtl,
        }
    }

    /// Width left for cells. The extra unit absorbs float jitter so a window
    /// one pixel wider does not drop a column.
    pub fn available_width(&self, canvas_width: f64) -> f64 {
        (canvas_width - self.icon_padding.left - self.icon_padding.right - 1.0).max(1.0)
    }

    pub fn num_columns(&self, canvas_width: f64) -> f64 {
        (self.available_width(canvas_width) / self.min_grid_width)
            .floor()
            .max(1.0)
    }

    /// Effective cell width for `item_count` items.
    ///
    /// Full rows stretch cells evenly. A single short row grows cells by a
    /// damped fraction, f(x) = (x + 1)^(1/4) - 1, so a few icons in a wide
    /// window stay grouped instead of spreading edge to edge.
    pub fn grid_width(&self, canvas_width: f64, item_count: usize) -> f64 {
        let available_width = self.available_width(canvas_width);
        let num_columns = self.num_columns(canvas_width);

        let grid_width = if item_count as f64 > num_columns {
            available_width / num_columns
        } else {
            let num_icons = (item_count as f64).max(1.0);
            let used_width = num_icons * self.min_grid_width;
            let unused_width = available_width - used_width;
            let max_extra_fraction = (unused_width / num_icons) / self.min_grid_width;
            let extra_fraction = (max_extra_fraction + 1.0).powf(0.25) - 1.0;
            self.min_grid_width * (1.0 + extra_fraction)
        };

        if grid_width.is_finite() {
            grid_width.max(self.min_grid_width)
        } else {
            self.min_grid_width
        }
    }

    /// Item width rounded up to whole grid cells.
    pub fn cell_width(&self, size: &IntrinsicSize, grid_width: f64) -> f64 {
        (size.bounds_width().max(self.icon_size) / grid_width).ceil() * grid_width
    }

    /// Splits items into rows and computes each row's baseline.
    ///
    /// # Algorithm
    /// 1. Quantize every item to whole grid cells.
    /// 2. Accumulate cells until the next one would reach the canvas width.
    /// 3. Close the row: its baseline sits below the tallest image, the
    ///    next row starts below the tallest label.
    ///
    /// # Returns
    /// One RowModel per row, items in input order.
    pub fn compute(&self, sizes: &[IntrinsicSize], canvas_width: f64) -> Vec<RowModel> {
        if sizes.is_empty() {
            return Vec::new();
        }

        let canvas_width = sanitize_extent(canvas_width);
        let grid_width = self.grid_width(canvas_width, sizes.len());

        let mut rows = Vec::new();
        let mut row_index = 0u32;
        let mut pending_items: Vec<RowItem> = Vec::new();
        let mut line_width = 0.0;
        let mut y = self.container_padding.top;
        let mut max_height_above = 0.0f64;
        let mut max_height_below = 0.0f64;

        for (index, size) in sizes.iter().enumerate() {
            let icon_width = self.cell_width(size, grid_width);
            let height_above = size.height_above();
            let height_below = size.height_below();

            if !pending_items.is_empty() && line_width + icon_width >= canvas_width {
                y += self.icon_padding.top + max_height_above;
                rows.push(RowModel::new(row_index, y, std::mem::take(&mut pending_items)));
                y += max_height_below + self.icon_padding.bottom;

                row_index += 1;
                line_width = 0.0;
                max_height_above = height_above;
                max_height_below = height_below;
            } else {
                max_height_above = max_height_above.max(height_above);
                max_height_below = max_height_below.max(height_below);
            }

            pending_items.push(RowItem {
                index,
                cell_width: icon_width,
                image_height: size.baseline_offset,
                x_offset: (icon_width - size.image_width) / 2.0,
                y_offset: -size.baseline_offset,
            });
            line_width += icon_width;
        }

        if !pending_items.is_empty() {
            y += self.icon_padding.top + max_height_above;
            rows.push(RowModel::new(row_index, y, pending_items));
        }

        rows
    }

    /// Lays every row down on its baseline, mirroring for RTL.
    ///
    /// Returns one Placement per input size, in input order.
    pub fn place(&self, sizes: &[IntrinsicSize], rows: &[RowModel], canvas_width: f64) -> Vec<Placement> {
        let canvas_width = sanitize_extent(canvas_width);
        let mut placements = vec![
            Placement {
                x: 0.0,
                y: 0.0,
                saved_ltr_x: 0.0
            };
            sizes.len()
        ];

        for row in rows {
            let mut x = self.icon_padding.left;
            for item in &row.items {
                let Some(size) = sizes.get(item.index) else {
                    continue;
                };
                let ltr_x = x + item.x_offset;
                let icon_x = if self.rtl {
                    mirror_x(canvas_width, ltr_x, size.image_width)
                } else {
                    ltr_x
                };
                placements[item.index] = Placement {
                    x: icon_x,
                    y: row.baseline + item.y_offset,
                    saved_ltr_x: ltr_x,
                };
                x += item.cell_width;
            }
        }

        placements
    }

    /// Convenience wrapper: compute then place.
    pub fn layout(&self, sizes: &[IntrinsicSize], canvas_width: f64) -> Vec<Placement> {
        let rows = self.compute(sizes, canvas_width);
        self.place(sizes, &rows, canvas_width)
    }

    /// Row breaks for caching: `(start, end, baseline)` per row.
    pub fn compute_breaks(&self, sizes: &[IntrinsicSize], canvas_width: f64) -> Vec<RowBreak> {
        self.compute(sizes, canvas_width)
            .iter()
            .map(|row| RowBreak {
                start_index: row.items.first().map_or(0, |i| i.index),
                end_index: row.items.last().map_or(0, |i| i.index + 1),
                baseline: row.baseline,
            })
            .collect()
    }

    /// Rebuilds rows from cached breaks without re-running the wrap.
    pub fn rows_from_breaks(&self, sizes: &[IntrinsicSize], breaks: &[RowBreak], canvas_width: f64) -> Vec<RowModel> {
        let canvas_width = sanitize_extent(canvas_width);
        let grid_width = self.grid_width(canvas_width, sizes.len());

        breaks
            .iter()
            .enumerate()
            .map(|(row_idx, brk)| {
                let end = brk.end_index.min(sizes.len());
                let start = brk.start_index.min(end);
                let items = (start..end)
                    .map(|index| {
                        let size = &sizes[index];
                        let icon_width = self.cell_width(size, grid_width);
                        RowItem {
                            index,
                            cell_width: icon_width,
                            image_height: size.baseline_offset,
                            x_offset: (icon_width - size.image_width) / 2.0,
                            y_offset: -size.baseline_offset,
                        }
                    })
                    .collect();
                RowModel::new(row_idx as u32, brk.baseline, items)
            })
            .collect()
    }
}

/// x of an item of `item_width` mirrored across the canvas.
pub fn mirror_x(canvas_width: f64, x: f64, item_width: f64) -> f64 {
    canvas_width - x - item_width
}

/// Represents a row break for caching purposes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBreak {
    /// Start index in the item list (inclusive)
    pub start_index: usize,
    /// End index in the item list (exclusive)
    pub end_index: usize,
    pub baseline: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_layout() -> FlowLayout {
        FlowLayout {
            icon_padding: Padding::uniform(4.0),
            container_padding: Padding::uniform(4.0),
            min_grid_width: 50.0,
            icon_size: 40.0,
            rtl: false,
        }
    }

    fn sizes(count: usize, width: f64) -> Vec<IntrinsicSize> {
        (0..count)
            .map(|_| IntrinsicSize::icon_with_label(width, width, 16.0))
            .collect()
    }

    #[test]
    fn test_empty_items() {
        let layout = FlowLayout::default();
        assert!(layout.compute(&[], 800.0).is_empty());
        assert!(layout.layout(&[], 800.0).is_empty());
    }

    #[test]
    fn test_five_items_in_narrow_viewport() {
        let layout = example_layout();
        assert!((layout.available_width(130.0) - 121.0).abs() < 0.01);
        assert!((layout.num_columns(130.0) - 2.0).abs() < 0.01);
        assert!((layout.grid_width(130.0, 5) - 60.5).abs() < 0.01);

        let rows = layout.compute(&sizes(5, 40.0), 130.0);
        let counts: Vec<usize> = rows.iter().map(|r| r.items.len()).collect();
        assert_eq!(counts, vec![2, 2, 1]);
        assert_eq!(rows[2].items[0].index, 4);
    }

    #[test]
    fn test_row_wrap_at_exact_column_count() {
        // 3 columns of 100 fit in 4 + 300 + 4 + 1
        let layout = FlowLayout {
            min_grid_width: 100.0,
            icon_size: 48.0,
            ..example_layout()
        };
        let canvas = 309.0;
        assert!((layout.grid_width(canvas, 4) - 100.0).abs() < 0.01);
        let rows = layout.compute(&sizes(4, 48.0), canvas);
        assert_eq!(rows[0].items.len(), 3);
        assert_eq!(rows[1].items[0].index, 3);
    }

    #[test]
    fn test_short_row_grows_cells_slowly() {
        let layout = example_layout();
        let grid = layout.grid_width(2000.0, 2);
        assert!(grid > layout.min_grid_width);
        // Evenly spreading two items would give ~995 per cell.
        assert!(grid < 200.0, "grid width {} grew too fast", grid);
    }

    #[test]
    fn test_baseline_aligns_images_of_different_heights() {
        let layout = example_layout();
        let items = vec![
            IntrinsicSize::icon_with_label(40.0, 40.0, 16.0),
            IntrinsicSize::icon_with_label(24.0, 24.0, 40.0),
        ];
        let placements = layout.layout(&items, 400.0);
        let bottom_a = placements[0].y + 40.0;
        let bottom_b = placements[1].y + 24.0;
        assert!((bottom_a - bottom_b).abs() < 0.01);
        // First baseline: container top pad + icon top pad + tallest image.
        assert!((bottom_a - 48.0).abs() < 0.01);
    }

    #[test]
    fn test_second_row_starts_below_tallest_label() {
        let layout = example_layout();
        let items = vec![
            IntrinsicSize::icon_with_label(40.0, 40.0, 16.0),
            IntrinsicSize::icon_with_label(40.0, 40.0, 30.0),
            IntrinsicSize::icon_with_label(40.0, 40.0, 16.0),
        ];
        let rows = layout.compute(&items, 130.0);
        assert_eq!(rows.len(), 2);
        // 48 + 30 (label) + 4 (bottom) + 4 (top) + 40 (image)
        assert!((rows[1].baseline - 126.0).abs() < 0.01);
    }

    #[test]
    fn test_cells_center_images() {
        let layout = example_layout();
        let placements = layout.layout(&sizes(5, 40.0), 130.0);
        // cell 60.5 wide, image 40 wide
        assert!((placements[0].x - (4.0 + 10.25)).abs() < 0.01);
        assert!((placements[1].x - (4.0 + 60.5 + 10.25)).abs() < 0.01);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let layout = example_layout();
        let items = sizes(17, 40.0);
        assert_eq!(layout.layout(&items, 333.0), layout.layout(&items, 333.0));
    }

    #[test]
    fn test_rtl_mirrors_right_edges() {
        let ltr = example_layout();
        let rtl = FlowLayout { rtl: true, ..example_layout() };
        let items = sizes(5, 40.0);
        let canvas = 130.0;

        let ltr_places = ltr.layout(&items, canvas);
        let rtl_places = rtl.layout(&items, canvas);
        for ((l, r), size) in ltr_places.iter().zip(&rtl_places).zip(&items) {
            let right_edge = r.x + size.image_width;
            assert!((right_edge - (canvas - l.x)).abs() < 0.01);
            assert!((r.saved_ltr_x - l.x).abs() < 0.01);
            assert!((r.y - l.y).abs() < 0.01);
        }
    }

    #[test]
    fn test_degenerate_widths_do_not_produce_nan() {
        let layout = example_layout();
        for width in [0.0, -50.0, f64::NAN, f64::INFINITY] {
            let placements = layout.layout(&sizes(3, 40.0), width);
            assert!(placements.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        }
    }

    #[test]
    fn test_rows_from_breaks_match_compute() {
        let layout = example_layout();
        let items = sizes(9, 40.0);
        let breaks = layout.compute_breaks(&items, 250.0);
        let rebuilt = layout.rows_from_breaks(&items, &breaks, 250.0);
        assert_eq!(rebuilt, layout.compute(&items, 250.0));
    }
}
