/// One cell of a layout row: the per-item `(width, height, x_offset, y_offset)` tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct RowItem {
    /// Position of the item in the laid-out list.
    pub index: usize,
    pub cell_width: f64,
    pub image_height: f64,
    pub x_offset: f64,
    /// Offset from the baseline to the image top (negative).
    pub y_offset: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowModel {
    pub row_index: u32,
    /// y coordinate shared by the bottom of every image in the row.
    pub baseline: f64,
    pub items: Vec<RowItem>,
}

impl RowModel {
    pub fn new(row_index: u32, baseline: f64, items: Vec<RowItem>) -> Self {
        Self {
            row_index,
            baseline,
            items,
        }
    }

    pub fn width(&self) -> f64 {
        self.items.iter().map(|item| item.cell_width).sum()
    }
}
