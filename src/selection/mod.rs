pub mod model;
pub mod rubberband;

pub use rubberband::{band_rect, edge_scroll, EdgeScroll, RubberbandSession};
