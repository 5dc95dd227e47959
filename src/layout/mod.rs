pub mod flow;
pub mod layout_cache;

pub use flow::{mirror_x, FlowLayout, Placement, RowBreak};
pub use layout_cache::{CacheKey, CachedLayoutComputer, LayoutCache};
