pub mod item;
pub mod registry;
pub mod row_model;
pub mod slots;

pub use item::*;
pub use registry::*;
pub use row_model::*;
pub use slots::*;
