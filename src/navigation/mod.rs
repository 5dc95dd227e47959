pub mod compare;
pub mod keyboard;
pub mod search;

pub use compare::{cmp_point, CmpPoint};
pub use keyboard::{ArrowKeyState, ArrowPlan, Direction, KeyAction};
pub use search::{ArrowStart, Heuristic, Navigator};
