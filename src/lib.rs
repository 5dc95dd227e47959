//! Spatial icon layout, selection and keyboard navigation for icon views.
//!
//! [`CanvasContainer`] places items in wrapped rows inside a scrollable
//! surface, tracks single, range and rubber-band selections, and moves focus
//! with the arrow keys over the resulting irregular grid. It renders nothing:
//! the host supplies item sizes through [`IconSource`], owns the scroll state
//! behind [`ScrollSurface`] and listens on [`CanvasSignals`].

pub mod config;
pub mod container;
pub mod error;
pub mod events;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod models;
pub mod navigation;
pub mod pointer;
pub mod scheduler;
pub mod selection;
pub mod source;
pub mod viewport;

pub use config::{EngineConfig, Padding, ZoomLevel, ZoomSizes};
pub use container::CanvasContainer;
pub use error::{CanvasError, Result};
pub use events::{CanvasSignals, ConnectionId, Preview, Signal};
pub use geometry::{Point, Rect, Size};
pub use input::{Key, Modifiers, MouseButton, PointerId};
pub use models::{Icon, IntrinsicSize, ItemKey};
pub use navigation::Direction;
pub use source::{IconSource, UniformSource};
pub use viewport::{ScrollSurface, SimpleViewport};
