//! Error types for the canvas engine.

use crate::models::ItemKey;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, CanvasError>;

/// Errors reported by the engine.
///
/// Most misuse (duplicate add, unknown remove) is reported through boolean
/// returns instead, since it routinely happens when file-system notifications
/// race with view teardown in the host.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// The id is not registered with the container.
    #[error("no item registered for '{0}'")]
    UnknownItem(ItemKey),

    /// A configuration field is out of range.
    #[error("invalid value for '{field}': {message}")]
    InvalidConfig {
        field: &'static str,
        message: String,
    },
}

impl CanvasError {
    /// Create a configuration error.
    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            message: message.into(),
        }
    }
}
