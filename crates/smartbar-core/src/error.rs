//! Error types for mapping and caret placement.

use thiserror::Error;

use crate::platform::PlatformError;

/// A logical offset or surface position could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The surface has no root (not activated, or already torn down).
    #[error("surface is not attached")]
    Detached,

    /// The node is not inside the surface root.
    #[error("node is outside the surface")]
    OutsideSurface,

    /// The run that should hold the caret contains no text node.
    #[error("run at index {0} has no text node")]
    NoTextNode(usize),

    /// No run reaches the requested logical offset.
    #[error("no run reaches logical offset {offset} (total {total})")]
    NoRunMatched { offset: usize, total: usize },
}

/// Caret placement failed.
#[derive(Debug, Clone, Error)]
pub enum PlacementError {
    #[error("mapping failed: {0}")]
    Mapping(#[from] MappingError),

    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}
