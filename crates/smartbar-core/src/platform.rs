//! Platform abstraction traits for the synchronization engine.
//!
//! These traits define the interface between the engine and the platform that
//! hosts the surface (browser DOM, headless test surface, native UI). The same
//! engine logic runs unchanged against each of them.

use std::fmt;
use std::time::Duration;

/// Error type for platform operations.
#[derive(Debug, Clone)]
pub struct PlatformError(pub String);

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PlatformError {}

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// Structural role of a surface node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Text,
    /// Atomic inline decoration. `logical_discount` characters of its
    /// rendered text do not count toward the logical length.
    Decoration { logical_discount: usize },
    /// Any other element (including the surface root).
    Element,
}

/// A concrete position inside the rendered surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfacePosition<N> {
    pub node: N,
    /// Offset within `node`: a text offset for text nodes, a child index otherwise.
    pub offset: usize,
}

impl<N> SurfacePosition<N> {
    pub fn new(node: N, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// The platform's current selection, in surface coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeSelection<N> {
    pub anchor: SurfacePosition<N>,
    pub focus: SurfacePosition<N>,
}

impl<N: PartialEq> NativeSelection<N> {
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// Read access to the owner-rendered surface plus the single native caret.
///
/// The engine never renders; it only walks the tree the owner produced and
/// writes the selection during caret placement.
pub trait Surface {
    /// Handle to a node in the rendered tree.
    type Node: Clone + PartialEq + fmt::Debug;

    /// The surface root, or None when the surface is not attached.
    fn root(&self) -> Option<Self::Node>;

    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn previous_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    fn kind(&self, node: &Self::Node) -> NodeKind;

    /// Text content of the node and its descendants.
    fn text(&self, node: &Self::Node) -> String;

    /// Rendered length of `text(node)` in the surface's offset units.
    fn text_len(&self, node: &Self::Node) -> usize;

    /// Whether the surface currently has input focus.
    fn is_focused(&self) -> bool;

    /// The current native selection, if there is one.
    fn selection(&self) -> Option<NativeSelection<Self::Node>>;

    /// Collapse the native selection at the given position.
    fn place_caret(&mut self, at: &SurfacePosition<Self::Node>) -> Result<(), PlatformError>;
}

/// Identifies one arming of a timer. Tokens are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

/// Cancellable one-shot timers driven by the host event loop.
///
/// When an armed timer elapses, the host calls
/// [`CaretSync::timer_fired`](crate::CaretSync::timer_fired) with its token.
pub trait RecoveryTimer {
    fn arm(&mut self, token: TimerToken, delay: Duration);

    /// Cancel a previously armed timer. Unknown tokens are ignored.
    fn disarm(&mut self, token: TimerToken);
}
