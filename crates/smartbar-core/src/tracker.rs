//! Navigation tracking.
//!
//! Keeps the last known logical selection so edits can be ranged without
//! reading the native selection, and reports caret moves that did not come
//! from an edit.

use smol_str::SmolStr;

use crate::mapper;
use crate::platform::{NodeKind, Surface, SurfacePosition};
use crate::types::{LogicalOffset, SelectionRange};

/// What prompted a navigation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTrigger {
    /// A key was released. Only navigation keys are considered.
    KeyUp(SmolStr),
    PointerUp,
    SelectionChange,
}

impl NavigationTrigger {
    pub fn is_right_arrow(&self) -> bool {
        matches!(self, Self::KeyUp(key) if key == "ArrowRight")
    }
}

#[derive(Debug, Clone, Default)]
pub struct NavigationTracker {
    selection: SelectionRange,
}

impl NavigationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known logical selection.
    pub fn selection(&self) -> SelectionRange {
        self.selection
    }

    /// Record a selection the engine established itself, such as the owner's
    /// target caret.
    pub fn assume(&mut self, selection: SelectionRange) {
        self.selection = selection;
    }

    /// Read the native selection and update the tracked one.
    ///
    /// Returns the new caret when it is collapsed and differs from the
    /// previously tracked selection. `moving_right` enables the
    /// decoration-gap correction.
    pub fn observe<S: Surface>(
        &mut self,
        surface: &S,
        moving_right: bool,
    ) -> Option<LogicalOffset> {
        let native = surface.selection()?;
        let mut range = match mapper::selection_to_range(surface, &native) {
            Ok(range) => range,
            Err(error) => {
                tracing::debug!(
                    target: "smartbar::tracker",
                    %error,
                    "could not map native selection"
                );
                return None;
            }
        };

        if moving_right && native.is_collapsed() && is_decoration_gap(surface, &native.focus) {
            range = SelectionRange::caret(range.start() + 1);
            tracing::trace!(
                target: "smartbar::tracker",
                caret = range.start(),
                "caret parked after decoration, nudged forward"
            );
        }

        if range == self.selection {
            return None;
        }
        self.selection = range;
        range.is_collapsed().then_some(range.start())
    }
}

/// A caret at the very start of a whitespace-only text node that directly
/// follows a decoration.
///
/// Moving right off the end of a decoration lands here, one position short
/// of where the caret visually is.
pub fn is_decoration_gap<S: Surface>(surface: &S, at: &SurfacePosition<S::Node>) -> bool {
    if at.offset != 0 || surface.kind(&at.node) != NodeKind::Text {
        return false;
    }
    let text = surface.text(&at.node);
    if text.is_empty() || !text.trim().is_empty() {
        return false;
    }
    let previous = surface.previous_sibling(&at.node).or_else(|| {
        surface
            .parent(&at.node)
            .and_then(|parent| surface.previous_sibling(&parent))
    });
    previous.is_some_and(|node| matches!(surface.kind(&node), NodeKind::Decoration { .. }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemorySurface, Run};

    #[test]
    fn test_reports_collapsed_changes_once() {
        let mut surface = MemorySurface::from_runs(&[Run::text("hello")]);
        let text = surface.run_text(0).unwrap();
        let mut tracker = NavigationTracker::new();

        surface.set_caret(text, 3);
        assert_eq!(tracker.observe(&surface, false), Some(3));
        assert_eq!(tracker.observe(&surface, false), None);
        assert_eq!(tracker.selection(), SelectionRange::caret(3));
    }

    #[test]
    fn test_expanded_selection_is_tracked_not_reported() {
        let mut surface = MemorySurface::from_runs(&[Run::text("hello")]);
        let text = surface.run_text(0).unwrap();
        let mut tracker = NavigationTracker::new();

        surface.select(SurfacePosition::new(text, 4), SurfacePosition::new(text, 1));
        assert_eq!(tracker.observe(&surface, false), None);
        assert_eq!(tracker.selection(), SelectionRange::new(1, 4));
    }

    #[test]
    fn test_decoration_gap_nudges_right_arrow() {
        let mut surface = MemorySurface::from_runs(&[
            Run::text("tomor"),
            Run::decoration("row ", 4),
            Run::text(" "),
        ]);
        let space = surface.run_text(2).unwrap();
        surface.set_caret(space, 0);

        assert!(is_decoration_gap(&surface, &SurfacePosition::new(space, 0)));
        let mut tracker = NavigationTracker::new();
        assert_eq!(tracker.observe(&surface, true), Some(6));
    }

    #[test]
    fn test_decoration_gap_needs_whitespace_after_decoration() {
        let surface = MemorySurface::from_runs(&[
            Run::text("tomor"),
            Run::decoration("row ", 4),
            Run::text(" x"),
        ]);
        let after = surface.run_text(2).unwrap();
        assert!(!is_decoration_gap(&surface, &SurfacePosition::new(after, 0)));

        let plain = MemorySurface::from_runs(&[Run::text("a"), Run::text(" ")]);
        let space = plain.run_text(1).unwrap();
        assert!(!is_decoration_gap(&plain, &SurfacePosition::new(space, 0)));
        assert!(!is_decoration_gap(&plain, &SurfacePosition::new(space, 1)));
    }

    #[test]
    fn test_assumed_selection_dedupes_next_report() {
        let mut surface = MemorySurface::from_runs(&[Run::text("abc")]);
        let text = surface.run_text(0).unwrap();
        let mut tracker = NavigationTracker::new();
        tracker.assume(SelectionRange::caret(2));

        surface.set_caret(text, 2);
        assert_eq!(tracker.observe(&surface, false), None);
    }
}
