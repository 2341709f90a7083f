//! IME composition buffering.
//!
//! A composition session may fire several intermediate edits. They collapse
//! into the last one, which is released once the session ends.

use crate::input::{InputType, RawEdit};
use crate::types::SelectionRange;

/// Composition state. Holds at most one buffered edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionBuffer {
    active: bool,
    buffered: Option<RawEdit>,
    range_at_start: Option<SelectionRange>,
}

impl CompositionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn range_at_start(&self) -> Option<SelectionRange> {
        self.range_at_start
    }

    pub fn buffered(&self) -> Option<&RawEdit> {
        self.buffered.as_ref()
    }

    /// Begin a session, remembering where the selection was.
    pub fn start(&mut self, tracked: SelectionRange) {
        if self.active {
            tracing::debug!(
                target: "smartbar::composition",
                "composition restarted before it ended"
            );
        }
        self.active = true;
        self.buffered = None;
        self.range_at_start = Some(tracked);
    }

    /// Move the captured start range. A session that began while an edit
    /// cycle was in flight starts wherever the owner put the caret.
    pub fn rebase(&mut self, range: SelectionRange) {
        if self.active {
            self.range_at_start = Some(range);
        }
    }

    /// Hold an edit until the session ends, replacing any earlier one.
    ///
    /// Preedit removals are dropped: they carry no text, and the commit that
    /// follows them is what the session resolves to.
    pub fn buffer(&mut self, raw: RawEdit) {
        if raw.input_type == InputType::DeleteCompositionText {
            tracing::trace!(target: "smartbar::composition", "preedit removal skipped");
            return;
        }
        tracing::trace!(
            target: "smartbar::composition",
            input_type = ?raw.input_type,
            data = ?raw.data,
            "buffering edit during composition"
        );
        self.buffered = Some(raw);
    }

    /// End the session.
    ///
    /// Returns the buffered edit stamped with the range captured at start,
    /// or None if the composition was cancelled.
    pub fn end(&mut self) -> Option<RawEdit> {
        self.active = false;
        let range = self.range_at_start.take();
        let mut raw = self.buffered.take()?;
        raw.composition_range = range;
        Some(raw)
    }
}
