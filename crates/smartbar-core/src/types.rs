//! Core engine types: selection ranges, edit intents and owner messages.
//!
//! These types are framework-agnostic and shared by every surface implementation.

use std::fmt;

use smol_str::SmolStr;

/// Character position in the owner's logical text.
///
/// Decoration-only visual characters are excluded. The unit is whatever the
/// surface measures text in (UTF-16 code units in the browser).
pub type LogicalOffset = usize;

/// A range in the logical text. Always ordered, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SelectionRange {
    start: LogicalOffset,
    end: LogicalOffset,
}

impl SelectionRange {
    /// Create a range, ordering the bounds if needed.
    pub fn new(a: LogicalOffset, b: LogicalOffset) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Create a collapsed range (caret).
    pub fn caret(offset: LogicalOffset) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn start(&self) -> LogicalOffset {
        self.start
    }

    pub fn end(&self) -> LogicalOffset {
        self.end
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }
}

impl From<std::ops::Range<usize>> for SelectionRange {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl From<SelectionRange> for std::ops::Range<usize> {
    fn from(r: SelectionRange) -> Self {
        r.start..r.end
    }
}

impl fmt::Display for SelectionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// What a deletion removes when the range is collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteScope {
    /// One character before the caret (Backspace).
    Backward,
    /// One character after the caret (Delete).
    Forward,
    WordBackward,
    WordForward,
    LineBackward,
    LineForward,
    /// Only the selected range (cut, drag, generic deletion).
    Selection,
}

impl DeleteScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backward => "backward",
            Self::Forward => "forward",
            Self::WordBackward => "wordBackward",
            Self::WordForward => "wordForward",
            Self::LineBackward => "lineBackward",
            Self::LineForward => "lineForward",
            Self::Selection => "selection",
        }
    }
}

/// Kind of a normalized edit. Decided once, during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    /// Typed or composed text.
    Insert,
    Delete(DeleteScope),
    /// Platform replacement of a known range (spell check, autocorrect).
    Replace,
    /// Paste, drop or yank of transferred text.
    PasteReplace,
}

impl EditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Delete(_) => "delete",
            Self::Replace => "replace",
            Self::PasteReplace => "pasteReplace",
        }
    }
}

/// Normalized, logical-offset description of a user edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditIntent {
    pub kind: EditKind,
    /// Text to insert. Empty for pure deletions.
    pub text: String,
    /// The logical range the edit applies to.
    pub range: SelectionRange,
}

impl fmt::Display for EditIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EditKind::Delete(scope) => write!(f, "delete({}) {}", scope.as_str(), self.range),
            kind => write!(f, "{} {:?} {}", kind.as_str(), self.text, self.range),
        }
    }
}

/// A designated control key, forwarded to the owner uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpecialKey(pub SmolStr);

impl SpecialKey {
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Outbound messages from the engine to the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerMessage {
    /// A normalized edit the owner should apply, then reply with a target caret.
    EditIntent(EditIntent),
    /// The caret moved through navigation rather than an edit.
    NavigationCaretChanged(LogicalOffset),
    SpecialKey(SpecialKey),
    /// Teardown finished; the owner may now remove the surface.
    SurfaceDetached,
}

impl fmt::Display for OwnerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EditIntent(intent) => write!(f, "edit {intent}"),
            Self::NavigationCaretChanged(offset) => write!(f, "caret {offset}"),
            Self::SpecialKey(key) => write!(f, "key {}", key.name()),
            Self::SurfaceDetached => write!(f, "detached"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_orders_bounds() {
        let r = SelectionRange::new(9, 4);
        assert_eq!(r.start(), 4);
        assert_eq!(r.end(), 9);
        assert_eq!(r.len(), 5);
        assert_eq!(SelectionRange::from(9..4), r);
        assert!(!r.is_collapsed());
    }

    #[test]
    fn test_caret_is_collapsed() {
        let r = SelectionRange::caret(3);
        assert!(r.is_collapsed());
        assert!(r.is_empty());
        assert_eq!(std::ops::Range::from(r), 3..3);
    }

    #[test]
    fn test_message_display() {
        let msg = OwnerMessage::EditIntent(EditIntent {
            kind: EditKind::Insert,
            text: "x".into(),
            range: SelectionRange::caret(6),
        });
        assert_eq!(msg.to_string(), "edit insert \"x\" 6..6");

        let msg = OwnerMessage::EditIntent(EditIntent {
            kind: EditKind::Delete(DeleteScope::Backward),
            text: String::new(),
            range: SelectionRange::caret(2),
        });
        assert_eq!(msg.to_string(), "edit delete(backward) 2..2");
    }
}
