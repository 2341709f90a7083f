//! Semantic input types from native edit notifications.
//!
//! `InputType` represents the intent of an input operation abstracted from
//! its source. It follows the W3C Input Events vocabulary, since that is what
//! browsers report, but any platform can produce it.

use smol_str::SmolStr;

use crate::types::SelectionRange;

/// Semantic input types from input events.
///
/// Only the vocabulary a single-line bar distinguishes gets a variant.
/// Everything else arrives as `Unknown` with its native name, and is judged
/// by its `insert`/`delete` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputType {
    // === Insertion ===
    /// Insert typed text.
    InsertText,
    /// Insert text from IME composition.
    InsertCompositionText,
    /// Committed composition text (Safari reports the commit separately).
    InsertFromComposition,
    /// Insert a line break (Shift+Enter).
    InsertLineBreak,
    /// Insert a paragraph break (Enter).
    InsertParagraph,
    /// Insert from paste operation.
    InsertFromPaste,
    InsertFromPasteAsQuotation,
    /// Insert from drop operation.
    InsertFromDrop,
    /// Insert replacement text (e.g., spell check correction).
    InsertReplacementText,
    /// Insert from the kill buffer.
    InsertFromYank,

    // === Deletion ===
    /// Delete content backward (Backspace).
    DeleteContentBackward,
    /// Delete content forward (Delete key).
    DeleteContentForward,
    /// Delete word backward (Ctrl/Alt+Backspace).
    DeleteWordBackward,
    /// Delete word forward (Ctrl/Alt+Delete).
    DeleteWordForward,
    DeleteSoftLineBackward,
    DeleteSoftLineForward,
    /// Delete to hard line boundary backward (Cmd+Backspace on Mac).
    DeleteHardLineBackward,
    /// Delete to hard line boundary forward (Cmd+Delete on Mac).
    DeleteHardLineForward,
    DeleteByCut,
    DeleteByDrag,
    /// Generic content deletion.
    DeleteContent,
    DeleteEntireWordBackward,
    DeleteEntireWordForward,
    /// Removal of the preedit text while a composition is being replaced.
    DeleteCompositionText,

    // === History ===
    HistoryUndo,
    HistoryRedo,

    /// Unrecognized input type, with its native name.
    Unknown(SmolStr),
}

impl InputType {
    /// Whether this input type is a deletion operation.
    ///
    /// `DeleteCompositionText` is not: it removes preedit text the platform
    /// drew itself.
    pub fn is_deletion(&self) -> bool {
        match self {
            Self::DeleteContentBackward
            | Self::DeleteContentForward
            | Self::DeleteWordBackward
            | Self::DeleteWordForward
            | Self::DeleteSoftLineBackward
            | Self::DeleteSoftLineForward
            | Self::DeleteHardLineBackward
            | Self::DeleteHardLineForward
            | Self::DeleteByCut
            | Self::DeleteByDrag
            | Self::DeleteContent
            | Self::DeleteEntireWordBackward
            | Self::DeleteEntireWordForward => true,
            Self::Unknown(name) => name.starts_with("delete"),
            _ => false,
        }
    }

    /// Whether this input type inserts anything, line breaks included.
    pub fn is_insertion(&self) -> bool {
        match self {
            Self::InsertText
            | Self::InsertCompositionText
            | Self::InsertFromComposition
            | Self::InsertLineBreak
            | Self::InsertParagraph
            | Self::InsertFromPaste
            | Self::InsertFromPasteAsQuotation
            | Self::InsertFromDrop
            | Self::InsertReplacementText
            | Self::InsertFromYank => true,
            Self::Unknown(name) => name.starts_with("insert"),
            _ => false,
        }
    }

    /// Undo/redo replays. The engine never forwards these.
    pub fn is_history(&self) -> bool {
        matches!(self, Self::HistoryUndo | Self::HistoryRedo)
    }

    /// Whether the native mutation must be suppressed so the owner stays the
    /// only writer of the text.
    pub fn mutates_text(&self) -> bool {
        self.is_insertion() || self.is_deletion()
    }
}

/// A native edit notification, captured before it touches the surface.
///
/// Positions are already logical: an explicit target range is resolved when
/// the notification is intercepted, so a queued notification never refers to
/// nodes that a later re-render replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEdit {
    pub input_type: InputType,
    /// Literal inserted text, if the platform supplied any.
    pub data: Option<String>,
    /// Transferred payload (clipboard, drag data, replacement text).
    pub transfer_text: Option<String>,
    /// Explicit range the platform targets (replacement-type notifications).
    pub target_range: Option<SelectionRange>,
    /// Range captured at composition start, stamped when a buffered
    /// composition edit is released.
    pub composition_range: Option<SelectionRange>,
}

impl RawEdit {
    pub fn new(input_type: InputType) -> Self {
        Self {
            input_type,
            data: None,
            transfer_text: None,
            target_range: None,
            composition_range: None,
        }
    }

    /// Typed text at the tracked caret.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(InputType::InsertText).with_data(text)
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_transfer_text(mut self, text: impl Into<String>) -> Self {
        self.transfer_text = Some(text.into());
        self
    }

    pub fn with_target_range(mut self, range: SelectionRange) -> Self {
        self.target_range = Some(range);
        self
    }
}
