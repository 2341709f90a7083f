//! Edit intent normalization.
//!
//! Turns a raw native notification into an [`EditIntent`]: the kind is
//! decided once here, and everything downstream switches on it.

use crate::error::MappingError;
use crate::input::{InputType, RawEdit};
use crate::mapper;
use crate::platform::{Surface, SurfacePosition};
use crate::types::{DeleteScope, EditIntent, EditKind, SelectionRange};

/// What the platform should do with the native default of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeforeInputResult {
    /// Prevent the native mutation; the owner applies the edit.
    Handled,
    /// Let the platform proceed (composition preedit, formatting, unknown).
    PassThrough,
}

/// How the engine treats a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Edit(EditKind),
    /// Undo/redo replay, never forwarded.
    History,
    /// Nothing a single-line bar acts on.
    Ignored,
}

/// Decide the edit kind for a native input type.
pub fn classify(input_type: &InputType) -> Classification {
    use InputType::*;

    let kind = match input_type {
        InsertText | InsertCompositionText | InsertFromComposition => EditKind::Insert,
        InsertReplacementText => EditKind::Replace,
        InsertFromPaste | InsertFromPasteAsQuotation | InsertFromDrop | InsertFromYank => {
            EditKind::PasteReplace
        }

        DeleteContentBackward => EditKind::Delete(DeleteScope::Backward),
        DeleteContentForward => EditKind::Delete(DeleteScope::Forward),
        DeleteWordBackward | DeleteEntireWordBackward => {
            EditKind::Delete(DeleteScope::WordBackward)
        }
        DeleteWordForward | DeleteEntireWordForward => EditKind::Delete(DeleteScope::WordForward),
        DeleteSoftLineBackward | DeleteHardLineBackward => {
            EditKind::Delete(DeleteScope::LineBackward)
        }
        DeleteSoftLineForward | DeleteHardLineForward => {
            EditKind::Delete(DeleteScope::LineForward)
        }
        DeleteByCut | DeleteByDrag | DeleteContent => EditKind::Delete(DeleteScope::Selection),

        HistoryUndo | HistoryRedo => return Classification::History,

        // Single-line surface: breaks are suppressed and never forwarded.
        InsertLineBreak | InsertParagraph => return Classification::Ignored,
        // The preedit belongs to the platform; the committed text follows.
        DeleteCompositionText => return Classification::Ignored,

        // Newer or vendor-specific types still edit the text.
        Unknown(name) if name.starts_with("insert") => EditKind::Insert,
        Unknown(name) if name.starts_with("delete") => EditKind::Delete(DeleteScope::Selection),
        Unknown(_) => return Classification::Ignored,
    };
    Classification::Edit(kind)
}

/// Whether to suppress the native default for this notification.
///
/// During composition the platform renders its own preedit text, so nothing
/// is suppressed; the owner's re-render replaces it afterwards.
pub fn before_input_result(input_type: &InputType, composing: bool) -> BeforeInputResult {
    if input_type.mutates_text() && !composing {
        BeforeInputResult::Handled
    } else {
        BeforeInputResult::PassThrough
    }
}

/// Build the intent for a raw notification.
///
/// Range precedence: the notification's own target range, then the range
/// captured at composition start, then `tracked`. Returns None for
/// notifications that are not forwarded.
pub fn normalize(raw: &RawEdit, tracked: SelectionRange) -> Option<EditIntent> {
    let kind = match classify(&raw.input_type) {
        // An unrecognised insertion carrying a payload is a transfer.
        Classification::Edit(EditKind::Insert)
            if matches!(raw.input_type, InputType::Unknown(_)) && raw.transfer_text.is_some() =>
        {
            EditKind::PasteReplace
        }
        Classification::Edit(kind) => kind,
        Classification::History | Classification::Ignored => return None,
    };

    let range = raw
        .target_range
        .or(raw.composition_range)
        .unwrap_or(tracked);

    let text = match kind {
        EditKind::Replace | EditKind::PasteReplace => raw
            .transfer_text
            .clone()
            .or_else(|| raw.data.clone())
            .unwrap_or_default(),
        EditKind::Insert | EditKind::Delete(_) => raw.data.clone().unwrap_or_default(),
    };

    Some(EditIntent { kind, text, range })
}

/// Resolve a platform target range (two surface positions) to logical offsets.
pub fn resolve_target_range<S: Surface>(
    surface: &S,
    start: &SurfacePosition<S::Node>,
    end: &SurfacePosition<S::Node>,
) -> Result<SelectionRange, MappingError> {
    let start = mapper::to_logical_offset(surface, &start.node, start.offset)?;
    let end = mapper::to_logical_offset(surface, &end.node, end.offset)?;
    Ok(SelectionRange::new(start, end))
}
