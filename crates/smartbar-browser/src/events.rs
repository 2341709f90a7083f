//! Browser event extraction.
//!
//! Turns `beforeinput` events into [`RawEdit`]s and key events into
//! navigation triggers.

use smartbar_core::normalizer::resolve_target_range;
use smartbar_core::{InputType, NavigationTrigger, RawEdit, SelectionRange, SurfacePosition};
use wasm_bindgen::prelude::*;

use crate::dom::DomSurface;

// === StaticRange binding ===
//
// web-sys doesn't expose StaticRange, which is what
// InputEvent.getTargetRanges() returns.

#[wasm_bindgen]
extern "C" {
    /// The StaticRange interface represents a static range of text in the DOM.
    pub type StaticRange;

    #[wasm_bindgen(method, getter, structural)]
    pub fn startContainer(this: &StaticRange) -> web_sys::Node;

    #[wasm_bindgen(method, getter, structural)]
    pub fn startOffset(this: &StaticRange) -> u32;

    #[wasm_bindgen(method, getter, structural)]
    pub fn endContainer(this: &StaticRange) -> web_sys::Node;

    #[wasm_bindgen(method, getter, structural)]
    pub fn endOffset(this: &StaticRange) -> u32;
}

// === InputType browser parsing ===

/// Parse a browser inputType string to an InputType enum.
///
/// This handles the W3C Input Events inputType values as returned by
/// `InputEvent.inputType` in browsers.
pub fn parse_browser_input_type(s: &str) -> InputType {
    match s {
        "insertText" => InputType::InsertText,
        "insertCompositionText" => InputType::InsertCompositionText,
        "insertFromComposition" => InputType::InsertFromComposition,
        "insertLineBreak" => InputType::InsertLineBreak,
        "insertParagraph" => InputType::InsertParagraph,
        "insertFromPaste" => InputType::InsertFromPaste,
        "insertFromPasteAsQuotation" => InputType::InsertFromPasteAsQuotation,
        "insertFromDrop" => InputType::InsertFromDrop,
        "insertReplacementText" => InputType::InsertReplacementText,
        "insertFromYank" => InputType::InsertFromYank,

        "deleteContentBackward" => InputType::DeleteContentBackward,
        "deleteContentForward" => InputType::DeleteContentForward,
        "deleteWordBackward" => InputType::DeleteWordBackward,
        "deleteWordForward" => InputType::DeleteWordForward,
        "deleteSoftLineBackward" => InputType::DeleteSoftLineBackward,
        "deleteSoftLineForward" => InputType::DeleteSoftLineForward,
        "deleteHardLineBackward" => InputType::DeleteHardLineBackward,
        "deleteHardLineForward" => InputType::DeleteHardLineForward,
        "deleteByCut" => InputType::DeleteByCut,
        "deleteByDrag" => InputType::DeleteByDrag,
        "deleteContent" => InputType::DeleteContent,
        "deleteEntireSoftLine" => InputType::DeleteSoftLineBackward,
        "deleteEntireWordBackward" => InputType::DeleteEntireWordBackward,
        "deleteEntireWordForward" => InputType::DeleteEntireWordForward,
        "deleteCompositionText" => InputType::DeleteCompositionText,

        "historyUndo" => InputType::HistoryUndo,
        "historyRedo" => InputType::HistoryRedo,

        // Formatting and structure land here; nothing a plain bar renders.
        other => InputType::Unknown(other.into()),
    }
}

/// Build a raw edit from a `beforeinput` event.
///
/// The target range is only read for replacement-type input (spellcheck and
/// autocorrect), where it differs from the tracked selection; it is
/// resolved to logical offsets now, before a re-render can replace the nodes
/// it refers to.
pub fn raw_edit_from_event(event: &web_sys::InputEvent, surface: &DomSurface) -> RawEdit {
    let input_type = parse_browser_input_type(&event.input_type());
    let wants_target = input_type == InputType::InsertReplacementText;

    let mut raw = RawEdit::new(input_type);
    raw.data = event.data().filter(|data| !data.is_empty());
    raw.transfer_text = get_transfer_text(event);
    if wants_target {
        raw.target_range = get_target_range(event, surface);
    }
    raw
}

/// Plain-text payload from `dataTransfer` (paste, drop, replacement).
pub fn get_transfer_text(event: &web_sys::InputEvent) -> Option<String> {
    let data_transfer = event.data_transfer()?;
    data_transfer
        .get_data("text/plain")
        .ok()
        .filter(|text| !text.is_empty())
}

/// The first range from `getTargetRanges()`, in logical offsets.
pub fn get_target_range(
    event: &web_sys::InputEvent,
    surface: &DomSurface,
) -> Option<SelectionRange> {
    use wasm_bindgen::JsCast;

    let ranges = event.get_target_ranges();
    if ranges.length() == 0 {
        return None;
    }
    let static_range: StaticRange = ranges.get(0).unchecked_into();

    let start = SurfacePosition::new(
        static_range.startContainer(),
        static_range.startOffset() as usize,
    );
    let end = SurfacePosition::new(
        static_range.endContainer(),
        static_range.endOffset() as usize,
    );

    match resolve_target_range(surface, &start, &end) {
        Ok(range) => Some(range),
        Err(error) => {
            tracing::debug!(
                target: "smartbar::dom",
                %error,
                "target range outside the bar, falling back to tracked selection"
            );
            None
        }
    }
}

/// Navigation trigger for a released key.
pub fn key_up_trigger(event: &web_sys::KeyboardEvent) -> NavigationTrigger {
    NavigationTrigger::KeyUp(event.key().into())
}
