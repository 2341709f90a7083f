//! WASM browser tests for smartbar-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use smartbar_browser::{
    BrowserConfig, BrowserSmartBar, DomSurface, EditIntent, EditKind, InputType, MachineState,
    OwnerMessage, SelectionRange, SpecialKey, Surface, SurfacePosition, mapper,
    parse_browser_input_type,
};

/// Render a bar into the page: `(text, None)` is a text run,
/// `(text, Some(discount))` a decoration.
fn render_bar(id: &str, runs: &[(&str, Option<usize>)]) -> web_sys::Element {
    let document = gloo_utils::document();
    if let Some(old) = document.get_element_by_id(id) {
        old.remove();
    }
    let bar = document.create_element("div").unwrap();
    bar.set_id(id);
    bar.set_attribute("contenteditable", "true").unwrap();
    for (text, discount) in runs {
        match discount {
            None => {
                let node = document.create_text_node(text);
                bar.append_child(&node).unwrap();
            }
            Some(discount) => {
                let span = document.create_element("span").unwrap();
                span.set_attribute("data-completionlen", &discount.to_string())
                    .unwrap();
                span.set_text_content(Some(text));
                bar.append_child(&span).unwrap();
            }
        }
    }
    document.body().unwrap().append_child(&bar).unwrap();
    bar
}

fn surface_for(bar: &web_sys::Element) -> DomSurface {
    let mut surface = DomSurface::new(bar.id(), "data-completionlen");
    surface.attach_to(bar.clone());
    surface
}

fn recorded_bar(id: &str) -> (BrowserSmartBar, Rc<RefCell<Vec<OwnerMessage>>>) {
    let messages = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&messages);
    let config = BrowserConfig {
        surface_id: id.to_string(),
        ..BrowserConfig::default()
    };
    let bar = BrowserSmartBar::new(config, move |message| sink.borrow_mut().push(message));
    (bar, messages)
}

fn before_input(input_type: &str, data: Option<&str>) -> web_sys::InputEvent {
    let init = web_sys::InputEventInit::new();
    init.set_input_type(input_type);
    init.set_data(data);
    init.set_cancelable(true);
    init.set_bubbles(true);
    web_sys::InputEvent::new_with_event_init_dict("beforeinput", &init).unwrap()
}

fn key_down(key: &str) -> web_sys::KeyboardEvent {
    let init = web_sys::KeyboardEventInit::new();
    init.set_key(key);
    init.set_cancelable(true);
    init.set_bubbles(true);
    web_sys::KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap()
}

// === InputType parsing tests ===

#[wasm_bindgen_test]
fn test_parse_insert_text() {
    assert_eq!(parse_browser_input_type("insertText"), InputType::InsertText);
}

#[wasm_bindgen_test]
fn test_parse_replacement_text() {
    assert_eq!(
        parse_browser_input_type("insertReplacementText"),
        InputType::InsertReplacementText
    );
}

#[wasm_bindgen_test]
fn test_parse_composition_commit_types() {
    assert_eq!(
        parse_browser_input_type("insertFromComposition"),
        InputType::InsertFromComposition
    );
    assert_eq!(
        parse_browser_input_type("deleteCompositionText"),
        InputType::DeleteCompositionText
    );
    assert_eq!(
        parse_browser_input_type("insertFromPasteAsQuotation"),
        InputType::InsertFromPasteAsQuotation
    );
}

#[wasm_bindgen_test]
fn test_unrecognised_insert_is_forwarded() {
    let element = render_bar("bar-unknown-insert", &[("", None)]);
    let (bar, messages) = recorded_bar("bar-unknown-insert");
    bar.activate();

    let event = before_input("insertFromVoice", Some("q"));
    element.dispatch_event(&event).unwrap();

    assert!(event.default_prevented());
    assert_eq!(
        messages.borrow().as_slice(),
        &[OwnerMessage::EditIntent(EditIntent {
            kind: EditKind::Insert,
            text: "q".into(),
            range: SelectionRange::caret(0),
        })]
    );
    bar.deactivate();
}

#[wasm_bindgen_test]
fn test_parse_unknown() {
    match parse_browser_input_type("unknownType") {
        InputType::Unknown(s) => assert_eq!(s, "unknownType"),
        _ => panic!("Expected Unknown variant"),
    }
}

// === DomSurface tests ===

#[wasm_bindgen_test]
fn test_dom_surface_kinds_and_lengths() {
    let bar = render_bar("bar-kinds", &[("tomor", None), ("row", Some(3))]);
    let surface = surface_for(&bar);
    let root = surface.root().unwrap();
    let runs = surface.children(&root);

    assert_eq!(runs.len(), 2);
    assert_eq!(surface.kind(&runs[0]), smartbar_browser::NodeKind::Text);
    assert_eq!(
        surface.kind(&runs[1]),
        smartbar_browser::NodeKind::Decoration {
            logical_discount: 3
        }
    );
    assert_eq!(mapper::total_logical_len(&surface), Ok(5));
}

#[wasm_bindgen_test]
fn test_dom_surface_counts_utf16() {
    let bar = render_bar("bar-utf16", &[("👍a", None)]);
    let surface = surface_for(&bar);
    assert_eq!(mapper::total_logical_len(&surface), Ok(3));

    let position = mapper::to_position(&surface, 2).unwrap();
    assert_eq!(position.offset, 2);
}

#[wasm_bindgen_test]
fn test_dom_surface_detached_element() {
    let bar = render_bar("bar-detached", &[("abc", None)]);
    let surface = surface_for(&bar);
    bar.remove();
    assert!(surface.root().is_none());
    assert!(mapper::to_position(&surface, 1).is_err());
}

#[wasm_bindgen_test]
fn test_place_caret_and_read_back() {
    let bar = render_bar(
        "bar-caret",
        &[("tomor", None), ("row ", Some(4)), (" ", None)],
    );
    let mut surface = surface_for(&bar);

    let position = mapper::to_position(&surface, 6).unwrap();
    surface.place_caret(&position).unwrap();

    let selection = surface.selection().unwrap();
    assert!(selection.is_collapsed());
    assert_eq!(
        selection.focus,
        SurfacePosition::new(bar.last_child().unwrap(), 1)
    );
    assert_eq!(
        mapper::selection_to_range(&surface, &selection),
        Ok(SelectionRange::caret(6))
    );
}

// === BrowserSmartBar tests ===

#[wasm_bindgen_test]
fn test_beforeinput_becomes_edit_intent() {
    let element = render_bar("bar-intent", &[("", None)]);
    let (bar, messages) = recorded_bar("bar-intent");
    bar.activate();
    assert!(!bar.is_waiting_for_surface());
    assert_eq!(bar.state(), Some(MachineState::Idle));

    let event = before_input("insertText", Some("a"));
    element.dispatch_event(&event).unwrap();

    assert!(event.default_prevented());
    assert_eq!(bar.state(), Some(MachineState::AwaitingOwner));
    assert_eq!(
        messages.borrow().as_slice(),
        &[OwnerMessage::EditIntent(EditIntent {
            kind: EditKind::Insert,
            text: "a".into(),
            range: SelectionRange::caret(0),
        })]
    );

    bar.set_target_caret(1);
    assert_eq!(bar.state(), Some(MachineState::AwaitingCommit { target: 1 }));
    bar.deactivate();
}

#[wasm_bindgen_test]
fn test_history_is_not_prevented() {
    let element = render_bar("bar-history", &[("abc", None)]);
    let (bar, messages) = recorded_bar("bar-history");
    bar.activate();

    let event = before_input("historyUndo", None);
    element.dispatch_event(&event).unwrap();

    assert!(!event.default_prevented());
    assert!(messages.borrow().is_empty());
    bar.deactivate();
}

#[wasm_bindgen_test]
fn test_special_key_forwarded() {
    let element = render_bar("bar-keys", &[("abc", None)]);
    let (bar, messages) = recorded_bar("bar-keys");
    bar.activate();

    let escape = key_down("Escape");
    element.dispatch_event(&escape).unwrap();
    let letter = key_down("q");
    element.dispatch_event(&letter).unwrap();

    assert!(escape.default_prevented());
    assert!(!letter.default_prevented());
    assert_eq!(
        messages.borrow().as_slice(),
        &[OwnerMessage::SpecialKey(SpecialKey("Escape".into()))]
    );
    bar.deactivate();
}

#[wasm_bindgen_test]
fn test_activation_waits_for_surface() {
    let (bar, _messages) = recorded_bar("bar-not-yet-rendered");
    bar.activate();
    assert!(bar.is_waiting_for_surface());
    assert_eq!(bar.state(), None);

    bar.deactivate();
    assert!(!bar.is_waiting_for_surface());
}

#[wasm_bindgen_test]
fn test_deactivate_reports_detached() {
    let element = render_bar("bar-teardown", &[("abc", None)]);
    let (bar, messages) = recorded_bar("bar-teardown");
    bar.activate();
    bar.deactivate();

    assert_eq!(bar.state(), None);
    assert_eq!(messages.borrow().last(), Some(&OwnerMessage::SurfaceDetached));

    // Listeners may still be alive until the next task, but the engine is inert.
    let event = before_input("insertText", Some("x"));
    element.dispatch_event(&event).unwrap();
    assert!(!event.default_prevented());
    assert_eq!(messages.borrow().len(), 1);
}
