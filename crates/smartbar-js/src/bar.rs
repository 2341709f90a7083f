//! The `SmartBar` class.

use smartbar_browser::{BrowserSmartBar, MachineState, OwnerMessage};
use wasm_bindgen::prelude::*;

use crate::types::{JsOwnerMessage, SmartBarOptions};

/// A smart bar hosted in the page.
///
/// ```js
/// const bar = new SmartBar({ surfaceId: "awesomebar" }, (message) => {
///   if (message.type === "editIntent") {
///     const caret = applyEdit(message);
///     bar.setTargetCaret(caret);
///   }
/// });
/// bar.activate();
/// ```
#[wasm_bindgen(js_name = SmartBar)]
pub struct JsSmartBar {
    bar: BrowserSmartBar,
}

#[wasm_bindgen(js_class = SmartBar)]
impl JsSmartBar {
    /// Create a bar. `options` may be null or undefined.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<SmartBarOptions>, on_message: js_sys::Function) -> JsSmartBar {
        let options = options.unwrap_or_default();
        let bar = BrowserSmartBar::new(options.into_config(), move |message: OwnerMessage| {
            let message = JsOwnerMessage::from(message);
            let value = match serde_wasm_bindgen::to_value(&message) {
                Ok(value) => value,
                Err(error) => {
                    tracing::error!(
                        target: "smartbar::js",
                        %error,
                        "could not serialize message"
                    );
                    return;
                }
            };
            if let Err(error) = on_message.call1(&JsValue::NULL, &value) {
                tracing::error!(target: "smartbar::js", ?error, "onMessage threw");
            }
        });
        Self { bar }
    }

    /// Attach to the bar element, waiting for it to be rendered if needed.
    /// Passing an id overrides the configured one.
    pub fn activate(&self, element_id: Option<String>) {
        match element_id {
            Some(id) => self.bar.activate_id(id),
            None => self.bar.activate(),
        }
    }

    /// Attach to an element the caller already holds.
    #[wasm_bindgen(js_name = activateElement)]
    pub fn activate_element(&self, element: web_sys::Element) {
        self.bar.activate_element(element);
    }

    /// Tear down listeners. A `surfaceDetached` message follows.
    pub fn deactivate(&self) {
        self.bar.deactivate();
    }

    /// The owner's answer to the last edit intent.
    #[wasm_bindgen(js_name = setTargetCaret)]
    pub fn set_target_caret(&self, offset: usize) {
        self.bar.set_target_caret(offset);
    }

    /// "inactive", "idle", "awaitingOwner" or "awaitingCommit".
    pub fn state(&self) -> String {
        match self.bar.state() {
            None => "inactive",
            Some(MachineState::Idle) => "idle",
            Some(MachineState::AwaitingOwner) => "awaitingOwner",
            Some(MachineState::AwaitingCommit { .. }) => "awaitingCommit",
        }
        .to_string()
    }

    #[wasm_bindgen(js_name = isWaitingForSurface)]
    pub fn is_waiting_for_surface(&self) -> bool {
        self.bar.is_waiting_for_surface()
    }
}
