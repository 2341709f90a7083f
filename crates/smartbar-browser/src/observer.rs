//! MutationObserver bridge.
//!
//! Reports each mutation batch on the bar, reduced to [`SurfaceMutation`]s,
//! so the engine can tell when the owner's re-render has landed.

use smartbar_core::{PlatformError, SurfaceMutation};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, MutationObserver, MutationObserverInit, MutationRecord, Node};

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, MutationObserver)>;

/// An active observation of the bar's subtree. Disconnects on drop.
pub struct SurfaceObserver {
    observer: MutationObserver,
    _callback: ObserverCallback,
}

impl SurfaceObserver {
    /// Start observing child lists and character data under `root`.
    pub fn observe(
        root: &Element,
        mut on_batch: impl FnMut(Vec<SurfaceMutation>) + 'static,
    ) -> Result<Self, PlatformError> {
        let root_node: Node = root.clone().into();
        let callback: ObserverCallback = Closure::wrap(Box::new(
            move |records: js_sys::Array, _observer: MutationObserver| {
                let batch: Vec<SurfaceMutation> = records
                    .iter()
                    .map(|record| classify_record(&record.unchecked_into(), &root_node))
                    .collect();
                tracing::trace!(
                    target: "smartbar::bridge",
                    records = batch.len(),
                    "mutation batch"
                );
                on_batch(batch);
            },
        ) as Box<dyn FnMut(js_sys::Array, MutationObserver)>);

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| format!("MutationObserver::new failed: {:?}", e))?;

        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_character_data(true);
        options.set_subtree(true);
        observer
            .observe_with_options(root, &options)
            .map_err(|e| format!("observe failed: {:?}", e))?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Drop for SurfaceObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Reduce a mutation record to what render-commit detection needs.
pub fn classify_record(record: &MutationRecord, root: &Node) -> SurfaceMutation {
    match record.type_().as_str() {
        "childList" => SurfaceMutation::ChildList {
            on_root: record.target().is_some_and(|target| &target == root),
            added: record.added_nodes().length() as usize,
            removed: record.removed_nodes().length() as usize,
        },
        "characterData" => SurfaceMutation::CharacterData,
        _ => SurfaceMutation::Attributes,
    }
}
