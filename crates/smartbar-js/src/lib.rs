//! WASM bindings for the smartbar caret synchronization engine.
//!
//! Exposes a `SmartBar` class to JavaScript. The owning app renders the bar,
//! receives edit intents through a callback, and answers each one with
//! `setTargetCaret`.

mod bar;
mod types;

pub use bar::*;
pub use types::*;

use tracing_subscriber::layer::SubscriberExt;
use tracing_wasm::{WASMLayer, WASMLayerConfigBuilder};
use wasm_bindgen::prelude::*;

/// Install the panic hook and route tracing output to the console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let layer = WASMLayer::new(WASMLayerConfigBuilder::new().set_max_level(level).build());
    let subscriber = tracing_subscriber::Registry::default().with(layer);
    // Another module in the page may already own the global subscriber.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
