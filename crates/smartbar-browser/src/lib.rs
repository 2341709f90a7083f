//! Browser DOM layer for the smartbar engine.
//!
//! This crate hosts `smartbar-core` on a contenteditable element. It assumes
//! a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `dom`: `DomSurface`, the engine's view of the rendered bar
//! - `events`: beforeinput parsing and raw edit extraction
//! - `observer`: MutationObserver bridge for render commits
//! - `timer`: recovery timers on `setTimeout`
//! - `controller`: `BrowserSmartBar`, wiring listeners to the engine
//!
//! # Re-exports
//!
//! This crate re-exports `smartbar-core` for convenience, so consumers
//! only need to depend on `smartbar-browser`.

// Re-export core crate
pub use smartbar_core;
pub use smartbar_core::*;

pub mod controller;
pub mod dom;
pub mod events;
pub mod observer;
pub mod timer;

pub use controller::{BrowserConfig, BrowserSmartBar};
pub use dom::DomSurface;
pub use events::{parse_browser_input_type, raw_edit_from_event};
pub use observer::SurfaceObserver;
pub use timer::BrowserTimer;
