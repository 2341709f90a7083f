//! smartbar-core: caret synchronization for owner-rendered smart bars.
//!
//! The owner of a single-line input renders its content (text plus inline
//! decorations such as ghost completions) and is the only writer of the
//! logical text. This crate keeps the native caret consistent with that
//! owner across asynchronous re-renders.
//!
//! This crate provides:
//! - `Surface` and `RecoveryTimer` traits for the hosting platform
//! - `mapper` - logical offset ↔ surface position conversion
//! - `normalizer` - native notifications to `EditIntent`s
//! - `CaretSync<S, T>` - the single-flight edit cycle, composition
//!   buffering, navigation tracking, and render-commit detection
//! - `MemorySurface` / `ManualTimer` - headless implementations

pub mod bridge;
pub mod composition;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod machine;
pub mod mapper;
pub mod memory;
pub mod normalizer;
pub mod platform;
pub mod tracker;
pub mod types;

pub use bridge::{RenderCommitBridge, SurfaceMutation};
pub use composition::CompositionBuffer;
pub use config::{DEFAULT_RECOVERY_DELAY, SyncConfig};
pub use engine::{CaretSync, KeydownResult, place_caret};
pub use error::{MappingError, PlacementError};
pub use input::{InputType, RawEdit};
pub use machine::{CaretMachine, MachineState};
pub use memory::{ManualTimer, MemorySurface, NodeId, Run};
pub use normalizer::{BeforeInputResult, Classification, classify, normalize};
pub use platform::{
    NativeSelection, NodeKind, PlatformError, RecoveryTimer, Surface, SurfacePosition, TimerToken,
};
pub use smol_str::SmolStr;
pub use tracker::{NavigationTracker, NavigationTrigger};
pub use types::{
    DeleteScope, EditIntent, EditKind, LogicalOffset, OwnerMessage, SelectionRange, SpecialKey,
};
