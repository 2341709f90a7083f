//! Render-commit detection.
//!
//! The owner re-renders asynchronously. Mutation records from the surface tell
//! us when that render has landed, so the caret can be placed into the new
//! nodes rather than the replaced ones.

use crate::machine::MachineState;

/// A mutation record, reduced to what commit detection needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceMutation {
    /// Children added to or removed from a node.
    ChildList {
        /// Whether the mutated node is the surface root itself.
        on_root: bool,
        added: usize,
        removed: usize,
    },
    /// A text node's content changed.
    CharacterData,
    Attributes,
}

impl SurfaceMutation {
    /// Whether this record shows the owner's render landing: runs added to
    /// the root, or text changed anywhere in the surface.
    pub fn is_relevant(&self) -> bool {
        match self {
            Self::ChildList { on_root, added, .. } => *on_root && *added > 0,
            Self::CharacterData => true,
            Self::Attributes => false,
        }
    }
}

/// Watches mutation batches for the owner's render commit.
#[derive(Debug, Clone, Default)]
pub struct RenderCommitBridge {
    commits: u64,
    ignored: u64,
}

impl RenderCommitBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `mutations` completes the cycle in `state`.
    ///
    /// Relevant batches outside `AwaitingCommit` are counted and ignored:
    /// the owner may re-render for its own reasons.
    pub fn observe(&mut self, mutations: &[SurfaceMutation], state: MachineState) -> bool {
        if !mutations.iter().any(SurfaceMutation::is_relevant) {
            return false;
        }
        match state {
            MachineState::AwaitingCommit { target } => {
                self.commits += 1;
                tracing::trace!(
                    target: "smartbar::bridge",
                    caret = target,
                    records = mutations.len(),
                    "render commit observed"
                );
                true
            }
            other => {
                self.ignored += 1;
                tracing::trace!(
                    target: "smartbar::bridge",
                    state = other.as_str(),
                    "render outside an edit cycle"
                );
                false
            }
        }
    }

    pub fn commits(&self) -> u64 {
        self.commits
    }

    pub fn ignored(&self) -> u64 {
        self.ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AWAITING: MachineState = MachineState::AwaitingCommit { target: 3 };

    #[test]
    fn test_relevance() {
        let added = SurfaceMutation::ChildList {
            on_root: true,
            added: 2,
            removed: 2,
        };
        let removal_only = SurfaceMutation::ChildList {
            on_root: true,
            added: 0,
            removed: 1,
        };
        let nested = SurfaceMutation::ChildList {
            on_root: false,
            added: 1,
            removed: 0,
        };
        assert!(added.is_relevant());
        assert!(!removal_only.is_relevant());
        assert!(!nested.is_relevant());
        assert!(SurfaceMutation::CharacterData.is_relevant());
        assert!(!SurfaceMutation::Attributes.is_relevant());
    }

    #[test]
    fn test_commit_only_while_awaiting() {
        let mut bridge = RenderCommitBridge::new();
        let batch = [SurfaceMutation::CharacterData];

        assert!(!bridge.observe(&batch, MachineState::Idle));
        assert!(!bridge.observe(&batch, MachineState::AwaitingOwner));
        assert!(bridge.observe(&batch, AWAITING));
        assert_eq!(bridge.commits(), 1);
        assert_eq!(bridge.ignored(), 2);
    }

    #[test]
    fn test_irrelevant_batch_does_not_commit() {
        let mut bridge = RenderCommitBridge::new();
        assert!(!bridge.observe(&[SurfaceMutation::Attributes], AWAITING));
        assert!(!bridge.observe(&[], AWAITING));
        assert_eq!(bridge.commits(), 0);
    }
}
