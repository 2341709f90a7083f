//! Headless surface and timer implementations.
//!
//! `MemorySurface` is an arena-backed tree that behaves like an owner-rendered
//! bar: every `render` replaces all runs with fresh nodes and, like a real DOM
//! re-render, drops a selection that pointed into the replaced nodes. It backs
//! the engine's tests and lets non-browser hosts drive the engine.
//!
//! Node ids are never reused: replaced nodes stay in the arena, detached, so
//! an id held from an earlier render can never alias a new node. Memory grows
//! with the number of rendered runs over the surface's lifetime; long-lived
//! hosts should start a fresh surface (via [`MemorySurface::from_runs`]) when
//! that matters.

use std::time::Duration;

use crate::bridge::SurfaceMutation;
use crate::platform::{
    NativeSelection, NodeKind, PlatformError, RecoveryTimer, Surface, SurfacePosition, TimerToken,
};

/// Handle to a node in a [`MemorySurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One rendered run, as the owner describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run {
    Text(String),
    Decoration {
        text: String,
        logical_discount: usize,
    },
}

impl Run {
    pub fn text(text: impl Into<String>) -> Self {
        Run::Text(text.into())
    }

    pub fn decoration(text: impl Into<String>, logical_discount: usize) -> Self {
        Run::Decoration {
            text: text.into(),
            logical_discount,
        }
    }
}

#[derive(Debug, Clone)]
enum NodeData {
    Text(String),
    Decoration { logical_discount: usize },
    Element,
}

#[derive(Debug, Clone)]
struct Slot {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// In-memory surface. Lengths are counted in chars.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    nodes: Vec<Slot>,
    root: NodeId,
    attached: bool,
    focused: bool,
    selection: Option<NativeSelection<NodeId>>,
    placements: usize,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// Create an empty, attached, focused surface.
    pub fn new() -> Self {
        Self {
            nodes: vec![Slot {
                data: NodeData::Element,
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
            attached: true,
            focused: true,
            selection: None,
            placements: 0,
        }
    }

    pub fn from_runs(runs: &[Run]) -> Self {
        let mut surface = Self::new();
        surface.render(runs);
        surface
    }

    fn alloc(&mut self, data: NodeData, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Slot {
            data,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Replace the surface content with fresh nodes for `runs`.
    ///
    /// The replaced nodes are detached but keep their slots.
    ///
    /// Returns the mutation records an observer would see.
    pub fn render(&mut self, runs: &[Run]) -> Vec<SurfaceMutation> {
        let old = std::mem::take(&mut self.nodes[self.root.0].children);
        for child in &old {
            self.nodes[child.0].parent = None;
        }

        for run in runs {
            match run {
                Run::Text(text) => {
                    self.alloc(NodeData::Text(text.clone()), Some(self.root));
                }
                Run::Decoration {
                    text,
                    logical_discount,
                } => {
                    let wrapper = self.alloc(
                        NodeData::Decoration {
                            logical_discount: *logical_discount,
                        },
                        Some(self.root),
                    );
                    self.alloc(NodeData::Text(text.clone()), Some(wrapper));
                }
            }
        }

        let stale = self
            .selection
            .as_ref()
            .is_some_and(|sel| !self.contains(sel.anchor.node) || !self.contains(sel.focus.node));
        if stale {
            self.selection = Some(NativeSelection {
                anchor: SurfacePosition::new(self.root, 0),
                focus: SurfacePosition::new(self.root, 0),
            });
        }

        vec![SurfaceMutation::ChildList {
            on_root: true,
            added: runs.len(),
            removed: old.len(),
        }]
    }

    /// Change a text node's content in place.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) -> Vec<SurfaceMutation> {
        if let NodeData::Text(ref mut existing) = self.nodes[node.0].data {
            *existing = text.into();
            vec![SurfaceMutation::CharacterData]
        } else {
            Vec::new()
        }
    }

    fn contains(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// The `index`th run node (text node or decoration wrapper).
    pub fn run(&self, index: usize) -> Option<NodeId> {
        self.nodes[self.root.0].children.get(index).copied()
    }

    /// The text node holding the `index`th run's text.
    pub fn run_text(&self, index: usize) -> Option<NodeId> {
        let node = self.run(index)?;
        match self.nodes[node.0].data {
            NodeData::Text(_) => Some(node),
            _ => self.nodes[node.0].children.first().copied(),
        }
    }

    pub fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Put a collapsed caret at `(node, offset)`, as a user click would.
    pub fn set_caret(&mut self, node: NodeId, offset: usize) {
        let pos = SurfacePosition::new(node, offset);
        self.selection = Some(NativeSelection {
            anchor: pos.clone(),
            focus: pos,
        });
    }

    pub fn select(&mut self, anchor: SurfacePosition<NodeId>, focus: SurfacePosition<NodeId>) {
        self.selection = Some(NativeSelection { anchor, focus });
    }

    /// Collapsed caret position, if the selection is collapsed.
    pub fn caret(&self) -> Option<SurfacePosition<NodeId>> {
        self.selection
            .as_ref()
            .filter(|sel| sel.is_collapsed())
            .map(|sel| sel.focus.clone())
    }

    /// How many times the engine has placed the caret.
    pub fn placements(&self) -> usize {
        self.placements
    }

    /// Everything currently rendered, decorations included.
    pub fn visible_text(&self) -> String {
        self.text(&self.root)
    }
}

impl Surface for MemorySurface {
    type Node = NodeId;

    fn root(&self) -> Option<NodeId> {
        self.attached.then_some(self.root)
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes[node.0].children.clone()
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn previous_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let parent = self.nodes[node.0].parent?;
        let siblings = &self.nodes[parent.0].children;
        let index = siblings.iter().position(|id| id == node)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    fn kind(&self, node: &NodeId) -> NodeKind {
        match self.nodes[node.0].data {
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Decoration { logical_discount } => NodeKind::Decoration { logical_discount },
            NodeData::Element => NodeKind::Element,
        }
    }

    fn text(&self, node: &NodeId) -> String {
        match &self.nodes[node.0].data {
            NodeData::Text(text) => text.clone(),
            _ => self.nodes[node.0]
                .children
                .iter()
                .map(|child| self.text(child))
                .collect(),
        }
    }

    fn text_len(&self, node: &NodeId) -> usize {
        self.text(node).chars().count()
    }

    fn is_focused(&self) -> bool {
        self.attached && self.focused
    }

    fn selection(&self) -> Option<NativeSelection<NodeId>> {
        self.selection.clone()
    }

    fn place_caret(&mut self, at: &SurfacePosition<NodeId>) -> Result<(), PlatformError> {
        if !self.contains(at.node) {
            return Err("caret target is not in the surface".into());
        }
        self.set_caret(at.node, at.offset);
        self.placements += 1;
        Ok(())
    }
}

/// Timer that never fires on its own; the host fires tokens explicitly.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    armed: Vec<(TimerToken, Duration)>,
    disarmed: Vec<TimerToken>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently armed timer that is still pending.
    pub fn pending(&self) -> Option<TimerToken> {
        self.armed.last().map(|(token, _)| *token)
    }

    pub fn pending_delay(&self) -> Option<Duration> {
        self.armed.last().map(|(_, delay)| *delay)
    }

    pub fn pending_count(&self) -> usize {
        self.armed.len()
    }

    /// Tokens cancelled so far, in order.
    pub fn disarmed(&self) -> &[TimerToken] {
        &self.disarmed
    }

    /// Take the pending timer as if it elapsed. The caller then hands the
    /// token to the engine.
    pub fn elapse(&mut self) -> Option<TimerToken> {
        self.armed.pop().map(|(token, _)| token)
    }
}

impl RecoveryTimer for ManualTimer {
    fn arm(&mut self, token: TimerToken, delay: Duration) {
        self.armed.push((token, delay));
    }

    fn disarm(&mut self, token: TimerToken) {
        let before = self.armed.len();
        self.armed.retain(|(armed, _)| *armed != token);
        if self.armed.len() != before {
            self.disarmed.push(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_builds_runs() {
        let surface =
            MemorySurface::from_runs(&[Run::text("tomor"), Run::decoration("row", 3)]);
        assert_eq!(surface.visible_text(), "tomorrow");
        let deco = surface.run(1).unwrap();
        assert_eq!(
            surface.kind(&deco),
            NodeKind::Decoration {
                logical_discount: 3
            }
        );
        let inner = surface.run_text(1).unwrap();
        assert_eq!(surface.parent(&inner), Some(deco));
        assert_eq!(surface.previous_sibling(&deco), surface.run(0));
    }

    #[test]
    fn test_rerender_drops_stale_caret() {
        let mut surface = MemorySurface::from_runs(&[Run::text("abc")]);
        let text = surface.run_text(0).unwrap();
        surface.set_caret(text, 2);

        surface.render(&[Run::text("abcd")]);
        let caret = surface.caret().unwrap();
        assert_eq!(caret.node, surface.root_id());
        assert_eq!(caret.offset, 0);
    }

    #[test]
    fn test_place_caret_rejects_detached_node() {
        let mut surface = MemorySurface::from_runs(&[Run::text("abc")]);
        let old = surface.run_text(0).unwrap();
        surface.render(&[Run::text("abc")]);
        assert!(surface.place_caret(&SurfacePosition::new(old, 1)).is_err());
        assert_eq!(surface.placements(), 0);
    }

    #[test]
    fn test_rerender_never_reuses_ids() {
        let mut surface = MemorySurface::from_runs(&[Run::text("a")]);
        let first = surface.run_text(0).unwrap();
        for text in ["ab", "abc"] {
            surface.render(&[Run::text(text)]);
        }
        let current = surface.run_text(0).unwrap();
        assert_ne!(current, first);
        assert_eq!(surface.parent(&first), None);
        assert_eq!(surface.parent(&current), Some(surface.root_id()));
    }

    #[test]
    fn test_manual_timer_disarm() {
        let mut timer = ManualTimer::new();
        timer.arm(TimerToken(1), Duration::from_millis(50));
        timer.disarm(TimerToken(1));
        timer.disarm(TimerToken(7));
        assert_eq!(timer.pending(), None);
        assert_eq!(timer.disarmed(), &[TimerToken(1)]);
    }
}
