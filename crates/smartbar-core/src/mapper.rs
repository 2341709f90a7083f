//! Conversion between logical offsets and concrete surface positions.
//!
//! The surface root holds a flat sequence of runs: bare text nodes and
//! decoration wrappers around a text node. A run contributes its rendered
//! length minus its logical discount to the logical text.

use crate::error::MappingError;
use crate::platform::{NativeSelection, NodeKind, Surface, SurfacePosition};
use crate::types::{LogicalOffset, SelectionRange};

/// Logical length contributed by one run.
pub fn logical_len<S: Surface>(surface: &S, node: &S::Node) -> usize {
    let len = surface.text_len(node);
    match surface.kind(node) {
        NodeKind::Decoration { logical_discount } => len.saturating_sub(logical_discount),
        _ => len,
    }
}

/// Logical length of everything rendered in the surface.
pub fn total_logical_len<S: Surface>(surface: &S) -> Result<usize, MappingError> {
    let root = surface.root().ok_or(MappingError::Detached)?;
    Ok(surface
        .children(&root)
        .iter()
        .map(|child| logical_len(surface, child))
        .sum())
}

/// First text node at or below `node`, depth first.
pub fn first_text_node<S: Surface>(surface: &S, node: &S::Node) -> Option<S::Node> {
    if surface.kind(node) == NodeKind::Text {
        return Some(node.clone());
    }
    let mut stack = surface.children(node);
    stack.reverse();
    while let Some(current) = stack.pop() {
        if surface.kind(&current) == NodeKind::Text {
            return Some(current);
        }
        let mut children = surface.children(&current);
        children.reverse();
        stack.extend(children);
    }
    None
}

/// Map a logical offset to a position inside the rendered surface.
///
/// The offset is clamped to the surface's logical length. An empty surface
/// maps to the start of the root.
pub fn to_position<S: Surface>(
    surface: &S,
    offset: LogicalOffset,
) -> Result<SurfacePosition<S::Node>, MappingError> {
    let root = surface.root().ok_or(MappingError::Detached)?;
    let runs = surface.children(&root);
    if runs.is_empty() {
        return Ok(SurfacePosition::new(root, 0));
    }

    let total: usize = runs.iter().map(|run| logical_len(surface, run)).sum();
    let mut remaining = offset.min(total);

    for (index, run) in runs.iter().enumerate() {
        let len = logical_len(surface, run);
        if remaining <= len {
            let text = first_text_node(surface, run).ok_or(MappingError::NoTextNode(index))?;
            tracing::trace!(
                target: "smartbar::mapper",
                offset,
                run = index,
                in_node = remaining,
                "mapped logical offset to surface position"
            );
            return Ok(SurfacePosition::new(text, remaining));
        }
        remaining -= len;
    }

    Err(MappingError::NoRunMatched { offset, total })
}

/// Map a surface position back to a logical offset.
///
/// Handles a text node directly under the root, a text node inside a
/// decoration wrapper, an element run itself, and the root (where `offset`
/// counts children).
pub fn to_logical_offset<S: Surface>(
    surface: &S,
    node: &S::Node,
    offset: usize,
) -> Result<LogicalOffset, MappingError> {
    let root = surface.root().ok_or(MappingError::Detached)?;

    if *node == root {
        return Ok(surface
            .children(&root)
            .iter()
            .take(offset)
            .map(|child| logical_len(surface, child))
            .sum());
    }

    // Climb to the run that holds the node.
    let mut run = node.clone();
    loop {
        match surface.parent(&run) {
            Some(parent) if parent == root => break,
            Some(parent) => run = parent,
            None => return Err(MappingError::OutsideSurface),
        }
    }

    let mut within = match surface.kind(node) {
        NodeKind::Text => offset,
        _ => 0,
    };
    if let NodeKind::Decoration { .. } = surface.kind(&run) {
        within = within.min(logical_len(surface, &run));
    }

    let mut before = 0;
    let mut current = surface.previous_sibling(&run);
    while let Some(sibling) = current {
        before += logical_len(surface, &sibling);
        current = surface.previous_sibling(&sibling);
    }

    Ok(before + within)
}

/// Map both ends of a native selection and order them.
pub fn selection_to_range<S: Surface>(
    surface: &S,
    selection: &NativeSelection<S::Node>,
) -> Result<SelectionRange, MappingError> {
    let anchor = to_logical_offset(surface, &selection.anchor.node, selection.anchor.offset)?;
    if selection.is_collapsed() {
        return Ok(SelectionRange::caret(anchor));
    }
    let focus = to_logical_offset(surface, &selection.focus.node, selection.focus.offset)?;
    Ok(SelectionRange::new(anchor, focus))
}
