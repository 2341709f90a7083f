//! The rendered bar as seen through the DOM.
//!
//! Offsets inside text nodes are UTF-16 code units, matching the Selection
//! API, so logical offsets handed to the owner are UTF-16 as well.

use smartbar_core::{NativeSelection, NodeKind, PlatformError, Surface, SurfacePosition};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, Node};

/// [`Surface`] implementation over the owner-rendered bar element.
pub struct DomSurface {
    surface_id: String,
    decoration_attribute: String,
    root: Option<Element>,
}

impl DomSurface {
    pub fn new(surface_id: impl Into<String>, decoration_attribute: impl Into<String>) -> Self {
        Self {
            surface_id: surface_id.into(),
            decoration_attribute: decoration_attribute.into(),
            root: None,
        }
    }

    pub fn surface_id(&self) -> &str {
        &self.surface_id
    }

    /// Change the element id looked up by the next [`attach`](Self::attach).
    pub fn set_surface_id(&mut self, surface_id: impl Into<String>) {
        self.surface_id = surface_id.into();
    }

    /// Look the surface element up by id. Returns false if it is not
    /// rendered yet.
    pub fn attach(&mut self) -> bool {
        let element = gloo_utils::document().get_element_by_id(&self.surface_id);
        let found = element.is_some();
        self.root = element;
        found
    }

    /// Attach to a specific element, bypassing the id lookup.
    pub fn attach_to(&mut self, element: Element) {
        self.root = Some(element);
    }

    pub fn detach(&mut self) {
        self.root = None;
    }

    pub fn element(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    pub fn focus(&self) -> Result<(), PlatformError> {
        let element = self
            .root
            .as_ref()
            .ok_or("surface is not attached")?
            .dyn_ref::<HtmlElement>()
            .ok_or("surface is not an HtmlElement")?;
        element
            .focus()
            .map_err(|e| format!("focus failed: {:?}", e))?;
        Ok(())
    }

    fn logical_discount(&self, element: &Element) -> Option<usize> {
        let raw = element.get_attribute(&self.decoration_attribute)?;
        match raw.trim().parse() {
            Ok(discount) => Some(discount),
            Err(_) => {
                tracing::debug!(
                    target: "smartbar::dom",
                    attribute = %self.decoration_attribute,
                    value = %raw,
                    "unparseable decoration discount, treating as zero"
                );
                Some(0)
            }
        }
    }
}

impl Surface for DomSurface {
    type Node = Node;

    fn root(&self) -> Option<Node> {
        self.root
            .as_ref()
            .filter(|element| element.is_connected())
            .map(|element| element.clone().into())
    }

    fn children(&self, node: &Node) -> Vec<Node> {
        let list = node.child_nodes();
        (0..list.length()).filter_map(|i| list.get(i)).collect()
    }

    fn parent(&self, node: &Node) -> Option<Node> {
        node.parent_node()
    }

    fn previous_sibling(&self, node: &Node) -> Option<Node> {
        node.previous_sibling()
    }

    fn kind(&self, node: &Node) -> NodeKind {
        match node.node_type() {
            Node::TEXT_NODE => NodeKind::Text,
            Node::ELEMENT_NODE => node
                .dyn_ref::<Element>()
                .and_then(|element| self.logical_discount(element))
                .map_or(NodeKind::Element, |logical_discount| NodeKind::Decoration {
                    logical_discount,
                }),
            _ => NodeKind::Element,
        }
    }

    fn text(&self, node: &Node) -> String {
        node.text_content().unwrap_or_default()
    }

    fn text_len(&self, node: &Node) -> usize {
        self.text(node).encode_utf16().count()
    }

    fn is_focused(&self) -> bool {
        let Some(root) = self.root.as_ref() else {
            return false;
        };
        gloo_utils::document().active_element().is_some_and(|active| {
            let active: Node = active.into();
            root.contains(Some(&active))
        })
    }

    fn selection(&self) -> Option<NativeSelection<Node>> {
        let selection = gloo_utils::window().get_selection().ok()??;
        if selection.range_count() == 0 {
            return None;
        }
        let anchor = SurfacePosition::new(
            selection.anchor_node()?,
            selection.anchor_offset() as usize,
        );
        let focus =
            SurfacePosition::new(selection.focus_node()?, selection.focus_offset() as usize);
        Some(NativeSelection { anchor, focus })
    }

    fn place_caret(&mut self, at: &SurfacePosition<Node>) -> Result<(), PlatformError> {
        tracing::trace!(
            target: "smartbar::dom",
            node = ?at.node.node_name(),
            offset = at.offset,
            "placing caret"
        );

        let window = gloo_utils::window();
        let document = gloo_utils::document();
        let selection = window
            .get_selection()
            .map_err(|e| format!("get_selection failed: {:?}", e))?
            .ok_or("no selection object")?;
        let range = document
            .create_range()
            .map_err(|e| format!("create_range failed: {:?}", e))?;

        range
            .set_start(&at.node, at.offset as u32)
            .map_err(|e| format!("set_start failed: {:?}", e))?;
        range.collapse_with_to_start(true);

        selection
            .remove_all_ranges()
            .map_err(|e| format!("remove_all_ranges failed: {:?}", e))?;
        selection
            .add_range(&range)
            .map_err(|e| format!("add_range failed: {:?}", e))?;

        Ok(())
    }
}
