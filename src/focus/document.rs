//! InMemoryDocument - Arena-backed element tree for testing and headless use.

use super::{Element, FocusHost, NodeId, Tag};

struct Node {
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A minimal document: a body, elements appended under it, one focused
/// element, and a scroll lock depth.
///
/// Removed nodes stay in the arena (ids are never reused) but are detached.
pub struct InMemoryDocument {
    nodes: Vec<Node>,
    active: Option<NodeId>,
    scroll_locks: usize,
}

impl Default for InMemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocument {
    pub fn new() -> Self {
        InMemoryDocument {
            nodes: vec![Node {
                element: Element::new(Tag::Body),
                parent: None,
                children: Vec::new(),
            }],
            active: None,
            scroll_locks: 0,
        }
    }

    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    /// Create a detached element.
    pub fn create_element(&mut self, element: Element) -> NodeId {
        self.nodes.push(Node {
            element,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Move `child` under `parent`, after its existing children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent.0 >= self.nodes.len() || child.0 >= self.nodes.len() || parent == child {
            return;
        }
        // An ancestor cannot move under its own descendant.
        if super::contains(&*self, child, parent) {
            return;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Create an element and append it under `parent`.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let node = self.create_element(element);
        self.append_child(parent, node);
        node
    }

    /// Detach a subtree. Focus inside it is lost, as in a browser.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.body() {
            return;
        }
        if let Some(active) = self.active {
            if active == node || super::contains(&*self, node, active) {
                self.active = None;
            }
        }
        self.detach(node);
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes.get_mut(node.0).and_then(|n| n.parent.take()) {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(node.0).map(|n| &mut n.element)
    }

    pub fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        if let Some(element) = self.element_mut(node) {
            element.disabled = disabled;
        }
    }

    pub fn set_tab_index(&mut self, node: NodeId, tab_index: Option<i32>) {
        if let Some(element) = self.element_mut(node) {
            element.tab_index = tab_index;
        }
    }

    pub fn blur(&mut self) {
        self.active = None;
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locks > 0
    }

    pub fn scroll_lock_depth(&self) -> usize {
        self.scroll_locks
    }
}

impl FocusHost for InMemoryDocument {
    fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0).map(|n| &n.element)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    fn is_connected(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.body() {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    /// Any connected, enabled element that is a form control, a link, or
    /// has a tab index (even negative) can take programmatic focus.
    fn focus(&mut self, node: NodeId) -> bool {
        if !self.is_connected(node) {
            return false;
        }
        let focusable = match self.element(node) {
            Some(el) => {
                !el.disabled
                    && (el.tag.is_form_control() || el.href.is_some() || el.tab_index.is_some())
            }
            None => false,
        };
        if focusable {
            self.active = Some(node);
        }
        focusable
    }

    fn lock_scroll(&mut self) {
        self.scroll_locks += 1;
    }

    fn unlock_scroll(&mut self) {
        self.scroll_locks = self.scroll_locks.saturating_sub(1);
    }
}
