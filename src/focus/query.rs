use super::{Element, FocusHost, NodeId};

/// True if Tab navigation can land on this element: enabled, and either a
/// form control, a link with an href, or carrying a non-negative tab index.
pub fn is_tabbable(element: &Element) -> bool {
    if element.disabled {
        return false;
    }
    element.tag.is_form_control()
        || element.href.is_some()
        || element.tab_index.is_some_and(|index| index >= 0)
}

/// Tabbable descendants of `root` in document order. `root` itself is not
/// included.
pub fn focusable_within<H>(host: &H, root: NodeId) -> Vec<NodeId>
where
    H: FocusHost + ?Sized,
{
    document_order(host, root)
        .into_iter()
        .skip(1)
        .filter(|&node| host.element(node).is_some_and(is_tabbable))
        .collect()
}

/// `root` followed by all of its descendants, pre-order.
pub(crate) fn document_order<H>(host: &H, root: NodeId) -> Vec<NodeId>
where
    H: FocusHost + ?Sized,
{
    let mut order = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        order.push(node);
        stack.extend(host.children(node).iter().rev().copied());
    }
    order
}

/// True if `node` is `root` or one of its descendants.
pub fn contains<H>(host: &H, root: NodeId, node: NodeId) -> bool
where
    H: FocusHost + ?Sized,
{
    let mut current = Some(node);
    while let Some(id) = current {
        if id == root {
            return true;
        }
        current = host.parent(id);
    }
    false
}
