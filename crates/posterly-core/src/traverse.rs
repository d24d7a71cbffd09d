//! Generic depth-first traversal over a [`PosterDocument`].

use crate::document::{Node, NodeId, PosterDocument};

/// What to do after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Descend into the node's children.
    Continue,
    /// Do not descend into this node's children.
    SkipChildren,
    /// Stop the whole traversal.
    Stop,
}

/// Visit `starts` and their descendants in document order (pre-order).
///
/// Returns false if the visitor stopped the traversal early.
pub fn walk<F>(doc: &PosterDocument, starts: &[NodeId], mut visit: F) -> bool
where
    F: FnMut(&Node) -> Visit,
{
    let mut stack: Vec<NodeId> = starts.iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        let Some(node) = doc.get(id) else {
            continue;
        };
        match visit(node) {
            Visit::Continue => stack.extend(node.children.iter().rev().copied()),
            Visit::SkipChildren => {}
            Visit::Stop => return false,
        }
    }
    true
}

/// IDs of every element in the subtrees rooted at `starts`, in document order.
pub fn elements(doc: &PosterDocument, starts: &[NodeId]) -> Vec<NodeId> {
    let mut out = Vec::new();
    walk(doc, starts, |node| {
        if node.is_element() {
            out.push(node.id);
        }
        Visit::Continue
    });
    out
}
