//! Element tree holding the canvas contents.

use crate::style::InlineStyle;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a node in a [`PosterDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier previously produced by `to_string`.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(Self)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Tag names that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

/// An element: tag name, attributes and parsed inline style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementData {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes other than `style`, in source order.
    attributes: Vec<(String, String)>,
    /// Position of the `style` attribute among `attributes`, if it came from markup.
    style_slot: Option<usize>,
    /// Parsed `style` attribute.
    pub style: InlineStyle,
}

impl ElementData {
    /// Create an element with no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: Vec::new(),
            style_slot: None,
            style: InlineStyle::new(),
        }
    }

    /// Create an element from raw markup attributes. A `style` attribute is
    /// parsed into [`ElementData::style`].
    pub fn from_attributes<'a>(
        tag: &str,
        attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut element = Self::new(tag);
        for (name, value) in attributes {
            element.set_attribute(name, value);
        }
        element
    }

    /// Builder-style inline style.
    pub fn with_style(mut self, style: InlineStyle) -> Self {
        self.style = style;
        self
    }

    /// Builder-style attribute.
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Get an attribute value. `style` is not an attribute here, see [`ElementData::style`].
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute. Setting `style` replaces the inline style.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if name == "style" {
            if self.style_slot.is_none() {
                self.style_slot = Some(self.attributes.len());
            }
            self.style = InlineStyle::parse(value);
            return;
        }
        if let Some(slot) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value.to_string();
        } else {
            self.attributes.push((name, value.to_string()));
        }
    }

    /// Remove an attribute. Returns the old value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let pos = self
            .attributes
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        if let Some(slot) = self.style_slot.as_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(self.attributes.remove(pos).1)
    }

    /// Attributes in serialization order, with `style` rendered at its original position.
    pub fn attributes_with_style(&self, style: &InlineStyle) -> Vec<(&str, String)> {
        let mut out: Vec<(&str, String)> = self
            .attributes
            .iter()
            .map(|(n, v)| (n.as_str(), v.clone()))
            .collect();
        if !style.is_empty() {
            let slot = self.style_slot.unwrap_or(out.len()).min(out.len());
            out.insert(slot, ("style", style.to_css()));
        }
        out
    }

    /// Whether this element can never have children.
    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }

    /// Whether this is an `<img>`.
    pub fn is_image(&self) -> bool {
        self.tag == "img"
    }
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
    Comment(String),
}

/// A node in the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub kind: NodeKind,
}

impl Node {
    /// The element data, if this node is an element.
    pub fn element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }
}

/// The canvas contents: a forest of nodes under an implicit canvas root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PosterDocument {
    nodes: HashMap<NodeId, Node>,
    /// Top-level nodes, in document order.
    roots: Vec<NodeId>,
}

impl PosterDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes of any kind.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Remove every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }

    /// Top-level nodes.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Get element data by ID.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.nodes.get(&id).and_then(Node::element)
    }

    /// Get mutable element data by ID.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(&id)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Children of a node, or the top-level nodes for `None`.
    pub fn children(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            Some(id) => self.nodes.get(&id).map(|n| n.children.as_slice()).unwrap_or(&[]),
            None => &self.roots,
        }
    }

    /// Element children of a node, or the top-level elements for `None`.
    pub fn element_children(&self, parent: Option<NodeId>) -> Vec<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|&id| self.element(id).is_some())
            .collect()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Append a node as the last child of `parent` (or the canvas for `None`).
    ///
    /// Returns `None` if the parent does not exist or is not an element.
    pub fn append(&mut self, parent: Option<NodeId>, kind: NodeKind) -> Option<NodeId> {
        if let Some(parent_id) = parent {
            self.element(parent_id)?;
        }
        let id = NodeId::new();
        self.nodes.insert(
            id,
            Node {
                id,
                parent,
                children: Vec::new(),
                kind,
            },
        );
        self.child_list_mut(parent)?.push(id);
        Some(id)
    }

    /// Remove a node and its whole subtree. Returns false if it did not exist.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        let parent = node.parent;
        if let Some(siblings) = self.child_list_mut(parent) {
            siblings.retain(|&child| child != id);
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
            }
        }
        true
    }

    /// Deep-copy a subtree with fresh IDs and append the copy to `parent`.
    ///
    /// Returns the ID of the copy's root.
    pub fn append_copy(&mut self, source: NodeId, parent: Option<NodeId>) -> Option<NodeId> {
        let root_kind = self.nodes.get(&source)?.kind.clone();
        let copy_root = self.append(parent, root_kind)?;

        let mut stack = vec![(source, copy_root)];
        while let Some((from, to)) = stack.pop() {
            let children = self.children(Some(from)).to_vec();
            for child in children {
                let Some(kind) = self.nodes.get(&child).map(|n| n.kind.clone()) else {
                    continue;
                };
                if let Some(copied) = self.append(Some(to), kind) {
                    stack.push((child, copied));
                }
            }
        }
        Some(copy_root)
    }

    /// Concatenated text of a node and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        crate::traverse::walk(self, &[id], |node| {
            if let NodeKind::Text(t) = &node.kind {
                text.push_str(t);
            }
            crate::traverse::Visit::Continue
        });
        text
    }

    /// Replace all children of an element with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> bool {
        if self.element(id).is_none() {
            return false;
        }
        for child in self.children(Some(id)).to_vec() {
            self.remove(child);
        }
        if !text.is_empty() {
            self.append(Some(id), NodeKind::Text(text.to_string()));
        }
        true
    }

    fn child_list_mut(&mut self, parent: Option<NodeId>) -> Option<&mut Vec<NodeId>> {
        match parent {
            Some(id) => self.nodes.get_mut(&id).map(|n| &mut n.children),
            None => Some(&mut self.roots),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str) -> NodeKind {
        NodeKind::Element(ElementData::new(tag))
    }

    #[test]
    fn test_document_creation() {
        let doc = PosterDocument::new();
        assert!(doc.is_empty());
        assert!(doc.roots().is_empty());
    }

    #[test]
    fn test_append_and_parent() {
        let mut doc = PosterDocument::new();
        let div = doc.append(None, element("div")).unwrap();
        let span = doc.append(Some(div), element("span")).unwrap();

        assert_eq!(doc.roots(), &[div]);
        assert_eq!(doc.children(Some(div)), &[span]);
        assert_eq!(doc.parent(span), Some(div));
        assert!(doc.is_ancestor_or_self(div, span));
        assert!(!doc.is_ancestor_or_self(span, div));
    }

    #[test]
    fn test_append_to_text_fails() {
        let mut doc = PosterDocument::new();
        let text = doc.append(None, NodeKind::Text("hi".into())).unwrap();
        assert!(doc.append(Some(text), element("b")).is_none());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_remove_subtree() {
        let mut doc = PosterDocument::new();
        let div = doc.append(None, element("div")).unwrap();
        let p = doc.append(Some(div), element("p")).unwrap();
        doc.append(Some(p), NodeKind::Text("x".into())).unwrap();

        assert!(doc.remove(div));
        assert!(doc.is_empty());
        assert!(doc.roots().is_empty());
        assert!(!doc.remove(div));
    }

    #[test]
    fn test_append_copy_uses_fresh_ids() {
        let mut doc = PosterDocument::new();
        let div = doc.append(None, element("div")).unwrap();
        let p = doc.append(Some(div), element("p")).unwrap();
        doc.append(Some(p), NodeKind::Text("hello".into())).unwrap();

        let copy = doc.append_copy(div, None).unwrap();
        assert_ne!(copy, div);
        assert_eq!(doc.roots(), &[div, copy]);
        assert_eq!(doc.len(), 6);
        assert_eq!(doc.text_content(copy), "hello");
        let copied_p = doc.children(Some(copy))[0];
        assert_ne!(copied_p, p);
        assert_eq!(doc.parent(copied_p), Some(copy));
    }

    #[test]
    fn test_text_content() {
        let mut doc = PosterDocument::new();
        let p = doc.append(None, element("p")).unwrap();
        doc.append(Some(p), NodeKind::Text("Hello, ".into()));
        let b = doc.append(Some(p), element("b")).unwrap();
        doc.append(Some(b), NodeKind::Text("world".into()));

        assert_eq!(doc.text_content(p), "Hello, world");
        assert!(doc.set_text_content(p, "Bye"));
        assert_eq!(doc.text_content(p), "Bye");
        assert!(!doc.contains(b));
    }

    #[test]
    fn test_style_attribute_is_parsed() {
        let el = ElementData::from_attributes(
            "DIV",
            [("id", "a"), ("style", "width: 5px"), ("class", "c")],
        );
        assert_eq!(el.tag, "div");
        assert_eq!(el.attribute("style"), None);
        assert_eq!(el.style.length(&crate::style::StyleProperty::Width), Some(5.0));
        let attrs = el.attributes_with_style(&el.style);
        let names: Vec<&str> = attrs.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["id", "style", "class"]);
    }

    #[test]
    fn test_node_id_round_trip() {
        let id = NodeId::new();
        assert_eq!(NodeId::parse(&id.to_string()), Some(id));
        assert_eq!(NodeId::parse("nope"), None);
    }
}
