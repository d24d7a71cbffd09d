//! HTML parsing into a [`PosterDocument`] and serialization back to markup.

use crate::document::{ElementData, NodeId, NodeKind, PosterDocument};
use crate::selection::{self, NODE_ATTRIBUTE, SELECTED_ATTRIBUTE};
use scraper::{ElementRef, Html, Node as HtmlNode};

/// Elements whose text children are written without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript",
];

/// Attributes the editor adds when rendering; never imported.
const RESERVED_ATTRIBUTES: &[&str] = &[SELECTED_ATTRIBUTE, NODE_ATTRIBUTE];

/// Parse an HTML string permissively.
///
/// The input is parsed as a full document and the element children of its
/// `<body>` become the top-level nodes. Anything outside the body (`<head>`,
/// stray top-level text) is dropped.
pub fn parse(html: &str) -> PosterDocument {
    let parsed = Html::parse_document(html);
    let mut doc = PosterDocument::new();

    let Some(body) = parsed
        .root_element()
        .children()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "body")
    else {
        return doc;
    };

    let mut stack: Vec<(ElementRef<'_>, NodeId)> = Vec::new();
    for child in body.children().filter_map(ElementRef::wrap) {
        if let Some(id) = doc.append(None, NodeKind::Element(convert_element(child))) {
            stack.push((child, id));
        }
    }

    while let Some((source, parent)) = stack.pop() {
        for child in source.children() {
            match child.value() {
                HtmlNode::Element(_) => {
                    let Some(child) = ElementRef::wrap(child) else {
                        continue;
                    };
                    if let Some(id) = doc.append(Some(parent), NodeKind::Element(convert_element(child))) {
                        stack.push((child, id));
                    }
                }
                HtmlNode::Text(text) => {
                    doc.append(Some(parent), NodeKind::Text(text.to_string()));
                }
                HtmlNode::Comment(comment) => {
                    doc.append(Some(parent), NodeKind::Comment(comment.to_string()));
                }
                _ => {}
            }
        }
    }

    doc
}

fn convert_element(element: ElementRef<'_>) -> ElementData {
    let value = element.value();
    ElementData::from_attributes(
        value.name(),
        value
            .attrs()
            .filter(|(name, _)| !RESERVED_ATTRIBUTES.contains(name)),
    )
}

/// Options for [`serialize`].
#[derive(Debug, Clone, Copy)]
pub struct SerializeOptions<'a> {
    /// Element to render with the selection marker and outline.
    pub selected: Option<NodeId>,
    /// Emit `data-node` IDs so a host can map rendered elements back.
    pub node_ids: bool,
    pub outline_color: &'a str,
}

impl Default for SerializeOptions<'_> {
    fn default() -> Self {
        Self {
            selected: None,
            node_ids: false,
            outline_color: selection::OUTLINE_COLOR,
        }
    }
}

enum Step {
    Open(NodeId),
    Close(NodeId),
}

/// Serialize the document's top-level nodes back to markup.
pub fn serialize(doc: &PosterDocument, options: &SerializeOptions<'_>) -> String {
    let mut out = String::new();
    let mut stack: Vec<Step> = doc.roots().iter().rev().map(|&id| Step::Open(id)).collect();

    while let Some(step) = stack.pop() {
        match step {
            Step::Open(id) => {
                let Some(node) = doc.get(id) else {
                    continue;
                };
                match &node.kind {
                    NodeKind::Element(element) => {
                        write_open_tag(&mut out, id, element, options);
                        if element.is_void() {
                            continue;
                        }
                        stack.push(Step::Close(id));
                        stack.extend(node.children.iter().rev().map(|&child| Step::Open(child)));
                    }
                    NodeKind::Text(text) => {
                        let raw = node
                            .parent
                            .and_then(|p| doc.element(p))
                            .is_some_and(|p| RAW_TEXT_ELEMENTS.contains(&p.tag.as_str()));
                        if raw {
                            out.push_str(text);
                        } else {
                            escape_text(&mut out, text);
                        }
                    }
                    NodeKind::Comment(comment) => {
                        out.push_str("<!--");
                        out.push_str(comment);
                        out.push_str("-->");
                    }
                }
            }
            Step::Close(id) => {
                if let Some(element) = doc.element(id) {
                    out.push_str("</");
                    out.push_str(&element.tag);
                    out.push('>');
                }
            }
        }
    }
    out
}

fn write_open_tag(out: &mut String, id: NodeId, element: &ElementData, options: &SerializeOptions<'_>) {
    let selected = options.selected == Some(id);
    let style = if selected {
        selection::with_outline(&element.style, options.outline_color)
    } else {
        element.style.clone()
    };

    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in element.attributes_with_style(&style) {
        write_attribute(out, name, &value);
    }
    if selected {
        write_attribute(out, SELECTED_ATTRIBUTE, "true");
    }
    if options.node_ids {
        write_attribute(out, NODE_ATTRIBUTE, &id.to_string());
    }
    out.push('>');
}

fn write_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}
