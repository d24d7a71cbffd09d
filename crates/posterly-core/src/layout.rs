//! Element geometry.
//!
//! Layout belongs to the host (the browser in production). The engine only
//! asks a [`LayoutProvider`] where an element is, in canvas coordinates.

use crate::document::{NodeId, PosterDocument};
use crate::style::StyleProperty;
use kurbo::{Point, Rect, Size, Vec2};

/// Answers where elements are on the canvas.
pub trait LayoutProvider {
    /// Bounding box of an element, in canvas coordinates.
    fn bounds(&self, doc: &PosterDocument, id: NodeId) -> Option<Rect>;

    /// Origin that the element's `left`/`top` are measured from.
    ///
    /// Defaults to the parent element's top-left, or the canvas origin for
    /// top-level elements.
    fn containing_origin(&self, doc: &PosterDocument, id: NodeId) -> Point {
        doc.parent(id)
            .and_then(|parent| self.bounds(doc, parent))
            .map(|rect| rect.origin())
            .unwrap_or(Point::ZERO)
    }
}

/// Geometry taken straight from inline `left`/`top`/`width`/`height`.
///
/// Each element sits at its parent's origin plus its own `left`/`top`;
/// missing values read as zero. Used headless and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineLayout;

impl InlineLayout {
    fn offset(doc: &PosterDocument, id: NodeId) -> Vec2 {
        doc.element(id).map_or(Vec2::ZERO, |element| {
            Vec2::new(
                element.style.length(&StyleProperty::Left).unwrap_or(0.0),
                element.style.length(&StyleProperty::Top).unwrap_or(0.0),
            )
        })
    }
}

impl LayoutProvider for InlineLayout {
    fn bounds(&self, doc: &PosterDocument, id: NodeId) -> Option<Rect> {
        let style = &doc.element(id)?.style;
        let origin = self.containing_origin(doc, id) + Self::offset(doc, id);
        let size = Size::new(
            style.length(&StyleProperty::Width).unwrap_or(0.0),
            style.length(&StyleProperty::Height).unwrap_or(0.0),
        );
        Some(Rect::from_origin_size(origin, size))
    }

    /// Sum of every ancestor's `left`/`top`, walking up iteratively.
    fn containing_origin(&self, doc: &PosterDocument, id: NodeId) -> Point {
        let mut origin = Point::ZERO;
        let mut current = doc.parent(id);
        while let Some(ancestor) = current {
            origin += Self::offset(doc, ancestor);
            current = doc.parent(ancestor);
        }
        origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ElementData, NodeKind};
    use crate::style::InlineStyle;

    fn styled(css: &str) -> NodeKind {
        NodeKind::Element(ElementData::new("div").with_style(InlineStyle::parse(css)))
    }

    #[test]
    fn test_inline_bounds() {
        let mut doc = PosterDocument::new();
        let id = doc.append(None, styled("left: 10px; top: 20px; width: 30px; height: 40px")).unwrap();
        assert_eq!(InlineLayout.bounds(&doc, id), Some(Rect::new(10.0, 20.0, 40.0, 60.0)));
    }

    #[test]
    fn test_nested_bounds_are_relative_to_parent() {
        let mut doc = PosterDocument::new();
        let outer = doc.append(None, styled("left: 100px; top: 100px")).unwrap();
        let inner = doc.append(Some(outer), styled("left: 5px; width: 10px; height: 10px")).unwrap();

        assert_eq!(InlineLayout.containing_origin(&doc, inner), Point::new(100.0, 100.0));
        assert_eq!(InlineLayout.bounds(&doc, inner), Some(Rect::new(105.0, 100.0, 115.0, 110.0)));
    }

    #[test]
    fn test_deeply_nested_bounds() {
        let mut doc = PosterDocument::new();
        let mut deepest = None;
        for _ in 0..20_000 {
            deepest = doc.append(deepest, styled("left: 1px; top: 2px; width: 5px; height: 5px"));
        }
        let deepest = deepest.unwrap();
        assert_eq!(InlineLayout.containing_origin(&doc, deepest), Point::new(19_999.0, 39_998.0));
        assert_eq!(
            InlineLayout.bounds(&doc, deepest),
            Some(Rect::new(20_000.0, 40_000.0, 20_005.0, 40_005.0))
        );
    }

    #[test]
    fn test_text_nodes_have_no_bounds() {
        let mut doc = PosterDocument::new();
        let text = doc.append(None, NodeKind::Text("hi".into())).unwrap();
        assert_eq!(InlineLayout.bounds(&doc, text), None);
    }
}
