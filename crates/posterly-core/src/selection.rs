//! Selection marker, resize handle and gesture state.

use crate::document::NodeId;
use crate::style::{InlineStyle, StyleProperty};
use kurbo::{Point, Rect, Size, Vec2};
use peniko::color::{Srgb, parse_color};

/// Resize handle size in canvas pixels.
pub const HANDLE_SIZE: f64 = 12.0;
/// How far past the bottom-right corner the handle still hits.
pub const HANDLE_SLOP: f64 = 4.0;
/// Smallest width or height a resize can produce.
pub const MIN_SIZE: f64 = 50.0;
/// Attribute tagging the selected element in rendered markup.
pub const SELECTED_ATTRIBUTE: &str = "data-selected";
/// Attribute carrying node IDs in rendered markup.
pub const NODE_ATTRIBUTE: &str = "data-node";
/// Default selection outline color.
pub const OUTLINE_COLOR: &str = "#06b6d4";

/// The bottom-right resize corner of a selected element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeHandle {
    /// Bounds of the element, in canvas coordinates.
    pub bounds: Rect,
    pub size: f64,
    pub slop: f64,
}

impl ResizeHandle {
    /// Create a handle with the default size.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            size: HANDLE_SIZE,
            slop: HANDLE_SLOP,
        }
    }

    pub fn with_size(mut self, size: f64, slop: f64) -> Self {
        self.size = size;
        self.slop = slop;
        self
    }

    /// Region that counts as a hit (open on all sides).
    pub fn region(&self) -> Rect {
        Rect::new(
            self.bounds.x1 - self.size,
            self.bounds.y1 - self.size,
            self.bounds.x1 + self.slop,
            self.bounds.y1 + self.slop,
        )
    }

    /// Check if a point in canvas coordinates hits the handle.
    pub fn hit_test(&self, point: Point) -> bool {
        let region = self.region();
        point.x > region.x0 && point.x < region.x1 && point.y > region.y0 && point.y < region.y1
    }
}

/// The pointer gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Moving the element: its top-left tracks the pointer minus `grab_offset`.
    Dragging {
        id: NodeId,
        /// Pointer position relative to the element's top-left at grab time.
        grab_offset: Vec2,
        /// Origin `left`/`top` are measured from.
        containing_origin: Point,
        moved: bool,
    },
    /// Resizing from the bottom-right corner.
    Resizing {
        id: NodeId,
        start: Point,
        start_size: Size,
        moved: bool,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self, Self::Resizing { .. })
    }

    /// The element being manipulated.
    pub fn target(&self) -> Option<NodeId> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, .. } | Self::Resizing { id, .. } => Some(*id),
        }
    }

    /// Record that the target was changed by this gesture.
    pub(crate) fn record_move(&mut self) {
        match self {
            Self::Idle => {}
            Self::Dragging { moved, .. } | Self::Resizing { moved, .. } => *moved = true,
        }
    }

    /// Whether the target was changed since pointer down.
    pub fn changed(&self) -> bool {
        match self {
            Self::Idle => false,
            Self::Dragging { moved, .. } | Self::Resizing { moved, .. } => *moved,
        }
    }
}

/// Width and height after resizing by `delta`, never below `min`.
pub fn resized(start: Size, delta: Vec2, min: f64) -> Size {
    Size::new(
        (start.width + delta.x).max(min),
        (start.height + delta.y).max(min),
    )
}

/// Add the selection outline to a copy of an element's style.
pub fn with_outline(style: &InlineStyle, color: &str) -> InlineStyle {
    let mut style = style.clone();
    style.set(StyleProperty::Outline, format!("3px solid {color}"));
    style.set(StyleProperty::OutlineOffset, "2px");
    style.set(StyleProperty::BoxShadow, format!("0 0 0 1px {}", halo(color)));
    style
}

/// The outline color at 20% opacity. Unparseable colors fall back to the default halo.
fn halo(color: &str) -> String {
    let color = parse_color(color.trim())
        .or_else(|_| parse_color(OUTLINE_COLOR))
        .map(|c| c.to_alpha_color::<Srgb>().to_rgba8());
    match color {
        Ok(rgba) => format!("rgba({}, {}, {}, 0.2)", rgba.r, rgba.g, rgba.b),
        Err(_) => "rgba(6, 182, 212, 0.2)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_hit_region() {
        let handle = ResizeHandle::new(Rect::new(0.0, 0.0, 100.0, 80.0));
        assert!(handle.hit_test(Point::new(95.0, 75.0)));
        assert!(handle.hit_test(Point::new(103.0, 83.0)));
        // Edges are exclusive.
        assert!(!handle.hit_test(Point::new(88.0, 75.0)));
        assert!(!handle.hit_test(Point::new(104.0, 75.0)));
        assert!(!handle.hit_test(Point::new(50.0, 40.0)));
    }

    #[test]
    fn test_resized_floor() {
        let start = Size::new(100.0, 60.0);
        assert_eq!(resized(start, Vec2::new(20.0, -5.0), MIN_SIZE), Size::new(120.0, 55.0));
        assert_eq!(resized(start, Vec2::new(-500.0, -500.0), MIN_SIZE), Size::new(50.0, 50.0));
    }

    #[test]
    fn test_gesture_flags() {
        let id = NodeId::new();
        let mut gesture = Gesture::Resizing {
            id,
            start: Point::ZERO,
            start_size: Size::new(10.0, 10.0),
            moved: false,
        };
        assert!(gesture.is_resizing());
        assert_eq!(gesture.target(), Some(id));
        assert!(!gesture.changed());
        gesture.record_move();
        assert!(gesture.changed());
        assert!(Gesture::default().is_idle());
    }

    #[test]
    fn test_outline_does_not_touch_original() {
        let style = InlineStyle::parse("color: red");
        let outlined = with_outline(&style, OUTLINE_COLOR);
        assert_eq!(style.len(), 1);
        assert_eq!(outlined.get(&StyleProperty::Outline), Some("3px solid #06b6d4"));
        assert_eq!(
            outlined.get(&StyleProperty::BoxShadow),
            Some("0 0 0 1px rgba(6, 182, 212, 0.2)")
        );
    }

    #[test]
    fn test_halo_follows_outline_color() {
        let outlined = with_outline(&InlineStyle::new(), "#ff0000");
        assert_eq!(outlined.get(&StyleProperty::Outline), Some("3px solid #ff0000"));
        assert_eq!(
            outlined.get(&StyleProperty::BoxShadow),
            Some("0 0 0 1px rgba(255, 0, 0, 0.2)")
        );

        let fallback = with_outline(&InlineStyle::new(), "not a color");
        assert_eq!(
            fallback.get(&StyleProperty::BoxShadow),
            Some("0 0 0 1px rgba(6, 182, 212, 0.2)")
        );
    }
}
