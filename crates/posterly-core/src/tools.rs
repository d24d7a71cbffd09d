//! Toolbar element templates.

use crate::config::EditorConfig;
use crate::document::ElementData;
use crate::style::{InlineStyle, StylePatch, StyleProperty};
use serde::{Deserialize, Serialize};

/// Where new elements are placed.
pub const NEW_ELEMENT_POSITION: (f64, f64) = (50.0, 50.0);

/// Kind of element the toolbar can add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A paragraph with placeholder text.
    Text,
    /// An image with the placeholder source.
    Image,
    /// A plain grey box.
    Box,
}

impl ElementKind {
    /// All kinds, in toolbar order.
    pub fn all() -> &'static [ElementKind] {
        &[Self::Text, Self::Image, Self::Box]
    }

    /// Toolbar label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Add Text Block",
            Self::Image => "Add Image",
            Self::Box => "Add Box",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "image" | "img" => Some(Self::Image),
            "box" | "div" => Some(Self::Box),
            _ => None,
        }
    }

    /// Build the element, absolutely positioned at the default spot.
    ///
    /// Text content for [`ElementKind::Text`] is added by the caller.
    pub fn build(&self, config: &EditorConfig) -> ElementData {
        let (left, top) = NEW_ELEMENT_POSITION;
        let patch = match self {
            Self::Text => StylePatch::new()
                .set_px(StyleProperty::FontSize, 16.0)
                .set(StyleProperty::Color, "#000000"),
            Self::Image => StylePatch::new()
                .set_px(StyleProperty::Width, 100.0)
                .set_px(StyleProperty::Height, 100.0),
            Self::Box => StylePatch::new()
                .set_px(StyleProperty::Width, 100.0)
                .set_px(StyleProperty::Height, 100.0)
                .set(StyleProperty::BackgroundColor, "#e5e7eb")
                .set(StyleProperty::Border, "1px solid #d1d5db"),
        }
        .set(StyleProperty::Position, "absolute")
        .set_px(StyleProperty::Left, left)
        .set_px(StyleProperty::Top, top);

        let mut style = InlineStyle::new();
        style.apply(&patch);

        let element = match self {
            Self::Text => ElementData::new("p"),
            Self::Image => ElementData::new("img").with_attribute("src", &config.placeholder_image_src),
            Self::Box => ElementData::new("div"),
        };
        element.with_style(style)
    }

    /// Initial text content, if any.
    pub fn initial_text(&self) -> Option<&'static str> {
        match self {
            Self::Text => Some("New Text"),
            Self::Image | Self::Box => None,
        }
    }
}
