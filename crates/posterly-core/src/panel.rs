//! Properties panel model: read the selected element into editable fields
//! and write field edits back as style patches.

use crate::canvas::Canvas;
use crate::document::{NodeId, PosterDocument};
use crate::layout::LayoutProvider;
use crate::style::{StylePatch, StyleProperty, format_number, parse_length};
use peniko::color::{Srgb, parse_color};
use serde::{Deserialize, Serialize};

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn as_css(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }

    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            "justify" => Some(Self::Justify),
            _ => None,
        }
    }
}

/// Editable content of an element: text for most, source for images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ElementContent {
    Text(String),
    ImageSrc(String),
}

/// Snapshot of the selected element's fields, as shown in the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementProperties {
    pub id: NodeId,
    /// Uppercase tag name, e.g. `DIV`.
    pub tag: String,
    pub content: ElementContent,
    pub font_size: f64,
    pub font_family: String,
    pub font_weight: String,
    /// `#rrggbb`.
    pub color: String,
    /// `transparent` or `#rrggbb`.
    pub background: String,
    pub width: f64,
    pub height: f64,
    pub opacity: f64,
    pub text_align: TextAlign,
    pub padding: f64,
    pub border_radius: f64,
}

impl ElementProperties {
    /// Read an element's fields.
    ///
    /// Inherited properties (font, color, alignment) fall back to the nearest
    /// ancestor that sets them, then to browser defaults. Width and height
    /// fall back to the laid-out size.
    pub fn read(canvas: &Canvas, id: NodeId, layout: &dyn LayoutProvider) -> Option<Self> {
        let doc = canvas.document();
        let element = doc.element(id)?;
        let style = &element.style;
        let bounds = layout.bounds(doc, id);

        let content = if element.is_image() {
            ElementContent::ImageSrc(element.attribute("src").unwrap_or_default().to_string())
        } else {
            ElementContent::Text(doc.text_content(id))
        };

        let font_size = inherited(doc, id, &StyleProperty::FontSize)
            .and_then(parse_length)
            .unwrap_or(16.0);
        let font_family = inherited(doc, id, &StyleProperty::FontFamily)
            .map(first_font_family)
            .unwrap_or_else(|| "Arial".to_string());
        let font_weight = inherited(doc, id, &StyleProperty::FontWeight)
            .map(normalize_font_weight)
            .unwrap_or_else(|| "400".to_string());
        let color = inherited(doc, id, &StyleProperty::Color)
            .and_then(color_to_hex)
            .unwrap_or_else(|| "#000000".to_string());
        let text_align = inherited(doc, id, &StyleProperty::TextAlign)
            .and_then(TextAlign::from_css)
            .unwrap_or_default();

        let background = style
            .get(&StyleProperty::BackgroundColor)
            .or_else(|| style.get(&StyleProperty::Background))
            .map(background_display)
            .unwrap_or_else(|| "transparent".to_string());

        Some(Self {
            id,
            tag: element.tag.to_ascii_uppercase(),
            content,
            font_size,
            font_family,
            font_weight,
            color,
            background,
            width: style
                .length(&StyleProperty::Width)
                .or_else(|| bounds.map(|b| b.width()))
                .unwrap_or(0.0),
            height: style
                .length(&StyleProperty::Height)
                .or_else(|| bounds.map(|b| b.height()))
                .unwrap_or(0.0),
            opacity: style
                .get(&StyleProperty::Opacity)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .unwrap_or(1.0),
            text_align,
            padding: style.length(&StyleProperty::Padding).unwrap_or(0.0),
            border_radius: style.length(&StyleProperty::BorderRadius).unwrap_or(0.0),
        })
    }

    pub fn is_image(&self) -> bool {
        matches!(self.content, ElementContent::ImageSrc(_))
    }
}

/// One field edit from the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum PropertyEdit {
    Text(String),
    ImageSrc(String),
    FontSize(f64),
    FontFamily(String),
    FontWeight(String),
    Color(String),
    Background(String),
    Width(f64),
    Height(f64),
    Opacity(f64),
    TextAlign(TextAlign),
    Padding(f64),
    BorderRadius(f64),
}

impl PropertyEdit {
    /// Build an edit from a field name and raw input text.
    ///
    /// Returns None for unknown fields or numbers that do not parse.
    pub fn parse(field: &str, value: &str) -> Option<Self> {
        let number = || value.trim().parse::<f64>().ok().filter(|n| n.is_finite());
        let edit = match field {
            "text" => Self::Text(value.to_string()),
            "image_src" => Self::ImageSrc(value.to_string()),
            "font_size" => Self::FontSize(number()?),
            "font_family" => Self::FontFamily(value.to_string()),
            "font_weight" => Self::FontWeight(value.trim().to_string()),
            "color" => Self::Color(value.trim().to_string()),
            "background" => Self::Background(value.trim().to_string()),
            "width" => Self::Width(number()?),
            "height" => Self::Height(number()?),
            "opacity" => Self::Opacity(number()?),
            "text_align" => Self::TextAlign(TextAlign::from_css(value)?),
            "padding" => Self::Padding(number()?),
            "border_radius" => Self::BorderRadius(number()?),
            _ => return None,
        };
        Some(edit)
    }

    /// The style change this edit makes, if it is a style edit.
    pub fn style_patch(&self) -> Option<StylePatch> {
        let patch = StylePatch::new();
        let patch = match self {
            Self::Text(_) | Self::ImageSrc(_) => return None,
            Self::FontSize(v) => patch.set_px(StyleProperty::FontSize, *v),
            Self::FontFamily(v) => patch.set(StyleProperty::FontFamily, v.as_str()),
            Self::FontWeight(v) => patch.set(StyleProperty::FontWeight, v.as_str()),
            Self::Color(v) => patch.set(StyleProperty::Color, v.as_str()),
            Self::Background(v) => patch.set(StyleProperty::BackgroundColor, v.as_str()),
            Self::Width(v) => patch.set_px(StyleProperty::Width, *v),
            Self::Height(v) => patch.set_px(StyleProperty::Height, *v),
            Self::Opacity(v) => patch.set(StyleProperty::Opacity, format_number(*v)),
            Self::TextAlign(v) => patch.set(StyleProperty::TextAlign, v.as_css()),
            Self::Padding(v) => patch.set_px(StyleProperty::Padding, *v),
            Self::BorderRadius(v) => patch.set_px(StyleProperty::BorderRadius, *v),
        };
        Some(patch)
    }

    /// Write the edit to an element.
    ///
    /// Text edits do nothing on images and source edits do nothing on
    /// anything else. Returns true if the element changed.
    pub fn apply(&self, canvas: &mut Canvas, id: NodeId) -> bool {
        let Some(is_image) = canvas.document().element(id).map(|e| e.is_image()) else {
            return false;
        };
        match self {
            Self::Text(text) if !is_image => canvas.set_text_content(id, text),
            Self::ImageSrc(src) if is_image => canvas.set_attribute(id, "src", src),
            Self::Text(_) | Self::ImageSrc(_) => false,
            _ => self
                .style_patch()
                .is_some_and(|patch| canvas.apply_style_patch(id, &patch)),
        }
    }
}

/// Normalize any CSS color to `#rrggbb`.
pub fn color_to_hex(value: &str) -> Option<String> {
    let rgba = parse_color(value.trim()).ok()?.to_alpha_color::<Srgb>().to_rgba8();
    Some(format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b))
}

/// Background for display: `transparent` when fully transparent or unreadable.
fn background_display(value: &str) -> String {
    let Ok(color) = parse_color(value.trim()) else {
        return "transparent".to_string();
    };
    let rgba = color.to_alpha_color::<Srgb>().to_rgba8();
    if rgba.a == 0 {
        "transparent".to_string()
    } else {
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    }
}

fn first_font_family(value: &str) -> String {
    value
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string()
}

fn normalize_font_weight(value: &str) -> String {
    match value.trim().to_ascii_lowercase().as_str() {
        "normal" => "400".to_string(),
        "bold" => "700".to_string(),
        other => other.to_string(),
    }
}

/// Value of an inherited property on the element or its nearest ancestor.
fn inherited<'a>(doc: &'a PosterDocument, id: NodeId, property: &StyleProperty) -> Option<&'a str> {
    let mut current = Some(id);
    while let Some(node) = current {
        if let Some(value) = doc.element(node).and_then(|e| e.style.get(property)) {
            return Some(value);
        }
        current = doc.parent(node);
    }
    None
}
