//! Inline style model and style patches.
//!
//! An element's inline `style` attribute is parsed into an ordered list of
//! declarations. Every presentation change made by the editor (drag, resize,
//! property edits, duplication) is expressed as a [`StylePatch`] and applied
//! through [`InlineStyle::apply`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// A CSS property the editor knows about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleProperty {
    Position,
    Left,
    Top,
    Width,
    Height,
    Color,
    BackgroundColor,
    Background,
    FontSize,
    FontFamily,
    FontWeight,
    Opacity,
    Padding,
    BorderRadius,
    TextAlign,
    Border,
    Outline,
    OutlineOffset,
    BoxShadow,
    /// Any other property, stored by its lowercase CSS name. Custom
    /// properties keep their case.
    Other(String),
}

impl StyleProperty {
    /// The CSS name of the property.
    pub fn css_name(&self) -> &str {
        match self {
            Self::Position => "position",
            Self::Left => "left",
            Self::Top => "top",
            Self::Width => "width",
            Self::Height => "height",
            Self::Color => "color",
            Self::BackgroundColor => "background-color",
            Self::Background => "background",
            Self::FontSize => "font-size",
            Self::FontFamily => "font-family",
            Self::FontWeight => "font-weight",
            Self::Opacity => "opacity",
            Self::Padding => "padding",
            Self::BorderRadius => "border-radius",
            Self::TextAlign => "text-align",
            Self::Border => "border",
            Self::Outline => "outline",
            Self::OutlineOffset => "outline-offset",
            Self::BoxShadow => "box-shadow",
            Self::Other(name) => name,
        }
    }

    /// Look up a property by CSS name (case-insensitive).
    ///
    /// Custom properties (`--name`) are case-sensitive and kept verbatim.
    pub fn from_css_name(name: &str) -> Self {
        let name = name.trim();
        if name.starts_with("--") {
            return Self::Other(name.to_string());
        }
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "position" => Self::Position,
            "left" => Self::Left,
            "top" => Self::Top,
            "width" => Self::Width,
            "height" => Self::Height,
            "color" => Self::Color,
            "background-color" => Self::BackgroundColor,
            "background" => Self::Background,
            "font-size" => Self::FontSize,
            "font-family" => Self::FontFamily,
            "font-weight" => Self::FontWeight,
            "opacity" => Self::Opacity,
            "padding" => Self::Padding,
            "border-radius" => Self::BorderRadius,
            "text-align" => Self::TextAlign,
            "border" => Self::Border,
            "outline" => Self::Outline,
            "outline-offset" => Self::OutlineOffset,
            "box-shadow" => Self::BoxShadow,
            _ => Self::Other(name),
        }
    }
}

impl fmt::Display for StyleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

/// Parsed inline style of one element, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineStyle {
    declarations: Vec<(StyleProperty, String)>,
}

impl InlineStyle {
    /// Create an empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the contents of a `style` attribute.
    ///
    /// Malformed declarations (no colon, empty name or value) are dropped,
    /// matching how browsers treat them.
    pub fn parse(css: &str) -> Self {
        let mut style = Self::new();
        let css = strip_comments(css);
        for declaration in split_declarations(&css) {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            let (name, value) = (name.trim(), value.trim());
            if name.is_empty() || value.is_empty() {
                continue;
            }
            style.set(StyleProperty::from_css_name(name), value);
        }
        style
    }

    /// Get the value of a property.
    pub fn get(&self, property: &StyleProperty) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Set a property, replacing an existing declaration in place.
    pub fn set(&mut self, property: StyleProperty, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self.declarations.iter_mut().find(|(p, _)| *p == property) {
            slot.1 = value;
        } else {
            self.declarations.push((property, value));
        }
    }

    /// Remove a property. Returns the old value if it was set.
    pub fn remove(&mut self, property: &StyleProperty) -> Option<String> {
        let pos = self.declarations.iter().position(|(p, _)| p == property)?;
        Some(self.declarations.remove(pos).1)
    }

    /// Apply every change in a patch, in order.
    pub fn apply(&mut self, patch: &StylePatch) {
        for (property, value) in &patch.changes {
            match value {
                Some(value) => self.set(property.clone(), value.clone()),
                None => {
                    self.remove(property);
                }
            }
        }
    }

    /// Read a property as a pixel length.
    pub fn length(&self, property: &StyleProperty) -> Option<f64> {
        self.get(property).and_then(parse_length)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StyleProperty, &str)> {
        self.declarations.iter().map(|(p, v)| (p, v.as_str()))
    }

    /// Serialize as `style` attribute text, e.g. `width: 50px; height: 50px;`.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for (property, value) in &self.declarations {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(property.css_name());
            out.push_str(": ");
            out.push_str(value);
            out.push(';');
        }
        out
    }
}

/// A structured set of property changes.
///
/// `None` values remove the property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StylePatch {
    changes: Vec<(StyleProperty, Option<String>)>,
}

impl StylePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property to a value.
    pub fn set(mut self, property: StyleProperty, value: impl Into<String>) -> Self {
        self.changes.push((property, Some(value.into())));
        self
    }

    /// Set a property to a pixel length.
    pub fn set_px(self, property: StyleProperty, value: f64) -> Self {
        self.set(property, px(value))
    }

    /// Remove a property.
    pub fn remove(mut self, property: StyleProperty) -> Self {
        self.changes.push((property, None));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn changes(&self) -> impl Iterator<Item = (&StyleProperty, Option<&str>)> {
        self.changes.iter().map(|(p, v)| (p, v.as_deref()))
    }
}

/// Format a number of pixels, e.g. `30px` or `12.5px`.
pub fn px(value: f64) -> String {
    format!("{}px", format_number(value))
}

/// Format a number without a trailing `.0`.
pub fn format_number(value: f64) -> String {
    // Normalizes -0 to 0.
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

/// Parse the first token of a length value as pixels.
///
/// `"12px"`, `"12"` and `"12px 4px"` all read as `12.0`. Keywords such as
/// `auto` yield `None`.
pub fn parse_length(value: &str) -> Option<f64> {
    let token = value.split_whitespace().next()?;
    let number = token.strip_suffix("px").unwrap_or(token);
    number.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Replace `/* ... */` comments outside quotes with a space.
/// An unterminated comment runs to the end of the text.
fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut quote: Option<char> = None;
    let mut chars = css.chars().peekable();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '/') if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = None;
                for c in chars.by_ref() {
                    if prev == Some('*') && c == '/' {
                        break;
                    }
                    prev = Some(c);
                }
                out.push(' ');
                continue;
            }
            _ => {}
        }
        out.push(c);
    }
    out
}

/// Split style text on `;`, ignoring separators inside quotes or parentheses.
fn split_declarations(css: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in css.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&css[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&css[start..]);
    parts.into_iter().filter(|p| !p.trim().is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_serialize() {
        let style = InlineStyle::parse("width:50px;height:50px");
        assert_eq!(style.len(), 2);
        assert_eq!(style.get(&StyleProperty::Width), Some("50px"));
        assert_eq!(style.to_css(), "width: 50px; height: 50px;");
    }

    #[test]
    fn test_parse_ignores_separators_in_urls() {
        let style = InlineStyle::parse(r#"background: url("a;b.png"); COLOR: red;;"#);
        assert_eq!(style.get(&StyleProperty::Background), Some(r#"url("a;b.png")"#));
        assert_eq!(style.get(&StyleProperty::Color), Some("red"));
        assert_eq!(style.len(), 2);
    }

    #[test]
    fn test_parse_drops_malformed() {
        let style = InlineStyle::parse("width; :red; height: ; top: 4px");
        assert_eq!(style.len(), 1);
        assert_eq!(style.length(&StyleProperty::Top), Some(4.0));
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut style = InlineStyle::parse("left: 1px; top: 2px");
        style.set(StyleProperty::Left, "10px");
        assert_eq!(style.to_css(), "left: 10px; top: 2px;");
    }

    #[test]
    fn test_apply_patch() {
        let mut style = InlineStyle::parse("color: red; opacity: 0.5");
        let patch = StylePatch::new()
            .set(StyleProperty::Position, "absolute")
            .set_px(StyleProperty::Left, 30.0)
            .remove(StyleProperty::Opacity);
        style.apply(&patch);
        assert_eq!(style.to_css(), "color: red; position: absolute; left: 30px;");
    }

    #[test]
    fn test_px_formatting() {
        assert_eq!(px(30.0), "30px");
        assert_eq!(px(12.5), "12.5px");
        assert_eq!(px(-0.0), "0px");
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length("12px"), Some(12.0));
        assert_eq!(parse_length("8px 4px"), Some(8.0));
        assert_eq!(parse_length(" 3.5 "), Some(3.5));
        assert_eq!(parse_length("auto"), None);
        assert_eq!(parse_length(""), None);
    }

    #[test]
    fn test_custom_property_keeps_case() {
        let style = InlineStyle::parse("--MainColor: red; color: var(--MainColor);");
        assert_eq!(style.get(&StyleProperty::Other("--MainColor".into())), Some("red"));
        assert_eq!(style.to_css(), "--MainColor: red; color: var(--MainColor);");
    }

    #[test]
    fn test_comments_are_skipped() {
        let style = InlineStyle::parse("/* note; x */ color: red");
        assert_eq!(style.to_css(), "color: red;");

        let style = InlineStyle::parse("border: 1px/**/solid; top: /* a; b */ 4px; left: 2px /* open");
        assert_eq!(style.get(&StyleProperty::Border), Some("1px solid"));
        assert_eq!(style.length(&StyleProperty::Top), Some(4.0));
        assert_eq!(style.length(&StyleProperty::Left), Some(2.0));
    }

    #[test]
    fn test_comment_markers_inside_quotes_are_kept() {
        let style = InlineStyle::parse(r#"font-family: "a/*b*/c"; color: red"#);
        assert_eq!(style.get(&StyleProperty::FontFamily), Some(r#""a/*b*/c""#));
        assert_eq!(style.len(), 2);
    }

    #[test]
    fn test_unknown_property_round_trips_lowercase() {
        let style = InlineStyle::parse("Z-Index: 3");
        assert_eq!(style.get(&StyleProperty::Other("z-index".into())), Some("3"));
    }
}
