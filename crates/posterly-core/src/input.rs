//! Pointer and keyboard input types.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` value.
    pub fn from_dom(button: i16) -> Option<Self> {
        match button {
            0 => Some(Self::Left),
            1 => Some(Self::Middle),
            2 => Some(Self::Right),
            _ => None,
        }
    }
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer events in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Move { position: Point },
    Up { position: Point, button: MouseButton },
    /// Pointer left the canvas bounds.
    Leave,
}

/// A key press with its modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    /// DOM `KeyboardEvent.key` value, e.g. `z` or `Delete`.
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }

    /// Whether the key matches, ignoring ASCII case.
    pub fn is(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_buttons() {
        assert_eq!(MouseButton::from_dom(0), Some(MouseButton::Left));
        assert_eq!(MouseButton::from_dom(2), Some(MouseButton::Right));
        assert_eq!(MouseButton::from_dom(7), None);
    }

    #[test]
    fn test_key_press() {
        let press = KeyPress::new("Z", Modifiers { meta: true, ..Default::default() });
        assert!(press.is("z"));
        assert!(press.modifiers.command());
    }
}
