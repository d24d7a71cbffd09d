//! Posterly Core Library
//!
//! Platform-agnostic core data structures and logic for the Posterly poster editor.

pub mod canvas;
pub mod config;
pub mod document;
pub mod export;
pub mod history;
pub mod import;
pub mod input;
pub mod layout;
pub mod markup;
pub mod panel;
pub mod selection;
pub mod style;
pub mod tools;
pub mod traverse;

pub use canvas::{Canvas, GestureOutcome};
pub use config::{ConfigError, EditorConfig};
pub use document::{ElementData, Node, NodeId, NodeKind, PosterDocument};
pub use export::{CopyConfirmation, ExportedFile};
pub use history::History;
pub use import::{ImportError, ImportSource};
pub use input::{KeyPress, Modifiers, MouseButton, PointerEvent};
pub use layout::{InlineLayout, LayoutProvider};
pub use panel::{ElementContent, ElementProperties, PropertyEdit, TextAlign};
pub use selection::{Gesture, ResizeHandle};
pub use style::{InlineStyle, StylePatch, StyleProperty};
pub use tools::ElementKind;
pub use traverse::{walk, Visit};
