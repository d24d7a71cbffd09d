//! Posterly Application
//!
//! The editor controller tying canvas, history and shortcuts together,
//! plus the browser shell that mounts it on a page.

mod editor;
mod shortcuts;

pub use editor::{CLEAR_CANVAS_PROMPT, Editor, EditorAction};
pub use shortcuts::{Command, Shortcut, ShortcutRegistry};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{WebEditor, run_wasm};
