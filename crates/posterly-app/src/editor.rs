//! The editor: canvas, history and the actions that tie them together.

use crate::shortcuts::{Command, ShortcutRegistry};
use posterly_core::export;
use posterly_core::{
    Canvas, CopyConfirmation, EditorConfig, ElementKind, ElementProperties, ExportedFile, History,
    ImportError, ImportSource, InlineStyle, KeyPress, LayoutProvider, MouseButton, NodeId,
    PointerEvent, PropertyEdit, StylePatch, StyleProperty,
};

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Prompt shown before the canvas is cleared.
pub const CLEAR_CANVAS_PROMPT: &str = "Are you sure you want to clear the canvas?";

/// Actions from toolbar buttons, the properties panel and shortcuts.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    Import(ImportSource),
    AddElement(ElementKind),
    Edit(PropertyEdit),
    Select(NodeId),
    Deselect,
    DeleteSelected,
    DuplicateSelected,
    Undo,
    Redo,
}

/// Owns the canvas and its history.
///
/// Every operation that changes the poster records exactly one snapshot;
/// undo and redo load snapshots back into the canvas.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    canvas: Canvas,
    history: History,
    copy_confirmation: CopyConfirmation,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EditorConfig) -> Self {
        let copy_confirmation = CopyConfirmation::new(config.copy_feedback());
        Self {
            canvas: Canvas::with_config(config),
            history: History::new(),
            copy_confirmation,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        self.canvas.config()
    }

    /// Style for the element hosting the canvas.
    ///
    /// The host is the positioning origin for top-level elements, so stored
    /// `left`/`top` match the exported poster container.
    pub fn canvas_style(&self) -> InlineStyle {
        let size = f64::from(self.config().canvas_size);
        let mut style = InlineStyle::new();
        style.apply(
            &StylePatch::new()
                .set(StyleProperty::Position, "relative")
                .set_px(StyleProperty::Width, size)
                .set_px(StyleProperty::Height, size)
                .set(StyleProperty::Other("overflow".into()), "hidden")
                .set(StyleProperty::Other("user-select".into()), "none"),
        );
        style
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Run an action. Returns true if the canvas needs to be redrawn.
    pub fn dispatch(&mut self, action: EditorAction) -> bool {
        match action {
            EditorAction::Import(source) => match self.import(source) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("Import rejected: {}", e);
                    false
                }
            },
            EditorAction::AddElement(kind) => self.add_element(kind).is_some(),
            EditorAction::Edit(edit) => self.edit(&edit),
            EditorAction::Select(id) => self.select(id),
            EditorAction::Deselect => self.deselect(),
            EditorAction::DeleteSelected => self.delete_selected(),
            EditorAction::DuplicateSelected => self.duplicate_selected().is_some(),
            EditorAction::Undo => self.undo(),
            EditorAction::Redo => self.redo(),
        }
    }

    /// Replace the canvas with imported markup and record it.
    pub fn import(&mut self, source: ImportSource) -> Result<(), ImportError> {
        let markup = source.into_markup()?;
        self.canvas.load_markup(&markup);
        self.save_state();
        Ok(())
    }

    /// Record the current canvas markup as a new snapshot.
    pub fn save_state(&mut self) {
        self.history.push(self.canvas.markup());
    }

    /// Feed a pointer event to the canvas.
    ///
    /// A finished drag or resize records one snapshot. Returns true if the
    /// canvas changed.
    pub fn handle_pointer(&mut self, event: PointerEvent, layout: &dyn LayoutProvider) -> bool {
        let outcome = match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => return self.canvas.pointer_down(position, layout),
            PointerEvent::Down { .. } => return false,
            PointerEvent::Move { position } => return self.canvas.pointer_move(position),
            PointerEvent::Up { .. } => self.canvas.pointer_up(),
            PointerEvent::Leave => self.canvas.pointer_leave(),
        };
        match outcome {
            Some(outcome) => {
                log::debug!("Recording {:?}", outcome);
                self.save_state();
                true
            }
            None => false,
        }
    }

    /// Select the element under a point.
    pub fn click(&mut self, point: kurbo::Point, layout: &dyn LayoutProvider) -> Option<NodeId> {
        self.canvas.click_at(point, layout)
    }

    pub fn select(&mut self, id: NodeId) -> bool {
        self.canvas.select(id)
    }

    pub fn deselect(&mut self) -> bool {
        let had_selection = self.canvas.selection().is_some();
        self.canvas.clear_selection();
        had_selection
    }

    pub fn selection(&self) -> Option<NodeId> {
        self.canvas.selection()
    }

    /// Properties of the selected element.
    pub fn properties(&self, layout: &dyn LayoutProvider) -> Option<ElementProperties> {
        ElementProperties::read(&self.canvas, self.canvas.selection()?, layout)
    }

    /// Apply a panel edit to the selected element.
    pub fn edit(&mut self, edit: &PropertyEdit) -> bool {
        let Some(id) = self.canvas.selection() else {
            return false;
        };
        if !edit.apply(&mut self.canvas, id) {
            return false;
        }
        self.save_state();
        true
    }

    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.canvas.selection() else {
            return false;
        };
        if !self.canvas.remove_element(id) {
            return false;
        }
        self.save_state();
        true
    }

    pub fn duplicate_selected(&mut self) -> Option<NodeId> {
        let copy = self.canvas.duplicate_element(self.canvas.selection()?)?;
        self.save_state();
        Some(copy)
    }

    /// Add a toolbar element at the default spot and select it.
    pub fn add_element(&mut self, kind: ElementKind) -> Option<NodeId> {
        let id = self.canvas.append_element(kind.build(self.canvas.config()))?;
        if let Some(text) = kind.initial_text() {
            self.canvas.set_text_content(id, text);
        }
        self.canvas.select(id);
        self.save_state();
        log::info!("Added {:?} element", kind);
        Some(id)
    }

    /// Load the previous snapshot. Selection is dropped.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().map(str::to_string) else {
            return false;
        };
        self.canvas.load_markup(&snapshot);
        log::info!("Undo to snapshot {:?}", self.history.index());
        true
    }

    /// Load the next snapshot. Selection is dropped.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().map(str::to_string) else {
            return false;
        };
        self.canvas.load_markup(&snapshot);
        log::info!("Redo to snapshot {:?}", self.history.index());
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Empty the canvas if `confirm` agrees. Not recorded in history.
    pub fn clear_canvas(&mut self, confirm: impl FnOnce(&str) -> bool) -> bool {
        if !confirm(CLEAR_CANVAS_PROMPT) {
            return false;
        }
        self.canvas.clear();
        log::info!("Canvas cleared");
        true
    }

    /// The downloadable poster, or None while the canvas is empty.
    pub fn export_file(&self) -> Option<ExportedFile> {
        if self.canvas.is_empty() {
            log::warn!("Nothing to export");
            return None;
        }
        let file = export::export_file(&self.canvas.markup(), self.canvas.config());
        log::info!("Exported {} ({} bytes)", file.file_name, file.contents.len());
        Some(file)
    }

    /// Text for the clipboard.
    pub fn copy_markup(&self) -> String {
        export::clipboard_text(&self.canvas.markup())
    }

    /// Called once the clipboard write succeeded.
    pub fn mark_copied(&mut self, now: Instant) {
        self.copy_confirmation.show(now);
    }

    /// Whether the "copied" confirmation is visible.
    pub fn copied(&self, now: Instant) -> bool {
        self.copy_confirmation.is_visible(now)
    }

    /// Run the shortcut bound to a key press, if any.
    pub fn handle_key(&mut self, press: &KeyPress) -> Option<bool> {
        let command = ShortcutRegistry::lookup(press)?;
        let action = match command {
            Command::Undo => EditorAction::Undo,
            Command::Redo => EditorAction::Redo,
            Command::DeleteSelected => EditorAction::DeleteSelected,
            Command::DuplicateSelected => EditorAction::DuplicateSelected,
            Command::Deselect => EditorAction::Deselect,
        };
        Some(self.dispatch(action))
    }
}
