//! Canvas engine: live element tree, selection and drag/resize gestures.

use crate::config::EditorConfig;
use crate::document::{ElementData, NodeId, NodeKind, PosterDocument};
use crate::layout::LayoutProvider;
use crate::markup::{self, SerializeOptions};
use crate::selection::{self, Gesture, ResizeHandle};
use crate::style::{StylePatch, StyleProperty, parse_length};
use crate::traverse::{self, Visit};
use kurbo::Point;
use std::collections::HashSet;

/// What a finished gesture did. Each outcome is one state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Moved(NodeId),
    Resized(NodeId),
}

impl GestureOutcome {
    pub fn target(&self) -> NodeId {
        match self {
            Self::Moved(id) | Self::Resized(id) => *id,
        }
    }
}

/// The editable canvas.
///
/// The element tree is the single source of truth for markup and inline
/// style; the selection outline is layered on only when rendering.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    document: PosterDocument,
    /// Elements with selection handlers attached.
    selectable: HashSet<NodeId>,
    selection: Option<NodeId>,
    gesture: Gesture,
    config: EditorConfig,
}

impl Canvas {
    /// Create an empty canvas with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty canvas with custom configuration.
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &PosterDocument {
        &self.document
    }

    /// Replace all content with parsed markup and attach selection handlers.
    pub fn load_markup(&mut self, html: &str) {
        self.document = markup::parse(html);
        self.selectable.clear();
        self.selection = None;
        self.gesture = Gesture::Idle;
        for root in self.document.element_children(None) {
            self.attach_selection_handlers(root);
        }
        log::debug!(
            "Canvas loaded: {} nodes, {} selectable",
            self.document.len(),
            self.selectable.len()
        );
    }

    /// Remove all content and reset selection.
    pub fn clear(&mut self) {
        self.document.clear();
        self.selectable.clear();
        self.selection = None;
        self.gesture = Gesture::Idle;
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    /// Clean markup of the canvas contents (no selection styling).
    pub fn markup(&self) -> String {
        markup::serialize(&self.document, &SerializeOptions::default())
    }

    /// Markup for a host to display: selection overlay plus `data-node` IDs.
    pub fn render_markup(&self) -> String {
        markup::serialize(
            &self.document,
            &SerializeOptions {
                selected: self.selection,
                node_ids: true,
                outline_color: &self.config.outline_color,
            },
        )
    }

    /// Inline style text a host should show for one element right now.
    pub fn render_style(&self, id: NodeId) -> Option<String> {
        let element = self.document.element(id)?;
        if self.selection == Some(id) {
            Some(selection::with_outline(&element.style, &self.config.outline_color).to_css())
        } else {
            Some(element.style.to_css())
        }
    }

    /// Make every element in a subtree selectable.
    ///
    /// Copies made with [`Canvas::duplicate_element`] go through this again;
    /// cloning carries structure and style, not handlers.
    pub fn attach_selection_handlers(&mut self, root: NodeId) {
        let selectable = &mut self.selectable;
        traverse::walk(&self.document, &[root], |node| {
            if !node.is_element() {
                return Visit::SkipChildren;
            }
            selectable.insert(node.id);
            Visit::Continue
        });
    }

    pub fn is_selectable(&self, id: NodeId) -> bool {
        self.selectable.contains(&id) && self.document.contains(id)
    }

    /// The selected element, if it is still part of the canvas.
    pub fn selection(&self) -> Option<NodeId> {
        self.selection.filter(|&id| self.document.contains(id))
    }

    /// Select an element. Returns false if it has no selection handler.
    pub fn select(&mut self, id: NodeId) -> bool {
        if !self.is_selectable(id) {
            return false;
        }
        if self.selection != Some(id) {
            log::debug!("Selected {}", id);
        }
        self.selection = Some(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.gesture = Gesture::Idle;
    }

    /// Deepest, front-most selectable element under a point.
    pub fn element_at(&self, point: Point, layout: &dyn LayoutProvider) -> Option<NodeId> {
        let mut hit = None;
        traverse::walk(&self.document, self.document.roots(), |node| {
            if !node.is_element() {
                return Visit::SkipChildren;
            }
            if self.selectable.contains(&node.id)
                && layout
                    .bounds(&self.document, node.id)
                    .is_some_and(|rect| rect.contains(point))
            {
                hit = Some(node.id);
            }
            Visit::Continue
        });
        hit
    }

    /// Select the element under a point. Empty canvas space leaves the
    /// selection unchanged.
    pub fn click_at(&mut self, point: Point, layout: &dyn LayoutProvider) -> Option<NodeId> {
        let id = self.element_at(point, layout)?;
        self.select(id).then_some(id)
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Start a drag or resize on the selected element.
    ///
    /// A press inside the bottom-right handle starts a resize; anywhere else
    /// starts a drag. Returns false with no selection.
    pub fn pointer_down(&mut self, point: Point, layout: &dyn LayoutProvider) -> bool {
        let Some(id) = self.selection() else {
            return false;
        };
        let Some(bounds) = layout.bounds(&self.document, id) else {
            return false;
        };

        let handle = ResizeHandle::new(bounds).with_size(self.config.handle_size, self.config.handle_slop);
        self.gesture = if handle.hit_test(point) {
            log::debug!("Resize start on {} at {:?}", id, point);
            Gesture::Resizing {
                id,
                start: point,
                start_size: bounds.size(),
                moved: false,
            }
        } else {
            log::debug!("Drag start on {} at {:?}", id, point);
            Gesture::Dragging {
                id,
                grab_offset: point - bounds.origin(),
                containing_origin: layout.containing_origin(&self.document, id),
                moved: false,
            }
        };
        true
    }

    /// Apply pointer movement to the active gesture.
    /// Returns true if the element's style changed.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        let patch = match self.gesture {
            Gesture::Idle => return false,
            Gesture::Dragging {
                grab_offset,
                containing_origin,
                ..
            } => {
                let top_left = point - grab_offset;
                StylePatch::new()
                    .set(StyleProperty::Position, "absolute")
                    .set_px(StyleProperty::Left, top_left.x - containing_origin.x)
                    .set_px(StyleProperty::Top, top_left.y - containing_origin.y)
            }
            Gesture::Resizing { start, start_size, .. } => {
                let size = selection::resized(start_size, point - start, self.config.min_size);
                StylePatch::new()
                    .set_px(StyleProperty::Width, size.width)
                    .set_px(StyleProperty::Height, size.height)
            }
        };

        let Some(id) = self.gesture.target() else {
            return false;
        };
        if !self.apply_style_patch(id, &patch) {
            // Target vanished mid-gesture.
            self.gesture = Gesture::Idle;
            return false;
        }
        self.gesture.record_move();
        true
    }

    /// Finish the active gesture.
    ///
    /// Returns the outcome only if the gesture changed the element, so one
    /// gesture yields at most one state change.
    pub fn pointer_up(&mut self) -> Option<GestureOutcome> {
        let gesture = std::mem::take(&mut self.gesture);
        if !gesture.changed() {
            return None;
        }
        let outcome = match gesture {
            Gesture::Dragging { id, .. } => GestureOutcome::Moved(id),
            Gesture::Resizing { id, .. } => GestureOutcome::Resized(id),
            Gesture::Idle => return None,
        };
        log::debug!("Gesture finished: {:?}", outcome);
        Some(outcome)
    }

    /// Pointer left the canvas; ends the gesture like a release.
    pub fn pointer_leave(&mut self) -> Option<GestureOutcome> {
        self.pointer_up()
    }

    /// Apply a style patch to an element. The only way styles change.
    pub fn apply_style_patch(&mut self, id: NodeId, patch: &StylePatch) -> bool {
        let Some(element) = self.document.element_mut(id) else {
            return false;
        };
        element.style.apply(patch);
        true
    }

    /// Replace an element's content with text.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> bool {
        self.document.set_text_content(id, text)
    }

    /// Set a non-style attribute on an element.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        let Some(element) = self.document.element_mut(id) else {
            return false;
        };
        element.set_attribute(name, value);
        true
    }

    /// Remove an element from its parent.
    ///
    /// Clears the selection if it was inside the removed subtree.
    pub fn remove_element(&mut self, id: NodeId) -> bool {
        if self.document.element(id).is_none() {
            return false;
        }
        if let Some(selected) = self.selection {
            if self.document.is_ancestor_or_self(id, selected) {
                self.clear_selection();
            }
        }
        for removed in traverse::elements(&self.document, &[id]) {
            self.selectable.remove(&removed);
        }
        self.document.remove(id)
    }

    /// Clone an element next to itself, offset by the configured amount.
    ///
    /// The copy is appended to the same parent and gets its own selection
    /// handlers. The selection stays on the original.
    pub fn duplicate_element(&mut self, id: NodeId) -> Option<NodeId> {
        let source = self.document.element(id)?;
        let offset = self.config.duplicate_offset;
        let left = source.style.get(&StyleProperty::Left).and_then(parse_length).unwrap_or(0.0);
        let top = source.style.get(&StyleProperty::Top).and_then(parse_length).unwrap_or(0.0);
        let parent = self.document.parent(id);

        let copy = self.document.append_copy(id, parent)?;
        self.apply_style_patch(
            copy,
            &StylePatch::new()
                .set_px(StyleProperty::Left, left.trunc() + offset)
                .set_px(StyleProperty::Top, top.trunc() + offset),
        );
        self.attach_selection_handlers(copy);
        Some(copy)
    }

    /// Append a new element to the canvas root and make it selectable.
    pub fn append_element(&mut self, element: ElementData) -> Option<NodeId> {
        let id = self.document.append(None, NodeKind::Element(element))?;
        self.attach_selection_handlers(id);
        Some(id)
    }
}
