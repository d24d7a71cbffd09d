//! WebAssembly entry point and DOM bindings.
//!
//! The browser owns rendering and layout. The canvas markup is written into
//! a host element, and geometry is read back through [`DomLayout`].

use crate::editor::Editor;
use crate::shortcuts::ShortcutRegistry;
use kurbo::{Point, Rect};
use posterly_core::import::accept_attribute;
use posterly_core::selection::NODE_ATTRIBUTE;
use posterly_core::{
    EditorConfig, ElementKind, ImportError, ImportSource, KeyPress, LayoutProvider, Modifiers,
    MouseButton, NodeId, PointerEvent, PosterDocument, PropertyEdit,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, EventTarget, HtmlElement, KeyboardEvent, MouseEvent};
use web_time::Instant;

/// Install the panic hook and console logger.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger not initialized: {}", e).into());
    }

    log::info!("Starting Posterly (WASM)");
}

/// Element geometry from the live DOM, relative to the canvas element.
struct DomLayout {
    root: HtmlElement,
}

impl DomLayout {
    fn origin(&self) -> Point {
        let rect = self.root.get_bounding_client_rect();
        Point::new(rect.left(), rect.top())
    }

    /// Convert client coordinates to canvas coordinates.
    fn to_canvas(&self, client_x: f64, client_y: f64) -> Point {
        let origin = self.origin();
        Point::new(client_x - origin.x, client_y - origin.y)
    }

    fn node(&self, id: NodeId) -> Option<Element> {
        self.root
            .query_selector(&format!("[{}=\"{}\"]", NODE_ATTRIBUTE, id))
            .ok()
            .flatten()
    }

    fn rect_of(&self, element: &Element) -> Rect {
        let rect = element.get_bounding_client_rect();
        let origin = self.origin();
        Rect::new(
            rect.left() - origin.x,
            rect.top() - origin.y,
            rect.right() - origin.x,
            rect.bottom() - origin.y,
        )
    }
}

impl LayoutProvider for DomLayout {
    fn bounds(&self, _doc: &PosterDocument, id: NodeId) -> Option<Rect> {
        self.node(id).map(|element| self.rect_of(&element))
    }

    /// Padding-box origin of the element's offset parent. The mounted root is
    /// positioned, so top-level elements measure from the canvas.
    fn containing_origin(&self, _doc: &PosterDocument, id: NodeId) -> Point {
        let parent = self
            .node(id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
            .and_then(|element| element.offset_parent())
            .unwrap_or_else(|| self.root.clone().into());
        let origin = self.rect_of(&parent).origin();
        Point::new(
            origin.x + f64::from(parent.client_left()),
            origin.y + f64::from(parent.client_top()),
        )
    }
}

/// An event listener that is removed again when dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn new(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// State shared between the JS handle and event handlers.
struct Shared {
    editor: RefCell<Editor>,
    root: HtmlElement,
    on_change: RefCell<Option<js_sys::Function>>,
}

impl Shared {
    fn layout(&self) -> DomLayout {
        DomLayout {
            root: self.root.clone(),
        }
    }

    fn render(&self) {
        let markup = self.editor.borrow().canvas().render_markup();
        self.root.set_inner_html(&markup);
    }

    /// Update one element's inline style in place, mid-gesture.
    fn refresh_style(&self, id: NodeId) {
        let Some(style) = self.editor.borrow().canvas().render_style(id) else {
            return;
        };
        if let Some(element) = self.layout().node(id) {
            if let Err(e) = element.set_attribute("style", &style) {
                log::warn!("Failed to update style: {:?}", e);
            }
        }
    }

    fn notify(&self) {
        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback {
            if let Err(e) = callback.call0(&JsValue::NULL) {
                log::warn!("Change callback failed: {:?}", e);
            }
        }
    }

    /// Redraw and tell the host when something changed.
    fn finish(&self, changed: bool) -> bool {
        if changed {
            self.render();
            self.notify();
        }
        changed
    }

    fn import(&self, source: ImportSource) -> Result<(), ImportError> {
        let result = self.editor.borrow_mut().import(source);
        self.finish(result.is_ok());
        result
    }

    fn on_click(&self, event: &Event) {
        let id = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .and_then(|element| element.closest(&format!("[{}]", NODE_ATTRIBUTE)).ok().flatten())
            .and_then(|element| element.get_attribute(NODE_ATTRIBUTE))
            .and_then(|value| NodeId::parse(&value));
        let Some(id) = id else {
            return;
        };
        let changed = {
            let mut editor = self.editor.borrow_mut();
            editor.selection() != Some(id) && editor.select(id)
        };
        self.finish(changed);
    }

    fn on_pointer(&self, event: PointerEvent) {
        let layout = self.layout();
        let (changed, target, idle) = {
            let mut editor = self.editor.borrow_mut();
            let changed = editor.handle_pointer(event, &layout);
            let gesture = editor.canvas().gesture();
            (changed, gesture.target(), gesture.is_idle())
        };
        match event {
            PointerEvent::Move { .. } => {
                if let (true, Some(id)) = (changed, target) {
                    self.refresh_style(id);
                }
            }
            PointerEvent::Up { .. } | PointerEvent::Leave if idle => {
                self.finish(changed);
            }
            _ => {}
        }
    }

    fn on_key(&self, event: &KeyboardEvent) {
        if is_text_input(event.target()) {
            return;
        }
        let press = KeyPress::new(
            event.key(),
            Modifiers {
                shift: event.shift_key(),
                ctrl: event.ctrl_key(),
                alt: event.alt_key(),
                meta: event.meta_key(),
            },
        );
        let handled = self.editor.borrow_mut().handle_key(&press);
        if let Some(changed) = handled {
            event.prevent_default();
            self.finish(changed);
        }
    }
}

/// Keys typed into form fields belong to the field, not the canvas.
fn is_text_input(target: Option<EventTarget>) -> bool {
    let Some(element) = target.and_then(|t| t.dyn_into::<HtmlElement>().ok()) else {
        return false;
    };
    element.is_content_editable()
        || matches!(element.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT")
}

fn mouse_point(layout: &DomLayout, event: &Event) -> Option<(Point, Option<MouseButton>)> {
    let event = event.dyn_ref::<MouseEvent>()?;
    let point = layout.to_canvas(f64::from(event.client_x()), f64::from(event.client_y()));
    Some((point, MouseButton::from_dom(event.button())))
}

/// JavaScript handle for one mounted editor.
#[wasm_bindgen]
pub struct WebEditor {
    shared: Rc<Shared>,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl WebEditor {
    /// Mount an editor on the element with the given id.
    ///
    /// `config_json` is an optional partial [`EditorConfig`].
    pub fn mount(element_id: &str, config_json: Option<String>) -> Result<WebEditor, JsValue> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => EditorConfig::default(),
        };
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;
        let root = document
            .get_element_by_id(element_id)
            .ok_or_else(|| JsValue::from_str(&format!("No element with id {}", element_id)))?
            .dyn_into::<HtmlElement>()?;
        let editor = Editor::with_config(config);
        let root_style = root.style();
        for (property, value) in editor.canvas_style().iter() {
            root_style.set_property(property.css_name(), value)?;
        }

        let shared = Rc::new(Shared {
            editor: RefCell::new(editor),
            root: root.clone(),
            on_change: RefCell::new(None),
        });

        let root_target: EventTarget = root.into();
        let document_target: EventTarget = document.into();
        let mut listeners = Vec::new();

        let state = shared.clone();
        listeners.push(Listener::new(&root_target, "click", move |event| {
            state.on_click(&event);
        })?);

        let state = shared.clone();
        listeners.push(Listener::new(&root_target, "mousedown", move |event| {
            let Some((position, Some(button))) = mouse_point(&state.layout(), &event) else {
                return;
            };
            state.on_pointer(PointerEvent::Down { position, button });
            if state.editor.borrow().canvas().gesture().is_resizing() {
                event.prevent_default();
            }
        })?);

        let state = shared.clone();
        listeners.push(Listener::new(&root_target, "mousemove", move |event| {
            if let Some((position, _)) = mouse_point(&state.layout(), &event) {
                state.on_pointer(PointerEvent::Move { position });
            }
        })?);

        let state = shared.clone();
        listeners.push(Listener::new(&root_target, "mouseup", move |event| {
            if let Some((position, button)) = mouse_point(&state.layout(), &event) {
                state.on_pointer(PointerEvent::Up {
                    position,
                    button: button.unwrap_or(MouseButton::Left),
                });
            }
        })?);

        let state = shared.clone();
        listeners.push(Listener::new(&root_target, "mouseleave", move |_| {
            state.on_pointer(PointerEvent::Leave);
        })?);

        let state = shared.clone();
        listeners.push(Listener::new(&document_target, "keydown", move |event| {
            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                state.on_key(event);
            }
        })?);

        log::info!("Editor mounted on #{}", element_id);
        Ok(WebEditor {
            shared,
            _listeners: listeners,
        })
    }

    /// Register a callback run after every change to the canvas or selection.
    pub fn on_change(&self, callback: js_sys::Function) {
        *self.shared.on_change.borrow_mut() = Some(callback);
    }

    /// Import pasted markup.
    pub fn import_html(&self, html: &str) -> Result<(), JsValue> {
        self.shared
            .import(ImportSource::Pasted(html.to_string()))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Open a file picker and import the chosen file.
    pub fn open_file(&self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;
        let body = document.body().ok_or("No body")?;

        let input = document
            .create_element("input")?
            .dyn_into::<web_sys::HtmlInputElement>()?;
        input.set_type("file");
        input.set_accept(&accept_attribute());
        input.style().set_property("display", "none")?;

        let state = self.shared.clone();
        let input_clone = input.clone();
        let onchange = Closure::once(Box::new(move |_event: Event| {
            if let Some(file) = input_clone.files().and_then(|files| files.get(0)) {
                if let Err(e) = read_file(state, file) {
                    log::error!("Failed to read file: {:?}", e);
                }
            }
            input_clone.remove();
        }) as Box<dyn FnOnce(_)>);

        input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();

        body.append_child(&input)?;
        input.click();
        Ok(())
    }

    pub fn undo(&self) -> bool {
        let changed = self.shared.editor.borrow_mut().undo();
        self.shared.finish(changed)
    }

    pub fn redo(&self) -> bool {
        let changed = self.shared.editor.borrow_mut().redo();
        self.shared.finish(changed)
    }

    pub fn can_undo(&self) -> bool {
        self.shared.editor.borrow().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.shared.editor.borrow().can_redo()
    }

    /// Add a `text`, `image` or `box` element.
    pub fn add_element(&self, kind: &str) -> bool {
        let Some(kind) = ElementKind::from_name(kind) else {
            log::warn!("Unknown element kind: {}", kind);
            return false;
        };
        let added = self.shared.editor.borrow_mut().add_element(kind).is_some();
        self.shared.finish(added)
    }

    /// Edit one field of the selected element.
    pub fn set_property(&self, field: &str, value: &str) -> bool {
        let Some(edit) = PropertyEdit::parse(field, value) else {
            log::warn!("Ignoring {} = {:?}", field, value);
            return false;
        };
        let changed = self.shared.editor.borrow_mut().edit(&edit);
        self.shared.finish(changed)
    }

    /// Fields of the selected element, or `null`.
    pub fn selected_properties(&self) -> Result<JsValue, JsValue> {
        let layout = self.shared.layout();
        let properties = self.shared.editor.borrow().properties(&layout);
        serde_wasm_bindgen::to_value(&properties).map_err(JsValue::from)
    }

    pub fn deselect(&self) -> bool {
        let changed = self.shared.editor.borrow_mut().deselect();
        self.shared.finish(changed)
    }

    pub fn delete(&self) -> bool {
        let changed = self.shared.editor.borrow_mut().delete_selected();
        self.shared.finish(changed)
    }

    pub fn duplicate(&self) -> bool {
        let changed = self.shared.editor.borrow_mut().duplicate_selected().is_some();
        self.shared.finish(changed)
    }

    /// Download the poster as a standalone HTML file.
    pub fn download(&self) -> Result<bool, JsValue> {
        let Some(file) = self.shared.editor.borrow().export_file() else {
            return Ok(false);
        };
        download_file(&file.file_name, &file.contents, file.mime_type)?;
        Ok(true)
    }

    /// Copy the canvas markup to the clipboard.
    pub fn copy(&self) {
        let text = self.shared.editor.borrow().copy_markup();
        let state = self.shared.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let Some(window) = web_sys::window() else {
                return;
            };
            let promise = window.navigator().clipboard().write_text(&text);
            match wasm_bindgen_futures::JsFuture::from(promise).await {
                Ok(_) => {
                    state.editor.borrow_mut().mark_copied(Instant::now());
                    log::info!("Copied {} bytes of markup", text.len());
                    state.notify();
                }
                Err(e) => log::error!("Clipboard write failed: {:?}", e),
            }
        });
    }

    /// Whether the "copied" confirmation should be showing.
    pub fn copied(&self) -> bool {
        self.shared.editor.borrow().copied(Instant::now())
    }

    /// Clear the canvas after a confirmation prompt.
    pub fn clear(&self) -> bool {
        let confirm = |message: &str| {
            web_sys::window()
                .and_then(|window| window.confirm_with_message(message).ok())
                .unwrap_or(false)
        };
        let cleared = self.shared.editor.borrow_mut().clear_canvas(confirm);
        self.shared.finish(cleared)
    }

    /// Keyboard shortcut help text.
    pub fn shortcuts_help() -> String {
        ShortcutRegistry::help_text()
    }
}

fn read_file(state: Rc<Shared>, file: web_sys::File) -> Result<(), JsValue> {
    let name = file.name();
    let reader = web_sys::FileReader::new()?;
    let reader_clone = reader.clone();

    let onload = Closure::once(Box::new(move |_event: Event| {
        let contents = reader_clone.result().ok().and_then(|result| result.as_string());
        let source = match contents {
            Some(contents) => ImportSource::File { name, contents },
            None => {
                let e = ImportError::Read {
                    file: name,
                    reason: "file is not text".into(),
                };
                log::error!("{}", e);
                return;
            }
        };
        if let Err(e) = state.import(source) {
            log::error!("{}", e);
        }
    }) as Box<dyn FnOnce(_)>);

    let file_name = file.name();
    let onerror = Closure::once(Box::new(move |_event: Event| {
        let e = ImportError::Read {
            file: file_name,
            reason: "read failed".into(),
        };
        log::error!("{}", e);
    }) as Box<dyn FnOnce(_)>);

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onload.forget();
    onerror.forget();

    reader.read_as_text(&file)
}

fn download_file(filename: &str, content: &str, mime_type: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;

    let blob_parts = js_sys::Array::new();
    blob_parts.push(&JsValue::from_str(content));

    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime_type);

    let blob = web_sys::Blob::new_with_str_sequence_and_options(&blob_parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let a = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()?;
    a.set_href(&url);
    a.set_download(filename);
    a.click();

    web_sys::Url::revoke_object_url(&url)?;
    log::info!("Downloaded {}", filename);
    Ok(())
}
