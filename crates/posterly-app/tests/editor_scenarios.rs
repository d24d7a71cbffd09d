//! End-to-end editing sessions against the public editor API.

use kurbo::Point;
use posterly_app::Editor;
use posterly_core::{
    ElementKind, ImportSource, InlineLayout, MouseButton, NodeId, PointerEvent, StyleProperty,
};

fn import(editor: &mut Editor, html: &str) {
    editor
        .import(ImportSource::Pasted(html.to_string()))
        .expect("import");
}

fn first_root(editor: &Editor) -> NodeId {
    editor.canvas().document().roots()[0]
}

fn style(editor: &Editor, id: NodeId, property: StyleProperty) -> Option<String> {
    editor
        .canvas()
        .document()
        .element(id)
        .and_then(|e| e.style.get(&property).map(str::to_string))
}

fn gesture(editor: &mut Editor, from: Point, to: Point) -> bool {
    let layout = InlineLayout;
    editor.handle_pointer(
        PointerEvent::Down {
            position: from,
            button: MouseButton::Left,
        },
        &layout,
    );
    editor.handle_pointer(PointerEvent::Move { position: to }, &layout);
    editor.handle_pointer(
        PointerEvent::Up {
            position: to,
            button: MouseButton::Left,
        },
        &layout,
    )
}

#[test]
fn drag_from_center_moves_by_delta_and_records_once() {
    let mut editor = Editor::new();
    import(&mut editor, r#"<div style="width:50px;height:50px"></div>"#);
    let id = first_root(&editor);
    assert!(editor.select(id));

    assert!(gesture(&mut editor, Point::new(25.0, 25.0), Point::new(55.0, 65.0)));

    assert_eq!(style(&editor, id, StyleProperty::Position).as_deref(), Some("absolute"));
    assert_eq!(style(&editor, id, StyleProperty::Left).as_deref(), Some("30px"));
    assert_eq!(style(&editor, id, StyleProperty::Top).as_deref(), Some("40px"));
    assert_eq!(editor.history().len(), 2);
    assert!(editor.can_undo());
}

#[test]
fn drag_is_relative_to_grab_position() {
    let mut editor = Editor::new();
    import(
        &mut editor,
        r#"<div style="position: absolute; left: 100px; top: 80px; width: 60px; height: 60px;"></div>"#,
    );
    let id = first_root(&editor);
    editor.select(id);

    gesture(&mut editor, Point::new(110.0, 90.0), Point::new(100.0, 130.0));

    assert_eq!(style(&editor, id, StyleProperty::Left).as_deref(), Some("90px"));
    assert_eq!(style(&editor, id, StyleProperty::Top).as_deref(), Some("120px"));
}

#[test]
fn leaving_the_canvas_ends_a_drag_with_one_snapshot() {
    let mut editor = Editor::new();
    import(&mut editor, r#"<div style="width:50px;height:50px"></div>"#);
    let id = first_root(&editor);
    editor.select(id);
    let layout = InlineLayout;

    editor.handle_pointer(
        PointerEvent::Down {
            position: Point::new(25.0, 25.0),
            button: MouseButton::Left,
        },
        &layout,
    );
    editor.handle_pointer(PointerEvent::Move { position: Point::new(40.0, 30.0) }, &layout);
    editor.handle_pointer(PointerEvent::Move { position: Point::new(45.0, 35.0) }, &layout);
    assert!(editor.handle_pointer(PointerEvent::Leave, &layout));

    assert!(editor.canvas().gesture().is_idle());
    assert_eq!(style(&editor, id, StyleProperty::Left).as_deref(), Some("20px"));
    assert_eq!(style(&editor, id, StyleProperty::Top).as_deref(), Some("10px"));
    assert_eq!(editor.history().len(), 2);

    // A later release or leave has nothing left to record.
    assert!(!editor.handle_pointer(PointerEvent::Leave, &layout));
    assert!(!editor.handle_pointer(
        PointerEvent::Up {
            position: Point::new(45.0, 35.0),
            button: MouseButton::Left,
        },
        &layout,
    ));
    assert_eq!(editor.history().len(), 2);
}

#[test]
fn resize_never_goes_below_minimum() {
    let mut editor = Editor::new();
    import(
        &mut editor,
        r#"<div style="left: 0px; top: 0px; width: 100px; height: 100px;"></div>"#,
    );
    let id = first_root(&editor);
    editor.select(id);

    assert!(gesture(&mut editor, Point::new(95.0, 95.0), Point::new(0.0, 140.0)));

    assert_eq!(style(&editor, id, StyleProperty::Width).as_deref(), Some("50px"));
    assert_eq!(style(&editor, id, StyleProperty::Height).as_deref(), Some("145px"));
    assert_eq!(editor.history().len(), 2);
}

#[test]
fn gesture_without_selection_does_nothing() {
    let mut editor = Editor::new();
    import(&mut editor, r#"<div style="width:50px;height:50px"></div>"#);
    assert!(!gesture(&mut editor, Point::new(25.0, 25.0), Point::new(55.0, 65.0)));
    assert_eq!(editor.history().len(), 1);
    assert_eq!(editor.canvas().markup(), r#"<div style="width: 50px; height: 50px;"></div>"#);
}

#[test]
fn undo_with_single_entry_is_noop() {
    let mut editor = Editor::new();
    import(&mut editor, "<p>only</p>");
    assert!(!editor.undo());
    assert!(!editor.can_undo());
    assert_eq!(editor.canvas().markup(), "<p>only</p>");
}

#[test]
fn new_action_after_undo_discards_redo() {
    let mut editor = Editor::new();
    import(&mut editor, "<div></div>");
    editor.add_element(ElementKind::Box);
    editor.add_element(ElementKind::Text);
    assert_eq!(editor.history().len(), 3);

    assert!(editor.undo());
    assert!(editor.can_redo());
    editor.add_element(ElementKind::Image);

    assert_eq!(editor.history().len(), 3);
    assert!(!editor.can_redo());
    assert!(editor.canvas().markup().contains("<img"));
    assert!(!editor.canvas().markup().contains("New Text"));
}

#[test]
fn export_and_copy_carry_live_markup_without_selection() {
    let mut editor = Editor::new();
    import(&mut editor, r#"<h1 style="color: red;">Sale</h1>"#);
    editor.select(first_root(&editor));

    let markup = editor.canvas().markup();
    assert!(!markup.contains("outline"));
    assert!(!markup.contains("data-selected"));

    let file = editor.export_file().expect("canvas has content");
    assert_eq!(file.file_name, "poster.html");
    assert_eq!(file.mime_type, "text/html");
    assert!(file.contents.starts_with("<!DOCTYPE html>"));
    assert!(file.contents.contains("width: 720px;"));
    assert!(file.contents.contains(&format!(
        "<div class=\"poster-container\">\n    {}\n  </div>",
        markup
    )));
    assert_eq!(editor.copy_markup(), markup);
}

#[test]
fn selection_overlay_is_render_only() {
    let mut editor = Editor::new();
    import(&mut editor, r#"<div style="width: 10px;"></div>"#);
    let id = first_root(&editor);
    editor.select(id);

    let rendered = editor.canvas().render_markup();
    assert!(rendered.contains(r#"data-selected="true""#));
    assert!(rendered.contains("outline-offset: 2px;"));

    editor.save_state();
    assert!(!editor.history().current().unwrap_or_default().contains("outline"));
}
