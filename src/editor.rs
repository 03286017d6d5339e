//! Editor state machine: the document plus everything interactive around it.
//!
//! Owns the selection, the active tool, the undo/redo history, and the
//! drag-transform session. Everything here is host Rust; the wasm surface is a
//! thin forwarding layer, so the interactive behavior is testable off-browser.

use crate::color::Color;
use crate::document::Document;
use crate::element::{Element, ElementKind, ElementPatch, ImageData, ShapeData, ShapeKind, TextData};
use crate::error::{EngineError, EngineResult};
use crate::geometry::{Transform, MIN_EXTENT};
use crate::history::{Edit, History};
use crate::scene::{self, Scene};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    Select,
    Shape,
    Text,
    Image,
}

impl Tool {
    pub fn parse(name: &str) -> EngineResult<Self> {
        match name {
            "select" => Ok(Tool::Select),
            "shape" => Ok(Tool::Shape),
            "text" => Ok(Tool::Text),
            "image" => Ok(Tool::Image),
            _ => Err(EngineError::UnknownTool(name.to_string())),
        }
    }
}

/// Element snapshot taken when a drag gesture starts.
#[derive(Clone, Debug)]
struct TransformSession {
    element_id: u32,
    before: Element,
}

pub struct Editor {
    document: Document,
    history: History,
    selected: Option<u32>,
    active_tool: Tool,
    active_shape: ShapeKind,
    session: Option<TransformSession>,
}

impl Editor {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            document: Document::new(width, height),
            history: History::new(),
            selected: None,
            active_tool: Tool::Select,
            active_shape: ShapeKind::Rect,
            session: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Snapshot the current frame's draw data.
    pub fn scene(&self) -> Scene {
        scene::build(&self.document, self.selected)
    }

    // ------------------------------------------------------------------
    // Tool state
    // ------------------------------------------------------------------

    pub fn set_active_tool(&mut self, name: &str) -> EngineResult<()> {
        self.active_tool = Tool::parse(name)?;
        Ok(())
    }

    pub fn active_tool(&self) -> Tool {
        self.active_tool
    }

    pub fn set_active_shape(&mut self, name: &str) -> EngineResult<()> {
        self.active_shape = ShapeKind::parse(name)?;
        Ok(())
    }

    pub fn active_shape(&self) -> ShapeKind {
        self.active_shape
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    /// Hit-test and select; clicking empty space clears the selection.
    pub fn select_at(&mut self, x: f32, y: f32) -> Option<u32> {
        let hit = self.document.hit_test(x, y);
        self.selected = hit;
        hit
    }

    pub fn select(&mut self, element_id: u32) -> bool {
        if self.document.element(element_id).is_some() {
            self.selected = Some(element_id);
            true
        } else {
            false
        }
    }

    /// When the selected element has vanished (undo, delete, replaced
    /// document), fall back to the first shape.
    fn sync_selection(&mut self) {
        if let Some(element_id) = self.selected {
            if self.document.element(element_id).is_none() {
                self.selected = self.document.first_shape();
            }
        }
    }

    // ------------------------------------------------------------------
    // Element creation
    // ------------------------------------------------------------------

    fn insert_new(&mut self, element: Element) -> EngineResult<u32> {
        let element_id = element.id;
        let layer_id = self.document.active_layer;
        let index = self
            .document
            .push_element(layer_id, element.clone())
            .ok_or(EngineError::LayerNotFound(layer_id))?;
        self.history.record(Edit::Insert {
            layer_id,
            index,
            element,
        });
        self.selected = Some(element_id);
        Ok(element_id)
    }

    pub fn add_shape(&mut self, kind: &str, x: f32, y: f32) -> EngineResult<u32> {
        let kind = ShapeKind::parse(kind)?;
        let id = self.document.allocate_id();
        let element = Element::shape(
            id,
            "Shape",
            ShapeData::with_kind(kind),
            Transform::new(x, y, 160.0, 120.0),
        );
        self.insert_new(element)
    }

    pub fn add_text(&mut self, content: &str, x: f32, y: f32) -> EngineResult<u32> {
        let id = self.document.allocate_id();
        let element = Element::text(
            id,
            "Text",
            TextData::new(content),
            Transform::new(x, y, 240.0, 80.0),
        );
        self.insert_new(element)
    }

    pub fn add_image(&mut self, source: &str, x: f32, y: f32) -> EngineResult<u32> {
        let id = self.document.allocate_id();
        let element = Element::image(
            id,
            "Image",
            ImageData::new(source),
            Transform::new(x, y, 320.0, 200.0),
        );
        self.insert_new(element)
    }

    // ------------------------------------------------------------------
    // Element mutation
    // ------------------------------------------------------------------

    pub fn delete_element(&mut self, element_id: u32) -> bool {
        if let Some((layer_id, index, element)) = self.document.remove_element(element_id) {
            self.history.record(Edit::Remove {
                layer_id,
                index,
                element,
            });
            if self.selected == Some(element_id) {
                self.selected = self.document.first_shape();
            }
            true
        } else {
            false
        }
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selected {
            Some(element_id) => self.delete_element(element_id),
            None => false,
        }
    }

    /// Apply a partial update and record it. `Ok(false)` means the id is
    /// unknown; a bad patch (unparseable fill) is an error and changes
    /// nothing.
    pub fn apply_patch(&mut self, element_id: u32, patch: &ElementPatch) -> EngineResult<bool> {
        match self.document.apply_patch(element_id, patch)? {
            Some((layer_id, index, before, after)) => {
                self.history.record(Edit::Update {
                    layer_id,
                    index,
                    before,
                    after,
                });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Position the working rectangle: the selected element when there is
    /// one, otherwise the document's first shape (created on demand). Not
    /// recorded in history; this backs a live preview control.
    pub fn set_primary_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> u32 {
        let transform = Transform::new(x, y, width.max(MIN_EXTENT), height.max(MIN_EXTENT));
        let element_id = match self.selected {
            Some(element_id) if self.document.set_transform(element_id, transform) => element_id,
            _ => self.document.ensure_primary_shape(transform),
        };
        self.selected = Some(element_id);
        element_id
    }

    /// Move an element to a new position within its layer.
    pub fn reorder_element(&mut self, element_id: u32, new_index: usize) -> bool {
        if let Some((layer_id, from, to)) = self.document.reorder_element(element_id, new_index) {
            self.history.record(Edit::Reorder { layer_id, from, to });
            true
        } else {
            false
        }
    }

    pub fn reorder_selected(&mut self, new_index: usize) -> bool {
        match self.selected {
            Some(element_id) => self.reorder_element(element_id, new_index),
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Drag-transform session
    // ------------------------------------------------------------------

    /// Start a gesture on the selected element. The snapshot taken here is
    /// what commit compares against, so the whole drag collapses into one
    /// history entry.
    pub fn begin_transform(&mut self) -> bool {
        let element_id = match self.selected {
            Some(element_id) => element_id,
            None => return false,
        };
        let before = match self.document.element(element_id) {
            Some(element) => element.clone(),
            None => return false,
        };
        self.session = Some(TransformSession { element_id, before });
        true
    }

    /// Live move/resize of the selected element. No history entry.
    pub fn update_transform(&mut self, x: f32, y: f32, width: f32, height: f32) -> bool {
        let element_id = match self.selected {
            Some(element_id) => element_id,
            None => return false,
        };
        if let Some(element) = self.document.element_mut(element_id) {
            element.transform.x = x;
            element.transform.y = y;
            element.transform.width = width.max(MIN_EXTENT);
            element.transform.height = height.max(MIN_EXTENT);
            true
        } else {
            false
        }
    }

    /// Live font-size change of the selected text element. No history entry.
    pub fn set_text_size(&mut self, font_size: f32) -> bool {
        let element_id = match self.selected {
            Some(element_id) => element_id,
            None => return false,
        };
        if let Some(element) = self.document.element_mut(element_id) {
            if let ElementKind::Text(text) = &mut element.kind {
                text.font_size = font_size.max(1.0);
                return true;
            }
        }
        false
    }

    /// End the gesture. Records a single update if the transform actually
    /// changed since [`Editor::begin_transform`]; otherwise the snapshot is
    /// discarded without touching history.
    pub fn commit_transform(&mut self) -> bool {
        let session = match self.session.take() {
            Some(session) => session,
            None => return false,
        };
        let after = match self.document.element(session.element_id) {
            Some(element) => element.clone(),
            None => return false,
        };
        if session.before.transform == after.transform {
            return false;
        }
        if let Some((layer_id, index)) = self.document.locate(session.element_id) {
            self.history.record(Edit::Update {
                layer_id,
                index,
                before: session.before,
                after,
            });
            true
        } else {
            false
        }
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        let changed = self.history.undo(&mut self.document);
        if changed {
            self.sync_selection();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.history.redo(&mut self.document);
        if changed {
            self.sync_selection();
        }
        changed
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Layers and artboard
    // ------------------------------------------------------------------

    pub fn add_layer(&mut self, name: &str) -> u32 {
        self.document.add_layer(name)
    }

    pub fn set_layer_visible(&mut self, layer_id: u32, visible: bool) -> bool {
        self.document.set_layer_visible(layer_id, visible)
    }

    pub fn set_layer_locked(&mut self, layer_id: u32, locked: bool) -> bool {
        self.document.set_layer_locked(layer_id, locked)
    }

    pub fn set_active_layer(&mut self, layer_id: u32) -> bool {
        self.document.set_active_layer(layer_id)
    }

    pub fn resize_artboard(&mut self, width: u32, height: u32) {
        self.document.resize_artboard(width, height);
    }

    pub fn set_background_hex(&mut self, hex: &str) -> EngineResult<()> {
        let color = Color::from_hex(hex)?;
        self.document.set_background(color);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Interchange
    // ------------------------------------------------------------------

    /// Install a replacement document: derived state is rebuilt, history is
    /// wiped, and the first shape (if any) becomes the selection.
    pub fn load_document(&mut self, mut document: Document) {
        document.recover_next_id();
        self.document = document;
        self.history.clear();
        self.session = None;
        self.selected = self.document.first_shape();
    }

    pub fn load_json(&mut self, json: &str) -> EngineResult<()> {
        let document = Document::from_json(json)?;
        self.load_document(document);
        Ok(())
    }

    pub fn save_json(&self) -> EngineResult<String> {
        self.document.to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> Editor {
        Editor::new(800, 600)
    }

    #[test]
    fn test_tool_parsing() {
        assert_eq!(Tool::parse("select").unwrap(), Tool::Select);
        assert_eq!(Tool::parse("image").unwrap(), Tool::Image);
        assert!(matches!(
            Tool::parse("lasso"),
            Err(EngineError::UnknownTool(_))
        ));
    }

    #[test]
    fn test_active_tool_and_shape_state() {
        let mut ed = editor();
        assert_eq!(ed.active_tool(), Tool::Select);

        ed.set_active_tool("shape").unwrap();
        ed.set_active_shape("polygon").unwrap();
        assert_eq!(ed.active_tool(), Tool::Shape);
        assert_eq!(ed.active_shape(), ShapeKind::Polygon);

        // A rejected name leaves the previous state in place.
        assert!(ed.set_active_shape("star").is_err());
        assert_eq!(ed.active_shape(), ShapeKind::Polygon);
    }

    #[test]
    fn test_add_shape_defaults_and_selection() {
        let mut ed = editor();
        let id = ed.add_shape("ellipse", 30.0, 40.0).unwrap();
        assert_eq!(ed.selected(), Some(id));

        let element = ed.document().element(id).unwrap();
        assert_eq!(element.name, "Shape");
        assert_eq!(element.transform.width, 160.0);
        assert_eq!(element.transform.height, 120.0);
        match &element.kind {
            ElementKind::Shape(data) => assert_eq!(data.kind, ShapeKind::Ellipse),
            other => panic!("expected shape, got {other:?}"),
        }
    }

    #[test]
    fn test_add_text_and_image_defaults() {
        let mut ed = editor();
        let text = ed.add_text("hello", 0.0, 0.0).unwrap();
        let image = ed.add_image("blob:x", 0.0, 0.0).unwrap();

        assert_eq!(ed.document().transform(text).unwrap().width, 240.0);
        assert_eq!(ed.document().transform(image).unwrap().width, 320.0);
        assert_eq!(ed.selected(), Some(image));
    }

    #[test]
    fn test_add_shape_rejects_unknown_kind() {
        let mut ed = editor();
        assert!(ed.add_shape("blob", 0.0, 0.0).is_err());
        assert_eq!(ed.document().element_count(), 0);
    }

    #[test]
    fn test_delete_falls_back_to_first_shape() {
        let mut ed = editor();
        let first = ed.add_shape("rect", 0.0, 0.0).unwrap();
        let second = ed.add_shape("rect", 200.0, 0.0).unwrap();
        assert_eq!(ed.selected(), Some(second));

        assert!(ed.delete_selected());
        assert_eq!(ed.selected(), Some(first));
    }

    #[test]
    fn test_undo_insert_repairs_selection() {
        let mut ed = editor();
        let first = ed.add_shape("rect", 0.0, 0.0).unwrap();
        let second = ed.add_shape("rect", 200.0, 0.0).unwrap();
        assert_eq!(ed.selected(), Some(second));

        assert!(ed.undo());
        assert_eq!(ed.selected(), Some(first));
        assert!(ed.redo());
        assert!(ed.document().element(second).is_some());
    }

    #[test]
    fn test_patch_records_undoable_update() {
        let mut ed = editor();
        let id = ed.add_shape("rect", 10.0, 10.0).unwrap();

        let patch = ElementPatch {
            x: Some(99.0),
            ..ElementPatch::default()
        };
        assert!(ed.apply_patch(id, &patch).unwrap());
        assert_eq!(ed.document().transform(id).unwrap().x, 99.0);

        assert!(ed.undo());
        assert_eq!(ed.document().transform(id).unwrap().x, 10.0);
    }

    #[test]
    fn test_patch_unknown_id_is_false() {
        let mut ed = editor();
        let patch = ElementPatch::default();
        assert!(!ed.apply_patch(404, &patch).unwrap());
    }

    #[test]
    fn test_primary_rect_creates_then_reuses() {
        let mut ed = editor();
        let id = ed.set_primary_rect(5.0, 6.0, 100.0, 50.0);
        assert_eq!(ed.document().element_count(), 1);
        assert_eq!(ed.selected(), Some(id));
        assert!(!ed.can_undo());

        let again = ed.set_primary_rect(50.0, 60.0, 10.0, 10.0);
        assert_eq!(again, id);
        assert_eq!(ed.document().element_count(), 1);
        assert_eq!(ed.document().transform(id).unwrap().x, 50.0);
    }

    #[test]
    fn test_primary_rect_clamps_size() {
        let mut ed = editor();
        let id = ed.set_primary_rect(0.0, 0.0, 0.0, -5.0);
        let t = ed.document().transform(id).unwrap();
        assert_eq!(t.width, 1.0);
        assert_eq!(t.height, 1.0);
    }

    #[test]
    fn test_transform_session_records_once() {
        let mut ed = editor();
        let id = ed.add_shape("rect", 0.0, 0.0).unwrap();

        assert!(ed.begin_transform());
        assert!(ed.update_transform(10.0, 0.0, 160.0, 120.0));
        assert!(ed.update_transform(20.0, 0.0, 160.0, 120.0));
        assert!(ed.update_transform(30.0, 0.0, 160.0, 120.0));
        assert!(ed.commit_transform());

        // One undo covers the whole gesture.
        assert!(ed.undo());
        assert_eq!(ed.document().transform(id).unwrap().x, 0.0);
    }

    #[test]
    fn test_unchanged_session_records_nothing() {
        let mut ed = editor();
        ed.add_shape("rect", 0.0, 0.0).unwrap();

        assert!(ed.begin_transform());
        assert!(!ed.commit_transform());

        // Only the insert should be on the stack.
        assert!(ed.undo());
        assert!(!ed.can_undo());
    }

    #[test]
    fn test_session_requires_selection() {
        let mut ed = editor();
        assert!(!ed.begin_transform());
        assert!(!ed.update_transform(0.0, 0.0, 10.0, 10.0));
        assert!(!ed.commit_transform());
    }

    #[test]
    fn test_text_size_is_live_and_clamped() {
        let mut ed = editor();
        let id = ed.add_text("hi", 0.0, 0.0).unwrap();

        assert!(ed.set_text_size(48.0));
        assert!(ed.set_text_size(0.0));
        match &ed.document().element(id).unwrap().kind {
            ElementKind::Text(text) => assert_eq!(text.font_size, 1.0),
            other => panic!("expected text, got {other:?}"),
        }

        // Shapes refuse font-size changes.
        ed.add_shape("rect", 0.0, 0.0).unwrap();
        assert!(!ed.set_text_size(12.0));
    }

    #[test]
    fn test_select_at_uses_topmost() {
        let mut ed = editor();
        let bottom = ed.add_shape("rect", 0.0, 0.0).unwrap();
        let top = ed.add_shape("rect", 100.0, 50.0).unwrap();

        assert_eq!(ed.select_at(120.0, 60.0), Some(top));
        assert_eq!(ed.select_at(10.0, 10.0), Some(bottom));
        assert_eq!(ed.select_at(5000.0, 5000.0), None);
        assert_eq!(ed.selected(), None);
    }

    #[test]
    fn test_reorder_selected_is_undoable() {
        let mut ed = editor();
        let a = ed.add_shape("rect", 0.0, 0.0).unwrap();
        let _b = ed.add_shape("rect", 0.0, 0.0).unwrap();
        assert!(ed.select(a));
        assert!(ed.reorder_selected(1));

        let layer = &ed.document().layers[0];
        assert_eq!(layer.elements[1].id, a);

        assert!(ed.undo());
        assert_eq!(ed.document().layers[0].elements[0].id, a);
    }

    #[test]
    fn test_load_document_resets_state() {
        let mut ed = editor();
        ed.add_shape("rect", 0.0, 0.0).unwrap();
        let json = ed.save_json().unwrap();

        let mut other = editor();
        other.add_text("x", 0.0, 0.0).unwrap();
        other.load_json(&json).unwrap();

        assert!(!other.can_undo());
        assert_eq!(other.document().element_count(), 1);
        let selected = other.selected().unwrap();
        assert!(matches!(
            other.document().element(selected).unwrap().kind,
            ElementKind::Shape(_)
        ));
    }

    #[test]
    fn test_set_background_hex() {
        let mut ed = editor();
        ed.set_background_hex("#101214").unwrap();
        assert!(ed.set_background_hex("nope").is_err());
        let bg = ed.document().artboard.background;
        assert!((bg.r - 0x10 as f32 / 255.0).abs() < 1e-6);
    }
}
