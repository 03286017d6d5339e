// WASM bindings for the browser editor frontend.
//
// Exposes the editor as a single `Easel` class bound to a canvas element.
// All document state lives on the Rust side; JavaScript drives it with plain
// numbers, strings, and serde-converted objects.
//
// USAGE (JavaScript):
// ```javascript
// import init, { Easel } from 'easel-engine';
//
// await init();
// const easel = new Easel("canvas");
// easel.resize(canvas.width, canvas.height);
// easel.add_shape("rect", 40, 40);
// easel.render();
// ```

use wasm_bindgen::prelude::*;

use crate::document::Document;
use crate::editor::Editor;
use crate::element::ElementPatch;
use crate::renderer::Renderer;

/// Enable console.error() for panic messages in browser
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn err_to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct Easel {
    editor: Editor,
    renderer: Renderer,
}

#[wasm_bindgen]
impl Easel {
    /// Attach the engine to the canvas with the given DOM id.
    ///
    /// # Returns
    /// - `Result<Easel, JsValue>`: engine instance, or a message describing
    ///   why the canvas or WebGL2 context could not be acquired
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<Easel, JsValue> {
        let renderer = Renderer::new(canvas_id)?;
        Ok(Easel {
            editor: Editor::new(0, 0),
            renderer,
        })
    }

    /// Match the GL viewport and artboard to the canvas backing size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
        self.editor.resize_artboard(width, height);
    }

    /// Draw the current document state.
    pub fn render(&self) {
        self.renderer.render(&self.editor.scene());
    }

    // --- document interchange ---

    pub fn get_document(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.editor.document()).map_err(err_to_js)
    }

    pub fn load_document(&mut self, value: JsValue) -> Result<(), JsValue> {
        let document: Document = serde_wasm_bindgen::from_value(value).map_err(err_to_js)?;
        self.editor.load_document(document);
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, JsValue> {
        self.editor.save_json().map_err(err_to_js)
    }

    pub fn from_json(&mut self, json: &str) -> Result<(), JsValue> {
        self.editor.load_json(json).map_err(err_to_js)
    }

    // --- history ---

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    // --- element creation and mutation ---

    pub fn add_shape(&mut self, kind: &str, x: f32, y: f32) -> Result<u32, JsValue> {
        self.editor.add_shape(kind, x, y).map_err(err_to_js)
    }

    pub fn add_text(&mut self, content: &str, x: f32, y: f32) -> Result<u32, JsValue> {
        self.editor.add_text(content, x, y).map_err(err_to_js)
    }

    pub fn add_image(&mut self, source: &str, x: f32, y: f32) -> Result<u32, JsValue> {
        self.editor.add_image(source, x, y).map_err(err_to_js)
    }

    pub fn delete_element(&mut self, element_id: u32) -> bool {
        self.editor.delete_element(element_id)
    }

    /// Apply a partial update object (`{x?, y?, width?, height?, rotation?,
    /// name?, fill?, content?, font_size?}`) to an element.
    pub fn update_element(&mut self, element_id: u32, props: JsValue) -> Result<bool, JsValue> {
        let patch: ElementPatch = serde_wasm_bindgen::from_value(props).map_err(err_to_js)?;
        self.editor.apply_patch(element_id, &patch).map_err(err_to_js)
    }

    /// Position the working rectangle, creating it on first use.
    pub fn set_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> u32 {
        self.editor.set_primary_rect(x, y, width, height)
    }

    pub fn reorder_element(&mut self, element_id: u32, new_index: usize) -> bool {
        self.editor.reorder_element(element_id, new_index)
    }

    // --- tool and selection state ---

    pub fn set_active_tool(&mut self, tool: &str) -> Result<(), JsValue> {
        self.editor.set_active_tool(tool).map_err(err_to_js)
    }

    pub fn set_active_shape(&mut self, kind: &str) -> Result<(), JsValue> {
        self.editor.set_active_shape(kind).map_err(err_to_js)
    }

    pub fn get_selected_id(&self) -> Option<u32> {
        self.editor.selected()
    }

    pub fn select_at(&mut self, x: f32, y: f32) -> Option<u32> {
        self.editor.select_at(x, y)
    }

    pub fn select_element(&mut self, element_id: u32) -> bool {
        self.editor.select(element_id)
    }

    // --- drag-transform session ---

    pub fn begin_transform(&mut self) -> bool {
        self.editor.begin_transform()
    }

    pub fn update_selected_transform(&mut self, x: f32, y: f32, width: f32, height: f32) -> bool {
        self.editor.update_transform(x, y, width, height)
    }

    pub fn update_selected_text_size(&mut self, font_size: f32) -> bool {
        self.editor.set_text_size(font_size)
    }

    pub fn commit_transform(&mut self) -> bool {
        self.editor.commit_transform()
    }

    // --- layers and artboard ---

    pub fn add_layer(&mut self, name: &str) -> u32 {
        self.editor.add_layer(name)
    }

    pub fn set_layer_visible(&mut self, layer_id: u32, visible: bool) -> bool {
        self.editor.set_layer_visible(layer_id, visible)
    }

    pub fn set_layer_locked(&mut self, layer_id: u32, locked: bool) -> bool {
        self.editor.set_layer_locked(layer_id, locked)
    }

    pub fn set_active_layer(&mut self, layer_id: u32) -> bool {
        self.editor.set_active_layer(layer_id)
    }

    pub fn set_background(&mut self, hex: &str) -> Result<(), JsValue> {
        self.editor.set_background_hex(hex).map_err(err_to_js)
    }
}
