//! Document model: an artboard, ordered layers, and the operations the editor
//! and history replay against.
//!
//! Paint order is layers first-to-last, elements within a layer first-to-last;
//! later paints on top. Hit-testing walks the same order in reverse so the
//! topmost element wins.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::element::{Element, ElementKind, ElementPatch, ShapeData};
use crate::error::EngineResult;
use crate::geometry::Transform;

/// The fixed drawing surface a document is laid out on.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Artboard {
    pub width: u32,
    pub height: u32,
    pub background: Color,
}

impl Artboard {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Color::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Layer {
    pub id: u32,
    pub name: String,
    pub visible: bool,
    pub locked: bool,
    pub elements: Vec<Element>,
}

impl Layer {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            locked: false,
            elements: Vec::new(),
        }
    }
}

/// A complete design document.
///
/// Layer and element ids come from one shared counter, so an id identifies an
/// element across the whole document. The counter itself is derived state: it
/// is not serialized, and [`Document::recover_next_id`] restores it (and a
/// missing base layer) after loading foreign data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    pub artboard: Artboard,
    pub layers: Vec<Layer>,
    pub active_layer: u32,
    #[serde(skip)]
    next_id: u32,
}

impl Document {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            artboard: Artboard::new(width, height),
            layers: vec![Layer::new(1, "Layer 1")],
            active_layer: 1,
            next_id: 2,
        }
    }

    pub fn resize_artboard(&mut self, width: u32, height: u32) {
        self.artboard.width = width;
        self.artboard.height = height;
    }

    pub fn set_background(&mut self, background: Color) {
        self.artboard.background = background;
    }

    /// Hand out the next free id.
    pub fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Rebuild the id counter from the ids actually present, and repair a
    /// document with no layers or a dangling active-layer reference.
    pub fn recover_next_id(&mut self) {
        let mut max_id = 0;
        for layer in &self.layers {
            max_id = max_id.max(layer.id);
            for element in &layer.elements {
                max_id = max_id.max(element.id);
            }
        }
        self.next_id = max_id.saturating_add(1);

        if self.layers.is_empty() {
            let id = self.allocate_id();
            self.layers.push(Layer::new(id, "Layer 1"));
            self.active_layer = id;
        } else if !self.layers.iter().any(|l| l.id == self.active_layer) {
            self.active_layer = self.layers[0].id;
        }
    }

    // ------------------------------------------------------------------
    // Layers
    // ------------------------------------------------------------------

    pub fn add_layer(&mut self, name: impl Into<String>) -> u32 {
        let id = self.allocate_id();
        self.layers.push(Layer::new(id, name));
        id
    }

    pub fn layer(&self, layer_id: u32) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == layer_id)
    }

    fn layer_mut(&mut self, layer_id: u32) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == layer_id)
    }

    pub fn set_layer_visible(&mut self, layer_id: u32, visible: bool) -> bool {
        match self.layer_mut(layer_id) {
            Some(layer) => {
                layer.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn set_layer_locked(&mut self, layer_id: u32, locked: bool) -> bool {
        match self.layer_mut(layer_id) {
            Some(layer) => {
                layer.locked = locked;
                true
            }
            None => false,
        }
    }

    /// Switch the target layer for new elements. Refused when the layer does
    /// not exist, so the active reference can never dangle.
    pub fn set_active_layer(&mut self, layer_id: u32) -> bool {
        if self.layers.iter().any(|l| l.id == layer_id) {
            self.active_layer = layer_id;
            true
        } else {
            false
        }
    }

    // ------------------------------------------------------------------
    // Elements
    // ------------------------------------------------------------------

    /// Insert at a position (clamped to the layer length).
    pub fn insert_element(&mut self, layer_id: u32, index: usize, element: Element) -> bool {
        match self.layer_mut(layer_id) {
            Some(layer) => {
                let index = index.min(layer.elements.len());
                layer.elements.insert(index, element);
                true
            }
            None => false,
        }
    }

    /// Append to a layer, returning the index the element landed at.
    pub fn push_element(&mut self, layer_id: u32, element: Element) -> Option<usize> {
        let layer = self.layer_mut(layer_id)?;
        let index = layer.elements.len();
        layer.elements.push(element);
        Some(index)
    }

    pub fn remove_element(&mut self, element_id: u32) -> Option<(u32, usize, Element)> {
        for layer in &mut self.layers {
            if let Some(index) = layer.elements.iter().position(|e| e.id == element_id) {
                let element = layer.elements.remove(index);
                return Some((layer.id, index, element));
            }
        }
        None
    }

    /// Replace wherever the id currently lives.
    pub fn replace_element(&mut self, element_id: u32, element: Element) -> bool {
        for layer in &mut self.layers {
            if let Some(index) = layer.elements.iter().position(|e| e.id == element_id) {
                layer.elements[index] = element;
                return true;
            }
        }
        false
    }

    /// Replace at a remembered position when the id still matches there,
    /// falling back to an id search otherwise. History replay uses this so
    /// stale indices degrade gracefully instead of clobbering a neighbor.
    pub fn replace_element_at(&mut self, layer_id: u32, index: usize, element: Element) -> bool {
        if let Some(layer) = self.layer_mut(layer_id) {
            if index < layer.elements.len() && layer.elements[index].id == element.id {
                layer.elements[index] = element;
                return true;
            }
        }
        self.replace_element(element.id, element)
    }

    pub fn element(&self, element_id: u32) -> Option<&Element> {
        self.layers
            .iter()
            .flat_map(|l| l.elements.iter())
            .find(|e| e.id == element_id)
    }

    pub fn element_mut(&mut self, element_id: u32) -> Option<&mut Element> {
        self.layers
            .iter_mut()
            .flat_map(|l| l.elements.iter_mut())
            .find(|e| e.id == element_id)
    }

    /// Where an element currently sits: `(layer_id, index)`.
    pub fn locate(&self, element_id: u32) -> Option<(u32, usize)> {
        for layer in &self.layers {
            if let Some(index) = layer.elements.iter().position(|e| e.id == element_id) {
                return Some((layer.id, index));
            }
        }
        None
    }

    pub fn set_transform(&mut self, element_id: u32, transform: Transform) -> bool {
        match self.element_mut(element_id) {
            Some(element) => {
                element.transform = transform;
                true
            }
            None => false,
        }
    }

    pub fn transform(&self, element_id: u32) -> Option<Transform> {
        self.element(element_id).map(|e| e.transform)
    }

    /// Apply a patch, returning the before/after snapshots history needs.
    ///
    /// The patch runs against a copy, so a rejected patch (bad fill color)
    /// leaves the document untouched. `Ok(None)` means the id is unknown.
    pub fn apply_patch(
        &mut self,
        element_id: u32,
        patch: &ElementPatch,
    ) -> EngineResult<Option<(u32, usize, Element, Element)>> {
        for layer in &mut self.layers {
            if let Some(index) = layer.elements.iter().position(|e| e.id == element_id) {
                let before = layer.elements[index].clone();
                let mut after = before.clone();
                patch.apply_to(&mut after)?;
                layer.elements[index] = after.clone();
                return Ok(Some((layer.id, index, before, after)));
            }
        }
        Ok(None)
    }

    /// First shape element in paint order, if any.
    pub fn first_shape(&self) -> Option<u32> {
        self.layers
            .iter()
            .flat_map(|l| l.elements.iter())
            .find(|e| matches!(e.kind, ElementKind::Shape(_)))
            .map(|e| e.id)
    }

    /// Reposition the first shape, or create a default rectangle when the
    /// document has none yet. Falls back to a fresh layer if the active layer
    /// reference was broken by direct field manipulation.
    pub fn ensure_primary_shape(&mut self, transform: Transform) -> u32 {
        if let Some(id) = self.first_shape() {
            self.set_transform(id, transform);
            return id;
        }

        let id = self.allocate_id();
        let element = Element::shape(id, "Rectangle", ShapeData::rectangle(), transform);
        let layer_id = self.active_layer;
        if self.push_element(layer_id, element.clone()).is_none() {
            let layer_id = self.add_layer("Layer 1");
            self.active_layer = layer_id;
            self.push_element(layer_id, element);
        }
        id
    }

    /// Topmost element under the point. Hidden layers are invisible to the
    /// cursor; locked layers are painted but not selectable.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<u32> {
        for layer in self.layers.iter().rev() {
            if !layer.visible || layer.locked {
                continue;
            }
            for element in layer.elements.iter().rev() {
                if element.transform.rect().contains(x, y) {
                    return Some(element.id);
                }
            }
        }
        None
    }

    /// Move an element between exact positions within a layer. Used by
    /// history replay; `to` is clamped to the valid range.
    pub fn move_element(&mut self, layer_id: u32, from: usize, to: usize) -> bool {
        match self.layer_mut(layer_id) {
            Some(layer) if from < layer.elements.len() => {
                let to = to.min(layer.elements.len() - 1);
                let element = layer.elements.remove(from);
                layer.elements.insert(to, element);
                true
            }
            _ => false,
        }
    }

    /// Change an element's position within its layer. Returns the recorded
    /// `(layer_id, from, to)` move, or `None` when the element is unknown or
    /// the (clamped) move is a no-op.
    pub fn reorder_element(&mut self, element_id: u32, new_index: usize) -> Option<(u32, usize, usize)> {
        let (layer_id, from) = self.locate(element_id)?;
        let len = self.layer(layer_id)?.elements.len();
        let to = new_index.min(len - 1);
        if to == from {
            return None;
        }
        self.move_element(layer_id, from, to);
        Some((layer_id, from, to))
    }

    pub fn element_count(&self) -> usize {
        self.layers.iter().map(|l| l.elements.len()).sum()
    }

    // ------------------------------------------------------------------
    // Interchange
    // ------------------------------------------------------------------

    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a document and rebuild its derived state (id counter, base
    /// layer, active-layer reference).
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let mut document: Document = serde_json::from_str(json)?;
        document.recover_next_id();
        Ok(document)
    }
}
