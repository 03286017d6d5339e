//! Scene extraction: flatten a document into renderer-agnostic draw items.
//!
//! Walks visible layers in paint order and resolves each element to a rect,
//! a draw kind, and a concrete color. No GPU types live here, so the whole
//! pipeline up to the draw call is testable on the host.

use crate::color::Color;
use crate::document::Document;
use crate::element::{ElementKind, ShapeKind};
use crate::geometry::Rect;

/// Placeholder color for images whose pixels the engine never sees.
pub const IMAGE_PLACEHOLDER: Color = Color::rgba(0.45, 0.47, 0.5, 1.0);

/// Geometry class a shape is drawn as. The renderer currently rasterizes all
/// three through the quad pipeline; the distinction is carried so a richer
/// tessellation can slot in without touching extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawKind {
    Quad,
    Oval,
    Diamond,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneShape {
    pub rect: Rect,
    pub kind: DrawKind,
    pub color: Color,
}

/// One frame's worth of draw data.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub shapes: Vec<SceneShape>,
    pub selection: Option<Rect>,
}

/// Warm tint cycled by draw index, used for shapes with no stored fill.
fn palette_tint(index: usize) -> Color {
    let t = (index % 4) as f32 * 0.04;
    Color::rgba(0.86 - t, 0.42 + t, 0.25 + t, 1.0)
}

/// Flatten `document` into draw items, bottom layer first.
///
/// Hidden layers contribute nothing, selection rect included. Text elements
/// produce no fill quad (the frontend renders text in the DOM) but still
/// produce the selection rect when selected.
pub fn build(document: &Document, selected: Option<u32>) -> Scene {
    let mut scene = Scene::default();

    for layer in &document.layers {
        if !layer.visible {
            continue;
        }
        for element in &layer.elements {
            let rect = element.transform.rect();
            if Some(element.id) == selected {
                scene.selection = Some(rect);
            }
            let (kind, color) = match &element.kind {
                ElementKind::Shape(data) => {
                    let kind = match data.kind {
                        ShapeKind::Ellipse => DrawKind::Oval,
                        ShapeKind::Polygon => DrawKind::Diamond,
                        _ => DrawKind::Quad,
                    };
                    let color = match data.fill {
                        Some(fill) => fill.color,
                        None => palette_tint(scene.shapes.len()),
                    };
                    (kind, color)
                }
                ElementKind::Image(_) => (DrawKind::Quad, IMAGE_PLACEHOLDER),
                ElementKind::Text(_) => continue,
            };
            scene.shapes.push(SceneShape { rect, kind, color });
        }
    }

    scene
}
