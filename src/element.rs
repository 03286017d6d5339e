//! Elements: the things placed on layers.
//!
//! An element is an id, a display name, a placement, and one of three payload
//! kinds (shape, text, image). `ElementPatch` is the partial-update form used
//! by the editing surface: only present fields are applied.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{EngineError, EngineResult};
use crate::geometry::{Transform, MIN_EXTENT};

/// Geometric family of a shape element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Rect,
    Ellipse,
    Line,
    Polygon,
}

impl ShapeKind {
    /// Parse a user-facing shape name. Accepts the same aliases the frontend
    /// toolbar sends (`"rectangle"` is an alias for `"rect"`).
    pub fn parse(name: &str) -> EngineResult<Self> {
        match name {
            "rect" | "rectangle" => Ok(ShapeKind::Rect),
            "ellipse" => Ok(ShapeKind::Ellipse),
            "line" => Ok(ShapeKind::Line),
            "polygon" => Ok(ShapeKind::Polygon),
            _ => Err(EngineError::UnknownShape(name.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub color: Color,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeData {
    pub kind: ShapeKind,
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
}

impl ShapeData {
    /// The default rectangle: warm fill, no stroke.
    pub fn rectangle() -> Self {
        Self {
            kind: ShapeKind::Rect,
            fill: Some(Fill {
                color: Color::rgba(0.86, 0.42, 0.25, 1.0),
            }),
            stroke: None,
        }
    }

    /// Default styling with an explicit kind.
    pub fn with_kind(kind: ShapeKind) -> Self {
        Self {
            kind,
            ..Self::rectangle()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    pub content: String,
    pub font_family: String,
    pub font_size: f32,
    pub fill: Color,
}

impl TextData {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font_family: "system-ui".to_string(),
            font_size: 24.0,
            fill: Color::rgba(0.1, 0.1, 0.1, 1.0),
        }
    }
}

/// Per-image adjustment settings, all neutral at 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageFilters {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
}

impl Default for ImageFilters {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    /// Opaque source reference (object URL, data URL, asset id); the engine
    /// never dereferences it.
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub filters: ImageFilters,
}

impl ImageData {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            filters: ImageFilters::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ElementKind {
    Shape(ShapeData),
    Text(TextData),
    Image(ImageData),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: u32,
    pub name: String,
    pub transform: Transform,
    pub kind: ElementKind,
}

impl Element {
    pub fn new(id: u32, name: impl Into<String>, transform: Transform, kind: ElementKind) -> Self {
        Self {
            id,
            name: name.into(),
            transform,
            kind,
        }
    }

    pub fn shape(id: u32, name: impl Into<String>, data: ShapeData, transform: Transform) -> Self {
        Self::new(id, name, transform, ElementKind::Shape(data))
    }

    pub fn text(id: u32, name: impl Into<String>, data: TextData, transform: Transform) -> Self {
        Self::new(id, name, transform, ElementKind::Text(data))
    }

    pub fn image(id: u32, name: impl Into<String>, data: ImageData, transform: Transform) -> Self {
        Self::new(id, name, transform, ElementKind::Image(data))
    }
}

/// Partial element update. Absent fields are left untouched.
///
/// `fill` is a hex color string and applies to shape fills and text fills
/// (ignored for images); `content` and `font_size` apply to text only.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ElementPatch {
    pub name: Option<String>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
    pub fill: Option<String>,
    pub content: Option<String>,
    pub font_size: Option<f32>,
}

impl ElementPatch {
    /// Apply present fields to the element. Size fields clamp to
    /// [`MIN_EXTENT`]; the only failure mode is a malformed `fill` color.
    pub fn apply_to(&self, element: &mut Element) -> EngineResult<()> {
        if let Some(name) = &self.name {
            element.name = name.clone();
        }
        if let Some(x) = self.x {
            element.transform.x = x;
        }
        if let Some(y) = self.y {
            element.transform.y = y;
        }
        if let Some(width) = self.width {
            element.transform.width = width.max(MIN_EXTENT);
        }
        if let Some(height) = self.height {
            element.transform.height = height.max(MIN_EXTENT);
        }
        if let Some(rotation) = self.rotation {
            element.transform.rotation = rotation;
        }

        if let Some(fill) = &self.fill {
            let color = Color::from_hex(fill)?;
            match &mut element.kind {
                ElementKind::Shape(shape) => shape.fill = Some(Fill { color }),
                ElementKind::Text(text) => text.fill = color,
                ElementKind::Image(_) => {}
            }
        }

        if let ElementKind::Text(text) = &mut element.kind {
            if let Some(content) = &self.content {
                text.content = content.clone();
            }
            if let Some(font_size) = self.font_size {
                text.font_size = font_size.max(MIN_EXTENT);
            }
        }

        Ok(())
    }
}
