//! Placement primitives shared by the document model and the renderer.

use serde::{Deserialize, Serialize};

/// Smallest extent an element may be resized to, in artboard pixels.
/// Every mutation path clamps width and height to this floor.
pub const MIN_EXTENT: f32 = 1.0;

/// Position and size of an element on the artboard.
///
/// Rotation is stored in degrees but ignored by hit-testing and rendering,
/// which treat all bounds as axis-aligned.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
}

impl Transform {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: 0.0,
        }
    }

    /// Axis-aligned bounds of this placement.
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Axis-aligned rectangle in artboard coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the rect has strictly positive extent in both axes.
    pub fn is_drawable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// True when the point lies inside the rect (edges inclusive).
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_starts_unrotated() {
        let t = Transform::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(t.rotation, 0.0);
        assert_eq!(t.rect(), Rect::new(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn test_rect_contains_edges() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(r.contains(0.0, 0.0));
        assert!(r.contains(100.0, 50.0));
        assert!(r.contains(50.0, 25.0));
        assert!(!r.contains(100.1, 25.0));
        assert!(!r.contains(-0.1, 25.0));
    }

    #[test]
    fn test_degenerate_rect_is_not_drawable() {
        assert!(!Rect::new(0.0, 0.0, 0.0, 10.0).is_drawable());
        assert!(!Rect::new(0.0, 0.0, 10.0, -1.0).is_drawable());
        assert!(Rect::new(0.0, 0.0, 0.5, 0.5).is_drawable());
    }
}
