// Easel Engine - browser canvas editor core
// Document model, selection and undo/redo state machine, WebGL2 rendering.
// Compiled to WebAssembly with wasm-pack (target web); the model and editor
// layers are plain Rust and test on the host.

pub mod color;
pub mod document;
pub mod editor;
pub mod element;
pub mod error;
pub mod geometry;
pub mod history;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod renderer; // WebGL2, needs a browser canvas
#[cfg(target_arch = "wasm32")]
pub mod wasm; // the JS-facing Easel class

pub use color::Color;
pub use document::{Artboard, Document, Layer};
pub use editor::{Editor, Tool};
pub use element::{Element, ElementKind, ElementPatch, ShapeData, ShapeKind};
pub use error::{EngineError, EngineResult};
pub use geometry::{Rect, Transform};
pub use history::{Edit, History};
