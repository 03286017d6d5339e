//! Engine error type.
//!
//! Fallible operations that reject bad input return this type; operations that
//! can merely "not apply" (no selection, unknown id) stay `bool`/`Option`.

use thiserror::Error;

/// Errors surfaced by the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Tool name not recognized by [`crate::editor::Tool::parse`].
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Shape kind name not recognized by [`crate::element::ShapeKind::parse`].
    #[error("unknown shape kind: {0}")]
    UnknownShape(String),

    /// A layer id that no longer names a layer of the document.
    #[error("layer {0} not found")]
    LayerNotFound(u32),

    /// Malformed hex color string.
    #[error("invalid color {value:?}: {reason}")]
    ColorParse { value: String, reason: String },

    /// Document (de)serialization failure.
    #[error("document serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type alias using [`EngineError`].
pub type EngineResult<T> = Result<T, EngineError>;
