//! Structured error types for matrixgrid.
//!
//! Every failure is raised at the point of detection; a failed layout call
//! produces no partial output.

/// All errors that can occur while laying out a matrix grid.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// A block row or column has no size, even after square inference.
    #[error("Cannot infer the size of block {axis} {index}")]
    ShapeInference { axis: Axis, index: usize },

    /// Two blocks resolve to the same symbolic name.
    #[error("Block name {name:?} is used by both {first:?} and {second:?}")]
    NameCollision {
        name: String,
        first: (usize, usize),
        second: (usize, usize),
    },

    /// A decorator, label or callout references an unknown block.
    #[error("Unknown block {reference}. Available: {available:?}")]
    NameResolution {
        reference: String,
        available: Vec<String>,
    },

    /// A selector matched nothing (strict mode) or could not be parsed.
    #[error("Selector {selector} {reason}")]
    Selection { selector: String, reason: String },

    /// Malformed right-hand-side partition spec.
    #[error("Invalid partition spec: {0}")]
    InvalidPartition(String),

    /// Malformed JSON layout request.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which axis of the block grid a sizing error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Column => f.write_str("column"),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

impl LayoutError {
    pub(crate) fn empty_selection(selector: impl std::fmt::Debug) -> Self {
        Self::Selection {
            selector: format!("{selector:?}"),
            reason: "matched no entries".to_string(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<LayoutError> for wasm_bindgen::JsValue {
    fn from(e: LayoutError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
