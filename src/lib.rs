//! matrixgrid - layout engine for matrix-of-matrices figures
//!
//! Turns a grid of variable-sized matrix blocks (elimination cascades,
//! QR/Gram-Schmidt grids, eigen/SVD tables) into typesetting inputs:
//! - One flattened cell matrix and its array column format
//! - Named block spans with `\SubMatrix` delimiter declarations
//! - Entry decorations, highlights and block rules
//! - Label and callout geometry anchored to block edges
//!
//! The engine is layout-only: callers supply already computed values.
//!
//! # Usage
//!
//! ```
//! use matrixgrid::{compute_layout, Block, Grid, LayoutOptions, Rhs};
//!
//! let grid = Grid::new(vec![vec![None, Some(Block::from([[1, 0, 3], [0, 2, 4]]))]]);
//! let options = LayoutOptions::default().with_rhs(Rhs::Width(1));
//! let layout = compute_layout(&grid, &options)?;
//! assert_eq!(layout.column_format_string(), r"rr@{\hspace{6mm}}rr|r");
//! # Ok::<(), matrixgrid::LayoutError>(())
//! ```

pub mod callouts;
pub mod decorate;
pub mod error;
pub mod highlights;
pub mod labels;
pub mod layout;
pub mod naming;
pub mod request;
pub mod selector;
pub mod submatrix;
pub mod types;

use wasm_bindgen::prelude::*;

pub use callouts::{place_callouts, CalloutDraw, CalloutSpec};
pub use decorate::{apply_decorators, CellStyle, Decorator, DecoratorSpec};
pub use error::{LayoutError, Result};
pub use labels::{place_labels, LabelNode, LabelSpec};
pub use layout::{compute_layout, compute_layout_with, BlockSpan, LayoutResult};
pub use naming::{resolve_name, BlockRef};
pub use request::{render_request, LayoutOutput, LayoutRequest};
pub use selector::Selector;
pub use types::*;

/// Lay out a JSON request and return the JSON output
///
/// # Arguments
/// * `request` - A JSON-encoded layout request
///
/// # Errors
/// Returns an error string if the request is malformed or the layout fails.
#[wasm_bindgen]
pub fn layout_json(request: &str) -> std::result::Result<String, JsValue> {
    console_error_panic_hook::set_once();
    request::render_json(request).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Lay out a JSON request and return the output as a `JsValue`
///
/// This avoids a second JSON parse when the result is used directly in
/// JavaScript.
///
/// # Errors
/// Returns an error string if the request is malformed or the layout fails.
#[wasm_bindgen]
pub fn layout_to_js(request: &str) -> std::result::Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let request = LayoutRequest::from_json(request).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let output = render_request(&request).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&output)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
