//! Layout engine turning a grid of matrix blocks into one flattened matrix.
//!
//! This module handles:
//! - Sizing block rows and block columns (with square inference for empty columns)
//! - Padding blocks smaller than their allocation
//! - Pre-computing 1-based block offsets and block spans
//! - Flattening entries into cell text and building the column format

mod align;
mod flatten;
mod grid_layout;
mod result;
mod sizer;

pub use align::{pad, Padding};
pub use flatten::{column_format, flatten, partition_cuts, Cell, CellMatrix};
pub use grid_layout::{GridLayout, Span};
pub use result::{compute_layout, compute_layout_with, BlockSpan, LayoutResult};
pub use sizer::{size, GridSizes};
