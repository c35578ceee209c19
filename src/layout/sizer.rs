//! Block row heights and block column widths for a grid.

use crate::error::{Axis, LayoutError, Result};
use crate::types::Grid;

/// Per-block-row heights and per-block-column widths, in matrix cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridSizes {
    pub row_heights: Vec<usize>,
    pub col_widths: Vec<usize>,
}

/// Size every block row and block column of `grid`.
///
/// Heights and widths are the maximum over the blocks sharing the row or
/// column. With `infer_missing_columns`, a block column with no blocks at all
/// is sized like a square block as tall as the tallest block row (the
/// identity-sized eliminator slot at the top of an elimination stack).
///
/// # Errors
/// Returns [`LayoutError::ShapeInference`] when a block row or column still
/// has no size.
pub fn size(grid: &Grid, infer_missing_columns: bool) -> Result<GridSizes> {
    let n_rows = grid.n_block_rows();
    let n_cols = grid.n_block_cols();

    let row_heights: Vec<usize> = (0..n_rows)
        .map(|r| (0..n_cols).map(|c| grid.shape_at(r, c).0).max().unwrap_or(0))
        .collect();
    let mut col_widths: Vec<usize> = (0..n_cols)
        .map(|c| (0..n_rows).map(|r| grid.shape_at(r, c).1).max().unwrap_or(0))
        .collect();

    let tallest = row_heights.iter().copied().max().unwrap_or(0);
    if infer_missing_columns && tallest > 0 {
        for (c, width) in col_widths.iter_mut().enumerate() {
            if *width == 0 {
                log::debug!("inferring width {tallest} for empty block column {c}");
                *width = tallest;
            }
        }
    }

    if let Some(index) = row_heights.iter().position(|&h| h == 0) {
        return Err(LayoutError::ShapeInference {
            axis: Axis::Row,
            index,
        });
    }
    if let Some(index) = col_widths.iter().position(|&w| w == 0) {
        return Err(LayoutError::ShapeInference {
            axis: Axis::Column,
            index,
        });
    }

    Ok(GridSizes {
        row_heights,
        col_widths,
    })
}
