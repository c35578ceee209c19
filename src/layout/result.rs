//! The full layout of one grid: spans, names, flattened cells and format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::align::pad;
use super::flatten::{column_format, flatten, CellMatrix};
use super::grid_layout::{GridLayout, Span};
use super::sizer::size;
use crate::error::{LayoutError, Result};
use crate::naming::{convention_name, BlockRef, NameMap};
use crate::types::{latexify, CellValue, Grid, LayoutOptions};

/// Resolved geometry of one present block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSpan {
    pub name: String,
    pub block_row: usize,
    pub block_col: usize,
    #[serde(flatten)]
    pub span: Span,
    pub pad_left: usize,
    pub pad_top: usize,
}

impl BlockSpan {
    /// Node name of the left delimiter
    pub fn left_delim(&self) -> String {
        format!("{}-left", self.name)
    }

    /// Node name of the right delimiter
    pub fn right_delim(&self) -> String {
        format!("{}-right", self.name)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.span.rows(), self.span.cols())
    }
}

/// Output of [`compute_layout`]; inputs for decorators, labels and callouts.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub cells: CellMatrix,
    pub column_format: String,
    /// Present blocks, row-major by grid position
    pub block_spans: Vec<BlockSpan>,
    pub names: NameMap,
    pub layout: GridLayout,
    pub(crate) block_row_separator: String,
}

impl LayoutResult {
    /// The array body handed to the templating layer
    pub fn scalar_matrix_text(&self) -> String {
        self.cells.to_markup(&self.layout, &self.block_row_separator)
    }

    pub fn column_format_string(&self) -> &str {
        &self.column_format
    }

    pub fn n_block_rows(&self) -> usize {
        self.layout.row_heights.len()
    }

    pub fn n_block_cols(&self) -> usize {
        self.layout.col_widths.len()
    }

    pub fn resolve_name(&self, name: &str) -> Option<(usize, usize)> {
        self.names.position_of(name)
    }

    pub fn span_at(&self, block_row: usize, block_col: usize) -> Option<&BlockSpan> {
        self.block_spans
            .iter()
            .find(|s| s.block_row == block_row && s.block_col == block_col)
    }

    /// Span of a referenced block.
    ///
    /// # Errors
    /// Returns [`LayoutError::NameResolution`] when the reference names no
    /// present block.
    pub fn span_of(&self, block: &BlockRef) -> Result<&BlockSpan> {
        let (r, c) = self.names.resolve(block)?;
        self.span_at(r, c).ok_or_else(|| LayoutError::NameResolution {
            reference: block.to_string(),
            available: self.names.names().map(str::to_string).collect(),
        })
    }

    /// The block whose span holds the flattened cell `(row, col)`
    pub fn block_at(&self, row: usize, col: usize) -> Option<&BlockSpan> {
        let (r, c) = self.layout.locate(row, col)?;
        self.span_at(r, c).filter(|s| s.span.contains(row, col))
    }
}

/// Lay out `grid` with the default cell formatter.
///
/// # Errors
/// Propagates [`LayoutError::ShapeInference`], [`LayoutError::NameCollision`]
/// and [`LayoutError::InvalidPartition`].
pub fn compute_layout(grid: &Grid, options: &LayoutOptions) -> Result<LayoutResult> {
    compute_layout_with(grid, options, latexify)
}

/// Lay out `grid`, rendering each entry with `formatter`.
///
/// # Errors
/// See [`compute_layout`].
pub fn compute_layout_with<F>(
    grid: &Grid,
    options: &LayoutOptions,
    formatter: F,
) -> Result<LayoutResult>
where
    F: Fn(&CellValue) -> String,
{
    let sizes = size(grid, options.infer_missing_columns)?;
    let layout = GridLayout::new(&sizes);
    let names = NameMap::build(grid, options.naming, &options.name_overrides)?;

    let mut spans = BTreeMap::new();
    let mut block_spans = Vec::new();
    for (r, c, block) in grid.iter_blocks() {
        let (halign, valign) = options.align_for(r, c);
        let padding = pad(
            block.shape(),
            layout.row_height(r),
            layout.col_width(c),
            halign,
            valign,
        );
        let Some(span) = layout.span(r, c, block.shape(), padding) else {
            continue;
        };
        let name = names.name_of(r, c).map_or_else(
            || convention_name(options.naming, grid.n_block_cols(), r, c),
            str::to_string,
        );
        spans.insert((r, c), span);
        block_spans.push(BlockSpan {
            name,
            block_row: r,
            block_col: c,
            span,
            pad_left: padding.left,
            pad_top: padding.top,
        });
    }

    let cells = flatten(grid, &layout, &spans, formatter, options);
    let column_format = column_format(&sizes.col_widths, options)?;

    log::debug!(
        "laid out {} blocks on {}x{} cells, format {}",
        block_spans.len(),
        layout.total_rows(),
        layout.total_cols(),
        column_format
    );

    Ok(LayoutResult {
        cells,
        column_format,
        block_spans,
        names,
        layout,
        block_row_separator: options.block_row_separator.clone(),
    })
}
