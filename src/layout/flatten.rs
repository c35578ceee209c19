//! Flattening a block grid into one scalar matrix plus its column format.

use std::collections::BTreeMap;

use super::grid_layout::{GridLayout, Span};
use crate::error::{LayoutError, Result};
use crate::types::{CellValue, Grid, LayoutOptions, Rhs};

/// One cell of the flattened matrix
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    /// Rendered markup
    pub text: String,
    /// Source value, `None` outside every block
    pub raw: Option<CellValue>,
}

/// Row-major matrix of rendered cells, addressed with 1-based coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl CellMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows.saturating_mul(cols)],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row == 0 || col == 0 || row > self.rows || col > self.cols {
            return None;
        }
        Some((row - 1) * self.cols + (col - 1))
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.index(row, col).and_then(|i| self.cells.get(i))
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        let i = self.index(row, col)?;
        self.cells.get_mut(i)
    }

    /// Rendered text at `(row, col)`
    pub fn text(&self, row: usize, col: usize) -> Option<&str> {
        self.get(row, col).map(|c| c.text.as_str())
    }

    /// Rendered rows, top to bottom
    pub fn text_rows(&self) -> Vec<Vec<&str>> {
        if self.cols == 0 {
            return Vec::new();
        }
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|c| c.text.as_str()).collect())
            .collect()
    }

    /// Assemble the array body: `&`-separated cells, `\\`-terminated rows
    /// (all but the last), one row per line, with `block_row_separator`
    /// after the last row of every block row but the final one.
    pub fn to_markup(&self, layout: &GridLayout, block_row_separator: &str) -> String {
        let breaks: Vec<usize> = layout
            .row_starts
            .iter()
            .skip(1)
            .take(layout.row_heights.len().saturating_sub(1))
            .map(|start| start - 1)
            .collect();

        let rows = self.text_rows();
        let last = rows.len();
        let mut lines = Vec::with_capacity(last);
        for (i, row) in rows.iter().enumerate() {
            let mut line = row.join(" & ");
            let row_no = i + 1;
            if row_no < last {
                line.push_str(r" \\");
            }
            if breaks.contains(&row_no) && !block_row_separator.is_empty() {
                line.push(' ');
                line.push_str(block_row_separator);
            }
            lines.push(line);
        }
        lines.join("\n")
    }
}

/// Write every block's formatted entries into one matrix.
///
/// Block cells whose text renders empty receive `options.empty_cell` so the
/// cell still exists for delimiter and anchor placement.
pub fn flatten<F>(
    grid: &Grid,
    layout: &GridLayout,
    spans: &BTreeMap<(usize, usize), Span>,
    formatter: F,
    options: &LayoutOptions,
) -> CellMatrix
where
    F: Fn(&CellValue) -> String,
{
    let mut matrix = CellMatrix::new(layout.total_rows(), layout.total_cols());
    for (&(block_row, block_col), span) in spans {
        let Some(block) = grid.block(block_row, block_col) else {
            continue;
        };
        for i in 0..block.rows() {
            for j in 0..block.cols() {
                let value = block.entry(i, j).cloned().unwrap_or_default();
                let mut text = formatter(&value);
                if text.trim().is_empty() {
                    text.clone_from(&options.empty_cell);
                }
                let (row, col) = span.cell(i, j);
                if let Some(cell) = matrix.get_mut(row, col) {
                    *cell = Cell {
                        text,
                        raw: Some(value),
                    };
                }
            }
        }
    }
    matrix
}

/// Partition cut positions (1-based, "draw a marker after column k") for a
/// block column of `width`.
///
/// Cuts outside `[1, width - 1]` are dropped: an RHS at least as wide as
/// the block draws no partition.
///
/// # Errors
/// Returns [`LayoutError::InvalidPartition`] for negative widths.
pub fn partition_cuts(width: usize, rhs: &Rhs) -> Result<Vec<usize>> {
    let width_i = i64::try_from(width)
        .map_err(|_| LayoutError::InvalidPartition(format!("block width {width} too large")))?;
    let raw_cuts: Vec<i64> = match rhs {
        Rhs::Width(n) => {
            if *n < 0 {
                return Err(LayoutError::InvalidPartition(format!(
                    "negative RHS width {n}"
                )));
            }
            vec![width_i - n]
        }
        Rhs::Segments(segments) => {
            if let Some(bad) = segments.iter().find(|s| **s < 0) {
                return Err(LayoutError::InvalidPartition(format!(
                    "negative segment width {bad} in {segments:?}"
                )));
            }
            segments
                .iter()
                .scan(0_i64, |acc, s| {
                    *acc = acc.saturating_add(*s);
                    Some(*acc)
                })
                .collect()
        }
    };

    let mut cuts = Vec::with_capacity(raw_cuts.len());
    for cut in raw_cuts {
        if cut < 1 || cut > width_i - 1 {
            log::debug!("skipping partition cut {cut} outside block width {width}");
            continue;
        }
        if let Ok(cut) = usize::try_from(cut) {
            if !cuts.contains(&cut) {
                cuts.push(cut);
            }
        }
    }
    Ok(cuts)
}

/// Alignment characters for one block column with markers after each cut
fn block_format(width: usize, align: char, cuts: &[usize], marker: &str) -> String {
    let mut out = String::with_capacity(width + cuts.len() * marker.len());
    for col in 1..=width {
        out.push(align);
        if cuts.contains(&col) {
            out.push_str(marker);
        }
    }
    out
}

/// Build the array column-format string, e.g. `rr@{\hspace{6mm}}rr|r`.
///
/// # Errors
/// Returns [`LayoutError::InvalidPartition`] for a malformed RHS spec.
pub fn column_format(col_widths: &[usize], options: &LayoutOptions) -> Result<String> {
    let last = col_widths.len().saturating_sub(1);
    let mut parts = Vec::with_capacity(col_widths.len());
    for (c, &width) in col_widths.iter().enumerate() {
        let cuts = match (&options.rhs, c == last) {
            (Some(rhs), true) => partition_cuts(width, rhs)?,
            _ => Vec::new(),
        };
        parts.push(block_format(
            width,
            options.col_align,
            &cuts,
            &options.partition_marker,
        ));
    }
    Ok(parts.join(&options.block_spacer))
}
