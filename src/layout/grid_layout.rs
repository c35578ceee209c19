//! Absolute coordinates for a sized block grid.
//!
//! Block row and block column offsets are computed once as 1-based prefix
//! sums, enabling O(1) span computation and O(log n) lookup of the block
//! owning a flattened cell.

use serde::{Deserialize, Serialize};

use super::align::Padding;
use super::sizer::GridSizes;

/// Inclusive, 1-based rectangle in the flattened matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub row_start: usize,
    pub col_start: usize,
    pub row_end: usize,
    pub col_end: usize,
}

impl Span {
    pub fn rows(&self) -> usize {
        self.row_end + 1 - self.row_start
    }

    pub fn cols(&self) -> usize {
        self.col_end + 1 - self.col_start
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.row_start..=self.row_end).contains(&row)
            && (self.col_start..=self.col_end).contains(&col)
    }

    pub fn intersects(&self, other: &Span) -> bool {
        self.row_start <= other.row_end
            && other.row_start <= self.row_end
            && self.col_start <= other.col_end
            && other.col_start <= self.col_end
    }

    /// Absolute coordinate of a block-local, 0-based entry
    pub fn cell(&self, local_row: usize, local_col: usize) -> (usize, usize) {
        (self.row_start + local_row, self.col_start + local_col)
    }

    /// nicematrix corner pair, e.g. `{1-3}{2-4}`
    pub fn corners(&self) -> String {
        format!(
            "{{{}-{}}}{{{}-{}}}",
            self.row_start, self.col_start, self.row_end, self.col_end
        )
    }
}

/// Pre-computed coordinates of a block grid
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridLayout {
    /// First matrix row of each block row (`row_starts[n]` is one past the last row)
    pub row_starts: Vec<usize>,
    /// First matrix column of each block column (`col_starts[n]` is one past the last column)
    pub col_starts: Vec<usize>,
    pub row_heights: Vec<usize>,
    pub col_widths: Vec<usize>,
}

impl GridLayout {
    pub fn new(sizes: &GridSizes) -> Self {
        Self {
            row_starts: prefix_starts(&sizes.row_heights),
            col_starts: prefix_starts(&sizes.col_widths),
            row_heights: sizes.row_heights.clone(),
            col_widths: sizes.col_widths.clone(),
        }
    }

    /// Total number of matrix rows
    pub fn total_rows(&self) -> usize {
        self.row_starts.last().copied().unwrap_or(1) - 1
    }

    /// Total number of matrix columns
    pub fn total_cols(&self) -> usize {
        self.col_starts.last().copied().unwrap_or(1) - 1
    }

    pub fn row_height(&self, block_row: usize) -> usize {
        self.row_heights.get(block_row).copied().unwrap_or(0)
    }

    pub fn col_width(&self, block_col: usize) -> usize {
        self.col_widths.get(block_col).copied().unwrap_or(0)
    }

    /// The whole area reserved for one grid position
    pub fn allocation(&self, block_row: usize, block_col: usize) -> Option<Span> {
        let row_start = *self.row_starts.get(block_row)?;
        let col_start = *self.col_starts.get(block_col)?;
        let height = self.row_height(block_row);
        let width = self.col_width(block_col);
        if height == 0 || width == 0 {
            return None;
        }
        Some(Span {
            row_start,
            col_start,
            row_end: row_start + height - 1,
            col_end: col_start + width - 1,
        })
    }

    /// Span of a `(rows, cols)` block placed with `padding` in its allocation.
    ///
    /// Returns `None` for empty blocks, unknown positions, and blocks that do
    /// not fit their allocation.
    pub fn span(
        &self,
        block_row: usize,
        block_col: usize,
        shape: (usize, usize),
        padding: Padding,
    ) -> Option<Span> {
        let (rows, cols) = shape;
        if rows == 0 || cols == 0 {
            return None;
        }
        let alloc = self.allocation(block_row, block_col)?;
        let row_start = alloc.row_start + padding.top;
        let col_start = alloc.col_start + padding.left;
        let span = Span {
            row_start,
            col_start,
            row_end: row_start + rows - 1,
            col_end: col_start + cols - 1,
        };
        (span.row_end <= alloc.row_end && span.col_end <= alloc.col_end).then_some(span)
    }

    /// Find the block row holding matrix row `row` (binary search)
    pub fn block_row_at(&self, row: usize) -> Option<usize> {
        locate_axis(&self.row_starts, row)
    }

    /// Find the block column holding matrix column `col` (binary search)
    pub fn block_col_at(&self, col: usize) -> Option<usize> {
        locate_axis(&self.col_starts, col)
    }

    /// Grid position whose allocation contains the flattened cell `(row, col)`
    pub fn locate(&self, row: usize, col: usize) -> Option<(usize, usize)> {
        Some((self.block_row_at(row)?, self.block_col_at(col)?))
    }
}

fn prefix_starts(sizes: &[usize]) -> Vec<usize> {
    let mut starts = Vec::with_capacity(sizes.len() + 1);
    let mut at = 1;
    for &size in sizes {
        starts.push(at);
        at += size;
    }
    starts.push(at); // Final edge
    starts
}

fn locate_axis(starts: &[usize], pos: usize) -> Option<usize> {
    let last = *starts.last()?;
    if pos == 0 || pos >= last {
        return None;
    }
    starts.partition_point(|&s| s <= pos).checked_sub(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn layout() -> GridLayout {
        GridLayout::new(&GridSizes {
            row_heights: vec![2, 3],
            col_widths: vec![2, 4],
        })
    }

    #[test]
    fn test_prefix_starts() {
        let layout = layout();
        assert_eq!(layout.row_starts, vec![1, 3, 6]);
        assert_eq!(layout.col_starts, vec![1, 3, 7]);
        assert_eq!(layout.total_rows(), 5);
        assert_eq!(layout.total_cols(), 6);
    }

    #[test]
    fn test_span_with_padding() {
        let layout = layout();
        let span = layout
            .span(1, 1, (2, 3), Padding { left: 1, top: 1 })
            .unwrap();
        assert_eq!(
            span,
            Span {
                row_start: 4,
                col_start: 4,
                row_end: 5,
                col_end: 6,
            }
        );
        assert_eq!(span.rows(), 2);
        assert_eq!(span.cols(), 3);
        assert_eq!(span.corners(), "{4-4}{5-6}");
    }

    #[test]
    fn test_span_rejects_overflowing_block() {
        let layout = layout();
        assert!(layout.span(0, 0, (3, 1), Padding::default()).is_none());
        assert!(layout.span(0, 0, (1, 1), Padding { left: 2, top: 0 }).is_none());
        assert!(layout.span(5, 0, (1, 1), Padding::default()).is_none());
    }

    #[test]
    fn test_locate() {
        let layout = layout();
        assert_eq!(layout.locate(1, 1), Some((0, 0)));
        assert_eq!(layout.locate(2, 3), Some((0, 1)));
        assert_eq!(layout.locate(3, 6), Some((1, 1)));
        assert_eq!(layout.locate(0, 1), None);
        assert_eq!(layout.locate(6, 1), None);
        assert_eq!(layout.locate(1, 7), None);
    }

    #[test]
    fn test_span_intersection() {
        let a = Span {
            row_start: 1,
            col_start: 1,
            row_end: 2,
            col_end: 2,
        };
        let b = Span {
            row_start: 2,
            col_start: 2,
            row_end: 3,
            col_end: 3,
        };
        let c = Span {
            row_start: 3,
            col_start: 1,
            row_end: 4,
            col_end: 2,
        };
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(a.contains(2, 1));
        assert!(!a.contains(3, 1));
    }
}
