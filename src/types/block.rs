use serde::{Deserialize, Serialize};

use super::CellValue;

/// Anything that can report a matrix shape and hand out entries.
///
/// Implement this for foreign matrix types (dense arrays, symbolic matrices)
/// and convert with [`Block::from_matrix`].
pub trait MatrixLike {
    /// `(rows, cols)` of the value
    fn shape(&self) -> (usize, usize);
    /// Entry at `(row, col)`, both 0-indexed and within `shape()`
    fn entry(&self, row: usize, col: usize) -> CellValue;
}

/// One matrix-shaped unit placed at a grid position.
///
/// Entries are stored row-major. A block with zero rows or zero columns is
/// treated exactly like an absent block: its shape is `(0, 0)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Vec<CellValue>>", into = "Vec<Vec<CellValue>>")]
pub struct Block {
    rows: usize,
    cols: usize,
    cells: Vec<CellValue>,
}

impl Block {
    /// Build a block from a flat row-major buffer with an explicit shape.
    ///
    /// Missing trailing entries are padded with blanks; extra entries are ignored.
    pub fn from_shape<T: Into<CellValue>>(rows: usize, cols: usize, data: Vec<T>) -> Self {
        if rows == 0 || cols == 0 {
            return Self::default();
        }
        let len = rows.saturating_mul(cols);
        let mut cells: Vec<CellValue> = data.into_iter().take(len).map(Into::into).collect();
        cells.resize(len, CellValue::Blank);
        Self { rows, cols, cells }
    }

    /// Copy any [`MatrixLike`] value into a block.
    pub fn from_matrix<M: MatrixLike + ?Sized>(matrix: &M) -> Self {
        let (rows, cols) = matrix.shape();
        let mut cells = Vec::with_capacity(rows.saturating_mul(cols));
        for i in 0..rows {
            for j in 0..cols {
                cells.push(matrix.entry(i, j));
            }
        }
        Self::from_shape(rows, cols, cells)
    }

    /// Build a block from (possibly ragged) rows.
    ///
    /// The width is the longest row; shorter rows are padded with blanks.
    pub fn from_rows<T: Into<CellValue>>(rows: Vec<Vec<T>>) -> Self {
        let n_rows = rows.len();
        let n_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        if n_rows == 0 || n_cols == 0 {
            return Self::default();
        }
        let mut cells = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            let len = row.len();
            cells.extend(row.into_iter().map(Into::into));
            cells.extend(std::iter::repeat(CellValue::Blank).take(n_cols - len));
        }
        Self {
            rows: n_rows,
            cols: n_cols,
            cells,
        }
    }

    /// `(rows, cols)`; `(0, 0)` for an empty block
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Row-major entry access; `None` outside the block
    pub fn entry(&self, row: usize, col: usize) -> Option<&CellValue> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }
}

impl MatrixLike for Block {
    fn shape(&self) -> (usize, usize) {
        Block::shape(self)
    }

    fn entry(&self, row: usize, col: usize) -> CellValue {
        Block::entry(self, row, col).cloned().unwrap_or_default()
    }
}

impl<T: Into<CellValue>> From<Vec<Vec<T>>> for Block {
    fn from(rows: Vec<Vec<T>>) -> Self {
        Self::from_rows(rows)
    }
}

impl<T: Into<CellValue>, const R: usize, const C: usize> From<[[T; C]; R]> for Block {
    fn from(rows: [[T; C]; R]) -> Self {
        Self::from_rows(rows.into_iter().map(|r| r.into_iter().collect()).collect())
    }
}

impl From<Block> for Vec<Vec<CellValue>> {
    fn from(block: Block) -> Self {
        if block.cols == 0 {
            return Vec::new();
        }
        block
            .cells
            .chunks(block.cols)
            .map(<[CellValue]>::to_vec)
            .collect()
    }
}

/// Shape of an optional block; absence maps to `(0, 0)`.
pub fn shape_of(block: Option<&Block>) -> (usize, usize) {
    block.map_or((0, 0), Block::shape)
}

/// A rectangular arrangement of optional blocks.
///
/// Ragged rows are padded with absent blocks so every block row has the
/// same number of block columns. Empty blocks are stored as absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Vec<Option<Block>>>", into = "Vec<Vec<Option<Block>>>")]
pub struct Grid {
    blocks: Vec<Vec<Option<Block>>>,
    n_cols: usize,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Option<Block>>>) -> Self {
        let n_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let blocks = rows
            .into_iter()
            .map(|row| {
                let mut row: Vec<Option<Block>> = row
                    .into_iter()
                    .map(|b| b.filter(|b| !b.is_empty()))
                    .collect();
                row.resize(n_cols, None);
                row
            })
            .collect();
        Self { blocks, n_cols }
    }

    /// Number of block rows
    pub fn n_block_rows(&self) -> usize {
        self.blocks.len()
    }

    /// Number of block columns (after padding)
    pub fn n_block_cols(&self) -> usize {
        self.n_cols
    }

    /// Block at a grid position, `None` when absent or out of range
    pub fn block(&self, block_row: usize, block_col: usize) -> Option<&Block> {
        self.blocks
            .get(block_row)
            .and_then(|row| row.get(block_col))
            .and_then(Option::as_ref)
    }

    pub fn shape_at(&self, block_row: usize, block_col: usize) -> (usize, usize) {
        shape_of(self.block(block_row, block_col))
    }

    /// Present blocks in row-major grid order.
    pub fn iter_blocks(&self) -> impl Iterator<Item = (usize, usize, &Block)> + '_ {
        self.blocks.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(c, b)| b.as_ref().map(|b| (r, c, b)))
        })
    }
}

impl From<Vec<Vec<Option<Block>>>> for Grid {
    fn from(rows: Vec<Vec<Option<Block>>>) -> Self {
        Self::new(rows)
    }
}

impl From<Grid> for Vec<Vec<Option<Block>>> {
    fn from(grid: Grid) -> Self {
        grid.blocks
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    struct Eye(usize);

    impl MatrixLike for Eye {
        fn shape(&self) -> (usize, usize) {
            (self.0, self.0)
        }

        fn entry(&self, row: usize, col: usize) -> CellValue {
            CellValue::Int(i64::from(row == col))
        }
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let block = Block::from(vec![vec![1, 2, 3], vec![4]]);
        assert_eq!(block.shape(), (2, 3));
        assert_eq!(block.entry(1, 0), Some(&CellValue::Int(4)));
        assert_eq!(block.entry(1, 2), Some(&CellValue::Blank));
        assert_eq!(block.entry(2, 0), None);
    }

    #[test]
    fn test_empty_inputs_have_zero_shape() {
        assert_eq!(Block::from(Vec::<Vec<i64>>::new()).shape(), (0, 0));
        assert_eq!(Block::from(vec![Vec::<i64>::new()]).shape(), (0, 0));
        assert_eq!(Block::from_shape(0, 3, vec![1, 2, 3]).shape(), (0, 0));
        assert_eq!(shape_of(None), (0, 0));
    }

    #[test]
    fn test_from_shape_and_matrix_like() {
        let block = Block::from_shape(2, 2, vec![1, 2, 3]);
        assert_eq!(block.entry(1, 0), Some(&CellValue::Int(3)));
        assert_eq!(block.entry(1, 1), Some(&CellValue::Blank));

        let eye = Block::from_matrix(&Eye(3));
        assert_eq!(eye.shape(), (3, 3));
        assert_eq!(eye.entry(2, 2), Some(&CellValue::Int(1)));
        assert_eq!(eye.entry(0, 2), Some(&CellValue::Int(0)));
    }

    #[test]
    fn test_grid_pads_ragged_rows() {
        let grid = Grid::new(vec![
            vec![Some(Block::from([[1]]))],
            vec![None, Some(Block::from([[1, 2]])), Some(Block::default())],
        ]);
        assert_eq!(grid.n_block_rows(), 2);
        assert_eq!(grid.n_block_cols(), 3);
        assert!(grid.block(0, 1).is_none());
        assert!(grid.block(1, 2).is_none());
        assert_eq!(grid.shape_at(1, 1), (1, 2));
        let present: Vec<_> = grid.iter_blocks().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(present, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_grid_from_json() {
        let grid: Grid = serde_json::from_str("[[null, [[1, 2], [3, 4]]]]").unwrap();
        assert_eq!(grid.n_block_cols(), 2);
        assert_eq!(grid.shape_at(0, 1), (2, 2));
        assert_eq!(grid.shape_at(0, 0), (0, 0));
    }
}
