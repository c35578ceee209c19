//! Common grids and assertion helpers for the integration tests.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use matrixgrid::{Block, BlockRef, Grid, LayoutResult};

/// `[[None, A0], [E1, A1], [E2, A2], ...]` with 2x3 augmented matrices
pub fn ge_cascade(layers: usize) -> Grid {
    let a = |k: i64| Block::from(vec![vec![1 + k, 2, 3], vec![4, 5 - k, 6]]);
    let e = Block::from([[1, 0], [-4, 1]]);
    let mut rows = vec![vec![None, Some(a(0))]];
    for k in 1..layers {
        rows.push(vec![Some(e.clone()), Some(a(i64::try_from(k).unwrap()))]);
    }
    Grid::new(rows)
}

/// Blocks of assorted shapes on a 3x3 grid, with holes and a ragged row
pub fn ragged_grid() -> Grid {
    Grid::new(vec![
        vec![Some(Block::from([[1, 2, 3]])), None, Some(Block::from([[7]]))],
        vec![
            Some(Block::from([[1], [2]])),
            Some(Block::from([[1, 2], [3, 4], [5, 6]])),
        ],
        vec![
            None,
            Some(Block::from([[9, 9, 9, 9]])),
            Some(Block::from([[1, 2], [3, 4]])),
        ],
    ])
}

/// Panic unless `needle` appears in `haystack`
pub fn assert_contains(haystack: &str, needle: &str) {
    assert!(
        haystack.contains(needle),
        "expected {needle:?} in:\n{haystack}"
    );
}

/// Text of every cell inside `name`'s span, row-major
pub fn block_text(layout: &LayoutResult, name: &str) -> Vec<String> {
    let span = layout.span_of(&BlockRef::from(name)).unwrap().span;
    let mut out = Vec::new();
    for r in span.row_start..=span.row_end {
        for c in span.col_start..=span.col_end {
            out.push(layout.cells.text(r, c).unwrap().to_string());
        }
    }
    out
}
