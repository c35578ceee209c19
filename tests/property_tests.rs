//! Structural invariants of computed layouts.
//!
//! Every alignment mode is run against the same grids; spans must conserve
//! block shapes, never overlap, agree with the name table, and only pad
//! blocks that are smaller than their allocation.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use common::{ge_cascade, ragged_grid};
use matrixgrid::selector::Slice;
use matrixgrid::{
    apply_decorators, compute_layout, CellStyle, DecoratorSpec, Grid, HAlign, LayoutError,
    LayoutOptions, Selector, VAlign,
};
use test_case::test_case;

fn grids() -> Vec<Grid> {
    vec![ge_cascade(1), ge_cascade(4), ragged_grid()]
}

fn options(halign: HAlign, valign: VAlign) -> LayoutOptions {
    LayoutOptions::default().with_align(halign, valign)
}

#[test_case(HAlign::Left, VAlign::Top; "left top")]
#[test_case(HAlign::Right, VAlign::Bottom; "right bottom")]
#[test_case(HAlign::Center, VAlign::Center; "center center")]
#[test_case(HAlign::Auto, VAlign::Auto; "auto auto")]
fn test_shape_conservation(halign: HAlign, valign: VAlign) {
    for grid in grids() {
        let layout = compute_layout(&grid, &options(halign, valign)).unwrap();
        assert_eq!(layout.block_spans.len(), grid.iter_blocks().count());
        for b in &layout.block_spans {
            let block = grid.block(b.block_row, b.block_col).unwrap();
            assert_eq!(b.shape(), block.shape(), "block {}", b.name);
            let alloc = layout.layout.allocation(b.block_row, b.block_col).unwrap();
            assert!(alloc.contains(b.span.row_start, b.span.col_start));
            assert!(alloc.contains(b.span.row_end, b.span.col_end));
        }
    }
}

#[test_case(HAlign::Left, VAlign::Top; "left top")]
#[test_case(HAlign::Center, VAlign::Bottom; "center bottom")]
#[test_case(HAlign::Right, VAlign::Center; "right center")]
fn test_spans_never_overlap(halign: HAlign, valign: VAlign) {
    for grid in grids() {
        let layout = compute_layout(&grid, &options(halign, valign)).unwrap();
        let spans = &layout.block_spans;
        for (i, a) in spans.iter().enumerate() {
            for b in spans.iter().skip(i + 1) {
                assert!(
                    !a.span.intersects(&b.span),
                    "{} {:?} overlaps {} {:?}",
                    a.name,
                    a.span,
                    b.name,
                    b.span
                );
            }
        }
    }
}

#[test]
fn test_span_and_name_agree() {
    for grid in grids() {
        let layout = compute_layout(&grid, &LayoutOptions::default()).unwrap();
        assert_eq!(layout.names.len(), layout.block_spans.len());
        for b in &layout.block_spans {
            assert_eq!(layout.resolve_name(&b.name), Some((b.block_row, b.block_col)));
            assert_eq!(layout.names.name_of(b.block_row, b.block_col), Some(b.name.as_str()));
            let mid_row = (b.span.row_start + b.span.row_end) / 2;
            assert_eq!(layout.block_at(mid_row, b.span.col_start).unwrap().name, b.name);
        }
    }
}

#[test]
fn test_padding_neutral_for_full_blocks() {
    let grid = ge_cascade(3);
    let reference = compute_layout(&grid, &options(HAlign::Left, VAlign::Top)).unwrap();
    for (h, v) in [
        (HAlign::Right, VAlign::Bottom),
        (HAlign::Center, VAlign::Center),
        (HAlign::Auto, VAlign::Auto),
    ] {
        let layout = compute_layout(&grid, &options(h, v)).unwrap();
        assert_eq!(layout.block_spans, reference.block_spans);
        assert_eq!(layout.scalar_matrix_text(), reference.scalar_matrix_text());
    }
    assert!(reference
        .block_spans
        .iter()
        .all(|b| b.pad_left == 0 && b.pad_top == 0));
}

#[test]
fn test_cells_outside_blocks_are_blank() {
    let layout = compute_layout(&ragged_grid(), &LayoutOptions::default()).unwrap();
    for r in 1..=layout.cells.rows() {
        for c in 1..=layout.cells.cols() {
            let cell = layout.cells.get(r, c).unwrap();
            let inside = layout.block_at(r, c).is_some();
            assert_eq!(cell.raw.is_some(), inside, "cell ({r}, {c})");
            assert_eq!(cell.text.is_empty(), !inside, "cell ({r}, {c})");
        }
    }
}

#[test]
fn test_layout_is_deterministic() {
    let a = compute_layout(&ragged_grid(), &LayoutOptions::default()).unwrap();
    let b = compute_layout(&ragged_grid(), &LayoutOptions::default()).unwrap();
    assert_eq!(a.scalar_matrix_text(), b.scalar_matrix_text());
    assert_eq!(a.block_spans, b.block_spans);
}

#[test_case(vec![Selector::entry(9, 9)]; "entry out of range")]
#[test_case(vec![Selector::rows(vec![])]; "empty row list")]
#[test_case(vec![Selector::range("1:0", ":")]; "reversed range")]
#[test_case(vec![Selector::slice(Slice::new(Some(5), None, None), Slice::default())]; "slice past end")]
#[test_case(vec![Selector::bbox((7, 7), (9, 9))]; "box past the edge")]
#[test_case(vec![]; "empty entry list")]
fn test_strict_selector_law(selectors: Vec<Selector>) {
    let layout = compute_layout(&ge_cascade(2), &LayoutOptions::default()).unwrap();
    let specs = [DecoratorSpec::new("A1", CellStyle::boxed()).entries(selectors)];

    assert!(matches!(
        apply_decorators(&layout, &specs, true),
        Err(LayoutError::Selection { .. })
    ));
    let lenient = apply_decorators(&layout, &specs, false).unwrap();
    assert_eq!(lenient, layout);
}
