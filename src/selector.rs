//! Entry selectors: heterogeneous selection specs normalized to coordinates.
//!
//! Every selector form resolves eagerly to a `BTreeSet<(row, col)>` of
//! block-local, 0-based coordinates clipped to the block. Nothing past this
//! module sees the raw selector shapes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Block-local, 0-based entry coordinate
pub type Entry = (usize, usize);

/// One entry selection spec.
///
/// JSON forms: `[r, c]`, `[[r0, c0], [r1, c1]]`, `[rows, cols]` with axis
/// selectors or `null`, or an object with any of `row`, `col`, `rows`,
/// `cols`, `all`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selector {
    /// A single entry
    Entry(usize, usize),
    /// Inclusive two-corner box, corners in any order
    Box((usize, usize), (usize, usize)),
    Keyed(KeyedSelector),
    /// Selected rows by selected columns; `None` spans the whole axis
    Rect(Option<AxisSelector>, Option<AxisSelector>),
}

/// Row/column based selection.
///
/// Every key adds to the selection: `row`/`rows` add whole rows and
/// `col`/`cols` add whole columns. Use [`Selector::Rect`] for a rectangle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyedSelector {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<AxisSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cols: Option<AxisSelector>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub all: bool,
}

/// Indices along one axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisSelector {
    List(Vec<usize>),
    /// Inclusive range string: `"a:b"`, `"a:"`, `":b"`, `":"` or `"a"`
    Range(String),
    Slice(Slice),
}

/// Half-open slice with optional step; negative indices count from the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Slice {
    pub start: Option<i64>,
    pub stop: Option<i64>,
    pub step: Option<i64>,
}

impl Selector {
    pub fn entry(row: usize, col: usize) -> Self {
        Selector::Entry(row, col)
    }

    pub fn bbox(top_left: Entry, bottom_right: Entry) -> Self {
        Selector::Box(top_left, bottom_right)
    }

    pub fn row(row: usize) -> Self {
        Selector::Keyed(KeyedSelector {
            row: Some(row),
            ..KeyedSelector::default()
        })
    }

    pub fn col(col: usize) -> Self {
        Selector::Keyed(KeyedSelector {
            col: Some(col),
            ..KeyedSelector::default()
        })
    }

    pub fn rows(rows: Vec<usize>) -> Self {
        Selector::Keyed(KeyedSelector {
            rows: Some(AxisSelector::List(rows)),
            ..KeyedSelector::default()
        })
    }

    pub fn cols(cols: Vec<usize>) -> Self {
        Selector::Keyed(KeyedSelector {
            cols: Some(AxisSelector::List(cols)),
            ..KeyedSelector::default()
        })
    }

    pub fn all() -> Self {
        Selector::Keyed(KeyedSelector {
            all: true,
            ..KeyedSelector::default()
        })
    }

    /// Rectangle from two inclusive range strings, e.g. `("0:1", "1:1")`
    pub fn range(rows: &str, cols: &str) -> Self {
        Selector::Rect(
            Some(AxisSelector::Range(rows.to_string())),
            Some(AxisSelector::Range(cols.to_string())),
        )
    }

    /// Rectangle from two slices
    pub fn slice(rows: Slice, cols: Slice) -> Self {
        Selector::Rect(Some(AxisSelector::Slice(rows)), Some(AxisSelector::Slice(cols)))
    }

    /// Expand to the entries of an `nrows` x `ncols` block.
    ///
    /// # Errors
    /// Returns [`LayoutError::Selection`] for unparsable ranges or a zero step.
    pub fn resolve(&self, nrows: usize, ncols: usize) -> Result<BTreeSet<Entry>> {
        let mut out = BTreeSet::new();
        match self {
            Selector::Entry(r, c) => {
                if *r < nrows && *c < ncols {
                    out.insert((*r, *c));
                }
            }
            Selector::Box((r0, c0), (r1, c1)) => {
                let (Some(rows), Some(cols)) = (
                    clipped_span(*r0, *r1, nrows),
                    clipped_span(*c0, *c1, ncols),
                ) else {
                    return Ok(out);
                };
                for r in rows {
                    for c in cols.clone() {
                        out.insert((r, c));
                    }
                }
            }
            Selector::Keyed(keyed) => keyed.resolve_into(nrows, ncols, &mut out)?,
            Selector::Rect(rows, cols) => {
                let rows = match rows {
                    Some(sel) => sel.resolve(nrows)?,
                    None => (0..nrows).collect(),
                };
                let cols = match cols {
                    Some(sel) => sel.resolve(ncols)?,
                    None => (0..ncols).collect(),
                };
                for &r in &rows {
                    for &c in &cols {
                        out.insert((r, c));
                    }
                }
            }
        }
        Ok(out)
    }
}

/// Inclusive span between two corners clipped to `0..n`, `None` when it
/// lies entirely past the edge
fn clipped_span(a: usize, b: usize, n: usize) -> Option<std::ops::RangeInclusive<usize>> {
    let lo = a.min(b);
    let hi = a.max(b).min(n.checked_sub(1)?);
    (lo <= hi).then_some(lo..=hi)
}

impl From<Entry> for Selector {
    fn from((r, c): Entry) -> Self {
        Selector::Entry(r, c)
    }
}

impl KeyedSelector {
    fn resolve_into(&self, nrows: usize, ncols: usize, out: &mut BTreeSet<Entry>) -> Result<()> {
        if self.all {
            out.extend((0..nrows).flat_map(|r| (0..ncols).map(move |c| (r, c))));
            return Ok(());
        }
        for r in axis_indices(self.row, self.rows.as_ref(), nrows)? {
            out.extend((0..ncols).map(|c| (r, c)));
        }
        for c in axis_indices(self.col, self.cols.as_ref(), ncols)? {
            out.extend((0..nrows).map(|r| (r, c)));
        }
        Ok(())
    }
}

/// Union of a single index and an axis selector
fn axis_indices(single: Option<usize>, many: Option<&AxisSelector>, n: usize) -> Result<BTreeSet<usize>> {
    let mut out: BTreeSet<usize> = single.into_iter().filter(|i| *i < n).collect();
    if let Some(many) = many {
        out.extend(many.resolve(n)?);
    }
    Ok(out)
}

impl AxisSelector {
    /// Indices within `0..n`
    ///
    /// # Errors
    /// Returns [`LayoutError::Selection`] for unparsable ranges or a zero step.
    pub fn resolve(&self, n: usize) -> Result<Vec<usize>> {
        match self {
            AxisSelector::List(items) => Ok(items.iter().copied().filter(|i| *i < n).collect()),
            AxisSelector::Range(spec) => parse_range(spec, n),
            AxisSelector::Slice(slice) => slice.indices(n),
        }
    }
}

/// Parse an inclusive `"a:b"` range against an axis of length `n`.
///
/// # Errors
/// Returns [`LayoutError::Selection`] when a bound is not a number.
pub fn parse_range(spec: &str, n: usize) -> Result<Vec<usize>> {
    let bad = || LayoutError::Selection {
        selector: format!("{spec:?}"),
        reason: "is not a valid a:b range".to_string(),
    };
    let parse_bound = |s: &str| -> Result<Option<usize>> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }
        s.parse::<usize>().map(Some).map_err(|_| bad())
    };

    let (start, end) = match spec.split_once(':') {
        Some((a, b)) => (parse_bound(a)?.unwrap_or(0), parse_bound(b)?),
        None => {
            let i = parse_bound(spec)?.ok_or_else(bad)?;
            (i, Some(i))
        }
    };
    let Some(last) = n.checked_sub(1) else {
        return Ok(Vec::new());
    };
    let end = end.unwrap_or(last).min(last);
    Ok((start..=end).collect())
}

impl Slice {
    pub fn new(start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Self {
        Self { start, stop, step }
    }

    /// Indices of this slice over an axis of length `n`.
    ///
    /// # Errors
    /// Returns [`LayoutError::Selection`] for a zero step.
    pub fn indices(&self, n: usize) -> Result<Vec<usize>> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(LayoutError::Selection {
                selector: format!("{self:?}"),
                reason: "has a zero step".to_string(),
            });
        }
        let len = i64::try_from(n).unwrap_or(i64::MAX);
        let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };
        let clamp = |bound: Option<i64>, default: i64| match bound {
            None => default,
            Some(b) if b < 0 => (b + len).max(lower),
            Some(b) => b.min(upper),
        };
        let start = clamp(self.start, if step > 0 { lower } else { upper });
        let stop = clamp(self.stop, if step > 0 { upper } else { lower });

        let mut out = Vec::new();
        let mut i = start;
        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            if let Ok(idx) = usize::try_from(i) {
                out.push(idx);
            }
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
        Ok(out)
    }
}

/// Resolve a list of selectors to the union of their entries.
///
/// `None` selects every entry of the block.
///
/// # Errors
/// Propagates [`LayoutError::Selection`] from malformed selectors.
pub fn resolve_all(
    selectors: Option<&[Selector]>,
    nrows: usize,
    ncols: usize,
) -> Result<BTreeSet<Entry>> {
    match selectors {
        None => Selector::all().resolve(nrows, ncols),
        Some(list) => {
            let mut out = BTreeSet::new();
            for sel in list {
                out.extend(sel.resolve(nrows, ncols)?);
            }
            Ok(out)
        }
    }
}
