//! Delimiter declarations and internal rules for each block.
//!
//! Every block span becomes one `\SubMatrix({r-c}{r-c})[name=..]`
//! declaration; its delimiters are then addressable as `{name}-left` and
//! `{name}-right`. Rules are 1-based line positions inside the block
//! (`hlines=1` draws a rule below the first row).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::{LayoutResult, Span};
use crate::naming::BlockRef;
use crate::selector::AxisSelector;

/// Where to draw rules along one axis of a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineSpec {
    /// `true` is the same as [`LineMode::After`]
    Flag(bool),
    /// Explicit position
    At(usize),
    /// Explicit positions
    List(Vec<usize>),
    Mode(LineMode),
}

/// Rules relative to a selected sub-range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineMode {
    /// After the last selected index
    #[serde(alias = "submatrix")]
    After,
    /// Between selected indices
    All,
    /// Between selected indices and on both outer edges of the selection
    Bounds,
}

/// Rules for one block, optionally relative to a sub-range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRules {
    #[serde(alias = "grid", alias = "name")]
    pub block: BlockRef,
    /// `(rows, cols)` sub-range; a missing axis means the whole axis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submatrix: Option<(Option<AxisSelector>, Option<AxisSelector>)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hlines: Option<LineSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlines: Option<LineSpec>,
}

impl BlockRules {
    pub fn new(block: impl Into<BlockRef>) -> Self {
        Self {
            block: block.into(),
            submatrix: None,
            hlines: None,
            vlines: None,
        }
    }

    pub fn hlines(mut self, spec: LineSpec) -> Self {
        self.hlines = Some(spec);
        self
    }

    pub fn vlines(mut self, spec: LineSpec) -> Self {
        self.vlines = Some(spec);
        self
    }

    pub fn within(mut self, rows: Option<AxisSelector>, cols: Option<AxisSelector>) -> Self {
        self.submatrix = Some((rows, cols));
        self
    }
}

/// Rule positions for one axis of length `n`, clipped to `1..n`.
///
/// # Errors
/// Propagates malformed sub-range selectors.
pub fn line_positions(spec: &LineSpec, range: Option<&AxisSelector>, n: usize) -> Result<Vec<usize>> {
    let selected = match range {
        Some(range) => range.resolve(n)?,
        None => (0..n).collect(),
    };
    let first = selected.iter().min().copied();
    let last = selected.iter().max().copied();

    let raw: Vec<usize> = match (spec, first, last) {
        (LineSpec::Flag(false), ..) => Vec::new(),
        (LineSpec::At(k), ..) => vec![*k],
        (LineSpec::List(ks), ..) => ks.clone(),
        (LineSpec::Flag(true) | LineSpec::Mode(LineMode::After), _, Some(last)) => vec![last + 1],
        (LineSpec::Mode(LineMode::All), Some(first), Some(last)) => (first + 1..=last).collect(),
        (LineSpec::Mode(LineMode::Bounds), Some(first), Some(last)) => (first..=last + 1).collect(),
        _ => Vec::new(),
    };

    let kept: BTreeSet<usize> = raw.iter().copied().filter(|k| *k >= 1 && *k < n).collect();
    if kept.len() < raw.len() {
        log::debug!("dropped rule positions outside 1..{n} from {raw:?}");
    }
    Ok(kept.into_iter().collect())
}

/// One `\SubMatrix` declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubMatrixDecl {
    pub name: String,
    pub span: Span,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hlines: Vec<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vlines: Vec<usize>,
}

fn rule_option(key: &str, lines: &[usize]) -> String {
    match lines {
        [] => String::new(),
        [one] => format!(",{key}={one}"),
        many => {
            let joined: Vec<String> = many.iter().map(usize::to_string).collect();
            format!(",{key}={{{}}}", joined.join(","))
        }
    }
}

impl SubMatrixDecl {
    pub fn to_tex(&self) -> String {
        format!(
            r"\SubMatrix({})[name={}{}{}]",
            self.span.corners(),
            self.name,
            rule_option("hlines", &self.hlines),
            rule_option("vlines", &self.vlines)
        )
    }
}

/// Declarations for every block, rules merged per block.
///
/// # Errors
/// In strict mode rules for an unknown block fail with
/// [`crate::LayoutError::NameResolution`]; otherwise they are skipped.
pub fn submatrix_decls(
    layout: &LayoutResult,
    rules: &[BlockRules],
    strict: bool,
) -> Result<Vec<SubMatrixDecl>> {
    let mut merged: BTreeMap<(usize, usize), (BTreeSet<usize>, BTreeSet<usize>)> = BTreeMap::new();
    for rule in rules {
        let block = match layout.span_of(&rule.block) {
            Ok(block) => block,
            Err(err) if strict => return Err(err),
            Err(_) => {
                log::warn!("skipping rules for unknown block {}", rule.block);
                continue;
            }
        };
        let (rows, cols) = block.shape();
        let (row_range, col_range) = match &rule.submatrix {
            Some((r, c)) => (r.as_ref(), c.as_ref()),
            None => (None, None),
        };
        let entry = merged
            .entry((block.block_row, block.block_col))
            .or_default();
        if let Some(spec) = &rule.hlines {
            entry.0.extend(line_positions(spec, row_range, rows)?);
        }
        if let Some(spec) = &rule.vlines {
            entry.1.extend(line_positions(spec, col_range, cols)?);
        }
    }

    Ok(layout
        .block_spans
        .iter()
        .map(|b| {
            let (h, v) = merged
                .remove(&(b.block_row, b.block_col))
                .unwrap_or_default();
            SubMatrixDecl {
                name: b.name.clone(),
                span: b.span,
                hlines: h.into_iter().collect(),
                vlines: v.into_iter().collect(),
            }
        })
        .collect())
}
