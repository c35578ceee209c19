//! Background fills and outlines around selected entries of a block.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::layout::{LayoutResult, Span};
use crate::naming::BlockRef;
use crate::selector::{resolve_all, Selector};

/// Fill and/or outline the bounding box of a selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    #[serde(alias = "grid", alias = "name")]
    pub block: BlockRef,
    /// `None` highlights the whole block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<Selector>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// Outline color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_style: Option<String>,
}

impl Highlight {
    pub fn fill(block: impl Into<BlockRef>, color: &str) -> Self {
        Self {
            block: block.into(),
            entries: None,
            fill: Some(color.to_string()),
            outline: None,
            extra_style: None,
        }
    }

    pub fn outline(block: impl Into<BlockRef>, color: &str) -> Self {
        Self {
            block: block.into(),
            entries: None,
            fill: None,
            outline: Some(color.to_string()),
            extra_style: None,
        }
    }

    pub fn entries(mut self, entries: Vec<Selector>) -> Self {
        self.entries = Some(entries);
        self
    }

    fn style(&self) -> String {
        let mut opts = vec!["inner sep=0pt".to_string()];
        if let Some(fill) = &self.fill {
            opts.push(format!("fill={fill}"));
        }
        if let Some(color) = &self.outline {
            opts.push(format!("draw={color}"));
        }
        if let Some(extra) = self.extra_style.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            opts.push(extra.trim_matches(',').to_string());
        }
        opts.join(", ")
    }
}

/// A positioned highlight box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightNode {
    pub target: String,
    /// Absolute bounding box of the selected entries
    pub span: Span,
    pub style: String,
}

impl HighlightNode {
    pub fn to_tikz(&self) -> String {
        let s = &self.span;
        format!(
            r"\node[fit=({}-{})({}-{}), {}] {{}};",
            s.row_start, s.col_start, s.row_end, s.col_end, self.style
        )
    }
}

/// Resolve highlights to absolute boxes.
///
/// # Errors
/// Strict mode fails on unknown blocks and empty selections, like
/// [`crate::apply_decorators`].
pub fn place_highlights(
    layout: &LayoutResult,
    highlights: &[Highlight],
    strict: bool,
) -> Result<Vec<HighlightNode>> {
    let mut out = Vec::new();
    for h in highlights {
        let block = match layout.span_of(&h.block) {
            Ok(block) => block,
            Err(err) if strict => return Err(err),
            Err(_) => {
                log::warn!("skipping highlight for unknown block {}", h.block);
                continue;
            }
        };
        let (rows, cols) = block.shape();
        let entries = resolve_all(h.entries.as_deref(), rows, cols)?;
        let bounds = entries.iter().fold(None, |acc: Option<(usize, usize, usize, usize)>, &(r, c)| {
            Some(match acc {
                None => (r, c, r, c),
                Some((r0, c0, r1, c1)) => (r0.min(r), c0.min(c), r1.max(r), c1.max(c)),
            })
        });
        let Some((r0, c0, r1, c1)) = bounds else {
            if strict {
                return Err(LayoutError::empty_selection(&h.entries));
            }
            log::warn!("highlight selection {:?} on {} matched no entries", h.entries, h.block);
            continue;
        };
        let (row_start, col_start) = block.span.cell(r0, c0);
        let (row_end, col_end) = block.span.cell(r1, c1);
        out.push(HighlightNode {
            target: block.name.clone(),
            span: Span {
                row_start,
                col_start,
                row_end,
                col_end,
            },
            style: h.style(),
        });
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::layout::compute_layout;
    use crate::types::{Block, Grid, LayoutOptions};

    fn layout() -> LayoutResult {
        let grid = Grid::new(vec![vec![None, Some(Block::from([[1, 2], [3, 4]]))]]);
        compute_layout(&grid, &LayoutOptions::default()).unwrap()
    }

    #[test]
    fn test_fill_bounding_box() {
        let h = Highlight::fill("A0", "yellow!25")
            .entries(vec![Selector::entry(0, 1), Selector::entry(1, 1)]);
        let nodes = place_highlights(&layout(), &[h], true).unwrap();
        assert_eq!(
            nodes[0].to_tikz(),
            r"\node[fit=(1-4)(2-4), inner sep=0pt, fill=yellow!25] {};"
        );
    }

    #[test]
    fn test_outline_whole_block() {
        let nodes = place_highlights(&layout(), &[Highlight::outline((0, 1), "blue")], true).unwrap();
        assert_eq!(nodes[0].span.corners(), "{1-3}{2-4}");
        assert!(nodes[0].style.contains("draw=blue"));
    }

    #[test]
    fn test_empty_selection_strictness() {
        let h = Highlight::fill("A0", "red").entries(vec![Selector::entry(5, 5)]);
        assert!(matches!(
            place_highlights(&layout(), std::slice::from_ref(&h), true),
            Err(LayoutError::Selection { .. })
        ));
        assert!(place_highlights(&layout(), &[h], false).unwrap().is_empty());
    }
}
