//! Row/column label placement next to a block.
//!
//! Labels sit on virtual rows (or columns) outside the block span. Line 0 is
//! the one nearest the block; further lines move outward by `line_gap`.
//! Coordinates are absolute matrix coordinates and may fall outside the
//! flattened matrix (row 0 above the first block row); the templating layer
//! reserves room for them.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::LayoutResult;
use crate::naming::BlockRef;

/// Which edge of the block a label line runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelSide {
    #[default]
    Above,
    Below,
    Left,
    Right,
}

impl LabelSide {
    /// TikZ anchor of a label node, facing the block
    pub fn anchor(self) -> &'static str {
        match self {
            LabelSide::Above => "south",
            LabelSide::Below => "north",
            LabelSide::Left => "east",
            LabelSide::Right => "west",
        }
    }

    fn shift_key(self) -> &'static str {
        match self {
            LabelSide::Above | LabelSide::Below => "yshift",
            LabelSide::Left | LabelSide::Right => "xshift",
        }
    }

    /// +1 when moving away from the block increases the TikZ coordinate
    fn outward_sign(self) -> f64 {
        match self {
            LabelSide::Above | LabelSide::Right => 1.0,
            LabelSide::Below | LabelSide::Left => -1.0,
        }
    }
}

/// How label text is turned into markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    /// Plain strings pass through; strings mixing text and `$math$` are merged
    #[default]
    Auto,
    /// Always `$\text{...}$`
    Literal,
    /// Already markup
    Markup,
}

/// Render one label string
pub fn label_markup(text: &str, mode: TextMode) -> String {
    match mode {
        TextMode::Markup => text.to_string(),
        TextMode::Literal => format!(r"$\text{{{text}}}$"),
        TextMode::Auto => auto_markup(text),
    }
}

/// `"row $i$"` becomes `$\text{row }i$`; pure math and plain text pass through.
fn auto_markup(text: &str) -> String {
    let dollars = text.matches('$').count();
    if dollars == 0 || dollars % 2 == 1 {
        return text.to_string();
    }
    let parts: Vec<&str> = text.split('$').collect();
    let is_pure_math = parts.len() == 3
        && parts.first().is_some_and(|p| p.is_empty())
        && parts.last().is_some_and(|p| p.is_empty());
    if is_pure_math {
        return text.to_string();
    }

    let mut out = String::from("$");
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i % 2 == 1 {
            out.push_str(part);
        } else {
            out.push_str(r"\text{");
            out.push_str(part);
            out.push('}');
        }
    }
    out.push('$');
    out
}

fn default_line_gap() -> usize {
    1
}

/// Label lines for one side of one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSpec {
    #[serde(alias = "grid", alias = "name")]
    pub block: BlockRef,
    #[serde(default)]
    pub side: LabelSide,
    /// One entry per block column (above/below) or block row (left/right);
    /// extra entries are ignored
    pub lines: Vec<Vec<String>>,
    /// Virtual rows/columns skipped between the block and line 0
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_line_gap")]
    pub line_gap: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_mm: Option<f64>,
    #[serde(default)]
    pub mode: TextMode,
    /// Extra TikZ node options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl LabelSpec {
    pub fn new(block: impl Into<BlockRef>, side: LabelSide, lines: Vec<Vec<String>>) -> Self {
        Self {
            block: block.into(),
            side,
            lines,
            offset: 0,
            line_gap: default_line_gap(),
            shift_mm: None,
            mode: TextMode::Auto,
            style: None,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_shift_mm(mut self, shift_mm: f64) -> Self {
        self.shift_mm = Some(shift_mm);
        self
    }

    pub fn with_mode(mut self, mode: TextMode) -> Self {
        self.mode = mode;
        self
    }

    fn node_style(&self) -> String {
        let mut style = format!("anchor={}", self.side.anchor());
        if let Some(shift) = self.shift_mm {
            let shift = shift * self.side.outward_sign();
            style.push_str(&format!(", {}={shift}mm", self.side.shift_key()));
        }
        if let Some(extra) = self.style.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            style.push_str(", ");
            style.push_str(extra.trim_matches(','));
        }
        style
    }
}

/// One positioned label entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelNode {
    pub row: i64,
    pub col: i64,
    pub text: String,
    pub style: String,
}

impl LabelNode {
    /// `(row-col)` cell reference
    pub fn coord(&self) -> String {
        format!("{}-{}", self.row, self.col)
    }

    pub fn to_tikz(&self) -> String {
        format!(r"\node[{}] at ({}) {{{}}};", self.style, self.coord(), self.text)
    }
}

fn to_i64(v: usize) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

/// Position every label line of every spec.
///
/// # Errors
/// Returns [`crate::LayoutError::NameResolution`] when a spec names no
/// present block.
pub fn place_labels(layout: &LayoutResult, specs: &[LabelSpec]) -> Result<Vec<LabelNode>> {
    let mut nodes = Vec::new();
    for spec in specs {
        let span = layout.span_of(&spec.block)?.span;
        let style = spec.node_style();
        let offset = to_i64(spec.offset);
        let gap = to_i64(spec.line_gap);
        for (k, line) in spec.lines.iter().enumerate() {
            let step = offset + to_i64(k) * gap;
            let along = match spec.side {
                LabelSide::Above | LabelSide::Below => span.cols(),
                LabelSide::Left | LabelSide::Right => span.rows(),
            };
            for (j, text) in line.iter().take(along).enumerate() {
                let j = to_i64(j);
                let (row, col) = match spec.side {
                    LabelSide::Above => (to_i64(span.row_start) - 1 - step, to_i64(span.col_start) + j),
                    LabelSide::Below => (to_i64(span.row_end) + 1 + step, to_i64(span.col_start) + j),
                    LabelSide::Left => (to_i64(span.row_start) + j, to_i64(span.col_start) - 1 - step),
                    LabelSide::Right => (to_i64(span.row_start) + j, to_i64(span.col_end) + 1 + step),
                };
                nodes.push(LabelNode {
                    row,
                    col,
                    text: label_markup(text, spec.mode),
                    style: style.clone(),
                });
            }
        }
    }
    log::debug!("placed {} label nodes", nodes.len());
    Ok(nodes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::layout::compute_layout;
    use crate::types::{Block, Grid, LayoutOptions};
    use test_case::test_case;

    #[test_case("row $i$", TextMode::Auto => r"$\text{row }i$"; "mixed")]
    #[test_case("$x_1$", TextMode::Auto => "$x_1$"; "pure math")]
    #[test_case("plain", TextMode::Auto => "plain"; "plain")]
    #[test_case("a $b$ c $d$", TextMode::Auto => r"$\text{a }b\text{ c }d$"; "two math runs")]
    #[test_case("cost $5", TextMode::Auto => "cost $5"; "unbalanced")]
    #[test_case("plain", TextMode::Literal => r"$\text{plain}$"; "literal")]
    #[test_case(r"\mathbf{A}", TextMode::Markup => r"\mathbf{A}"; "markup")]
    fn test_label_markup(text: &str, mode: TextMode) -> String {
        label_markup(text, mode)
    }

    fn layout() -> LayoutResult {
        let grid = Grid::new(vec![vec![Some(Block::from([[1, 2], [3, 4]]))]]);
        compute_layout(&grid, &LayoutOptions::default()).unwrap()
    }

    fn lines(items: &[&[&str]]) -> Vec<Vec<String>> {
        items
            .iter()
            .map(|l| l.iter().map(|s| (*s).to_string()).collect())
            .collect()
    }

    #[test]
    fn test_above_lines_move_outward() {
        let spec = LabelSpec::new("M00", LabelSide::Above, lines(&[&["a", "b"], &["c"]]));
        let nodes = place_labels(&layout(), &[spec]).unwrap();
        let coords: Vec<String> = nodes.iter().map(LabelNode::coord).collect();
        assert_eq!(coords, vec!["0-1", "0-2", "-1-1"]);
        assert_eq!(nodes[0].style, "anchor=south");
    }

    #[test]
    fn test_right_and_below_with_offset_and_shift() {
        let right = LabelSpec::new((0, 0), LabelSide::Right, lines(&[&["r0", "r1", "extra"]]))
            .with_offset(1)
            .with_shift_mm(2.0);
        let below = LabelSpec::new((0, 0), LabelSide::Below, lines(&[&["x"]])).with_shift_mm(1.5);
        let nodes = place_labels(&layout(), &[right, below]).unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!((nodes[0].row, nodes[0].col), (1, 4));
        assert_eq!((nodes[1].row, nodes[1].col), (2, 4));
        assert_eq!(nodes[0].style, "anchor=west, xshift=2mm");
        assert_eq!((nodes[2].row, nodes[2].col), (3, 1));
        assert_eq!(nodes[2].style, "anchor=north, yshift=-1.5mm");
        assert_eq!(nodes[2].to_tikz(), r"\node[anchor=north, yshift=-1.5mm] at (3-1) {x};");
    }

    #[test]
    fn test_unknown_block_is_an_error() {
        let spec = LabelSpec::new("nope", LabelSide::Left, lines(&[&["a"]]));
        assert!(place_labels(&layout(), &[spec]).is_err());
    }
}
