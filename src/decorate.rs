//! Entry-level decoration: selective rewrites of rendered cell text.
//!
//! A [`Decorator`] is chosen at construction as either text-only or
//! context-aware; [`apply_decorators`] folds a list of them over the matched
//! entries of a [`LayoutResult`] and returns the decorated copy.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::layout::LayoutResult;
use crate::naming::BlockRef;
use crate::selector::{resolve_all, AxisSelector, Selector};
use crate::types::CellValue;

type TextFn = dyn Fn(&str) -> String + Send + Sync;
type ContextFn = dyn Fn(usize, usize, &CellValue, &str) -> String + Send + Sync;

/// A cell text rewrite.
#[derive(Clone)]
pub enum Decorator {
    /// Sees only the current cell text
    TextOnly(Arc<TextFn>),
    /// Sees block-local `(row, col)`, the raw value and the current text
    WithContext(Arc<ContextFn>),
}

impl Decorator {
    pub fn text_only<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Decorator::TextOnly(Arc::new(f))
    }

    pub fn with_context<F>(f: F) -> Self
    where
        F: Fn(usize, usize, &CellValue, &str) -> String + Send + Sync + 'static,
    {
        Decorator::WithContext(Arc::new(f))
    }

    pub fn apply(&self, row: usize, col: usize, raw: &CellValue, text: &str) -> String {
        match self {
            Decorator::TextOnly(f) => f(text),
            Decorator::WithContext(f) => f(row, col, raw, text),
        }
    }
}

impl fmt::Debug for Decorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decorator::TextOnly(_) => f.write_str("Decorator::TextOnly"),
            Decorator::WithContext(_) => f.write_str("Decorator::WithContext"),
        }
    }
}

impl From<CellStyle> for Decorator {
    fn from(style: CellStyle) -> Self {
        Decorator::text_only(move |text| style.apply(text))
    }
}

/// Declarative decorator built from common markup wrappers.
///
/// Wrappers apply in a fixed order: bold, boxed, colored box, background,
/// block background, text color, right overlap, delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CellStyle {
    #[serde(alias = "bf")]
    pub bold: bool,
    #[serde(alias = "box")]
    pub boxed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Fill of a `\Block` drawn around the entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_background: Option<String>,
    #[serde(alias = "color", skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    pub move_right: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delim: Option<String>,
}

impl CellStyle {
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    pub fn boxed() -> Self {
        Self {
            boxed: true,
            ..Self::default()
        }
    }

    pub fn color(color: &str) -> Self {
        Self::default().with_color(color)
    }

    pub fn background(color: &str) -> Self {
        Self {
            background: Some(color.to_string()),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.text_color = Some(color.to_string());
        self
    }

    pub fn with_box_color(mut self, color: &str) -> Self {
        self.box_color = Some(color.to_string());
        self
    }

    pub fn with_block_background(mut self, color: &str) -> Self {
        self.block_background = Some(color.to_string());
        self
    }

    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_delim(mut self, delim: &str) -> Self {
        self.delim = Some(delim.to_string());
        self
    }

    pub fn with_move_right(mut self) -> Self {
        self.move_right = true;
        self
    }

    /// Wrap `text` in every enabled wrapper
    pub fn apply(&self, text: &str) -> String {
        let mut x = text.to_string();
        if self.bold {
            x = format!(r"\mathbf{{{x}}}");
        }
        if self.boxed {
            x = format!(r"\boxed{{{x}}}");
        }
        if let Some(color) = &self.box_color {
            x = format!(r"\colorboxed{{{color}}}{{{x}}}");
        }
        if let Some(color) = &self.background {
            x = format!(r"\colorbox{{{color}}}{{\ensuremath{{{x}}}}}");
        }
        if let Some(fill) = &self.block_background {
            let draw = self.text_color.as_deref().unwrap_or("black");
            x = format!(r"\Block[draw={draw},fill={fill}]{{1-1}}{{{x}}}");
        }
        if let Some(color) = &self.text_color {
            x = format!(r"\color{{{color}}}{{{x}}}");
        }
        if self.move_right {
            x = format!(r"\mathrlap{{{x}}}");
        }
        if let Some(delim) = &self.delim {
            x = format!("{delim}{x}{delim}");
        }
        x
    }
}

/// One decorator aimed at some entries of one block
#[derive(Debug, Clone)]
pub struct DecoratorSpec {
    pub target: BlockRef,
    /// `None` decorates every entry
    pub entries: Option<Vec<Selector>>,
    pub decorator: Decorator,
}

impl DecoratorSpec {
    pub fn new(target: impl Into<BlockRef>, decorator: impl Into<Decorator>) -> Self {
        Self {
            target: target.into(),
            entries: None,
            decorator: decorator.into(),
        }
    }

    pub fn entries(mut self, entries: Vec<Selector>) -> Self {
        self.entries = Some(entries);
        self
    }
}

/// Serializable decoration: a [`CellStyle`] aimed at some entries.
///
/// Entries come from `entries`, a `submatrix` selector and an optional
/// `rows`/`cols` rectangle; with none of them, the whole block is decorated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decoration {
    #[serde(alias = "grid", alias = "name")]
    pub block: BlockRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<Selector>>,
    /// Box `[[r0, c0], [r1, c1]]` or range pair `["0:1", null]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submatrix: Option<Selector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<AxisSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<AxisSelector>,
    #[serde(flatten)]
    pub style: CellStyle,
}

impl Decoration {
    /// Combined selector list, `None` for the whole block
    pub fn selectors(&self) -> Option<Vec<Selector>> {
        let rect = (self.rows.is_some() || self.cols.is_some())
            .then(|| Selector::Rect(self.rows.clone(), self.cols.clone()));
        if self.submatrix.is_none() && rect.is_none() {
            return self.entries.clone();
        }
        let mut out = self.entries.clone().unwrap_or_default();
        out.extend(self.submatrix.clone());
        out.extend(rect);
        Some(out)
    }
}

impl From<&Decoration> for DecoratorSpec {
    fn from(d: &Decoration) -> Self {
        Self {
            target: d.block.clone(),
            entries: d.selectors(),
            decorator: d.style.clone().into(),
        }
    }
}

/// Apply decorators in order and return the decorated layout.
///
/// Within one spec, matched entries are visited in row-major order.
///
/// # Errors
/// In strict mode an unknown target fails with
/// [`LayoutError::NameResolution`] and a selection matching nothing fails
/// with [`LayoutError::Selection`]. Non-strict mode skips both.
/// Malformed selectors always fail.
pub fn apply_decorators(
    layout: &LayoutResult,
    specs: &[DecoratorSpec],
    strict: bool,
) -> Result<LayoutResult> {
    let mut out = layout.clone();
    let blank = CellValue::Blank;
    for spec in specs {
        let span = match layout.span_of(&spec.target) {
            Ok(span) => span.span,
            Err(err) if strict => return Err(err),
            Err(_) => {
                log::warn!("skipping decorator for unknown block {}", spec.target);
                continue;
            }
        };
        let entries = resolve_all(spec.entries.as_deref(), span.rows(), span.cols())?;
        if entries.is_empty() {
            if strict {
                return Err(LayoutError::empty_selection(&spec.entries));
            }
            log::warn!(
                "decorator selection {:?} on {} matched no entries",
                spec.entries,
                spec.target
            );
            continue;
        }
        for (i, j) in entries {
            let (row, col) = span.cell(i, j);
            if let Some(cell) = out.cells.get_mut(row, col) {
                let raw = cell.raw.as_ref().unwrap_or(&blank);
                cell.text = spec.decorator.apply(i, j, raw, &cell.text);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(CellStyle::bold().with_color("red") => r"\color{red}{\mathbf{1}}"; "bold then color")]
    #[test_case(CellStyle::boxed() => r"\boxed{1}"; "boxed")]
    #[test_case(CellStyle::default().with_box_color("red") => r"\colorboxed{red}{1}"; "colored box")]
    #[test_case(CellStyle::background("yellow!25") => r"\colorbox{yellow!25}{\ensuremath{1}}"; "background")]
    #[test_case(CellStyle::default().with_block_background("yellow!35") => r"\Block[draw=black,fill=yellow!35]{1-1}{1}"; "block background")]
    #[test_case(CellStyle::default().with_move_right() => r"\mathrlap{1}"; "rlap")]
    #[test_case(CellStyle::default().with_delim("|") => "|1|"; "delim")]
    #[test_case(CellStyle::default() => "1"; "plain")]
    fn test_style_wrappers(style: CellStyle) -> String {
        style.apply("1")
    }

    #[test]
    fn test_style_json_decoration() {
        let d: Decoration = serde_json::from_str(
            r#"{"grid": [0, 1], "entries": [[0, 0]], "bold": true, "textColor": "red"}"#,
        )
        .unwrap();
        assert_eq!(d.block, BlockRef::Position(0, 1));
        assert_eq!(d.style.apply("x"), r"\color{red}{\mathbf{x}}");
        assert_eq!(d.selectors(), Some(vec![Selector::entry(0, 0)]));

        let d: Decoration =
            serde_json::from_str(r#"{"name": "A0", "rows": "0:1", "cols": [1], "boxed": true}"#).unwrap();
        let spec = DecoratorSpec::from(&d);
        assert_eq!(spec.entries.as_ref().map(Vec::len), Some(1));
        let resolved = resolve_all(spec.entries.as_deref(), 2, 2).unwrap();
        assert_eq!(resolved.into_iter().collect::<Vec<_>>(), vec![(0, 1), (1, 1)]);
    }

    #[test_case(r#"{"grid": [0, 1], "submatrix": [[0, 0], [0, 1]], "box": true}"#, 2 => r"oxed{x}"; "box submatrix")]
    #[test_case(r#"{"grid": [0, 1], "submatrix": ["0:1", "0:1"], "color": "red"}"#, 4 => r"\color{red}{x}"; "range pair")]
    #[test_case(r#"{"grid": [0, 1], "submatrix": [null, "1:1"], "bf": true}"#, 2 => r"\mathbf{x}"; "open rows")]
    fn test_short_style_keys(json: &str, n_entries: usize) -> String {
        let d: Decoration = serde_json::from_str(json).unwrap();
        let resolved = resolve_all(d.selectors().as_deref(), 2, 2).unwrap();
        assert_eq!(resolved.len(), n_entries);
        d.style.apply("x")
    }

    #[test]
    fn test_context_decorator_sees_position_and_value() {
        let dec = Decorator::with_context(|r, c, raw, text| {
            format!("{r}{c}:{}:{text}", matches!(raw, CellValue::Int(_)))
        });
        assert_eq!(dec.apply(1, 2, &CellValue::Int(3), "3"), "12:true:3");
        assert_eq!(format!("{dec:?}"), "Decorator::WithContext");
    }
}
