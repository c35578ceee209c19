//! Arrow callouts pointing at a block's delimiter.
//!
//! The arrow head sits on the `{name}-left` or `{name}-right` delimiter node
//! of a block; the tail is offset from the head by a fixed length along
//! `theta + 180°`. Left callouts use `theta = angle`, right callouts mirror it
//! as `180° - angle`, so equal angles give mirror-image arrows.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::LayoutResult;
use crate::naming::BlockRef;
use crate::types::Grid;

/// Which delimiter a callout attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    /// `E*` blocks left, `A*` blocks right, anything else right
    #[default]
    Auto,
}

impl Side {
    /// Resolve `Auto` from a block name
    pub fn resolve(self, name: &str) -> Side {
        match self {
            Side::Left | Side::Right => self,
            Side::Auto if name.starts_with('E') => Side::Left,
            Side::Auto => Side::Right,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right | Side::Auto => "right",
        }
    }
}

/// Point on the delimiter the arrow head touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    #[default]
    #[serde(alias = "north")]
    Top,
    #[serde(alias = "south")]
    Bottom,
    #[serde(alias = "mid")]
    Center,
}

impl Anchor {
    /// TikZ anchor name
    pub fn tikz(self) -> &'static str {
        match self {
            Anchor::Top => "north",
            Anchor::Bottom => "south",
            Anchor::Center => "center",
        }
    }
}

fn default_angle() -> f64 {
    25.0
}

fn default_length() -> f64 {
    10.0
}

fn default_color() -> String {
    "blue".to_string()
}

fn default_line_width() -> f64 {
    0.35
}

fn default_tip() -> String {
    r"-{Stealth[length=2.4mm]}".to_string()
}

fn default_true() -> bool {
    true
}

/// A callout request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalloutSpec {
    #[serde(alias = "name", alias = "grid")]
    pub block: BlockRef,
    pub label: String,
    #[serde(default)]
    pub side: Side,
    #[serde(default)]
    pub anchor: Anchor,
    #[serde(default = "default_angle", alias = "angle")]
    pub angle_deg: f64,
    #[serde(default = "default_length", alias = "length")]
    pub length_mm: f64,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_line_width")]
    pub line_width_pt: f64,
    #[serde(default = "default_tip")]
    pub tip: String,
    #[serde(default)]
    pub extra_style: String,
    /// Wrap the label in `$ ... $`
    #[serde(default = "default_true")]
    pub math_mode: bool,
    /// Outward shift of the label node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_shift_mm: Option<f64>,
}

impl CalloutSpec {
    pub fn new(block: impl Into<BlockRef>, label: &str) -> Self {
        Self {
            block: block.into(),
            label: label.to_string(),
            side: Side::Auto,
            anchor: Anchor::Top,
            angle_deg: default_angle(),
            length_mm: default_length(),
            color: default_color(),
            line_width_pt: default_line_width(),
            tip: default_tip(),
            extra_style: String::new(),
            math_mode: true,
            label_shift_mm: None,
        }
    }

    pub fn side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn angle(mut self, angle_deg: f64, length_mm: f64) -> Self {
        self.angle_deg = angle_deg;
        self.length_mm = length_mm;
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    fn draw_options(&self) -> String {
        let mut opts = vec![
            format!("draw={}", self.color),
            format!("text={}", self.color),
            format!("line width={}pt", self.line_width_pt),
            self.tip.clone(),
        ];
        let extra = self.extra_style.trim().trim_matches(',');
        if !extra.is_empty() {
            opts.push(extra.to_string());
        }
        opts.join(", ")
    }
}

/// Fully resolved callout geometry.
///
/// `head` is in cell units (x = column, y = row, both growing like matrix
/// indices); `tail_offset_mm` is in TikZ orientation (y up).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalloutDraw {
    pub target: String,
    pub side: Side,
    /// Delimiter node, e.g. `A0-right`
    pub head_node: String,
    pub anchor: Anchor,
    pub head: (f64, f64),
    pub theta_deg: f64,
    pub length_mm: f64,
    pub tail_offset_mm: (f64, f64),
    /// `east` for left callouts, `west` for right ones
    pub label_anchor: String,
    pub label: String,
    pub options: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_shift_mm: Option<f64>,
}

impl CalloutDraw {
    /// Direction from head to tail, in degrees
    pub fn tail_direction_deg(&self) -> f64 {
        self.theta_deg + 180.0
    }

    /// TikZ `\draw` command for a `tikzpicture` overlay
    pub fn to_tikz(&self) -> String {
        let head = format!("({}.{})", self.head_node, self.anchor.tikz());
        let tail = format!(
            "($ {head} + ({:.6}:{}mm) $)",
            self.tail_direction_deg(),
            self.length_mm
        );
        let shift = self.label_shift_mm.map_or_else(String::new, |s| {
            let s = if self.side == Side::Left { -s } else { s };
            format!(", xshift={s}mm")
        });
        format!(
            r"\draw[{}] {tail} node[anchor={}{shift}] {{{}}} -- {head};",
            self.options, self.label_anchor, self.label
        )
    }
}

/// Resolve callout specs against a layout.
///
/// # Errors
/// In strict mode a spec naming no present block fails with
/// [`crate::LayoutError::NameResolution`]; otherwise it is dropped.
pub fn place_callouts(
    layout: &LayoutResult,
    specs: &[CalloutSpec],
    strict: bool,
) -> Result<Vec<CalloutDraw>> {
    let mut out = Vec::with_capacity(specs.len());
    for spec in specs {
        let block = match layout.span_of(&spec.block) {
            Ok(block) => block,
            Err(err) if strict => return Err(err),
            Err(_) => {
                log::warn!("dropping callout for unknown block {}", spec.block);
                continue;
            }
        };
        let side = spec.side.resolve(&block.name);
        let span = block.span;

        let (row_start, row_end, col_start, col_end) = (
            span.row_start as f64,
            span.row_end as f64,
            span.col_start as f64,
            span.col_end as f64,
        );
        let x = match side {
            Side::Left => col_start - 0.5,
            Side::Right | Side::Auto => col_end + 0.5,
        };
        let y = match spec.anchor {
            Anchor::Top => row_start - 0.5,
            Anchor::Bottom => row_end + 0.5,
            Anchor::Center => (row_start + row_end) / 2.0,
        };

        let theta = match side {
            Side::Left => spec.angle_deg,
            Side::Right | Side::Auto => 180.0 - spec.angle_deg,
        };
        let dir = (theta + 180.0).to_radians();
        let tail_offset_mm = (spec.length_mm * dir.cos(), spec.length_mm * dir.sin());

        let label = if spec.math_mode {
            format!("$ {} $", spec.label)
        } else {
            spec.label.clone()
        };

        out.push(CalloutDraw {
            target: block.name.clone(),
            side,
            head_node: format!("{}-{}", block.name, side.as_str()),
            anchor: spec.anchor,
            head: (x, y),
            theta_deg: theta,
            length_mm: spec.length_mm,
            tail_offset_mm,
            label_anchor: if side == Side::Left { "east" } else { "west" }.to_string(),
            label,
            options: spec.draw_options(),
            label_shift_mm: spec.label_shift_mm,
        });
    }
    log::debug!("placed {} of {} callouts", out.len(), specs.len());
    Ok(out)
}

/// Options for [`ge_layer_callouts`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayerCallouts {
    pub include_a: bool,
    pub include_e: bool,
    /// `%d` is replaced by the block row
    pub label_a: String,
    pub label_e: String,
    pub angle_deg: f64,
    pub length_mm: f64,
    pub color: String,
}

impl Default for LayerCallouts {
    fn default() -> Self {
        Self {
            include_a: true,
            include_e: true,
            label_a: r"A_{%d}".to_string(),
            label_e: r"E_{%d}".to_string(),
            angle_deg: default_angle(),
            length_mm: default_length(),
            color: default_color(),
        }
    }
}

/// One callout per layer of a two-column elimination stack: `A{r}` on the
/// right for every layer, `E{r}` on the left where the layer has an
/// elimination matrix.
pub fn ge_layer_callouts(grid: &Grid, opts: &LayerCallouts) -> Vec<CalloutSpec> {
    let mut out = Vec::new();
    for r in 0..grid.n_block_rows() {
        let layer = r.to_string();
        let make = |name: String, label: &str, side: Side| {
            CalloutSpec::new(name, &label.replace("%d", &layer))
                .side(side)
                .angle(opts.angle_deg, opts.length_mm)
                .color(&opts.color)
        };
        if opts.include_a {
            out.push(make(format!("A{r}"), &opts.label_a, Side::Right));
        }
        if opts.include_e && grid.block(r, 0).is_some() {
            out.push(make(format!("E{r}"), &opts.label_e, Side::Left));
        }
    }
    out
}
