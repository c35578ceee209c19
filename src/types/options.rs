use serde::{Deserialize, Serialize};

/// Horizontal placement of a block narrower than its block column.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum HAlign {
    Left,
    Center,
    Right,
    /// Same as `Right` (right-justified columns)
    #[default]
    Auto,
}

/// Vertical placement of a block shorter than its block row.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum VAlign {
    Top,
    Center,
    Bottom,
    /// Same as `Bottom`
    #[default]
    Auto,
}

/// Right-hand-side partition of the last block column.
///
/// Widths are signed so malformed (negative) input can be reported instead
/// of failing deserialization.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Rhs {
    /// Number of trailing RHS columns: one cut at `width - n`
    Width(i64),
    /// Segment widths: one cut after each prefix sum
    Segments(Vec<i64>),
}

/// Block naming convention.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum NamingMode {
    /// `E{row}`/`A{row}` for two block columns, `M{col}{row}` otherwise
    #[default]
    Default,
    /// `A{row}x{col}` everywhere
    Legacy,
}

/// Explicit name for the block at one grid position.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NameOverride {
    pub grid: (usize, usize),
    pub name: String,
}

/// Alignment override for a single block.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BlockAlign {
    pub grid: (usize, usize),
    #[serde(default)]
    pub halign: Option<HAlign>,
    #[serde(default)]
    pub valign: Option<VAlign>,
}

/// Options for one layout call.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    pub halign: HAlign,
    pub valign: VAlign,
    /// Per-block alignment overrides
    pub block_align: Vec<BlockAlign>,
    /// Augmented-matrix partition of the last block column
    #[serde(alias = "Nrhs")]
    pub rhs: Option<Rhs>,
    pub naming: NamingMode,
    pub name_overrides: Vec<NameOverride>,
    /// Treat wholly absent block columns as square blocks sized by the tallest row
    pub infer_missing_columns: bool,
    /// Column alignment character used in the format string
    pub col_align: char,
    /// Format-string spacer between block columns
    pub block_spacer: String,
    /// Format-string partition marker
    pub partition_marker: String,
    /// Text for block cells that render empty
    pub empty_cell: String,
    /// Appended after the last matrix row of each block row but the final one
    pub block_row_separator: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            halign: HAlign::Auto,
            valign: VAlign::Auto,
            block_align: Vec::new(),
            rhs: None,
            naming: NamingMode::Default,
            name_overrides: Vec::new(),
            infer_missing_columns: true,
            col_align: 'r',
            block_spacer: r"@{\hspace{6mm}}".to_string(),
            partition_marker: "|".to_string(),
            empty_cell: "{}".to_string(),
            block_row_separator: r"\noalign{\vskip3mm}".to_string(),
        }
    }
}

impl LayoutOptions {
    /// Alignment pair for one block, honoring per-block overrides
    pub fn align_for(&self, block_row: usize, block_col: usize) -> (HAlign, VAlign) {
        self.block_align
            .iter()
            .rev()
            .find(|a| a.grid == (block_row, block_col))
            .map_or((self.halign, self.valign), |a| {
                (
                    a.halign.unwrap_or(self.halign),
                    a.valign.unwrap_or(self.valign),
                )
            })
    }

    pub fn with_rhs(mut self, rhs: Rhs) -> Self {
        self.rhs = Some(rhs);
        self
    }

    pub fn with_align(mut self, halign: HAlign, valign: VAlign) -> Self {
        self.halign = halign;
        self.valign = valign;
        self
    }

    pub fn with_naming(mut self, naming: NamingMode) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_name(mut self, block_row: usize, block_col: usize, name: &str) -> Self {
        self.name_overrides.push(NameOverride {
            grid: (block_row, block_col),
            name: name.to_string(),
        });
        self
    }
}
