//! One-shot JSON surface: a full figure request in, templating inputs out.

use serde::{Deserialize, Serialize};

use crate::callouts::{ge_layer_callouts, place_callouts, CalloutDraw, CalloutSpec, LayerCallouts};
use crate::decorate::{apply_decorators, Decoration, DecoratorSpec};
use crate::error::Result;
use crate::highlights::{place_highlights, Highlight, HighlightNode};
use crate::labels::{place_labels, LabelNode, LabelSpec};
use crate::layout::{compute_layout, BlockSpan};
use crate::submatrix::{submatrix_decls, BlockRules};
use crate::types::{Grid, LayoutOptions};

fn default_strict() -> bool {
    true
}

/// Everything needed to lay out one figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    #[serde(alias = "matrices")]
    pub grid: Grid,
    #[serde(default)]
    pub options: LayoutOptions,
    #[serde(default)]
    pub decorations: Vec<Decoration>,
    #[serde(default)]
    pub rules: Vec<BlockRules>,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
    #[serde(default)]
    pub labels: Vec<LabelSpec>,
    #[serde(default)]
    pub callouts: Vec<CalloutSpec>,
    /// Add one callout per elimination layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_callouts: Option<LayerCallouts>,
    #[serde(default = "default_strict")]
    pub strict: bool,
}

impl LayoutRequest {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            options: LayoutOptions::default(),
            decorations: Vec::new(),
            rules: Vec::new(),
            highlights: Vec::new(),
            labels: Vec::new(),
            callouts: Vec::new(),
            layer_callouts: None,
            strict: true,
        }
    }

    /// Parse a request from JSON.
    ///
    /// # Errors
    /// Returns [`crate::LayoutError::Json`] for malformed input.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Templating inputs for one figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOutput {
    pub scalar_matrix_text: String,
    pub column_format_string: String,
    pub block_spans: Vec<BlockSpan>,
    /// `\SubMatrix` declarations, one per block
    pub submatrices: Vec<String>,
    pub highlight_nodes: Vec<HighlightNode>,
    pub label_nodes: Vec<LabelNode>,
    pub callout_draws: Vec<CalloutDraw>,
}

impl LayoutOutput {
    /// TikZ commands for highlights, labels and callouts, in that order
    pub fn tikz_commands(&self) -> Vec<String> {
        self.highlight_nodes
            .iter()
            .map(HighlightNode::to_tikz)
            .chain(self.label_nodes.iter().map(LabelNode::to_tikz))
            .chain(self.callout_draws.iter().map(CalloutDraw::to_tikz))
            .collect()
    }

    /// Serialize as pretty JSON.
    ///
    /// # Errors
    /// Returns [`crate::LayoutError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run the whole pipeline for one request.
///
/// # Errors
/// Propagates the first error of any stage; no partial output is produced.
pub fn render_request(request: &LayoutRequest) -> Result<LayoutOutput> {
    let layout = compute_layout(&request.grid, &request.options)?;

    let decorators: Vec<DecoratorSpec> = request.decorations.iter().map(DecoratorSpec::from).collect();
    let layout = apply_decorators(&layout, &decorators, request.strict)?;

    let submatrices = submatrix_decls(&layout, &request.rules, request.strict)?
        .iter()
        .map(|d| d.to_tex())
        .collect();
    let highlight_nodes = place_highlights(&layout, &request.highlights, request.strict)?;
    let label_nodes = place_labels(&layout, &request.labels)?;

    let mut callouts = request.callouts.clone();
    if let Some(layers) = &request.layer_callouts {
        callouts.extend(ge_layer_callouts(&request.grid, layers));
    }
    let callout_draws = place_callouts(&layout, &callouts, request.strict)?;

    Ok(LayoutOutput {
        scalar_matrix_text: layout.scalar_matrix_text(),
        column_format_string: layout.column_format,
        block_spans: layout.block_spans,
        submatrices,
        highlight_nodes,
        label_nodes,
        callout_draws,
    })
}

/// [`render_request`] from JSON text to pretty JSON text.
///
/// # Errors
/// Returns [`crate::LayoutError::Json`] for malformed input, or any layout error.
pub fn render_json(json: &str) -> Result<String> {
    let request = LayoutRequest::from_json(json)?;
    render_request(&request)?.to_json()
}
