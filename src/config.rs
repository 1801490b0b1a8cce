//! Page-level configuration, overridable by a JSON script element.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::Result;

/// Id of the optional `<script type="application/json">` holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "table-graph-config";

/// Everything a page can tune about the table graphs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Selector a table must match inside itself to get a graph.
	pub marker_selector: String,
	/// Viewport width of the generated SVG.
	pub width: f64,
	/// Viewport height of the generated SVG.
	pub height: f64,
	/// Radius of every node circle.
	pub node_radius: f64,
	/// Node fill color.
	pub node_fill: String,
	/// Node outline color.
	pub node_stroke: String,
	/// Node outline width.
	pub node_stroke_width: f64,
	/// Link color.
	pub link_stroke: String,
	/// Link opacity.
	pub link_stroke_opacity: f64,
	/// Which cells of a row hold source, target and level.
	pub columns: ColumnMap,
	/// Simulation tuning.
	pub physics: PhysicsConfig,
	/// Options handed verbatim to the `TableFilter` constructor.
	pub filter: Value,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			marker_selector: "th.graph".into(),
			width: 1000.0,
			height: 1000.0,
			node_radius: 8.0,
			node_fill: "#69b3a2".into(),
			node_stroke: "#fff".into(),
			node_stroke_width: 1.5,
			link_stroke: "#999".into(),
			link_stroke_opacity: 0.6,
			columns: ColumnMap::default(),
			physics: PhysicsConfig::default(),
			filter: default_filter_options(),
		}
	}
}

impl GraphConfig {
	/// Parses a (possibly partial) JSON override on top of the defaults.
	pub fn from_json(text: &str) -> Result<Self> {
		Ok(serde_json::from_str(text)?)
	}

	/// Pointer slack around a node circle for hit testing.
	pub fn hit_radius(&self) -> f64 {
		self.node_radius + 4.0
	}
}

/// Cell indices of the three columns read from every row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
	/// Source label column.
	pub source: usize,
	/// Target label column.
	pub target: usize,
	/// Numeric level column.
	pub level: usize,
}

impl Default for ColumnMap {
	fn default() -> Self {
		Self {
			source: 0,
			target: 1,
			level: 2,
		}
	}
}

/// Force and cooling parameters of the layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
	/// Energy below which the simulation stops ticking.
	pub alpha_min: f64,
	/// Fraction of the gap to `alpha_target` closed per tick.
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Many-body strength; negative repels.
	pub charge_strength: f64,
	/// Lower clamp on pairwise distance for the many-body force.
	pub charge_distance_min: f64,
	/// Rest length of every link.
	pub link_distance: f64,
	/// How much of the centroid offset is corrected per tick.
	pub center_strength: f64,
	/// Energy target held while a node is dragged.
	pub drag_alpha_target: f64,
}

impl Default for PhysicsConfig {
	fn default() -> Self {
		Self {
			alpha_min: 0.001,
			alpha_decay: 0.02,
			velocity_decay: 0.4,
			charge_strength: -30.0,
			charge_distance_min: 1.0,
			link_distance: 30.0,
			center_strength: 1.0,
			drag_alpha_target: 0.3,
		}
	}
}

fn default_filter_options() -> Value {
	json!({
		"base_path": "https://unpkg.com/tablefilter@0.7.3/dist/tablefilter/",
		"highlight_keywords": true,
		"col_2": "checklist",
		"col_widths": ["350px", "350px", "100px"],
		"col_types": ["string", "string", "number"],
		"grid_layout": false,
		"responsive": false,
		"watermark": ["Filter table ...", "Filter table ..."],
		"auto_filter": { "delay": 100 },
		"filters_row_index": 1,
		"state": true,
		"rows_counter": true,
		"status_bar": true,
		"themes": [{ "name": "transparent" }],
		"btn_reset": { "tooltip": "Reset", "toolbar_position": "right" },
		"toolbar": true,
		"extensions": [
			{ "name": "sort" },
			{
				"name": "filtersVisibility",
				"description": "Sichtbarkeit der Filter",
				"toolbar_position": "right"
			}
		]
	})
}
