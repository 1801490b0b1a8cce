use std::collections::HashSet;

/// One visible table row: two endpoint labels and the numeric level column.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
	/// Label in the source column.
	pub source: String,
	/// Label in the target column.
	pub target: String,
	/// Parsed level column, `None` when missing or not a finite number.
	pub level: Option<f64>,
}

impl Row {
	/// Builds a row from its three cells.
	pub fn new(source: impl Into<String>, target: impl Into<String>, level: Option<f64>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			level,
		}
	}
}

/// A node of a snapshot, identified by its label.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GraphNode {
	/// Label shared by every row mentioning this node.
	pub id: String,
}

/// An edge of a snapshot; one per table row.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	/// Id of the source node.
	pub source: String,
	/// Id of the target node.
	pub target: String,
	/// Level of the row this link came from.
	pub weight: Option<f64>,
}

/// The deduplicated nodes and the links currently visible.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	/// Unique nodes in first-appearance order.
	pub nodes: Vec<GraphNode>,
	/// One link per row, duplicates kept.
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// True when no row is visible.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.links.is_empty()
	}
}

/// Derives a snapshot from rows: every distinct label becomes a node and
/// every row becomes a link.
pub fn build_graph(rows: &[Row]) -> GraphData {
	let mut seen = HashSet::new();
	let mut nodes = Vec::new();
	for label in rows.iter().flat_map(|r| [&r.source, &r.target]) {
		if seen.insert(label.as_str()) {
			nodes.push(GraphNode { id: label.clone() });
		}
	}

	let links = rows
		.iter()
		.map(|r| GraphLink {
			source: r.source.clone(),
			target: r.target.clone(),
			weight: r.level,
		})
		.collect();

	GraphData { nodes, links }
}
