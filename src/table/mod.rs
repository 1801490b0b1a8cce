//! Discovery of marked tables and the filter-to-graph binding.

mod extract;
mod filter;
mod graph;

use log::{info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlScriptElement, HtmlTableElement};

pub use extract::{extract_rows, filtered_cells, rows_from_cells};
pub use filter::{AFTER_FILTERING, FilterListener, TableFilter};
pub use graph::TableGraph;

use crate::config::{CONFIG_ELEMENT_ID, GraphConfig};
use crate::error::Result;

/// Defaults, overridden by the page's JSON config element when present.
/// A malformed override is logged and ignored.
pub fn load_config(document: &Document) -> GraphConfig {
	let text = document
		.get_element_by_id(CONFIG_ELEMENT_ID)
		.and_then(|el| el.dyn_into::<HtmlScriptElement>().ok())
		.and_then(|script| script.text().ok());

	match text.as_deref().map(GraphConfig::from_json) {
		None => GraphConfig::default(),
		Some(Ok(config)) => {
			info!("using graph configuration from #{CONFIG_ELEMENT_ID}");
			config
		}
		Some(Err(e)) => {
			warn!("{e}; falling back to defaults");
			GraphConfig::default()
		}
	}
}

/// Attaches a graph to every table containing the marker header. Tables that
/// fail to attach are skipped with a warning.
pub fn attach_all(document: &Document, config: &GraphConfig) -> Result<Vec<TableGraph>> {
	let tables = document.query_selector_all("table")?;
	let mut graphs = Vec::new();
	for index in 0..tables.length() {
		let Some(table) = tables
			.item(index)
			.and_then(|node| node.dyn_into::<HtmlTableElement>().ok())
		else {
			continue;
		};
		if table.query_selector(&config.marker_selector)?.is_none() {
			continue;
		}
		match TableGraph::attach(document, &table, index as usize, config) {
			Ok(graph) => graphs.push(graph),
			Err(e) => warn!("table {index}: graph not attached: {e}"),
		}
	}
	info!("{} table graph(s) attached", graphs.len());
	Ok(graphs)
}
