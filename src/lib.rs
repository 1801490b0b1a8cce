//! Interactive force-directed graphs for filterable documentation tables.
//!
//! Every table whose header carries the marker column gets a TableFilter
//! widget and an SVG graph right below it: one node per distinct label in the
//! first two columns, one link per visible row. Filtering the table rebuilds
//! the graph while nodes that stay visible keep their place.

use log::{Level, info};

// Modules
mod components;
pub mod config;
pub mod error;
mod page;
pub mod table;

pub use components::force_graph::{
	ForceGraphState, ForceGraphSvg, GraphData, GraphHandle, GraphLink, GraphNode, LinkView, Row,
	SimNode, Simulation, build_graph, default_position, render, stroke_width,
};
pub use config::{ColumnMap, GraphConfig, PhysicsConfig};
pub use error::{GraphError, Result};
pub use page::{attach_graphs, detach_all, detach_graphs, remount, start};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Module entry point: logging, then graphs for the current page.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_main() {
	init_logging();
	if let Err(e) = start() {
		log::error!("table graphs disabled: {e}");
	}
}
