use std::rc::Rc;

use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlTableElement};

use super::extract::extract_rows;
use super::filter::{FilterListener, TableFilter};
use crate::components::force_graph::{GraphHandle, build_graph, render};
use crate::config::GraphConfig;
use crate::error::{GraphError, Result};

/// A filterable table and the graph rendered right after it.
///
/// Every `after-filtering` event rebuilds the snapshot from the visible rows
/// and hands it to the graph. Dropping the value tears all of it down.
pub struct TableGraph {
	listener: Option<FilterListener>,
	graph: Option<Rc<GraphHandle>>,
	container: HtmlElement,
	filter: TableFilter,
	id: String,
}

impl TableGraph {
	/// Sets up filtering on `table` and mounts its graph in a new
	/// `<div id="graph{index}">` inserted after it.
	pub fn attach(
		document: &Document,
		table: &HtmlTableElement,
		index: usize,
		config: &GraphConfig,
	) -> Result<Self> {
		let options = js_sys::JSON::parse(&serde_json::to_string(&config.filter)?)?;
		let id = format!("graph{index}");
		let filter = TableFilter::new(table, &options)?;
		let container = match Self::prepare(document, table, &filter, &id) {
			Ok(container) => container,
			Err(e) => {
				if let Err(d) = filter.destroy() {
					warn!("{id}: filter teardown failed: {}", GraphError::from(d));
				}
				return Err(e);
			}
		};

		let columns = config.columns;
		let snapshot = build_graph(&extract_rows(&filter, columns));
		let graph = Rc::new(render(container.clone(), snapshot, config.clone()));

		let (tf, graph_cb, log_id) = (filter.clone(), graph.clone(), id.clone());
		let listener = FilterListener::after_filtering(&filter, move || {
			let snapshot = build_graph(&extract_rows(&tf, columns));
			debug!(
				"{log_id}: filter changed, {} nodes, {} links",
				snapshot.nodes.len(),
				snapshot.links.len()
			);
			graph_cb.update(snapshot);
		});

		info!("{id}: attached");
		Ok(Self {
			listener: Some(listener),
			graph: Some(graph),
			container,
			filter,
			id,
		})
	}

	// Everything fallible after the filter exists. The container is inserted
	// last so an error leaves the page untouched.
	fn prepare(
		document: &Document,
		table: &HtmlTableElement,
		filter: &TableFilter,
		id: &str,
	) -> Result<HtmlElement> {
		filter.init()?;
		let container: HtmlElement = document
			.create_element("div")?
			.dyn_into()
			.map_err(|_| GraphError::Js("created div is not an HtmlElement".into()))?;
		container.set_id(id);
		table.after_with_node_1(&container)?;
		Ok(container)
	}

	/// Id of the generated container element.
	pub fn id(&self) -> &str {
		&self.id
	}
}

impl Drop for TableGraph {
	fn drop(&mut self) {
		// The listener holds a handle clone; release it before unmounting.
		self.listener.take();
		self.graph.take();
		self.container.remove();
		if let Err(e) = self.filter.destroy() {
			warn!("{}: filter teardown failed: {}", self.id, GraphError::from(e));
		}
		info!("{}: detached", self.id);
	}
}
