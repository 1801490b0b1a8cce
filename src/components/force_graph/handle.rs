use leptos::prelude::*;
use log::debug;
use web_sys::HtmlElement;

use super::component::ForceGraphSvg;
use super::types::GraphData;
use crate::config::GraphConfig;

/// A graph mounted into a container element. Dropping it unmounts the view
/// and stops its animation loop.
pub struct GraphHandle {
	data: RwSignal<GraphData>,
	unmount: Option<Box<dyn FnOnce()>>,
}

/// Mounts a force-directed SVG for `snapshot` inside `container`.
pub fn render(container: HtmlElement, snapshot: GraphData, config: GraphConfig) -> GraphHandle {
	debug!(
		"render graph: {} nodes, {} links",
		snapshot.nodes.len(),
		snapshot.links.len()
	);
	let data = RwSignal::new(snapshot);
	let mounted = leptos::mount::mount_to(container, move || {
		view! { <ForceGraphSvg data=data config=config /> }
	});
	GraphHandle {
		data,
		unmount: Some(Box::new(move || drop(mounted))),
	}
}

impl GraphHandle {
	/// Swaps in a new snapshot; nodes with known ids keep their layout.
	pub fn update(&self, snapshot: GraphData) {
		self.data.set(snapshot);
	}
}

impl Drop for GraphHandle {
	fn drop(&mut self) {
		if let Some(unmount) = self.unmount.take() {
			unmount();
		}
		self.data.dispose();
	}
}
