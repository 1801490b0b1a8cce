use std::collections::HashMap;

use log::debug;

use super::simulation::{SimNode, Simulation};
use super::types::GraphData;
use crate::config::GraphConfig;

/// Render-side view of one link, keyed so duplicate rows stay distinct.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkView {
	/// Stable key: `source,target#n` where `n` counts earlier duplicates.
	pub key: String,
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Line width derived from the row's level.
	pub width: f64,
}

/// Stroke width for a link weight; anything that is not a positive number
/// draws a hairline.
pub fn stroke_width(weight: Option<f64>) -> f64 {
	match weight {
		Some(w) if w.is_finite() && w > 0.0 => w.sqrt(),
		_ => 1.0,
	}
}

#[derive(Clone, Debug, Default)]
struct ViewTransform {
	k: f64,
	left: f64,
	top: f64,
}

#[derive(Clone, Debug, Default)]
struct DragState {
	node_idx: Option<usize>,
	start_x: f64,
	start_y: f64,
	node_start_x: f64,
	node_start_y: f64,
}

/// Simulation, current snapshot and pointer state of one graph.
pub struct ForceGraphState {
	config: GraphConfig,
	transform: ViewTransform,
	drag: DragState,
	sim: Simulation,
	index: HashMap<String, usize>,
	links: Vec<LinkView>,
}

impl ForceGraphState {
	/// An empty graph laid out around the middle of the configured viewport.
	pub fn new(config: GraphConfig) -> Self {
		let center = (config.width / 2.0, config.height / 2.0);
		Self {
			sim: Simulation::new(config.physics, center),
			transform: ViewTransform {
				k: 1.0,
				left: 0.0,
				top: 0.0,
			},
			drag: DragState::default(),
			index: HashMap::new(),
			links: Vec::new(),
			config,
		}
	}

	/// Reconciles the simulation against a new snapshot by node id and
	/// reheats it. Retained nodes keep position, velocity and pin.
	pub fn update(&mut self, data: &GraphData) {
		let dragged = self
			.drag
			.node_idx
			.and_then(|i| self.sim.nodes().get(i))
			.map(|n| n.id.clone());
		let mut previous: HashMap<String, SimNode> = self
			.sim
			.nodes()
			.iter()
			.map(|n| (n.id.clone(), n.clone()))
			.collect();

		let nodes: Vec<SimNode> = data
			.nodes
			.iter()
			.map(|n| previous.remove(&n.id).unwrap_or_else(|| SimNode::new(n.id.clone())))
			.collect();
		let kept = data.nodes.len() - nodes.iter().filter(|n| !n.is_placed()).count();

		self.index = nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();
		self.sim.set_nodes(nodes);

		let mut pairs = Vec::with_capacity(data.links.len());
		let mut seen: HashMap<(&str, &str), usize> = HashMap::new();
		self.links.clear();
		for link in &data.links {
			let (Some(&s), Some(&t)) = (self.index.get(&link.source), self.index.get(&link.target))
			else {
				continue;
			};
			let n = seen.entry((link.source.as_str(), link.target.as_str())).or_default();
			self.links.push(LinkView {
				key: format!("{},{}#{}", link.source, link.target, n),
				source: link.source.clone(),
				target: link.target.clone(),
				width: stroke_width(link.weight),
			});
			*n += 1;
			pairs.push((s, t));
		}
		self.sim.set_links(&pairs);

		// Indices shift with the new node order; a removed node ends its drag.
		self.drag.node_idx = dragged.and_then(|id| self.index.get(&id).copied());
		if self.drag.node_idx.is_none() {
			self.sim.set_alpha_target(0.0);
		}

		debug!(
			"graph update: {} nodes ({} kept, {} removed), {} links",
			data.nodes.len(),
			kept,
			previous.len(),
			self.links.len()
		);

		self.sim.set_alpha(1.0);
		self.sim.restart();
	}

	/// Advances the simulation by one animation frame. Returns whether
	/// positions changed.
	pub fn tick(&mut self) -> bool {
		self.sim.step()
	}

	/// Whether the layout is still moving.
	pub fn is_active(&self) -> bool {
		self.sim.is_active()
	}

	/// Current simulation energy.
	pub fn alpha(&self) -> f64 {
		self.sim.alpha()
	}

	/// Ids in render order.
	pub fn node_ids(&self) -> Vec<String> {
		self.sim.nodes().iter().map(|n| n.id.clone()).collect()
	}

	/// Links of the current snapshot.
	pub fn links(&self) -> &[LinkView] {
		&self.links
	}

	/// Simulated coordinates of `id`.
	pub fn position(&self, id: &str) -> Option<(f64, f64)> {
		let node = &self.sim.nodes()[*self.index.get(id)?];
		Some((node.x, node.y))
	}

	/// Simulated coordinates of every node.
	pub fn positions(&self) -> HashMap<String, (f64, f64)> {
		self.sim
			.nodes()
			.iter()
			.map(|n| (n.id.clone(), (n.x, n.y)))
			.collect()
	}

	/// Whether `id` is held in place by a drag.
	pub fn is_pinned(&self, id: &str) -> bool {
		self.index
			.get(id)
			.is_some_and(|&i| self.sim.nodes()[i].is_pinned())
	}

	/// Maps client coordinates into the viewport.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.left) / self.transform.k,
			(sy - self.transform.top) / self.transform.k,
		)
	}

	/// Topmost node under a screen position, i.e. the last one drawn.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let hit = self.config.hit_radius();
		self.sim
			.nodes()
			.iter()
			.rev()
			.find(|n| ((n.x - gx).powi(2) + (n.y - gy).powi(2)).sqrt() < hit)
			.map(|n| n.id.clone())
	}

	/// Pins `id` where it currently is and keeps the simulation warm until
	/// the drag ends.
	pub fn drag_start(&mut self, id: &str, sx: f64, sy: f64) -> bool {
		let Some(&idx) = self.index.get(id) else {
			return false;
		};
		let Some(node) = self.sim.node_mut(idx) else {
			return false;
		};
		node.fx = Some(node.x);
		node.fy = Some(node.y);
		self.drag = DragState {
			node_idx: Some(idx),
			start_x: sx,
			start_y: sy,
			node_start_x: node.x,
			node_start_y: node.y,
		};
		self.sim.set_alpha_target(self.config.physics.drag_alpha_target);
		self.sim.restart();
		true
	}

	/// Moves the dragged node's pin by the pointer delta.
	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(idx) = self.drag.node_idx else {
			return;
		};
		let k = self.transform.k;
		let (nx, ny) = (
			self.drag.node_start_x + (sx - self.drag.start_x) / k,
			self.drag.node_start_y + (sy - self.drag.start_y) / k,
		);
		if let Some(node) = self.sim.node_mut(idx) {
			node.fx = Some(nx);
			node.fy = Some(ny);
		}
	}

	/// Lets the simulation cool again. The node stays pinned.
	pub fn drag_end(&mut self) {
		if self.drag.node_idx.take().is_some() {
			self.sim.set_alpha_target(0.0);
		}
	}

	/// Whether a drag is in progress.
	pub fn is_dragging(&self) -> bool {
		self.drag.node_idx.is_some()
	}

	/// Tracks the rendered size of the SVG so pointer coordinates map back
	/// into the viewport.
	pub fn set_screen_rect(&mut self, left: f64, top: f64, rendered_width: f64) {
		self.transform.left = left;
		self.transform.top = top;
		self.transform.k = if rendered_width > 0.0 {
			rendered_width / self.config.width
		} else {
			1.0
		};
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::force_graph::simulation::default_position;
	use crate::components::force_graph::types::{Row, build_graph};

	fn state_with(rows: &[Row]) -> ForceGraphState {
		let mut state = ForceGraphState::new(GraphConfig::default());
		state.update(&build_graph(rows));
		state
	}

	fn settle(state: &mut ForceGraphState, ticks: usize) {
		for _ in 0..ticks {
			state.tick();
		}
	}

	#[test]
	fn stroke_width_handles_missing_levels() {
		assert_eq!(stroke_width(Some(4.0)), 2.0);
		assert_eq!(stroke_width(None), 1.0);
		assert_eq!(stroke_width(Some(f64::NAN)), 1.0);
		assert_eq!(stroke_width(Some(-9.0)), 1.0);
	}

	#[test]
	fn update_keeps_positions_of_retained_nodes() {
		let mut state = state_with(&[Row::new("A", "B", Some(1.0)), Row::new("B", "C", Some(2.0))]);
		settle(&mut state, 40);
		let (a, b) = (state.position("A").unwrap(), state.position("B").unwrap());

		state.update(&build_graph(&[Row::new("A", "B", Some(1.0))]));

		assert_eq!(state.node_ids(), vec!["A", "B"]);
		assert_eq!(state.position("A"), Some(a));
		assert_eq!(state.position("B"), Some(b));
		assert_eq!(state.position("C"), None);
		assert_eq!(state.links().len(), 1);
		assert_eq!(state.alpha(), 1.0);
		assert!(state.is_active());
	}

	#[test]
	fn update_keeps_velocity_of_retained_nodes() {
		let mut state = state_with(&[Row::new("A", "B", None), Row::new("B", "C", None)]);
		settle(&mut state, 5);
		let before: Vec<(f64, f64)> = state.sim.nodes()[..2].iter().map(|n| (n.vx, n.vy)).collect();
		assert!(before.iter().any(|&(vx, vy)| vx != 0.0 || vy != 0.0));

		state.update(&build_graph(&[Row::new("A", "B", None)]));

		let after: Vec<(f64, f64)> = state.sim.nodes().iter().map(|n| (n.vx, n.vy)).collect();
		assert_eq!(after, before);
	}

	#[test]
	fn new_nodes_enter_at_default_placement() {
		let mut state = state_with(&[Row::new("A", "B", None)]);
		settle(&mut state, 10);
		state.update(&build_graph(&[Row::new("A", "B", None), Row::new("B", "C", None)]));
		assert_eq!(state.position("C"), Some(default_position(2)));
	}

	#[test]
	fn duplicate_links_get_distinct_keys() {
		let state = state_with(&[
			Row::new("A", "B", Some(1.0)),
			Row::new("A", "B", Some(9.0)),
			Row::new("B", "A", None),
		]);
		let keys: Vec<_> = state.links().iter().map(|l| l.key.as_str()).collect();
		assert_eq!(keys, vec!["A,B#0", "A,B#1", "B,A#0"]);
		assert_eq!(state.links()[1].width, 3.0);
	}

	#[test]
	fn drag_release_leaves_node_pinned() {
		let mut state = state_with(&[Row::new("A", "B", None), Row::new("B", "C", None)]);
		settle(&mut state, 20);
		let (bx, by) = state.position("B").unwrap();

		assert!(state.drag_start("B", 100.0, 100.0));
		assert!(state.is_pinned("B"));
		state.drag_to(130.0, 90.0);
		settle(&mut state, 5);
		state.drag_end();
		settle(&mut state, 30);

		assert!(!state.is_dragging());
		assert!(state.is_pinned("B"));
		assert_eq!(state.position("B"), Some((bx + 30.0, by - 10.0)));
	}

	#[test]
	fn drag_reheats_a_cooled_graph() {
		let mut state = state_with(&[Row::new("A", "B", None)]);
		while state.tick() {}
		assert!(!state.is_active());
		state.drag_start("A", 0.0, 0.0);
		assert!(state.is_active());
		settle(&mut state, 20);
		assert!(state.alpha() > 0.05);
	}

	#[test]
	fn pin_survives_update_while_node_is_retained() {
		let mut state = state_with(&[Row::new("A", "B", None), Row::new("B", "C", None)]);
		state.drag_start("A", 0.0, 0.0);
		state.drag_to(10.0, 10.0);
		state.drag_end();
		state.update(&build_graph(&[Row::new("A", "B", None)]));
		assert!(state.is_pinned("A"));
		assert!(!state.is_pinned("B"));
	}

	#[test]
	fn removing_the_dragged_node_ends_the_drag() {
		let mut state = state_with(&[Row::new("A", "B", None), Row::new("B", "C", None)]);
		state.drag_start("C", 0.0, 0.0);
		state.update(&build_graph(&[Row::new("A", "B", None)]));
		assert!(!state.is_dragging());
		while state.tick() {}
		assert!(!state.is_active());
	}

	#[test]
	fn drag_survives_update_when_node_is_retained() {
		let mut state = state_with(&[Row::new("A", "B", None), Row::new("B", "C", None)]);
		state.drag_start("C", 0.0, 0.0);
		state.update(&build_graph(&[Row::new("B", "C", None)]));
		assert!(state.is_dragging());
		state.drag_to(5.0, 5.0);
		state.drag_end();
		assert!(state.is_pinned("C"));
	}

	#[test]
	fn drag_on_unknown_node_is_ignored() {
		let mut state = state_with(&[Row::new("A", "B", None)]);
		assert!(!state.drag_start("Z", 0.0, 0.0));
		assert!(!state.is_dragging());
	}

	#[test]
	fn hit_testing_respects_screen_scaling() {
		let mut state = state_with(&[Row::new("A", "B", None)]);
		settle(&mut state, 10);
		let (ax, ay) = state.position("A").unwrap();
		state.set_screen_rect(20.0, 40.0, 500.0);
		let (sx, sy) = (20.0 + ax * 0.5, 40.0 + ay * 0.5);
		assert_eq!(state.node_at_position(sx, sy).as_deref(), Some("A"));
		assert_eq!(state.node_at_position(-500.0, -500.0), None);
	}

	#[test]
	fn empty_snapshot_clears_everything() {
		let mut state = state_with(&[Row::new("A", "B", None)]);
		state.update(&GraphData::default());
		assert!(state.node_ids().is_empty());
		assert!(state.links().is_empty());
		assert!(state.positions().is_empty());
	}
}
