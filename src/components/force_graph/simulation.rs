use std::f64::consts::PI;

use crate::config::PhysicsConfig;

const INITIAL_RADIUS: f64 = 10.0;

/// A node as the physics sees it.
///
/// `x`/`y` are NaN until the simulation places the node; `fx`/`fy` pin it.
#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
	/// Label the node was created for.
	pub id: String,
	/// Current horizontal position.
	pub x: f64,
	/// Current vertical position.
	pub y: f64,
	/// Horizontal velocity.
	pub vx: f64,
	/// Vertical velocity.
	pub vy: f64,
	/// Pinned horizontal position.
	pub fx: Option<f64>,
	/// Pinned vertical position.
	pub fy: Option<f64>,
}

impl SimNode {
	/// An unpositioned, unpinned node at rest.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			x: f64::NAN,
			y: f64::NAN,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		}
	}

	/// Whether the node has been given a position yet.
	pub fn is_placed(&self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}

	/// Whether user interaction holds the node in place.
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// Position a node with the given index receives when it enters unplaced:
/// a phyllotaxis spiral around the origin.
pub fn default_position(index: usize) -> (f64, f64) {
	let angle = index as f64 * PI * (3.0 - 5f64.sqrt());
	let radius = INITIAL_RADIUS * (0.5 + index as f64).sqrt();
	(radius * angle.cos(), radius * angle.sin())
}

/// Deterministic generator for the jiggle that separates coincident nodes.
#[derive(Clone, Debug)]
struct Lcg(u64);

impl Lcg {
	const A: u64 = 1_664_525;
	const C: u64 = 1_013_904_223;
	const M: u64 = 4_294_967_296;

	fn next(&mut self) -> f64 {
		self.0 = (Self::A * self.0 + Self::C) % Self::M;
		self.0 as f64 / Self::M as f64
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

#[derive(Clone, Copy, Debug)]
struct SimLink {
	source: usize,
	target: usize,
	strength: f64,
	bias: f64,
}

/// Velocity-Verlet layout with link, many-body and centering forces, cooled
/// by an `alpha` energy level.
#[derive(Clone, Debug)]
pub struct Simulation {
	params: PhysicsConfig,
	center: (f64, f64),
	nodes: Vec<SimNode>,
	links: Vec<SimLink>,
	alpha: f64,
	alpha_target: f64,
	running: bool,
	random: Lcg,
}

impl Simulation {
	/// An empty, running simulation pulling towards `center`.
	pub fn new(params: PhysicsConfig, center: (f64, f64)) -> Self {
		Self {
			params,
			center,
			nodes: Vec::new(),
			links: Vec::new(),
			alpha: 1.0,
			alpha_target: 0.0,
			running: true,
			random: Lcg(1),
		}
	}

	/// Nodes in index order.
	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	/// Mutable access for pinning.
	pub fn node_mut(&mut self, index: usize) -> Option<&mut SimNode> {
		self.nodes.get_mut(index)
	}

	/// Replaces the node set, placing any node that has no position yet.
	/// Links must be set again afterwards since they index into this set.
	pub fn set_nodes(&mut self, nodes: Vec<SimNode>) {
		self.nodes = nodes;
		self.links.clear();
		for (i, node) in self.nodes.iter_mut().enumerate() {
			if let Some(fx) = node.fx {
				node.x = fx;
			}
			if let Some(fy) = node.fy {
				node.y = fy;
			}
			if !node.is_placed() {
				(node.x, node.y) = default_position(i);
			}
			if !node.vx.is_finite() || !node.vy.is_finite() {
				node.vx = 0.0;
				node.vy = 0.0;
			}
		}
	}

	/// Replaces the links by `(source, target)` node indices. Pairs pointing
	/// outside the node set are ignored.
	pub fn set_links(&mut self, pairs: &[(usize, usize)]) {
		let n = self.nodes.len();
		let pairs: Vec<_> = pairs.iter().copied().filter(|&(s, t)| s < n && t < n).collect();

		let mut degree = vec![0usize; n];
		for &(s, t) in &pairs {
			degree[s] += 1;
			degree[t] += 1;
		}

		self.links = pairs
			.into_iter()
			.map(|(source, target)| {
				let (ds, dt) = (degree[source] as f64, degree[target] as f64);
				SimLink {
					source,
					target,
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();
	}

	/// Current energy.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Sets the energy, e.g. to 1 to reheat after a data change.
	pub fn set_alpha(&mut self, alpha: f64) {
		self.alpha = alpha;
	}

	/// Energy the simulation converges to.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Sets the energy the simulation converges to.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Resumes stepping after the simulation cooled down.
	pub fn restart(&mut self) {
		self.running = true;
	}

	/// True until the energy falls below `alpha_min`.
	pub fn is_active(&self) -> bool {
		self.running
	}

	/// One animation-frame step: ticks while active and stops once cooled.
	/// Returns whether a tick happened.
	pub fn step(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.tick();
		if self.alpha < self.params.alpha_min {
			self.running = false;
		}
		true
	}

	/// Advances the layout by one tick regardless of the energy level.
	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;
		let alpha = self.alpha;

		self.apply_links(alpha);
		self.apply_charge(alpha);
		self.apply_center();

		let keep = 1.0 - self.params.velocity_decay;
		for node in &mut self.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= keep;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= keep;
					node.y += node.vy;
				}
			}
		}
	}

	fn apply_links(&mut self, alpha: f64) {
		let distance = self.params.link_distance;
		for link in &self.links {
			let (s, t) = (&self.nodes[link.source], &self.nodes[link.target]);
			let mut dx = t.x + t.vx - s.x - s.vx;
			let mut dy = t.y + t.vy - s.y - s.vy;
			if dx == 0.0 {
				dx = self.random.jiggle();
			}
			if dy == 0.0 {
				dy = self.random.jiggle();
			}
			let len = (dx * dx + dy * dy).sqrt();
			let k = (len - distance) / len * alpha * link.strength;
			let (dx, dy) = (dx * k, dy * k);

			let target = &mut self.nodes[link.target];
			target.vx -= dx * link.bias;
			target.vy -= dy * link.bias;
			let source = &mut self.nodes[link.source];
			source.vx += dx * (1.0 - link.bias);
			source.vy += dy * (1.0 - link.bias);
		}
	}

	fn apply_charge(&mut self, alpha: f64) {
		let strength = self.params.charge_strength * alpha;
		let min2 = self.params.charge_distance_min * self.params.charge_distance_min;
		for i in 0..self.nodes.len() {
			let (xi, yi) = (self.nodes[i].x, self.nodes[i].y);
			let (mut dvx, mut dvy) = (0.0, 0.0);
			for (j, other) in self.nodes.iter().enumerate() {
				if i == j {
					continue;
				}
				let mut dx = other.x - xi;
				let mut dy = other.y - yi;
				if dx == 0.0 {
					dx = self.random.jiggle();
				}
				if dy == 0.0 {
					dy = self.random.jiggle();
				}
				let mut l = dx * dx + dy * dy;
				if l < min2 {
					l = (min2 * l).sqrt();
				}
				dvx += dx * strength / l;
				dvy += dy * strength / l;
			}
			self.nodes[i].vx += dvx;
			self.nodes[i].vy += dvy;
		}
	}

	fn apply_center(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		let n = self.nodes.len() as f64;
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let shift_x = (sx / n - self.center.0) * self.params.center_strength;
		let shift_y = (sy / n - self.center.1) * self.params.center_strength;
		for node in &mut self.nodes {
			node.x -= shift_x;
			node.y -= shift_y;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn distance(a: &SimNode, b: &SimNode) -> f64 {
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	fn pair(linked: bool) -> Simulation {
		let mut sim = Simulation::new(PhysicsConfig::default(), (0.0, 0.0));
		sim.set_nodes(vec![SimNode::new("a"), SimNode::new("b")]);
		if linked {
			sim.set_links(&[(0, 1)]);
		}
		sim
	}

	#[test]
	fn unplaced_nodes_follow_the_spiral() {
		let mut sim = Simulation::new(PhysicsConfig::default(), (0.0, 0.0));
		sim.set_nodes(vec![SimNode::new("a"), SimNode::new("b"), SimNode::new("c")]);
		for (i, node) in sim.nodes().iter().enumerate() {
			assert_eq!((node.x, node.y), default_position(i));
		}
		let (x0, y0) = default_position(0);
		assert!((x0 - 10.0 * 0.5f64.sqrt()).abs() < 1e-12);
		assert_eq!(y0, 0.0);
	}

	#[test]
	fn placed_and_pinned_nodes_keep_their_coordinates() {
		let mut placed = SimNode::new("a");
		(placed.x, placed.y) = (42.0, -7.0);
		let mut pinned = SimNode::new("b");
		(pinned.fx, pinned.fy) = (Some(3.0), Some(4.0));

		let mut sim = Simulation::new(PhysicsConfig::default(), (0.0, 0.0));
		sim.set_nodes(vec![placed, pinned]);
		assert_eq!((sim.nodes()[0].x, sim.nodes()[0].y), (42.0, -7.0));
		assert_eq!((sim.nodes()[1].x, sim.nodes()[1].y), (3.0, 4.0));
	}

	#[test]
	fn unlinked_nodes_repel() {
		let mut sim = pair(false);
		let before = distance(&sim.nodes()[0], &sim.nodes()[1]);
		for _ in 0..50 {
			sim.tick();
		}
		assert!(distance(&sim.nodes()[0], &sim.nodes()[1]) > before);
	}

	#[test]
	fn links_hold_nodes_closer_than_charge_alone() {
		let (mut free, mut linked) = (pair(false), pair(true));
		for _ in 0..300 {
			free.tick();
			linked.tick();
		}
		let d_free = distance(&free.nodes()[0], &free.nodes()[1]);
		let d_linked = distance(&linked.nodes()[0], &linked.nodes()[1]);
		assert!(d_linked < d_free, "{d_linked} >= {d_free}");
	}

	#[test]
	fn centering_moves_centroid_to_viewport_middle() {
		let mut sim = Simulation::new(PhysicsConfig::default(), (500.0, 500.0));
		sim.set_nodes(vec![SimNode::new("a"), SimNode::new("b"), SimNode::new("c")]);
		sim.tick();
		let n = sim.nodes().len() as f64;
		let cx = sim.nodes().iter().map(|n| n.x).sum::<f64>() / n;
		let cy = sim.nodes().iter().map(|n| n.y).sum::<f64>() / n;
		assert!((cx - 500.0).abs() < 1e-6, "{cx}");
		assert!((cy - 500.0).abs() < 1e-6, "{cy}");
	}

	#[test]
	fn pinned_node_does_not_move() {
		let mut sim = pair(true);
		let node = sim.node_mut(0).unwrap();
		(node.fx, node.fy) = (Some(10.0), Some(20.0));
		for _ in 0..20 {
			sim.tick();
		}
		let node = &sim.nodes()[0];
		assert_eq!((node.x, node.y, node.vx, node.vy), (10.0, 20.0, 0.0, 0.0));
	}

	#[test]
	fn energy_decays_until_the_simulation_stops() {
		let mut sim = pair(true);
		for _ in 0..100 {
			assert!(sim.step());
		}
		assert!(sim.is_active());
		for _ in 0..300 {
			sim.step();
		}
		assert!(!sim.is_active());
		assert!(sim.alpha() < PhysicsConfig::default().alpha_min);
		assert!(!sim.step());
	}

	#[test]
	fn alpha_target_reheats_a_cooled_simulation() {
		let mut sim = pair(true);
		while sim.step() {}
		let cold = sim.alpha();
		sim.set_alpha_target(0.3);
		assert_eq!(sim.alpha_target(), 0.3);
		sim.restart();
		for _ in 0..10 {
			sim.step();
		}
		assert!(sim.is_active());
		assert!(sim.alpha() > cold);
	}

	#[test]
	fn out_of_range_links_are_dropped() {
		let mut sim = pair(false);
		sim.set_links(&[(0, 1), (0, 5)]);
		assert_eq!(sim.links.len(), 1);
	}

	#[test]
	fn coincident_nodes_separate() {
		let mut a = SimNode::new("a");
		(a.x, a.y) = (0.0, 0.0);
		let mut b = SimNode::new("b");
		(b.x, b.y) = (0.0, 0.0);
		let mut sim = Simulation::new(PhysicsConfig::default(), (0.0, 0.0));
		sim.set_nodes(vec![a, b]);
		for _ in 0..5 {
			sim.tick();
		}
		let (a, b) = (&sim.nodes()[0], &sim.nodes()[1]);
		assert!(a.x.is_finite() && b.x.is_finite());
		assert!(distance(a, b) > 0.0);
	}
}
