//! Force-directed layout engine.
//!
//! An iterative relaxation in the style of a velocity-Verlet force
//! simulation: every tick applies link springs, many-body repulsion,
//! centering, collision and weak x/y positioning forces to a private
//! positional overlay, then integrates velocities with decay. The energy
//! level (`alpha`) cools geometrically towards `alpha_target`; once it falls
//! below `alpha_min` the simulation stops doing work until it is reheated by
//! a drag, a resize, or new data.
//!
//! Caller-owned [`GraphNode`] records are cloned once into an immutable table;
//! positions live in a separate `Vec<Body>` indexed like that table. Handles
//! carry the generation of the simulation that issued them, so a handle held
//! across a data swap is rejected instead of addressing an unrelated node.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info, warn};

use super::quadtree::{Point, QuadNode};
use super::types::{GraphData, GraphNode, LinkKind};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Tunable force parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
	/// Rest length of link springs.
	pub link_distance: f64,
	pub link_strength: f64,
	/// Negative values repel.
	pub charge_strength: f64,
	pub charge_distance_min: f64,
	/// Pairs further apart than this do not interact.
	pub charge_distance_max: f64,
	/// Barnes–Hut accuracy; smaller is more exact.
	pub theta: f64,
	/// Strength of the mean shift towards the viewport center.
	pub center_strength: f64,
	/// Per-axis pull of every node towards the viewport center.
	pub position_strength: f64,
	/// Extra clearance added to each node's radius for collisions.
	pub collision_margin: f64,
	pub collision_strength: f64,
	pub collision_iterations: usize,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	/// Fraction of velocity lost every tick.
	pub velocity_decay: f64,
	/// Energy held while at least one node is being dragged.
	pub drag_alpha_target: f64,
	/// Energy injected when the viewport changes size.
	pub resize_alpha: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			link_distance: 80.0,
			link_strength: 0.4,
			charge_strength: -200.0,
			charge_distance_min: 1.0,
			charge_distance_max: 400.0,
			theta: 0.9,
			center_strength: 1.0,
			position_strength: 0.05,
			collision_margin: 4.0,
			collision_strength: 1.0,
			collision_iterations: 1,
			alpha_min,
			// Cools from 1 to alpha_min in ~300 ticks.
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
			resize_alpha: 0.3,
		}
	}
}

/// Engine-owned position and velocity of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Pinned position while a drag holds the node.
	pub fixed: Option<(f64, f64)>,
}

/// Stable reference to a node inside one particular simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle {
	index: usize,
	generation: u64,
}

impl NodeHandle {
	pub fn index(self) -> usize {
		self.index
	}
}

/// A link whose endpoints were found in the node set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedLink {
	pub source: usize,
	pub target: usize,
	pub kind: LinkKind,
}

/// Linear congruential generator used for jiggling coincident points.
#[derive(Clone, Debug)]
struct Lcg(u64);

impl Lcg {
	const A: u64 = 1_664_525;
	const C: u64 = 1_013_904_223;
	const M: u64 = 1 << 32;

	fn next(&mut self) -> f64 {
		self.0 = (Self::A * self.0 + Self::C) % Self::M;
		self.0 as f64 / Self::M as f64
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

pub struct Simulation {
	nodes: Rc<[GraphNode]>,
	bodies: Vec<Body>,
	/// Collision radius per node (rendered radius + margin).
	collide_radii: Vec<f64>,
	links: Vec<ResolvedLink>,
	/// Share of each link correction applied to its target.
	link_bias: Vec<f64>,
	index: HashMap<String, usize>,
	config: SimulationConfig,
	center: Point,
	alpha: f64,
	alpha_target: f64,
	running: bool,
	dragging: HashSet<usize>,
	generation: u64,
	rng: Lcg,
}

impl Simulation {
	/// Clones `data` into a fresh simulation centered in a `width`×`height` viewport.
	///
	/// Links with an endpoint missing from the node set are dropped with a
	/// warning. Repeated node ids keep their first occurrence.
	pub fn new(data: &GraphData, width: f64, height: f64, config: SimulationConfig) -> Self {
		let mut index = HashMap::with_capacity(data.nodes.len());
		let mut nodes = Vec::with_capacity(data.nodes.len());
		for node in &data.nodes {
			if index.contains_key(&node.id) {
				warn!("backstory-graph: duplicate node id {:?}, keeping the first", node.id);
				continue;
			}
			index.insert(node.id.clone(), nodes.len());
			nodes.push(node.clone());
		}

		let mut links = Vec::with_capacity(data.links.len());
		for link in &data.links {
			match (index.get(&link.source), index.get(&link.target)) {
				(Some(&source), Some(&target)) => links.push(ResolvedLink {
					source,
					target,
					kind: link.kind,
				}),
				_ => warn!(
					"backstory-graph: dropping link {} -> {}: endpoint not in node set",
					link.source, link.target
				),
			}
		}

		let mut degree = vec![0usize; nodes.len()];
		for link in &links {
			degree[link.source] += 1;
			degree[link.target] += 1;
		}
		let link_bias = links
			.iter()
			.map(|l| degree[l.source] as f64 / (degree[l.source] + degree[l.target]) as f64)
			.collect();

		let center = Point::new(width / 2.0, height / 2.0);
		let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
		let bodies = (0..nodes.len())
			.map(|i| {
				let radius = 10.0 * (0.5 + i as f64).sqrt();
				let angle = i as f64 * golden_angle;
				Body {
					x: center.x + radius * angle.cos(),
					y: center.y + radius * angle.sin(),
					..Body::default()
				}
			})
			.collect();
		let collide_radii = nodes
			.iter()
			.map(|n| n.radius() + config.collision_margin)
			.collect();

		let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
		info!(
			"backstory-graph: simulation #{} with {} nodes, {} links",
			generation,
			nodes.len(),
			links.len()
		);

		Self {
			nodes: nodes.into(),
			bodies,
			collide_radii,
			links,
			link_bias,
			index,
			config,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			running: true,
			dragging: HashSet::new(),
			generation,
			rng: Lcg(1),
		}
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Resumes ticking after the simulation cooled down.
	pub fn restart(&mut self) {
		self.running = true;
	}

	/// Whether `step` will do any work.
	pub fn is_hot(&self) -> bool {
		self.running && !self.bodies.is_empty()
	}

	pub fn links(&self) -> &[ResolvedLink] {
		&self.links
	}

	pub fn handle_of(&self, id: &str) -> Option<NodeHandle> {
		self.index.get(id).map(|&index| self.handle(index))
	}

	pub fn handle(&self, index: usize) -> NodeHandle {
		NodeHandle {
			index,
			generation: self.generation,
		}
	}

	fn resolve(&self, handle: NodeHandle) -> Option<usize> {
		(handle.generation == self.generation && handle.index < self.bodies.len())
			.then_some(handle.index)
	}

	pub fn node(&self, handle: NodeHandle) -> Option<&GraphNode> {
		self.resolve(handle).map(|i| &self.nodes[i])
	}

	pub fn body(&self, handle: NodeHandle) -> Option<&Body> {
		self.resolve(handle).map(|i| &self.bodies[i])
	}

	pub fn position(&self, handle: NodeHandle) -> Option<(f64, f64)> {
		self.body(handle).map(|b| (b.x, b.y))
	}

	/// Iterates nodes in draw order together with their current body.
	pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &GraphNode, &Body)> {
		self.nodes
			.iter()
			.zip(&self.bodies)
			.enumerate()
			.map(|(i, (node, body))| (self.handle(i), node, body))
	}

	/// Endpoint positions of every link, in link order.
	pub fn link_segments(&self) -> impl Iterator<Item = (&ResolvedLink, &Body, &Body)> {
		self.links
			.iter()
			.map(|l| (l, &self.bodies[l.source], &self.bodies[l.target]))
	}

	/// Topmost node whose radius (times `radius_scale`) covers `(x, y)`.
	pub fn find(&self, x: f64, y: f64, radius_scale: f64) -> Option<NodeHandle> {
		(0..self.bodies.len())
			.rev()
			.find(|&i| {
				let r = self.nodes[i].radius() * radius_scale;
				let (dx, dy) = (self.bodies[i].x - x, self.bodies[i].y - y);
				dx * dx + dy * dy <= r * r
			})
			.map(|i| self.handle(i))
	}

	/// Pins a node where it currently is and heats the simulation up.
	pub fn drag_start(&mut self, handle: NodeHandle) -> bool {
		let Some(i) = self.resolve(handle) else {
			return false;
		};
		let body = &mut self.bodies[i];
		body.fixed = Some((body.x, body.y));
		if self.dragging.is_empty() {
			self.alpha_target = self.config.drag_alpha_target;
			self.restart();
		}
		self.dragging.insert(i);
		true
	}

	/// Moves the pin of a dragged node.
	pub fn drag_to(&mut self, handle: NodeHandle, x: f64, y: f64) -> bool {
		match self.resolve(handle) {
			Some(i) if self.dragging.contains(&i) => {
				self.bodies[i].fixed = Some((x, y));
				true
			}
			_ => false,
		}
	}

	/// Releases a dragged node back into the simulation.
	pub fn drag_end(&mut self, handle: NodeHandle) -> bool {
		let Some(i) = self.resolve(handle) else {
			return false;
		};
		if !self.dragging.remove(&i) {
			return false;
		}
		self.bodies[i].fixed = None;
		if self.dragging.is_empty() {
			self.alpha_target = 0.0;
		}
		true
	}

	pub fn is_dragging(&self) -> bool {
		!self.dragging.is_empty()
	}

	/// Re-targets the centering forces and sets a mild energy level so the
	/// layout glides over.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.center = Point::new(width / 2.0, height / 2.0);
		self.alpha = self.config.resize_alpha;
		self.restart();
	}

	pub fn center(&self) -> (f64, f64) {
		(self.center.x, self.center.y)
	}

	/// Advances one tick if the simulation is hot. Returns whether it ticked.
	pub fn step(&mut self) -> bool {
		if !self.is_hot() {
			return false;
		}
		self.tick();
		if self.alpha < self.config.alpha_min {
			self.running = false;
			debug!("backstory-graph: simulation #{} cooled", self.generation);
		}
		true
	}

	/// Runs exactly one tick regardless of temperature.
	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		if self.bodies.is_empty() {
			return;
		}

		self.apply_links();
		self.apply_charge();
		self.apply_center();
		for _ in 0..self.config.collision_iterations {
			self.apply_collision();
		}
		self.apply_positioning();

		let keep = 1.0 - self.config.velocity_decay;
		for body in &mut self.bodies {
			if let Some((fx, fy)) = body.fixed {
				body.x = fx;
				body.y = fy;
				body.vx = 0.0;
				body.vy = 0.0;
			} else {
				body.vx *= keep;
				body.vy *= keep;
				body.x += body.vx;
				body.y += body.vy;
			}
		}
	}

	fn apply_links(&mut self) {
		let scale = self.alpha * self.config.link_strength;
		for (link, &bias) in self.links.iter().zip(&self.link_bias) {
			if link.source == link.target {
				continue;
			}
			let (s, t) = (self.bodies[link.source], self.bodies[link.target]);
			let mut x = t.x + t.vx - s.x - s.vx;
			let mut y = t.y + t.vy - s.y - s.vy;
			if x == 0.0 {
				x = self.rng.jiggle();
			}
			if y == 0.0 {
				y = self.rng.jiggle();
			}
			let l = (x * x + y * y).sqrt();
			let k = (l - self.config.link_distance) / l * scale;
			x *= k;
			y *= k;

			let target = &mut self.bodies[link.target];
			target.vx -= x * bias;
			target.vy -= y * bias;
			let source = &mut self.bodies[link.source];
			source.vx += x * (1.0 - bias);
			source.vy += y * (1.0 - bias);
		}
	}

	fn apply_charge(&mut self) {
		let points: Vec<Point> = self.bodies.iter().map(|b| Point::new(b.x, b.y)).collect();
		let Some(tree) = QuadNode::build(&points) else {
			return;
		};
		let params = ChargeParams {
			strength: self.config.charge_strength * self.alpha,
			distance_min_sq: self.config.charge_distance_min.powi(2),
			distance_max_sq: self.config.charge_distance_max.powi(2),
			theta_sq: self.config.theta.powi(2),
		};
		for i in 0..self.bodies.len() {
			let (dvx, dvy) = accumulate_charge(&tree, i, &points, params, &mut self.rng);
			self.bodies[i].vx += dvx;
			self.bodies[i].vy += dvy;
		}
	}

	fn apply_center(&mut self) {
		let n = self.bodies.len() as f64;
		let (mut sx, mut sy) = (0.0, 0.0);
		for body in &self.bodies {
			sx += body.x;
			sy += body.y;
		}
		let shift_x = (sx / n - self.center.x) * self.config.center_strength;
		let shift_y = (sy / n - self.center.y) * self.config.center_strength;
		for body in &mut self.bodies {
			body.x -= shift_x;
			body.y -= shift_y;
		}
	}

	fn apply_collision(&mut self) {
		let predicted: Vec<Point> = self
			.bodies
			.iter()
			.map(|b| Point::new(b.x + b.vx, b.y + b.vy))
			.collect();
		let Some(tree) = QuadNode::build(&predicted) else {
			return;
		};
		let max_radius = self.collide_radii.iter().copied().fold(0.0, f64::max);
		let strength = self.config.collision_strength;
		let mut candidates = Vec::new();

		for i in 0..self.bodies.len() {
			let ri = self.collide_radii[i];
			let ri_sq = ri * ri;
			let p = predicted[i];
			candidates.clear();
			tree.visit_within(p, ri + max_radius, &mut |j| {
				if j > i {
					candidates.push(j);
				}
			});

			for &j in &candidates {
				let rj = self.collide_radii[j];
				let r = ri + rj;
				let other = self.bodies[j];
				let mut x = p.x - (other.x + other.vx);
				let mut y = p.y - (other.y + other.vy);
				let mut l = x * x + y * y;
				if l >= r * r {
					continue;
				}
				if x == 0.0 {
					x = self.rng.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.rng.jiggle();
					l += y * y;
				}
				let l = l.sqrt();
				let k = (r - l) / l * strength;
				x *= k;
				y *= k;

				// Heavier (larger) nodes move less.
				let rj_sq = rj * rj;
				let share = rj_sq / (ri_sq + rj_sq);
				let a = &mut self.bodies[i];
				a.vx += x * share;
				a.vy += y * share;
				let b = &mut self.bodies[j];
				b.vx -= x * (1.0 - share);
				b.vy -= y * (1.0 - share);
			}
		}
	}

	fn apply_positioning(&mut self) {
		let k = self.config.position_strength * self.alpha;
		for body in &mut self.bodies {
			body.vx += (self.center.x - body.x) * k;
			body.vy += (self.center.y - body.y) * k;
		}
	}
}

#[derive(Clone, Copy)]
struct ChargeParams {
	strength: f64,
	distance_min_sq: f64,
	distance_max_sq: f64,
	theta_sq: f64,
}

/// Velocity change on `index` from every other point, approximating far cells.
fn accumulate_charge(
	cell: &QuadNode,
	index: usize,
	points: &[Point],
	params: ChargeParams,
	rng: &mut Lcg,
) -> (f64, f64) {
	let p = points[index];
	if cell.mass <= 0.0 || cell.bounds.distance_sq_to(p) >= params.distance_max_sq {
		return (0.0, 0.0);
	}

	if cell.is_leaf() {
		let (mut dvx, mut dvy) = (0.0, 0.0);
		for &other in &cell.indices {
			if other == index {
				continue;
			}
			let (dx, dy) = pair_charge(p, points[other], 1.0, params, rng);
			dvx += dx;
			dvy += dy;
		}
		return (dvx, dvy);
	}

	let (dx, dy) = (cell.centroid.x - p.x, cell.centroid.y - p.y);
	let l = dx * dx + dy * dy;
	let width = cell.bounds.side_length();
	if !cell.bounds.contains(p) && width * width / params.theta_sq < l {
		return pair_charge(p, cell.centroid, cell.mass, params, rng);
	}

	let (mut dvx, mut dvy) = (0.0, 0.0);
	for child in cell.children.iter().flatten() {
		let (dx, dy) = accumulate_charge(child, index, points, params, rng);
		dvx += dx;
		dvy += dy;
	}
	(dvx, dvy)
}

fn pair_charge(p: Point, other: Point, mass: f64, params: ChargeParams, rng: &mut Lcg) -> (f64, f64) {
	let mut x = other.x - p.x;
	let mut y = other.y - p.y;
	let mut l = x * x + y * y;
	if l >= params.distance_max_sq {
		return (0.0, 0.0);
	}
	if x == 0.0 {
		x = rng.jiggle();
		l += x * x;
	}
	if y == 0.0 {
		y = rng.jiggle();
		l += y * y;
	}
	if l < params.distance_min_sq {
		l = (params.distance_min_sq * l).sqrt();
	}
	let w = params.strength * mass / l;
	(x * w, y * w)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphLink, NodeKind};

	fn package(id: &str, user_count: u32) -> GraphNode {
		GraphNode {
			id: id.into(),
			name: id.into(),
			slug: id.into(),
			kind: NodeKind::Package,
			user_count,
			..Default::default()
		}
	}

	fn link(source: &str, target: &str) -> GraphLink {
		GraphLink {
			source: source.into(),
			target: target.into(),
			kind: LinkKind::Dependency,
		}
	}

	fn star(n: usize) -> GraphData {
		let mut nodes = vec![GraphNode {
			kind: NodeKind::Project,
			..package("hub", 0)
		}];
		let mut links = Vec::new();
		for i in 0..n {
			let id = format!("pkg-{i}");
			nodes.push(package(&id, (i * 7 % 40) as u32));
			links.push(link("hub", &id));
		}
		GraphData { nodes, links }
	}

	fn sim(data: &GraphData) -> Simulation {
		Simulation::new(data, 800.0, 600.0, SimulationConfig::default())
	}

	fn distance(a: &Body, b: &Body) -> f64 {
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	#[test]
	fn every_node_appears_once() {
		let data = star(25);
		let s = sim(&data);
		let mut ids: Vec<&str> = s.iter().map(|(_, n, _)| n.id.as_str()).collect();
		ids.sort_unstable();
		let mut expected: Vec<&str> = data.nodes.iter().map(|n| n.id.as_str()).collect();
		expected.sort_unstable();
		assert_eq!(ids, expected);
	}

	#[test]
	fn duplicate_ids_keep_first() {
		let mut data = star(2);
		data.nodes.push(package("pkg-0", 99));
		let s = sim(&data);
		assert_eq!(s.len(), 3);
		let handle = s.handle_of("pkg-0").unwrap();
		assert_eq!(s.node(handle).unwrap().user_count, 0);
	}

	#[test]
	fn links_resolve_to_their_endpoints() {
		let data = star(6);
		let s = sim(&data);
		assert_eq!(s.links().len(), data.links.len());
		for (resolved, original) in s.links().iter().zip(&data.links) {
			assert_eq!(s.node(s.handle(resolved.source)).unwrap().id, original.source);
			assert_eq!(s.node(s.handle(resolved.target)).unwrap().id, original.target);
		}
	}

	#[test]
	fn dangling_links_are_dropped() {
		let mut data = star(3);
		data.links.push(link("hub", "missing"));
		data.links.push(link("ghost", "pkg-0"));
		let s = sim(&data);
		assert_eq!(s.links().len(), 3);
		assert_eq!(s.len(), 4);
	}

	#[test]
	fn empty_graph_does_no_work() {
		let mut s = sim(&GraphData::default());
		assert!(s.is_empty());
		assert!(!s.is_hot());
		assert!(!s.step());
		assert_eq!(s.iter().count(), 0);
		assert_eq!(s.link_segments().count(), 0);
		assert!(s.find(400.0, 300.0, 1.0).is_none());
		s.resize(100.0, 100.0);
		assert!(!s.step());
	}

	#[test]
	fn collisions_resolve_from_random_start() {
		let data = star(20);
		let mut s = sim(&data);
		let mut rng = Lcg(42);
		for body in &mut s.bodies {
			body.x = 380.0 + rng.next() * 40.0;
			body.y = 280.0 + rng.next() * 40.0;
		}
		for _ in 0..300 {
			s.tick();
		}
		let margin = s.config().collision_margin;
		let nodes: Vec<_> = s.iter().collect();
		for (i, (_, a, ba)) in nodes.iter().enumerate() {
			for (_, b, bb) in &nodes[i + 1..] {
				let min = a.radius() + b.radius() + margin;
				let d = distance(ba, bb);
				assert!(d >= min - 0.5, "{} and {} overlap: {d} < {min}", a.id, b.id);
			}
		}
	}

	#[test]
	fn two_node_scenario() {
		let data = GraphData {
			nodes: vec![package("a", 0), package("b", 10)],
			links: vec![link("a", "b")],
		};
		let mut s = sim(&data);
		let a = s.handle_of("a").unwrap();
		let b = s.handle_of("b").unwrap();
		assert_eq!(s.node(a).unwrap().radius(), 6.0);
		assert_eq!(s.node(b).unwrap().radius(), 11.0);
		assert_eq!(s.link_segments().count(), 1);

		let mut ticks = 0;
		while s.step() {
			ticks += 1;
			assert!(ticks < 1000, "simulation never cooled");
		}
		let d = distance(s.body(a).unwrap(), s.body(b).unwrap());
		assert!(d >= 17.0 + s.config().collision_margin, "too close: {d}");
	}

	#[test]
	fn cools_down_and_stops() {
		let mut s = sim(&star(5));
		let mut ticks = 0;
		while s.step() {
			ticks += 1;
		}
		assert!((250..=350).contains(&ticks), "cooled after {ticks} ticks");
		assert!(s.alpha() < s.config().alpha_min);
		assert!(!s.is_hot());
	}

	#[test]
	fn layout_stays_near_center() {
		let mut s = sim(&star(12));
		while s.step() {}
		let n = s.len() as f64;
		let (mx, my) = s
			.iter()
			.fold((0.0, 0.0), |(x, y), (_, _, b)| (x + b.x / n, y + b.y / n));
		assert!((mx - 400.0).abs() < 1.0);
		assert!((my - 300.0).abs() < 1.0);
	}

	#[test]
	fn linked_nodes_settle_near_link_distance() {
		let data = GraphData {
			nodes: vec![package("a", 0), package("b", 0)],
			links: vec![link("a", "b")],
		};
		let mut s = sim(&data);
		for _ in 0..600 {
			s.tick();
		}
		let d = distance(
			s.body(s.handle_of("a").unwrap()).unwrap(),
			s.body(s.handle_of("b").unwrap()).unwrap(),
		);
		// Repulsion stretches the spring a little past its rest length.
		assert!(d > 60.0 && d < 200.0, "distance {d}");
	}

	#[test]
	fn drag_pins_node_to_pointer() {
		let mut s = sim(&star(8));
		for _ in 0..50 {
			s.tick();
		}
		let h = s.handle_of("pkg-3").unwrap();
		assert!(s.drag_start(h));
		assert_eq!(s.alpha_target(), s.config().drag_alpha_target);
		assert!(s.drag_to(h, 12.5, -40.0));
		assert!(s.step());
		assert_eq!(s.position(h), Some((12.5, -40.0)));
		for _ in 0..20 {
			s.step();
		}
		assert_eq!(s.position(h), Some((12.5, -40.0)));
	}

	#[test]
	fn drag_release_frees_node() {
		let mut s = sim(&star(8));
		let h = s.handle_of("pkg-1").unwrap();
		s.drag_start(h);
		s.drag_to(h, 1500.0, 1500.0);
		s.step();
		assert!(s.drag_end(h));
		assert!(s.body(h).unwrap().fixed.is_none());
		assert_eq!(s.alpha_target(), 0.0);
		for _ in 0..10 {
			s.step();
		}
		assert_ne!(s.position(h), Some((1500.0, 1500.0)));
	}

	#[test]
	fn drag_reheats_cooled_simulation() {
		let mut s = sim(&star(4));
		while s.step() {}
		let h = s.handle_of("hub").unwrap();
		s.drag_start(h);
		assert!(s.is_hot());
		for _ in 0..200 {
			s.step();
		}
		assert!(s.alpha() > 0.25);
		s.drag_end(h);
		let mut ticks = 0;
		while s.step() {
			ticks += 1;
		}
		assert!(ticks > 0);
	}

	#[test]
	fn overlapping_drags_share_heat() {
		let mut s = sim(&star(4));
		let a = s.handle_of("pkg-0").unwrap();
		let b = s.handle_of("pkg-1").unwrap();
		s.drag_start(a);
		s.drag_start(b);
		s.drag_end(a);
		assert_eq!(s.alpha_target(), s.config().drag_alpha_target);
		s.drag_end(b);
		assert_eq!(s.alpha_target(), 0.0);
	}

	#[test]
	fn drag_to_without_start_is_ignored() {
		let mut s = sim(&star(2));
		let h = s.handle_of("pkg-0").unwrap();
		assert!(!s.drag_to(h, 0.0, 0.0));
		assert!(!s.drag_end(h));
	}

	#[test]
	fn stale_handles_are_rejected() {
		let data = star(3);
		let old = sim(&data);
		let mut fresh = sim(&data);
		let stale = old.handle_of("pkg-0").unwrap();
		assert_ne!(old.generation(), fresh.generation());
		assert!(fresh.node(stale).is_none());
		assert!(!fresh.drag_start(stale));
		assert!(fresh.handle_of("pkg-0").is_some());
	}

	#[test]
	fn resize_while_hot_drops_to_mild_energy() {
		let mut s = sim(&star(6));
		s.step();
		assert!(s.alpha() > 0.9);
		s.resize(1024.0, 768.0);
		assert_eq!(s.alpha(), 0.3);
	}

	#[test]
	fn resize_moves_center_and_reheats() {
		let mut s = sim(&star(6));
		while s.step() {}
		s.resize(1600.0, 1000.0);
		assert_eq!(s.center(), (800.0, 500.0));
		assert_eq!(s.alpha(), s.config().resize_alpha);
		while s.step() {}
		let n = s.len() as f64;
		let mx = s.iter().map(|(_, _, b)| b.x).sum::<f64>() / n;
		assert!((mx - 800.0).abs() < 1.0);
	}

	#[test]
	fn find_hits_node_under_point() {
		let mut s = sim(&star(5));
		while s.step() {}
		let h = s.handle_of("pkg-2").unwrap();
		let (x, y) = s.position(h).unwrap();
		assert_eq!(s.find(x + 1.0, y - 1.0, 1.0), Some(h));
		assert_eq!(s.find(-5000.0, -5000.0, 1.0), None);
	}

	#[test]
	fn input_is_not_aliased() {
		let mut data = star(3);
		let s = sim(&data);
		data.nodes[0].name = "renamed".into();
		let hub = s.handle_of("hub").unwrap();
		assert_eq!(s.node(hub).unwrap().name, "hub");
	}

	#[test]
	fn large_graph_stays_finite() {
		let mut s = sim(&star(400));
		for _ in 0..60 {
			s.tick();
		}
		assert!(s.iter().all(|(_, _, b)| b.x.is_finite() && b.y.is_finite()));
	}
}
