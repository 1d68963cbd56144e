//! Point quadtree used by the many-body and collision forces.
//!
//! Each cell caches its point count and centroid so distant groups of nodes
//! can be treated as one body (Barnes–Hut).

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

#[derive(Clone, Copy, Debug)]
pub struct Bounds {
	pub center: Point,
	pub half_extent: f64,
}

impl Bounds {
	fn from_points(points: &[Point]) -> Option<Self> {
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for p in points {
			min_x = min_x.min(p.x);
			min_y = min_y.min(p.y);
			max_x = max_x.max(p.x);
			max_y = max_y.max(p.y);
		}
		if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
			return None;
		}

		let span = (max_x - min_x).max(max_y - min_y).max(1.0);
		Some(Self {
			center: Point::new((min_x + max_x) * 0.5, (min_y + max_y) * 0.5),
			half_extent: span * 0.5 + 1.0,
		})
	}

	pub fn side_length(self) -> f64 {
		self.half_extent * 2.0
	}

	pub fn contains(self, p: Point) -> bool {
		(p.x - self.center.x).abs() <= self.half_extent
			&& (p.y - self.center.y).abs() <= self.half_extent
	}

	/// Squared distance from `p` to the nearest point of the cell (0 inside).
	pub fn distance_sq_to(self, p: Point) -> f64 {
		let dx = ((p.x - self.center.x).abs() - self.half_extent).max(0.0);
		let dy = ((p.y - self.center.y).abs() - self.half_extent).max(0.0);
		dx * dx + dy * dy
	}

	fn child(self, quadrant: usize) -> Self {
		let quarter = self.half_extent * 0.5;
		let (ox, oy) = match quadrant {
			0 => (-quarter, -quarter),
			1 => (quarter, -quarter),
			2 => (-quarter, quarter),
			_ => (quarter, quarter),
		};
		Self {
			center: Point::new(self.center.x + ox, self.center.y + oy),
			half_extent: quarter,
		}
	}

	fn quadrant_for(self, p: Point) -> usize {
		match (p.x >= self.center.x, p.y >= self.center.y) {
			(false, false) => 0,
			(true, false) => 1,
			(false, true) => 2,
			(true, true) => 3,
		}
	}
}

pub struct QuadNode {
	pub bounds: Bounds,
	pub centroid: Point,
	/// Number of points below this cell.
	pub mass: f64,
	/// Point indices; only populated on leaves.
	pub indices: Vec<usize>,
	pub children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
	pub fn build(points: &[Point]) -> Option<Self> {
		let bounds = Bounds::from_points(points)?;
		Some(Self::build_node(bounds, (0..points.len()).collect(), points, 0))
	}

	fn build_node(bounds: Bounds, indices: Vec<usize>, points: &[Point], depth: usize) -> Self {
		let mass = indices.len() as f64;
		let mut centroid = Point::default();
		for &i in &indices {
			centroid.x += points[i].x;
			centroid.y += points[i].y;
		}
		if mass > 0.0 {
			centroid.x /= mass;
			centroid.y /= mass;
		}

		let mut node = Self {
			bounds,
			centroid,
			mass,
			indices,
			children: std::array::from_fn(|_| None),
		};
		if depth >= MAX_DEPTH || node.indices.len() <= LEAF_CAPACITY {
			return node;
		}

		let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
		for &i in &node.indices {
			buckets[bounds.quadrant_for(points[i])].push(i);
		}
		// Coincident points would otherwise recurse to MAX_DEPTH for nothing.
		if buckets.iter().filter(|b| !b.is_empty()).count() <= 1 {
			return node;
		}

		for (quadrant, bucket) in buckets.into_iter().enumerate() {
			if bucket.is_empty() {
				continue;
			}
			node.children[quadrant] = Some(Box::new(Self::build_node(
				bounds.child(quadrant),
				bucket,
				points,
				depth + 1,
			)));
		}
		node.indices.clear();
		node
	}

	pub fn is_leaf(&self) -> bool {
		self.children.iter().all(Option::is_none)
	}

	/// Calls `f` with every point index in cells that come within `radius` of `p`.
	pub fn visit_within(&self, p: Point, radius: f64, f: &mut impl FnMut(usize)) {
		if self.bounds.distance_sq_to(p) > radius * radius {
			return;
		}
		if self.is_leaf() {
			for &i in &self.indices {
				f(i);
			}
			return;
		}
		for child in self.children.iter().flatten() {
			child.visit_within(p, radius, f);
		}
	}
}
