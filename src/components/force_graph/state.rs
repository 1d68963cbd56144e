//! Graph simulation state and interaction tracking.
//!
//! Wraps the layout [`Simulation`] with the view transform for pan/zoom,
//! pointer gestures (node drag, canvas pan, click), hover highlighting with a
//! smoothed grow effect, the tooltip model and the entrance fade.

use std::collections::HashMap;

use log::debug;

use super::simulation::{NodeHandle, ResolvedLink, Simulation, SimulationConfig};
use super::theme::Theme;
use super::types::{GraphData, GraphNode, NodeKind};

pub const MIN_ZOOM: f64 = 0.3;
pub const MAX_ZOOM: f64 = 4.0;
/// Pointer travel (screen px) below which a press on a node counts as a click.
const CLICK_SLOP: f64 = 3.0;
/// Zoom step of one wheel notch.
const WHEEL_ZOOM_STEP: f64 = 1.1;

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor, clamped to `MIN_ZOOM..=MAX_ZOOM`.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

impl ViewTransform {
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(gx * self.k + self.x, gy * self.k + self.y)
	}

	/// Scales by `factor` around the screen point `(sx, sy)`, which stays put.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node: Option<NodeHandle>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
	/// Set once the pointer leaves the click slop.
	pub moved: bool,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Hovered node plus the per-node grow animation.
///
/// Grow progress (0 = resting, 1 = fully enlarged) is eased with exponential
/// smoothing so nodes swell and shrink over roughly 150 ms.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub hovered: Option<NodeHandle>,
	grow: HashMap<NodeHandle, f64>,
}

impl HoverState {
	const GROW_SPEED: f64 = 20.0;

	pub fn set(&mut self, node: Option<NodeHandle>) {
		self.hovered = node;
		if let Some(h) = node {
			self.grow.entry(h).or_insert(0.0);
		}
	}

	pub fn tick(&mut self, dt: f64) {
		let factor = 1.0 - (-Self::GROW_SPEED * dt).exp();
		let hovered = self.hovered;
		self.grow.retain(|h, progress| {
			let target = if hovered == Some(*h) { 1.0 } else { 0.0 };
			*progress += (target - *progress) * factor;
			target > 0.0 || *progress > 0.005
		});
	}

	/// Grow progress of `node` in `[0, 1]`.
	pub fn grow(&self, node: NodeHandle) -> f64 {
		self.grow.get(&node).copied().unwrap_or(0.0)
	}

	/// Strongest grow in flight; how far the rest of the graph is dimmed.
	pub fn focus(&self) -> f64 {
		self.grow.values().copied().fold(0.0, f64::max)
	}

	pub fn clear(&mut self) {
		self.hovered = None;
		self.grow.clear();
	}
}

/// Staggered fade-in of nodes and labels after a data set is mounted.
#[derive(Clone, Debug, Default)]
pub struct Entrance {
	elapsed_ms: f64,
}

impl Entrance {
	pub const FADE_MS: f64 = 800.0;
	pub const STAGGER_MS: f64 = 30.0;
	pub const LABEL_DELAY_MS: f64 = 400.0;

	pub fn advance(&mut self, dt: f64) {
		self.elapsed_ms += dt * 1000.0;
	}

	pub fn node_opacity(&self, index: usize) -> f64 {
		Self::ramp(self.elapsed_ms - index as f64 * Self::STAGGER_MS)
	}

	pub fn label_opacity(&self, index: usize) -> f64 {
		Self::ramp(self.elapsed_ms - index as f64 * Self::STAGGER_MS - Self::LABEL_DELAY_MS)
	}

	fn ramp(ms: f64) -> f64 {
		(ms / Self::FADE_MS).clamp(0.0, 1.0)
	}
}

/// Text shown next to the pointer while a node is hovered.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	pub title: String,
	pub creator: Option<String>,
	pub stats: Vec<String>,
	/// Position relative to the canvas, in screen pixels.
	pub x: f64,
	pub y: f64,
}

impl Tooltip {
	const OFFSET_X: f64 = 16.0;
	const OFFSET_Y: f64 = -10.0;

	pub fn for_node(node: &GraphNode, pointer_x: f64, pointer_y: f64) -> Self {
		let mut stats = vec![match node.kind {
			NodeKind::Package => format!("👥 {} developers", node.user_count),
			NodeKind::Project => format!("📦 {}", node.tag.as_deref().unwrap_or("project")),
		}];
		if node.thank_you_count > 0 {
			stats.push(format!("💜 {} thank-yous", node.thank_you_count));
		}
		if node.has_wiki {
			stats.push("📖 Has wiki page".to_string());
		}
		Self {
			title: node.name.clone(),
			creator: node.creator_name.as_ref().map(|c| format!("by {c}")),
			stats,
			x: pointer_x + Self::OFFSET_X,
			y: pointer_y + Self::OFFSET_Y,
		}
	}
}

/// How the surface is being used by its host.
#[derive(Clone, Debug, PartialEq)]
pub struct Interaction {
	/// Fullscreen exploration. When false the graph is a page backdrop and
	/// wheel events are left to the page.
	pub interactive: bool,
	/// A click handler is registered; clicks are handed to it instead of
	/// navigating.
	pub delegate_clicks: bool,
	/// Prefix of detail pages, e.g. "/wiki".
	pub wiki_base: String,
}

impl Default for Interaction {
	fn default() -> Self {
		Self {
			interactive: false,
			delegate_clicks: false,
			wiki_base: "/wiki".to_string(),
		}
	}
}

/// What a completed click on a node asks the host to do.
#[derive(Clone, Debug, PartialEq)]
pub enum ClickAction {
	Delegate(GraphNode),
	Navigate(String),
	None,
}

/// Core graph state combining the simulation with interaction tracking.
///
/// Created once when the component mounts, then mutated by pointer handlers
/// and the animation loop, all on the browser's event loop.
pub struct ForceGraphState {
	pub sim: Simulation,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub entrance: Entrance,
	pub theme: Theme,
	pub width: f64,
	pub height: f64,
	/// Last pointer position over the canvas, if the pointer is over it.
	pub pointer: Option<(f64, f64)>,
	interaction: Interaction,
	config: SimulationConfig,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64, interaction: Interaction) -> Self {
		Self::with_config(data, width, height, interaction, SimulationConfig::default())
	}

	pub fn with_config(
		data: &GraphData,
		width: f64,
		height: f64,
		interaction: Interaction,
		config: SimulationConfig,
	) -> Self {
		Self {
			sim: Simulation::new(data, width, height, config.clone()),
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			entrance: Entrance::default(),
			theme: Theme::default(),
			width,
			height,
			pointer: None,
			interaction,
			config,
		}
	}

	/// Swaps in a whole new data set and restarts the layout from scratch.
	pub fn replace_data(&mut self, data: &GraphData) {
		self.sim = Simulation::new(data, self.width, self.height, self.config.clone());
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.hover.clear();
		self.entrance = Entrance::default();
	}

	/// Single entry point for changing how the host uses the surface.
	pub fn reconfigure(&mut self, interaction: Interaction) {
		if interaction == self.interaction {
			return;
		}
		debug!(
			"backstory-graph: surface reconfigured (interactive = {})",
			interaction.interactive
		);
		if !interaction.interactive {
			self.release_drag();
			self.pan.active = false;
		}
		self.interaction = interaction;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.sim.resize(width, height);
	}

	/// Advances physics and animations by `dt` seconds. Returns whether the
	/// layout moved.
	pub fn tick(&mut self, dt: f64) -> bool {
		let moved = self.sim.step();
		self.hover.tick(dt);
		self.entrance.advance(dt);
		moved
	}

	pub fn radius_of(&self, node: NodeHandle) -> f64 {
		let base = self.sim.node(node).map_or(0.0, GraphNode::radius);
		base * (1.0 + (self.theme.node.hover_scale - 1.0) * self.hover.grow(node))
	}

	/// Node under a screen point. The hovered node keeps its enlarged hit area.
	pub fn node_at(&self, sx: f64, sy: f64) -> Option<NodeHandle> {
		let (gx, gy) = self.transform.screen_to_graph(sx, sy);
		if let Some(h) = self.hover.hovered {
			if let Some((x, y)) = self.sim.position(h) {
				let r = self.radius_of(h);
				if (x - gx).powi(2) + (y - gy).powi(2) <= r * r {
					return Some(h);
				}
			}
		}
		self.sim.find(gx, gy, 1.0)
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		self.pointer = Some((sx, sy));
		if let Some(h) = self.node_at(sx, sy) {
			let Some((x, y)) = self.sim.position(h) else {
				return;
			};
			self.sim.drag_start(h);
			self.drag = DragState {
				node: Some(h),
				start_x: sx,
				start_y: sy,
				node_start_x: x,
				node_start_y: y,
				moved: false,
			};
		} else {
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		self.pointer = Some((sx, sy));
		if let Some(h) = self.drag.node {
			let (dx, dy) = (sx - self.drag.start_x, sy - self.drag.start_y);
			if dx.hypot(dy) > CLICK_SLOP {
				self.drag.moved = true;
			}
			if self.drag.moved {
				let k = self.transform.k;
				self.sim
					.drag_to(h, self.drag.node_start_x + dx / k, self.drag.node_start_y + dy / k);
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		} else {
			let hovered = self.node_at(sx, sy);
			self.hover.set(hovered);
		}
	}

	/// Ends the current gesture; a press that never moved on a node is a click.
	pub fn pointer_up(&mut self) -> ClickAction {
		self.pan.active = false;
		let Some(h) = self.drag.node else {
			return ClickAction::None;
		};
		let clicked = !self.drag.moved;
		self.release_drag();
		if clicked {
			self.click_action(h)
		} else {
			ClickAction::None
		}
	}

	pub fn pointer_leave(&mut self) {
		self.release_drag();
		self.pan.active = false;
		self.pointer = None;
		self.hover.set(None);
	}

	/// Wheel zoom. Returns false when the wheel belongs to the page.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) -> bool {
		if !self.interaction.interactive {
			return false;
		}
		let factor = if delta_y > 0.0 {
			1.0 / WHEEL_ZOOM_STEP
		} else {
			WHEEL_ZOOM_STEP
		};
		self.transform.zoom_at(sx, sy, factor);
		true
	}

	/// Double-click zooms in on the pointer in every mode.
	pub fn double_click(&mut self, sx: f64, sy: f64) {
		if self.node_at(sx, sy).is_none() {
			self.transform.zoom_at(sx, sy, 2.0);
		}
	}

	pub fn click_action(&self, node: NodeHandle) -> ClickAction {
		let Some(node) = self.sim.node(node) else {
			return ClickAction::None;
		};
		if self.interaction.delegate_clicks {
			ClickAction::Delegate(node.clone())
		} else if node.has_wiki {
			ClickAction::Navigate(node.detail_path(&self.interaction.wiki_base))
		} else {
			ClickAction::None
		}
	}

	/// Stroke opacity of a link given the current hover, eased along with the
	/// hovered node's grow.
	pub fn link_opacity(&self, link: &ResolvedLink) -> f64 {
		let style = &self.theme.link;
		let touching = self
			.hover
			.grow(self.sim.handle(link.source))
			.max(self.hover.grow(self.sim.handle(link.target)));
		let dimming = (self.hover.focus() - touching).max(0.0);
		style.resting_opacity
			+ (style.highlight_opacity - style.resting_opacity) * touching
			+ (style.dimmed_opacity - style.resting_opacity) * dimming
	}

	pub fn tooltip(&self) -> Option<Tooltip> {
		let h = self.hover.hovered?;
		let (px, py) = self.pointer?;
		if self.drag.moved {
			return None;
		}
		self.sim.node(h).map(|n| Tooltip::for_node(n, px, py))
	}

	fn release_drag(&mut self) {
		if let Some(h) = self.drag.node.take() {
			self.sim.drag_end(h);
		}
		self.drag = DragState::default();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphLink, LinkKind};

	fn node(id: &str, has_wiki: bool) -> GraphNode {
		GraphNode {
			id: id.into(),
			name: id.to_uppercase(),
			slug: id.into(),
			has_wiki,
			..Default::default()
		}
	}

	fn data() -> GraphData {
		GraphData {
			nodes: vec![node("a", true), node("b", false), node("c", false)],
			links: vec![
				GraphLink {
					source: "a".into(),
					target: "b".into(),
					kind: LinkKind::Dependency,
				},
				GraphLink {
					source: "b".into(),
					target: "c".into(),
					kind: LinkKind::Peer,
				},
			],
		}
	}

	fn settled(interaction: Interaction) -> ForceGraphState {
		let mut state = ForceGraphState::new(&data(), 800.0, 600.0, interaction);
		while state.sim.step() {}
		state
	}

	fn interactive() -> Interaction {
		Interaction {
			interactive: true,
			..Default::default()
		}
	}

	fn screen_pos(state: &ForceGraphState, id: &str) -> (f64, f64) {
		let h = state.sim.handle_of(id).unwrap();
		let (x, y) = state.sim.position(h).unwrap();
		state.transform.graph_to_screen(x, y)
	}

	#[test]
	fn zoom_is_clamped() {
		let mut t = ViewTransform::default();
		for _ in 0..100 {
			t.zoom_at(0.0, 0.0, 2.0);
		}
		assert_eq!(t.k, MAX_ZOOM);
		for _ in 0..100 {
			t.zoom_at(0.0, 0.0, 0.5);
		}
		assert_eq!(t.k, MIN_ZOOM);
	}

	#[test]
	fn zoom_keeps_pointer_anchored() {
		let mut t = ViewTransform::default();
		let before = t.screen_to_graph(200.0, 150.0);
		t.zoom_at(200.0, 150.0, 1.7);
		let after = t.screen_to_graph(200.0, 150.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn wheel_is_left_to_page_when_decorative() {
		let mut state = settled(Interaction::default());
		assert!(!state.wheel(400.0, 300.0, -100.0));
		assert_eq!(state.transform.k, 1.0);

		state.reconfigure(interactive());
		assert!(state.wheel(400.0, 300.0, -100.0));
		assert!(state.transform.k > 1.0);
	}

	#[test]
	fn double_click_zooms_in_any_mode() {
		let mut state = settled(Interaction::default());
		state.double_click(5.0, 5.0);
		assert_eq!(state.transform.k, 2.0);
	}

	#[test]
	fn pan_moves_view_in_decorative_mode() {
		let mut state = settled(Interaction::default());
		state.pointer_down(5.0, 5.0);
		state.pointer_move(45.0, 25.0);
		assert_eq!(state.pointer_up(), ClickAction::None);
		assert_eq!((state.transform.x, state.transform.y), (40.0, 20.0));
	}

	#[test]
	fn click_navigates_without_handler() {
		let mut state = settled(interactive());
		let (x, y) = screen_pos(&state, "a");
		state.pointer_down(x, y);
		assert_eq!(state.pointer_up(), ClickAction::Navigate("/wiki/a".into()));
	}

	#[test]
	fn click_without_wiki_does_nothing() {
		let mut state = settled(interactive());
		let (x, y) = screen_pos(&state, "b");
		state.pointer_down(x, y);
		assert_eq!(state.pointer_up(), ClickAction::None);
	}

	#[test]
	fn click_is_delegated_to_handler() {
		let mut state = settled(Interaction {
			delegate_clicks: true,
			..interactive()
		});
		let (x, y) = screen_pos(&state, "b");
		state.pointer_down(x, y);
		state.pointer_move(x + 1.0, y);
		match state.pointer_up() {
			ClickAction::Delegate(node) => assert_eq!(node.id, "b"),
			other => panic!("expected delegate, got {other:?}"),
		}
	}

	#[test]
	fn drag_moves_node_and_suppresses_click() {
		let mut state = settled(interactive());
		state.transform.zoom_at(0.0, 0.0, 2.0);
		let h = state.sim.handle_of("a").unwrap();
		let (gx, gy) = state.sim.position(h).unwrap();
		let (x, y) = screen_pos(&state, "a");

		state.pointer_down(x, y);
		state.pointer_move(x + 40.0, y - 20.0);
		state.tick(0.016);
		let (nx, ny) = state.sim.position(h).unwrap();
		assert!((nx - (gx + 20.0)).abs() < 1e-9);
		assert!((ny - (gy - 10.0)).abs() < 1e-9);
		assert!(state.tooltip().is_none());

		assert_eq!(state.pointer_up(), ClickAction::None);
		assert!(!state.sim.is_dragging());
		assert!(state.sim.body(h).unwrap().fixed.is_none());
	}

	#[test]
	fn leaving_dive_mode_releases_drag() {
		let mut state = settled(interactive());
		let (x, y) = screen_pos(&state, "c");
		state.pointer_down(x, y);
		assert!(state.sim.is_dragging());
		state.reconfigure(Interaction::default());
		assert!(!state.sim.is_dragging());
		assert!(state.drag.node.is_none());
	}

	#[test]
	fn hover_highlights_touching_links() {
		let mut state = settled(interactive());
		let (x, y) = screen_pos(&state, "a");
		let links: Vec<ResolvedLink> = state.sim.links().to_vec();
		assert!(links.iter().all(|l| state.link_opacity(l) == 0.4));

		let settle = |state: &mut ForceGraphState| {
			for _ in 0..30 {
				state.tick(0.016);
			}
		};
		let close = |a: f64, b: f64| (a - b).abs() < 0.01;

		state.pointer_move(x, y);
		assert_eq!(state.link_opacity(&links[0]), 0.4);
		settle(&mut state);
		assert!(close(state.link_opacity(&links[0]), 0.8));
		assert!(close(state.link_opacity(&links[1]), 0.15));

		state.pointer_leave();
		settle(&mut state);
		assert!(links.iter().all(|l| close(state.link_opacity(l), 0.4)));
	}

	#[test]
	fn hover_grows_then_shrinks() {
		let mut state = settled(interactive());
		let h = state.sim.handle_of("b").unwrap();
		let base = state.sim.node(h).unwrap().radius();
		let (x, y) = screen_pos(&state, "b");

		state.pointer_move(x, y);
		for _ in 0..30 {
			state.tick(0.016);
		}
		assert!((state.radius_of(h) - base * 1.3).abs() < 0.01);

		state.pointer_leave();
		for _ in 0..30 {
			state.tick(0.016);
		}
		assert!((state.radius_of(h) - base).abs() < 0.01);
	}

	#[test]
	fn tooltip_describes_hovered_node() {
		let mut state = settled(interactive());
		let (x, y) = screen_pos(&state, "a");
		state.pointer_move(x, y);
		let tip = state.tooltip().unwrap();
		assert_eq!(tip.title, "A");
		assert_eq!(tip.stats, vec!["👥 0 developers", "📖 Has wiki page"]);
		assert_eq!((tip.x, tip.y), (x + 16.0, y - 10.0));
	}

	#[test]
	fn tooltip_for_project() {
		let node = GraphNode {
			name: "Ledger".into(),
			kind: NodeKind::Project,
			tag: Some("fintech".into()),
			thank_you_count: 3,
			creator_name: Some("Ada".into()),
			..Default::default()
		};
		let tip = Tooltip::for_node(&node, 0.0, 0.0);
		assert_eq!(tip.creator.as_deref(), Some("by Ada"));
		assert_eq!(tip.stats, vec!["📦 fintech", "💜 3 thank-yous"]);
	}

	#[test]
	fn entrance_is_staggered() {
		let mut e = Entrance::default();
		assert_eq!(e.node_opacity(0), 0.0);
		e.advance(0.4);
		assert!((e.node_opacity(0) - 0.5).abs() < 1e-9);
		assert!(e.node_opacity(5) < e.node_opacity(0));
		assert_eq!(e.label_opacity(0), 0.0);
		e.advance(10.0);
		assert_eq!(e.node_opacity(50), 1.0);
		assert_eq!(e.label_opacity(50), 1.0);
	}

	#[test]
	fn entrance_does_not_gate_clicks() {
		let mut state = ForceGraphState::new(&data(), 800.0, 600.0, interactive());
		let (x, y) = screen_pos(&state, "a");
		state.pointer_down(x, y);
		assert_eq!(state.pointer_up(), ClickAction::Navigate("/wiki/a".into()));
	}

	#[test]
	fn replace_data_restarts_everything() {
		let mut state = settled(interactive());
		let old_generation = state.sim.generation();
		let (x, y) = screen_pos(&state, "a");
		state.pointer_move(x, y);
		state.pointer_down(x, y);

		let next = GraphData {
			nodes: vec![node("z", false)],
			links: vec![],
		};
		state.replace_data(&next);
		assert_ne!(state.sim.generation(), old_generation);
		assert_eq!(state.sim.len(), 1);
		assert!(state.hover.hovered.is_none());
		assert!(state.drag.node.is_none());
		assert!(state.sim.is_hot());
		assert_eq!(state.entrance.node_opacity(0), 0.0);
	}

	#[test]
	fn empty_graph_is_inert() {
		let mut state = ForceGraphState::new(&GraphData::default(), 800.0, 600.0, interactive());
		assert!(!state.tick(0.016));
		state.pointer_down(400.0, 300.0);
		state.pointer_move(410.0, 300.0);
		assert_eq!(state.pointer_up(), ClickAction::None);
		assert!(state.tooltip().is_none());
		state.resize(100.0, 100.0);
		assert!(!state.tick(0.016));
	}
}
