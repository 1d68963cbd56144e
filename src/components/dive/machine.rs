//! Reveal/dive state machine.
//!
//! The landing page starts in [`Mode::Hero`]: the graph is a dimmed backdrop
//! behind the hero overlay and the page scrolls normally. "Explore the Graph"
//! enters [`Mode::Interactive`], where the overlay is hidden, page scroll is
//! locked and clicking a node opens its action panel. Page scroll is locked
//! exactly while the machine is interactive; the lock is an RAII guard so any
//! way out of dive mode (exit, unmount) releases it.

use log::{debug, info};

use crate::components::force_graph::GraphNode;

/// Shown once a backstory has been generated, before redirecting to it.
pub const GENERATED_MESSAGE: &str = "✨ Story generated! Redirecting…";

/// Something that can stop the page from scrolling.
pub trait PageScroll {
	fn set_locked(&self, locked: bool);
}

/// Holds page scroll locked until dropped.
#[derive(Debug)]
pub struct ScrollLock<S: PageScroll> {
	scroll: S,
}

impl<S: PageScroll> ScrollLock<S> {
	pub fn acquire(scroll: S) -> Self {
		scroll.set_locked(true);
		Self { scroll }
	}
}

impl<S: PageScroll> Drop for ScrollLock<S> {
	fn drop(&mut self) {
		self.scroll.set_locked(false);
	}
}

/// Identifies one generation request. Only the request matching the panel's
/// current pending ticket may change the panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationTicket {
	pub node_id: String,
	pub slug: String,
	seq: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum GenerationStatus {
	#[default]
	Idle,
	Pending(GenerationTicket),
	/// Generated; `redirect` is followed after the confirmation delay.
	Succeeded {
		ticket: GenerationTicket,
		redirect: String,
	},
	Failed(String),
}

/// What the panel's call to action does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelAction {
	/// Link to the existing backstory.
	Read(String),
	/// Ask the backend to write one. `busy` while a request is in flight.
	Generate { busy: bool },
}

/// The action panel of the selected node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodePanel {
	pub node: GraphNode,
	pub status: GenerationStatus,
}

impl NodePanel {
	fn new(node: GraphNode) -> Self {
		Self {
			node,
			status: GenerationStatus::Idle,
		}
	}

	pub fn action(&self, wiki_base: &str) -> PanelAction {
		if self.node.has_wiki {
			PanelAction::Read(self.node.detail_path(wiki_base))
		} else {
			PanelAction::Generate {
				busy: self.is_busy(),
			}
		}
	}

	/// True while a request is in flight or a redirect is scheduled.
	pub fn is_busy(&self) -> bool {
		matches!(
			self.status,
			GenerationStatus::Pending(_) | GenerationStatus::Succeeded { .. }
		)
	}

	/// Facts listed under the node's name.
	pub fn details(&self) -> Vec<String> {
		let mut lines = Vec::with_capacity(2);
		if self.node.thank_you_count > 0 {
			lines.push(format!("💜 {} thank-yous", self.node.thank_you_count));
		}
		lines.push(if self.node.has_wiki { "📖 Has wiki page" } else { "No story yet" }.to_string());
		lines
	}

	/// Feedback line under the action, if any.
	pub fn message(&self) -> Option<&str> {
		match &self.status {
			GenerationStatus::Succeeded { .. } => Some(GENERATED_MESSAGE),
			GenerationStatus::Failed(error) => Some(error),
			_ => None,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Mode {
	#[default]
	Hero,
	Interactive { panel: Option<NodePanel> },
}

pub struct DiveMachine<S: PageScroll + Clone> {
	mode: Mode,
	scroll: S,
	lock: Option<ScrollLock<S>>,
	wiki_base: String,
	next_seq: u64,
}

impl<S: PageScroll + Clone> DiveMachine<S> {
	pub fn new(scroll: S, wiki_base: impl Into<String>) -> Self {
		Self {
			mode: Mode::Hero,
			scroll,
			lock: None,
			wiki_base: wiki_base.into(),
			next_seq: 0,
		}
	}

	pub fn is_interactive(&self) -> bool {
		matches!(self.mode, Mode::Interactive { .. })
	}

	pub fn overlay_visible(&self) -> bool {
		!self.is_interactive()
	}

	pub fn scroll_locked(&self) -> bool {
		self.lock.is_some()
	}

	pub fn panel(&self) -> Option<&NodePanel> {
		match &self.mode {
			Mode::Interactive { panel } => panel.as_ref(),
			Mode::Hero => None,
		}
	}

	pub fn wiki_base(&self) -> &str {
		&self.wiki_base
	}

	/// Enters dive mode. No-op if already interactive.
	pub fn explore(&mut self) {
		if self.is_interactive() {
			return;
		}
		info!("backstory-graph: entering dive mode");
		self.lock = Some(ScrollLock::acquire(self.scroll.clone()));
		self.mode = Mode::Interactive { panel: None };
	}

	/// Leaves dive mode, dropping the selection and any pending feedback.
	pub fn exit(&mut self) {
		if !self.is_interactive() {
			return;
		}
		info!("backstory-graph: leaving dive mode");
		self.mode = Mode::Hero;
		self.lock = None;
	}

	/// Opens the panel for `node`, replacing any other selection. Returns
	/// false outside dive mode. Re-selecting the open node keeps its panel.
	pub fn select(&mut self, node: GraphNode) -> bool {
		let Mode::Interactive { panel } = &mut self.mode else {
			return false;
		};
		if panel.as_ref().is_some_and(|p| p.node.id == node.id) {
			return true;
		}
		debug!("backstory-graph: selected {}", node.id);
		*panel = Some(NodePanel::new(node));
		true
	}

	pub fn close_panel(&mut self) {
		if let Mode::Interactive { panel } = &mut self.mode {
			*panel = None;
		}
	}

	/// Marks the open panel busy and hands out the ticket for its request.
	pub fn begin_generate(&mut self) -> Option<GenerationTicket> {
		let Mode::Interactive { panel: Some(panel) } = &mut self.mode else {
			return None;
		};
		if panel.node.has_wiki || panel.is_busy() {
			return None;
		}
		self.next_seq += 1;
		let ticket = GenerationTicket {
			node_id: panel.node.id.clone(),
			slug: panel.node.slug.clone(),
			seq: self.next_seq,
		};
		panel.status = GenerationStatus::Pending(ticket.clone());
		Some(ticket)
	}

	/// Applies the outcome of a generation request. Results for a panel that
	/// has since been closed or replaced are dropped. On success returns the
	/// page to redirect to once the confirmation has been shown.
	pub fn finish_generate(
		&mut self,
		ticket: &GenerationTicket,
		result: Result<(), String>,
	) -> Option<String> {
		let wiki_base = self.wiki_base.clone();
		let Some(panel) = self.pending_panel(ticket) else {
			debug!("backstory-graph: dropping stale generation result for {}", ticket.node_id);
			return None;
		};
		match result {
			Ok(()) => {
				let redirect = panel.node.detail_path(&wiki_base);
				panel.status = GenerationStatus::Succeeded {
					ticket: ticket.clone(),
					redirect: redirect.clone(),
				};
				Some(redirect)
			}
			Err(error) => {
				panel.status = GenerationStatus::Failed(error);
				None
			}
		}
	}

	/// The scheduled redirect for `ticket`, if its panel is still showing.
	pub fn take_redirect(&self, ticket: &GenerationTicket) -> Option<String> {
		match self.panel() {
			Some(NodePanel {
				status: GenerationStatus::Succeeded { ticket: current, redirect },
				..
			}) if current == ticket => Some(redirect.clone()),
			_ => None,
		}
	}

	fn pending_panel(&mut self, ticket: &GenerationTicket) -> Option<&mut NodePanel> {
		match &mut self.mode {
			Mode::Interactive { panel: Some(panel) }
				if panel.status == GenerationStatus::Pending(ticket.clone()) =>
			{
				Some(panel)
			}
			_ => None,
		}
	}
}
