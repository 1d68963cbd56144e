//! The live graph: seed data first, then whatever the graph endpoint serves.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};

use super::force_graph::{ForceGraphCanvas, GraphData, GraphNode, NodeKind};
use crate::api;
use crate::config::{self, AppConfig};

/// Headline numbers shown under the hero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphStats {
	/// Nodes with a backstory page.
	pub stories: usize,
	pub projects: usize,
	pub thank_yous: u64,
}

impl GraphStats {
	pub fn of(data: &GraphData) -> Self {
		data.nodes.iter().fold(Self::default(), |mut stats, node| {
			stats.stories += usize::from(node.has_wiki);
			stats.projects += usize::from(node.kind == NodeKind::Project);
			stats.thank_yous += u64::from(node.thank_you_count);
			stats
		})
	}
}

/// Graph data to show before the endpoint answers: the page's embedded data
/// set if it has one, otherwise the seed stories.
pub fn initial_graph() -> GraphData {
	config::load_embedded_graph()
		.filter(|data| !data.is_empty())
		.unwrap_or_else(GraphData::seed)
}

/// Replaces `graph` with the endpoint's data once, if it returns any nodes.
/// Failures keep the current data.
pub fn refresh_graph(config: &AppConfig, graph: RwSignal<GraphData>) {
	let config = config.clone();
	spawn_local(async move {
		match api::fetch_graph(&config).await {
			Ok(data) if !data.is_empty() => {
				info!(
					"backstory-graph: loaded {} nodes, {} links",
					data.nodes.len(),
					data.links.len()
				);
				graph.set(data);
			}
			Ok(_) => info!("backstory-graph: graph endpoint returned no nodes, keeping current data"),
			Err(e) => warn!("backstory-graph: graph fetch failed, keeping current data: {e}"),
		}
	});
}

/// Fullscreen force graph fed from the graph endpoint.
///
/// Pass `graph` to share the data with siblings (e.g. a stats bar); otherwise
/// the section keeps its own.
#[component]
pub fn GraphSection(
	config: AppConfig,
	#[prop(into)] interactive: Signal<bool>,
	#[prop(optional, into)] on_node_click: Option<Callback<GraphNode>>,
	#[prop(optional)] graph: Option<RwSignal<GraphData>>,
) -> impl IntoView {
	let graph = graph.unwrap_or_else(|| RwSignal::new(initial_graph()));
	refresh_graph(&config, graph);

	match on_node_click {
		Some(on_node_click) => view! {
			<ForceGraphCanvas
				data=graph
				interactive=interactive
				on_node_click=on_node_click
				wiki_base=config.wiki_base_path.clone()
				fullscreen=true
			/>
		}
		.into_any(),
		None => view! {
			<ForceGraphCanvas
				data=graph
				interactive=interactive
				wiki_base=config.wiki_base_path.clone()
				fullscreen=true
			/>
		}
		.into_any(),
	}
}

/// Stories, projects and thank-yous across the current graph.
#[component]
pub fn StatsBar(#[prop(into)] graph: Signal<GraphData>, #[prop(into)] hidden: Signal<bool>) -> impl IntoView {
	let stats = Memo::new(move |_| graph.with(GraphStats::of));

	view! {
		<div
			class="stats-bar"
			style=move || {
				if hidden.get() {
					"opacity: 0; pointer-events: none; transition: opacity 0.4s ease;"
				} else {
					"opacity: 1; transition: opacity 0.4s ease;"
				}
			}
		>
			<div class="stat-item">
				<div class="stat-value">{move || stats.get().stories}</div>
				<div class="stat-label">"Stories"</div>
			</div>
			<div class="stat-item">
				<div class="stat-value">{move || stats.get().projects}</div>
				<div class="stat-label">"Projects"</div>
			</div>
			<div class="stat-item">
				<div class="stat-value">{move || stats.get().thank_yous}</div>
				<div class="stat-label">"Thank Yous"</div>
			</div>
		</div>
	}
}
