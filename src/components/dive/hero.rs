//! Landing hero: the graph as a backdrop, with a way to dive into it.

use leptos::prelude::*;

use super::machine::DiveMachine;
use super::panel::{NodeActionPanel, SharedDive};
use crate::browser::BodyScroll;
use crate::components::force_graph::GraphNode;
use crate::components::graph_section::{GraphSection, StatsBar, initial_graph};
use crate::config::AppConfig;

const BACKDROP_STYLE: &str = "position: absolute; inset: 0; filter: blur(2px) brightness(0.55); transition: filter 0.5s ease;";
const DIVE_STYLE: &str = "position: absolute; inset: 0; filter: none; transition: filter 0.5s ease;";

#[component]
pub fn HeroSection(config: AppConfig) -> impl IntoView {
	let machine: SharedDive =
		RwSignal::new_local(DiveMachine::new(BodyScroll, config.wiki_base_path.clone()));
	let graph = RwSignal::new(initial_graph());

	// Unmounting mid-dive must hand scrolling back to the page.
	on_cleanup(move || {
		machine.try_update(|m| m.exit());
	});

	let diving = Signal::derive(move || machine.with(|m| m.is_interactive()));
	let on_node_click = Callback::new(move |node: GraphNode| {
		machine.update(|m| {
			m.select(node);
		});
	});

	view! {
		<div class="hero" style="position: relative; height: 100vh; overflow: hidden;">
			<div
				class="hero-graph"
				style=move || if diving.get() { DIVE_STYLE } else { BACKDROP_STYLE }
			>
				<GraphSection
					config=config.clone()
					interactive=diving
					on_node_click=on_node_click
					graph=graph
				/>
			</div>

			<div
				class="hero-overlay"
				style=move || {
					if diving.get() {
						"opacity: 0; pointer-events: none; transition: opacity 0.5s ease;"
					} else {
						"opacity: 1; transition: opacity 0.5s ease;"
					}
				}
			>
				<h1 class="hero-tagline">"Every npm install is a person."</h1>
				<p class="hero-subtitle">
					"See the humans behind your code. Connect your project. Watch the web of gratitude grow."
				</p>
				<div class="hero-actions">
					<a href=config.connect_path.clone() class="hero-cta">
						"Connect Your GitHub"
					</a>
					<button class="hero-cta hero-cta-secondary" on:click=move |_| machine.update(|m| m.explore())>
						"Explore the Graph"
					</button>
				</div>
			</div>

			<Show when=move || diving.get()>
				<div class="dive-controls">
					<span class="dive-hint">"🔍 Scroll to zoom · Drag to pan · Click a node for its story"</span>
					<button class="dive-exit" on:click=move |_| machine.update(|m| m.exit())>
						"✕ Exit"
					</button>
				</div>
			</Show>

			<StatsBar graph=graph hidden=diving />
			<NodeActionPanel machine=machine config=config.clone() />
		</div>
	}
}
