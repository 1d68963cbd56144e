//! backstory-graph: the people behind open-source packages, as a force graph.
//!
//! This crate provides the WASM landing page: a force-directed graph of packages
//! and the projects that depend on them, shown as a hero backdrop that can be
//! entered for fullscreen exploration, with per-node backstory actions.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod api;
pub mod browser;
pub mod components;
pub mod config;

pub use components::dive::HeroSection;
pub use components::force_graph::{ForceGraphCanvas, GraphData, GraphLink, GraphNode};
pub use config::AppConfig;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("backstory-graph: logging initialized");
}

/// Main application component.
/// Reads the page config and renders the hero with the live graph.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = AppConfig::load();
	info!("backstory-graph: graph endpoint {}", config.graph_endpoint);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Backstory: every npm install is a person" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main style="position: relative;">
			<HeroSection config=config />
		</main>
	}
}
