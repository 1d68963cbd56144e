//! Host-page configuration.
//!
//! The page may embed a `<script id="app-config" type="application/json">`
//! element to point the app at different endpoints; every field is optional.
//! A `<script id="graph-data">` element, when present, seeds the graph before
//! the first fetch completes.

use log::warn;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

use crate::components::force_graph::GraphData;

/// Endpoints and timings used by the app shell.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
	/// `GET` endpoint returning `{ nodes, links }`.
	pub graph_endpoint: String,
	/// `POST` endpoint generating a backstory for `{ slug }`.
	pub generate_endpoint: String,
	/// Prefix of backstory pages.
	pub wiki_base_path: String,
	/// Where the "Connect Your GitHub" call to action leads.
	pub connect_path: String,
	/// Pause between a generation success message and the redirect.
	pub redirect_delay_ms: u64,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			graph_endpoint: "/api/graph".to_string(),
			generate_endpoint: "/api/generate-wiki".to_string(),
			wiki_base_path: "/wiki".to_string(),
			connect_path: "/connect".to_string(),
			redirect_delay_ms: 1500,
		}
	}
}

impl AppConfig {
	/// Reads the page's config element, falling back to defaults.
	pub fn load() -> Self {
		read_script_json("app-config").unwrap_or_default()
	}
}

/// Graph data embedded in the page, if any.
pub fn load_embedded_graph() -> Option<GraphData> {
	read_script_json("graph-data")
}

/// Parses the text of the `<script>` element with the given id as JSON.
fn read_script_json<T: DeserializeOwned>(id: &str) -> Option<T> {
	let document = web_sys::window()?.document()?;
	let script: HtmlScriptElement = document.get_element_by_id(id)?.dyn_into().ok()?;
	let text = script.text().ok()?;

	match serde_json::from_str::<T>(&text) {
		Ok(value) => Some(value),
		Err(e) => {
			warn!("backstory-graph: ignoring #{id}: {e}");
			None
		}
	}
}
