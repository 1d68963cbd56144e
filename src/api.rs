//! HTTP calls to the application backend.
//!
//! Two endpoints matter to the graph: the graph data fetch and the backstory
//! generation request. Both go through the browser's `fetch`.

use serde::Deserialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::components::force_graph::GraphData;
use crate::config::AppConfig;

const GENERATION_FAILED: &str = "Failed to generate wiki";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	/// The request never produced a response. The detail is for logs only.
	#[error("Network error")]
	Network(String),
	#[error("server responded with status {0}")]
	Status(u16),
	#[error("malformed response: {0}")]
	Decode(#[from] serde_json::Error),
	/// The server refused the operation; the text is shown verbatim.
	#[error("{0}")]
	Rejected(String),
}

impl ApiError {
	fn from_js(value: JsValue) -> Self {
		ApiError::Network(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

/// Fetches the full graph.
pub async fn fetch_graph(config: &AppConfig) -> Result<GraphData, ApiError> {
	let (status, body) = send("GET", &config.graph_endpoint, None).await?;
	if !(200..300).contains(&status) {
		return Err(ApiError::Status(status));
	}
	Ok(serde_json::from_str(&body)?)
}

/// Asks the backend to write a backstory for the package `slug`.
pub async fn generate_story(config: &AppConfig, slug: &str) -> Result<(), ApiError> {
	let payload = serde_json::json!({ "slug": slug }).to_string();
	let (status, body) = send("POST", &config.generate_endpoint, Some(&payload)).await?;
	interpret_generation(status, &body)
}

#[derive(Debug, Default, Deserialize)]
struct GenerationReply {
	#[serde(default)]
	success: bool,
	error: Option<String>,
	message: Option<String>,
}

/// Maps a generation reply to success or the message the user should see.
///
/// An explicit `error` always wins. A bare `message` (e.g. the story was
/// already verified) counts as success since the page exists.
pub fn interpret_generation(status: u16, body: &str) -> Result<(), ApiError> {
	let ok_status = (200..300).contains(&status);
	let reply = match serde_json::from_str::<GenerationReply>(body) {
		Ok(reply) => reply,
		Err(_) if !ok_status => return Err(ApiError::Rejected(GENERATION_FAILED.to_string())),
		Err(e) => return Err(e.into()),
	};

	match reply {
		GenerationReply { error: Some(error), .. } => Err(ApiError::Rejected(error)),
		GenerationReply { success: true, .. } => Ok(()),
		GenerationReply { message: Some(_), .. } if ok_status => Ok(()),
		_ => Err(ApiError::Rejected(GENERATION_FAILED.to_string())),
	}
}

async fn send(method: &str, url: &str, json_body: Option<&str>) -> Result<(u16, String), ApiError> {
	let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".to_string()))?;

	let init = RequestInit::new();
	init.set_method(method);
	if let Some(body) = json_body {
		init.set_body(&JsValue::from_str(body));
	}
	let request = Request::new_with_str_and_init(url, &init).map_err(ApiError::from_js)?;
	if json_body.is_some() {
		request
			.headers()
			.set("Content-Type", "application/json")
			.map_err(ApiError::from_js)?;
	}

	let response: Response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(ApiError::from_js)?
		.dyn_into()
		.map_err(ApiError::from_js)?;
	let text = JsFuture::from(response.text().map_err(ApiError::from_js)?)
		.await
		.map_err(ApiError::from_js)?;

	Ok((response.status(), text.as_string().unwrap_or_default()))
}
