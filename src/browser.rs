//! Thin wrappers over the browser globals the app touches.

use log::warn;
use web_sys::Window;

use crate::components::dive::PageScroll;

/// Inner size of the browser viewport in CSS pixels.
pub fn viewport_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Full page navigation to `path`.
pub fn navigate(path: &str) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Err(e) = window.location().set_href(path) {
		warn!("backstory-graph: navigation to {path} failed: {e:?}");
	}
}

/// Scrolling of the document body, toggled through its `overflow` style.
#[derive(Clone, Copy, Debug, Default)]
pub struct BodyScroll;

impl PageScroll for BodyScroll {
	fn set_locked(&self, locked: bool) {
		let Some(body) = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.body())
		else {
			return;
		};
		let style = body.style();
		let result = if locked {
			style.set_property("overflow", "hidden")
		} else {
			style.remove_property("overflow").map(|_| ())
		};
		if let Err(e) = result {
			warn!("backstory-graph: could not toggle page scroll: {e:?}");
		}
	}
}
