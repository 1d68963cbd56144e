//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, panning, zooming and clicks. An animation loop runs
//! via `requestAnimationFrame`, stepping the layout and renderer each frame.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use leptos::leptos_dom::helpers::set_timeout;
use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::{ClickAction, ForceGraphState, Interaction, Tooltip};
use super::types::{GraphData, GraphNode};
use crate::browser;

/// Longest frame step fed to the animations, so a backgrounded tab does not
/// resume with one huge jump.
const MAX_FRAME_SECS: f64 = 0.1;

/// Graph state plus the drawing surface it renders to.
struct GraphContext {
	state: ForceGraphState,
	ctx: CanvasRenderingContext2d,
	last_frame: Option<f64>,
}

impl GraphContext {
	fn frame(&mut self, now: f64) {
		let dt = self
			.last_frame
			.map_or(0.0, |last| ((now - last) / 1000.0).clamp(0.0, MAX_FRAME_SECS));
		self.last_frame = Some(now);
		self.state.tick(dt);
		render::render(&self.state, &self.ctx);
	}
}

type SharedClosure<T> = Rc<RefCell<Option<Closure<T>>>>;

/// Renders a force-directed graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal; a new value replaces the
/// whole graph. `interactive` switches between the decorative backdrop (wheel
/// scrolls the page) and fullscreen exploration (wheel zooms). Node clicks go to
/// `on_node_click` when given, otherwise nodes with a backstory navigate to it.
///
/// The component sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the viewport and follow window resizes.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into, default = Signal::stored(true))] interactive: Signal<bool>,
	#[prop(optional, into)] on_node_click: Option<Callback<GraphNode>>,
	#[prop(into, default = "/wiki".to_string())] wiki_base: String,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let tooltip = RwSignal::new(None::<Tooltip>);
	let cursor = RwSignal::new("grab");

	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: SharedClosure<dyn FnMut(f64)> = Rc::new(RefCell::new(None));
	let resize_cb: SharedClosure<dyn FnMut()> = Rc::new(RefCell::new(None));
	let stopped = Arc::new(AtomicBool::new(false));

	let delegate_clicks = on_node_click.is_some();
	let interaction = move |interactive: bool| Interaction {
		interactive,
		delegate_clicks,
		wiki_base: wiki_base.clone(),
	};

	let (context_init, animate_init, resize_cb_init, stopped_init, interaction_init) = (
		context.clone(),
		animate.clone(),
		resize_cb.clone(),
		stopped.clone(),
		interaction.clone(),
	);
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			browser::viewport_size(&window).unwrap_or((800.0, 600.0))
		} else {
			canvas
				.parent_element()
				.map(|p| (p.client_width() as f64, p.client_height() as f64))
				.filter(|&(w, h)| w > 0.0 && h > 0.0)
				.unwrap_or((800.0, 600.0))
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("backstory-graph: canvas has no 2d context");
			return;
		};

		let data = data.get_untracked();
		debug!(
			"backstory-graph: mounting {} nodes, {} links at {w}x{h}",
			data.nodes.len(),
			data.links.len()
		);
		*context_init.borrow_mut() = Some(GraphContext {
			state: ForceGraphState::new(&data, w, h, interaction_init(interactive.get_untracked())),
			ctx,
			last_frame: None,
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().and_then(|win| browser::viewport_size(&win))
				else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner, resize_inner, stopped_anim) = (
			context_init.clone(),
			animate_init.clone(),
			resize_cb_init.clone(),
			stopped_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move |now: f64| {
			let Some(window) = web_sys::window() else {
				return;
			};
			if stopped_anim.load(Ordering::Relaxed) {
				detach_resize(&window, &resize_inner);
				shut_down_loop(&context_anim, &animate_inner, |release| {
					set_timeout(release, Duration::ZERO)
				});
				return;
			}
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.frame(now);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// A new data set replaces the graph wholesale. The first run only subscribes.
	let context_data = context.clone();
	Effect::new(move |prev: Option<()>| {
		let data = data.get();
		if prev.is_none() {
			return;
		}
		if let Some(ref mut c) = *context_data.borrow_mut() {
			debug!("backstory-graph: replacing graph ({} nodes)", data.nodes.len());
			c.state.replace_data(&data);
			tooltip.set(None);
		}
	});

	let context_mode = context.clone();
	Effect::new(move |_| {
		let next = interaction(interactive.get());
		if let Some(ref mut c) = *context_mode.borrow_mut() {
			c.state.reconfigure(next);
			sync_overlay(&c.state, tooltip, cursor);
		}
	});

	let stopped_cleanup = stopped.clone();
	on_cleanup(move || stopped_cleanup.store(true, Ordering::Relaxed));

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.state.pointer_down(x, y);
			cursor.set(if c.state.drag.node.is_some() { "grabbing" } else { "move" });
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			c.state.pointer_move(x, y);
			sync_overlay(&c.state, tooltip, cursor);
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		let action = {
			let mut guard = context_mu.borrow_mut();
			let Some(c) = guard.as_mut() else {
				return;
			};
			let action = c.state.pointer_up();
			sync_overlay(&c.state, tooltip, cursor);
			action
		};
		match action {
			ClickAction::Delegate(node) => {
				if let Some(cb) = &on_node_click {
					cb.run(node);
				}
			}
			ClickAction::Navigate(path) => browser::navigate(&path),
			ClickAction::None => {}
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.pointer_leave();
			sync_overlay(&c.state, tooltip, cursor);
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			if c.state.wheel(x, y, ev.delta_y()) {
				ev.prevent_default();
			}
		}
	};

	let context_dc = context.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_dc.borrow_mut() {
			c.state.double_click(x, y);
		}
	};

	view! {
		<div class="force-graph" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:dblclick=on_dblclick
				style=move || format!("display: block; cursor: {};", cursor.get())
			/>
			{move || tooltip.get().map(|tip| view! {
				<div
					class="force-graph-tooltip"
					style=format!(
						"position: absolute; left: {}px; top: {}px; pointer-events: none;",
						tip.x,
						tip.y,
					)
				>
					<div class="force-graph-tooltip-title">{tip.title}</div>
					{tip.creator.map(|by| view! { <div class="force-graph-tooltip-creator">{by}</div> })}
					{tip
						.stats
						.into_iter()
						.map(|stat| view! { <div class="force-graph-tooltip-stat">{stat}</div> })
						.collect_view()}
				</div>
			})}
		</div>
	}
}

fn pointer_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Pushes hover-derived UI (tooltip, cursor) out to the reactive layer.
fn sync_overlay(
	state: &ForceGraphState,
	tooltip: RwSignal<Option<Tooltip>>,
	cursor: RwSignal<&'static str>,
) {
	let next = state.tooltip();
	if tooltip.with_untracked(|current| *current != next) {
		tooltip.set(next);
	}
	let next_cursor = if state.drag.node.is_some() {
		"grabbing"
	} else if state.pan.active {
		"move"
	} else if state.hover.hovered.is_some() {
		"pointer"
	} else {
		"grab"
	};
	if cursor.get_untracked() != next_cursor {
		cursor.set(next_cursor);
	}
}

fn detach_resize(window: &Window, resize_cb: &SharedClosure<dyn FnMut()>) {
	if let Some(cb) = resize_cb.borrow_mut().take() {
		let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
	}
}

/// Breaks the reference cycle of a stopped frame loop. The graph state is
/// released at once. The frame callback is still running when this is called,
/// so clearing its own slot is left to `defer`.
fn shut_down_loop<C, A: 'static>(
	context: &RefCell<Option<C>>,
	animate: &Rc<RefCell<Option<A>>>,
	defer: impl FnOnce(Box<dyn FnOnce()>),
) {
	context.borrow_mut().take();
	let animate = animate.clone();
	defer(Box::new(move || {
		animate.borrow_mut().take();
	}));
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn shut_down_releases_state_then_callback() {
		let context = RefCell::new(Some(String::from("graph")));
		let callback = Rc::new(());
		let animate = Rc::new(RefCell::new(Some(callback.clone())));
		let mut deferred: Vec<Box<dyn FnOnce()>> = Vec::new();

		shut_down_loop(&context, &animate, |release| deferred.push(release));
		assert!(context.borrow().is_none());
		assert!(animate.borrow().is_some());
		assert_eq!(deferred.len(), 1);

		for release in deferred {
			release();
		}
		assert!(animate.borrow().is_none());
		assert_eq!(Rc::strong_count(&callback), 1);
		assert_eq!(Rc::strong_count(&animate), 1);
	}
}
