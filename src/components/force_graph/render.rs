//! Canvas rendering for the force graph.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Links (world space)
//! 3. Node glows, nodes, then labels below each node

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::simulation::Body;
use super::state::ForceGraphState;
use super::theme::{Color, Theme};
use super::types::GraphNode;

/// Renders the complete graph to the canvas.
pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	draw_background(state, ctx, &state.theme);
	if state.sim.is_empty() {
		return;
	}

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_links(state, ctx);
	draw_nodes(state, ctx);
	draw_labels(state, ctx);

	ctx.restore();
}

fn draw_background(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let bg = &theme.background;
	let gradient = bg
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(
				state.width / 2.0,
				state.height / 2.0,
				0.0,
				state.width / 2.0,
				state.height / 2.0,
				state.width.max(state.height) * 0.8,
			)
			.ok()
		})
		.flatten();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &bg.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &bg.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&bg.color.to_css()),
	}
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_links(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let style = &state.theme.link;
	ctx.set_line_width(style.width / state.transform.k);

	for (link, source, target) in state.sim.link_segments() {
		let fade = state
			.entrance
			.node_opacity(link.source)
			.min(state.entrance.node_opacity(link.target));
		if fade <= 0.0 {
			continue;
		}

		ctx.set_stroke_style_str(&style.color.with_alpha(state.link_opacity(link) * fade).to_css());
		if link.kind.is_dev() {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(style.dev_dash.0),
				&JsValue::from_f64(style.dev_dash.1),
			));
		} else {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		ctx.begin_path();
		ctx.move_to(source.x, source.y);
		ctx.line_to(target.x, target.y);
		ctx.stroke();
	}

	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let theme = &state.theme;

	// Pass 1: glows
	if theme.node.glow_intensity > 0.0 {
		for (handle, node, body) in state.sim.iter() {
			let alpha = state.entrance.node_opacity(handle.index());
			if alpha > 0.0 {
				draw_node_glow(ctx, node, body, state.radius_of(handle), theme, alpha);
			}
		}
	}

	// Pass 2: bodies
	for (handle, node, body) in state.sim.iter() {
		let alpha = state.entrance.node_opacity(handle.index());
		if alpha <= 0.0 {
			continue;
		}
		draw_node(ctx, node, body, state.radius_of(handle), theme, alpha, state.transform.k);
	}
}

fn draw_node_glow(
	ctx: &CanvasRenderingContext2d,
	node: &GraphNode,
	body: &Body,
	radius: f64,
	theme: &Theme,
	alpha: f64,
) {
	let glow_radius = radius * 2.2;
	let color = theme.palette.node(node);
	let Ok(gradient) = ctx.create_radial_gradient(body.x, body.y, radius * 0.5, body.x, body.y, glow_radius)
	else {
		return;
	};
	let _ = gradient.add_color_stop(
		0.0,
		&color.with_alpha(theme.node.glow_intensity * alpha).to_css(),
	);
	let _ = gradient.add_color_stop(1.0, "rgba(0, 0, 0, 0)");

	ctx.begin_path();
	let _ = ctx.arc(body.x, body.y, glow_radius, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &GraphNode,
	body: &Body,
	radius: f64,
	theme: &Theme,
	alpha: f64,
	k: f64,
) {
	let (x, y) = (body.x, body.y);
	let color = theme.palette.node(node);
	ctx.set_global_alpha(alpha);

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	match theme
		.node
		.use_gradient
		.then(|| node_gradient(ctx, x, y, radius, color))
		.flatten()
	{
		Some(gradient) => {
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&color.to_css()),
	}
	ctx.fill();

	if node.has_wiki {
		ctx.set_stroke_style_str(&theme.node.wiki_stroke.to_css());
		ctx.set_line_width(theme.node.wiki_stroke_width / k);
		ctx.stroke();
	}

	ctx.set_global_alpha(1.0);
}

fn node_gradient(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	radius: f64,
	base: Color,
) -> Option<web_sys::CanvasGradient> {
	let gradient = ctx
		.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
		.ok()?;
	gradient.add_color_stop(0.0, &base.lighten(0.4).to_css()).ok()?;
	gradient.add_color_stop(0.7, &base.to_css()).ok()?;
	gradient.add_color_stop(1.0, &base.darken(0.2).to_css()).ok()?;
	Some(gradient)
}

fn draw_labels(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let label = &state.theme.label;
	ctx.set_text_align("center");
	ctx.set_fill_style_str(&label.color.to_css());

	for (handle, node, body) in state.sim.iter() {
		let alpha = state.entrance.label_opacity(handle.index());
		if alpha <= 0.0 {
			continue;
		}
		ctx.set_global_alpha(alpha);
		ctx.set_font(label.font(node.kind));
		let _ = ctx.fill_text(&node.name, body.x, body.y + state.radius_of(handle) + label.offset);
	}

	ctx.set_global_alpha(1.0);
}
