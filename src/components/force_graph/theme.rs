//! Visual theming for the force graph.
//!
//! Colours for node kinds and project tags, link and label styles.

use super::types::{GraphNode, NodeKind};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Opaque colour from a `0xRRGGBB` literal.
	pub const fn hex(rgb: u32) -> Self {
		Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Colours keyed by project tag, plus the shared package colour.
#[derive(Clone, Debug)]
pub struct TagPalette {
	pub tags: Vec<(&'static str, Color)>,
	/// Used for projects whose tag is missing or unknown.
	pub other: Color,
	pub package: Color,
}

impl Default for TagPalette {
	fn default() -> Self {
		Self {
			tags: vec![
				("edutech", Color::hex(0x10b981)),
				("fintech", Color::hex(0xf59e0b)),
				("healthtech", Color::hex(0xf43f5e)),
				("saas", Color::hex(0x06b6d4)),
				("game", Color::hex(0xec4899)),
				("tool", Color::hex(0x8b5cf6)),
				("blog", Color::hex(0x6366f1)),
			],
			other: Color::hex(0x64748b),
			package: Color::hex(0xa78bfa),
		}
	}
}

impl TagPalette {
	pub fn tag(&self, tag: &str) -> Color {
		self.tags
			.iter()
			.find(|(name, _)| *name == tag)
			.map(|&(_, color)| color)
			.unwrap_or(self.other)
	}

	/// Fill colour for a node: tag colour for projects, package colour otherwise.
	pub fn node(&self, node: &GraphNode) -> Color {
		match node.kind {
			NodeKind::Package => self.package,
			NodeKind::Project => node.tag.as_deref().map_or(self.other, |t| self.tag(t)),
		}
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for gradients
	pub color_secondary: Color,
	/// Whether to use radial gradient
	pub use_gradient: bool,
}

/// Link visual style.
#[derive(Clone, Debug)]
pub struct LinkStyle {
	pub color: Color,
	pub width: f64,
	/// Stroke opacity with nothing hovered.
	pub resting_opacity: f64,
	/// Stroke opacity of links touching the hovered node.
	pub highlight_opacity: f64,
	/// Stroke opacity of every other link while a node is hovered.
	pub dimmed_opacity: f64,
	/// Dash pattern for development-only dependencies.
	pub dev_dash: (f64, f64),
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Whether nodes have inner gradients
	pub use_gradient: bool,
	/// Outer glow intensity (0 = none)
	pub glow_intensity: f64,
	/// Stroke drawn around nodes that already have a backstory page.
	pub wiki_stroke: Color,
	pub wiki_stroke_width: f64,
	/// Radius multiplier of the hovered node.
	pub hover_scale: f64,
}

/// Label typography per node kind.
#[derive(Clone, Debug)]
pub struct LabelStyle {
	pub color: Color,
	pub project_font: &'static str,
	pub package_font: &'static str,
	/// Gap between the bottom of a node and its label baseline.
	pub offset: f64,
}

impl LabelStyle {
	pub fn font(&self, kind: NodeKind) -> &'static str {
		match kind {
			NodeKind::Project => self.project_font,
			NodeKind::Package => self.package_font,
		}
	}
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub link: LinkStyle,
	pub node: NodeStyle,
	pub label: LabelStyle,
	pub palette: TagPalette,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(5, 5, 20),
				color_secondary: Color::rgb(18, 12, 40),
				use_gradient: true,
			},
			link: LinkStyle {
				color: Color::rgb(124, 58, 237),
				width: 1.2,
				resting_opacity: 0.4,
				highlight_opacity: 0.8,
				dimmed_opacity: 0.15,
				dev_dash: (4.0, 3.0),
			},
			node: NodeStyle {
				use_gradient: true,
				glow_intensity: 0.35,
				wiki_stroke: Color::rgba(255, 255, 255, 0.3),
				wiki_stroke_width: 1.5,
				hover_scale: 1.3,
			},
			label: LabelStyle {
				color: Color::rgba(226, 232, 240, 0.85),
				project_font: "700 13px Inter, sans-serif",
				package_font: "500 11px Inter, sans-serif",
				offset: 14.0,
			},
			palette: TagPalette::default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn project(tag: Option<&str>) -> GraphNode {
		GraphNode {
			kind: NodeKind::Project,
			tag: tag.map(str::to_string),
			..Default::default()
		}
	}

	#[test]
	fn hex_literal() {
		assert_eq!(Color::hex(0x10b981), Color::rgb(0x10, 0xb9, 0x81));
		assert_eq!(Color::hex(0x10b981).to_css(), "#10b981");
		assert_eq!(
			Color::rgb(1, 2, 3).with_alpha(0.5).to_css(),
			"rgba(1, 2, 3, 0.5)"
		);
	}

	#[test]
	fn projects_use_tag_colour() {
		let palette = TagPalette::default();
		assert_eq!(palette.node(&project(Some("fintech"))), Color::hex(0xf59e0b));
		assert_eq!(palette.node(&project(Some("unheard-of"))), palette.other);
		assert_eq!(palette.node(&project(None)), palette.other);
	}

	#[test]
	fn packages_ignore_tag() {
		let palette = TagPalette::default();
		let node = GraphNode {
			kind: NodeKind::Package,
			tag: Some("fintech".into()),
			..Default::default()
		};
		assert_eq!(palette.node(&node), palette.package);
	}

	#[test]
	fn projects_get_the_bolder_label() {
		let label = Theme::default().label;
		assert!(label.font(NodeKind::Project).starts_with("700 13px"));
		assert!(label.font(NodeKind::Package).starts_with("500 11px"));
	}

	#[test]
	fn lighten_and_darken_clamp() {
		let c = Color::rgb(100, 100, 100);
		assert_eq!(c.lighten(2.0), Color::rgb(255, 255, 255));
		assert_eq!(c.darken(2.0), Color::rgb(0, 0, 0));
	}
}
