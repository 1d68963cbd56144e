//! Graph data structures for input to the force graph component.
//!
//! These records mirror the JSON served by the graph endpoint. They carry no
//! positions: the simulation keeps its own positional overlay keyed by node.

use serde::Deserialize;

/// Radius of every project node.
pub const PROJECT_RADIUS: f64 = 12.0;
/// Smallest package radius (a package nobody uses yet).
pub const PACKAGE_BASE_RADIUS: f64 = 6.0;
/// Largest amount the user count can add to a package radius.
pub const PACKAGE_RADIUS_GROWTH_CAP: f64 = 14.0;

/// What a node stands for. Drives colour and radius.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	/// A published package (npm module, library).
	#[default]
	Package,
	/// A user's connected project.
	Project,
}

impl NodeKind {
	pub fn as_str(self) -> &'static str {
		match self {
			NodeKind::Package => "package",
			NodeKind::Project => "project",
		}
	}
}

/// Relationship carried by a link. Only affects presentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum LinkKind {
	#[default]
	#[serde(rename = "dependency")]
	Dependency,
	#[serde(rename = "devDependency")]
	DevDependency,
	#[serde(rename = "peerDependency")]
	PeerDependency,
	#[serde(rename = "depends_on")]
	DependsOn,
	#[serde(rename = "peer")]
	Peer,
	#[serde(rename = "dev")]
	Dev,
}

impl LinkKind {
	/// Development-only relationships are drawn dashed.
	pub fn is_dev(self) -> bool {
		matches!(self, LinkKind::DevDependency | LinkKind::Dev)
	}
}

/// A node in the graph.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: String,
	/// Display label.
	pub name: String,
	/// Identifier of the node's detail page.
	pub slug: String,
	#[serde(rename = "type", default)]
	pub kind: NodeKind,
	/// Number of developers depending on this package.
	#[serde(default)]
	pub user_count: u32,
	#[serde(default)]
	pub thank_you_count: u32,
	#[serde(default)]
	pub creator_name: Option<String>,
	/// Category of a project node (e.g. "fintech"). Ignored for packages.
	#[serde(default)]
	pub tag: Option<String>,
	/// Whether a backstory page already exists for this node.
	#[serde(default)]
	pub has_wiki: bool,
}

impl GraphNode {
	/// Rendered radius in world units; also the base of the collision radius.
	///
	/// Package radii grow with user count but are capped at
	/// `PACKAGE_BASE_RADIUS + PACKAGE_RADIUS_GROWTH_CAP`.
	pub fn radius(&self) -> f64 {
		match self.kind {
			NodeKind::Project => PROJECT_RADIUS,
			NodeKind::Package => {
				PACKAGE_BASE_RADIUS
					+ (self.user_count as f64 * 0.5).min(PACKAGE_RADIUS_GROWTH_CAP)
			}
		}
	}

	/// Path of the node's detail page under `base` (e.g. "/wiki").
	pub fn detail_path(&self, base: &str) -> String {
		format!("{}/{}", base.trim_end_matches('/'), self.slug)
	}
}

/// A directed edge between two nodes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphLink {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	#[serde(rename = "type", default)]
	pub kind: LinkKind,
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub links: Vec<GraphLink>,
}

impl GraphData {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// The two hand-written backstories shown until live data arrives.
	pub fn seed() -> Self {
		Self {
			nodes: vec![
				GraphNode {
					id: "pkg-markdown".into(),
					name: "Markdown".into(),
					slug: "markdown".into(),
					kind: NodeKind::Package,
					creator_name: Some("John Gruber & Aaron Swartz".into()),
					has_wiki: true,
					..Default::default()
				},
				GraphNode {
					id: "pkg-mermaid".into(),
					name: "Mermaid.js".into(),
					slug: "mermaid".into(),
					kind: NodeKind::Package,
					creator_name: Some("Knut Sveidqvist".into()),
					has_wiki: true,
					..Default::default()
				},
			],
			// Mermaid renders inside Markdown.
			links: vec![GraphLink {
				source: "pkg-mermaid".into(),
				target: "pkg-markdown".into(),
				kind: LinkKind::Dependency,
			}],
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn package(user_count: u32) -> GraphNode {
		GraphNode {
			kind: NodeKind::Package,
			user_count,
			..Default::default()
		}
	}

	#[test]
	fn parses_api_payload() {
		let json = r#"{
			"nodes": [
				{"id": "pkg-1", "name": "left-pad", "slug": "left-pad", "type": "package",
				 "userCount": 3, "thankYouCount": 1, "creatorName": "azer", "hasWiki": true},
				{"id": "proj-7", "name": "Ledger", "slug": "project-7", "type": "project",
				 "userCount": 0, "thankYouCount": 0, "tag": "fintech", "hasWiki": false}
			],
			"links": [{"source": "proj-7", "target": "pkg-1", "type": "devDependency"}]
		}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[0].creator_name.as_deref(), Some("azer"));
		assert!(data.nodes[0].has_wiki);
		assert_eq!(data.nodes[1].kind, NodeKind::Project);
		assert_eq!(data.nodes[1].tag.as_deref(), Some("fintech"));
		assert_eq!(data.links[0].kind, LinkKind::DevDependency);
		assert!(data.links[0].kind.is_dev());
	}

	#[test]
	fn optional_fields_default() {
		let json = r#"{"nodes": [{"id": "a", "name": "a", "slug": "a"}], "links": [{"source": "a", "target": "a"}]}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();
		let node = &data.nodes[0];
		assert_eq!(node.kind, NodeKind::Package);
		assert_eq!(node.user_count, 0);
		assert!(node.creator_name.is_none());
		assert!(!node.has_wiki);
		assert_eq!(data.links[0].kind, LinkKind::Dependency);
	}

	#[test]
	fn accepts_every_link_kind() {
		for (raw, kind) in [
			("dependency", LinkKind::Dependency),
			("devDependency", LinkKind::DevDependency),
			("peerDependency", LinkKind::PeerDependency),
			("depends_on", LinkKind::DependsOn),
			("peer", LinkKind::Peer),
			("dev", LinkKind::Dev),
		] {
			let json = format!(r#"{{"source": "a", "target": "b", "type": "{raw}"}}"#);
			let link: GraphLink = serde_json::from_str(&json).unwrap();
			assert_eq!(link.kind, kind);
		}
	}

	#[test]
	fn empty_object_is_empty_graph() {
		let data: GraphData = serde_json::from_str("{}").unwrap();
		assert!(data.is_empty());
		assert!(data.links.is_empty());
	}

	#[test]
	fn package_radius_is_monotonic_and_capped() {
		let mut previous = 0.0;
		for users in 0..200 {
			let r = package(users).radius();
			assert!(r >= previous);
			assert!(r <= PACKAGE_BASE_RADIUS + PACKAGE_RADIUS_GROWTH_CAP);
			previous = r;
		}
		assert_eq!(package(0).radius(), 6.0);
		assert_eq!(package(10).radius(), 11.0);
		assert_eq!(package(u32::MAX).radius(), 20.0);
	}

	#[test]
	fn project_radius_is_fixed() {
		let project = GraphNode {
			kind: NodeKind::Project,
			user_count: 500,
			..Default::default()
		};
		assert_eq!(project.radius(), PROJECT_RADIUS);
	}

	#[test]
	fn detail_path_joins_base() {
		let node = GraphNode {
			slug: "mermaid".into(),
			..Default::default()
		};
		assert_eq!(node.detail_path("/wiki"), "/wiki/mermaid");
		assert_eq!(node.detail_path("/wiki/"), "/wiki/mermaid");
	}

	#[test]
	fn seed_graph_is_consistent() {
		let seed = GraphData::seed();
		assert_eq!(seed.nodes.len(), 2);
		for link in &seed.links {
			assert!(seed.nodes.iter().any(|n| n.id == link.source));
			assert!(seed.nodes.iter().any(|n| n.id == link.target));
		}
	}
}
