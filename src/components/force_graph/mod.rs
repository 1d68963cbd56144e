//! Force-directed graph visualization component.
//!
//! Renders packages and the projects that depend on them on an HTML canvas:
//! - d3-style force layout (links, charge, centering, collision) that cools
//!   to rest and reheats while a node is dragged
//! - Pan, zoom, node dragging and click dispatch
//! - Hover highlighting with a tooltip and a staggered entrance fade
//!
//! # Example
//!
//! ```ignore
//! use backstory_graph::{ForceGraphCanvas, GraphData};
//!
//! let data = RwSignal::new(GraphData::seed());
//! view! { <ForceGraphCanvas data=data interactive=true fullscreen=true /> }
//! ```

mod component;
mod quadtree;
mod render;
pub mod simulation;
pub mod state;
pub mod theme;
mod types;

pub use component::ForceGraphCanvas;
pub use simulation::{NodeHandle, Simulation, SimulationConfig};
pub use theme::Theme;
pub use types::{GraphData, GraphLink, GraphNode, LinkKind, NodeKind};
