//! UI components.

pub mod dive;
pub mod force_graph;
pub mod graph_section;
