//! AST exporters: JSON interchange tree, node/edge graph, DOT text and
//! canonical DSL source.

pub mod graph;
pub mod json;
pub mod render;

pub use graph::{AstGraph, GraphEdge, GraphNode, NodeKind};
pub use json::{from_json, to_json};
pub use render::render;
