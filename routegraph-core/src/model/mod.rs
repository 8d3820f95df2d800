//! Graph data model
//!
//! [`RouteGraph`] is the working arena used while building and cleaning;
//! [`GraphNode`] is the exported record with 1-based identifiers.

pub mod graph;
pub mod node;

pub use graph::RouteGraph;
pub use node::GraphNode;
