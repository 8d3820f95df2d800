//! Initial graph construction from routes.

use geo::{Coord, Point};
use hashbrown::HashMap;
use log::info;

use crate::{Route, config::BuilderConfig, model::RouteGraph};

/// Rounds coordinates to a fixed number of decimal digits.
#[derive(Debug, Clone, Copy)]
struct Quantizer {
    scale: f64,
}

impl Quantizer {
    fn new(precision: u32) -> Self {
        Self {
            scale: 10_f64.powi(precision.min(BuilderConfig::MAX_PRECISION) as i32),
        }
    }

    /// `(lat, lon)` key of the rounded coordinate.
    fn key(self, c: Coord<f64>) -> (i64, i64) {
        (
            (c.y * self.scale).round() as i64,
            (c.x * self.scale).round() as i64,
        )
    }

    fn location(self, (lat, lon): (i64, i64)) -> Point<f64> {
        Point::new(lon as f64 / self.scale, lat as f64 / self.scale)
    }
}

/// Builds a graph in which every distinct quantized coordinate is one node.
///
/// Node indices are assigned in order of first appearance while walking the
/// routes in the given order, so a fixed input always yields the same
/// numbering. Consecutive points of one route that quantize to different
/// nodes are joined by an edge; nodes keep the rounded coordinate.
pub fn build_graph(routes: &[Route], config: &BuilderConfig) -> RouteGraph {
    let quantizer = Quantizer::new(config.precision);
    let mut graph = RouteGraph::new();
    let mut node_by_key: HashMap<(i64, i64), usize> = HashMap::new();

    for route in routes {
        let mut prev: Option<usize> = None;
        for &coord in &route.0 {
            let key = quantizer.key(coord);
            let node = *node_by_key
                .entry(key)
                .or_insert_with(|| graph.add_node(quantizer.location(key)));

            if let Some(prev) = prev {
                graph.add_edge(prev, node);
            }
            prev = Some(node);
        }
    }

    info!(
        "Built raw graph with {} nodes and {} edges from {} routes",
        graph.node_count(),
        graph.edge_count(),
        routes.len()
    );
    graph
}
