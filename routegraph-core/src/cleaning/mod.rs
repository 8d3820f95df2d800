//! Structural repair of a freshly built graph.
//!
//! [`clean_graph`] runs five passes in a fixed order, each relying on the
//! repairs of the ones before it:
//!
//! 1. [`merge_close_nodes`] collapses near-duplicate nodes,
//! 2. [`connect_close_nodes`] links nodes that are close but not adjacent,
//! 3. [`bridge_components`] joins nearby disconnected fragments,
//! 4. [`snap_nodes_to_edges`] attaches nodes lying on existing edges,
//! 5. [`prune_skip_edges`] drops edges that shortcut a near-collinear path.

mod bridge;
mod connect;
mod merge;
mod prune;
mod snap;

pub use bridge::bridge_components;
pub use connect::connect_close_nodes;
pub use merge::merge_close_nodes;
pub use prune::prune_skip_edges;
pub use snap::snap_nodes_to_edges;

use log::{debug, info};

use crate::{algo::connected_components, config::CleanerConfig, model::RouteGraph};

/// What each cleaning pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub nodes_before: usize,
    pub nodes_merged: usize,
    pub edges_connected: usize,
    pub bridges_added: usize,
    pub snap_edges_added: usize,
    pub edges_pruned: usize,
    pub components: usize,
}

/// Runs the five cleaning passes in order.
///
/// Isolated nodes survive every pass. A graph whose fragments are farther
/// apart than `component_link_max_dist_m` comes back with several components.
pub fn clean_graph(graph: &RouteGraph, config: &CleanerConfig) -> (RouteGraph, CleanReport) {
    let mut report = CleanReport {
        nodes_before: graph.node_count(),
        ..CleanReport::default()
    };

    let mut cleaned = merge_close_nodes(graph, config.merge_dist_m);
    report.nodes_merged = report.nodes_before - cleaned.node_count();
    debug!(
        "Merge: {} -> {} nodes",
        report.nodes_before,
        cleaned.node_count()
    );

    report.edges_connected = connect_close_nodes(&mut cleaned, config.connect_dist_m);
    debug!("Connect: added {} edges", report.edges_connected);

    report.bridges_added = bridge_components(&mut cleaned, config.component_link_max_dist_m);
    debug!("Bridge: added {} edges", report.bridges_added);

    report.snap_edges_added = snap_nodes_to_edges(&mut cleaned, config.near_line_dist_m);
    debug!("Snap-split: added {} edges", report.snap_edges_added);

    report.edges_pruned = prune_skip_edges(
        &mut cleaned,
        config.skip_max_extra_ratio,
        config.skip_max_perp_dist_m,
    );
    debug!("Prune: removed {} edges", report.edges_pruned);

    report.components = connected_components(&cleaned).len();
    info!(
        "Cleaned graph: {} nodes, {} edges, {} component(s)",
        cleaned.node_count(),
        cleaned.edge_count(),
        report.components
    );
    if report.components > 1 {
        debug!(
            "{} fragments are farther apart than {} m and stay disconnected",
            report.components, config.component_link_max_dist_m
        );
    }

    (cleaned, report)
}
