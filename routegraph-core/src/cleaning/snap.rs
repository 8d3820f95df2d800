use crate::{geometry::SegmentFrame, model::RouteGraph};

/// Attaches nodes lying on existing edges to both edge endpoints.
///
/// For every edge present when the pass starts, each other node whose foot of
/// perpendicular falls within the segment and whose perpendicular distance is
/// at most `near_line_dist_m` gets edges to both endpoints. The original edge
/// is kept; redundant shortcuts are left for pruning. Returns the number of
/// edges added.
pub fn snap_nodes_to_edges(graph: &mut RouteGraph, near_line_dist_m: f64) -> usize {
    let edges: Vec<(usize, usize)> = graph.edges().collect();
    let mut added = 0;

    for (u, v) in edges {
        let Some(frame) = SegmentFrame::new(graph.node(u), graph.node(v)) else {
            continue;
        };

        for w in 0..graph.node_count() {
            if w == u || w == v {
                continue;
            }
            let projection = frame.locate(graph.node(w));
            if projection.within_segment() && projection.perpendicular_m <= near_line_dist_m {
                added += usize::from(graph.add_edge(u, w));
                added += usize::from(graph.add_edge(v, w));
            }
        }
    }

    added
}
