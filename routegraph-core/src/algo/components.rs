use fixedbitset::FixedBitSet;

use crate::model::RouteGraph;

/// Connected components by flood fill.
///
/// Components are ordered by their lowest node index and list their members
/// in ascending order. Isolated nodes form singleton components.
pub fn connected_components(graph: &RouteGraph) -> Vec<Vec<usize>> {
    let node_count = graph.node_count();
    let mut visited = FixedBitSet::with_capacity(node_count);
    let mut components = Vec::new();
    let mut stack = Vec::new();

    for seed in 0..node_count {
        if visited.put(seed) {
            continue;
        }

        let mut members = Vec::new();
        stack.push(seed);
        while let Some(u) = stack.pop() {
            members.push(u);
            for &v in graph.neighbors(u) {
                if !visited.put(v) {
                    stack.push(v);
                }
            }
        }

        members.sort_unstable();
        components.push(members);
    }

    components
}
