//! Turn-by-turn helpers for consumers of an exported graph.
//!
//! These work directly on a reindexed node list, where the last node is the
//! destination and identifiers are dense starting at 1.

use geo::Point;
use hashbrown::HashMap;

use crate::{
    NodeId,
    geometry::{bearing_deg, haversine_distance},
    model::GraphNode,
};

/// Default snapping radius for [`check_off_course`], meters.
pub const OFF_COURSE_THRESHOLD_M: f64 = 20.0;
/// Default arrival radius for [`is_on_target`], meters.
pub const ON_TARGET_THRESHOLD_M: f64 = 15.0;
/// Default half-width of the "ahead" sector for [`turn_direction`], degrees.
pub const AHEAD_DEAD_ZONE_DEG: f64 = 5.0;

/// Relative direction of the next target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Ahead,
    Left,
    Right,
}

impl Turn {
    /// Single-letter code used on the wire to the guidance device.
    pub fn code(self) -> char {
        match self {
            Turn::Ahead => 'A',
            Turn::Left => 'L',
            Turn::Right => 'R',
        }
    }
}

/// Result of [`check_off_course`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseCheck<'a> {
    pub off_course: bool,
    /// Node the traveller should be considered at.
    pub snapped: Option<&'a GraphNode>,
}

/// Picks the neighbor of `current_id` closest to the destination.
///
/// The destination is the last node of the list. The node we came from is
/// skipped unless it is the only option. Distances are squared degree
/// differences, which is enough to rank nearby candidates.
pub fn next_hop(
    nodes: &[GraphNode],
    current_id: NodeId,
    prev_id: Option<NodeId>,
) -> Option<NodeId> {
    let destination = nodes.last()?;
    let by_id: HashMap<NodeId, &GraphNode> = nodes.iter().map(|n| (n.id, n)).collect();
    let current = by_id.get(&current_id)?;
    if current.id == destination.id {
        return None;
    }

    let neighbors: Vec<&GraphNode> = current
        .connected_to
        .iter()
        .filter_map(|id| by_id.get(id).copied())
        .collect();
    let forward: Vec<&GraphNode> = neighbors
        .iter()
        .copied()
        .filter(|n| Some(n.id) != prev_id)
        .collect();
    let candidates = if forward.is_empty() { neighbors } else { forward };

    let mut best: Option<(NodeId, f64)> = None;
    for candidate in candidates {
        let d_lat = candidate.lat - destination.lat;
        let d_lon = candidate.lon - destination.lon;
        let d = d_lat * d_lat + d_lon * d_lon;
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((candidate.id, d));
        }
    }
    best.map(|(id, _)| id)
}

/// Which way to turn to face `bearing_to_target` when heading `heading`.
/// Missing inputs mean "keep going".
pub fn turn_direction(
    heading: Option<f64>,
    bearing_to_target: Option<f64>,
    dead_zone_deg: f64,
) -> Turn {
    let (Some(heading), Some(bearing)) = (heading, bearing_to_target) else {
        return Turn::Ahead;
    };
    let diff = signed_angle_diff(bearing, heading);
    if diff.abs() <= dead_zone_deg {
        Turn::Ahead
    } else if diff > 0.0 {
        Turn::Right
    } else {
        Turn::Left
    }
}

/// Detects that the traveller has drifted toward a node other than the expected one.
///
/// Only nodes ahead (bearing within 90 degrees of `heading`, when a heading is
/// known) are candidates. The traveller is off course when the nearest such
/// node is not the expected one, is closer than the expected node and lies
/// within `threshold_m`.
pub fn check_off_course<'a>(
    nodes: &'a [GraphNode],
    expected_id: NodeId,
    position: Point<f64>,
    heading: Option<f64>,
    threshold_m: f64,
) -> CourseCheck<'a> {
    let on_course = |snapped| CourseCheck {
        off_course: false,
        snapped,
    };

    let Some(expected) = nodes.iter().find(|n| n.id == expected_id) else {
        return on_course(None);
    };
    let to_expected = haversine_distance(position, expected.location());

    let mut best: Option<(&GraphNode, f64)> = None;
    for node in nodes {
        if let Some(heading) = heading
            && signed_angle_diff(bearing_deg(position, node.location()), heading).abs() > 90.0
        {
            continue;
        }
        let d = haversine_distance(position, node.location());
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((node, d));
        }
    }

    match best {
        None => on_course(None),
        Some((node, d)) if node.id != expected_id && d < to_expected && d < threshold_m => {
            CourseCheck {
                off_course: true,
                snapped: Some(node),
            }
        }
        Some(_) => on_course(Some(expected)),
    }
}

/// Whether a target `distance_m` away counts as reached, given the GPS accuracy.
pub fn is_on_target(
    distance_m: Option<f64>,
    accuracy_m: Option<f64>,
    base_threshold_m: f64,
) -> bool {
    distance_m.is_some_and(|d| d <= base_threshold_m.max(accuracy_m.unwrap_or(0.0)))
}

/// `a - b` wrapped into `[-180, 180)`.
fn signed_angle_diff(a: f64, b: f64) -> f64 {
    (a - b + 540.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::point;

    fn node(id: NodeId, lat: f64, lon: f64, connected_to: Vec<NodeId>) -> GraphNode {
        GraphNode {
            id,
            lat,
            lon,
            connected_to,
        }
    }

    /// 1 - 2 - 4 (destination), with a dead-end branch 2 - 3 to the south.
    fn fork() -> Vec<GraphNode> {
        vec![
            node(1, 0.0, 0.0, vec![2]),
            node(2, 0.0, 0.001, vec![1, 3, 4]),
            node(3, -0.001, 0.001, vec![2]),
            node(4, 0.0, 0.002, vec![2]),
        ]
    }

    #[test]
    fn next_hop_moves_toward_destination() {
        let nodes = fork();
        assert_eq!(next_hop(&nodes, 1, None), Some(2));
        assert_eq!(next_hop(&nodes, 2, Some(1)), Some(4));
        assert_eq!(next_hop(&nodes, 4, Some(2)), None);
        assert_eq!(next_hop(&nodes, 9, None), None);
        assert_eq!(next_hop(&[], 1, None), None);
    }

    #[test]
    fn next_hop_backtracks_out_of_dead_end() {
        let nodes = fork();
        assert_eq!(next_hop(&nodes, 3, Some(2)), Some(2));
    }

    #[test]
    fn turn_direction_respects_dead_zone() {
        assert_eq!(turn_direction(Some(90.0), Some(93.0), 5.0), Turn::Ahead);
        assert_eq!(turn_direction(Some(90.0), Some(180.0), 5.0), Turn::Right);
        assert_eq!(turn_direction(Some(10.0), Some(350.0), 5.0), Turn::Left);
        assert_eq!(turn_direction(None, Some(350.0), 5.0), Turn::Ahead);
        assert_eq!(Turn::Left.code(), 'L');
    }

    #[test]
    fn off_course_snaps_to_closer_node_ahead() {
        let nodes = fork();
        // Standing just north of node 4 while node 2 is expected.
        let position = point!(x: 0.002, y: 0.000_05);
        let check = check_off_course(&nodes, 2, position, Some(0.0), 20.0);
        assert!(!check.off_course, "every node is behind when heading north");
        assert_eq!(check.snapped, None);

        let check = check_off_course(&nodes, 2, position, None, 20.0);
        assert!(check.off_course);
        assert_eq!(check.snapped.map(|n| n.id), Some(4));

        let check = check_off_course(&nodes, 2, position, Some(180.0), 20.0);
        assert!(check.off_course);
        assert_eq!(check.snapped.map(|n| n.id), Some(4));
    }

    #[test]
    fn on_course_snaps_to_expected() {
        let nodes = fork();
        let check = check_off_course(&nodes, 2, point!(x: 0.000_9, y: 0.0), None, 20.0);
        assert!(!check.off_course);
        assert_eq!(check.snapped.map(|n| n.id), Some(2));
        let unknown = check_off_course(&nodes, 42, point!(x: 0.0, y: 0.0), None, 20.0);
        assert_eq!(unknown.snapped, None);
    }

    #[test]
    fn arrival_radius_grows_with_poor_accuracy() {
        assert!(is_on_target(Some(10.0), None, 15.0));
        assert!(!is_on_target(Some(20.0), Some(5.0), 15.0));
        assert!(is_on_target(Some(20.0), Some(25.0), 15.0));
        assert!(!is_on_target(None, Some(25.0), 15.0));
    }
}
