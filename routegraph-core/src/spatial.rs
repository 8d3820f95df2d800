//! R-tree backed candidate search for distance-bounded node pairs.

use geo::Point;
use rstar::{AABB, RTree, primitives::GeomWithData};

use crate::{EARTH_RADIUS_M, geometry::haversine_distance};

type IndexedPoint = GeomWithData<[f64; 2], usize>;

// Widens the degree box so float error near the bound never drops a pair.
const ENVELOPE_MARGIN: f64 = 1.5;

/// All index pairs `(i, j)` with `i < j` whose haversine distance is at most
/// `max_dist_m`, sorted ascending.
pub(crate) fn pairs_within(points: &[Point<f64>], max_dist_m: f64) -> Vec<(usize, usize)> {
    let tree = RTree::bulk_load(
        points
            .iter()
            .enumerate()
            .map(|(idx, p)| IndexedPoint::new([p.x(), p.y()], idx))
            .collect(),
    );

    let mut pairs = Vec::new();
    for (i, p) in points.iter().enumerate() {
        let envelope = search_envelope(*p, max_dist_m);
        for candidate in tree.locate_in_envelope_intersecting(&envelope) {
            let j = candidate.data;
            if j > i && haversine_distance(*p, points[j]) <= max_dist_m {
                pairs.push((i, j));
            }
        }
    }
    pairs.sort_unstable();
    pairs
}

/// Degree box guaranteed to contain every point within `radius_m` of `center`.
fn search_envelope(center: Point<f64>, radius_m: f64) -> AABB<[f64; 2]> {
    let half_lat = (radius_m / EARTH_RADIUS_M).to_degrees() * ENVELOPE_MARGIN + 1e-9;

    let widest_lat = (center.y().abs() + half_lat).min(90.0);
    let cos_lat = widest_lat.to_radians().cos();
    let half_lon = if cos_lat > 1e-6 {
        (half_lat / cos_lat).min(360.0)
    } else {
        360.0
    };

    AABB::from_corners(
        [center.x() - half_lon, center.y() - half_lat],
        [center.x() + half_lon, center.y() + half_lat],
    )
}
