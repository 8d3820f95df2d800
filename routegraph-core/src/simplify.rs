//! Route thinning before graph construction.

use geo::LineString;

use crate::{
    Route,
    config::SimplifyConfig,
    geometry::{haversine_distance, turn_angle_deg},
};

/// Greedy single-pass simplification.
///
/// The first and last points are always kept. An interior point is kept when
/// the route turns by at least `angle_threshold_deg` there, or when it lies at
/// least `max_segment_dist_m` from the last kept point. Decisions are never
/// revisited. Routes of two points or fewer are returned unchanged.
pub fn simplify_route(route: &Route, config: &SimplifyConfig) -> Route {
    let coords = &route.0;
    if coords.len() <= 2 {
        return route.clone();
    }

    let mut kept = Vec::with_capacity(coords.len());
    kept.push(coords[0]);
    let mut last_kept = coords[0];

    for window in coords.windows(3) {
        let (prev, curr, next) = (window[0], window[1], window[2]);

        let angle = turn_angle_deg(prev, curr, next);
        let gap = haversine_distance(last_kept.into(), curr.into());

        if angle >= config.angle_threshold_deg || gap >= config.max_segment_dist_m {
            kept.push(curr);
            last_kept = curr;
        }
    }

    kept.push(coords[coords.len() - 1]);
    LineString::new(kept)
}

/// Uniform-stride thinning for oversized responses.
///
/// Keeps every `ceil(len / max_points)`-th point starting with the first one.
/// Routes already within the limit (or a limit of zero) are returned as is.
pub fn downsample_route(route: &Route, max_points: usize) -> Route {
    let len = route.0.len();
    if max_points == 0 || len <= max_points {
        return route.clone();
    }
    let step = len.div_ceil(max_points);
    route.0.iter().step_by(step).copied().collect()
}
