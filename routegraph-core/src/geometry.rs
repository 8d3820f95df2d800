//! Distance and local-projection primitives.
//!
//! Points use `geo` conventions: `x` is longitude and `y` is latitude, both
//! in degrees. Planar computations go through [`LocalProjection`], a
//! flat-earth approximation that is only meaningful over a few kilometers.

use geo::{Coord, Point};

use crate::{EARTH_RADIUS_M, METERS_PER_DEGREE};

/// Great-circle distance between two points in meters (haversine formula).
pub fn haversine_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    let d_lat = (b.y() - a.y()).to_radians();
    let d_lon = (b.x() - a.x()).to_radians();

    let h = (d_lat * 0.5).sin().powi(2)
        + a.y().to_radians().cos() * b.y().to_radians().cos() * (d_lon * 0.5).sin().powi(2);

    EARTH_RADIUS_M * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Converts `p` to planar meters relative to `origin`.
pub fn project_local(origin: Point<f64>, p: Point<f64>) -> Coord<f64> {
    LocalProjection::new(origin).project(p)
}

/// Equirectangular projection centered on an origin point.
#[derive(Debug, Clone, Copy)]
pub struct LocalProjection {
    origin: Point<f64>,
    meters_per_deg_lon: f64,
}

impl LocalProjection {
    pub fn new(origin: Point<f64>) -> Self {
        Self {
            origin,
            meters_per_deg_lon: METERS_PER_DEGREE * origin.y().to_radians().cos(),
        }
    }

    /// Project `p` to `(x, y)` meters east and north of the origin.
    pub fn project(&self, p: Point<f64>) -> Coord<f64> {
        Coord {
            x: (p.x() - self.origin.x()) * self.meters_per_deg_lon,
            y: (p.y() - self.origin.y()) * METERS_PER_DEGREE,
        }
    }
}

/// Where a point falls relative to a segment, in local planar meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Interpolation parameter of the foot of the perpendicular; `0` at the
    /// segment start, `1` at its end, unbounded outside the segment.
    pub t: f64,
    /// Distance to the infinite line through the segment.
    pub perpendicular_m: f64,
    /// Distance to the closest point of the segment itself (`t` clamped).
    pub segment_distance_m: f64,
}

impl SegmentProjection {
    pub fn within_segment(&self) -> bool {
        (0.0..=1.0).contains(&self.t)
    }
}

/// A segment prepared for repeated point projections, planar around its start.
#[derive(Debug, Clone, Copy)]
pub struct SegmentFrame {
    plane: LocalProjection,
    end: Coord<f64>,
    length_sq: f64,
}

impl SegmentFrame {
    /// Returns `None` when both endpoints project onto the same planar point.
    pub fn new(start: Point<f64>, end: Point<f64>) -> Option<Self> {
        let plane = LocalProjection::new(start);
        let end = plane.project(end);
        let length_sq = end.x * end.x + end.y * end.y;
        if length_sq == 0.0 {
            return None;
        }
        Some(Self {
            plane,
            end,
            length_sq,
        })
    }

    pub fn length_m(&self) -> f64 {
        self.length_sq.sqrt()
    }

    pub fn locate(&self, p: Point<f64>) -> SegmentProjection {
        let c = self.plane.project(p);
        let t = (c.x * self.end.x + c.y * self.end.y) / self.length_sq;

        let foot = self.end * t;
        let clamped_foot = self.end * t.clamp(0.0, 1.0);

        SegmentProjection {
            t,
            perpendicular_m: (c.x - foot.x).hypot(c.y - foot.y),
            segment_distance_m: (c.x - clamped_foot.x).hypot(c.y - clamped_foot.y),
        }
    }
}

/// Projects `p` onto the segment `start -> end`.
pub fn project_onto_segment(
    start: Point<f64>,
    end: Point<f64>,
    p: Point<f64>,
) -> Option<SegmentProjection> {
    SegmentFrame::new(start, end).map(|frame| frame.locate(p))
}

/// Turn angle in degrees at `curr`, measured between the raw coordinate
/// vectors `prev -> curr` and `curr -> next`. Zero if either vector is empty.
pub fn turn_angle_deg(prev: Coord<f64>, curr: Coord<f64>, next: Coord<f64>) -> f64 {
    let incoming = curr - prev;
    let outgoing = next - curr;

    let mag_in = incoming.x.hypot(incoming.y);
    let mag_out = outgoing.x.hypot(outgoing.y);
    if mag_in == 0.0 || mag_out == 0.0 {
        return 0.0;
    }

    let dot = incoming.x * outgoing.x + incoming.y * outgoing.y;
    (dot / (mag_in * mag_out)).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Initial great-circle bearing from `from` to `to`, in `[0, 360)` degrees.
pub fn bearing_deg(from: Point<f64>, to: Point<f64>) -> f64 {
    let lat1 = from.y().to_radians();
    let lat2 = to.y().to_radians();
    let d_lon = (to.x() - from.x()).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Index of the point nearest to `target` and its distance in meters.
/// Ties keep the first point encountered.
pub fn nearest_point_index<I>(points: I, target: Point<f64>) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = Point<f64>>,
{
    let mut best: Option<(usize, f64)> = None;
    for (idx, p) in points.into_iter().enumerate() {
        let d = haversine_distance(target, p);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((idx, d));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{coord, point};

    #[test]
    fn haversine_matches_known_distance() {
        // One degree of latitude on a 6 371 km sphere.
        let d = haversine_distance(point!(x: 0.0, y: 0.0), point!(x: 0.0, y: 1.0));
        assert!((d - 111_194.93).abs() < 0.01, "got {d}");

        let same = point!(x: 6.1123, y: 52.50479);
        assert_eq!(haversine_distance(same, same), 0.0);
    }

    #[test]
    fn local_projection_scales_longitude_by_latitude() {
        let origin = point!(x: 10.0, y: 60.0);
        let c = project_local(origin, point!(x: 10.001, y: 60.001));
        assert!((c.y - 111.32).abs() < 1e-6);
        assert!((c.x - 55.66).abs() < 1e-3, "cos(60) halves the scale, got {}", c.x);
    }

    #[test]
    fn segment_projection_reports_parameter_and_offsets() {
        let a = point!(x: 0.0, y: 0.0);
        let b = point!(x: 0.001, y: 0.0);

        let mid = project_onto_segment(a, b, point!(x: 0.0005, y: 0.00003)).unwrap();
        assert!((mid.t - 0.5).abs() < 1e-9);
        assert!((mid.perpendicular_m - 3.3396).abs() < 1e-3);
        assert!(mid.within_segment());

        let beyond = project_onto_segment(a, b, point!(x: 0.002, y: 0.0)).unwrap();
        assert!((beyond.t - 2.0).abs() < 1e-9);
        assert!(beyond.perpendicular_m < 1e-9);
        assert!((beyond.segment_distance_m - 111.32).abs() < 1e-6);
        assert!(!beyond.within_segment());

        assert!(project_onto_segment(a, a, b).is_none());
    }

    #[test]
    fn turn_angle_of_straight_and_right_angle() {
        let straight = turn_angle_deg(
            coord!(x: 0.0, y: 0.0),
            coord!(x: 1.0, y: 0.0),
            coord!(x: 2.0, y: 0.0),
        );
        assert!(straight.abs() < 1e-9);

        let corner = turn_angle_deg(
            coord!(x: 0.0, y: 0.0),
            coord!(x: 1.0, y: 0.0),
            coord!(x: 1.0, y: 1.0),
        );
        assert!((corner - 90.0).abs() < 1e-9);

        let degenerate = turn_angle_deg(
            coord!(x: 1.0, y: 0.0),
            coord!(x: 1.0, y: 0.0),
            coord!(x: 1.0, y: 1.0),
        );
        assert_eq!(degenerate, 0.0);
    }

    #[test]
    fn bearing_points_at_cardinal_directions() {
        let origin = point!(x: 0.0, y: 0.0);
        assert!(bearing_deg(origin, point!(x: 0.0, y: 1.0)).abs() < 1e-9);
        assert!((bearing_deg(origin, point!(x: 1.0, y: 0.0)) - 90.0).abs() < 1e-9);
        assert!((bearing_deg(origin, point!(x: 0.0, y: -1.0)) - 180.0).abs() < 1e-9);
        assert!((bearing_deg(origin, point!(x: -1.0, y: 0.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn nearest_point_prefers_first_on_ties() {
        let points = [
            point!(x: 0.001, y: 0.0),
            point!(x: -0.001, y: 0.0),
            point!(x: 0.01, y: 0.0),
        ];
        let (idx, d) = nearest_point_index(points, point!(x: 0.0, y: 0.0)).unwrap();
        assert_eq!(idx, 0);
        assert!(d > 0.0);
        assert!(nearest_point_index(Vec::<Point<f64>>::new(), point!(x: 0.0, y: 0.0)).is_none());
    }
}
