//! Ladder connectors between the primary route and its alternates.
//!
//! A few evenly spaced points of the primary route are each linked to the
//! nearest point of every alternate with a short directions request, so the
//! final graph offers crossings between otherwise parallel routes.

use geo::{Coord, Point};
use log::{debug, warn};
use routegraph_core::{
    Error as CoreError, Route,
    config::SimplifyConfig,
    geometry::nearest_point_index,
    simplify::{downsample_route, simplify_route},
};
use serde::{Deserialize, Serialize};

use crate::directions::{DirectionsProvider, DirectionsRequest};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Connectors requested from the primary route to each alternate
    pub connectors_per_alt: usize,
    /// Skip a connector when the alternate is farther than this, meters
    pub max_connector_dist_m: f64,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            connectors_per_alt: 3,
            max_connector_dist_m: 400.0,
        }
    }
}

impl ConnectorConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.max_connector_dist_m.is_finite() || self.max_connector_dist_m < 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "max_connector_dist_m must be a non-negative number, got {}",
                self.max_connector_dist_m
            )));
        }
        Ok(())
    }
}

/// Shared settings for turning a raw service polyline into a pipeline route.
#[derive(Debug, Clone, Copy)]
pub struct RoutePreparation<'a> {
    pub max_route_points: usize,
    pub simplify: &'a SimplifyConfig,
}

impl RoutePreparation<'_> {
    /// Downsamples oversized polylines, then simplifies.
    pub fn prepare(&self, raw: &Route) -> Route {
        simplify_route(&downsample_route(raw, self.max_route_points), self.simplify)
    }
}

/// Interior indices of a `len`-point route at which connectors start.
///
/// Index `k` is `round(k * last / (count + 1))` for `k = 1..=count`, rounding
/// halves to even; indices that land on an endpoint are dropped.
pub fn connector_indices(len: usize, count: usize) -> Vec<usize> {
    let Some(last) = len.checked_sub(1) else {
        return Vec::new();
    };
    (1..=count)
        .map(|k| (k as f64 * last as f64 / (count + 1) as f64).round_ties_even() as usize)
        .filter(|&idx| idx > 0 && idx < last)
        .collect()
}

/// A connector to be requested between two route points.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Rung {
    alt: usize,
    main_index: usize,
    alt_index: usize,
    from: Coord<f64>,
    to: Coord<f64>,
    distance_m: f64,
}

/// Plans and fetches connector routes between `base_routes[0]` and every other
/// base route.
///
/// Requests are made one at a time, alternate by alternate and then along the
/// primary route, and the result keeps that order. Failed or empty requests are skipped, as are
/// connectors that collapse to a single point after simplification. Every
/// kept connector starts and ends exactly on the two base-route points it joins.
pub fn synthesize_connectors<P>(
    provider: &P,
    base_routes: &[Route],
    config: &ConnectorConfig,
    preparation: RoutePreparation<'_>,
) -> Vec<Route>
where
    P: DirectionsProvider + ?Sized,
{
    let Some((main, alternates)) = base_routes.split_first() else {
        return Vec::new();
    };
    if alternates.is_empty() || config.connectors_per_alt == 0 {
        return Vec::new();
    }

    let indices = connector_indices(main.0.len(), config.connectors_per_alt);
    debug!("Connector base indices on primary route: {indices:?}");

    let mut rungs = Vec::new();
    for (alt, route) in alternates.iter().enumerate() {
        for &main_index in &indices {
            let from = main.0[main_index];
            let Some((alt_index, distance_m)) =
                nearest_point_index(route.points(), Point::from(from))
            else {
                continue;
            };
            if distance_m > config.max_connector_dist_m {
                debug!(
                    "Alternate {} is {distance_m:.0} m from primary point {main_index}, skipping",
                    alt + 1
                );
                continue;
            }
            rungs.push(Rung {
                alt: alt + 1,
                main_index,
                alt_index,
                from,
                to: route.0[alt_index],
                distance_m,
            });
        }
    }

    rungs
        .iter()
        .filter_map(|rung| fetch_connector(provider, rung, preparation))
        .collect()
}

fn fetch_connector<P>(
    provider: &P,
    rung: &Rung,
    preparation: RoutePreparation<'_>,
) -> Option<Route>
where
    P: DirectionsProvider + ?Sized,
{
    let request = DirectionsRequest::new(rung.from.into(), rung.to.into());
    let raw = match provider.routes(&request) {
        Ok(routes) => routes.into_iter().next()?,
        Err(e) => {
            warn!(
                "Connector primary[{}] -> alternate {}[{}] failed: {e}",
                rung.main_index, rung.alt, rung.alt_index
            );
            return None;
        }
    };

    let mut route = preparation.prepare(&raw);
    if route.0.len() <= 1 {
        return None;
    }
    pin_endpoints(&mut route, rung.from, rung.to);
    debug!(
        "Connector primary[{}] -> alternate {}[{}] ({:.0} m): {} -> {} points",
        rung.main_index,
        rung.alt,
        rung.alt_index,
        rung.distance_m,
        raw.0.len(),
        route.0.len()
    );
    Some(route)
}

/// Overwrites the first and last point of a non-empty route.
pub(crate) fn pin_endpoints(route: &mut Route, first: Coord<f64>, last: Coord<f64>) {
    if let Some(c) = route.0.first_mut() {
        *c = first;
    }
    if let Some(c) = route.0.last_mut() {
        *c = last;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::Error;
    use geo::{coord, line_string};

    #[test]
    fn indices_are_evenly_spaced_and_interior() {
        assert_eq!(connector_indices(13, 3), vec![3, 6, 9]);
        // 1 * 4 / 8 = 0.5 and 3 * 4 / 8 = 1.5 round to even
        assert_eq!(connector_indices(5, 7), vec![1, 2, 2, 2, 3]);
        assert!(connector_indices(2, 3).is_empty());
        assert!(connector_indices(0, 3).is_empty());
        assert!(connector_indices(10, 0).is_empty());
    }

    /// Answers every request with a three-point dogleg, or fails.
    struct StubProvider {
        fail: bool,
        requests: Mutex<Vec<DirectionsRequest>>,
    }

    impl StubProvider {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl DirectionsProvider for StubProvider {
        fn routes(&self, request: &DirectionsRequest) -> Result<Vec<Route>, Error> {
            self.requests.lock().unwrap().push(*request);
            if self.fail {
                return Err(Error::Status {
                    status: 429,
                    body: "rate limited".to_string(),
                });
            }
            let (a, b) = (request.from, request.to);
            let mid = coord!(x: (a.x() + b.x()) / 2.0 + 0.000_5, y: (a.y() + b.y()) / 2.0);
            Ok(vec![Route::new(vec![a.into(), mid, b.into()])])
        }
    }

    fn base_routes() -> Vec<Route> {
        let main: Route = (0..9).map(|i| coord!(x: 0.0, y: f64::from(i) * 0.001)).collect();
        let alt: Route = (0..9).map(|i| coord!(x: 0.002, y: f64::from(i) * 0.001)).collect();
        let far: Route = (0..9).map(|i| coord!(x: 0.1, y: f64::from(i) * 0.001)).collect();
        vec![main, alt, far]
    }

    fn preparation(simplify: &SimplifyConfig) -> RoutePreparation<'_> {
        RoutePreparation {
            max_route_points: 1_200,
            simplify,
        }
    }

    #[test]
    fn connectors_join_primary_to_nearby_alternates() {
        let provider = StubProvider::new(false);
        let simplify = SimplifyConfig::default();
        let routes = base_routes();
        let connectors = synthesize_connectors(
            &provider,
            &routes,
            &ConnectorConfig::default(),
            preparation(&simplify),
        );

        // The far alternate (~11 km away) gets no connectors.
        assert_eq!(provider.requests.lock().unwrap().len(), 3);
        assert_eq!(connectors.len(), 3);
        for (connector, idx) in connectors.iter().zip([2, 4, 6]) {
            assert_eq!(connector.0.first(), Some(&routes[0].0[idx]));
            assert_eq!(connector.0.last(), Some(&routes[1].0[idx]));
        }
    }

    #[test]
    fn failed_requests_are_skipped() {
        let provider = StubProvider::new(true);
        let simplify = SimplifyConfig::default();
        let connectors = synthesize_connectors(
            &provider,
            &base_routes(),
            &ConnectorConfig::default(),
            preparation(&simplify),
        );
        assert!(connectors.is_empty());
        assert_eq!(provider.requests.lock().unwrap().len(), 3);
    }

    #[test]
    fn single_route_needs_no_connectors() {
        let provider = StubProvider::new(false);
        let simplify = SimplifyConfig::default();
        let routes = vec![line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 0.01)]];
        let connectors = synthesize_connectors(
            &provider,
            &routes,
            &ConnectorConfig::default(),
            preparation(&simplify),
        );
        assert!(connectors.is_empty());
        assert!(provider.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn negative_distance_is_invalid() {
        let config = ConnectorConfig {
            max_connector_dist_m: -1.0,
            ..ConnectorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
