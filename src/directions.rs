//! Directions-service collaborator.
//!
//! The pipeline only needs ordered polylines between two points, so the
//! service sits behind [`DirectionsProvider`]. [`OrsClient`] implements it
//! against the openrouteservice v2 GeoJSON directions endpoint.

use std::time::Duration;

use geo::Point;
use log::debug;
use reqwest::{StatusCode, blocking::Client, header::AUTHORIZATION};
use routegraph_core::{Route, geometry::haversine_distance};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Most alternates the service will compute besides the primary route.
pub const MAX_ALTERNATIVES: usize = 2;

/// Environment variable holding the openrouteservice API key.
pub const API_KEY_VAR: &str = "ORS_API_KEY";

/// One directions query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionsRequest {
    pub from: Point<f64>,
    pub to: Point<f64>,
    /// Alternates wanted on top of the primary route, clamped to [`MAX_ALTERNATIVES`].
    pub alternatives: usize,
}

impl DirectionsRequest {
    pub fn new(from: Point<f64>, to: Point<f64>) -> Self {
        Self {
            from,
            to,
            alternatives: 0,
        }
    }

    pub fn with_alternatives(mut self, alternatives: usize) -> Self {
        self.alternatives = alternatives.min(MAX_ALTERNATIVES);
        self
    }
}

/// Source of walking routes.
///
/// Implementations return routes in the service's order (primary first) as
/// `[lon, lat]` polylines. An empty vector means "no route found".
pub trait DirectionsProvider {
    fn routes(&self, request: &DirectionsRequest) -> Result<Vec<Route>, Error>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrsConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
    pub share_factor: f64,
    pub weight_factor: f64,
}

impl Default for OrsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openrouteservice.org/v2/directions".to_string(),
            profile: "foot-walking".to_string(),
            timeout_secs: 30,
            share_factor: 0.6,
            weight_factor: 2.0,
        }
    }
}

impl OrsConfig {
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}/geojson",
            self.base_url.trim_end_matches('/'),
            self.profile
        )
    }
}

/// Blocking openrouteservice client.
#[derive(Debug, Clone)]
pub struct OrsClient {
    http: Client,
    api_key: String,
    config: OrsConfig,
}

impl OrsClient {
    /// # Errors
    ///
    /// [`Error::MissingApiKey`] for a blank key, [`Error::Http`] if the HTTP
    /// client cannot be constructed.
    pub fn new(api_key: &str, config: OrsConfig) -> Result<Self, Error> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(Error::MissingApiKey);
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            config,
        })
    }

    /// Reads the key from [`API_KEY_VAR`]. Loading a `.env` file is left to the caller.
    pub fn from_env(config: OrsConfig) -> Result<Self, Error> {
        let key = std::env::var(API_KEY_VAR).unwrap_or_default();
        Self::new(&key, config)
    }

    pub fn config(&self) -> &OrsConfig {
        &self.config
    }
}

impl DirectionsProvider for OrsClient {
    fn routes(&self, request: &DirectionsRequest) -> Result<Vec<Route>, Error> {
        let body = request_body(request, &self.config);
        debug!(
            "Requesting {} route(s) over {:.0} m",
            1 + request.alternatives.min(MAX_ALTERNATIVES),
            haversine_distance(request.from, request.to)
        );

        let response = self
            .http
            .post(self.config.endpoint())
            .header(AUTHORIZATION, &self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if status != StatusCode::OK {
            return Err(Error::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        parse_routes(&text)
    }
}

#[derive(Debug, Serialize)]
struct RequestBody {
    coordinates: [[f64; 2]; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    alternative_routes: Option<AlternativeRoutes>,
}

#[derive(Debug, Serialize)]
struct AlternativeRoutes {
    target_count: usize,
    share_factor: f64,
    weight_factor: f64,
}

fn request_body(request: &DirectionsRequest, config: &OrsConfig) -> RequestBody {
    let alternatives = request.alternatives.min(MAX_ALTERNATIVES);
    RequestBody {
        coordinates: [
            [request.from.x(), request.from.y()],
            [request.to.x(), request.to.y()],
        ],
        alternative_routes: (alternatives > 0).then(|| AlternativeRoutes {
            target_count: 1 + alternatives,
            share_factor: config.share_factor,
            weight_factor: config.weight_factor,
        }),
    }
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    features: Vec<ResponseFeature>,
}

#[derive(Debug, Deserialize)]
struct ResponseFeature {
    geometry: Option<ResponseGeometry>,
}

#[derive(Debug, Deserialize)]
struct ResponseGeometry {
    #[serde(default)]
    coordinates: Vec<Vec<f64>>,
}

/// Extracts one polyline per feature, skipping features without coordinates.
/// Positions may carry a third (elevation) value, which is dropped.
fn parse_routes(body: &str) -> Result<Vec<Route>, Error> {
    let response: ResponseBody =
        serde_json::from_str(body).map_err(|e| Error::InvalidResponse(e.to_string()))?;

    let mut routes = Vec::with_capacity(response.features.len());
    for feature in response.features {
        let Some(geometry) = feature.geometry else {
            continue;
        };
        if geometry.coordinates.is_empty() {
            continue;
        }
        let route = geometry
            .coordinates
            .iter()
            .map(|position| match position.as_slice() {
                [lon, lat, ..] => Ok((*lon, *lat)),
                _ => Err(Error::InvalidResponse(format!(
                    "position with {} value(s)",
                    position.len()
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        routes.push(Route::from(route));
    }
    Ok(routes)
}
