//! End-to-end graph generation: fetch, simplify, connect, build, clean, reindex.

use std::{fmt, path::PathBuf, str::FromStr};

use geo::{Coord, Point};
use log::{debug, info};
use routegraph_core::{
    Error as CoreError, Route,
    builder::build_graph,
    cleaning::{CleanReport, clean_graph},
    config::{BuilderConfig, CleanerConfig, SimplifyConfig},
    model::GraphNode,
    reindex::reindex,
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    connectors::{ConnectorConfig, RoutePreparation, pin_endpoints, synthesize_connectors},
    directions::{DirectionsProvider, DirectionsRequest, MAX_ALTERNATIVES},
};

/// Geographic position in degrees, written `lat,lon` on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    pub fn coord(self) -> Coord<f64> {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }

    fn validate(self, name: &str) -> Result<(), Error> {
        let valid = self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon);
        if valid {
            Ok(())
        } else {
            Err(Error::InvalidCoordinate(format!("{name} {self} is out of range")))
        }
    }
}

impl FromStr for LatLon {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidCoordinate(format!("expected `lat,lon`, got `{s}`"));
        let (lat, lon) = s.split_once(',').ok_or_else(invalid)?;
        let lat = lat.trim().parse().map_err(|_| invalid())?;
        let lon = lon.trim().parse().map_err(|_| invalid())?;
        Ok(Self { lat, lon })
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Where the exported graph is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub json_path: PathBuf,
    pub kml_path: PathBuf,
    pub geojson_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_path: PathBuf::from("route.json"),
            kml_path: PathBuf::from("route.kml"),
            geojson_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub start: LatLon,
    pub destination: LatLon,
    /// Alternates requested besides the primary route, at most 2
    pub alt_route_count: usize,
    pub connectors: ConnectorConfig,
    /// Longer service polylines are downsampled by uniform stride
    pub max_route_points: usize,
    pub simplify: SimplifyConfig,
    pub builder: BuilderConfig,
    pub cleaner: CleanerConfig,
    pub output: OutputConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            start: LatLon::new(52.504_79, 6.112_30),
            destination: LatLon::new(52.506_40, 6.101_99),
            alt_route_count: 0,
            connectors: ConnectorConfig::default(),
            max_route_points: 1_200,
            simplify: SimplifyConfig::default(),
            builder: BuilderConfig::default(),
            cleaner: CleanerConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), Error> {
        self.start.validate("start")?;
        self.destination.validate("destination")?;
        if self.max_route_points < 2 {
            return Err(CoreError::InvalidConfig(format!(
                "max_route_points must be at least 2, got {}",
                self.max_route_points
            ))
            .into());
        }
        self.connectors.validate()?;
        self.simplify.validate()?;
        self.builder.validate()?;
        self.cleaner.validate()?;
        Ok(())
    }

    /// Alternate count actually requested.
    pub fn alternatives(&self) -> usize {
        self.alt_route_count.min(MAX_ALTERNATIVES)
    }
}

/// Everything a pipeline run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub base_routes: usize,
    pub connector_routes: usize,
    pub report: CleanReport,
    /// Reindexed graph, start node first and destination node last
    pub nodes: Vec<GraphNode>,
}

/// Runs the full pipeline against `provider`.
///
/// # Errors
///
/// Fails on invalid configuration, when the primary request fails and with
/// [`Error::NoRoutes`] when the service finds no route at all. Connector
/// request failures are logged and skipped.
pub fn run_pipeline<P>(provider: &P, config: &PipelineConfig) -> Result<PipelineOutput, Error>
where
    P: DirectionsProvider + ?Sized,
{
    config.validate()?;

    let request = DirectionsRequest::new(config.start.point(), config.destination.point())
        .with_alternatives(config.alternatives());
    info!(
        "Requesting primary route and {} alternate(s) from {} to {}",
        request.alternatives, config.start, config.destination
    );
    let raw_routes = provider.routes(&request)?;
    if raw_routes.is_empty() {
        return Err(Error::NoRoutes);
    }
    info!("Received {} base route(s)", raw_routes.len());

    let preparation = RoutePreparation {
        max_route_points: config.max_route_points,
        simplify: &config.simplify,
    };
    let base_routes: Vec<Route> = raw_routes
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let mut route = preparation.prepare(raw);
            pin_endpoints(&mut route, config.start.coord(), config.destination.coord());
            debug!(
                "Base route {}: {} -> {} points",
                i + 1,
                raw.0.len(),
                route.0.len()
            );
            route
        })
        .collect();

    let connectors =
        synthesize_connectors(provider, &base_routes, &config.connectors, preparation);
    info!("Created {} connector route(s)", connectors.len());

    let base_count = base_routes.len();
    let connector_count = connectors.len();
    let routes: Vec<Route> = base_routes.into_iter().chain(connectors).collect();
    let (nodes, report) = assemble_graph(&routes, config);

    Ok(PipelineOutput {
        base_routes: base_count,
        connector_routes: connector_count,
        report,
        nodes,
    })
}

/// Builds, cleans and reindexes an already prepared set of routes.
pub fn assemble_graph(routes: &[Route], config: &PipelineConfig) -> (Vec<GraphNode>, CleanReport) {
    let raw = build_graph(routes, &config.builder);
    let (cleaned, report) = clean_graph(&raw, &config.cleaner);
    let nodes = reindex(&cleaned, config.start.point(), config.destination.point());
    (nodes, report)
}
