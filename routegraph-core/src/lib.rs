//! Construction and cleanup of navigation graphs from GPS polylines.
//!
//! Routes are simplified, quantized into a node/edge graph, repaired by a
//! fixed sequence of cleaning passes and finally renumbered so that the
//! start and destination nodes take the first and last identifiers.

pub mod algo;
pub mod builder;
pub mod cleaning;
pub mod config;
mod error;
pub mod export;
pub mod geometry;
pub mod model;
pub mod navigation;
pub mod prelude;
pub mod reindex;
pub mod routing;
pub mod simplify;
mod spatial;

pub use error::Error;

/// Public node identifier, 1-based and dense in exported graphs.
pub type NodeId = usize;

/// Ordered polyline in geographic coordinates (`x` = longitude, `y` = latitude).
pub type Route = geo::LineString<f64>;

/// Mean Earth radius used by the haversine distance, meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per degree used by the flat-earth local projection.
pub const METERS_PER_DEGREE: f64 = 111_320.0;
