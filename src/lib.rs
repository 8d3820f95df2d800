//! Walking-graph generation between two points.
//!
//! Polylines come from a directions service ([`directions`]): a primary route,
//! optional alternates and short "ladder" connectors between them
//! ([`connectors`]). [`pipeline`] turns them into a cleaned, reindexed
//! navigation graph using `routegraph_core`, and [`output`] writes it to disk.

pub mod connectors;
pub mod directions;
mod error;
pub mod output;
pub mod pipeline;

pub use error::Error;
pub use pipeline::{LatLon, PipelineConfig, PipelineOutput, run_pipeline};
