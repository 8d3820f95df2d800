// Re-export key components
pub use crate::builder::build_graph;
pub use crate::cleaning::{CleanReport, clean_graph};
pub use crate::config::{BuilderConfig, CleanerConfig, SimplifyConfig};
pub use crate::export::{to_geojson_string, to_json_string, to_kml_string};
pub use crate::geometry::{haversine_distance, project_local};
pub use crate::model::{GraphNode, RouteGraph};
pub use crate::reindex::reindex;
pub use crate::routing::{ShortestPath, shortest_path};
pub use crate::simplify::{downsample_route, simplify_route};

// Core types
pub use crate::Error;
pub use crate::NodeId;
pub use crate::Route;
