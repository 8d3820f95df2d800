use geo::Point;
use serde::{Deserialize, Serialize};

use crate::NodeId;

/// Exported graph node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// 1-based identifier
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
    /// Neighbor identifiers, ascending
    #[serde(default)]
    pub connected_to: Vec<NodeId>,
}

impl GraphNode {
    pub fn location(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}
