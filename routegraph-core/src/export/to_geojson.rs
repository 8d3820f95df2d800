use geo::{LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use crate::{Error, geometry::haversine_distance, model::GraphNode};

use super::undirected_edges;

/// Converts the node list to a `GeoJSON` `FeatureCollection`: one Point
/// feature per node followed by one LineString feature per undirected edge.
pub fn to_geojson(nodes: &[GraphNode]) -> Result<FeatureCollection, Error> {
    let mut features = Vec::with_capacity(nodes.len() * 2);

    for node in nodes {
        features.push(node_feature(node)?);
    }
    for (i, j) in undirected_edges(nodes) {
        features.push(edge_feature(&nodes[i], &nodes[j])?);
    }

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

pub fn to_geojson_string(nodes: &[GraphNode]) -> Result<String, Error> {
    serde_json::to_string(&to_geojson(nodes)?).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn node_feature(node: &GraphNode) -> Result<Feature, Error> {
    let geometry = Geometry::new(GeoJsonValue::from(&Point::new(node.lon, node.lat)));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "id": node.id,
            "connected_to": node.connected_to,
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn edge_feature(from: &GraphNode, to: &GraphNode) -> Result<Feature, Error> {
    let line = LineString::from(vec![(from.lon, from.lat), (to.lon, to.lat)]);
    let geometry = Geometry::new(GeoJsonValue::from(&line));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "from": from.id,
            "to": to.id,
            "length_m": haversine_distance(from.location(), to.location()),
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::path_nodes;

    #[test]
    fn nodes_then_edges() {
        let collection = to_geojson(&path_nodes()).unwrap();
        assert_eq!(collection.features.len(), 5);

        let first = &collection.features[0];
        assert_eq!(first.property("id"), Some(&json!(1)));
        assert_eq!(first.property("connected_to"), Some(&json!([2])));

        let edge = &collection.features[3];
        assert_eq!(edge.property("from"), Some(&json!(1)));
        assert_eq!(edge.property("to"), Some(&json!(2)));
        let length = edge.property("length_m").and_then(|v| v.as_f64()).unwrap();
        // 0.001 degrees of latitude
        assert!((length - 111.19).abs() < 0.1, "{length}");
    }

    #[test]
    fn serializes_as_feature_collection() {
        let text = to_geojson_string(&path_nodes()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][4]["geometry"]["type"], "LineString");
    }
}
