use crate::{Error, model::GraphNode};

/// Pretty-printed JSON array of nodes, two-space indented.
pub fn to_json_string(nodes: &[GraphNode]) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(nodes)?)
}

/// Parses a node array previously written by [`to_json_string`].
pub fn from_json_str(json: &str) -> Result<Vec<GraphNode>, Error> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::path_nodes;

    #[test]
    fn writes_node_fields_with_two_space_indent() {
        let json = to_json_string(&path_nodes()).unwrap();
        assert!(json.starts_with("[\n  {\n    \"id\": 1,"));
        assert!(json.contains("\"connected_to\": [\n      1,\n      3\n    ]"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[2]["lon"], 6.101);
    }

    #[test]
    fn missing_neighbor_list_defaults_to_empty() {
        let nodes = from_json_str(r#"[{"id": 1, "lat": 1.5, "lon": 2.5}]"#).unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].connected_to.is_empty());
    }

    #[test]
    fn malformed_input_is_a_serialization_error() {
        assert!(matches!(
            from_json_str("{\"id\": 1}"),
            Err(Error::Serialization(_))
        ));
    }
}
