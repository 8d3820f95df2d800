use std::fmt::Write;

use crate::model::GraphNode;

use super::undirected_edges;

const DOCUMENT_NAME: &str = "Cleaned Route Graph";
const EDGE_STYLE_ID: &str = "edgeStyle";
const EDGE_COLOR: &str = "ff0000ff";
const EDGE_WIDTH: u32 = 3;

/// Renders the graph as a KML document.
///
/// Nodes go to a "Nodes" folder as point placemarks named by id, edges to an
/// "Edges" folder as two-point line strings, one placemark per undirected edge.
pub fn to_kml_string(nodes: &[GraphNode]) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n");
    out.push_str("<Document>\n");
    let _ = writeln!(out, "  <name>{DOCUMENT_NAME}</name>");
    let _ = writeln!(
        out,
        "  <Style id=\"{EDGE_STYLE_ID}\"><LineStyle><color>{EDGE_COLOR}</color><width>{EDGE_WIDTH}</width></LineStyle></Style>"
    );

    out.push_str("  <Folder>\n    <name>Nodes</name>\n");
    for node in nodes {
        let _ = writeln!(
            out,
            "    <Placemark><name>{}</name><Point><coordinates>{},{},0</coordinates></Point></Placemark>",
            node.id, node.lon, node.lat
        );
    }
    out.push_str("  </Folder>\n");

    out.push_str("  <Folder>\n    <name>Edges</name>\n");
    for (i, j) in undirected_edges(nodes) {
        let (a, b) = (&nodes[i], &nodes[j]);
        let _ = writeln!(
            out,
            "    <Placemark><name>{}-{}</name><styleUrl>#{EDGE_STYLE_ID}</styleUrl><LineString><coordinates>{},{},0 {},{},0</coordinates></LineString></Placemark>",
            a.id, b.id, a.lon, a.lat, b.lon, b.lat
        );
    }
    out.push_str("  </Folder>\n");

    out.push_str("</Document>\n</kml>\n");
    out
}
