//! Writes an exported graph to the configured files.

use std::{fs, path::Path};

use log::info;
use routegraph_core::{
    export::{to_geojson_string, to_json_string, to_kml_string},
    model::GraphNode,
};

use crate::{Error, pipeline::OutputConfig};

/// Writes the JSON node list, the KML document and, when configured, the
/// GeoJSON feature collection. Parent directories must exist.
pub fn write_outputs(nodes: &[GraphNode], output: &OutputConfig) -> Result<(), Error> {
    write_file(&output.json_path, &to_json_string(nodes)?)?;
    write_file(&output.kml_path, &to_kml_string(nodes))?;
    if let Some(path) = &output.geojson_path {
        write_file(path, &to_geojson_string(nodes)?)?;
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<(), Error> {
    fs::write(path, contents)?;
    info!("Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}
