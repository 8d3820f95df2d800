use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use routegraph::{LatLon, PipelineConfig, directions::OrsConfig};
use serde::{Deserialize, Serialize};

/// Contents of the TOML configuration file.
///
/// Every table and key is optional; missing values take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub ors: OrsConfig,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.pipeline.validate()?;
        Ok(config)
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub start: Option<LatLon>,
    pub destination: Option<LatLon>,
    pub alternates: Option<usize>,
    pub json: Option<PathBuf>,
    pub kml: Option<PathBuf>,
    pub geojson: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(self, config: &mut PipelineConfig) {
        if let Some(start) = self.start {
            config.start = start;
        }
        if let Some(destination) = self.destination {
            config.destination = destination;
        }
        if let Some(alternates) = self.alternates {
            config.alt_route_count = alternates;
        }
        if let Some(json) = self.json {
            config.output.json_path = json;
        }
        if let Some(kml) = self.kml {
            config.output.kml_path = kml;
        }
        if self.geojson.is_some() {
            config.output.geojson_path = self.geojson;
        }
    }
}
