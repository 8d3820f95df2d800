//! Tunable thresholds for the simplifier, builder and cleaner.
//!
//! Every struct deserializes with `#[serde(default)]`, so a configuration
//! file only has to name the values it overrides.

use serde::{Deserialize, Serialize};

use crate::Error;

/// Thresholds for the greedy polyline simplifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifyConfig {
    /// Keep points where the route turns by at least this many degrees.
    pub angle_threshold_deg: f64,
    /// Keep a point at least every this many meters on straight stretches.
    pub max_segment_dist_m: f64,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            angle_threshold_deg: 15.0,
            max_segment_dist_m: 60.0,
        }
    }
}

impl SimplifyConfig {
    pub fn validate(&self) -> Result<(), Error> {
        ensure_non_negative("angle_threshold_deg", self.angle_threshold_deg)?;
        ensure_non_negative("max_segment_dist_m", self.max_segment_dist_m)
    }
}

/// Coordinate quantization used to deduplicate route points into nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Decimal digits kept in latitude and longitude (6 digits is about 0.1 m).
    pub precision: u32,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self { precision: 6 }
    }
}

impl BuilderConfig {
    pub const MAX_PRECISION: u32 = 12;

    pub fn validate(&self) -> Result<(), Error> {
        if self.precision > Self::MAX_PRECISION {
            return Err(Error::InvalidConfig(format!(
                "precision must be at most {}, got {}",
                Self::MAX_PRECISION,
                self.precision
            )));
        }
        Ok(())
    }
}

/// Distance and ratio thresholds for the five cleaning passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Nodes closer than this collapse into one.
    pub merge_dist_m: f64,
    /// Nodes closer than this get a direct edge.
    pub connect_dist_m: f64,
    /// Components are bridged only if their closest nodes are within this.
    pub component_link_max_dist_m: f64,
    /// A node this close to an edge is snapped onto it.
    pub near_line_dist_m: f64,
    /// A replacement path may be at most this fraction longer than the edge it replaces.
    pub skip_max_extra_ratio: f64,
    /// Every node of a replacement path must stay within this of the straight edge.
    pub skip_max_perp_dist_m: f64,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            merge_dist_m: 4.0,
            connect_dist_m: 25.0,
            component_link_max_dist_m: 35.0,
            near_line_dist_m: 8.0,
            skip_max_extra_ratio: 0.15,
            skip_max_perp_dist_m: 5.0,
        }
    }
}

impl CleanerConfig {
    pub fn validate(&self) -> Result<(), Error> {
        ensure_non_negative("merge_dist_m", self.merge_dist_m)?;
        ensure_non_negative("connect_dist_m", self.connect_dist_m)?;
        ensure_non_negative("component_link_max_dist_m", self.component_link_max_dist_m)?;
        ensure_non_negative("near_line_dist_m", self.near_line_dist_m)?;
        ensure_non_negative("skip_max_extra_ratio", self.skip_max_extra_ratio)?;
        ensure_non_negative("skip_max_perp_dist_m", self.skip_max_perp_dist_m)
    }
}

pub(crate) fn ensure_non_negative(name: &str, value: f64) -> Result<(), Error> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{name} must be a finite non-negative number, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SimplifyConfig::default().validate().is_ok());
        assert!(BuilderConfig::default().validate().is_ok());
        assert!(CleanerConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_negative_and_non_finite_thresholds() {
        let config = CleanerConfig {
            merge_dist_m: -1.0,
            ..CleanerConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = SimplifyConfig {
            max_segment_dist_m: f64::NAN,
            ..SimplifyConfig::default()
        };
        assert!(config.validate().is_err());

        let config = BuilderConfig { precision: 13 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: CleanerConfig = serde_json::from_str(r#"{"merge_dist_m": 2.5}"#).unwrap();
        assert_eq!(config.merge_dist_m, 2.5);
        assert_eq!(config.connect_dist_m, 25.0);
        assert_eq!(config.skip_max_extra_ratio, 0.15);
    }
}
