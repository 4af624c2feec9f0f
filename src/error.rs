//! Error and warning types for splat synthesis.
//!
//! Grid-level problems are fatal and surface as [`ConfigError`]. Zone-level
//! problems degrade the offending zone only and are reported as
//! [`ZoneWarning`]s alongside the result.

use thiserror::Error;

/// Fatal configuration problems. Synthesis aborts before allocating output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No terrain grid was supplied with the job.
    #[error("no terrain grid assigned")]
    MissingGrid,

    /// The grid exposes zero texture layers.
    #[error("terrain grid has no texture layers")]
    NoLayers,

    /// The grid resolution has a zero dimension.
    #[error("terrain grid resolution {width}x{height} is empty")]
    EmptyGrid { width: usize, height: usize },

    /// Fallback threshold must be a positive finite number.
    #[error("fallback threshold {0} must be positive")]
    InvalidThreshold(f32),
}

/// Recoverable per-zone issues found while preparing a synthesis pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ZoneWarning {
    #[error("zone '{name}' has invalid radius {radius}; skipped")]
    InvalidRadius { zone: usize, name: String, radius: f32 },

    #[error("zone '{name}' response curve was {at_zero:.2} at 0.0 and {at_one:.2} at 1.0; replaced with linear ramp")]
    CurveRepaired { zone: usize, name: String, at_zero: f32, at_one: f32 },

    #[error("zone '{name}' targets layer {layer} but only {layer_count} layers exist; contribution dropped")]
    LayerOutOfRange { zone: usize, name: String, layer: usize, layer_count: usize },

    #[error("zone '{name}' has invalid base strength {strength}; treated as 0")]
    InvalidStrength { zone: usize, name: String, strength: f32 },
}

impl ZoneWarning {
    /// Index of the zone in the caller's list.
    pub fn zone(&self) -> usize {
        match self {
            ZoneWarning::InvalidRadius { zone, .. }
            | ZoneWarning::CurveRepaired { zone, .. }
            | ZoneWarning::LayerOutOfRange { zone, .. }
            | ZoneWarning::InvalidStrength { zone, .. } => *zone,
        }
    }
}

/// Failures loading or saving a job configuration file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_zone_index() {
        let w = ZoneWarning::LayerOutOfRange {
            zone: 3,
            name: "kelp".to_string(),
            layer: 7,
            layer_count: 4,
        };
        assert_eq!(w.zone(), 3);
        assert!(w.to_string().contains("layer 7"));
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(ConfigError::NoLayers.to_string(), "terrain grid has no texture layers");
        let e = ConfigError::EmptyGrid { width: 0, height: 12 };
        assert!(e.to_string().contains("0x12"));
    }
}
