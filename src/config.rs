//! Job configuration: grid, zones and parameters in one JSON document.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::curve::{CurveKey, ResponseCurve};
use crate::error::{ConfigError, LoadError};
use crate::grid::TerrainGrid;
use crate::sculpt::{sculpt_seabed, SculptParams};
use crate::splat::{synthesize_with, SplatOutput, SplatParams};
use crate::tilemap::Tilemap;
use crate::zones::BiomeZone;

/// A complete splat job as stored on disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplatConfig {
    /// Host terrain description; a job without one cannot run
    #[serde(default)]
    pub grid: Option<TerrainGrid>,
    #[serde(default)]
    pub zones: Vec<BiomeZone>,
    #[serde(default)]
    pub params: SplatParams,
    /// Optional seabed heightmap generated at the grid resolution
    #[serde(default)]
    pub sculpt: Option<SculptParams>,
}

impl SplatConfig {
    /// Run synthesis for this job.
    pub fn run(&self) -> Result<SplatOutput, ConfigError> {
        let grid = self.grid.as_ref().ok_or(ConfigError::MissingGrid)?;
        synthesize_with(grid, &self.zones, &self.params)
    }

    /// Sculpt the seabed, if the job asks for it.
    pub fn heights(&self) -> Result<Option<Tilemap<f32>>, ConfigError> {
        let grid = self.grid.as_ref().ok_or(ConfigError::MissingGrid)?;
        Ok(self
            .sculpt
            .as_ref()
            .map(|params| sculpt_seabed(grid.width, grid.height, params)))
    }

    /// Built-in ocean floor job: four seabed textures over a 1 km square
    /// centered on the world origin.
    pub fn ocean_floor() -> Self {
        let grid = TerrainGrid::new(512, 512, (-500.0, -500.0), (1000.0, 1000.0), 4);
        let eased = ResponseCurve::EaseInOut { start: 0.0, end: 1.0 };
        let zones = vec![
            BiomeZone::new("Sand", 0, (0.0, 0.0), 700.0).with_strength(0.4),
            BiomeZone::new("Coral", 1, (300.0, 300.0), 180.0).with_curve(eased.clone()),
            BiomeZone::new("Rock", 2, (-200.0, 200.0), 250.0).with_curve(ResponseCurve::keyframes(vec![
                CurveKey::new(0.0, 0.0),
                CurveKey::new(0.4, 0.7),
                CurveKey::new(1.0, 1.0),
            ])),
            BiomeZone::new("Mud", 3, (200.0, -300.0), 220.0).with_curve(eased),
        ];
        Self {
            grid: Some(grid),
            zones,
            params: SplatParams::default(),
            sculpt: Some(SculptParams::default()),
        }
    }
}

/// Read a job from a JSON file.
pub fn load_config(path: &Path) -> Result<SplatConfig, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Write a job as pretty-printed JSON.
pub fn save_config(config: &SplatConfig, path: &Path) -> Result<(), LoadError> {
    let text = serde_json::to_string_pretty(config).map_err(|source| LoadError::Json {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, text).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}
