//! Read-only queries over a zone set, for tooling and visual debugging.
//!
//! These reuse the synthesis code path, so a probe at a cell's world position
//! reports exactly the weights the full pass writes there.

use crate::error::{ConfigError, ZoneWarning};
use crate::grid::{TerrainGrid, WorldPoint};
use crate::splat::cell::{resolve_cell, Fallback};
use crate::splat::{check_params, SplatParams};
use crate::zones::{prepare_zones, BiomeZone};

/// One zone's contribution at a probed point.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneSample {
    pub zone: usize,
    pub name: String,
    pub layer: usize,
    pub distance: f32,
    pub normalized_distance: f32,
    pub influence: f32,
    pub raw_weight: f32,
    /// False if the zone was skipped or its layer dropped
    pub contributes: bool,
}

/// Everything synthesis would compute at one world position.
#[derive(Clone, Debug, PartialEq)]
pub struct PointProbe {
    pub point: WorldPoint,
    pub samples: Vec<ZoneSample>,
    /// Raw total used for normalization
    pub total: f64,
    /// Set when the total fell under the threshold
    pub fallback: Option<Fallback>,
    /// Final per-layer weights
    pub weights: Vec<f32>,
    pub warnings: Vec<ZoneWarning>,
}

impl PointProbe {
    /// Heaviest layer, ties to the lower index.
    pub fn dominant_layer(&self) -> usize {
        let mut best = 0;
        for (i, &w) in self.weights.iter().enumerate() {
            if w > self.weights[best] {
                best = i;
            }
        }
        best
    }
}

/// Evaluate all zones at a single world position.
pub fn probe_point(
    grid: &TerrainGrid,
    zones: &[BiomeZone],
    params: &SplatParams,
    point: WorldPoint,
) -> Result<PointProbe, ConfigError> {
    grid.check()?;
    check_params(params)?;
    let (prepared, warnings) = prepare_zones(grid, zones, params.layer_overflow);
    let fallback = Fallback::resolve(&prepared);

    let mut raw = vec![0.0f32; prepared.len()];
    let mut weights = vec![0.0f32; grid.layer_count];
    let outcome = resolve_cell(&prepared, point, params.fallback_threshold, fallback, &mut raw, &mut weights);

    let samples = prepared
        .iter()
        .zip(zones)
        .map(|(p, zone)| {
            let (distance, normalized_distance, influence, raw_weight) = p.sample(point);
            ZoneSample {
                zone: p.index,
                name: zone.name.clone(),
                layer: p.layer,
                distance,
                normalized_distance,
                influence,
                raw_weight,
                contributes: p.active && p.writes,
            }
        })
        .collect();

    Ok(PointProbe {
        point,
        samples,
        total: outcome.total,
        fallback: outcome.used_fallback.then_some(fallback),
        weights,
        warnings,
    })
}

/// Probe the world position of a grid cell.
pub fn probe_cell(
    grid: &TerrainGrid,
    zones: &[BiomeZone],
    params: &SplatParams,
    x: usize,
    y: usize,
) -> Result<PointProbe, ConfigError> {
    probe_point(grid, zones, params, grid.cell_to_world(x, y))
}

/// Whether a zone's center lies on the terrain.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneBounds {
    pub zone: usize,
    pub name: String,
    pub center: WorldPoint,
    pub inside: bool,
}

/// Check every zone center against the grid's world rectangle.
pub fn zone_bounds(grid: &TerrainGrid, zones: &[BiomeZone]) -> Vec<ZoneBounds> {
    zones
        .iter()
        .enumerate()
        .map(|(i, z)| ZoneBounds {
            zone: i,
            name: z.name.clone(),
            center: z.center,
            inside: grid.contains(z.center),
        })
        .collect()
}
