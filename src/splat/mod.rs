//! Alpha map synthesis from biome zones.
//!
//! Every cell is mapped to world space, weighted by each zone's falloff,
//! normalized to sum to 1 and written into its own slot of a fresh
//! [`WeightBuffer`]. Cells never read each other, so rows are handed to rayon
//! workers as disjoint slices.
//!
//! Parallelization: rows run on the rayon pool; a [`CancelToken`] is polled
//! before each row and a cancelled pass returns nothing.

pub mod cell;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ZoneWarning};
use crate::grid::TerrainGrid;
use crate::weight_buffer::WeightBuffer;
use crate::zones::{prepare_zones, BiomeZone, LayerOverflow, PreparedZone};

pub use cell::{Fallback, FALLBACK_THRESHOLD};

/// Tunables for a synthesis pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplatParams {
    /// Cells whose total raw influence is below this get the fallback layer
    pub fallback_threshold: f32,
    /// Handling of zones that target a layer the grid does not have
    pub layer_overflow: LayerOverflow,
}

impl Default for SplatParams {
    fn default() -> Self {
        Self {
            fallback_threshold: FALLBACK_THRESHOLD,
            layer_overflow: LayerOverflow::Exclude,
        }
    }
}

/// What happened during a pass, besides the weights themselves.
#[derive(Clone, Debug, PartialEq)]
pub struct SplatReport {
    /// Zone-level issues, in zone order
    pub warnings: Vec<ZoneWarning>,
    /// Fallback chosen for uncovered cells
    pub fallback: Fallback,
    /// Number of cells that received the fallback
    pub fallback_cells: usize,
    /// Total cells written
    pub cells: usize,
}

impl SplatReport {
    /// Fraction of cells that no zone covered.
    pub fn fallback_ratio(&self) -> f32 {
        if self.cells == 0 {
            0.0
        } else {
            self.fallback_cells as f32 / self.cells as f32
        }
    }
}

/// Weights plus the pass report.
#[derive(Clone, Debug)]
pub struct SplatOutput {
    pub buffer: WeightBuffer,
    pub report: SplatReport,
}

/// Shared flag for stopping a pass between rows.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Synthesize normalized layer weights with default parameters.
pub fn synthesize(grid: &TerrainGrid, zones: &[BiomeZone]) -> Result<WeightBuffer, ConfigError> {
    synthesize_with(grid, zones, &SplatParams::default()).map(|out| out.buffer)
}

/// Synthesize with explicit parameters, returning the pass report as well.
pub fn synthesize_with(
    grid: &TerrainGrid,
    zones: &[BiomeZone],
    params: &SplatParams,
) -> Result<SplatOutput, ConfigError> {
    run_pass(grid, zones, params, None).map(|(out, _)| out)
}

/// Like [`synthesize_with`], but returns `Ok(None)` if `cancel` fires first.
/// Partial buffers are dropped.
pub fn synthesize_cancellable(
    grid: &TerrainGrid,
    zones: &[BiomeZone],
    params: &SplatParams,
    cancel: &CancelToken,
) -> Result<Option<SplatOutput>, ConfigError> {
    let (out, cancelled) = run_pass(grid, zones, params, Some(cancel))?;
    if cancelled {
        info!("splat pass cancelled; discarding partial weights");
        return Ok(None);
    }
    Ok(Some(out))
}

pub(crate) fn check_params(params: &SplatParams) -> Result<(), ConfigError> {
    let t = params.fallback_threshold;
    if !(t.is_finite() && t > 0.0) {
        return Err(ConfigError::InvalidThreshold(t));
    }
    Ok(())
}

/// Runs the pass; the flag is set when `cancel` fired before the last row.
fn run_pass(
    grid: &TerrainGrid,
    zones: &[BiomeZone],
    params: &SplatParams,
    cancel: Option<&CancelToken>,
) -> Result<(SplatOutput, bool), ConfigError> {
    grid.check()?;
    check_params(params)?;

    let (prepared, warnings) = prepare_zones(grid, zones, params.layer_overflow);
    for w in &warnings {
        warn!("{}", w);
    }

    let fallback = Fallback::resolve(&prepared);
    debug!(
        "splat pass: {}x{} cells, {} layers, {} zones, fallback {:?}",
        grid.width, grid.height, grid.layer_count, prepared.len(), fallback
    );

    let mut buffer = WeightBuffer::new(grid.width, grid.height, grid.layer_count);
    let stride = buffer.row_stride();
    let layers = grid.layer_count;
    let threshold = params.fallback_threshold;

    let fallback_cells: usize = buffer
        .as_mut_slice()
        .par_chunks_mut(stride)
        .enumerate()
        .map(|(y, row)| {
            if cancel.map_or(false, |c| c.is_cancelled()) {
                return 0;
            }
            fill_row(grid, &prepared, threshold, fallback, y, layers, row)
        })
        .sum();

    let cancelled = cancel.map_or(false, |c| c.is_cancelled());

    let report = SplatReport {
        warnings,
        fallback,
        fallback_cells,
        cells: grid.cell_count(),
    };
    if !cancelled {
        log_summary(grid, zones, &report);
    }

    Ok((SplatOutput { buffer, report }, cancelled))
}

/// Fill one row of cells; returns how many used the fallback.
fn fill_row(
    grid: &TerrainGrid,
    zones: &[PreparedZone],
    threshold: f32,
    fallback: Fallback,
    y: usize,
    layers: usize,
    row: &mut [f32],
) -> usize {
    let mut raw = vec![0.0f32; zones.len()];
    let mut fallback_cells = 0;
    for (x, out) in row.chunks_exact_mut(layers).enumerate() {
        let p = grid.cell_to_world(x, y);
        if cell::resolve_cell(zones, p, threshold, fallback, &mut raw, out).used_fallback {
            fallback_cells += 1;
        }
    }
    fallback_cells
}

fn log_summary(grid: &TerrainGrid, zones: &[BiomeZone], report: &SplatReport) {
    info!(
        "splat complete: {} layers, origin ({:.1}, {:.1}), size ({:.1}, {:.1}), {} of {} cells on fallback",
        grid.layer_count,
        grid.origin.0,
        grid.origin.1,
        grid.size.0,
        grid.size.1,
        report.fallback_cells,
        report.cells
    );
    for (i, zone) in zones.iter().enumerate() {
        debug!(
            "zone {}: {} -> layer {}, center ({:.1}, {:.1}), radius {:.1}",
            i, zone.name, zone.output_layer, zone.center.0, zone.center.1, zone.radius
        );
    }
}
