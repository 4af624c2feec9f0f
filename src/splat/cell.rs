//! Per-cell weight synthesis, fallback and normalization.

use crate::grid::WorldPoint;
use crate::zones::PreparedZone;

/// Default below which a cell's total influence counts as "no zone here".
pub const FALLBACK_THRESHOLD: f32 = 0.01;

/// Assignment used for cells no zone meaningfully covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fallback {
    /// First zone in list order targeting layer 0
    Zone(usize),
    /// No zone targets layer 0; layer 0 is set directly
    Layer0,
}

impl Fallback {
    /// Pick the fallback for a zone list. The choice is the same for every cell.
    pub fn resolve(zones: &[PreparedZone]) -> Self {
        zones
            .iter()
            .position(|z| z.layer == 0)
            .map(Fallback::Zone)
            .unwrap_or(Fallback::Layer0)
    }

    /// Output layer the fallback paints. Both variants paint layer 0; the zone
    /// index only records which zone stood in for the uncovered cells.
    pub fn layer(&self) -> usize {
        0
    }
}

/// Outcome of resolving one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellOutcome {
    /// Raw total used for normalization
    pub total: f64,
    /// Whether the fallback assignment was written
    pub used_fallback: bool,
}

/// Fill `raw` with each zone's raw weight at `p` and return the total over
/// zones that count toward normalization.
/// Summed in f64 so strengths near `f32::MAX` cannot overflow the total.
#[inline]
fn raw_weights(zones: &[PreparedZone], p: WorldPoint, raw: &mut [f32]) -> f64 {
    let mut total = 0.0f64;
    for (zone, slot) in zones.iter().zip(raw.iter_mut()) {
        *slot = zone.raw_weight(p);
        if zone.counts {
            total += *slot as f64;
        }
    }
    total
}

/// Write the normalized weights for one cell into `out` (one slot per layer).
///
/// `raw` is scratch space with one slot per zone and holds the raw weights
/// afterwards.
pub fn resolve_cell(
    zones: &[PreparedZone],
    p: WorldPoint,
    threshold: f32,
    fallback: Fallback,
    raw: &mut [f32],
    out: &mut [f32],
) -> CellOutcome {
    let total = raw_weights(zones, p, raw);
    out.fill(0.0);

    if total < threshold as f64 {
        // layer 0 always exists once the grid passed its checks
        out[fallback.layer()] = 1.0;
        return CellOutcome { total, used_fallback: true };
    }

    for (zone, &w) in zones.iter().zip(raw.iter()) {
        if zone.writes {
            out[zone.layer] += (w as f64 / total) as f32;
        }
    }
    CellOutcome { total, used_fallback: false }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TerrainGrid;
    use crate::zones::{prepare_zones, BiomeZone, LayerOverflow};

    fn prepared(zones: &[BiomeZone], layers: usize, overflow: LayerOverflow) -> Vec<PreparedZone> {
        let grid = TerrainGrid::new(8, 8, (0.0, 0.0), (100.0, 100.0), layers);
        prepare_zones(&grid, zones, overflow).0
    }

    #[test]
    fn test_fallback_prefers_first_layer0_zone() {
        let zones = prepared(
            &[
                BiomeZone::new("rock", 2, (0.0, 0.0), 5.0),
                BiomeZone::new("sand", 0, (0.0, 0.0), 5.0),
                BiomeZone::new("silt", 0, (0.0, 0.0), 5.0),
            ],
            3,
            LayerOverflow::Exclude,
        );
        assert_eq!(Fallback::resolve(&zones), Fallback::Zone(1));

        let rockonly = prepared(&[BiomeZone::new("rock", 2, (0.0, 0.0), 5.0)], 3, LayerOverflow::Exclude);
        assert_eq!(Fallback::resolve(&rockonly), Fallback::Layer0);
        assert_eq!(Fallback::resolve(&[]), Fallback::Layer0);
    }

    #[test]
    fn test_shared_layer_accumulates() {
        let zones = prepared(
            &[
                BiomeZone::new("a", 1, (40.0, 50.0), 20.0),
                BiomeZone::new("b", 1, (60.0, 50.0), 20.0),
                BiomeZone::new("c", 0, (50.0, 50.0), 20.0),
            ],
            2,
            LayerOverflow::Exclude,
        );
        let mut raw = vec![0.0; 3];
        let mut out = vec![0.0; 2];
        let outcome = resolve_cell(&zones, (50.0, 50.0), FALLBACK_THRESHOLD, Fallback::resolve(&zones), &mut raw, &mut out);
        assert!(!outcome.used_fallback);
        assert!((outcome.total - 2.0).abs() < 1e-6);
        // a and b each 0.5, c is 1.0
        assert!((out[1] - 0.5).abs() < 1e-6);
        assert!((out[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_empty_region_uses_fallback() {
        let zones = prepared(&[BiomeZone::new("rock", 2, (0.0, 0.0), 5.0)], 3, LayerOverflow::Exclude);
        let mut raw = vec![0.0; 1];
        let mut out = vec![0.7; 3];
        let outcome = resolve_cell(&zones, (90.0, 90.0), FALLBACK_THRESHOLD, Fallback::Layer0, &mut raw, &mut out);
        assert!(outcome.used_fallback);
        assert_eq!(out, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_overflow_lossy_vs_exclude() {
        let zones = [
            BiomeZone::new("sand", 0, (50.0, 50.0), 20.0),
            BiomeZone::new("ghost", 4, (50.0, 50.0), 20.0),
        ];
        let mut raw = vec![0.0; 2];
        let mut out = vec![0.0; 2];

        let exclude = prepared(&zones, 2, LayerOverflow::Exclude);
        resolve_cell(&exclude, (50.0, 50.0), FALLBACK_THRESHOLD, Fallback::Zone(0), &mut raw, &mut out);
        assert!((out.iter().sum::<f32>() - 1.0).abs() < 1e-6);

        let lossy = prepared(&zones, 2, LayerOverflow::Lossy);
        resolve_cell(&lossy, (50.0, 50.0), FALLBACK_THRESHOLD, Fallback::Zone(0), &mut raw, &mut out);
        assert!((out[0] - 0.5).abs() < 1e-6);
        assert!((out.iter().sum::<f32>() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_only_falls_back_when_excluded() {
        let zones = prepared(&[BiomeZone::new("ghost", 9, (50.0, 50.0), 20.0)], 2, LayerOverflow::Exclude);
        let mut raw = vec![0.0; 1];
        let mut out = vec![0.0; 2];
        assert!(resolve_cell(&zones, (50.0, 50.0), FALLBACK_THRESHOLD, Fallback::Layer0, &mut raw, &mut out).used_fallback);
        assert_eq!(out, vec![1.0, 0.0]);
    }

    #[test]
    fn test_huge_strengths_still_normalize() {
        let zones = prepared(
            &[
                BiomeZone::new("sand", 0, (50.0, 50.0), 500.0).with_strength(3.0e38),
                BiomeZone::new("rock", 1, (50.0, 50.0), 500.0).with_strength(3.0e38),
            ],
            2,
            LayerOverflow::Exclude,
        );
        let mut raw = vec![0.0; 2];
        let mut out = vec![0.0; 2];
        let outcome = resolve_cell(&zones, (50.0, 50.0), FALLBACK_THRESHOLD, Fallback::resolve(&zones), &mut raw, &mut out);
        assert!(!outcome.used_fallback);
        assert!(outcome.total.is_finite());
        assert!((out[0] - 0.5).abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_fallback_paints_layer0() {
        assert_eq!(Fallback::Zone(3).layer(), 0);
        assert_eq!(Fallback::Layer0.layer(), 0);
    }
}
