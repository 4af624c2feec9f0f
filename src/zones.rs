//! Biome zone records and per-pass zone preparation.
//!
//! Zones are plain values supplied by the caller. Before a pass each zone is
//! checked once, its curve validated and its warnings collected, producing a
//! [`PreparedZone`] the per-cell loop can read without further checks.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::curve::{CurveKey, ResponseCurve};
use crate::error::ZoneWarning;
use crate::grid::{TerrainGrid, WorldPoint};

/// A circular region that paints one texture layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomeZone {
    pub name: String,
    /// Index of the texture layer this zone writes into
    pub output_layer: usize,
    /// Center in world coordinates
    pub center: WorldPoint,
    /// Influence radius in world units; must be positive
    pub radius: f32,
    /// Falloff sampled with `1 - distance / radius`
    #[serde(default)]
    pub response_curve: ResponseCurve,
    /// Multiplier on the curve output; must be non-negative
    #[serde(default = "default_strength")]
    pub base_strength: f32,
}

fn default_strength() -> f32 {
    1.0
}

impl BiomeZone {
    /// Zone with a linear falloff and full strength.
    pub fn new(name: &str, output_layer: usize, center: WorldPoint, radius: f32) -> Self {
        Self {
            name: name.to_string(),
            output_layer,
            center,
            radius,
            response_curve: ResponseCurve::identity(),
            base_strength: 1.0,
        }
    }

    pub fn with_curve(mut self, curve: ResponseCurve) -> Self {
        self.response_curve = curve;
        self
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.base_strength = strength;
        self
    }
}

/// What to do with zones whose layer does not exist on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerOverflow {
    /// Leave the zone out of the normalization total too, so every cell
    /// still sums to 1.
    #[default]
    Exclude,
    /// Count the zone toward the total but never write it. Cells touched by
    /// such a zone sum to less than 1.
    Lossy,
}

/// A zone checked and ready for the per-cell loop.
#[derive(Clone, Debug)]
pub struct PreparedZone {
    /// Position in the caller's list
    pub index: usize,
    pub layer: usize,
    pub center: WorldPoint,
    pub radius: f32,
    pub curve: ResponseCurve,
    pub strength: f32,
    /// Radius is usable; inactive zones always weigh 0
    pub active: bool,
    /// Layer exists on the grid
    pub writes: bool,
    /// Raw weight counts toward the cell total
    pub counts: bool,
}

impl PreparedZone {
    /// Distance from `p`, normalized distance, curve output and raw weight.
    #[inline]
    pub fn sample(&self, p: WorldPoint) -> (f32, f32, f32, f32) {
        let dx = p.0 - self.center.0;
        let dy = p.1 - self.center.1;
        let distance = (dx * dx + dy * dy).sqrt();
        if !self.active {
            return (distance, 1.0, 0.0, 0.0);
        }
        let normalized = (distance / self.radius).clamp(0.0, 1.0);
        let influence = self.curve.evaluate(1.0 - normalized);
        (distance, normalized, influence, influence * self.strength)
    }

    /// Raw weight only.
    #[inline]
    pub fn raw_weight(&self, p: WorldPoint) -> f32 {
        self.sample(p).3
    }
}

/// Check every zone against the grid, repairing what can be repaired.
pub fn prepare_zones(
    grid: &TerrainGrid,
    zones: &[BiomeZone],
    overflow: LayerOverflow,
) -> (Vec<PreparedZone>, Vec<ZoneWarning>) {
    let mut warnings = Vec::new();
    let mut prepared = Vec::with_capacity(zones.len());

    for (index, zone) in zones.iter().enumerate() {
        let active = zone.radius.is_finite() && zone.radius > 0.0;
        if !active {
            warnings.push(ZoneWarning::InvalidRadius {
                zone: index,
                name: zone.name.clone(),
                radius: zone.radius,
            });
        }

        let strength = if zone.base_strength.is_finite() && zone.base_strength >= 0.0 {
            zone.base_strength
        } else {
            warnings.push(ZoneWarning::InvalidStrength {
                zone: index,
                name: zone.name.clone(),
                strength: zone.base_strength,
            });
            0.0
        };

        let curve = if zone.response_curve.needs_repair() {
            let (at_zero, at_one) = zone.response_curve.endpoints();
            warnings.push(ZoneWarning::CurveRepaired {
                zone: index,
                name: zone.name.clone(),
                at_zero,
                at_one,
            });
            ResponseCurve::identity()
        } else {
            zone.response_curve.clone()
        };

        let writes = zone.output_layer < grid.layer_count;
        if !writes {
            warnings.push(ZoneWarning::LayerOutOfRange {
                zone: index,
                name: zone.name.clone(),
                layer: zone.output_layer,
                layer_count: grid.layer_count,
            });
        }
        let counts = writes || overflow == LayerOverflow::Lossy;

        prepared.push(PreparedZone {
            index,
            layer: zone.output_layer,
            center: zone.center,
            radius: zone.radius,
            curve,
            strength,
            active,
            writes,
            counts,
        });
    }

    (prepared, warnings)
}

/// Scatter `count` random zones over the grid's world rectangle.
///
/// Deterministic for a given seed. Radii fall between 10% and 35% of the
/// shorter world side; curves alternate between linear and eased.
pub fn scatter_zones(grid: &TerrainGrid, count: usize, seed: u64) -> Vec<BiomeZone> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (min, max) = grid.world_bounds();
    let short_side = grid.size.0.abs().min(grid.size.1.abs()).max(1.0);
    let layers = grid.layer_count.max(1);

    (0..count)
        .map(|i| {
            let center = (
                rng.gen_range(min.0.min(max.0)..=min.0.max(max.0)),
                rng.gen_range(min.1.min(max.1)..=min.1.max(max.1)),
            );
            let radius = short_side * rng.gen_range(0.10..0.35);
            let curve = if rng.gen_bool(0.5) {
                ResponseCurve::EaseInOut { start: 0.0, end: 1.0 }
            } else {
                ResponseCurve::keyframes(vec![
                    CurveKey::new(0.0, 0.0),
                    CurveKey::new(0.5, rng.gen_range(0.3..0.7)),
                    CurveKey::new(1.0, 1.0),
                ])
            };
            BiomeZone {
                name: format!("zone_{}", i),
                output_layer: i % layers,
                center,
                radius,
                response_curve: curve,
                base_strength: rng.gen_range(0.5..1.5),
            }
        })
        .collect()
}
