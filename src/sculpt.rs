//! Seabed height sculpting.
//!
//! Starts from a flat continental shelf and carves radial features into it:
//! shallow reefs, deep trenches and underwater mountains. Each feature pulls
//! heights toward its target with a smoothstep falloff, applied in list order
//! so later features win where they overlap.
//!
//! Heights are normalized depths in [0, 1].

use noise::{NoiseFn, Perlin, Seedable};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::tilemap::Tilemap;

/// Feature radii are authored against a 200-cell reference resolution.
pub const REFERENCE_RESOLUTION: f32 = 200.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Reef,
    Trench,
    Mountain,
}

/// A radial feature placed in normalized map coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeabedFeature {
    pub kind: FeatureKind,
    /// Center as a fraction of the map extent (0-1 on each axis)
    pub center: (f32, f32),
    /// Radius in reference units; scaled by `width / 200`
    pub radius: f32,
}

impl SeabedFeature {
    pub fn new(kind: FeatureKind, center: (f32, f32), radius: f32) -> Self {
        Self { kind, center, radius }
    }
}

/// Seabed sculpting parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SculptParams {
    /// Continental shelf depth everywhere before features (0.1-1.0)
    pub base_depth: f32,
    /// Target depth of coral reef zones (0.05-0.25)
    pub reef_depth: f32,
    /// Target depth of trenches (0.4-0.8)
    pub trench_depth: f32,
    /// Target height of underwater mountains (0.1-0.4)
    pub mountain_height: f32,
    /// Features applied in order over the shelf
    pub features: Vec<SeabedFeature>,
    /// Amplitude of fbm detail added after carving (0 disables)
    pub detail_amplitude: f32,
    /// Detail noise frequency across the whole map
    pub detail_frequency: f64,
    /// Seed for the detail noise
    pub seed: u64,
}

impl Default for SculptParams {
    fn default() -> Self {
        Self {
            base_depth: 0.3,
            reef_depth: 0.15,
            trench_depth: 0.7,
            mountain_height: 0.2,
            features: ocean_floor_layout(30.0, 25.0, 40.0),
            detail_amplitude: 0.0,
            detail_frequency: 8.0,
            seed: 0,
        }
    }
}

impl SculptParams {
    fn target(&self, kind: FeatureKind) -> f32 {
        match kind {
            FeatureKind::Reef => self.reef_depth,
            FeatureKind::Trench => self.trench_depth,
            FeatureKind::Mountain => self.mountain_height,
        }
    }
}

/// The stock layout: six reefs, two trenches, two mountains.
pub fn ocean_floor_layout(reef_radius: f32, trench_radius: f32, mountain_radius: f32) -> Vec<SeabedFeature> {
    use FeatureKind::*;
    vec![
        // northeast corner
        SeabedFeature::new(Reef, (0.8, 0.8), reef_radius),
        // southwest peninsula
        SeabedFeature::new(Reef, (0.3, 0.4), reef_radius * 0.8),
        // western barrier
        SeabedFeature::new(Reef, (0.1, 0.6), reef_radius),
        // eastern atoll
        SeabedFeature::new(Reef, (0.75, 0.3), reef_radius * 0.7),
        // southern scatter
        SeabedFeature::new(Reef, (0.6, 0.2), reef_radius * 0.5),
        SeabedFeature::new(Reef, (0.4, 0.3), reef_radius * 0.5),
        // northwest deep, southeast abyss
        SeabedFeature::new(Trench, (0.3, 0.7), trench_radius),
        SeabedFeature::new(Trench, (0.7, 0.4), trench_radius),
        // central peak, eastern ridge
        SeabedFeature::new(Mountain, (0.5, 0.5), mountain_radius),
        SeabedFeature::new(Mountain, (0.65, 0.7), mountain_radius * 0.7),
    ]
}

/// A feature resolved to cell coordinates.
struct CarveStamp {
    cx: f32,
    cy: f32,
    radius: f32,
    target: f32,
}

/// Sculpt a `width × height` seabed heightmap.
pub fn sculpt_seabed(width: usize, height: usize, params: &SculptParams) -> Tilemap<f32> {
    let mut heights = Tilemap::new_with(width, height, params.base_depth);
    if width == 0 || height == 0 {
        return heights;
    }

    let stamps: Vec<CarveStamp> = params
        .features
        .iter()
        .filter_map(|f| {
            let radius = (f.radius * width as f32 / REFERENCE_RESOLUTION).round_ties_even();
            if radius <= 0.0 {
                return None;
            }
            Some(CarveStamp {
                cx: (f.center.0 * width as f32).round_ties_even(),
                cy: (f.center.1 * height as f32).round_ties_even(),
                radius,
                target: params.target(f.kind),
            })
        })
        .collect();

    let noise = Perlin::new(1).set_seed(params.seed as u32);
    let add_detail = params.detail_amplitude != 0.0;

    heights
        .as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, h) in row.iter_mut().enumerate() {
                for s in &stamps {
                    let dx = x as f32 - s.cx;
                    let dy = y as f32 - s.cy;
                    let distance = (dx * dx + dy * dy).sqrt();
                    if distance < s.radius {
                        let influence = smooth_step(0.0, 1.0, 1.0 - distance / s.radius);
                        *h = lerp(*h, s.target, influence);
                    }
                }

                if add_detail {
                    let nx = x as f64 * params.detail_frequency / width as f64;
                    let ny = y as f64 * params.detail_frequency / height as f64;
                    let detail = fbm_noise(&noise, nx, ny, 4, 0.5, 2.0) as f32;
                    *h = (*h + detail * params.detail_amplitude).clamp(0.0, 1.0);
                }
            }
        });

    heights
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Smooth step interpolation (Hermite smoothstep)
fn smooth_step(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Fractional Brownian Motion noise
fn fbm_noise(
    noise: &impl NoiseFn<f64, 2>,
    x: f64,
    y: f64,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += amplitude * noise.get([x * frequency, y * frequency]);
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    total / max_value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(features: Vec<SeabedFeature>) -> SculptParams {
        SculptParams { features, ..SculptParams::default() }
    }

    #[test]
    fn test_flat_shelf_without_features() {
        let map = sculpt_seabed(32, 32, &bare(Vec::new()));
        assert_eq!(map.min_max(), Some((0.3, 0.3)));
    }

    #[test]
    fn test_feature_center_hits_target() {
        let params = bare(vec![SeabedFeature::new(FeatureKind::Trench, (0.5, 0.5), 50.0)]);
        let map = sculpt_seabed(200, 200, &params);
        assert!((*map.get(100, 100) - 0.7).abs() < 1e-6);
        // radius 50 cells; outside stays on the shelf
        assert_eq!(*map.get(100, 151), 0.3);
        assert_eq!(*map.get(0, 0), 0.3);
        let mid = *map.get(125, 100);
        assert!(mid > 0.3 && mid < 0.7);
    }

    #[test]
    fn test_later_feature_wins() {
        let params = bare(vec![
            SeabedFeature::new(FeatureKind::Trench, (0.5, 0.5), 40.0),
            SeabedFeature::new(FeatureKind::Mountain, (0.5, 0.5), 40.0),
        ]);
        let map = sculpt_seabed(100, 100, &params);
        assert!((*map.get(50, 50) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_tiny_radius_ignored() {
        let params = bare(vec![SeabedFeature::new(FeatureKind::Reef, (0.5, 0.5), 0.1)]);
        let map = sculpt_seabed(50, 50, &params);
        assert_eq!(map.min_max(), Some((0.3, 0.3)));
    }

    #[test]
    fn test_default_layout_range() {
        let map = sculpt_seabed(128, 128, &SculptParams::default());
        let (lo, hi) = map.min_max().unwrap();
        assert!(lo >= 0.15 - 1e-6);
        assert!(hi <= 0.7 + 1e-6);
        assert!(hi > 0.6, "trenches should be carved");
    }

    #[test]
    fn test_detail_noise_bounded_and_deterministic() {
        let params = SculptParams { detail_amplitude: 0.05, seed: 9, ..SculptParams::default() };
        let a = sculpt_seabed(64, 64, &params);
        let b = sculpt_seabed(64, 64, &params);
        assert_eq!(a, b);
        let (lo, hi) = a.min_max().unwrap();
        assert!(lo >= 0.0 && hi <= 1.0);
    }
}
