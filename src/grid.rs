//! Terrain grid description and the cell-to-world coordinate mapping.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A 2D world-space position (x, z on the terrain plane).
pub type WorldPoint = (f32, f32);

/// Read-only description of the host terrain's alpha map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainGrid {
    /// Alpha map resolution along x (cells)
    pub width: usize,
    /// Alpha map resolution along z (cells)
    pub height: usize,
    /// World position of cell (0, 0)
    pub origin: WorldPoint,
    /// World extent covered by the whole grid
    pub size: (f32, f32),
    /// Number of texture layers available for output
    pub layer_count: usize,
}

impl TerrainGrid {
    pub fn new(width: usize, height: usize, origin: WorldPoint, size: (f32, f32), layer_count: usize) -> Self {
        Self { width, height, origin, size, layer_count }
    }

    /// Grid-level checks that must pass before any output is allocated.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.layer_count == 0 {
            return Err(ConfigError::NoLayers);
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid { width: self.width, height: self.height });
        }
        Ok(())
    }

    /// World position of a cell. Linear in the cell index fraction, so cell
    /// `width` would land on the far edge and cell 0 sits on the origin.
    pub fn cell_to_world(&self, x: usize, y: usize) -> WorldPoint {
        let wx = x as f32 / self.width as f32 * self.size.0 + self.origin.0;
        let wz = y as f32 / self.height as f32 * self.size.1 + self.origin.1;
        (wx, wz)
    }

    /// Nearest cell to a world position, clamped to the grid.
    pub fn world_to_cell(&self, p: WorldPoint) -> (usize, usize) {
        let fx = (p.0 - self.origin.0) / self.size.0 * self.width as f32;
        let fy = (p.1 - self.origin.1) / self.size.1 * self.height as f32;
        let clamp = |v: f32, n: usize| -> usize {
            if !v.is_finite() || v <= 0.0 {
                0
            } else {
                (v.round() as usize).min(n.saturating_sub(1))
            }
        };
        (clamp(fx, self.width), clamp(fy, self.height))
    }

    /// World rectangle as (min, max) corners.
    pub fn world_bounds(&self) -> (WorldPoint, WorldPoint) {
        let min = self.origin;
        let max = (self.origin.0 + self.size.0, self.origin.1 + self.size.1);
        (min, max)
    }

    pub fn contains(&self, p: WorldPoint) -> bool {
        let (min, max) = self.world_bounds();
        p.0 >= min.0 && p.0 <= max.0 && p.1 >= min.1 && p.1 <= max.1
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }
}
